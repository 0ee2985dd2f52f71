//! Documents, corpus snapshots, and calendar-day grouping.
//!
//! A [`Document`] is one retrieved news article. The pipeline only ever reads
//! documents; grouping by publication date borrows them.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc, Weekday};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::WeekdayLocale;
use crate::error::SourceResult;

/// Korea Standard Time, the offset news timestamps are published in.
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 9 * 60;

/// A single news article with markup already removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Document {
    /// Publication time, with the offset it was published in.
    pub published_at: DateTime<FixedOffset>,
    /// Headline.
    #[serde(default)]
    pub title: String,
    /// Body snippet.
    #[serde(default)]
    pub body: String,
}

impl Document {
    /// Create a document from its parts.
    pub fn new(
        published_at: DateTime<FixedOffset>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            published_at,
            title: title.into(),
            body: body.into(),
        }
    }

    /// Title and body joined by a single space: the text unit that gets tokenized.
    pub fn text(&self) -> String {
        format!("{} {}", self.title, self.body)
    }
}

/// Parse a corpus snapshot: a JSON array of documents.
pub fn parse_corpus(json: &str) -> SourceResult<Vec<Document>> {
    Ok(serde_json::from_str(json)?)
}

/// Calendar settings used to turn timestamps into days.
///
/// Both the time zone and the weekday labels are explicit so daily views come
/// out the same regardless of the host's locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    offset: FixedOffset,
    locale: WeekdayLocale,
}

impl Default for Calendar {
    fn default() -> Self {
        Self::kst(WeekdayLocale::default())
    }
}

impl Calendar {
    /// Create a calendar for a fixed offset.
    pub const fn new(offset: FixedOffset, locale: WeekdayLocale) -> Self {
        Self { offset, locale }
    }

    /// Korea Standard Time (UTC+9).
    pub fn kst(locale: WeekdayLocale) -> Self {
        Self::from_offset_minutes(DEFAULT_UTC_OFFSET_MINUTES, locale)
    }

    /// Build from an offset in minutes east of UTC.
    ///
    /// Offsets outside ±24h fall back to UTC.
    pub fn from_offset_minutes(minutes: i32, locale: WeekdayLocale) -> Self {
        let offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix());
        Self { offset, locale }
    }

    /// The configured offset.
    pub const fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Calendar day of publication in this calendar's time zone.
    pub fn date_of(&self, doc: &Document) -> NaiveDate {
        doc.published_at.with_timezone(&self.offset).date_naive()
    }

    /// Localized weekday name.
    pub const fn weekday_label(&self, day: Weekday) -> &'static str {
        self.locale.label(day)
    }

    /// Group documents by publication day, oldest day first.
    ///
    /// Within a day, documents keep corpus order.
    pub fn group_by_date<'a>(&self, corpus: &'a [Document]) -> BTreeMap<NaiveDate, Vec<&'a Document>> {
        let mut days: BTreeMap<NaiveDate, Vec<&'a Document>> = BTreeMap::new();
        for doc in corpus {
            days.entry(self.date_of(doc)).or_default().push(doc);
        }
        days
    }
}
