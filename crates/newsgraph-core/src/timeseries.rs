//! Daily document volume and per-day frequencies of the top terms.
//!
//! Each day's documents are concatenated and tokenized again, independent of
//! the corpus-wide pass, then counted for the terms that ranked highest
//! overall.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Weekday};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::cooccurrence::{FrequencyTable, TermFilter};
use crate::document::{Calendar, Document};
use crate::tokenizer::NounExtractor;

/// Weekdays in display order, Monday first.
pub const WEEKDAY_ORDER: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Documents published on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DailyVolume {
    /// Publication day.
    pub date: NaiveDate,
    /// Number of documents.
    pub documents: usize,
    /// Localized weekday name.
    pub weekday: String,
    /// Position in [`WEEKDAY_ORDER`] (Monday = 0).
    pub weekday_index: u8,
}

/// Same-day frequency of one top term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DailyTermCount {
    /// Publication day.
    pub date: NaiveDate,
    /// Tracked term.
    pub term: String,
    /// Occurrences that day, zero when absent.
    pub count: usize,
}

/// Output of [`time_series`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TimeSeries {
    /// Terms being tracked, highest overall frequency first.
    pub terms: Vec<String>,
    /// One entry per day present in the corpus, oldest first.
    pub volume: Vec<DailyVolume>,
    /// One entry per (day, term), sorted by day then by `terms` order.
    pub series: Vec<DailyTermCount>,
    /// Days whose text the extractor failed on; their counts are zero.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_dates: Vec<NaiveDate>,
}

/// Build the daily volume and the daily series for the `top_n` terms of
/// `global`.
#[tracing::instrument(skip_all, fields(documents = corpus.len(), top_n))]
pub fn time_series(
    corpus: &[Document],
    global: &FrequencyTable,
    top_n: usize,
    extractor: &dyn NounExtractor,
    filter: &TermFilter<'_>,
    calendar: &Calendar,
) -> TimeSeries {
    let terms: Vec<String> = global.most_common(top_n).into_iter().map(|t| t.term).collect();
    let mut out = TimeSeries {
        terms,
        ..TimeSeries::default()
    };

    for (date, docs) in calendar.group_by_date(corpus) {
        let weekday = date.weekday();
        out.volume.push(DailyVolume {
            date,
            documents: docs.len(),
            weekday: calendar.weekday_label(weekday).to_string(),
            weekday_index: weekday.num_days_from_monday() as u8,
        });

        let text = docs.iter().map(|d| d.text()).collect::<Vec<_>>().join(" ");
        let mut daily: HashMap<String, usize> = HashMap::new();
        match extractor.nouns(&text) {
            Ok(tokens) => {
                for term in filter.apply(tokens) {
                    *daily.entry(term).or_insert(0) += 1;
                }
            }
            Err(e) => {
                tracing::warn!(%date, error = %e, "noun extraction failed for day, counting zero");
                out.failed_dates.push(date);
            }
        }

        out.series.extend(out.terms.iter().map(|term| DailyTermCount {
            date,
            term: term.clone(),
            count: daily.get(term).copied().unwrap_or(0),
        }));
    }

    tracing::debug!(
        days = out.volume.len(),
        points = out.series.len(),
        "time series built"
    );
    out
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::DateTime;

    use super::*;
    use crate::config::WeekdayLocale;
    use crate::cooccurrence::analyze;
    use crate::stopwords::StopWordSet;
    use crate::tokenizer::HangulNounExtractor;

    fn doc(ts: &str, title: &str) -> Document {
        Document::new(DateTime::parse_from_rfc3339(ts).unwrap(), title, "")
    }

    fn stopwords() -> StopWordSet {
        let base: HashSet<String> = ["__none__".to_string()].into_iter().collect();
        StopWordSet::build(&base, "", &HashSet::new())
    }

    fn corpus() -> Vec<Document> {
        vec![
            doc("2025-07-02T09:00:00+09:00", "케이팝 데몬 헌터스 애니메이션"),
            doc("2025-07-01T09:00:00+09:00", "케이팝 애니메이션 영화"),
            doc("2025-07-02T21:00:00+09:00", "케이팝 음악"),
        ]
    }

    fn run(corpus: &[Document], top_n: usize) -> TimeSeries {
        let sw = stopwords();
        let filter = TermFilter::new(&sw, 2);
        let extractor = HangulNounExtractor::new();
        let global = analyze(corpus, &extractor, &filter).frequencies;
        time_series(corpus, &global, top_n, &extractor, &filter, &Calendar::kst(WeekdayLocale::En))
    }

    #[test]
    fn volume_is_sorted_by_date_with_weekdays() {
        let ts = run(&corpus(), 2);
        assert_eq!(ts.volume.len(), 2);
        assert_eq!(ts.volume[0].date.to_string(), "2025-07-01");
        assert_eq!(ts.volume[0].documents, 1);
        assert_eq!(ts.volume[0].weekday, "Tuesday");
        assert_eq!(ts.volume[0].weekday_index, 1);
        assert_eq!(ts.volume[1].documents, 2);
        assert_eq!(ts.volume[1].weekday, "Wednesday");
    }

    #[test]
    fn top_terms_break_ties_by_first_occurrence() {
        let two_docs = vec![
            doc("2025-07-01T09:00:00+09:00", "케이팝 데몬 헌터스 애니메이션"),
            doc("2025-07-01T10:00:00+09:00", "케이팝 애니메이션 영화"),
        ];
        let ts = run(&two_docs, 2);
        assert_eq!(ts.terms, vec!["케이팝", "애니메이션"]);
        assert_eq!(ts.series.len(), 2);
    }

    #[test]
    fn series_has_every_top_term_each_day() {
        let ts = run(&corpus(), 3);
        assert_eq!(ts.terms, vec!["케이팝", "애니메이션", "데몬"]);
        assert_eq!(ts.series.len(), 6);

        let day1: Vec<_> = ts.series[..3].iter().map(|p| (p.term.as_str(), p.count)).collect();
        assert_eq!(day1, vec![("케이팝", 1), ("애니메이션", 1), ("데몬", 0)]);
        let day2: Vec<_> = ts.series[3..].iter().map(|p| (p.term.as_str(), p.count)).collect();
        assert_eq!(day2, vec![("케이팝", 2), ("애니메이션", 1), ("데몬", 1)]);
        assert!(ts.series.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn empty_corpus_yields_empty_series() {
        let ts = run(&[], 5);
        assert!(ts.volume.is_empty());
        assert!(ts.series.is_empty());
        assert!(ts.terms.is_empty());
    }

    #[test]
    fn weekday_order_starts_monday() {
        assert_eq!(WEEKDAY_ORDER[0], Weekday::Mon);
        assert_eq!(WEEKDAY_ORDER[6], Weekday::Sun);
    }
}
