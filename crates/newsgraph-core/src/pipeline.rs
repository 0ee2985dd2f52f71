//! End-to-end analysis run.
//!
//! [`AnalysisParams`] is the full request tuple and doubles as the memoization
//! key for hosts that cache reports. [`Pipeline::run`] validates it, then
//! threads one corpus and one stop-word snapshot through every stage.

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::cooccurrence::{SkippedDocument, TermCount, TermFilter, analyze};
use crate::document::{Calendar, DEFAULT_UTC_OFFSET_MINUTES, Document};
use crate::error::{AnalysisError, AnalysisResult};
use crate::graph::{Graph, build_graph};
use crate::stopwords::{StopWordSet, load_stopword_file};
use crate::timeseries::{TimeSeries, time_series};
use crate::tokenizer::HangulNounExtractor;
use crate::tokenizer::NounExtractor;

/// Default number of documents to retrieve.
pub const DEFAULT_DOCUMENT_LIMIT: usize = 1000;
/// Default minimum term length in characters.
pub const DEFAULT_MIN_TERM_LENGTH: usize = 2;
/// Default number of terms in the word cloud / frequency table.
pub const DEFAULT_WORDCLOUD_TOP_N: usize = 80;
/// Default number of edges kept in the graph.
pub const DEFAULT_EDGE_TOP_N: usize = 50;
/// Default number of terms tracked per day.
pub const DEFAULT_TIME_SERIES_TOP_N: usize = 5;

/// Parameters for one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisParams {
    /// Search keyword. Also excluded from the counted terms.
    pub keyword: String,
    /// Maximum number of documents analyzed.
    pub document_limit: usize,
    /// Shortest term kept, in characters.
    pub min_term_length: usize,
    /// Terms in the ranked table.
    pub wordcloud_top_n: usize,
    /// Edges kept in the graph.
    pub edge_top_n: usize,
    /// Terms tracked in the daily series.
    pub time_series_top_n: usize,
}

impl AnalysisParams {
    /// Parameters for `keyword` with built-in defaults.
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            document_limit: DEFAULT_DOCUMENT_LIMIT,
            min_term_length: DEFAULT_MIN_TERM_LENGTH,
            wordcloud_top_n: DEFAULT_WORDCLOUD_TOP_N,
            edge_top_n: DEFAULT_EDGE_TOP_N,
            time_series_top_n: DEFAULT_TIME_SERIES_TOP_N,
        }
    }

    /// Parameters for `keyword` with defaults taken from `config` where set.
    pub fn from_config(keyword: impl Into<String>, config: &Config) -> Self {
        Self {
            keyword: keyword.into(),
            document_limit: config.document_limit.unwrap_or(DEFAULT_DOCUMENT_LIMIT),
            min_term_length: config.min_term_length.unwrap_or(DEFAULT_MIN_TERM_LENGTH),
            wordcloud_top_n: config.wordcloud_top_n.unwrap_or(DEFAULT_WORDCLOUD_TOP_N),
            edge_top_n: config.edge_top_n.unwrap_or(DEFAULT_EDGE_TOP_N),
            time_series_top_n: config.time_series_top_n.unwrap_or(DEFAULT_TIME_SERIES_TOP_N),
        }
    }

    /// Reject out-of-range values before anything runs.
    pub fn validate(&self) -> AnalysisResult<()> {
        if self.keyword.trim().is_empty() {
            return Err(AnalysisError::InvalidParameter {
                name: "keyword",
                reason: "must not be empty".to_string(),
            });
        }
        let counts = [
            ("document_limit", self.document_limit),
            ("min_term_length", self.min_term_length),
            ("wordcloud_top_n", self.wordcloud_top_n),
            ("edge_top_n", self.edge_top_n),
            ("time_series_top_n", self.time_series_top_n),
        ];
        for (name, value) in counts {
            if value < 1 {
                return Err(AnalysisError::InvalidParameter {
                    name,
                    reason: format!("must be at least 1, got {value}"),
                });
            }
        }
        Ok(())
    }
}

/// Whether a report has anything to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    /// At least one term survived filtering.
    Ready,
    /// The corpus was empty or every token was filtered out.
    InsufficientData,
}

/// Everything one run produces. Read-only once returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisReport {
    /// Keyword the run was for.
    pub keyword: String,
    /// Ready, or insufficient data.
    pub status: AnalysisStatus,
    /// Documents in the analyzed corpus.
    pub document_count: usize,
    /// Documents the extractor failed on.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_documents: Vec<SkippedDocument>,
    /// Distinct terms counted.
    pub distinct_terms: usize,
    /// Most frequent terms, `wordcloud_top_n` of them.
    pub top_terms: Vec<TermCount>,
    /// Most frequent terms, `time_series_top_n` of them.
    pub bar_terms: Vec<TermCount>,
    /// Co-occurrence network.
    pub graph: Graph,
    /// Daily volume and per-term series.
    pub time_series: TimeSeries,
}

impl AnalysisReport {
    /// Whether the report should render as "insufficient data".
    pub fn is_insufficient(&self) -> bool {
        self.status == AnalysisStatus::InsufficientData
    }
}

/// Runs every analysis stage with one extractor and calendar.
#[derive(Clone, Copy)]
pub struct Pipeline<'a> {
    extractor: &'a dyn NounExtractor,
    calendar: Calendar,
}

impl std::fmt::Debug for Pipeline<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("extractor", &self.extractor.name())
            .field("calendar", &self.calendar)
            .finish()
    }
}

impl<'a> Pipeline<'a> {
    /// Pipeline using KST days and Korean weekday labels.
    pub fn new(extractor: &'a dyn NounExtractor) -> Self {
        Self {
            extractor,
            calendar: Calendar::default(),
        }
    }

    /// Use a different calendar for daily grouping.
    pub const fn with_calendar(mut self, calendar: Calendar) -> Self {
        self.calendar = calendar;
        self
    }

    /// Analyze the first `document_limit` documents of `corpus`.
    ///
    /// Both the corpus-wide pass and the daily pass filter against the same
    /// `stopwords`. An empty result is reported through
    /// [`AnalysisStatus::InsufficientData`], never as an error.
    ///
    /// `stopwords` must have been built for `params.keyword`; a set that does
    /// not exclude the keyword is rejected as an invalid parameter.
    #[tracing::instrument(skip(self, corpus, stopwords), fields(keyword = %params.keyword, documents = corpus.len()))]
    pub fn run(
        &self,
        params: &AnalysisParams,
        corpus: &[Document],
        stopwords: &StopWordSet,
    ) -> AnalysisResult<AnalysisReport> {
        params.validate()?;
        if !stopwords.contains(&params.keyword) {
            return Err(AnalysisError::InvalidParameter {
                name: "stopwords",
                reason: format!("not built for keyword \"{}\"", params.keyword),
            });
        }

        let corpus = &corpus[..corpus.len().min(params.document_limit)];
        let filter = TermFilter::new(stopwords, params.min_term_length);

        let analysis = analyze(corpus, self.extractor, &filter);
        let graph = build_graph(&analysis.pairs, params.edge_top_n);
        let series = time_series(
            corpus,
            &analysis.frequencies,
            params.time_series_top_n,
            self.extractor,
            &filter,
            &self.calendar,
        );

        let status = if analysis.frequencies.is_empty() {
            tracing::info!("no terms survived filtering");
            AnalysisStatus::InsufficientData
        } else {
            AnalysisStatus::Ready
        };

        Ok(AnalysisReport {
            keyword: params.keyword.clone(),
            status,
            document_count: corpus.len(),
            skipped_documents: analysis.skipped,
            distinct_terms: analysis.frequencies.len(),
            top_terms: analysis.frequencies.most_common(params.wordcloud_top_n),
            bar_terms: analysis.frequencies.most_common(params.time_series_top_n),
            graph,
            time_series: series,
        })
    }
}

/// Build the run's stop-word snapshot from `config`.
///
/// The base list comes from `stopwords_file` when one is configured; a missing
/// file falls back to the built-in list.
pub fn stopwords_for(config: &Config, keyword: &str) -> StopWordSet {
    let base = config
        .stopwords_file
        .as_deref()
        .map(load_stopword_file)
        .unwrap_or_default();
    let extra: HashSet<String> = config
        .extra_stopwords
        .iter()
        .flatten()
        .cloned()
        .collect();
    StopWordSet::build(&base, keyword, &extra)
}

/// Rule-based extractor with the configured extra nouns.
pub fn extractor_for(config: &Config) -> HangulNounExtractor {
    HangulNounExtractor::new().with_nouns(config.extra_nouns.iter().flatten())
}

/// Calendar from the configured offset and weekday locale.
pub fn calendar_for(config: &Config) -> Calendar {
    Calendar::from_offset_minutes(
        config.utc_offset_minutes.unwrap_or(DEFAULT_UTC_OFFSET_MINUTES),
        config.weekday_locale.unwrap_or_default(),
    )
}
