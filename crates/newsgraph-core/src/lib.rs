//! Core library for newsgraph.
//!
//! This crate turns a corpus of news articles into a ranked term-frequency
//! table, a weighted co-occurrence graph, and a per-day series for the top
//! terms. It is used by the `newsgraph` CLI and any downstream consumers.
//!
//! # Modules
//!
//! - [`config`] - Configuration loading and management
//! - [`cooccurrence`] - Term counting and per-document pair extraction
//! - [`document`] - Document model, corpus snapshots, calendar grouping
//! - [`error`] - Error types and result aliases
//! - [`graph`] - Weighted co-occurrence graph with degree centrality
//! - [`pipeline`] - Parameters, validation, and the end-to-end run
//! - [`source`] - News retrieval (Naver search API)
//! - [`stopwords`] - Stop-word set construction
//! - [`timeseries`] - Daily volume and daily term counts
//! - [`tokenizer`] - Noun extraction
//!
//! # Quick Start
//!
//! ```no_run
//! use newsgraph_core::{AnalysisParams, HangulNounExtractor, Pipeline, StopWordSet};
//!
//! let corpus = newsgraph_core::document::parse_corpus(
//!     r#"[{"published_at": "2025-07-01T09:00:00+09:00", "title": "케이팝 애니메이션 영화"}]"#,
//! )
//! .expect("valid corpus");
//! let params = AnalysisParams::new("넷플릭스");
//! let stopwords = StopWordSet::build(&Default::default(), &params.keyword, &Default::default());
//! let extractor = HangulNounExtractor::new();
//! let report = Pipeline::new(&extractor)
//!     .run(&params, &corpus, &stopwords)
//!     .expect("valid parameters");
//!
//! println!("{} distinct terms", report.distinct_terms);
//! ```
#![deny(unsafe_code)]

pub mod config;
pub mod cooccurrence;
pub mod document;
pub mod error;
pub mod graph;
pub mod pipeline;
pub mod source;
pub mod stopwords;
pub mod timeseries;
pub mod tokenizer;

pub use config::{Config, ConfigLoader, LogLevel, WeekdayLocale};
pub use cooccurrence::{FrequencyTable, TermCount, TermFilter, TermPair};
pub use document::{Calendar, Document};
pub use error::{
    AnalysisError, AnalysisResult, ConfigError, ConfigResult, SourceError, SourceResult,
};
pub use graph::{Graph, GraphEdge, GraphNode};
pub use pipeline::{AnalysisParams, AnalysisReport, AnalysisStatus, Pipeline};
pub use source::{NaverNewsClient, NewsSource};
pub use stopwords::StopWordSet;
pub use timeseries::TimeSeries;
pub use tokenizer::{HangulNounExtractor, NounExtractor};

/// Default maximum corpus file size: 5 MiB.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;
