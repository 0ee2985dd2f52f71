//! Stop-word set construction.
//!
//! A [`StopWordSet`] is the union of a base list (usually a file), the search
//! keyword itself, caller-supplied extras, and [`CURATED_EXCLUSIONS`]. It is
//! built once per run and never changes afterwards.

use std::collections::HashSet;

use camino::Utf8Path;

/// Used in place of the base list when none could be loaded.
pub const FALLBACK_STOPWORDS: &[&str] = &[
    "것", "등", "위", "수", "배", "만", "명", "관련", "대해", "뉴스", "속보",
];

/// Domain and time-unit noise that shows up in news search results regardless
/// of keyword.
pub const CURATED_EXCLUSIONS: &[&str] = &[
    "서울", "서울시", "부동산", "주요", "첫째", "결과", "조사", "아크", "대비", "증권",
    "가능성", "대표", "시절", "제자", "최강", "활용", "최진", "타운", "요소", "적용",
    "중앙", "전주", "한국", "포함", "도시", "일부", "이슈", "보고서", "갈등", "미래",
    "위원", "통해", "문제", "NH투자증권", "아유경제_부동산", "quot", "조국", "조희연",
    "사면", "심층분석", "년", "월", "일", "시",
];

/// Immutable set of terms excluded from counting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopWordSet {
    words: HashSet<String>,
}

impl StopWordSet {
    /// Build the set for one run.
    ///
    /// An empty `base` is replaced by [`FALLBACK_STOPWORDS`]. A non-empty
    /// `keyword` is added verbatim and with all whitespace removed.
    #[tracing::instrument(skip(base, extra), fields(base_len = base.len(), extra_len = extra.len()))]
    pub fn build(base: &HashSet<String>, keyword: &str, extra: &HashSet<String>) -> Self {
        let mut words: HashSet<String> = if base.is_empty() {
            FALLBACK_STOPWORDS.iter().map(|w| (*w).to_string()).collect()
        } else {
            base.clone()
        };

        if !keyword.is_empty() {
            words.insert(keyword.to_string());
            words.insert(keyword.chars().filter(|c| !c.is_whitespace()).collect());
        }

        words.extend(extra.iter().cloned());
        words.extend(CURATED_EXCLUSIONS.iter().map(|w| (*w).to_string()));

        tracing::debug!(size = words.len(), "stop-word set built");
        Self { words }
    }

    /// Whether `term` is excluded.
    pub fn contains(&self, term: &str) -> bool {
        self.words.contains(term)
    }

    /// Number of distinct stop words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Parse a stop-word list: one word per line, `#` starts a comment line.
pub fn parse_stopword_list(content: &str) -> HashSet<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(ToString::to_string)
        .collect()
}

/// Load a stop-word list from disk.
///
/// A missing or unreadable file yields an empty set so the builder falls back
/// to its built-in list.
pub fn load_stopword_file(path: &Utf8Path) -> HashSet<String> {
    match std::fs::read_to_string(path.as_std_path()) {
        Ok(content) => {
            let words = parse_stopword_list(&content);
            tracing::debug!(%path, count = words.len(), "loaded stop-word file");
            words
        }
        Err(e) => {
            tracing::warn!(%path, error = %e, "stop-word file unavailable, using built-in list");
            HashSet::new()
        }
    }
}
