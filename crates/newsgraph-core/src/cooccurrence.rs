//! Term frequency and per-document co-occurrence extraction.
//!
//! Each document's noun stream is filtered, added to a corpus-wide
//! [`FrequencyTable`], then deduplicated and sorted so every unordered pair of
//! its distinct terms is emitted exactly once as a [`TermPair`].

use std::collections::{BTreeSet, HashMap};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::stopwords::StopWordSet;
use crate::tokenizer::NounExtractor;

/// Keeps tokens that are long enough and not stop words.
#[derive(Debug, Clone, Copy)]
pub struct TermFilter<'a> {
    stopwords: &'a StopWordSet,
    min_len: usize,
}

impl<'a> TermFilter<'a> {
    /// Create a filter. Length is measured in characters, not bytes.
    pub const fn new(stopwords: &'a StopWordSet, min_len: usize) -> Self {
        Self { stopwords, min_len }
    }

    /// Whether `term` survives filtering.
    pub fn keep(&self, term: &str) -> bool {
        term.chars().count() >= self.min_len && !self.stopwords.contains(term)
    }

    /// Filter a token stream, keeping order and repetition.
    pub fn apply(&self, tokens: Vec<String>) -> Vec<String> {
        tokens.into_iter().filter(|t| self.keep(t)).collect()
    }
}

/// A term and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TermCount {
    /// The term.
    pub term: String,
    /// Occurrences.
    pub count: usize,
}

/// Term counts that remember first-insertion order.
///
/// Insertion order is the tie-break for ranking, so two runs over the same
/// corpus always rank equal counts the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<TermCount>,
    index: HashMap<String, usize>,
}

impl FrequencyTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `term`.
    pub fn add(&mut self, term: &str) {
        if let Some(&i) = self.index.get(term) {
            self.entries[i].count += 1;
        } else {
            self.index.insert(term.to_string(), self.entries.len());
            self.entries.push(TermCount {
                term: term.to_string(),
                count: 1,
            });
        }
    }

    /// Count every term in `terms`.
    pub fn extend<I, S>(&mut self, terms: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for term in terms {
            self.add(term.as_ref());
        }
    }

    /// Count for `term`, zero when absent.
    pub fn get(&self, term: &str) -> usize {
        self.index.get(term).map_or(0, |&i| self.entries[i].count)
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no term has been counted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TermCount> {
        self.entries.iter()
    }

    /// The `n` highest counts; equal counts keep insertion order.
    pub fn most_common(&self, n: usize) -> Vec<TermCount> {
        let mut ranked = self.entries.clone();
        // sort_by is stable
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.truncate(n);
        ranked
    }
}

/// Unordered pair of distinct terms, stored with `first < second`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub struct TermPair {
    /// Lexicographically smaller term.
    pub first: String,
    /// Lexicographically larger term.
    pub second: String,
}

impl TermPair {
    /// Build a pair in canonical order. Returns `None` for `a == b`.
    pub fn new(a: &str, b: &str) -> Option<Self> {
        match a.cmp(b) {
            std::cmp::Ordering::Less => Some(Self {
                first: a.to_string(),
                second: b.to_string(),
            }),
            std::cmp::Ordering::Greater => Some(Self {
                first: b.to_string(),
                second: a.to_string(),
            }),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// A document that could not be tokenized and was left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SkippedDocument {
    /// Position in the corpus.
    pub index: usize,
    /// Extractor error message.
    pub reason: String,
}

/// Output of [`analyze`].
#[derive(Debug, Clone, Default)]
pub struct CooccurrenceAnalysis {
    /// Corpus-wide counts of surviving tokens.
    pub frequencies: FrequencyTable,
    /// One event per distinct pair per document, in corpus order.
    pub pairs: Vec<TermPair>,
    /// Documents the extractor failed on.
    pub skipped: Vec<SkippedDocument>,
}

/// Every pair `(a, b)` with `a < b` from a sorted, deduplicated term set.
pub fn pairs_of(terms: &BTreeSet<&str>) -> Vec<TermPair> {
    let terms: Vec<&str> = terms.iter().copied().collect();
    let mut pairs = Vec::with_capacity(terms.len() * terms.len().saturating_sub(1) / 2);
    for (i, a) in terms.iter().enumerate() {
        for b in &terms[i + 1..] {
            pairs.push(TermPair {
                first: (*a).to_string(),
                second: (*b).to_string(),
            });
        }
    }
    pairs
}

/// Count terms and emit co-occurrence pairs over a corpus.
///
/// A document the extractor fails on is logged and skipped; the rest of the
/// corpus is still analyzed. An empty corpus yields empty outputs.
#[tracing::instrument(skip_all, fields(documents = corpus.len(), extractor = extractor.name()))]
pub fn analyze(
    corpus: &[Document],
    extractor: &dyn NounExtractor,
    filter: &TermFilter<'_>,
) -> CooccurrenceAnalysis {
    let mut out = CooccurrenceAnalysis::default();

    for (index, doc) in corpus.iter().enumerate() {
        let tokens = match extractor.nouns(&doc.text()) {
            Ok(tokens) => tokens,
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping document");
                out.skipped.push(SkippedDocument {
                    index,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let terms = filter.apply(tokens);
        out.frequencies.extend(&terms);

        let unique: BTreeSet<&str> = terms.iter().map(String::as_str).collect();
        if unique.len() >= 2 {
            out.pairs.extend(pairs_of(&unique));
        }
    }

    tracing::debug!(
        terms = out.frequencies.len(),
        pairs = out.pairs.len(),
        skipped = out.skipped.len(),
        "co-occurrence analysis complete"
    );
    out
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::DateTime;

    use super::*;
    use crate::error::{AnalysisError, AnalysisResult};
    use crate::tokenizer::HangulNounExtractor;

    fn doc(title: &str, body: &str) -> Document {
        Document::new(
            DateTime::parse_from_rfc3339("2025-07-01T10:00:00+09:00").unwrap(),
            title,
            body,
        )
    }

    fn no_stopwords() -> StopWordSet {
        // Non-empty base so the fallback list does not kick in.
        let base: HashSet<String> = ["__none__".to_string()].into_iter().collect();
        StopWordSet::build(&base, "", &HashSet::new())
    }

    fn pair(a: &str, b: &str) -> TermPair {
        TermPair::new(a, b).unwrap()
    }

    fn example_corpus() -> Vec<Document> {
        vec![
            doc("케이팝 데몬 헌터스 애니메이션", ""),
            doc("케이팝 애니메이션 영화", ""),
        ]
    }

    #[test]
    fn counts_and_pairs_for_two_documents() {
        let sw = no_stopwords();
        let out = analyze(&example_corpus(), &HangulNounExtractor::new(), &TermFilter::new(&sw, 2));

        assert_eq!(out.frequencies.get("케이팝"), 2);
        assert_eq!(out.frequencies.get("데몬"), 1);
        assert_eq!(out.frequencies.get("헌터스"), 1);
        assert_eq!(out.frequencies.get("애니메이션"), 2);
        assert_eq!(out.frequencies.get("영화"), 1);
        assert_eq!(out.frequencies.len(), 5);

        // C(4,2) + C(3,2)
        assert_eq!(out.pairs.len(), 9);
        let together = out
            .pairs
            .iter()
            .filter(|p| **p == pair("케이팝", "애니메이션"))
            .count();
        assert_eq!(together, 2);
    }

    #[test]
    fn pairs_are_canonically_ordered() {
        let sw = no_stopwords();
        let out = analyze(&example_corpus(), &HangulNounExtractor::new(), &TermFilter::new(&sw, 2));
        assert!(out.pairs.iter().all(|p| p.first < p.second));
    }

    #[test]
    fn repeated_terms_count_but_pair_once() {
        let sw = no_stopwords();
        let corpus = vec![doc("영화 영화 영화", "음악")];
        let out = analyze(&corpus, &HangulNounExtractor::new(), &TermFilter::new(&sw, 2));
        assert_eq!(out.frequencies.get("영화"), 3);
        assert_eq!(out.pairs, vec![pair("영화", "음악")]);
    }

    #[test]
    fn filtered_keys_respect_length_and_stopwords() {
        let base: HashSet<String> = ["영화".to_string()].into_iter().collect();
        let sw = StopWordSet::build(&base, "", &HashSet::new());
        let corpus = vec![doc("영화 음악 팬 공연", "")];
        let out = analyze(&corpus, &HangulNounExtractor::new(), &TermFilter::new(&sw, 2));
        for entry in out.frequencies.iter() {
            assert!(entry.term.chars().count() >= 2);
            assert!(!sw.contains(&entry.term));
        }
        assert_eq!(out.frequencies.get("팬"), 0);
        assert_eq!(out.frequencies.get("영화"), 0);
    }

    #[test]
    fn single_term_documents_emit_no_pairs() {
        let sw = no_stopwords();
        let corpus = vec![doc("영화", ""), doc("", "")];
        let out = analyze(&corpus, &HangulNounExtractor::new(), &TermFilter::new(&sw, 2));
        assert_eq!(out.frequencies.get("영화"), 1);
        assert!(out.pairs.is_empty());
    }

    #[test]
    fn empty_corpus_yields_empty_outputs() {
        let sw = no_stopwords();
        let out = analyze(&[], &HangulNounExtractor::new(), &TermFilter::new(&sw, 2));
        assert!(out.frequencies.is_empty());
        assert!(out.pairs.is_empty());
        assert!(out.skipped.is_empty());
    }

    #[test]
    fn analysis_is_deterministic() {
        let sw = no_stopwords();
        let corpus = vec![
            doc("헌터스 케이팝 애니메이션 데몬", "넷플릭스 순위"),
            doc("영화 케이팝", "애니메이션 음악"),
        ];
        let filter = TermFilter::new(&sw, 2);
        let a = analyze(&corpus, &HangulNounExtractor::new(), &filter);
        let b = analyze(&corpus, &HangulNounExtractor::new(), &filter);
        assert_eq!(a.frequencies, b.frequencies);
        assert_eq!(a.pairs, b.pairs);
    }

    #[test]
    fn adding_a_document_never_lowers_pair_counts() {
        let sw = no_stopwords();
        let filter = TermFilter::new(&sw, 2);
        let mut corpus = example_corpus();
        let before = analyze(&corpus, &HangulNounExtractor::new(), &filter);
        corpus.push(doc("케이팝 영화", ""));
        let after = analyze(&corpus, &HangulNounExtractor::new(), &filter);
        for p in &before.pairs {
            let b = before.pairs.iter().filter(|q| *q == p).count();
            let a = after.pairs.iter().filter(|q| *q == p).count();
            assert!(a >= b);
        }
    }

    struct FailsOn(&'static str);

    impl NounExtractor for FailsOn {
        fn nouns(&self, text: &str) -> AnalysisResult<Vec<String>> {
            if text.contains(self.0) {
                return Err(AnalysisError::Tokenizer {
                    message: "malformed input".to_string(),
                });
            }
            HangulNounExtractor::new().nouns(text)
        }

        fn name(&self) -> &'static str {
            "fails-on"
        }
    }

    #[test]
    fn extractor_failure_skips_only_that_document() {
        let sw = no_stopwords();
        let corpus = vec![doc("영화 음악", ""), doc("깨진 문서", ""), doc("영화 공연", "")];
        let out = analyze(&corpus, &FailsOn("깨진"), &TermFilter::new(&sw, 2));
        assert_eq!(out.skipped.len(), 1);
        assert_eq!(out.skipped[0].index, 1);
        assert_eq!(out.frequencies.get("영화"), 2);
        assert_eq!(out.frequencies.get("문서"), 0);
    }

    #[test]
    fn most_common_breaks_ties_by_insertion_order() {
        let mut table = FrequencyTable::new();
        table.extend(["케이팝", "데몬", "헌터스", "애니메이션", "케이팝", "애니메이션", "영화"]);
        let top: Vec<_> = table.most_common(2).into_iter().map(|t| t.term).collect();
        assert_eq!(top, vec!["케이팝", "애니메이션"]);
        assert_eq!(table.total(), 7);
    }

    #[test]
    fn pairs_of_emits_n_choose_two() {
        let terms: BTreeSet<&str> = ["a", "b", "c", "d", "e"].into_iter().collect();
        assert_eq!(pairs_of(&terms).len(), 10);
    }

    #[test]
    fn term_pair_rejects_identical_terms() {
        assert!(TermPair::new("영화", "영화").is_none());
        assert_eq!(pair("음악", "영화"), pair("영화", "음악"));
    }
}
