//! Noun extraction.
//!
//! The pipeline only needs one capability from a morphological analyzer:
//! "give me the nouns in this text, in order". [`NounExtractor`] is that
//! seam; [`HangulNounExtractor`] is the built-in rule-based implementation.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::AnalysisResult;

/// Extracts noun tokens from a span of text.
///
/// Implementations must be pure: the same text always yields the same tokens
/// in source order. Empty or whitespace-only input yields no tokens. Failures
/// are returned to the caller, which decides whether to skip the text unit.
pub trait NounExtractor: Send + Sync {
    /// Nouns in `text`, in the order they appear.
    fn nouns(&self, text: &str) -> AnalysisResult<Vec<String>>;

    /// Short identifier for logs.
    fn name(&self) -> &'static str;
}

/// Runs of Hangul syllables or Latin letters. Digits and punctuation split words.
static WORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[가-힣]+|[A-Za-z]+").expect("valid regex"));

/// Postpositions stripped from the end of a word, longest first.
const JOSA: &[&str] = &[
    "에서는", "에게서", "으로서", "으로써", "으로는", "이라는", "이라고", "까지는", "에서도",
    "부터는", "에게는", "에서", "에게", "한테", "으로", "부터", "까지", "처럼", "보다", "이나",
    "이며", "과의", "와의", "라는", "마저", "조차", "밖에", "에는", "에도", "은", "는", "이",
    "가", "을", "를", "에", "의", "와", "과", "도", "만", "로",
];

/// Nouns whose final syllables look like a postposition but belong to the
/// word. A word ending in any of these is kept whole; compounds such as
/// "재평가" or "고속도로" are covered by their last element.
const NOUN_LEXICON: &[&str] = &[
    // -이
    "고양이", "호랑이", "원숭이", "어린이", "아이", "나이", "사이", "차이", "높이", "길이",
    "넓이", "놀이", "먹이", "종이", "오이", "페이", "플레이", "데이", "레이", "웨이", "하와이",
    "상하이", "두바이", "뭄바이", "말레이", "우루과이", "파라과이",
    // -가
    "전문가", "예술가", "작곡가", "작가", "평론가", "사업가", "정치가", "소설가", "건축가",
    "음악가", "평가", "국가", "물가", "주가", "원가", "단가", "시가", "대가", "휴가", "증가",
    "추가", "참가", "허가", "인가", "부가", "고가", "저가", "정가", "요가",
    // -도
    "정도", "제도", "태도", "속도", "온도", "강도", "밀도", "빈도", "각도", "한도", "의도",
    "시도", "지도", "보도", "인도", "경기도", "충청도", "전라도", "경상도", "강원도", "제주도",
    "독도", "반도", "포도", "복도", "고도",
    // -로
    "도로", "경로", "통로", "진로", "항로", "회로", "선로", "수로", "활주로", "대로", "프로",
    "유로", "제로", "히어로",
    // -과
    "결과", "효과", "성과", "사과", "학과", "부과", "통과", "초과",
    // -의
    "주의", "회의", "합의", "협의", "논의", "동의", "정의", "의의", "강의", "건의", "문의",
    "제의", "결의", "심의", "모의", "질의", "항의",
    // -만, -을, -이나
    "불만", "비만", "미만", "백만", "천만", "마을", "가을", "우크라이나", "차이나",
];

/// Conjugated predicate endings; words ending in these are verbs or adjectives.
const PREDICATE_ENDINGS: &[&str] = &[
    "습니다", "합니다", "입니다", "했다", "한다", "된다", "됐다", "있다", "없다", "이다", "였다",
    "었다", "았다", "겠다", "였고", "했고", "하고", "하며", "되며", "하는", "되는", "있는", "없는",
    "했던", "하던", "해서", "하여", "되어", "하면", "이면", "라며", "라고",
];

/// Adverbs, conjunctions, and determiners that survive the rules above.
const NON_NOUNS: &[&str] = &[
    "그리고", "하지만", "그러나", "또한", "또는", "및", "더", "가장", "매우", "아주", "이미",
    "다시", "함께", "바로", "모두", "특히", "이번", "지난", "같은", "이런", "그런", "위해",
    "대한", "따라", "따르면",
];

/// Rule-based Korean noun extractor.
///
/// Splits text into Hangul and Latin words, strips one trailing postposition
/// (and a plural `들`) when at least two syllables remain, and discards
/// predicates and function words. Words ending in a known noun, from the
/// built-in lexicon or from [`with_nouns`](Self::with_nouns), are never cut.
/// It is a heuristic: compound splitting and true part-of-speech tagging need
/// a dictionary-backed analyzer plugged in through [`NounExtractor`].
#[derive(Debug, Clone)]
pub struct HangulNounExtractor {
    include_latin: bool,
    user_nouns: BTreeSet<String>,
}

impl Default for HangulNounExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl HangulNounExtractor {
    /// Create an extractor that keeps Latin-script words (brand names, acronyms).
    pub const fn new() -> Self {
        Self {
            include_latin: true,
            user_nouns: BTreeSet::new(),
        }
    }

    /// Set whether Latin-script words count as nouns.
    #[must_use]
    pub fn with_latin(mut self, include: bool) -> Self {
        self.include_latin = include;
        self
    }

    /// Add nouns to protect from postposition stripping, on top of the
    /// built-in lexicon. Blank entries are ignored.
    #[must_use]
    pub fn with_nouns<I, S>(mut self, nouns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.user_nouns.extend(
            nouns
                .into_iter()
                .map(|n| n.as_ref().trim().to_string())
                .filter(|n| !n.is_empty()),
        );
        self
    }

    fn is_known_noun(&self, word: &str) -> bool {
        NOUN_LEXICON.iter().any(|n| word.ends_with(n))
            || self.user_nouns.iter().any(|n| word.ends_with(n.as_str()))
    }

    fn noun_from_word(&self, word: &str) -> Option<String> {
        if word.is_ascii() {
            return self.include_latin.then(|| word.to_string());
        }

        if NON_NOUNS.contains(&word) || PREDICATE_ENDINGS.iter().any(|e| word.ends_with(e)) {
            return None;
        }

        let stem = if self.is_known_noun(word) {
            word
        } else {
            strip_josa(word)
        };
        let stem = strip_suffix_keeping(stem, "들", 1);
        if NON_NOUNS.contains(&stem) {
            return None;
        }
        Some(stem.to_string())
    }
}

impl NounExtractor for HangulNounExtractor {
    fn nouns(&self, text: &str) -> AnalysisResult<Vec<String>> {
        Ok(WORD_PATTERN
            .find_iter(text)
            .filter_map(|m| self.noun_from_word(m.as_str()))
            .collect())
    }

    fn name(&self) -> &'static str {
        "hangul-rules"
    }
}

fn strip_josa(word: &str) -> &str {
    JOSA.iter()
        .find_map(|josa| {
            let stem = strip_suffix_keeping(word, josa, 2);
            (stem.len() < word.len()).then_some(stem)
        })
        .unwrap_or(word)
}

/// Remove `suffix` only if at least `min_chars` characters remain.
fn strip_suffix_keeping<'a>(word: &'a str, suffix: &str, min_chars: usize) -> &'a str {
    match word.strip_suffix(suffix) {
        Some(stem) if stem.chars().count() >= min_chars => stem,
        _ => word,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nouns(text: &str) -> Vec<String> {
        HangulNounExtractor::new().nouns(text).unwrap()
    }

    #[test]
    fn plain_nouns_pass_through_in_order() {
        assert_eq!(
            nouns("케이팝 데몬 헌터스 애니메이션"),
            vec!["케이팝", "데몬", "헌터스", "애니메이션"]
        );
    }

    #[test]
    fn empty_and_whitespace_yield_nothing() {
        assert!(nouns("").is_empty());
        assert!(nouns("   \n\t ").is_empty());
    }

    #[test]
    fn strips_postpositions() {
        assert_eq!(nouns("케이팝이 인기를 끌었다"), vec!["케이팝", "인기"]);
        assert_eq!(nouns("넷플릭스에서 애니메이션의 인기"), vec!["넷플릭스", "애니메이션", "인기"]);
    }

    #[test]
    fn short_stems_are_not_stripped() {
        // "회의" and "국가" would lose a real syllable.
        assert_eq!(nouns("회의 국가"), vec!["회의", "국가"]);
    }

    #[test]
    fn protected_endings_survive() {
        assert_eq!(nouns("전문가 민주주의"), vec!["전문가", "민주주의"]);
    }

    #[test]
    fn nouns_ending_like_postpositions_stay_whole() {
        assert_eq!(
            nouns("고양이 호랑이 원숭이 재평가 삼성페이 고속도로"),
            vec!["고양이", "호랑이", "원숭이", "재평가", "삼성페이", "고속도로"]
        );
    }

    #[test]
    fn postpositions_after_lexicon_nouns_are_stripped() {
        assert_eq!(
            nouns("고양이가 고속도로에서 재평가를 삼성페이로"),
            vec!["고양이", "고속도로", "재평가", "삼성페이"]
        );
    }

    #[test]
    fn user_nouns_extend_the_lexicon() {
        assert_eq!(nouns("거북이"), vec!["거북"]);
        let extractor = HangulNounExtractor::new().with_nouns(["거북이", "  "]);
        assert_eq!(extractor.nouns("거북이가 거북이").unwrap(), vec!["거북이", "거북이"]);
    }

    #[test]
    fn plural_marker_removed() {
        assert_eq!(nouns("팬들이 환호"), vec!["팬", "환호"]);
    }

    #[test]
    fn predicates_and_function_words_dropped() {
        assert_eq!(nouns("그리고 발표했다 있는 음악"), vec!["음악"]);
    }

    #[test]
    fn digits_split_words() {
        assert_eq!(nouns("2025년 7월"), vec!["년", "월"]);
    }

    #[test]
    fn latin_words_are_optional() {
        assert_eq!(nouns("BTS 공연"), vec!["BTS", "공연"]);
        let hangul_only = HangulNounExtractor::new().with_latin(false);
        assert_eq!(hangul_only.nouns("BTS 공연").unwrap(), vec!["공연"]);
    }

    #[test]
    fn extraction_is_deterministic() {
        let text = "케이팝 데몬 헌터스가 넷플릭스 영화 순위 1위를 기록했다";
        assert_eq!(nouns(text), nouns(text));
    }
}
