//! Keyword extraction for routing
//!
//! Metadata phrases and task texts are reduced to keyword lists. Tokens are
//! lower-cased and split on anything that is not alphanumeric, so Hangul and
//! Latin text tokenize the same way.

use lazy_static::lazy_static;
use regex::Regex;

const MIN_TOKEN_CHARS: usize = 2;
const MIN_ASCII_PREFIX_CHARS: usize = 4;
const MIN_WIDE_PREFIX_CHARS: usize = 2;

const STOPWORDS: &[&str] = &[
    "a", "about", "all", "an", "and", "any", "are", "as", "at", "be", "by", "can", "could", "do",
    "does", "for", "from", "has", "have", "how", "if", "in", "into", "is", "it", "its", "me",
    "my", "no", "not", "of", "on", "or", "our", "should", "so", "than", "that", "the", "their",
    "then", "there", "these", "this", "those", "to", "use", "using", "was", "we", "were", "what",
    "when", "where", "which", "who", "why", "will", "with", "would", "you", "your",
];

lazy_static! {
    static ref USE_HINT: Regex =
        Regex::new(r"(?i)\(\s*(?:use|delegate\s+to)\s+([a-z0-9][a-z0-9_-]*)[^()]*\)\s*$").unwrap();
    static ref KO_USE_HINT: Regex =
        Regex::new(r"\(\s*([A-Za-z0-9][A-Za-z0-9_-]*)(?:\s+에이전트)?\s+사용\s*\)\s*$").unwrap();
}

/// Lower-cased keywords of `text`, first occurrence order, no duplicates
pub fn tokenize(text: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for raw in text.split(|c: char| !c.is_alphanumeric()) {
        let token = raw.to_lowercase();
        if token.chars().count() < MIN_TOKEN_CHARS || STOPWORDS.contains(&token.as_str()) {
            continue;
        }
        if !out.contains(&token) {
            out.push(token);
        }
    }
    out
}

/// Whether two keywords refer to the same thing
///
/// Equal tokens match; otherwise the shorter must be a prefix of the longer
/// and long enough to be meaningful (`find`/`finding`, `성분`/`성분의`).
pub fn tokens_match(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if !long.starts_with(short) {
        return false;
    }
    let min = if short.is_ascii() {
        MIN_ASCII_PREFIX_CHARS
    } else {
        MIN_WIDE_PREFIX_CHARS
    };
    short.chars().count() >= min
}

/// Keywords of `keywords` that match any token of `task`
pub fn matched_keywords(keywords: &[String], task: &[String]) -> Vec<String> {
    keywords
        .iter()
        .filter(|k| task.iter().any(|t| tokens_match(k, t)))
        .cloned()
        .collect()
}

/// A metadata phrase split into keywords, with its redirect hint removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phrase {
    /// Phrase text without the redirect hint
    pub text: String,
    pub keywords: Vec<String>,
    /// Agent named by a trailing `(use X)`, `(delegate to X)` or `(X 사용)`
    pub redirect: Option<String>,
}

impl Phrase {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let (text, redirect) = match USE_HINT.captures(raw).or_else(|| KO_USE_HINT.captures(raw)) {
            Some(caps) => {
                // Group 0 always exists for a match.
                let start = caps.get(0).map_or(raw.len(), |m| m.start());
                (raw[..start].trim_end(), Some(caps[1].to_lowercase()))
            }
            None => (raw, None),
        };

        Self {
            text: text.to_string(),
            keywords: tokenize(text),
            redirect,
        }
    }

    /// Whether the hint points away from the agent known by `name`/`alias`
    pub fn redirects_away_from(&self, name: &str, alias: Option<&str>) -> bool {
        match &self.redirect {
            None => false,
            Some(target) => {
                !target.eq_ignore_ascii_case(name)
                    && !alias.is_some_and(|a| target.eq_ignore_ascii_case(a))
            }
        }
    }

    pub fn matches(&self, task: &[String]) -> Vec<String> {
        matched_keywords(&self.keywords, task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_drops_stopwords_and_short_tokens() {
        assert_eq!(
            tokenize("What's the EWG rating for Retinol?"),
            vec!["ewg", "rating", "retinol"]
        );
        assert_eq!(
            tokenize("find internal function implementation"),
            vec!["find", "internal", "function", "implementation"]
        );
    }

    #[test]
    fn tokenize_keeps_hangul() {
        assert_eq!(
            tokenize("EWG 등급, CIR 평가"),
            vec!["ewg", "등급", "cir", "평가"]
        );
        assert_eq!(tokenize("JSON/CSV 성분 성분"), vec!["json", "csv", "성분"]);
    }

    #[test]
    fn prefix_matching_needs_enough_characters() {
        assert!(tokens_match("find", "finding"));
        assert!(tokens_match("implementations", "implementation"));
        assert!(tokens_match("rating", "ratings"));
        assert!(!tokens_match("db", "dba"));
        assert!(!tokens_match("api", "apis"));
        assert!(tokens_match("성분", "성분의"));
        assert!(!tokens_match("function", "formulation"));
    }

    #[test]
    fn phrase_strips_english_hint() {
        let phrase = Phrase::parse("External documentation lookup (use librarian)");
        assert_eq!(phrase.text, "External documentation lookup");
        assert_eq!(phrase.keywords, vec!["external", "documentation", "lookup"]);
        assert_eq!(phrase.redirect.as_deref(), Some("librarian"));

        let delegated = Phrase::parse("EWG, CIR data (delegate to safety-oracle)");
        assert_eq!(delegated.redirect.as_deref(), Some("safety-oracle"));
        assert_eq!(delegated.keywords, vec!["ewg", "cir", "data"]);
    }

    #[test]
    fn phrase_strips_korean_hint() {
        let phrase = Phrase::parse("안전성 분석 필요 (safety-oracle 사용)");
        assert_eq!(phrase.text, "안전성 분석 필요");
        assert_eq!(phrase.redirect.as_deref(), Some("safety-oracle"));

        let generic = Phrase::parse("복잡한 다중 조건 검색 (oracle 에이전트 사용)");
        assert_eq!(generic.redirect.as_deref(), Some("oracle"));
    }

    #[test]
    fn parenthetical_without_hint_is_kept() {
        let phrase = Phrase::parse("Locating skill definitions (SKILL.md)");
        assert!(phrase.redirect.is_none());
        assert_eq!(phrase.keywords, vec!["locating", "skill", "definitions", "md"]);
    }

    #[test]
    fn redirect_direction() {
        let phrase = Phrase::parse("CosIng lookup (delegate to cosmetic-librarian)");
        assert!(phrase.redirects_away_from("librarian", Some("Librarian")));
        assert!(!phrase.redirects_away_from("cosmetic-librarian", None));
        assert!(!Phrase::parse("plain").redirects_away_from("librarian", None));
    }
}
