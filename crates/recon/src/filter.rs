//! Drawing-code grammar and noise exclusion for reference-side candidates.

use std::sync::OnceLock;

use regex::Regex;

use crate::config::MatchConfig;
use crate::model::Rejection;

/// Three or more `-`/`_`-delimited alphanumeric segments. A segment may carry
/// interior dots (`50.1`).
const CODE_PATTERN: &str =
    r"^[a-z0-9]+(?:\.[a-z0-9]+)*(?:[-_][a-z0-9]+(?:\.[a-z0-9]+)*){2,}$";

/// Same shape, unanchored, for scanning running text.
const TOKEN_PATTERN: &str =
    r"[A-Za-z0-9]+(?:\.[A-Za-z0-9]+)*(?:[-_][A-Za-z0-9]+(?:\.[A-Za-z0-9]+)*){2,}";

fn code_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!("(?i){CODE_PATTERN}")).expect("valid code pattern"))
}

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(TOKEN_PATTERN).expect("valid token pattern"))
}

/// Grammar test on a lower-cased candidate with separators intact.
///
/// Strict grammar needs a letter and a digit; loose grammar only a digit.
pub fn is_drawing_code(candidate: &str, loose: bool) -> bool {
    let has_digit = candidate.chars().any(|c| c.is_ascii_digit());
    let has_letter = candidate.chars().any(|c| c.is_ascii_alphabetic());
    has_digit && (loose || has_letter) && code_regex().is_match(candidate)
}

/// `^202\d`: issue and revision dates in the 2020s.
pub fn starts_with_year(candidate: &str) -> bool {
    let b = candidate.as_bytes();
    b.len() >= 4 && &b[..3] == b"202" && b[3].is_ascii_digit()
}

/// Every drawing-code-shaped token inside `text`, in order of appearance.
pub fn find_tokens(text: &str) -> impl Iterator<Item = &str> {
    token_regex().find_iter(text).map(|m| m.as_str())
}

#[derive(Debug, Clone)]
pub struct PatternFilter {
    loose_grammar: bool,
    exclude_year_prefix: bool,
    generic_terms: Vec<String>,
}

impl PatternFilter {
    pub fn from_config(config: &MatchConfig) -> Self {
        let generic_terms = if config.exclude_generic_terms {
            config.generic_terms.iter().map(|t| t.trim().to_lowercase()).collect()
        } else {
            Vec::new()
        };
        Self {
            loose_grammar: config.use_loose_grammar,
            exclude_year_prefix: config.exclude_year_prefix,
            generic_terms,
        }
    }

    /// Why `display` is not a usable reference entry, or `None` if it is.
    pub fn check(&self, display: &str) -> Option<Rejection> {
        if !is_drawing_code(display, self.loose_grammar) {
            return Some(Rejection::Grammar);
        }
        if self.exclude_year_prefix && starts_with_year(display) {
            return Some(Rejection::YearPrefix);
        }
        self.generic_terms
            .iter()
            .find(|term| display.contains(term.as_str()))
            .map(|term| Rejection::GenericTerm(term.clone()))
    }

    pub fn accepts(&self, display: &str) -> bool {
        self.check(display).is_none()
    }
}

impl Default for PatternFilter {
    fn default() -> Self {
        Self::from_config(&MatchConfig::default())
    }
}
