//! Identifier normalization.
//!
//! Every string that takes part in matching goes through [`normalize`].
//! The loose form keeps separators (`a-1-100`) and is what the pattern filter
//! and the report see; the strict form drops everything but `[a-z0-9]`
//! (`a1100`) and is only used as a comparison key.

use crate::model::{CanonicalKey, CellValue};

/// File extensions stripped from the end of an identifier.
const EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "xls", "xlsx", "txt", "jpg", "png", "csv"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeMode {
    Loose,
    Strict,
}

impl NormalizeMode {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            Self::Strict
        } else {
            Self::Loose
        }
    }
}

/// Canonicalize `raw` into a comparison key.
pub fn normalize(raw: &str, mode: NormalizeMode) -> CanonicalKey {
    let loose = display_form(raw);
    match mode {
        NormalizeMode::Loose => CanonicalKey::new(loose),
        NormalizeMode::Strict => {
            CanonicalKey::new(loose.chars().filter(|c| c.is_ascii_alphanumeric()).collect())
        }
    }
}

/// Normalize a spreadsheet cell through its textual coercion.
pub fn normalize_cell(cell: &CellValue, mode: NormalizeMode) -> CanonicalKey {
    normalize(&cell.as_text(), mode)
}

/// Trimmed, lower-cased, extension-stripped text with separators intact.
///
/// Stripping repeats until nothing changes, so `"A.pdf.PDF"` and `"a .pdf"`
/// both become `"a"`.
pub fn display_form(raw: &str) -> String {
    let mut s = raw.trim().to_lowercase();
    while let Some(stem) = strip_extension(&s) {
        s = stem.trim().to_string();
    }
    s
}

fn strip_extension(s: &str) -> Option<&str> {
    let (stem, ext) = s.rsplit_once('.')?;
    if EXTENSIONS.contains(&ext) {
        Some(stem)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loose(s: &str) -> String {
        normalize(s, NormalizeMode::Loose).as_str().to_string()
    }

    fn strict(s: &str) -> String {
        normalize(s, NormalizeMode::Strict).as_str().to_string()
    }

    #[test]
    fn extension_is_stripped_case_insensitively() {
        assert_eq!(loose("Drawing-A1-100.PDF"), loose("drawing-a1-100"));
        assert_eq!(loose("K-10-01.docx"), "k-10-01");
        assert_eq!(loose("K-10-01.Xls"), "k-10-01");
        assert_eq!(loose("photo.jpg"), "photo");
    }

    #[test]
    fn unknown_extension_is_kept() {
        assert_eq!(loose("a-1-100.dwg"), "a-1-100.dwg");
        assert_eq!(loose("w_50.1_1_0100"), "w_50.1_1_0100");
    }

    #[test]
    fn extension_needs_a_dot() {
        assert_eq!(loose("plan-pdf"), "plan-pdf");
        assert_eq!(loose("apdf"), "apdf");
    }

    #[test]
    fn trims_and_lowercases() {
        assert_eq!(loose("  A-1-100 "), loose("a-1-100"));
        assert_eq!(loose("\tÅTGÄRD-1-2\n"), "åtgärd-1-2");
    }

    #[test]
    fn stacked_extensions_are_all_removed() {
        assert_eq!(loose("A-1-100.pdf.PDF"), "a-1-100");
        assert_eq!(loose("a-1-100 .pdf"), "a-1-100");
    }

    #[test]
    fn strict_keeps_only_ascii_alphanumerics() {
        assert_eq!(strict(" A - 1_100.pdf "), "a1100");
        assert_eq!(strict("W_50.1_1_0100"), "w50110100");
        assert_eq!(strict("Åtgärd 1"), "tgrd1");
    }

    #[test]
    fn empty_input() {
        assert_eq!(loose(""), "");
        assert_eq!(strict("   "), "");
        assert_eq!(loose(".pdf"), "");
    }

    #[test]
    fn numbers_go_through_text_coercion() {
        let key = normalize_cell(&CellValue::Number(1234.0), NormalizeMode::Loose);
        assert_eq!(key.as_str(), "1234");
        let key = normalize_cell(&CellValue::Empty, NormalizeMode::Strict);
        assert!(key.is_empty());
    }

    #[test]
    fn idempotent_on_samples() {
        for s in ["A.PDF.pdf", " x .csv ", "ä-Ö_1.txt", "a b c", "1:50", ".pdf.pdf"] {
            for mode in [NormalizeMode::Loose, NormalizeMode::Strict] {
                let once = normalize(s, mode);
                assert_eq!(normalize(once.as_str(), mode), once, "input {s:?}");
            }
        }
    }
}
