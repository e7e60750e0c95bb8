use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::ExtractionStrategy;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A spreadsheet cell as read from the reference workbook.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    /// Textual form used by the normalizer. Integral numbers print without decimals.
    pub fn as_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.clone(),
            Self::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Number(_) => false,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// Row-major grid of cells; no header row is assumed.
pub type Grid = Vec<Vec<CellValue>>;

/// A table found on a PDF page. `None` marks a cell the extractor saw as empty.
pub type Table = Vec<Vec<Option<String>>>;

#[derive(Debug, Clone, Default)]
pub struct PdfPage {
    pub tables: Vec<Table>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PdfDocument {
    pub pages: Vec<PdfPage>,
}

impl PdfDocument {
    /// True if any page carries at least one table.
    pub fn has_tables(&self) -> bool {
        self.pages.iter().any(|p| !p.tables.is_empty())
    }
}

#[derive(Debug, Clone)]
pub enum ReferenceSource {
    Spreadsheet(Grid),
    Pdf(PdfDocument),
}

/// An uploaded drawing. Only the filename takes part in matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfFile {
    pub name: String,
}

impl PdfFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Everything one reconciliation run needs. Built fresh per batch.
#[derive(Debug, Clone)]
pub struct ReconInput {
    pub pdf_files: Vec<PdfFile>,
    pub reference: ReferenceSource,
    /// Display name of the reference source (usually its filename).
    pub reference_label: String,
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    PdfFilename,
    ReferenceCell,
}

/// Where a raw identifier was found. Indices are zero-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Location {
    File { index: usize },
    Cell { row: usize, col: usize },
    TableCell { page: usize, table: usize, row: usize, col: usize },
    Line { page: usize, line: usize },
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File { index } => write!(f, "file #{}", index + 1),
            Self::Cell { row, col } => write!(f, "row {} col {}", row + 1, col + 1),
            Self::TableCell { page, table, row, col } => write!(
                f,
                "page {} table {} row {} col {}",
                page + 1,
                table + 1,
                row + 1,
                col + 1
            ),
            Self::Line { page, line } => write!(f, "page {} line {}", page + 1, line + 1),
        }
    }
}

/// A string taken verbatim from a source, before normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawIdentifier {
    pub origin: Origin,
    pub text: String,
    pub location: Location,
}

// ---------------------------------------------------------------------------
// Normalization + filtering
// ---------------------------------------------------------------------------

/// Normalized, comparable form of an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    pub(crate) fn new(s: String) -> Self {
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    Grammar,
    YearPrefix,
    GenericTerm(String),
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Grammar => write!(f, "not a drawing code"),
            Self::YearPrefix => write!(f, "starts with a 202x year"),
            Self::GenericTerm(term) => write!(f, "contains generic term '{term}'"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DrawingCodeCandidate {
    pub raw: RawIdentifier,
    /// Lower-cased, extension-stripped text with separators intact.
    pub display: String,
    pub key: CanonicalKey,
    pub rejection: Option<Rejection>,
}

impl DrawingCodeCandidate {
    pub fn accepted(&self) -> bool {
        self.rejection.is_none()
    }
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

/// Set partition produced by [`crate::matcher::reconcile`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub matched: BTreeSet<CanonicalKey>,
    pub unmatched_reference: BTreeSet<CanonicalKey>,
    pub unmatched_pdf: BTreeSet<CanonicalKey>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Matched,
    Unmatched,
}

impl MatchStatus {
    /// Label written into the report's status column.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Matched => "Matchad",
            Self::Unmatched => "Ej matchad",
        }
    }
}

/// One distinct key with every raw string that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct KeyedEntry {
    pub key: CanonicalKey,
    pub display: String,
    /// First-seen position within its side (reference order or upload order).
    pub position: usize,
    pub sources: Vec<RawIdentifier>,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    pub candidates: usize,
    pub accepted: usize,
    pub rejected_grammar: usize,
    pub rejected_year_prefix: usize,
    pub rejected_generic_term: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconSummary {
    pub pdf_files: usize,
    pub pdf_keys: usize,
    pub reference_keys: usize,
    pub matched: usize,
    pub unmatched_reference: usize,
    pub unmatched_pdf: usize,
    pub duplicate_pdfs: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub reference: String,
    pub strategy: ExtractionStrategy,
    pub strict_normalization: bool,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub filter: FilterStats,
    pub matched: Vec<KeyedEntry>,
    pub unmatched_reference: Vec<KeyedEntry>,
    pub unmatched_pdf: Vec<KeyedEntry>,
    /// PDF keys produced by more than one uploaded file.
    pub duplicate_pdfs: Vec<KeyedEntry>,
}

impl ReconResult {
    /// Every accepted reference entry in first-seen order with its status.
    pub fn reference_rows(&self) -> Vec<(&KeyedEntry, MatchStatus)> {
        let mut rows: Vec<(&KeyedEntry, MatchStatus)> = self
            .matched
            .iter()
            .map(|e| (e, MatchStatus::Matched))
            .chain(self.unmatched_reference.iter().map(|e| (e, MatchStatus::Unmatched)))
            .collect();
        rows.sort_by_key(|(e, _)| e.position);
        rows
    }

    pub fn is_fully_matched(&self) -> bool {
        self.unmatched_reference.is_empty() && self.unmatched_pdf.is_empty()
    }
}
