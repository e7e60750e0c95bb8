use serde::{Deserialize, Serialize};

use crate::error::ReconError;

/// Generic words and scale markers that never identify a drawing on their own.
pub const DEFAULT_GENERIC_TERMS: &[&str] = &["plan", "del", "sektion", "fasad", "1:50", "1:100"];

pub const DEFAULT_REPORT_NAME: &str = "ritningsförteckning_markering.xlsx";
pub const DEFAULT_UNMATCHED_NAME: &str = "omatchade_ritningar.xlsx";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatchConfig {
    /// Compare keys with whitespace and punctuation removed.
    #[serde(default)]
    pub strict_normalization: bool,
    /// Accept purely numeric codes (digit required, letter optional).
    #[serde(default)]
    pub use_loose_grammar: bool,
    #[serde(default = "default_true")]
    pub exclude_generic_terms: bool,
    /// Drop candidates starting with 2020..2029 (issue/revision dates).
    #[serde(default = "default_true")]
    pub exclude_year_prefix: bool,
    #[serde(default = "default_generic_terms")]
    pub generic_terms: Vec<String>,
    #[serde(default)]
    pub extraction_strategy: ExtractionStrategy,
    #[serde(default)]
    pub pdf: PdfOptions,
    #[serde(default)]
    pub spreadsheet: SpreadsheetOptions,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_true() -> bool {
    true
}

fn default_generic_terms() -> Vec<String> {
    DEFAULT_GENERIC_TERMS.iter().map(|t| t.to_string()).collect()
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            strict_normalization: false,
            use_loose_grammar: false,
            exclude_generic_terms: true,
            exclude_year_prefix: true,
            generic_terms: default_generic_terms(),
            extraction_strategy: ExtractionStrategy::default(),
            pdf: PdfOptions::default(),
            spreadsheet: SpreadsheetOptions::default(),
            output: OutputConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// How reference text is cut into candidate identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// One candidate per cell (spreadsheet / PDF table) or per text line.
    #[default]
    WholeCellOrLine,
    /// Every drawing-code-shaped token found inside cells and text.
    TokenScan,
}

impl std::fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WholeCellOrLine => write!(f, "whole_cell_or_line"),
            Self::TokenScan => write!(f, "token_scan"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PdfOptions {
    /// Look for column-aligned tables in the layout text before falling back to lines.
    #[serde(default = "default_true")]
    pub detect_tables: bool,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self { detect_tables: true }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SpreadsheetOptions {
    /// Sheet to read. First sheet when unset.
    #[serde(default)]
    pub sheet: Option<String>,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_report_name")]
    pub report: String,
    #[serde(default = "default_unmatched_name")]
    pub unmatched: String,
    #[serde(default)]
    pub json: Option<String>,
}

fn default_report_name() -> String {
    DEFAULT_REPORT_NAME.to_string()
}

fn default_unmatched_name() -> String {
    DEFAULT_UNMATCHED_NAME.to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report: default_report_name(),
            unmatched: default_unmatched_name(),
            json: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl MatchConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let mut config: MatchConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        config.generic_terms = config
            .generic_terms
            .iter()
            .map(|t| t.trim().to_lowercase())
            .collect();
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        for (i, term) in self.generic_terms.iter().enumerate() {
            if term.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "generic_terms[{i}] is empty (an empty term would exclude every candidate)"
                )));
            }
        }

        if self.output.report.trim().is_empty() {
            return Err(ReconError::ConfigValidation("output.report must not be empty".into()));
        }
        if self.output.unmatched.trim().is_empty() {
            return Err(ReconError::ConfigValidation("output.unmatched must not be empty".into()));
        }
        if self.output.report == self.output.unmatched {
            return Err(ReconError::ConfigValidation(format!(
                "output.report and output.unmatched both point to '{}'",
                self.output.report
            )));
        }

        if let Some(ref sheet) = self.spreadsheet.sheet {
            if sheet.trim().is_empty() {
                return Err(ReconError::ConfigValidation("spreadsheet.sheet must not be empty".into()));
            }
        }

        Ok(())
    }
}
