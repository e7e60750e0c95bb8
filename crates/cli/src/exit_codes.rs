//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: scripts rely on them.
//!
//! | Code | Meaning                                                  |
//! |------|----------------------------------------------------------|
//! | 0    | Success                                                  |
//! | 1    | General error (unspecified)                              |
//! | 2    | Usage error (bad args, missing input path)               |
//! | 3    | Config file unreadable, unparsable or invalid            |
//! | 4    | Reference file is not a supported spreadsheet or PDF     |
//! | 5    | Reference could not be extracted (pdftotext, calamine)   |
//! | 6    | Report, unmatched list or JSON could not be written      |
//! | 7    | Unmatched entries present (`check --strict-exit` only)   |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into `CliError::from(ReconError)` or the command itself

use drawcheck_recon::ReconError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
#[allow(dead_code)]
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing input files or directories.
pub const EXIT_USAGE: u8 = 2;

/// Config file could not be read, parsed or validated.
pub const EXIT_CONFIG: u8 = 3;

/// Reference extension is not xlsx/xlsm/xls/xlsb/ods/pdf.
pub const EXIT_UNSUPPORTED_FORMAT: u8 = 4;

/// Reference document could not be read.
pub const EXIT_EXTRACTION: u8 = 5;

/// An output file could not be written.
pub const EXIT_REPORT_WRITE: u8 = 6;

/// `check --strict-exit` found unmatched reference entries or PDFs.
pub const EXIT_UNMATCHED: u8 = 7;

/// Map an engine/IO error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_CONFIG,
        ReconError::UnsupportedReferenceFormat { .. } => EXIT_UNSUPPORTED_FORMAT,
        ReconError::ExtractionFailure { .. } => EXIT_EXTRACTION,
        ReconError::ReportWrite { .. } => EXIT_REPORT_WRITE,
        ReconError::Io(_) => EXIT_USAGE,
    }
}
