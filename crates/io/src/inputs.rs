// Input collection: reference dispatch by extension and PDF file gathering

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use drawcheck_recon::model::{PdfFile, ReconInput, ReferenceSource};
use drawcheck_recon::{MatchConfig, ReconError};

use crate::{pdf, xlsx};

/// Spreadsheet extensions calamine can open.
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "xlsb", "ods"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Spreadsheet,
    Pdf,
}

/// Decide how to read a reference file from its extension (case-insensitive).
pub fn reference_kind(path: &Path) -> Result<ReferenceKind, ReconError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("pdf") => Ok(ReferenceKind::Pdf),
        Some(ext) if SPREADSHEET_EXTENSIONS.contains(&ext) => Ok(ReferenceKind::Spreadsheet),
        _ => Err(ReconError::UnsupportedReferenceFormat {
            path: path.display().to_string(),
            extension: extension.unwrap_or_default(),
        }),
    }
}

/// Load the reference document into memory.
pub fn load_reference(path: &Path, config: &MatchConfig) -> Result<ReferenceSource, ReconError> {
    match reference_kind(path)? {
        ReferenceKind::Spreadsheet => {
            let grid = xlsx::import_grid(path, config.spreadsheet.sheet.as_deref())?;
            Ok(ReferenceSource::Spreadsheet(grid))
        }
        ReferenceKind::Pdf => {
            let doc = pdf::import_pdf(path, &config.pdf)?;
            Ok(ReferenceSource::Pdf(doc))
        }
    }
}

/// Gather PDF filenames from files and directories.
///
/// Directories are scanned one level deep for `*.pdf` (any case), sorted by
/// name. Explicitly named files are taken as given, with a warning when the
/// extension is not `.pdf`. File contents are never read.
pub fn collect_pdf_files(paths: &[PathBuf]) -> Result<Vec<PdfFile>, ReconError> {
    let mut files = Vec::new();

    for path in paths {
        let meta = std::fs::metadata(path).map_err(|e| io_err(path, e))?;

        if meta.is_dir() {
            let mut names: Vec<String> = Vec::new();
            for entry in std::fs::read_dir(path).map_err(|e| io_err(path, e))? {
                let entry = entry.map_err(|e| io_err(path, e))?;
                if !entry.file_type().map_err(|e| io_err(path, e))?.is_file() {
                    continue;
                }
                let name = entry.file_name().to_string_lossy().to_string();
                if has_pdf_extension(&name) {
                    names.push(name);
                }
            }
            names.sort();
            debug!(dir = %path.display(), count = names.len(), "scanned PDF directory");
            files.extend(names.into_iter().map(PdfFile::new));
        } else {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());
            if !has_pdf_extension(&name) {
                warn!(file = %name, "not a .pdf file, including anyway");
            }
            files.push(PdfFile::new(name));
        }
    }

    Ok(files)
}

fn io_err(path: &Path, e: std::io::Error) -> ReconError {
    ReconError::Io(format!("{}: {}", path.display(), e))
}

fn has_pdf_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Build the engine input from a reference path and PDF paths.
pub fn load_input(
    reference: &Path,
    pdf_paths: &[PathBuf],
    config: &MatchConfig,
) -> Result<ReconInput, ReconError> {
    let pdf_files = collect_pdf_files(pdf_paths)?;
    let source = load_reference(reference, config)?;

    let reference_label = reference
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| reference.display().to_string());

    Ok(ReconInput { pdf_files, reference: source, reference_label })
}
