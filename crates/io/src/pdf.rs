// PDF reference import via `pdftotext -layout`
//
// Pages are split on form feeds. Tables are recovered from the layout text:
// a table starts at a line that breaks into two or more columns on gaps of at
// least two spaces and needs two such lines to count. Once open, a
// single-column line (a row with empty trailing cells) stays in the table
// unless a blank line came before it. Blank lines may sit between wide rows.

use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

use drawcheck_recon::config::PdfOptions;
use drawcheck_recon::extract::pages_without_text;
use drawcheck_recon::model::{PdfDocument, PdfPage, Table};
use drawcheck_recon::ReconError;

/// Read a reference PDF into pages of text and detected tables.
///
/// A PDF without a text layer is not an error: it yields pages with no text
/// and no tables, and therefore no candidates.
pub fn import_pdf(path: &Path, options: &PdfOptions) -> Result<PdfDocument, ReconError> {
    let text = run_pdftotext(path)?;
    let doc = parse_layout(&text, options.detect_tables);

    let blank = pages_without_text(&doc);
    if blank == doc.pages.len() {
        warn!(path = %path.display(), "PDF has no extractable text (scanned or image-only?)");
    } else if blank > 0 {
        debug!(path = %path.display(), blank, "pages without text");
    }
    debug!(
        path = %path.display(),
        pages = doc.pages.len(),
        tables = doc.pages.iter().map(|p| p.tables.len()).sum::<usize>(),
        "parsed PDF layout"
    );

    Ok(doc)
}

/// Run `pdftotext -layout <file> -` and capture stdout.
fn run_pdftotext(file: &Path) -> Result<String, ReconError> {
    let source = file.display().to_string();

    // Check that pdftotext exists
    which::which("pdftotext").map_err(|_| {
        ReconError::extraction(
            &source,
            "pdftotext not installed (poppler-utils); install with: apt install poppler-utils / brew install poppler",
        )
    })?;

    let output = Command::new("pdftotext")
        .arg("-layout")
        .arg(file)
        .arg("-")
        .output()
        .map_err(|e| ReconError::extraction(&source, format!("failed to run pdftotext: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ReconError::extraction(
            &source,
            format!(
                "pdftotext failed (exit {}): {}",
                output.status.code().unwrap_or(-1),
                stderr.trim(),
            ),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Split pdftotext layout output into pages and detect tables on each page.
pub fn parse_layout(text: &str, detect_tables: bool) -> PdfDocument {
    let mut pages: Vec<&str> = text.split('\x0c').collect();

    // pdftotext terminates every page with a form feed; drop the empty tail
    if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
        pages.pop();
    }

    let pages = pages
        .into_iter()
        .map(|page| PdfPage {
            tables: if detect_tables { find_tables(page) } else { Vec::new() },
            text: if page.trim().is_empty() { None } else { Some(page.to_string()) },
        })
        .collect();

    PdfDocument { pages }
}

fn column_gap() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r" {2,}|\t+").expect("valid column gap pattern"))
}

/// Break a layout line into cells on runs of two or more spaces.
pub fn split_columns(line: &str) -> Vec<String> {
    column_gap()
        .split(line.trim())
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

fn find_tables(page: &str) -> Vec<Table> {
    let mut tables = Vec::new();
    let mut current = OpenTable::default();
    let mut after_blank = false;

    for line in page.lines() {
        if line.trim().is_empty() {
            after_blank = !current.rows.is_empty();
            continue;
        }
        let cells = split_columns(line);
        if cells.len() >= 2 {
            current.rows.push(cells.into_iter().map(Some).collect());
            current.wide_rows += 1;
        } else if !current.rows.is_empty() && !after_blank {
            let width = current.rows[0].len();
            let mut row: Vec<Option<String>> = cells.into_iter().map(Some).collect();
            row.resize(width, None);
            current.rows.push(row);
        } else {
            close_table(&mut current, &mut tables);
        }
        after_blank = false;
    }
    close_table(&mut current, &mut tables);

    tables
}

#[derive(Default)]
struct OpenTable {
    rows: Table,
    wide_rows: usize,
}

fn close_table(current: &mut OpenTable, tables: &mut Vec<Table>) {
    let open = std::mem::take(current);
    if open.wide_rows >= 2 {
        tables.push(open.rows);
    }
}
