// Excel file import (xlsx, xlsm, xls, xlsb, ods) and report export (xlsx only)
//
// Import: the reference sheet is read as a plain grid of cell values, no header.
// Export: the highlighted drawing list and the unmatched-PDF list.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use rust_xlsxwriter::{Color, Format, FormatPattern, Workbook as XlsxWorkbook, Worksheet};
use tracing::{debug, info, warn};

use drawcheck_recon::model::{CellValue, Grid, MatchStatus};
use drawcheck_recon::{ReconError, ReconResult};

/// Maximum number of rows read from the reference sheet
const MAX_ROWS: usize = 65536;

pub const REPORT_SHEET: &str = "Ritningsförteckning";
pub const REPORT_HEADERS: [&str; 2] = ["Referensnamn", "Matchstatus"];
pub const UNMATCHED_SHEET: &str = "Omatchade";
pub const UNMATCHED_HEADER: &str = "Omatchade PDF-namn";

/// Fill for matched rows (yellow)
pub const MATCH_FILL: u32 = 0xFFFF00;

// ============================================================================
// Import
// ============================================================================

/// Read one sheet of a workbook into a grid. `sheet = None` reads the first sheet.
///
/// Cell positions are preserved: if the used range starts at C3, the grid
/// has two leading empty rows and two leading empty columns.
pub fn import_grid(path: &Path, sheet: Option<&str>) -> Result<Grid, ReconError> {
    let source = path.display().to_string();

    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| ReconError::extraction(&source, format!("failed to open spreadsheet: {e}")))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let sheet_name = match sheet {
        Some(name) => {
            if !sheet_names.iter().any(|s| s == name) {
                return Err(ReconError::extraction(
                    &source,
                    format!("sheet '{}' not found (available: {})", name, sheet_names.join(", ")),
                ));
            }
            name.to_string()
        }
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ReconError::extraction(&source, "spreadsheet contains no sheets"))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ReconError::extraction(&source, format!("failed to read sheet '{sheet_name}': {e}")))?;

    let (height, width) = range.get_size();
    debug!(sheet = %sheet_name, height, width, "reading reference sheet");

    // Range start offset (data may not begin at A1)
    let (start_row, start_col) = range.start().unwrap_or((0, 0));

    let mut grid: Grid = vec![Vec::new(); (start_row as usize).min(MAX_ROWS)];
    for row in range.rows() {
        if grid.len() >= MAX_ROWS {
            warn!(sheet = %sheet_name, "sheet truncated at {} rows", MAX_ROWS);
            break;
        }
        let mut cells = vec![CellValue::Empty; start_col as usize];
        cells.extend(row.iter().map(cell_value));
        grid.push(cells);
    }

    Ok(grid)
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::Error(e) => CellValue::Text(format!("#{:?}", e)),
        // Serial date numbers; never drawing codes
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

// ============================================================================
// Export
// ============================================================================

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReportStats {
    pub rows: usize,
    pub matched_rows: usize,
}

/// Write the drawing list: one row per accepted reference entry, matched rows filled yellow.
pub fn export_report(result: &ReconResult, path: &Path) -> Result<ReportStats, ReconError> {
    let target = path.display().to_string();
    let write_err = |e: rust_xlsxwriter::XlsxError| ReconError::report_write(&target, e.to_string());

    let mut workbook = XlsxWorkbook::new();
    let worksheet = workbook.add_worksheet().set_name(REPORT_SHEET).map_err(write_err)?;

    write_header(worksheet, &REPORT_HEADERS).map_err(write_err)?;

    let plain = Format::new();
    let highlight = Format::new()
        .set_pattern(FormatPattern::Solid)
        .set_background_color(Color::RGB(MATCH_FILL));

    let mut stats = ReportStats::default();
    for (i, (entry, status)) in result.reference_rows().into_iter().enumerate() {
        let row = (i + 1) as u32;
        let format = if status == MatchStatus::Matched { &highlight } else { &plain };
        worksheet
            .write_string_with_format(row, 0, &entry.display, format)
            .map_err(write_err)?;
        worksheet
            .write_string_with_format(row, 1, status.label(), format)
            .map_err(write_err)?;
        stats.rows += 1;
        if status == MatchStatus::Matched {
            stats.matched_rows += 1;
        }
    }

    worksheet.set_column_width(0, 32).map_err(write_err)?;
    worksheet.set_column_width(1, 14).map_err(write_err)?;

    workbook.save(path).map_err(write_err)?;
    info!(path = %target, rows = stats.rows, matched = stats.matched_rows, "wrote report");
    Ok(stats)
}

/// Write the single-column list of PDF names with no reference entry.
pub fn export_unmatched(result: &ReconResult, path: &Path) -> Result<usize, ReconError> {
    let target = path.display().to_string();
    let write_err = |e: rust_xlsxwriter::XlsxError| ReconError::report_write(&target, e.to_string());

    let mut workbook = XlsxWorkbook::new();
    let worksheet = workbook.add_worksheet().set_name(UNMATCHED_SHEET).map_err(write_err)?;

    write_header(worksheet, &[UNMATCHED_HEADER]).map_err(write_err)?;
    for (i, entry) in result.unmatched_pdf.iter().enumerate() {
        worksheet
            .write_string((i + 1) as u32, 0, &entry.display)
            .map_err(write_err)?;
    }
    worksheet.set_column_width(0, 32).map_err(write_err)?;

    workbook.save(path).map_err(write_err)?;
    info!(path = %target, rows = result.unmatched_pdf.len(), "wrote unmatched list");
    Ok(result.unmatched_pdf.len())
}

fn write_header(worksheet: &mut Worksheet, headers: &[&str]) -> Result<(), rust_xlsxwriter::XlsxError> {
    let bold = Format::new().set_bold();
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }
    Ok(())
}
