//! Candidate extraction: raw identifier strings from filenames and reference sources.
//!
//! All functions return lazy iterators borrowing the input; nothing is
//! normalized here.

use tracing::debug;

use crate::config::ExtractionStrategy;
use crate::filter::find_tokens;
use crate::model::{Grid, Location, Origin, PdfDocument, PdfFile, PdfPage, RawIdentifier, ReferenceSource};

type RawIter<'a> = Box<dyn Iterator<Item = RawIdentifier> + 'a>;

/// One identifier per uploaded file, straight from its filename.
pub fn pdf_filenames(files: &[PdfFile]) -> impl Iterator<Item = RawIdentifier> + '_ {
    files.iter().enumerate().map(|(index, file)| RawIdentifier {
        origin: Origin::PdfFilename,
        text: file.name.clone(),
        location: Location::File { index },
    })
}

/// Candidate identifiers from the reference source.
///
/// For PDFs under [`ExtractionStrategy::WholeCellOrLine`], table cells are
/// used if any page of the document has a table; page text lines are used
/// only when no page has one.
pub fn reference_candidates(source: &ReferenceSource, strategy: ExtractionStrategy) -> RawIter<'_> {
    match (source, strategy) {
        (ReferenceSource::Spreadsheet(grid), ExtractionStrategy::WholeCellOrLine) => {
            Box::new(grid_cells(grid).map(|(location, text)| reference_id(text, location)))
        }
        (ReferenceSource::Spreadsheet(grid), ExtractionStrategy::TokenScan) => {
            Box::new(grid_cells(grid).flat_map(|(location, text)| {
                let tokens: Vec<String> = find_tokens(&text).map(str::to_string).collect();
                tokens.into_iter().map(move |t| reference_id(t, location.clone()))
            }))
        }
        (ReferenceSource::Pdf(doc), ExtractionStrategy::WholeCellOrLine) => {
            if doc.has_tables() {
                debug!("reference PDF has tables; reading table cells");
                Box::new(doc.pages.iter().enumerate().flat_map(|(page, p)| {
                    page_table_cells(page, p).map(|(location, text)| reference_id(text.to_string(), location))
                }))
            } else {
                debug!("reference PDF has no tables; reading text lines");
                Box::new(doc.pages.iter().enumerate().flat_map(|(page, p)| {
                    page_lines(page, p).map(|(location, text)| reference_id(text.to_string(), location))
                }))
            }
        }
        (ReferenceSource::Pdf(doc), ExtractionStrategy::TokenScan) => {
            Box::new(doc.pages.iter().enumerate().flat_map(|(page, p)| page_tokens(page, p)))
        }
    }
}

/// Number of pages whose text layer is missing or blank.
pub fn pages_without_text(doc: &PdfDocument) -> usize {
    doc.pages
        .iter()
        .filter(|p| p.text.as_deref().map_or(true, |t| t.trim().is_empty()))
        .count()
}

fn reference_id(text: String, location: Location) -> RawIdentifier {
    RawIdentifier { origin: Origin::ReferenceCell, text, location }
}

/// Non-empty cells, row-major.
fn grid_cells(grid: &Grid) -> impl Iterator<Item = (Location, String)> + '_ {
    grid.iter().enumerate().flat_map(|(row, cells)| {
        cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.is_empty())
            .map(move |(col, cell)| (Location::Cell { row, col }, cell.as_text()))
    })
}

fn page_table_cells(page: usize, p: &PdfPage) -> impl Iterator<Item = (Location, &str)> + '_ {
    p.tables.iter().enumerate().flat_map(move |(table, rows)| {
        rows.iter().enumerate().flat_map(move |(row, cells)| {
            cells.iter().enumerate().filter_map(move |(col, cell)| {
                let text = cell.as_deref()?;
                if text.trim().is_empty() {
                    None
                } else {
                    Some((Location::TableCell { page, table, row, col }, text))
                }
            })
        })
    })
}

/// Non-empty trimmed lines of the page text. `line` counts blank lines too.
fn page_lines(page: usize, p: &PdfPage) -> impl Iterator<Item = (Location, &str)> + '_ {
    p.text.as_deref().unwrap_or("").lines().enumerate().filter_map(move |(line, text)| {
        let text = text.trim();
        if text.is_empty() {
            None
        } else {
            Some((Location::Line { page, line }, text))
        }
    })
}

/// Token scan of one page: its text if it has any, otherwise its table cells.
fn page_tokens(page: usize, p: &PdfPage) -> RawIter<'_> {
    let has_text = p.text.as_deref().is_some_and(|t| !t.trim().is_empty());
    if has_text {
        Box::new(page_lines(page, p).flat_map(|(location, text)| {
            find_tokens(text).map(move |t| reference_id(t.to_string(), location.clone()))
        }))
    } else {
        Box::new(page_table_cells(page, p).flat_map(|(location, text)| {
            find_tokens(text).map(move |t| reference_id(t.to_string(), location.clone()))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellValue;

    fn texts(iter: RawIter<'_>) -> Vec<String> {
        iter.map(|r| r.text).collect()
    }

    fn table(rows: &[&[&str]]) -> Vec<Vec<Option<String>>> {
        rows.iter()
            .map(|r| {
                r.iter()
                    .map(|c| if c.is_empty() { None } else { Some(c.to_string()) })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn filenames_keep_upload_order() {
        let files = vec![PdfFile::new("B-2-200.pdf"), PdfFile::new("A-1-100.pdf")];
        let ids: Vec<RawIdentifier> = pdf_filenames(&files).collect();
        assert_eq!(ids[0].text, "B-2-200.pdf");
        assert_eq!(ids[1].location, Location::File { index: 1 });
        assert!(ids.iter().all(|r| r.origin == Origin::PdfFilename));
    }

    #[test]
    fn spreadsheet_is_row_major_and_skips_empty() {
        let grid = vec![
            vec![CellValue::from("a-1-100"), CellValue::Empty, CellValue::from("Plan 1")],
            vec![CellValue::Number(42.0), CellValue::from("  ")],
        ];
        let source = ReferenceSource::Spreadsheet(grid);
        let ids: Vec<RawIdentifier> =
            reference_candidates(&source, ExtractionStrategy::WholeCellOrLine).collect();
        let texts: Vec<&str> = ids.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["a-1-100", "Plan 1", "42"]);
        assert_eq!(ids[1].location, Location::Cell { row: 0, col: 2 });
        assert_eq!(ids[2].location, Location::Cell { row: 1, col: 0 });
    }

    #[test]
    fn spreadsheet_token_scan_splits_cells() {
        let grid = vec![vec![CellValue::from("A-1-100 Plan 1tr, ersätter A-1-099")]];
        let source = ReferenceSource::Spreadsheet(grid);
        assert_eq!(
            texts(reference_candidates(&source, ExtractionStrategy::TokenScan)),
            vec!["A-1-100", "A-1-099"]
        );
    }

    #[test]
    fn pdf_tables_suppress_text_on_every_page() {
        // Page 0 has only text, page 1 has a table: the whole document uses tables.
        let doc = PdfDocument {
            pages: vec![
                PdfPage { tables: vec![], text: Some("K-1-001\nK-1-002".into()) },
                PdfPage {
                    tables: vec![table(&[&["Ritning", "Titel"], &["A-1-100", ""], &["A-1-101", "Fasad"]])],
                    text: Some("ignored".into()),
                },
            ],
        };
        let source = ReferenceSource::Pdf(doc);
        assert_eq!(
            texts(reference_candidates(&source, ExtractionStrategy::WholeCellOrLine)),
            vec!["Ritning", "Titel", "A-1-100", "A-1-101", "Fasad"]
        );
    }

    #[test]
    fn pdf_text_fallback_uses_trimmed_lines() {
        let doc = PdfDocument {
            pages: vec![
                PdfPage { tables: vec![], text: Some("  Issued 2024-01-01 \n\n W_50.1_1_0100\n".into()) },
                PdfPage { tables: vec![], text: None },
            ],
        };
        let source = ReferenceSource::Pdf(doc);
        let ids: Vec<RawIdentifier> =
            reference_candidates(&source, ExtractionStrategy::WholeCellOrLine).collect();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0].text, "Issued 2024-01-01");
        assert_eq!(ids[1].text, "W_50.1_1_0100");
        assert_eq!(ids[1].location, Location::Line { page: 0, line: 2 });
    }

    #[test]
    fn pdf_token_scan_reads_prose() {
        let doc = PdfDocument {
            pages: vec![PdfPage {
                tables: vec![],
                text: Some("Handlingar: A-1-100 samt A-1-101 (rev 2024-03-01).".into()),
            }],
        };
        let source = ReferenceSource::Pdf(doc);
        assert_eq!(
            texts(reference_candidates(&source, ExtractionStrategy::TokenScan)),
            vec!["A-1-100", "A-1-101", "2024-03-01"]
        );
    }

    #[test]
    fn pdf_token_scan_falls_back_to_cells_without_text() {
        let doc = PdfDocument {
            pages: vec![PdfPage { tables: vec![table(&[&["Nr: A-2-200", "x"]])], text: None }],
        };
        let source = ReferenceSource::Pdf(doc);
        assert_eq!(texts(reference_candidates(&source, ExtractionStrategy::TokenScan)), vec!["A-2-200"]);
    }

    #[test]
    fn empty_document_yields_nothing() {
        let source = ReferenceSource::Pdf(PdfDocument { pages: vec![PdfPage::default()] });
        assert_eq!(reference_candidates(&source, ExtractionStrategy::WholeCellOrLine).count(), 0);
        assert_eq!(reference_candidates(&source, ExtractionStrategy::TokenScan).count(), 0);
        if let ReferenceSource::Pdf(ref doc) = source {
            assert_eq!(pages_without_text(doc), 1);
        }
    }
}
