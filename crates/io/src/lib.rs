// File I/O: reference import (spreadsheet, PDF), PDF gathering, report export

pub mod inputs;
pub mod json;
pub mod pdf;
pub mod xlsx;

pub use inputs::{collect_pdf_files, load_input, load_reference, reference_kind, ReferenceKind};
