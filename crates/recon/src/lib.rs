//! `drawcheck-recon` — drawing-list reconciliation engine.
//!
//! Pure engine crate: receives PDF filenames and an in-memory reference
//! source, returns the matched/unmatched partition. No CLI or IO dependencies.

pub mod config;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod extract;
pub mod filter;
pub mod matcher;
pub mod model;
pub mod normalize;

pub use config::{ExtractionStrategy, MatchConfig};
pub use engine::run;
pub use error::ReconError;
pub use model::{CellValue, PdfDocument, PdfFile, PdfPage, ReconInput, ReconResult, ReferenceSource};
pub use normalize::{normalize, NormalizeMode};
