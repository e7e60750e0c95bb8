use tracing::{debug, info};

use crate::config::MatchConfig;
use crate::error::ReconError;
use crate::evidence::{compute_summary, tally};
use crate::extract::{pdf_filenames, reference_candidates};
use crate::filter::PatternFilter;
use crate::matcher::{reconcile, KeyIndex};
use crate::model::{DrawingCodeCandidate, FilterStats, RawIdentifier, ReconInput, ReconMeta, ReconResult};
use crate::normalize::{display_form, normalize, NormalizeMode};

/// Normalize one raw identifier and, for reference candidates, run the pattern filter.
pub fn evaluate(raw: RawIdentifier, filter: Option<&PatternFilter>, mode: NormalizeMode) -> DrawingCodeCandidate {
    let display = display_form(&raw.text);
    let key = normalize(&raw.text, mode);
    let rejection = filter.and_then(|f| f.check(&display));
    DrawingCodeCandidate { raw, display, key, rejection }
}

/// Run reconciliation per config. Returns the partitioned result + summary.
pub fn run(config: &MatchConfig, input: &ReconInput) -> Result<ReconResult, ReconError> {
    config.validate()?;

    let mode = NormalizeMode::from_strict(config.strict_normalization);
    let filter = PatternFilter::from_config(config);

    // PDF side: filenames are trusted, no filter
    let mut pdf_index = KeyIndex::new();
    for raw in pdf_filenames(&input.pdf_files) {
        let candidate = evaluate(raw, None, mode);
        pdf_index.insert(candidate.key, candidate.display, candidate.raw);
    }
    info!(
        files = input.pdf_files.len(),
        keys = pdf_index.len(),
        "collected PDF filenames"
    );

    // Reference side
    let mut reference_index = KeyIndex::new();
    let mut stats = FilterStats::default();
    for raw in reference_candidates(&input.reference, config.extraction_strategy) {
        let candidate = evaluate(raw, Some(&filter), mode);
        tally(&mut stats, candidate.rejection.as_ref());
        match candidate.rejection {
            Some(ref reason) => {
                debug!(text = %candidate.raw.text, at = %candidate.raw.location, %reason, "rejected");
            }
            None => reference_index.insert(candidate.key, candidate.display, candidate.raw),
        }
    }
    info!(
        reference = %input.reference_label,
        candidates = stats.candidates,
        accepted = stats.accepted,
        keys = reference_index.len(),
        "filtered reference candidates"
    );

    let partition = reconcile(&pdf_index.keys(), &reference_index.keys());
    let duplicate_pdfs = pdf_index.duplicates();
    let summary = compute_summary(input.pdf_files.len(), duplicate_pdfs.len(), &partition);
    info!(
        matched = summary.matched,
        unmatched_reference = summary.unmatched_reference,
        unmatched_pdf = summary.unmatched_pdf,
        "reconciled"
    );

    Ok(ReconResult {
        meta: ReconMeta {
            reference: input.reference_label.clone(),
            strategy: config.extraction_strategy,
            strict_normalization: config.strict_normalization,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        filter: stats,
        matched: reference_index.select(&partition.matched),
        unmatched_reference: reference_index.select(&partition.unmatched_reference),
        unmatched_pdf: pdf_index.select(&partition.unmatched_pdf),
        duplicate_pdfs,
    })
}
