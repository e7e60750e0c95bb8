use crate::model::{FilterStats, Partition, Rejection, ReconSummary};

/// Count one filtered reference candidate.
pub fn tally(stats: &mut FilterStats, rejection: Option<&Rejection>) {
    stats.candidates += 1;
    match rejection {
        None => stats.accepted += 1,
        Some(Rejection::Grammar) => stats.rejected_grammar += 1,
        Some(Rejection::YearPrefix) => stats.rejected_year_prefix += 1,
        Some(Rejection::GenericTerm(_)) => stats.rejected_generic_term += 1,
    }
}

/// Compute summary statistics from a partition.
pub fn compute_summary(pdf_files: usize, duplicate_pdfs: usize, partition: &Partition) -> ReconSummary {
    let matched = partition.matched.len();
    ReconSummary {
        pdf_files,
        pdf_keys: matched + partition.unmatched_pdf.len(),
        reference_keys: matched + partition.unmatched_reference.len(),
        matched,
        unmatched_reference: partition.unmatched_reference.len(),
        unmatched_pdf: partition.unmatched_pdf.len(),
        duplicate_pdfs,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::matcher::reconcile;
    use crate::normalize::{normalize, NormalizeMode};

    #[test]
    fn tally_counts_each_reason() {
        let mut stats = FilterStats::default();
        tally(&mut stats, None);
        tally(&mut stats, None);
        tally(&mut stats, Some(&Rejection::Grammar));
        tally(&mut stats, Some(&Rejection::YearPrefix));
        tally(&mut stats, Some(&Rejection::GenericTerm("plan".into())));
        assert_eq!(
            stats,
            FilterStats {
                candidates: 5,
                accepted: 2,
                rejected_grammar: 1,
                rejected_year_prefix: 1,
                rejected_generic_term: 1,
            }
        );
    }

    #[test]
    fn summary_counts() {
        let k = |s: &str| normalize(s, NormalizeMode::Loose);
        let pdf: BTreeSet<_> = [k("a-1-100"), k("b-2-200")].into_iter().collect();
        let reference: BTreeSet<_> = [k("a-1-100"), k("c-3-300"), k("d-4-400")].into_iter().collect();
        let summary = compute_summary(3, 1, &reconcile(&pdf, &reference));
        assert_eq!(summary.pdf_files, 3);
        assert_eq!(summary.pdf_keys, 2);
        assert_eq!(summary.reference_keys, 3);
        assert_eq!(summary.matched, 1);
        assert_eq!(summary.unmatched_reference, 2);
        assert_eq!(summary.unmatched_pdf, 1);
        assert_eq!(summary.duplicate_pdfs, 1);
    }
}
