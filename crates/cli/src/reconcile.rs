//! `drawcheck run` / `drawcheck check`: reconcile PDFs against a drawing list.

use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::info;

use drawcheck_recon::model::KeyedEntry;
use drawcheck_recon::{MatchConfig, ReconError, ReconResult};

use crate::exit_codes::EXIT_UNMATCHED;
use crate::settings::{MatchArgs, SourceArgs};
use crate::CliError;

/// Inputs shared by `run` and `check`.
#[derive(clap::Args, Debug, Clone)]
pub struct InputArgs {
    /// Reference drawing list (xlsx, xlsm, xls, xlsb, ods or pdf)
    #[arg(long, short = 'r')]
    pub reference: PathBuf,

    /// PDF file or directory of PDFs. Repeatable.
    #[arg(long, short = 'p', value_name = "PATH")]
    pub pdf: Vec<PathBuf>,

    #[command(flatten)]
    pub matching: MatchArgs,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Suppress progress notes on stderr
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

#[derive(Debug, Clone, Default)]
pub struct OutputArgs {
    pub out_dir: PathBuf,
    pub report: Option<String>,
    pub unmatched: Option<String>,
    pub json: bool,
    pub json_out: Option<PathBuf>,
}

macro_rules! progress {
    ($quiet:expr, $($arg:tt)*) => {
        if !$quiet {
            eprintln!($($arg)*);
        }
    };
}

// ============================================================================
// run
// ============================================================================

pub fn cmd_run(inputs: InputArgs, output: OutputArgs) -> Result<(), CliError> {
    let mut config = resolve_config(&inputs)?;
    if let Some(ref name) = output.report {
        config.output.report = name.clone();
    }
    if let Some(ref name) = output.unmatched {
        config.output.unmatched = name.clone();
    }
    config.validate()?;

    let result = reconcile(&inputs, &config)?;

    std::fs::create_dir_all(&output.out_dir).map_err(|e| {
        CliError::from(ReconError::report_write(output.out_dir.display().to_string(), e.to_string()))
    })?;

    let mut staged = Staged::default();

    let report_path = output.out_dir.join(&config.output.report);
    let stats = drawcheck_io::xlsx::export_report(&result, staged.add(&report_path)?)?;

    let unmatched_path = output.out_dir.join(&config.output.unmatched);
    let rows = drawcheck_io::xlsx::export_unmatched(&result, staged.add(&unmatched_path)?)?;

    let json_path = output
        .json_out
        .clone()
        .or_else(|| config.output.json.as_ref().map(|name| output.out_dir.join(name)));
    if let Some(ref path) = json_path {
        drawcheck_io::json::export(&result, staged.add(path)?)?;
    }

    staged.commit()?;
    progress!(inputs.quiet, "wrote {} ({} rows, {} matched)", report_path.display(), stats.rows, stats.matched_rows);
    progress!(inputs.quiet, "wrote {} ({} rows)", unmatched_path.display(), rows);
    if let Some(ref path) = json_path {
        progress!(inputs.quiet, "wrote {}", path.display());
    }

    emit(&result, output.json)
}

/// Output files written to temporaries next to their destinations. Nothing
/// reaches a destination until every file has been written.
#[derive(Default)]
struct Staged {
    files: Vec<(NamedTempFile, PathBuf)>,
}

impl Staged {
    /// Reserve a temporary for `dest` and return the path to write to.
    fn add(&mut self, dest: &Path) -> Result<&Path, CliError> {
        let write_err = |message: String| CliError::from(ReconError::report_write(dest.display().to_string(), message));
        if dest.is_dir() {
            return Err(write_err("is a directory".to_string()));
        }
        let dir = match dest.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let suffix = dest.extension().map(|e| format!(".{}", e.to_string_lossy())).unwrap_or_default();
        let temp = tempfile::Builder::new()
            .prefix(".drawcheck-")
            .suffix(&suffix)
            .tempfile_in(dir)
            .map_err(|e| write_err(e.to_string()))?;

        self.files.push((temp, dest.to_path_buf()));
        let (temp, _) = &self.files[self.files.len() - 1];
        Ok(temp.path())
    }

    /// Move every temporary into place. On failure the files already moved
    /// are removed again.
    fn commit(self) -> Result<(), CliError> {
        let mut placed: Vec<PathBuf> = Vec::new();
        for (temp, dest) in self.files {
            if let Err(e) = temp.persist(&dest) {
                for path in &placed {
                    let _ = std::fs::remove_file(path);
                }
                return Err(ReconError::report_write(dest.display().to_string(), e.error.to_string()).into());
            }
            placed.push(dest);
        }
        Ok(())
    }
}

// ============================================================================
// check
// ============================================================================

pub fn cmd_check(inputs: InputArgs, json: bool, strict_exit: bool) -> Result<(), CliError> {
    let config = resolve_config(&inputs)?;
    config.validate()?;

    let result = reconcile(&inputs, &config)?;
    emit(&result, json)?;

    if strict_exit && !result.is_fully_matched() {
        let s = &result.summary;
        return Err(CliError {
            code: EXIT_UNMATCHED,
            message: format!(
                "{} reference entries without a PDF, {} PDFs not in the list",
                s.unmatched_reference, s.unmatched_pdf
            ),
            hint: None,
        });
    }

    Ok(())
}

// ============================================================================
// Shared
// ============================================================================

fn resolve_config(inputs: &InputArgs) -> Result<MatchConfig, CliError> {
    let mut config = inputs.matching.resolve()?;
    inputs.source.apply(&mut config);
    Ok(config)
}

fn reconcile(inputs: &InputArgs, config: &MatchConfig) -> Result<ReconResult, CliError> {
    if !inputs.reference.exists() {
        return Err(CliError::args(format!("reference not found: {}", inputs.reference.display())));
    }
    if inputs.pdf.is_empty() {
        progress!(inputs.quiet, "note: no --pdf given; every reference entry will be unmatched");
    }

    progress!(inputs.quiet, "reading {}", inputs.reference.display());
    let input = drawcheck_io::load_input(&inputs.reference, &inputs.pdf, config)?;
    progress!(inputs.quiet, "{} PDF files", input.pdf_files.len());

    let result = drawcheck_recon::run(config, &input)?;
    info!(
        matched = result.summary.matched,
        unmatched_reference = result.summary.unmatched_reference,
        unmatched_pdf = result.summary.unmatched_pdf,
        "reconciliation complete"
    );
    Ok(result)
}

/// JSON to stdout, or the human summary.
fn emit(result: &ReconResult, json: bool) -> Result<(), CliError> {
    if json {
        println!("{}", drawcheck_io::json::to_string(result)?);
    } else {
        print!("{}", render_summary(result));
    }
    Ok(())
}

pub fn render_summary(result: &ReconResult) -> String {
    let s = &result.summary;
    let f = &result.filter;
    let mut out = String::new();

    out.push_str(&format!(
        "reference: {} ({}, {} candidates, {} accepted)\n",
        result.meta.reference, result.meta.strategy, f.candidates, f.accepted
    ));
    if f.accepted < f.candidates {
        out.push_str(&format!(
            "  rejected: {} grammar, {} year prefix, {} generic term\n",
            f.rejected_grammar, f.rejected_year_prefix, f.rejected_generic_term
        ));
    }
    out.push_str(&format!("pdfs: {} files, {} distinct names\n", s.pdf_files, s.pdf_keys));
    out.push_str(&format!(
        "matched: {}  unmatched reference: {}  unmatched pdf: {}\n",
        s.matched, s.unmatched_reference, s.unmatched_pdf
    ));

    section(&mut out, "missing pdf", &result.unmatched_reference);
    section(&mut out, "not in list", &result.unmatched_pdf);
    for entry in &result.duplicate_pdfs {
        let names: Vec<&str> = entry.sources.iter().map(|r| r.text.as_str()).collect();
        out.push_str(&format!("  duplicate: {} ({})\n", entry.display, names.join(", ")));
    }
    out
}

fn section(out: &mut String, label: &str, entries: &[KeyedEntry]) {
    for entry in entries {
        out.push_str(&format!("  {label}: {}\n", entry.display));
    }
}
