// drawcheck CLI - reconcile drawing PDFs against a drawing list

mod exit_codes;
mod reconcile;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use drawcheck_recon::filter::PatternFilter;
use drawcheck_recon::normalize::display_form;
use drawcheck_recon::{normalize, NormalizeMode, ReconError};

use exit_codes::{recon_exit_code, EXIT_CONFIG, EXIT_SUCCESS, EXIT_USAGE};
use reconcile::{InputArgs, OutputArgs};
use settings::MatchArgs;

#[derive(Parser)]
#[command(name = "drawcheck")]
#[command(about = "Check a folder of drawing PDFs against a drawing list")]
#[command(version)]
#[command(long_version = long_version())]
struct Cli {
    /// More log output on stderr (-v info, -vv debug). DRAWCHECK_LOG overrides.
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile and write the highlighted list and the unmatched-PDF list
    #[command(after_help = "\
Examples:
  drawcheck run -r ritningsforteckning.xlsx -p ritningar/
  drawcheck run -r forteckning.pdf -p A-1-100.pdf -p B-2-200.pdf --out-dir ut
  drawcheck run -r lista.xlsx -p ritningar/ --strategy token-scan --json
  drawcheck run -r lista.xlsx -p ritningar/ --json-out result.json -q")]
    Run {
        #[command(flatten)]
        inputs: InputArgs,

        /// Directory for the output workbooks
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Report file name (default: ritningsförteckning_markering.xlsx)
        #[arg(long)]
        report: Option<String>,

        /// Unmatched list file name (default: omatchade_ritningar.xlsx)
        #[arg(long)]
        unmatched: Option<String>,

        /// Print the full result as JSON on stdout instead of the summary
        #[arg(long)]
        json: bool,

        /// Also write the JSON result to a file
        #[arg(long, value_name = "FILE")]
        json_out: Option<PathBuf>,
    },

    /// Reconcile without writing any files
    #[command(after_help = "\
Examples:
  drawcheck check -r lista.xlsx -p ritningar/
  drawcheck check -r lista.xlsx -p ritningar/ --json
  drawcheck check -r lista.xlsx -p ritningar/ --strict-exit   # exit 7 if anything is unmatched")]
    Check {
        #[command(flatten)]
        inputs: InputArgs,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,

        /// Exit 7 when any reference entry or PDF is unmatched
        #[arg(long)]
        strict_exit: bool,
    },

    /// Parse and validate a config file, then print the effective settings
    #[command(after_help = "\
Examples:
  drawcheck validate drawcheck.toml
  drawcheck validate            # the per-user config, or defaults")]
    Validate {
        /// Config file (default: $CONFIG_DIR/drawcheck/config.toml if present)
        #[arg(env = "DRAWCHECK_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Show how names normalize and whether they pass the drawing-code filter
    #[command(after_help = "\
Examples:
  drawcheck normalize 'A-40.1-100.PDF' '  Plan ' 2024-05-02
  drawcheck normalize 'W 50.1 1 0100' --strict")]
    Normalize {
        /// Names or cell values to normalize
        #[arg(required = true)]
        text: Vec<String>,

        #[command(flatten)]
        matching: MatchArgs,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("DRAWCHECK_COMMIT"), ")",
        "\nrecon:   drawcheck-recon ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("DRAWCHECK_TARGET"),
        "\npdf:     pdftotext -layout (poppler-utils)",
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run { inputs, out_dir, report, unmatched, json, json_out } => reconcile::cmd_run(
            inputs,
            OutputArgs { out_dir, report, unmatched, json, json_out },
        ),
        Commands::Check { inputs, json, strict_exit } => reconcile::cmd_check(inputs, json, strict_exit),
        Commands::Validate { config } => cmd_validate(config),
        Commands::Normalize { text, matching } => cmd_normalize(text, matching),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

/// Log to stderr. `DRAWCHECK_LOG` (EnvFilter syntax) wins over `-v`.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env("DRAWCHECK_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        let code = recon_exit_code(&err);
        let hint = match &err {
            ReconError::UnsupportedReferenceFormat { .. } => {
                Some("use a spreadsheet (xlsx, xlsm, xls, xlsb, ods) or a PDF".to_string())
            }
            ReconError::ExtractionFailure { message, .. } if message.contains("sheet '") => {
                Some("pass --sheet NAME or set spreadsheet.sheet in the config".to_string())
            }
            ReconError::ReportWrite { .. } => {
                Some("is the file open in another program?".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }
}

// ============================================================================
// validate
// ============================================================================

fn cmd_validate(config: Option<PathBuf>) -> Result<(), CliError> {
    let source = match config {
        Some(ref p) => p.display().to_string(),
        None => match settings::default_config_path().filter(|p| p.is_file()) {
            Some(p) => p.display().to_string(),
            None => "built-in defaults".to_string(),
        },
    };
    let effective = settings::load_config(config.as_deref())?;

    let toml = toml::to_string_pretty(&effective)
        .map_err(|e| CliError { code: EXIT_CONFIG, message: format!("cannot render config: {e}"), hint: None })?;

    eprintln!("config ok: {source}");
    print!("{toml}");
    Ok(())
}

// ============================================================================
// normalize
// ============================================================================

fn cmd_normalize(text: Vec<String>, matching: MatchArgs) -> Result<(), CliError> {
    let config = matching.resolve()?;
    config.validate()?;

    let mode = NormalizeMode::from_strict(config.strict_normalization);
    let filter = PatternFilter::from_config(&config);

    for raw in &text {
        let key = normalize(raw, mode);
        let display = display_form(raw);
        let verdict = match filter.check(&display) {
            None => "accepted".to_string(),
            Some(rejection) => format!("rejected: {rejection}"),
        };
        println!("{raw:?}\tkey={key}\tdisplay={display}\t{verdict}");
    }
    Ok(())
}
