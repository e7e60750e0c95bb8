// Config file lookup and command-line overrides

use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use tracing::debug;

use drawcheck_recon::{ExtractionStrategy, MatchConfig};

use crate::exit_codes::EXIT_CONFIG;
use crate::CliError;

/// `$CONFIG_DIR/drawcheck/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("drawcheck").join("config.toml"))
}

/// Load the effective config: an explicit path must exist; otherwise the
/// per-user file is used when present, else built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<MatchConfig, CliError> {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => default_config_path().filter(|p| p.is_file()),
    };

    let Some(path) = path else {
        debug!("no config file, using defaults");
        return Ok(MatchConfig::default());
    };

    let text = std::fs::read_to_string(&path).map_err(|e| {
        CliError { code: EXIT_CONFIG, message: format!("cannot read config {}: {e}", path.display()), hint: None }
    })?;
    let config = MatchConfig::from_toml(&text).map_err(|e| {
        CliError::from(e).with_hint(format!("in {}", path.display()))
    })?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StrategyArg {
    /// Each non-empty cell or text line is one candidate
    WholeCellOrLine,
    /// Scan cells and lines for code-shaped tokens
    TokenScan,
}

impl From<StrategyArg> for ExtractionStrategy {
    fn from(s: StrategyArg) -> Self {
        match s {
            StrategyArg::WholeCellOrLine => ExtractionStrategy::WholeCellOrLine,
            StrategyArg::TokenScan => ExtractionStrategy::TokenScan,
        }
    }
}

/// Matching options shared by `run`, `check` and `normalize`.
#[derive(Args, Debug, Clone, Default)]
pub struct MatchArgs {
    /// Config file (default: $CONFIG_DIR/drawcheck/config.toml if present)
    #[arg(long, env = "DRAWCHECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Strip everything but ASCII letters and digits from match keys
    #[arg(long)]
    pub strict: bool,

    /// Accept codes without a letter (a digit is still required)
    #[arg(long)]
    pub loose_grammar: bool,

    /// Keep generic terms (plan, sektion, 1:50, ...)
    #[arg(long)]
    pub no_generic_filter: bool,

    /// Keep candidates starting with 2020..2029
    #[arg(long)]
    pub keep_year_prefix: bool,
}

/// Reference reading options (`run` and `check`).
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// How reference candidates are extracted
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Treat PDF references as plain text lines (skip table detection)
    #[arg(long)]
    pub no_pdf_tables: bool,

    /// Spreadsheet sheet name (default: first sheet)
    #[arg(long)]
    pub sheet: Option<String>,
}

impl MatchArgs {
    /// Overlay set flags onto a loaded config. Unset flags leave the file value.
    pub fn apply(&self, config: &mut MatchConfig) {
        if self.strict {
            config.strict_normalization = true;
        }
        if self.loose_grammar {
            config.use_loose_grammar = true;
        }
        if self.no_generic_filter {
            config.exclude_generic_terms = false;
        }
        if self.keep_year_prefix {
            config.exclude_year_prefix = false;
        }
    }

    /// Load the config named by `--config` (or the default) and apply flags.
    pub fn resolve(&self) -> Result<MatchConfig, CliError> {
        let mut config = load_config(self.config.as_deref())?;
        self.apply(&mut config);
        Ok(config)
    }
}

impl SourceArgs {
    pub fn apply(&self, config: &mut MatchConfig) {
        if let Some(strategy) = self.strategy {
            config.extraction_strategy = strategy.into();
        }
        if self.no_pdf_tables {
            config.pdf.detect_tables = false;
        }
        if let Some(ref sheet) = self.sheet {
            config.spreadsheet.sheet = Some(sheet.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn flags_override_file_values() {
        let mut config = MatchConfig::from_toml("use_loose_grammar = false\nexclude_year_prefix = true\n").unwrap();
        let args = MatchArgs { loose_grammar: true, keep_year_prefix: true, ..MatchArgs::default() };
        args.apply(&mut config);
        assert!(config.use_loose_grammar);
        assert!(!config.exclude_year_prefix);
        assert!(config.exclude_generic_terms);

        let source = SourceArgs {
            strategy: Some(StrategyArg::TokenScan),
            no_pdf_tables: true,
            sheet: Some("Förteckning".into()),
        };
        source.apply(&mut config);
        assert_eq!(config.extraction_strategy, ExtractionStrategy::TokenScan);
        assert!(!config.pdf.detect_tables);
        assert_eq!(config.spreadsheet.sheet.as_deref(), Some("Förteckning"));
    }

    #[test]
    fn unset_flags_keep_file_values() {
        let mut config = MatchConfig::from_toml("strict_normalization = true\nexclude_generic_terms = false\n").unwrap();
        MatchArgs::default().apply(&mut config);
        SourceArgs::default().apply(&mut config);
        assert!(config.strict_normalization);
        assert!(!config.exclude_generic_terms);
        assert_eq!(config.extraction_strategy, ExtractionStrategy::WholeCellOrLine);
    }

    #[test]
    fn explicit_config_is_loaded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("drawcheck.toml");
        fs::write(&path, "extraction_strategy = \"token_scan\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.extraction_strategy, ExtractionStrategy::TokenScan);
    }

    #[test]
    fn missing_explicit_config_is_a_config_error() {
        let dir = tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("saknas.toml"))).unwrap_err();
        assert_eq!(err.code, EXIT_CONFIG);
        assert!(err.message.contains("cannot read config"));
    }

    #[test]
    fn invalid_config_is_a_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "generic_terms = [\"plan\", \"  \"]\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert_eq!(err.code, EXIT_CONFIG);
        assert!(err.hint.unwrap().contains("bad.toml"));
    }
}
