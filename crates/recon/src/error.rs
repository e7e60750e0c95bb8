use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty denylist term, etc.).
    ConfigValidation(String),
    /// Reference file is neither a spreadsheet nor a PDF.
    UnsupportedReferenceFormat { path: String, extension: String },
    /// A PDF or spreadsheet could not be read. `source` names the input.
    ExtractionFailure { source: String, message: String },
    /// Report or unmatched list could not be written.
    ReportWrite { path: String, message: String },
    /// IO error (directory listing, config read, etc.).
    Io(String),
}

impl ReconError {
    pub fn extraction(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExtractionFailure { source: source.into(), message: message.into() }
    }

    pub fn report_write(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ReportWrite { path: path.into(), message: message.into() }
    }
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::UnsupportedReferenceFormat { path, extension } => {
                if extension.is_empty() {
                    write!(f, "unsupported reference format: '{path}' has no file extension")
                } else {
                    write!(f, "unsupported reference format: '{path}' (.{extension})")
                }
            }
            Self::ExtractionFailure { source, message } => {
                write!(f, "cannot extract from '{source}': {message}")
            }
            Self::ReportWrite { path, message } => {
                write!(f, "cannot write '{path}': {message}")
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
