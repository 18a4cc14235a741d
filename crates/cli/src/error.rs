//! CLI error types.

use std::fmt;

use error_stack::Report;
use humansecurity_rtd_common::error::RtdError;

#[derive(Debug)]
pub enum CliError {
    /// Configuration file error
    Config(String),
    /// Submodule refused to initialise
    Init(String),
    /// HTML rewriting error
    Html(String),
    /// IO error
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Init(msg) => write!(f, "Initialization error: {}", msg),
            CliError::Html(msg) => write!(f, "HTML error: {}", msg),
            CliError::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io(err)
    }
}

impl From<Report<RtdError>> for CliError {
    fn from(report: Report<RtdError>) -> Self {
        let message = format!("{report:?}");
        match report.current_context() {
            RtdError::Html { .. } => CliError::Html(message),
            RtdError::Configuration { .. } | RtdError::InvalidConfig { .. } => {
                CliError::Config(message)
            }
        }
    }
}
