//! Error types for the real-time data submodule.
//!
//! Errors are wrapped in [`error_stack::Report`] so callers get the chain of
//! contexts that led to a failure. Only [`RtdError::InvalidConfig`] crosses a
//! host boundary, where `init` turns it into a `false` return.

use derive_more::Display;

/// Errors raised while configuring or running the submodule.
#[derive(Debug, Display)]
pub enum RtdError {
    /// Settings file could not be read, parsed or validated.
    #[display("Configuration error: {message}")]
    Configuration { message: String },

    /// Submodule `params` were rejected by validation.
    #[display("Invalid submodule config: {message}")]
    InvalidConfig { message: String },

    /// The HTML rewriter failed while injecting a script element.
    #[display("HTML processing error: {message}")]
    Html { message: String },
}

impl core::error::Error for RtdError {}

impl RtdError {
    /// Message without the category prefix, as logged by the host boundary.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Configuration { message }
            | Self::InvalidConfig { message }
            | Self::Html { message } => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_category() {
        let err = RtdError::InvalidConfig {
            message: "bidders must be an array".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid submodule config: bidders must be an array"
        );
        assert_eq!(err.message(), "bidders must be an array");
    }
}
