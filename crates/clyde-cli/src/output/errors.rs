//! Error message formatting with actionable suggestions.
//!
//! Renders `error:`, an optional `help:` hint taken from the first
//! [`ClydeError`] in the chain, and every underlying cause.

use clyde_core::error::ClydeError;

use super::colors::ColorSupport;

/// Error formatter with suggestions
pub struct ErrorFormatter {
    colors: ColorSupport,
}

impl ErrorFormatter {
    /// Create a new error formatter
    pub fn new() -> Self {
        Self {
            colors: ColorSupport::detect(),
        }
    }

    #[cfg(test)]
    fn with_colors(colors: ColorSupport) -> Self {
        Self { colors }
    }

    /// Format an error with context and suggestions
    pub fn format_error(&self, error: &anyhow::Error) -> String {
        let mut output = String::new();

        // Main error message
        output.push_str(&self.colors.red("error"));
        output.push_str(": ");
        output.push_str(&error.to_string());
        output.push('\n');

        // Add suggestion if available
        let suggestion = error
            .chain()
            .find_map(|cause| cause.downcast_ref::<ClydeError>())
            .and_then(ClydeError::suggestion);
        if let Some(suggestion) = suggestion {
            output.push('\n');
            output.push_str(&self.colors.dim("help"));
            output.push_str(": ");
            output.push_str(suggestion);
            output.push('\n');
        }

        // Add source chain if available
        for cause in error.chain().skip(1) {
            output.push('\n');
            output.push_str(&self.colors.dim("caused by"));
            output.push_str(": ");
            output.push_str(&cause.to_string());
        }

        output
    }
}

impl Default for ErrorFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_format_with_suggestion_and_cause() {
        let err: anyhow::Result<()> = Err(ClydeError::CircularDependency {
            cycle: "a -> b -> a".to_string(),
        })
        .context("Failed to compute build order");

        let formatted = ErrorFormatter::with_colors(ColorSupport::disabled()).format_error(&err.unwrap_err());

        assert!(formatted.starts_with("error: Failed to compute build order\n"));
        assert!(formatted.contains("help: Remove circular dependencies"));
        assert!(formatted.contains("caused by: Circular dependency detected: a -> b -> a"));
    }

    #[test]
    fn test_format_plain_error() {
        let err = anyhow::anyhow!("something broke");
        let formatted = ErrorFormatter::with_colors(ColorSupport::disabled()).format_error(&err);

        assert_eq!(formatted, "error: something broke\n");
    }
}
