//! Errors raised by the plugin loader itself.
//!
//! Failures from collaborators (config parsing, command and extension
//! loading) are not represented here; they reach the caller as-is.

use thiserror::Error;

/// Errors detected while validating loader input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PluginLoadError {
    /// The directory argument was empty or whitespace.
    #[error("couldn't find toml file in {directory}")]
    InvalidInput { directory: String },

    /// The directory argument does not point at an existing directory.
    #[error("couldn't load plugin (not a directory): {directory}")]
    NotADirectory { directory: String },

    /// A file pattern could not be compiled.
    #[error("invalid file pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl PluginLoadError {
    pub fn invalid_input(directory: impl Into<String>) -> Self {
        Self::InvalidInput {
            directory: directory.into(),
        }
    }

    pub fn not_a_directory(directory: impl Into<String>) -> Self {
        Self::NotADirectory {
            directory: directory.into(),
        }
    }

    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }
}
