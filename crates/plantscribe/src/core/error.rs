//! Core error types for codebase indexing and diagram rendering
//!
//! This module defines the error type surfaced by the load pipeline. Selection
//! misses and unresolved relationships are not errors and never appear here.

use thiserror::Error;

/// Errors produced while loading a codebase or rendering a diagram
#[derive(Error, Debug)]
pub enum ScribeError {
    #[error("Load failure: {message}")]
    LoadFailure {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Load already in progress")]
    LoadInProgress,

    #[error("Render error: {message}")]
    RenderError { message: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Manifest error: {source}")]
    ManifestError {
        #[from]
        source: serde_json::Error,
    },
}

impl ScribeError {
    /// Create a new load failure without an underlying cause
    pub fn load_failure(message: impl Into<String>) -> Self {
        Self::LoadFailure {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new load failure wrapping the error that caused it
    pub fn load_failure_with(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::LoadFailure {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new render error
    pub fn render_error(message: impl Into<String>) -> Self {
        Self::RenderError {
            message: message.into(),
        }
    }

    /// Whether this error means the codebase could not be loaded at all
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            Self::LoadFailure { .. } | Self::IoError { .. } | Self::ManifestError { .. }
        )
    }
}
