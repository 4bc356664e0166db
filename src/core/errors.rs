//! PSAN-prefixed error types with structured error codes.
//!
//! Sanitizer-internal faults (unreadable artifact, malformed metadata,
//! failed deletion) never surface here — they degrade to an invalid
//! verdict or are suppressed outright. `PsanError` covers the ambient
//! surfaces only: config loading, output serialization, audit-log IO.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, PsanError>;

/// Top-level error type for the Prerender Sanitizer.
#[derive(Debug, Error)]
pub enum PsanError {
    #[error("[PSAN-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[PSAN-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[PSAN-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[PSAN-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[PSAN-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[PSAN-3900] runtime failure: {details}")]
    Runtime { details: String },
}

impl PsanError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "PSAN-1001",
            Self::MissingConfig { .. } => "PSAN-1002",
            Self::ConfigParse { .. } => "PSAN-1003",
            Self::Serialization { .. } => "PSAN-2101",
            Self::Io { .. } => "PSAN-3002",
            Self::Runtime { .. } => "PSAN-3900",
        }
    }

    /// Whether retrying might resolve the failure.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Runtime { .. })
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for PsanError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for PsanError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}
