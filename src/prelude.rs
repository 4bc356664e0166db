//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use prerender_sanitizer::prelude::*;
//! ```

// Core
pub use crate::core::config::Config;
pub use crate::core::errors::{PsanError, Result};
pub use crate::core::paths::resolve_absolute_path;

// Sanitizer
pub use crate::sanitizer::artifacts::{ArtifactTriple, Route};
pub use crate::sanitizer::validate::{HtmlFault, MetaFault, RouteVerdict};
pub use crate::sanitizer::{SanitizeReport, Sanitizer, SanitizerConfig};

// Logger
pub use crate::logger::jsonl::{AuditRecord, AuditWriter};
