#![forbid(unsafe_code)]

//! Prerender Sanitizer (psan) — post-build cleanup for prerendered route
//! artifacts.
//!
//! A framework build emits one artifact triple per route under
//! `.next/server/app/`: `<route>.html`, `<route>.meta`, `<route>.rsc`.
//! A known build defect can leave a triple half-written — HTML with a
//! mangled `</title>` tag, or metadata that is not the JSON shape the
//! server expects. Shipping such a triple serves a broken page; deleting
//! it lets the framework fall back to on-demand rendering.
//!
//! psan runs after the build and before deployment: it validates each
//! route's triple and deletes the whole triple when either the HTML or
//! the metadata fails validation. Nothing is ever repaired or rewritten.
//!
//! # Library usage
//!
//! Use the [`prelude`] for convenient access to the most common types:
//!
//! ```rust,no_run
//! use prerender_sanitizer::prelude::*;
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use prerender_sanitizer::core::config::Config;
//! use prerender_sanitizer::sanitizer::{Sanitizer, SanitizerConfig};
//! ```

pub mod prelude;

pub mod core;
pub mod logger;
pub mod sanitizer;
