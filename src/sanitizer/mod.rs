//! Prerender artifact sanitizer: sequential validation pass + best-effort cleanup.
//!
//! One route is fully validated and, if needed, cleaned up before the next
//! route begins. The pass never fails: a missing output directory is a
//! silent no-op, unreadable or malformed artifacts condemn their route, and
//! deletion faults are suppressed.

pub mod artifacts;
pub mod removal;
pub mod validate;

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::paths::resolve_absolute_path;
use crate::sanitizer::artifacts::{APP_SERVER_SUBDIR, ArtifactTriple, Route};
use crate::sanitizer::removal::{RemovalExecutor, RemovalOutcome};
use crate::sanitizer::validate::{RouteVerdict, read_text};

// ──────────────────── configuration ────────────────────

/// Configuration for one sanitizer pass.
#[derive(Debug, Clone)]
pub struct SanitizerConfig {
    /// Build output root. Defaults to the current working directory;
    /// resolved to an absolute path either way.
    pub target_dir: PathBuf,
    /// Relative path to the server-rendered app directory.
    pub app_subdir: PathBuf,
    /// Count removals without unlinking.
    pub dry_run: bool,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            target_dir: PathBuf::from("."),
            app_subdir: PathBuf::from(APP_SERVER_SUBDIR),
            dry_run: false,
        }
    }
}

// ──────────────────── report types ────────────────────

/// One route condemned and removed during a pass.
#[derive(Debug, Clone, Serialize)]
pub struct RemovedRoute {
    /// The condemned route.
    pub route: Route,
    /// Which predicate(s) failed.
    pub verdict: RouteVerdict,
    /// What the removal actually did.
    pub outcome: RemovalOutcome,
}

/// Assessment of one route without any side effect (scan mode).
#[derive(Debug, Clone, Serialize)]
pub struct RouteAssessment {
    /// The examined route.
    pub route: Route,
    /// Verdict for its artifact set.
    pub verdict: RouteVerdict,
}

/// Summary of a completed sanitizer pass.
#[derive(Debug, Clone, Serialize)]
pub struct SanitizeReport {
    /// Resolved app server directory the pass ran against.
    pub app_server_dir: PathBuf,
    /// True when the directory did not exist and the pass did nothing.
    pub skipped_missing_dir: bool,
    /// Routes examined, in input order.
    pub routes_examined: usize,
    /// Routes condemned and removed.
    pub removed: Vec<RemovedRoute>,
    /// Whether this pass was a dry run.
    pub dry_run: bool,
}

impl SanitizeReport {
    fn skipped(app_server_dir: PathBuf, dry_run: bool) -> Self {
        Self {
            app_server_dir,
            skipped_missing_dir: true,
            routes_examined: 0,
            removed: Vec::new(),
            dry_run,
        }
    }

    /// True when no route was removed. An empty route list is healthy.
    #[must_use]
    pub fn healthy(&self) -> bool {
        self.removed.is_empty()
    }
}

// ──────────────────── sanitizer ────────────────────

/// The artifact sanitizer: validates route triples and deletes corrupted ones.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    app_server_dir: PathBuf,
    executor: RemovalExecutor,
    dry_run: bool,
}

impl Sanitizer {
    /// Build a sanitizer from config, resolving the app server directory.
    #[must_use]
    pub fn new(config: &SanitizerConfig) -> Self {
        let target = resolve_absolute_path(&config.target_dir);
        Self {
            app_server_dir: target.join(&config.app_subdir),
            executor: RemovalExecutor::new(config.dry_run),
            dry_run: config.dry_run,
        }
    }

    /// The resolved directory this sanitizer operates on.
    #[must_use]
    pub fn app_server_dir(&self) -> &Path {
        &self.app_server_dir
    }

    /// Run the full pass: validate each route in order, removing the whole
    /// triple of any route whose HTML or metadata fails validation.
    ///
    /// A missing app server directory short-circuits to an empty report —
    /// nothing was built, so there is nothing to sanitize.
    #[must_use]
    pub fn run(&self, routes: &[Route]) -> SanitizeReport {
        if !self.app_server_dir.exists() {
            return SanitizeReport::skipped(self.app_server_dir.clone(), self.dry_run);
        }

        let mut removed = Vec::new();
        for route in routes {
            let (triple, verdict) = self.assess_route(route);
            if verdict.is_valid() {
                continue;
            }
            let outcome = self.executor.remove_triple(&triple);
            removed.push(RemovedRoute {
                route: route.clone(),
                verdict,
                outcome,
            });
        }

        SanitizeReport {
            app_server_dir: self.app_server_dir.clone(),
            skipped_missing_dir: false,
            routes_examined: routes.len(),
            removed,
            dry_run: self.dry_run,
        }
    }

    /// Validate every route without touching the filesystem beyond reads.
    ///
    /// Returns `None` when the app server directory does not exist.
    #[must_use]
    pub fn assess(&self, routes: &[Route]) -> Option<Vec<RouteAssessment>> {
        if !self.app_server_dir.exists() {
            return None;
        }
        Some(
            routes
                .iter()
                .map(|route| {
                    let (_, verdict) = self.assess_route(route);
                    RouteAssessment {
                        route: route.clone(),
                        verdict,
                    }
                })
                .collect(),
        )
    }

    fn assess_route(&self, route: &Route) -> (ArtifactTriple, RouteVerdict) {
        let triple = ArtifactTriple::for_route(&self.app_server_dir, route);
        let html = read_text(&triple.html);
        let meta = read_text(&triple.meta);
        let verdict = RouteVerdict::judge(html.as_deref(), meta.as_deref());
        (triple, verdict)
    }
}
