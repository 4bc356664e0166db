//! Route names and the artifact triples derived from them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Relative path from the build output root to the server-rendered app
/// directory. Fixed convention owned by the external build system.
pub const APP_SERVER_SUBDIR: &str = ".next/server/app";

/// Routes validated when an invocation supplies none.
pub const DEFAULT_ROUTES: [&str; 2] = ["settings", "worlds"];

/// A logical page name whose build output is one artifact triple.
///
/// Route names are supplied by the caller and taken at face value; a name
/// containing a separator (`blog/post`) addresses a nested artifact set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Route(String);

impl Route {
    /// Wrap a caller-supplied route name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The raw route name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }

    /// The route rendered as a URL path (`/settings`), the form used in
    /// report lines.
    #[must_use]
    pub fn as_url_path(&self) -> String {
        format!("/{}", self.0)
    }

    /// The built-in default route set.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        DEFAULT_ROUTES.iter().map(|name| Self::new(*name)).collect()
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Route {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Route {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// The `.html`/`.meta`/`.rsc` file set for one route.
///
/// Produced by an external build step; psan only ever reads or deletes
/// these paths, never writes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactTriple {
    /// Prerendered page markup.
    pub html: PathBuf,
    /// Serialized response metadata (JSON).
    pub meta: PathBuf,
    /// Serialized component payload. Present or absent, its content never
    /// affects the verdict.
    pub rsc: PathBuf,
}

impl ArtifactTriple {
    /// Derive the triple for a route within the app server directory.
    #[must_use]
    pub fn for_route(app_server_dir: &Path, route: &Route) -> Self {
        Self {
            html: app_server_dir.join(format!("{}.html", route.name())),
            meta: app_server_dir.join(format!("{}.meta", route.name())),
            rsc: app_server_dir.join(format!("{}.rsc", route.name())),
        }
    }

    /// All three member paths, deletion order.
    #[must_use]
    pub fn paths(&self) -> [&Path; 3] {
        [&self.html, &self.meta, &self.rsc]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triple_paths_append_fixed_suffixes() {
        let dir = Path::new("/site/.next/server/app");
        let triple = ArtifactTriple::for_route(dir, &Route::new("settings"));
        assert_eq!(triple.html, dir.join("settings.html"));
        assert_eq!(triple.meta, dir.join("settings.meta"));
        assert_eq!(triple.rsc, dir.join("settings.rsc"));
    }

    #[test]
    fn nested_route_name_produces_nested_paths() {
        let dir = Path::new("/site/.next/server/app");
        let triple = ArtifactTriple::for_route(dir, &Route::new("blog/post"));
        assert_eq!(triple.html, dir.join("blog/post.html"));
    }

    #[test]
    fn url_path_gets_leading_slash() {
        assert_eq!(Route::new("worlds").as_url_path(), "/worlds");
    }

    #[test]
    fn default_route_set_is_stable() {
        let defaults = Route::defaults();
        assert_eq!(defaults.len(), 2);
        assert_eq!(defaults[0].name(), "settings");
        assert_eq!(defaults[1].name(), "worlds");
    }
}
