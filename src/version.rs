//! Build metadata embedded by `build.rs` through vergen.

use std::fmt;

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git branch at build time, or "unknown" outside a checkout.
pub const GIT_BRANCH: &str = or_unknown(option_env!("VERGEN_GIT_BRANCH"));

/// Git commit SHA at build time, or "unknown" outside a checkout.
pub const GIT_SHA: &str = or_unknown(option_env!("VERGEN_GIT_SHA"));

const SHORT_SHA_LEN: usize = 7;

const fn or_unknown(value: Option<&'static str>) -> &'static str {
    match value {
        Some(value) => value,
        None => "unknown",
    }
}

/// Whether the working tree had uncommitted changes at build time.
pub fn git_dirty() -> bool {
    matches!(option_env!("VERGEN_GIT_DIRTY"), Some("true"))
}

/// Rendered as `{version}+{branch}.{short sha}`, plus `.dirty` when needed.
#[derive(Debug, Clone, Copy)]
struct BuildInfo {
    version: &'static str,
    branch: &'static str,
    sha: &'static str,
    dirty: bool,
}

impl BuildInfo {
    fn current() -> Self {
        Self {
            version: PKG_VERSION,
            branch: GIT_BRANCH,
            sha: GIT_SHA,
            dirty: git_dirty(),
        }
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sha = self.sha.get(..SHORT_SHA_LEN).unwrap_or(self.sha);
        write!(f, "{}+{}.{sha}", self.version, self.branch)?;
        if self.dirty {
            f.write_str(".dirty")?;
        }
        Ok(())
    }
}

/// Long version text for `vitrine --version`.
pub fn version_string() -> String {
    BuildInfo::current().to_string()
}

/// Default `User-Agent` header for outbound requests.
pub fn user_agent() -> String {
    format!("vitrine/{PKG_VERSION}")
}
