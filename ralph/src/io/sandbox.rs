//! Container detection for deciding whether the assistant may skip permission prompts.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Set to `true` by managed sandboxes that run ralph.
pub const SANDBOX_ENV: &str = "RALPH_SANDBOX";
const SANDBOX_ENV_VALUE: &str = "true";
/// Generic runtime marker set by podman/systemd-nspawn style runtimes.
pub const CONTAINER_ENV: &str = "container";
const CONTAINER_ENV_VALUES: [&str; 2] = ["docker", "podman"];
const CGROUP_MARKERS: [&str; 4] = ["docker", "kubepods", "containerd", "lxc"];

/// Inputs for a container probe.
///
/// `env` is a lookup function so tests can supply a fake environment.
pub struct SandboxProbe<F: Fn(&str) -> Option<String>> {
    pub env: F,
    pub marker_path: PathBuf,
    pub cgroup_path: PathBuf,
}

impl SandboxProbe<fn(&str) -> Option<String>> {
    /// Probe over the real process environment and filesystem.
    pub fn system() -> Self {
        Self {
            env: |key| std::env::var(key).ok(),
            marker_path: PathBuf::from("/.dockerenv"),
            cgroup_path: PathBuf::from("/proc/1/cgroup"),
        }
    }
}

impl<F: Fn(&str) -> Option<String>> SandboxProbe<F> {
    /// True if any signal says we run inside a container.
    ///
    /// Unreadable files count as no evidence, never as errors.
    pub fn detect(&self) -> bool {
        if (self.env)(SANDBOX_ENV).as_deref() == Some(SANDBOX_ENV_VALUE) {
            debug!(var = SANDBOX_ENV, "sandbox detected via env");
            return true;
        }
        if self.marker_path.exists() {
            debug!(path = %self.marker_path.display(), "sandbox detected via marker file");
            return true;
        }
        if cgroup_mentions_runtime(&self.cgroup_path) {
            debug!(path = %self.cgroup_path.display(), "sandbox detected via cgroup");
            return true;
        }
        if let Some(value) = (self.env)(CONTAINER_ENV)
            && CONTAINER_ENV_VALUES.contains(&value.as_str())
        {
            debug!(var = CONTAINER_ENV, value = %value, "sandbox detected via env");
            return true;
        }
        false
    }
}

/// Probe the current process. Not cached; each call re-reads everything.
pub fn is_sandboxed() -> bool {
    SandboxProbe::system().detect()
}

fn cgroup_mentions_runtime(path: &Path) -> bool {
    match fs::read_to_string(path) {
        Ok(contents) => CGROUP_MARKERS.iter().any(|m| contents.contains(m)),
        Err(_) => false,
    }
}
