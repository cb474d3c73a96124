//! Transient filtered PRD written for a single assistant invocation.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::Value;
use tracing::debug;

use super::prd_store::render_prd;

static SEQ: AtomicU64 = AtomicU64::new(0);

/// A filtered copy of the PRD on disk, owned by one iteration.
///
/// Every iteration writes a fresh file under a new name; files are never
/// reused. Dropping the value removes the file, so an iteration that bails out
/// early still cleans up. Removal errors are ignored.
#[derive(Debug)]
pub struct TransientPrd {
    path: PathBuf,
}

impl TransientPrd {
    /// Write `entries` to a uniquely named file in `dir`.
    pub fn write(dir: &Path, entries: &[&Value]) -> Result<Self> {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        let path = dir.join(unique_name());
        let buf = render_prd(entries)?;
        fs::write(&path, buf).with_context(|| format!("write {}", path.display()))?;
        debug!(path = %path.display(), entries = entries.len(), "transient prd written");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the file now (best-effort).
    pub fn cleanup(self) {
        drop(self);
    }
}

impl Drop for TransientPrd {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.path) {
            debug!(path = %self.path.display(), err = %err, "transient prd cleanup failed");
        }
    }
}

fn unique_name() -> String {
    let seq = SEQ.fetch_add(1, Ordering::Relaxed);
    format!(
        "ralph-prd-{}-{}-{}.json",
        Utc::now().timestamp_micros(),
        std::process::id(),
        seq
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Category, PrdEntry};
    use crate::io::prd_store::load_prd;
    use crate::test_support::entry;

    fn value(entry: &PrdEntry) -> Value {
        serde_json::to_value(entry).expect("to value")
    }

    #[test]
    fn writes_loadable_prd_and_removes_it_on_cleanup() {
        let temp = tempfile::tempdir().expect("tempdir");
        let open = entry(Category::Feature, "open", false);

        let transient = TransientPrd::write(temp.path(), &[&value(&open)]).expect("write");
        let path = transient.path().to_path_buf();
        assert_eq!(load_prd(&path).expect("load"), vec![open.clone()]);

        transient.cleanup();
        assert!(!path.exists());
    }

    #[test]
    fn names_are_unique_per_write() {
        let temp = tempfile::tempdir().expect("tempdir");
        let a = TransientPrd::write(temp.path(), &[]).expect("write a");
        let b = TransientPrd::write(temp.path(), &[]).expect("write b");
        assert_ne!(a.path(), b.path());
        let name = a.path().file_name().expect("name").to_string_lossy().to_string();
        assert!(name.starts_with("ralph-prd-"));
    }

    #[test]
    fn cleanup_of_already_removed_file_is_silent() {
        let temp = tempfile::tempdir().expect("tempdir");
        let transient = TransientPrd::write(temp.path(), &[]).expect("write");
        fs::remove_file(transient.path()).expect("remove early");
        transient.cleanup();
    }
}
