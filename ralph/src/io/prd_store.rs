//! PRD load/save helpers with schema validation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use jsonschema::Draft;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::init::{NotInitializedError, PRD_FILE};
use crate::core::types::PrdEntry;

const PRD_SCHEMA: &str = include_str!("../schemas/prd.schema.json");

/// Load and validate the PRD (schema + typed parse).
///
/// The assistant rewrites this file between iterations, so every load
/// re-validates instead of trusting earlier reads.
pub fn load_prd(path: &Path) -> Result<Vec<PrdEntry>> {
    if !path.exists() {
        return Err(NotInitializedError::new(PRD_FILE).into());
    }
    let contents =
        fs::read_to_string(path).with_context(|| format!("read prd {}", path.display()))?;
    let value: Value =
        serde_json::from_str(&contents).with_context(|| format!("parse prd {}", path.display()))?;
    validate_schema(&value).with_context(|| format!("validate prd {}", path.display()))?;
    let entries: Vec<PrdEntry> = serde_json::from_value(value)
        .with_context(|| format!("deserialize prd {}", path.display()))?;
    debug!(path = %path.display(), entries = entries.len(), "prd loaded");
    Ok(entries)
}

/// Load the PRD as raw JSON entries for the iteration driver.
///
/// Only requires a top-level array. Entries the assistant wrote with an
/// unfamiliar category or empty steps stay readable here; `prd` commands go
/// through [`load_prd`] and still reject them.
pub fn load_prd_values(path: &Path) -> Result<Vec<Value>> {
    if !path.exists() {
        return Err(NotInitializedError::new(PRD_FILE).into());
    }
    let contents =
        fs::read_to_string(path).with_context(|| format!("read prd {}", path.display()))?;
    let value: Value =
        serde_json::from_str(&contents).with_context(|| format!("parse prd {}", path.display()))?;
    match value {
        Value::Array(entries) => {
            debug!(path = %path.display(), entries = entries.len(), "prd values loaded");
            Ok(entries)
        }
        _ => Err(anyhow!("prd {} is not a JSON array", path.display())),
    }
}

/// Rewrite the whole PRD: 2-space pretty JSON, trailing newline, temp file + rename.
pub fn save_prd(path: &Path, entries: &[PrdEntry]) -> Result<()> {
    debug!(path = %path.display(), entries = entries.len(), "writing prd");
    let buf = render_prd(entries)?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, buf)
        .with_context(|| format!("write temp prd {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace prd {}", path.display()))?;
    Ok(())
}

/// Serialize entries exactly as they are stored on disk.
pub fn render_prd<T: Serialize>(entries: &[T]) -> Result<String> {
    let mut buf = serde_json::to_string_pretty(entries).context("serialize prd")?;
    buf.push('\n');
    Ok(buf)
}

fn validate_schema(value: &Value) -> Result<()> {
    let schema: Value = serde_json::from_str(PRD_SCHEMA).context("parse prd schema")?;
    let validator = jsonschema::options()
        .with_draft(Draft::Draft202012)
        .build(&schema)
        .map_err(|err| anyhow!("invalid prd schema: {err}"))?;
    let messages: Vec<String> = validator
        .iter_errors(value)
        .map(|err| err.to_string())
        .collect();
    if !messages.is_empty() {
        return Err(anyhow!(
            "prd schema validation failed:\n- {}",
            messages.join("\n- ")
        ));
    }
    Ok(())
}
