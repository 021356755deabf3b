//! File I/O for native CLI

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use tagline_core::{Dataset, Session, EXPORT_FILE_NAME};

/// Load a dataset file and open a session on it.
///
/// `.json` files hold `{id, text}` rows; anything else is read as one page
/// per non-blank line.
pub fn load_dataset(path: &Path, name: Option<&str>) -> Result<Session> {
    let canonical = path
        .canonicalize()
        .with_context(|| format!("Failed to resolve path: {}", path.display()))?;

    let content = fs::read_to_string(&canonical)
        .with_context(|| format!("Failed to read file: {}", canonical.display()))?;

    let file_name = canonical
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let name = name.unwrap_or(file_name.as_str());

    let is_json = canonical
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let dataset = if is_json {
        Dataset::from_json_str(name, &content)
    } else {
        Dataset::from_lines(name, &content)
    }
    .with_context(|| format!("Failed to load dataset: {}", canonical.display()))?;

    Ok(dataset.into_session())
}

/// Write the export payload to `<out_dir>/labeled_dataset.json`
pub fn save_export(out_dir: &Path, json: &str) -> Result<PathBuf> {
    if !out_dir.exists() {
        fs::create_dir_all(out_dir)
            .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    }

    let export_path = out_dir.join(EXPORT_FILE_NAME);
    fs::write(&export_path, json)
        .with_context(|| format!("Failed to write {}", export_path.display()))?;

    Ok(export_path)
}
