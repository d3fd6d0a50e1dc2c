use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use studyplan_core::StudyStore;

/// `$STUDYPLAN_HOME`, else `$HOME/.studyplan`.
pub fn studyplan_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("STUDYPLAN_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".studyplan"))
}

pub fn ensure_studyplan_home() -> Result<PathBuf> {
    let dir = studyplan_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn store_path() -> Result<PathBuf> {
    Ok(ensure_studyplan_home()?.join("state.json"))
}

/// Missing file means a fresh, empty store.
pub fn read_store(path: &Path) -> Result<StudyStore> {
    if !path.exists() {
        return Ok(StudyStore::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn write_store(path: &Path, store: &StudyStore) -> Result<()> {
    let json = serde_json::to_string_pretty(store)?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
