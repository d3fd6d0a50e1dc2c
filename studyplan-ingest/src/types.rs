use serde::{Deserialize, Serialize};

/// One row of a unit manifest CSV, before it becomes a `Unit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestRow {
    pub title: String,
    /// Blank means "use row position".
    pub order: Option<u32>,
    pub estimated_minutes: i32,
    pub material_ids: Vec<String>,
    pub difficulty: String,
    pub topics: Vec<String>,
}

/// Whether a suggestion came from the model's JSON or from the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionSource {
    Parsed,
    Fallback,
}
