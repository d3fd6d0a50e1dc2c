//! Units: ordered chunks of study material fed to the generator.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnitStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLevel {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl DifficultyLevel {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" | "" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,
    pub title: String,
    /// Consumption order; lower goes first.
    pub order: u32,
    #[serde(default)]
    pub material_ids: Vec<String>,
    /// Minutes; units with 0 are skipped by the generator.
    pub estimated_minutes: i32,
    #[serde(default)]
    pub difficulty_level: DifficultyLevel,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub status: UnitStatus,
}

impl Unit {
    pub fn new(id: impl Into<String>, title: impl Into<String>, order: u32, minutes: i32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            order,
            material_ids: Vec::new(),
            estimated_minutes: minutes,
            difficulty_level: DifficultyLevel::Medium,
            topics: Vec::new(),
            status: UnitStatus::NotStarted,
        }
    }

    pub fn with_materials<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.material_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_difficulty(mut self, level: DifficultyLevel) -> Self {
        self.difficulty_level = level;
        self
    }
}
