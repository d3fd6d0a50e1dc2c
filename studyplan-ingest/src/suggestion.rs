//! AI study-plan suggestions.
//!
//! The model call itself happens elsewhere; this module only interprets the
//! raw reply text it produced.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use studyplan_core::Unit;
use tracing::warn;

use crate::types::SuggestionSource;

pub const FALLBACK_DAILY_MINUTES: i32 = 120;

// Greedy: first '{' to last '}', so nested objects stay intact.
static JSON_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("valid JSON object pattern"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlanSuggestion {
    pub daily_minutes: i32,
    #[serde(default)]
    pub focus_areas: Vec<String>,
    #[serde(default)]
    pub study_techniques: Vec<String>,
    #[serde(default)]
    pub timeline: String,
    #[serde(default)]
    pub custom_recommendations: String,
    #[serde(skip, default = "parsed")]
    pub source: SuggestionSource,
}

fn parsed() -> SuggestionSource {
    SuggestionSource::Parsed
}

impl StudyPlanSuggestion {
    /// Used when the reply has no usable JSON object; the raw text is kept as advice.
    pub fn fallback(raw: &str) -> Self {
        Self {
            daily_minutes: FALLBACK_DAILY_MINUTES,
            focus_areas: vec![
                "Core concepts".to_string(),
                "Practice problems".to_string(),
                "Review".to_string(),
            ],
            study_techniques: vec!["Active recall".to_string(), "Spaced repetition".to_string()],
            timeline: "Start with fundamentals, build to complex topics".to_string(),
            custom_recommendations: raw.trim().to_string(),
            source: SuggestionSource::Fallback,
        }
    }

    /// One unit per focus area, in the order the model listed them.
    pub fn focus_units(&self, minutes_each: i32) -> Vec<Unit> {
        self.focus_areas
            .iter()
            .filter(|a| !a.trim().is_empty())
            .enumerate()
            .map(|(i, area)| {
                Unit::new(
                    uuid::Uuid::new_v4().to_string(),
                    area.trim(),
                    i as u32 + 1,
                    minutes_each,
                )
            })
            .collect()
    }
}

/// Extract the JSON object from a model reply, falling back to defaults.
pub fn parse_suggestion(raw: &str) -> StudyPlanSuggestion {
    if let Some(m) = JSON_OBJECT.find(raw) {
        match serde_json::from_str::<StudyPlanSuggestion>(m.as_str()) {
            Ok(s) => return s,
            Err(e) => warn!(error = %e, "suggestion JSON did not parse; using fallback"),
        }
    }
    StudyPlanSuggestion::fallback(raw)
}
