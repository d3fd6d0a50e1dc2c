//! User study preferences and the daily budget they imply.

use serde::{Deserialize, Serialize};

pub const DEFAULT_BUFFER_DAYS: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StudyType {
    Visual,
    Reading,
    Practice,
    #[default]
    Balanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IntensityLevel {
    Light,
    #[default]
    Moderate,
    Intensive,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StudyTime {
    Morning,
    Afternoon,
    Evening,
    #[default]
    Flexible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecallFrequency {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub study_type: StudyType,
    #[serde(default)]
    pub intensity_level: IntensityLevel,
    #[serde(default)]
    pub custom_daily_minutes: Option<i32>,
    #[serde(default = "default_true")]
    pub spaced_repetition: bool,
    #[serde(default)]
    pub preferred_study_time: StudyTime,
    #[serde(default = "default_buffer_days")]
    pub buffer_days: i32,
    #[serde(default)]
    pub active_recall_frequency: RecallFrequency,
    /// IANA zone used to decide what "today" is.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_true() -> bool {
    true
}

fn default_buffer_days() -> i32 {
    DEFAULT_BUFFER_DAYS
}

fn default_timezone() -> String {
    "America/Chicago".to_string()
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            study_type: StudyType::default(),
            intensity_level: IntensityLevel::default(),
            custom_daily_minutes: None,
            spaced_repetition: true,
            preferred_study_time: StudyTime::default(),
            buffer_days: DEFAULT_BUFFER_DAYS,
            active_recall_frequency: RecallFrequency::default(),
            timezone: default_timezone(),
        }
    }
}

impl UserPreferences {
    /// Daily study budget in minutes.
    pub fn daily_minutes(&self) -> i32 {
        match self.intensity_level {
            IntensityLevel::Light => 90,
            IntensityLevel::Moderate => 180,
            IntensityLevel::Intensive => 300,
            IntensityLevel::Custom => self
                .custom_daily_minutes
                .filter(|m| *m > 0)
                .unwrap_or(180),
        }
    }

    pub fn buffer_days(&self) -> i32 {
        self.buffer_days.max(0)
    }
}
