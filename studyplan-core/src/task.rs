//! Task model: one scheduled slice of a unit's work, owned by a single day.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    PartiallyCompleted,
    Skipped,
}

impl TaskStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "pending" => Some(Self::Pending),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "partially_completed" => Some(Self::PartiallyCompleted),
            "skipped" => Some(Self::Skipped),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Read,
    Review,
    Practice,
    Create,
    Quiz,
}

/// Pointer into a source material. Page/section are unknown at generation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialReference {
    pub material_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_title: Option<String>,
}

impl MaterialReference {
    pub fn new(material_id: impl Into<String>) -> Self {
        Self {
            material_id: material_id.into(),
            page_range: None,
            section_title: None,
        }
    }
}

/// Core task type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    /// Containing `DailySchedule` id.
    pub schedule_id: String,
    pub unit_id: String,
    pub task_type: TaskType,
    pub description: String,
    #[serde(default)]
    pub material_references: Vec<MaterialReference>,

    /// Minutes.
    pub estimated_minutes: i32,
    /// Minutes; 0 until the task is completed.
    pub actual_minutes: i32,

    pub status: TaskStatus,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,

    /// Descriptive tags, e.g. "essential" for foundational tasks.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Task {
    pub fn new(
        id: impl Into<String>,
        schedule_id: impl Into<String>,
        unit_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            schedule_id: schedule_id.into(),
            unit_id: unit_id.into(),
            task_type: TaskType::Read,
            description: String::new(),
            material_references: Vec::new(),
            estimated_minutes: 30,
            actual_minutes: 0,
            status: TaskStatus::Pending,
            completed_at: None,
            notes: None,
            tags: Vec::new(),
        }
    }

    pub fn with_type(mut self, task_type: TaskType) -> Self {
        self.task_type = task_type;
        self
    }

    pub fn with_estimate(mut self, minutes: i32) -> Self {
        self.estimated_minutes = minutes;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn is_essential(&self) -> bool {
        self.tags.iter().any(|t| t == "essential")
    }
}

/// Shallow partial update for a task. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskPatch {
    pub status: Option<TaskStatus>,
    pub task_type: Option<TaskType>,
    pub description: Option<String>,
    pub estimated_minutes: Option<i32>,
    pub actual_minutes: Option<i32>,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn apply_to(&self, task: &mut Task) {
        if let Some(s) = self.status {
            task.status = s;
        }
        if let Some(t) = self.task_type {
            task.task_type = t;
        }
        if let Some(ref d) = self.description {
            task.description = d.clone();
        }
        if let Some(m) = self.estimated_minutes {
            task.estimated_minutes = m;
        }
        if let Some(m) = self.actual_minutes {
            task.actual_minutes = m;
        }
        if let Some(at) = self.completed_at {
            task.completed_at = Some(at);
        }
        if let Some(ref n) = self.notes {
            task.notes = Some(n.clone());
        }
        if let Some(ref tags) = self.tags {
            task.tags = tags.clone();
        }
    }
}
