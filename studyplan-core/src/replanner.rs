//! Adaptive replanner: task updates, completion feedback and difficulty escalation.
//!
//! Every mutation is followed by a full re-derivation of the touched
//! schedule's counters and of the preparation-level progress.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::schedule::{DailySchedule, TestPreparation};
use crate::task::{TaskPatch, TaskStatus, TaskType};

/// Multiplier applied to pending estimates after "hard" feedback.
pub const DEFAULT_ESCALATION_FACTOR: f64 = 1.25;

/// Result of a lookup-by-id mutation. Misses leave state unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOutcome {
    Applied,
    ScheduleNotFound,
    TaskNotFound,
}

impl UpdateOutcome {
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialFeeling {
    Easy,
    Normal,
    Hard,
}

impl MaterialFeeling {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "normal" => Some(Self::Normal),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Normal => "normal",
            Self::Hard => "hard",
        }
    }
}

/// User feedback captured when a task is marked complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionFeedback {
    pub actual_minutes: i32,
    /// Free text, e.g. "struggled" / "satisfied" / "great".
    pub feeling_about_progress: String,
    pub feeling_about_material: MaterialFeeling,
}

impl CompletionFeedback {
    pub fn notes(&self) -> String {
        format!(
            "Progress: {}. Material felt {}.",
            self.feeling_about_progress,
            self.feeling_about_material.as_str()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplanPolicy {
    #[serde(default = "default_escalation_factor")]
    pub escalation_factor: f64,
    /// Optional ceiling on escalated estimates. `None` compounds without bound.
    #[serde(default)]
    pub max_estimated_minutes: Option<i32>,
}

fn default_escalation_factor() -> f64 {
    DEFAULT_ESCALATION_FACTOR
}

impl Default for ReplanPolicy {
    fn default() -> Self {
        Self {
            escalation_factor: DEFAULT_ESCALATION_FACTOR,
            max_estimated_minutes: None,
        }
    }
}

impl ReplanPolicy {
    pub fn escalate(&self, minutes: i32) -> i32 {
        let next = (f64::from(minutes) * self.escalation_factor).round() as i32;
        match self.max_estimated_minutes {
            // Never shrink an estimate that was already above the cap.
            Some(cap) => next.min(cap.max(minutes)),
            None => next,
        }
    }
}

/// Apply a shallow patch to one task and re-derive aggregates.
pub fn update_task(
    schedules: &mut [DailySchedule],
    prep: &mut TestPreparation,
    schedule_id: &str,
    task_id: &str,
    patch: &TaskPatch,
) -> UpdateOutcome {
    let Some(schedule) = schedules.iter_mut().find(|s| s.id == schedule_id) else {
        debug!(schedule_id, "update_task: schedule not found");
        return UpdateOutcome::ScheduleNotFound;
    };
    let Some(task) = schedule.task_mut(task_id) else {
        debug!(schedule_id, task_id, "update_task: task not found");
        return UpdateOutcome::TaskNotFound;
    };

    patch.apply_to(task);
    schedule.recompute();
    prep.recompute(schedules);
    UpdateOutcome::Applied
}

/// Mark a task completed with feedback; on "hard" feedback escalate every
/// pending task sharing its unit or its task type.
pub fn complete_task_with_feedback(
    schedules: &mut [DailySchedule],
    prep: &mut TestPreparation,
    schedule_id: &str,
    task_id: &str,
    feedback: &CompletionFeedback,
    policy: &ReplanPolicy,
    now: DateTime<Utc>,
) -> UpdateOutcome {
    let Some(schedule) = schedules.iter_mut().find(|s| s.id == schedule_id) else {
        return UpdateOutcome::ScheduleNotFound;
    };
    let Some(task) = schedule.task_mut(task_id) else {
        return UpdateOutcome::TaskNotFound;
    };

    task.status = TaskStatus::Completed;
    task.actual_minutes = feedback.actual_minutes;
    task.notes = Some(feedback.notes());
    task.completed_at = Some(now);
    let unit_id = task.unit_id.clone();
    let task_type = task.task_type;

    if feedback.feeling_about_material == MaterialFeeling::Hard {
        let n = escalate_pending(schedules, &unit_id, task_type, policy);
        info!(unit = %unit_id, ?task_type, escalated = n, "hard feedback: raised pending estimates");
    }

    for s in schedules.iter_mut() {
        s.recompute();
    }
    prep.recompute(schedules);
    UpdateOutcome::Applied
}

/// Multiply the estimate of every pending task whose unit OR type matches.
/// Returns how many tasks changed.
pub fn escalate_pending(
    schedules: &mut [DailySchedule],
    unit_id: &str,
    task_type: TaskType,
    policy: &ReplanPolicy,
) -> usize {
    let mut changed = 0;
    for task in schedules.iter_mut().flat_map(|s| s.tasks.iter_mut()) {
        if task.status != TaskStatus::Pending {
            continue;
        }
        if task.unit_id != unit_id && task.task_type != task_type {
            continue;
        }
        let before = task.estimated_minutes;
        task.estimated_minutes = policy.escalate(before);
        if task.estimated_minutes != before {
            changed += 1;
        }
    }
    changed
}
