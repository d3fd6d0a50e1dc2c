//! Study sessions: timing for the task currently being worked on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Paused,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudySession {
    pub id: String,
    pub task_id: String,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
    /// Worked minutes (elapsed minus paused), filled in on `end`.
    pub duration_minutes: i64,
    /// Length in minutes of each closed pause.
    #[serde(default)]
    pub paused_durations: Vec<i64>,
    #[serde(default)]
    paused_at: Option<DateTime<Utc>>,
    pub status: SessionStatus,
}

impl StudySession {
    pub fn start(task_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            task_id: task_id.into(),
            started_at: now,
            ended_at: None,
            duration_minutes: 0,
            paused_durations: Vec::new(),
            paused_at: None,
            status: SessionStatus::Active,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status != SessionStatus::Completed
    }

    pub fn pause(&mut self, now: DateTime<Utc>) -> bool {
        if self.status != SessionStatus::Active {
            return false;
        }
        self.status = SessionStatus::Paused;
        self.paused_at = Some(now);
        true
    }

    pub fn resume(&mut self, now: DateTime<Utc>) -> bool {
        if self.status != SessionStatus::Paused {
            return false;
        }
        self.close_pause(now);
        self.status = SessionStatus::Active;
        true
    }

    pub fn end(&mut self, now: DateTime<Utc>) -> bool {
        if !self.is_open() {
            return false;
        }
        self.close_pause(now);
        let elapsed = (now - self.started_at).num_minutes();
        let paused: i64 = self.paused_durations.iter().sum();
        self.duration_minutes = (elapsed - paused).max(0);
        self.ended_at = Some(now);
        self.status = SessionStatus::Completed;
        true
    }

    fn close_pause(&mut self, now: DateTime<Utc>) {
        if let Some(at) = self.paused_at.take() {
            self.paused_durations.push((now - at).num_minutes().max(0));
        }
    }
}
