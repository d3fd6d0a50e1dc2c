//! Daily schedules and the test preparation aggregate.
//!
//! Counts and minutes stored here are derived from the task lists. They are
//! always recomputed from scratch, never patched incrementally.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::task::{Task, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    Upcoming,
    Active,
    Completed,
    Partial,
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySchedule {
    pub id: String,
    pub test_prep_id: String,
    pub date: NaiveDate,
    pub total_estimated_minutes: i32,
    pub tasks: Vec<Task>,
    pub completed_tasks: usize,
    pub total_tasks: usize,
    pub actual_minutes_spent: i32,
    pub status: ScheduleStatus,
}

impl DailySchedule {
    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn task_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == task_id)
    }

    /// Re-derive counts, minutes and status from the task list.
    pub fn recompute(&mut self) {
        self.total_tasks = self.tasks.len();
        self.completed_tasks = self
            .tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .count();
        self.actual_minutes_spent = self.tasks.iter().map(|t| t.actual_minutes).sum();
        self.total_estimated_minutes = self.tasks.iter().map(|t| t.estimated_minutes).sum();
        self.status = derive_status(self.status, self.completed_tasks, self.total_tasks);
    }
}

/// Schedule status as a function of task completion.
///
/// With nothing completed the day keeps its temporal status (active/upcoming,
/// or skipped if set externally). A day that was completed/partial and has
/// dropped back to zero completions must have been started, so it is active.
pub fn derive_status(current: ScheduleStatus, completed: usize, total: usize) -> ScheduleStatus {
    if total > 0 && completed == total {
        return ScheduleStatus::Completed;
    }
    if completed > 0 && completed < total {
        return ScheduleStatus::Partial;
    }
    match current {
        ScheduleStatus::Completed | ScheduleStatus::Partial => ScheduleStatus::Active,
        other => other,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrepStatus {
    Planning,
    Active,
    Completed,
    Expired,
}

/// The overall campaign toward one test date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestPreparation {
    pub id: String,
    pub test_name: String,
    pub test_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub status: PrepStatus,
    pub total_estimated_minutes: i32,
    pub completed_minutes: i32,
    /// 0..=100.
    pub progress_percentage: u32,
}

impl TestPreparation {
    pub fn new(test_name: impl Into<String>, test_date: NaiveDate, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            test_name: test_name.into(),
            test_date,
            created_at: now,
            status: PrepStatus::Planning,
            total_estimated_minutes: 0,
            completed_minutes: 0,
            progress_percentage: 0,
        }
    }

    /// Re-derive totals and progress over every task of every schedule that
    /// belongs to this preparation.
    pub fn recompute(&mut self, schedules: &[DailySchedule]) {
        let tasks = schedules
            .iter()
            .filter(|s| s.test_prep_id == self.id)
            .flat_map(|s| s.tasks.iter());

        let mut total = 0usize;
        let mut completed = 0usize;
        let mut estimated = 0i32;
        let mut actual = 0i32;
        for t in tasks {
            total += 1;
            if t.status == TaskStatus::Completed {
                completed += 1;
            }
            estimated += t.estimated_minutes;
            actual += t.actual_minutes;
        }

        self.total_estimated_minutes = estimated;
        self.completed_minutes = actual;
        self.progress_percentage = progress_percentage(completed, total);
    }
}

/// `round(100 * completed / total)`, 0 when there is nothing to do.
pub fn progress_percentage(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total);
    // Integer round-half-up.
    ((200 * completed + total) / (2 * total)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Task;

    fn day(tasks: Vec<Task>) -> DailySchedule {
        DailySchedule {
            id: "s1".into(),
            test_prep_id: "p1".into(),
            date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            total_estimated_minutes: 0,
            total_tasks: tasks.len(),
            tasks,
            completed_tasks: 0,
            actual_minutes_spent: 0,
            status: ScheduleStatus::Upcoming,
        }
    }

    #[test]
    fn derive_status_follows_completion_counts() {
        assert_eq!(derive_status(ScheduleStatus::Upcoming, 0, 0), ScheduleStatus::Upcoming);
        assert_eq!(derive_status(ScheduleStatus::Active, 0, 3), ScheduleStatus::Active);
        assert_eq!(derive_status(ScheduleStatus::Active, 1, 3), ScheduleStatus::Partial);
        assert_eq!(derive_status(ScheduleStatus::Upcoming, 3, 3), ScheduleStatus::Completed);
        assert_eq!(derive_status(ScheduleStatus::Partial, 0, 3), ScheduleStatus::Active);
        assert_eq!(derive_status(ScheduleStatus::Skipped, 0, 2), ScheduleStatus::Skipped);
    }

    #[test]
    fn recompute_ignores_partially_completed_in_count() {
        let mut a = Task::new("a", "s1", "u1").with_status(TaskStatus::Completed);
        a.actual_minutes = 25;
        let mut b = Task::new("b", "s1", "u1").with_status(TaskStatus::PartiallyCompleted);
        b.actual_minutes = 10;
        let c = Task::new("c", "s1", "u1");

        let mut s = day(vec![a, b, c]);
        s.recompute();

        assert_eq!(s.completed_tasks, 1);
        assert_eq!(s.total_tasks, 3);
        assert_eq!(s.actual_minutes_spent, 35);
        assert_eq!(s.status, ScheduleStatus::Partial);
    }

    #[test]
    fn progress_rounds_half_up_and_stays_bounded() {
        assert_eq!(progress_percentage(0, 0), 0);
        assert_eq!(progress_percentage(1, 3), 33);
        assert_eq!(progress_percentage(2, 3), 67);
        assert_eq!(progress_percentage(1, 8), 13); // 12.5
        assert_eq!(progress_percentage(5, 5), 100);
    }

    #[test]
    fn prep_recompute_only_counts_own_schedules() {
        let now = Utc::now();
        let mut prep = TestPreparation::new("Chem", NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(), now);
        prep.id = "p1".into();

        let mut mine = day(vec![
            Task::new("a", "s1", "u1").with_status(TaskStatus::Completed),
            Task::new("b", "s1", "u1"),
        ]);
        mine.tasks[0].actual_minutes = 30;

        let mut other = day(vec![Task::new("x", "s2", "u9").with_status(TaskStatus::Completed)]);
        other.id = "s2".into();
        other.test_prep_id = "p2".into();

        prep.recompute(&[mine, other]);
        assert_eq!(prep.progress_percentage, 50);
        assert_eq!(prep.completed_minutes, 30);
        assert_eq!(prep.total_estimated_minutes, 60);
    }
}
