//! Progress summary across all schedules.

use serde::{Deserialize, Serialize};

use crate::schedule::{DailySchedule, progress_percentage};

const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyStats {
    pub total_minutes: i32,
    pub tasks_completed: usize,
    pub tasks_scheduled: usize,
    pub completion_rate: u32,
    /// Schedule ids with any recorded activity, newest first.
    pub recent_schedule_ids: Vec<String>,
}

impl StudyStats {
    pub fn from_schedules(schedules: &[DailySchedule]) -> Self {
        let total_minutes = schedules.iter().map(|s| s.actual_minutes_spent).sum();
        let tasks_completed = schedules.iter().map(|s| s.completed_tasks).sum();
        let tasks_scheduled = schedules.iter().map(|s| s.total_tasks).sum();

        let mut recent: Vec<&DailySchedule> = schedules
            .iter()
            .filter(|s| s.actual_minutes_spent > 0 || s.completed_tasks > 0)
            .collect();
        recent.sort_by(|a, b| b.date.cmp(&a.date));

        Self {
            total_minutes,
            tasks_completed,
            tasks_scheduled,
            completion_rate: progress_percentage(tasks_completed, tasks_scheduled),
            recent_schedule_ids: recent
                .into_iter()
                .take(RECENT_LIMIT)
                .map(|s| s.id.clone())
                .collect(),
        }
    }

    /// "3h 5m" style rendering of `total_minutes`.
    pub fn total_time_label(&self) -> String {
        format!("{}h {}m", self.total_minutes / 60, self.total_minutes % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ScheduleStatus;
    use chrono::{Duration, NaiveDate};

    fn day(id: &str, offset: i64, completed: usize, total: usize, minutes: i32) -> DailySchedule {
        DailySchedule {
            id: id.into(),
            test_prep_id: "p1".into(),
            date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap() + Duration::days(offset),
            total_estimated_minutes: 0,
            tasks: vec![],
            completed_tasks: completed,
            total_tasks: total,
            actual_minutes_spent: minutes,
            status: ScheduleStatus::Upcoming,
        }
    }

    #[test]
    fn summarizes_and_orders_recent_activity() {
        let schedules = vec![
            day("d0", 0, 2, 2, 95),
            day("d1", 1, 1, 3, 30),
            day("d2", 2, 0, 2, 0),
        ];
        let stats = StudyStats::from_schedules(&schedules);

        assert_eq!(stats.total_minutes, 125);
        assert_eq!(stats.tasks_completed, 3);
        assert_eq!(stats.tasks_scheduled, 7);
        assert_eq!(stats.completion_rate, 43);
        assert_eq!(stats.recent_schedule_ids, vec!["d1", "d0"]);
        assert_eq!(stats.total_time_label(), "2h 5m");
    }

    #[test]
    fn empty_is_zero() {
        let stats = StudyStats::from_schedules(&[]);
        assert_eq!(stats.completion_rate, 0);
        assert!(stats.recent_schedule_ids.is_empty());
    }
}
