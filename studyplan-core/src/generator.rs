//! Schedule generator: greedy sequential bin-packing of units into study days.

use chrono::{Duration, NaiveDate};
use tracing::debug;
use uuid::Uuid;

use crate::schedule::{DailySchedule, ScheduleStatus, TestPreparation};
use crate::task::{MaterialReference, Task, TaskStatus, TaskType};
use crate::unit::Unit;

/// Number of days available for study: whole days until the test minus the buffer.
pub fn study_days(today: NaiveDate, test_date: NaiveDate, buffer_days: i32) -> i64 {
    (test_date - today).num_days() - i64::from(buffer_days.max(0))
}

/// Build the day-by-day schedule for `prep`.
///
/// Algorithm (deterministic, no reordering):
/// 1) treat `units` (by `order`) as one concatenated timeline of minutes
/// 2) walk forward one day at a time from `today`, with `daily_minutes` of budget
/// 3) take min(budget left, unit minutes left) from the current unit as one task
/// 4) advance to the next unit when the current one is exhausted
/// 5) emit a day only if it received at least one task
///
/// Degenerate inputs (no units, no study days, no budget) produce an empty schedule.
pub fn generate(
    prep: &TestPreparation,
    units: &[Unit],
    daily_minutes: i32,
    buffer_days: i32,
    today: NaiveDate,
) -> Vec<DailySchedule> {
    let days = study_days(today, prep.test_date, buffer_days);
    if units.is_empty() || days <= 0 || daily_minutes <= 0 {
        debug!(units = units.len(), days, daily_minutes, "nothing to schedule");
        return vec![];
    }

    let mut ordered: Vec<&Unit> = units.iter().collect();
    ordered.sort_by_key(|u| u.order);

    let mut schedules = Vec::new();
    let mut unit_idx = 0usize;
    let mut unit_left = ordered[0].estimated_minutes.max(0);

    for day in 0..days {
        if unit_idx >= ordered.len() {
            break;
        }

        let schedule_id = Uuid::new_v4().to_string();
        let mut budget = daily_minutes;
        let mut tasks = Vec::new();

        while budget > 0 && unit_idx < ordered.len() {
            let unit = ordered[unit_idx];
            let slice = budget.min(unit_left);

            if slice > 0 {
                tasks.push(slice_task(&schedule_id, unit, slice));
                budget -= slice;
                unit_left -= slice;
            }

            // Zero-minute units fall straight through here.
            if unit_left <= 0 {
                unit_idx += 1;
                unit_left = ordered
                    .get(unit_idx)
                    .map(|u| u.estimated_minutes.max(0))
                    .unwrap_or(0);
            }
        }

        if tasks.is_empty() {
            continue;
        }

        let total_tasks = tasks.len();
        schedules.push(DailySchedule {
            id: schedule_id,
            test_prep_id: prep.id.clone(),
            date: today + Duration::days(day),
            total_estimated_minutes: daily_minutes - budget,
            tasks,
            completed_tasks: 0,
            total_tasks,
            actual_minutes_spent: 0,
            status: if schedules.is_empty() {
                ScheduleStatus::Active
            } else {
                ScheduleStatus::Upcoming
            },
        });
    }

    debug!(
        prep = %prep.id,
        days = schedules.len(),
        available_days = days,
        "generated schedule"
    );
    schedules
}

fn slice_task(schedule_id: &str, unit: &Unit, minutes: i32) -> Task {
    Task {
        id: Uuid::new_v4().to_string(),
        schedule_id: schedule_id.to_string(),
        unit_id: unit.id.clone(),
        task_type: TaskType::Read,
        description: format!("Study {}", unit.title),
        material_references: unit
            .material_ids
            .iter()
            .map(MaterialReference::new)
            .collect(),
        estimated_minutes: minutes,
        actual_minutes: 0,
        status: TaskStatus::Pending,
        completed_at: None,
        notes: None,
        tags: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    fn prep_in(days: i64) -> TestPreparation {
        TestPreparation::new("Final", today() + Duration::days(days), Utc::now())
    }

    fn minutes(s: &DailySchedule) -> Vec<i32> {
        s.tasks.iter().map(|t| t.estimated_minutes).collect()
    }

    #[test]
    fn splits_units_across_day_boundaries() {
        let units = vec![Unit::new("u1", "Kinetics", 1, 100), Unit::new("u2", "Equilibrium", 2, 50)];
        // 3 study days + 2 buffer
        let out = generate(&prep_in(5), &units, 60, 2, today());

        assert_eq!(out.len(), 3);
        assert_eq!(minutes(&out[0]), vec![60]);
        assert_eq!(minutes(&out[1]), vec![40, 20]);
        assert_eq!(minutes(&out[2]), vec![30]);
        assert_eq!(out[1].tasks[0].unit_id, "u1");
        assert_eq!(out[1].tasks[1].unit_id, "u2");
        assert_eq!(out[2].total_estimated_minutes, 30);
    }

    #[test]
    fn first_day_active_rest_upcoming_and_dates_consecutive() {
        let units = vec![Unit::new("u1", "A", 1, 200)];
        let out = generate(&prep_in(10), &units, 60, 0, today());

        assert_eq!(out.len(), 4);
        assert_eq!(out[0].status, ScheduleStatus::Active);
        assert!(out[1..].iter().all(|s| s.status == ScheduleStatus::Upcoming));
        for (i, s) in out.iter().enumerate() {
            assert_eq!(s.date, today() + Duration::days(i as i64));
            assert!(s.tasks.iter().all(|t| t.schedule_id == s.id));
        }
    }

    #[test]
    fn empty_units_or_no_days_yield_nothing() {
        assert!(generate(&prep_in(5), &[], 60, 2, today()).is_empty());

        let units = vec![Unit::new("u1", "A", 1, 30)];
        assert!(generate(&prep_in(2), &units, 60, 2, today()).is_empty());
        assert!(generate(&prep_in(1), &units, 60, 3, today()).is_empty());
        assert!(generate(&prep_in(-4), &units, 60, 0, today()).is_empty());
    }

    #[test]
    fn zero_minute_units_are_skipped_without_stalling() {
        let units = vec![
            Unit::new("u0", "Empty", 1, 0),
            Unit::new("u1", "A", 2, 30),
            Unit::new("u2", "Also empty", 3, 0),
            Unit::new("u3", "B", 4, 30),
        ];
        let out = generate(&prep_in(3), &units, 90, 0, today());

        assert_eq!(out.len(), 1);
        let ids: Vec<_> = out[0].tasks.iter().map(|t| t.unit_id.as_str()).collect();
        assert_eq!(ids, vec!["u1", "u3"]);
    }

    #[test]
    fn stops_at_day_limit_even_with_work_left() {
        let units = vec![Unit::new("u1", "A", 1, 500)];
        let out = generate(&prep_in(3), &units, 60, 1, today());
        assert_eq!(out.len(), 2);
        let scheduled: i32 = out.iter().flat_map(|s| s.tasks.iter()).map(|t| t.estimated_minutes).sum();
        assert_eq!(scheduled, 120);
    }

    #[test]
    fn consumes_by_order_field_and_references_materials() {
        let units = vec![
            Unit::new("late", "Later", 2, 20).with_materials(["m2"]),
            Unit::new("early", "Earlier", 1, 20).with_materials(["m1", "m3"]),
        ];
        let out = generate(&prep_in(4), &units, 60, 0, today());

        assert_eq!(out[0].tasks[0].unit_id, "early");
        assert_eq!(out[0].tasks[0].description, "Study Earlier");
        assert_eq!(out[0].tasks[0].material_references.len(), 2);
        assert_eq!(out[0].tasks[1].material_references[0].material_id, "m2");
        assert!(out[0].tasks[0].material_references[0].page_range.is_none());
    }
}
