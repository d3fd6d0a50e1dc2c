//! Plain-text rendering of schedules and stats for the terminal.

use std::fmt::Write;
use studyplan_core::{DailySchedule, StudyStats, StudyStore, Task, TaskStatus};

fn status_mark(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "[ ]",
        TaskStatus::InProgress => "[>]",
        TaskStatus::Completed => "[x]",
        TaskStatus::PartiallyCompleted => "[~]",
        TaskStatus::Skipped => "[-]",
    }
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

pub fn task_line(task: &Task) -> String {
    let mut line = format!(
        "{} {}  {}  ~{}m",
        status_mark(task.status),
        short_id(&task.id),
        task.description,
        task.estimated_minutes
    );
    if task.status == TaskStatus::Completed {
        let _ = write!(line, " (took {}m)", task.actual_minutes);
    }
    if task.is_essential() {
        line.push_str(" *essential*");
    }
    line
}

pub fn schedule_block(s: &DailySchedule) -> String {
    let mut out = format!(
        "{}  {:?}  {}/{} tasks  {}m planned, {}m spent\n",
        s.date, s.status, s.completed_tasks, s.total_tasks, s.total_estimated_minutes, s.actual_minutes_spent
    );
    for t in &s.tasks {
        let _ = writeln!(out, "  {}", task_line(t));
    }
    out
}

pub fn prep_header(store: &StudyStore) -> String {
    match &store.test_prep {
        Some(p) => format!(
            "# {} on {} ({:?})\nProgress: {}%  |  {}m of {}m studied\n",
            p.test_name,
            p.test_date,
            p.status,
            p.progress_percentage,
            p.completed_minutes,
            p.total_estimated_minutes
        ),
        None => "No test preparation yet. Run: studyplan plan --name <test> --date <YYYY-MM-DD>\n"
            .to_string(),
    }
}

pub fn stats_block(stats: &StudyStats, schedules: &[DailySchedule]) -> String {
    let mut out = format!(
        "Total study time: {}\nTasks completed: {} of {}\nCompletion rate: {}%\n",
        stats.total_time_label(),
        stats.tasks_completed,
        stats.tasks_scheduled,
        stats.completion_rate
    );
    if !stats.recent_schedule_ids.is_empty() {
        out.push_str("\nRecent activity:\n");
    }
    for id in &stats.recent_schedule_ids {
        if let Some(s) = schedules.iter().find(|s| &s.id == id) {
            let _ = writeln!(
                out,
                "  {}  {}/{} tasks  {}m",
                s.date, s.completed_tasks, s.total_tasks, s.actual_minutes_spent
            );
        }
    }
    out
}
