//! Study store: the single state-update entry point.
//!
//! All mutations go through `StudyStore::apply` so that aggregate
//! recomputation can never be skipped by a caller.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::generator::generate;
use crate::preferences::UserPreferences;
use crate::replanner::{
    CompletionFeedback, ReplanPolicy, UpdateOutcome, complete_task_with_feedback, update_task,
};
use crate::schedule::{DailySchedule, PrepStatus, TestPreparation};
use crate::session::StudySession;
use crate::task::{Task, TaskPatch, TaskStatus};
use crate::unit::Unit;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("no test preparation exists yet")]
    NoPreparation,

    #[error("a study session is already running for task {0}")]
    SessionInProgress(String),

    #[error("no study session to {0}")]
    NoActiveSession(&'static str),

    #[error("only pending tasks can be started (task is {0:?})")]
    TaskNotPending(TaskStatus),

    #[error("task is already closed ({0:?})")]
    TaskClosed(TaskStatus),
}

/// Commands accepted by `StudyStore::apply`.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreatePreparation {
        name: String,
        test_date: NaiveDate,
        today: NaiveDate,
    },
    SetUnits {
        units: Vec<Unit>,
        today: NaiveDate,
    },
    Regenerate {
        today: NaiveDate,
    },
    StartTask {
        schedule_id: String,
        task_id: String,
    },
    PauseSession,
    ResumeSession,
    EndSession,
    CompleteTask {
        schedule_id: String,
        task_id: String,
        feedback: CompletionFeedback,
    },
    UpdateTask {
        schedule_id: String,
        task_id: String,
        patch: TaskPatch,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudyStore {
    #[serde(default)]
    pub preferences: UserPreferences,
    #[serde(default)]
    pub policy: ReplanPolicy,
    pub test_prep: Option<TestPreparation>,
    #[serde(default)]
    pub units: Vec<Unit>,
    #[serde(default)]
    pub schedules: Vec<DailySchedule>,
    #[serde(default)]
    pub session: Option<StudySession>,
}

impl StudyStore {
    pub fn new(preferences: UserPreferences, policy: ReplanPolicy) -> Self {
        Self {
            preferences,
            policy,
            ..Self::default()
        }
    }

    /// Find a task by id (or unique id prefix) across all schedules.
    pub fn find_task(&self, id_or_prefix: &str) -> Option<(&DailySchedule, &Task)> {
        if let Some(hit) = self
            .schedules
            .iter()
            .find_map(|s| s.task(id_or_prefix).map(|t| (s, t)))
        {
            return Some(hit);
        }
        let mut hits = self.schedules.iter().flat_map(|s| {
            s.tasks
                .iter()
                .filter(|t| t.id.starts_with(id_or_prefix))
                .map(move |t| (s, t))
        });
        let first = hits.next()?;
        if hits.next().is_some() {
            return None;
        }
        Some(first)
    }

    pub fn apply(&mut self, cmd: Command, now: DateTime<Utc>) -> Result<UpdateOutcome, StoreError> {
        debug!(?cmd, "apply");
        match cmd {
            Command::CreatePreparation {
                name,
                test_date,
                today,
            } => {
                self.test_prep = Some(TestPreparation::new(name, test_date, now));
                self.session = None;
                self.regenerate(today)
            }
            Command::SetUnits { units, today } => {
                self.units = units;
                if self.test_prep.is_some() {
                    self.regenerate(today)
                } else {
                    Ok(UpdateOutcome::Applied)
                }
            }
            Command::Regenerate { today } => self.regenerate(today),
            Command::StartTask {
                schedule_id,
                task_id,
            } => {
                if let Some(s) = self.session.as_ref().filter(|s| s.is_open()) {
                    return Err(StoreError::SessionInProgress(s.task_id.clone()));
                }
                if let Some(status) = self
                    .task_status(&schedule_id, &task_id)
                    .filter(|s| *s != TaskStatus::Pending)
                {
                    return Err(StoreError::TaskNotPending(status));
                }
                let outcome = self.update(
                    &schedule_id,
                    &task_id,
                    &TaskPatch::status(TaskStatus::InProgress),
                )?;
                if outcome.is_applied() {
                    self.session = Some(StudySession::start(task_id, now));
                }
                Ok(outcome)
            }
            Command::PauseSession => self.with_session("pause", |s| s.pause(now)),
            Command::ResumeSession => self.with_session("resume", |s| s.resume(now)),
            Command::EndSession => self.with_session("end", |s| s.end(now)),
            Command::CompleteTask {
                schedule_id,
                task_id,
                feedback,
            } => {
                // Pending is accepted too: a task can be completed without a session.
                if let Some(status) = self
                    .task_status(&schedule_id, &task_id)
                    .filter(|s| !matches!(s, TaskStatus::Pending | TaskStatus::InProgress))
                {
                    return Err(StoreError::TaskClosed(status));
                }
                let policy = self.policy;
                let prep = self.test_prep.as_mut().ok_or(StoreError::NoPreparation)?;
                let outcome = complete_task_with_feedback(
                    &mut self.schedules,
                    prep,
                    &schedule_id,
                    &task_id,
                    &feedback,
                    &policy,
                    now,
                );
                if outcome.is_applied() {
                    if let Some(s) = self.session.as_mut().filter(|s| s.task_id == task_id) {
                        s.end(now);
                    }
                    self.refresh_prep_status();
                }
                Ok(outcome)
            }
            Command::UpdateTask {
                schedule_id,
                task_id,
                patch,
            } => self.update(&schedule_id, &task_id, &patch),
        }
    }

    /// `None` when either id is unknown; the replanner reports which one.
    fn task_status(&self, schedule_id: &str, task_id: &str) -> Option<TaskStatus> {
        self.schedules
            .iter()
            .find(|s| s.id == schedule_id)?
            .task(task_id)
            .map(|t| t.status)
    }

    fn update(
        &mut self,
        schedule_id: &str,
        task_id: &str,
        patch: &TaskPatch,
    ) -> Result<UpdateOutcome, StoreError> {
        let prep = self.test_prep.as_mut().ok_or(StoreError::NoPreparation)?;
        let outcome = update_task(&mut self.schedules, prep, schedule_id, task_id, patch);
        if outcome.is_applied() {
            self.refresh_prep_status();
        }
        Ok(outcome)
    }

    fn regenerate(&mut self, today: NaiveDate) -> Result<UpdateOutcome, StoreError> {
        let prep = self.test_prep.as_mut().ok_or(StoreError::NoPreparation)?;
        self.schedules = generate(
            prep,
            &self.units,
            self.preferences.daily_minutes(),
            self.preferences.buffer_days(),
            today,
        );
        prep.recompute(&self.schedules);
        prep.status = if self.schedules.is_empty() {
            PrepStatus::Planning
        } else {
            PrepStatus::Active
        };
        info!(
            prep = %prep.id,
            days = self.schedules.len(),
            minutes = prep.total_estimated_minutes,
            "schedule regenerated"
        );
        Ok(UpdateOutcome::Applied)
    }

    fn with_session(
        &mut self,
        verb: &'static str,
        f: impl FnOnce(&mut StudySession) -> bool,
    ) -> Result<UpdateOutcome, StoreError> {
        let Some(session) = self.session.as_mut() else {
            return Err(StoreError::NoActiveSession(verb));
        };
        if f(session) {
            Ok(UpdateOutcome::Applied)
        } else {
            Err(StoreError::NoActiveSession(verb))
        }
    }

    fn refresh_prep_status(&mut self) {
        if let Some(prep) = self.test_prep.as_mut() {
            if prep.progress_percentage >= 100 {
                prep.status = PrepStatus::Completed;
            } else if prep.status == PrepStatus::Completed {
                prep.status = PrepStatus::Active;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replanner::MaterialFeeling;
    use crate::session::SessionStatus;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 15, 0, 0).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    fn store_with_plan() -> StudyStore {
        let mut prefs = UserPreferences::default();
        prefs.intensity_level = crate::preferences::IntensityLevel::Custom;
        prefs.custom_daily_minutes = Some(60);
        prefs.buffer_days = 2;

        let mut store = StudyStore::new(prefs, ReplanPolicy::default());
        store
            .apply(
                Command::SetUnits {
                    units: vec![Unit::new("u1", "Optics", 1, 100), Unit::new("u2", "Waves", 2, 50)],
                    today: today(),
                },
                now(),
            )
            .unwrap();
        store
            .apply(
                Command::CreatePreparation {
                    name: "Physics II".into(),
                    test_date: today() + Duration::days(5),
                    today: today(),
                },
                now(),
            )
            .unwrap();
        store
    }

    fn first_task(store: &StudyStore) -> (String, String) {
        let s = &store.schedules[0];
        (s.id.clone(), s.tasks[0].id.clone())
    }

    #[test]
    fn create_preparation_generates_schedule() {
        let store = store_with_plan();
        let prep = store.test_prep.as_ref().unwrap();
        assert_eq!(store.schedules.len(), 3);
        assert_eq!(prep.status, PrepStatus::Active);
        assert_eq!(prep.total_estimated_minutes, 150);
        assert_eq!(prep.progress_percentage, 0);
    }

    #[test]
    fn start_then_complete_ends_session() {
        let mut store = store_with_plan();
        let (sid, tid) = first_task(&store);

        store
            .apply(
                Command::StartTask {
                    schedule_id: sid.clone(),
                    task_id: tid.clone(),
                },
                now(),
            )
            .unwrap();
        assert_eq!(store.schedules[0].tasks[0].status, TaskStatus::InProgress);

        let err = store
            .apply(
                Command::StartTask {
                    schedule_id: sid.clone(),
                    task_id: tid.clone(),
                },
                now(),
            )
            .unwrap_err();
        assert_eq!(err, StoreError::SessionInProgress(tid.clone()));

        let out = store
            .apply(
                Command::CompleteTask {
                    schedule_id: sid,
                    task_id: tid,
                    feedback: CompletionFeedback {
                        actual_minutes: 70,
                        feeling_about_progress: "satisfied".into(),
                        feeling_about_material: MaterialFeeling::Hard,
                    },
                },
                now() + Duration::minutes(70),
            )
            .unwrap();
        assert_eq!(out, UpdateOutcome::Applied);

        let session = store.session.as_ref().unwrap();
        assert_eq!(session.status, SessionStatus::Completed);
        assert_eq!(session.duration_minutes, 70);

        // remaining u1 slice (40) escalates, as does every pending read task
        assert_eq!(store.schedules[1].tasks[0].estimated_minutes, 50);
        assert_eq!(store.schedules[1].tasks[1].estimated_minutes, 25);
        assert_eq!(store.schedules[0].status, crate::schedule::ScheduleStatus::Completed);
        assert_eq!(store.test_prep.as_ref().unwrap().progress_percentage, 25);
    }

    #[test]
    fn session_commands_without_session_fail() {
        let mut store = store_with_plan();
        assert_eq!(
            store.apply(Command::PauseSession, now()),
            Err(StoreError::NoActiveSession("pause"))
        );
    }

    #[test]
    fn update_without_preparation_is_an_error() {
        let mut store = StudyStore::default();
        let err = store
            .apply(
                Command::UpdateTask {
                    schedule_id: "s".into(),
                    task_id: "t".into(),
                    patch: TaskPatch::status(TaskStatus::Skipped),
                },
                now(),
            )
            .unwrap_err();
        assert_eq!(err, StoreError::NoPreparation);
    }

    #[test]
    fn completing_everything_completes_preparation() {
        let mut store = store_with_plan();
        let keys: Vec<(String, String)> = store
            .schedules
            .iter()
            .flat_map(|s| s.tasks.iter().map(move |t| (s.id.clone(), t.id.clone())))
            .collect();
        for (sid, tid) in keys {
            store
                .apply(
                    Command::CompleteTask {
                        schedule_id: sid,
                        task_id: tid,
                        feedback: CompletionFeedback {
                            actual_minutes: 10,
                            feeling_about_progress: "great".into(),
                            feeling_about_material: MaterialFeeling::Easy,
                        },
                    },
                    now(),
                )
                .unwrap();
        }
        let prep = store.test_prep.as_ref().unwrap();
        assert_eq!(prep.progress_percentage, 100);
        assert_eq!(prep.status, PrepStatus::Completed);
        assert_eq!(prep.completed_minutes, 40);
    }

    fn hard_feedback(minutes: i32) -> CompletionFeedback {
        CompletionFeedback {
            actual_minutes: minutes,
            feeling_about_progress: "struggled".into(),
            feeling_about_material: MaterialFeeling::Hard,
        }
    }

    #[test]
    fn start_rejects_completed_and_skipped_tasks() {
        let mut store = store_with_plan();
        let (sid, tid) = first_task(&store);
        store
            .apply(
                Command::CompleteTask {
                    schedule_id: sid.clone(),
                    task_id: tid.clone(),
                    feedback: hard_feedback(60),
                },
                now(),
            )
            .unwrap();
        let skipped_sid = store.schedules[2].id.clone();
        let skipped_tid = store.schedules[2].tasks[0].id.clone();
        store
            .apply(
                Command::UpdateTask {
                    schedule_id: skipped_sid.clone(),
                    task_id: skipped_tid.clone(),
                    patch: TaskPatch::status(TaskStatus::Skipped),
                },
                now(),
            )
            .unwrap();
        let before = store.clone();

        let err = store
            .apply(
                Command::StartTask {
                    schedule_id: sid,
                    task_id: tid,
                },
                now(),
            )
            .unwrap_err();
        assert_eq!(err, StoreError::TaskNotPending(TaskStatus::Completed));

        let err = store
            .apply(
                Command::StartTask {
                    schedule_id: skipped_sid,
                    task_id: skipped_tid,
                },
                now(),
            )
            .unwrap_err();
        assert_eq!(err, StoreError::TaskNotPending(TaskStatus::Skipped));

        assert_eq!(store, before);
        assert!(store.session.is_none());
        assert_eq!(store.schedules[0].tasks[0].status, TaskStatus::Completed);
        assert_eq!(store.test_prep.as_ref().unwrap().progress_percentage, 25);
    }

    #[test]
    fn second_hard_completion_does_not_compound() {
        let mut store = store_with_plan();
        let (sid, tid) = first_task(&store);
        let complete = |store: &mut StudyStore| {
            store.apply(
                Command::CompleteTask {
                    schedule_id: sid.clone(),
                    task_id: tid.clone(),
                    feedback: hard_feedback(60),
                },
                now(),
            )
        };

        assert_eq!(complete(&mut store), Ok(UpdateOutcome::Applied));
        assert_eq!(store.schedules[1].tasks[0].estimated_minutes, 50);
        let before = store.clone();

        assert_eq!(
            complete(&mut store),
            Err(StoreError::TaskClosed(TaskStatus::Completed))
        );
        assert_eq!(store, before);
        assert_eq!(store.schedules[1].tasks[0].estimated_minutes, 50);
    }

    #[test]
    fn start_and_complete_on_unknown_task_report_not_found() {
        let mut store = store_with_plan();
        let sid = store.schedules[0].id.clone();
        let out = store
            .apply(
                Command::StartTask {
                    schedule_id: sid.clone(),
                    task_id: "missing".into(),
                },
                now(),
            )
            .unwrap();
        assert_eq!(out, UpdateOutcome::TaskNotFound);
        assert!(store.session.is_none());

        let out = store
            .apply(
                Command::CompleteTask {
                    schedule_id: "missing".into(),
                    task_id: "missing".into(),
                    feedback: hard_feedback(10),
                },
                now(),
            )
            .unwrap();
        assert_eq!(out, UpdateOutcome::ScheduleNotFound);
    }

    #[test]
    fn find_task_accepts_unique_prefix() {
        let store = store_with_plan();
        let (_, tid) = first_task(&store);
        let (s, t) = store.find_task(&tid[..8]).unwrap();
        assert_eq!(t.id, tid);
        assert_eq!(s.id, store.schedules[0].id);
        assert!(store.find_task("").is_none());
    }
}
