//! studyplan-core: schedule generation and adaptive replanning for test preparation.

pub mod analytics;
pub mod generator;
pub mod preferences;
pub mod replanner;
pub mod schedule;
pub mod session;
pub mod store;
pub mod task;
pub mod time;
pub mod unit;

pub use analytics::StudyStats;
pub use generator::{generate, study_days};
pub use preferences::{IntensityLevel, UserPreferences};
pub use replanner::{
    CompletionFeedback, MaterialFeeling, ReplanPolicy, UpdateOutcome,
    complete_task_with_feedback, escalate_pending, update_task,
};
pub use schedule::{DailySchedule, PrepStatus, ScheduleStatus, TestPreparation, progress_percentage};
pub use session::{SessionStatus, StudySession};
pub use store::{Command, StoreError, StudyStore};
pub use task::{MaterialReference, Task, TaskPatch, TaskStatus, TaskType};
pub use time::{local_today, parse_test_date};
pub use unit::{DifficultyLevel, Unit, UnitStatus};
