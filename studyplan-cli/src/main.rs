use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use studyplan_core::{
    Command as StoreCommand, CompletionFeedback, MaterialFeeling, StudyStats, StudyStore,
    TaskPatch, TaskStatus, Unit, UpdateOutcome, local_today, parse_test_date,
};
use studyplan_ingest::{parse_outline_text, parse_suggestion, parse_unit_manifest};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod render;
mod state;

#[derive(Parser, Debug)]
#[command(
    name = "studyplan",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("STUDYPLAN_BUILD_SHA"), ")"),
    about = "Day-by-day study schedules that adapt to how you are doing"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage ~/.studyplan/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Create a test preparation and generate its schedule
    Plan {
        /// Test name, e.g. "Organic Chemistry Midterm"
        #[arg(long)]
        name: String,

        /// Test date (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// Unit manifest CSV (title,order,estimated_minutes,material_ids,difficulty,topics)
        #[arg(long)]
        units: Option<PathBuf>,

        /// Material outline text (e.g. "Chapter 3: Entropy (pp. 45-80)" lines)
        #[arg(long)]
        outline: Option<PathBuf>,

        /// Material id referenced by outline units
        #[arg(long, default_value = "material")]
        material_id: String,

        /// Reading pace for outline units
        #[arg(long, default_value_t = studyplan_ingest::parsers::outline::DEFAULT_MINUTES_PER_PAGE)]
        minutes_per_page: i32,

        /// Saved AI study-plan reply; its focus areas become extra units
        #[arg(long)]
        advice: Option<PathBuf>,

        /// Minutes per focus-area unit from --advice
        #[arg(long, default_value_t = 60)]
        focus_minutes: i32,
    },

    /// Rebuild the schedule from the saved units (e.g. after a config change)
    Regenerate,

    /// Show today's schedule (or every day with --all)
    Show {
        #[arg(long, default_value_t = false)]
        all: bool,
    },

    /// Start a study session on a task (id or unique prefix)
    Start { task: String },

    /// Pause the running session
    Pause,

    /// Resume the paused session
    Resume,

    /// Mark a task complete with feedback
    Complete {
        task: String,

        /// Minutes actually spent (default: session time, else the estimate)
        #[arg(long)]
        minutes: Option<i32>,

        /// How progress felt (struggled / satisfied / great)
        #[arg(long, default_value = "satisfied")]
        progress: String,

        /// How the material felt: easy, normal or hard
        #[arg(long, default_value = "normal")]
        material: String,
    },

    /// Set a task's status directly (pending, in_progress, completed, partially_completed, skipped)
    SetStatus { task: String, status: String },

    /// Study time and completion summary
    Stats,

    /// Interpret a saved AI study-plan reply
    Advice { file: PathBuf },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config if none exists
    Init,
    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;
    init_logging(&cfg.log.filter);

    let store_path = state::store_path()?;
    let mut store = state::read_store(&store_path)?;
    store.preferences = cfg.preferences.clone();
    store.policy = cfg.replan;

    let now = Utc::now();
    let today = local_today(now, &store.preferences.timezone)?;

    match cli.command {
        Command::Config { command } => {
            match command {
                ConfigCommand::Init => config::init_config()?,
                ConfigCommand::Show => print!("{}", toml::to_string_pretty(&cfg)?),
            }
            return Ok(());
        }

        Command::Plan {
            name,
            date,
            units,
            outline,
            material_id,
            minutes_per_page,
            advice,
            focus_minutes,
        } => {
            let test_date = parse_test_date(&date)?;
            let collected = collect_units(
                units,
                outline.map(|p| (p, material_id, minutes_per_page)),
                advice.map(|p| (p, focus_minutes)),
            )?;
            if collected.is_empty() {
                println!("No units given; the preparation is created without a schedule.");
            }

            store.apply(StoreCommand::SetUnits { units: collected, today }, now)?;
            store.apply(
                StoreCommand::CreatePreparation {
                    name,
                    test_date,
                    today,
                },
                now,
            )?;

            print!("{}", render::prep_header(&store));
            println!(
                "{} study days at {}m/day ({} buffer days)\n",
                store.schedules.len(),
                store.preferences.daily_minutes(),
                store.preferences.buffer_days()
            );
            if let Some(first) = store.schedules.first() {
                print!("{}", render::schedule_block(first));
            }
        }

        Command::Regenerate => {
            store.apply(StoreCommand::Regenerate { today }, now)?;
            print!("{}", render::prep_header(&store));
            println!("{} study days", store.schedules.len());
        }

        Command::Show { all } => {
            print!("{}", render::prep_header(&store));
            println!();
            let days: Vec<_> = if all {
                store.schedules.iter().collect()
            } else {
                store.schedules.iter().filter(|s| s.date == today).collect()
            };
            if days.is_empty() {
                println!("No tasks scheduled for today.");
            }
            for s in days {
                println!("{}", render::schedule_block(s));
            }
            return Ok(());
        }

        Command::Start { task } => {
            let (schedule_id, task_id) = resolve_task(&store, &task)?;
            let outcome = store.apply(
                StoreCommand::StartTask {
                    schedule_id,
                    task_id,
                },
                now,
            )?;
            report(outcome, "started");
        }

        Command::Pause => {
            store.apply(StoreCommand::PauseSession, now)?;
            println!("Session paused.");
        }

        Command::Resume => {
            store.apply(StoreCommand::ResumeSession, now)?;
            println!("Session resumed.");
        }

        Command::Complete {
            task,
            minutes,
            progress,
            material,
        } => {
            let (schedule_id, task_id) = resolve_task(&store, &task)?;
            let Some(feeling) = MaterialFeeling::parse(&material) else {
                bail!("--material must be easy, normal or hard (got '{material}')");
            };
            let actual_minutes = match minutes {
                Some(m) => m,
                None => default_minutes(&store, &task_id, now),
            };

            let outcome = store.apply(
                StoreCommand::CompleteTask {
                    schedule_id,
                    task_id,
                    feedback: CompletionFeedback {
                        actual_minutes,
                        feeling_about_progress: progress,
                        feeling_about_material: feeling,
                    },
                },
                now,
            )?;
            report(outcome, "completed");
            if let Some(note) = escalation_note(outcome, feeling) {
                println!("{note}");
            }
            if let Some(p) = &store.test_prep {
                println!("Progress: {}%", p.progress_percentage);
            }
        }

        Command::SetStatus { task, status } => {
            let (schedule_id, task_id) = resolve_task(&store, &task)?;
            let Some(status) = TaskStatus::parse(&status) else {
                bail!("unknown status '{status}'");
            };
            let outcome = store.apply(
                StoreCommand::UpdateTask {
                    schedule_id,
                    task_id,
                    patch: TaskPatch::status(status),
                },
                now,
            )?;
            report(outcome, "updated");
        }

        Command::Stats => {
            print!("{}", render::prep_header(&store));
            let stats = StudyStats::from_schedules(&store.schedules);
            print!("{}", render::stats_block(&stats, &store.schedules));
            return Ok(());
        }

        Command::Advice { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("read {}", file.display()))?;
            let s = parse_suggestion(&raw);
            println!("Suggested daily minutes: {} ({:?})", s.daily_minutes, s.source);
            println!("Focus areas:");
            for a in &s.focus_areas {
                println!("- {a}");
            }
            println!("Techniques: {}", s.study_techniques.join(", "));
            println!("Timeline: {}", s.timeline);
            println!("\n{}", s.custom_recommendations);
            return Ok(());
        }
    }

    state::write_store(&store_path, &store)?;
    info!(path = %store_path.display(), "state saved");
    Ok(())
}

fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn collect_units(
    manifest: Option<PathBuf>,
    outline: Option<(PathBuf, String, i32)>,
    advice: Option<(PathBuf, i32)>,
) -> Result<Vec<Unit>> {
    let mut units = Vec::new();

    if let Some(path) = manifest {
        units.extend(parse_unit_manifest(&path)?);
    }
    if let Some((path, material_id, per_page)) = outline {
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("read {}", path.display()))?;
        units.extend(parse_outline_text(&text, &material_id, per_page)?);
    }
    if let Some((path, minutes)) = advice {
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("read {}", path.display()))?;
        units.extend(parse_suggestion(&raw).focus_units(minutes));
    }

    // Sources are concatenated in the order given; renumber so that holds.
    for (i, u) in units.iter_mut().enumerate() {
        u.order = i as u32 + 1;
    }
    Ok(units)
}

fn resolve_task(store: &StudyStore, id_or_prefix: &str) -> Result<(String, String)> {
    match store.find_task(id_or_prefix) {
        Some((s, t)) => Ok((s.id.clone(), t.id.clone())),
        None => bail!("no unique task matches '{id_or_prefix}' (see: studyplan show --all)"),
    }
}

/// Time from the running session on this task, else the task's estimate.
fn default_minutes(store: &StudyStore, task_id: &str, now: chrono::DateTime<Utc>) -> i32 {
    if let Some(session) = store
        .session
        .as_ref()
        .filter(|s| s.task_id == task_id && s.is_open())
    {
        let mut so_far = session.clone();
        so_far.end(now);
        return so_far.duration_minutes as i32;
    }
    store
        .find_task(task_id)
        .map(|(_, t)| t.estimated_minutes)
        .unwrap_or(0)
}

fn escalation_note(outcome: UpdateOutcome, feeling: MaterialFeeling) -> Option<&'static str> {
    (outcome.is_applied() && feeling == MaterialFeeling::Hard)
        .then_some("Upcoming estimates for this unit and task type were raised.")
}

fn report(outcome: UpdateOutcome, verb: &str) {
    match outcome {
        UpdateOutcome::Applied => println!("Task {verb}."),
        UpdateOutcome::ScheduleNotFound => println!("Schedule not found; nothing changed."),
        UpdateOutcome::TaskNotFound => println!("Task not found; nothing changed."),
    }
}
