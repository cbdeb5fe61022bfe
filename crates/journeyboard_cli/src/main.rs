//! Terminal front end for JourneyBoard.
//!
//! # Responsibility
//! - Parse flags and environment, open the on-disk store, mount the board.
//! - Run one use case per invocation and print JSON to stdout.
//! - Report memory-only (unsaved) outcomes on stderr.

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use journeyboard_core::locale::format_date;
use journeyboard_core::service::calendar::is_today;
use journeyboard_core::service::fitness::unit_label;
use journeyboard_core::{
    default_log_level, init_logging, BoardConfig, Category, CategoryFilter, EntryDraft,
    ExerciseField, JournalEntry, JourneyBoard, Locale, MonthFilter, Persistence, SqliteKvStore,
    StatField, Step, SystemClock, Translator, UuidIds,
};
use log::info;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const DB_DIR_NAME: &str = "journeyboard";
const DB_FILE_NAME: &str = "journeyboard.sqlite3";

#[derive(Debug, Parser)]
#[command(name = "journeyboard", version, about = "Countdown, progress calendar, workouts and journal")]
struct Cli {
    /// TOML configuration file
    #[arg(long, env = "JOURNEYBOARD_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Database path (defaults to the platform data directory)
    #[arg(long, env = "JOURNEYBOARD_DB_PATH", global = true)]
    db: Option<PathBuf>,

    /// Directory for rolling log files; logging is off when unset
    #[arg(long, env = "JOURNEYBOARD_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,

    /// One of trace|debug|info|warn|error
    #[arg(long, env = "JOURNEYBOARD_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the countdown toward the target date
    Countdown {
        /// Keep printing one snapshot per tick
        #[arg(long)]
        watch: bool,
        /// Stop watching after this many snapshots
        #[arg(long, requires = "watch")]
        ticks: Option<u32>,
    },
    /// Inspect or edit the daily progress calendar
    Calendar {
        #[command(subcommand)]
        cmd: CalendarCommand,
    },
    /// Inspect or edit the workout plan and stats
    Fitness {
        #[command(subcommand)]
        cmd: FitnessCommand,
    },
    /// Manage journal entries
    Journal {
        #[command(subcommand)]
        cmd: JournalCommand,
    },
    /// Print the vision board in the current locale
    Vision,
    /// Show or change the interface language
    Locale {
        #[command(subcommand)]
        cmd: LocaleCommand,
    },
}

#[derive(Debug, Subcommand)]
enum CalendarCommand {
    /// Days grouped by month
    Show {
        /// `all` or `YYYY-MM`
        #[arg(long, default_value = "all")]
        month: MonthFilter,
    },
    /// Completion counts
    Summary,
    /// Flip completion for one date (`YYYY-MM-DD`)
    Toggle { date: NaiveDate },
    /// Mark every day pending
    Reset,
}

#[derive(Debug, Subcommand)]
enum FitnessCommand {
    /// Weekly plan and stats
    Show,
    /// Step sets/reps by 1 or weight by 5
    Adjust {
        day: u32,
        exercise: u32,
        /// sets|reps|weight
        field: ExerciseField,
        /// Step down instead of up
        #[arg(long)]
        down: bool,
    },
    /// Set an exercise field directly (clamped to its floor)
    Set {
        day: u32,
        exercise: u32,
        field: ExerciseField,
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
    /// Set a stat (current-weight|target-weight|daily-calories|weekly-workouts)
    Stat {
        field: StatField,
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
}

#[derive(Debug, Subcommand)]
enum JournalCommand {
    /// Entries matching a text query and category, newest first
    List {
        #[arg(long, default_value = "")]
        query: String,
        /// `all` or one category
        #[arg(long, default_value = "all")]
        category: CategoryFilter,
    },
    /// Create an entry
    Add {
        title: String,
        content: String,
        #[arg(long, default_value = "idea")]
        category: Category,
        /// `#rrggbb`
        #[arg(long)]
        color: Option<String>,
    },
    /// Replace title, content, category and color of an entry
    Edit {
        id: String,
        title: String,
        content: String,
        #[arg(long, default_value = "idea")]
        category: Category,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete an entry
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
enum LocaleCommand {
    Show,
    Set { locale: Locale },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, &log_dir.to_string_lossy())
            .map_err(|err| anyhow!("failed to initialize logging: {err}"))?;
    }

    let config = match &cli.config {
        Some(path) => BoardConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => BoardConfig::default(),
    };
    let db_path = resolve_database_path(cli.db.as_deref())?;
    let store = SqliteKvStore::open(&db_path, config.storage_quota_bytes)
        .with_context(|| format!("failed to open database at {}", db_path.display()))?;
    info!(
        "event=cli_start module=cli status=ok db={}",
        db_path.display()
    );

    let mut board = JourneyBoard::mount(&store, config, Arc::new(SystemClock), Box::new(UuidIds));
    report_warnings(&board);

    let output = run(&mut board, cli.cmd)?;
    if let Some(value) = output {
        print_json(&value, cli.pretty)?;
    }
    Ok(())
}

fn run(board: &mut JourneyBoard<&SqliteKvStore>, cmd: Command) -> Result<Option<Value>> {
    match cmd {
        Command::Countdown { watch, ticks } => {
            if watch {
                watch_countdown(board, ticks)?;
                return Ok(None);
            }
            Ok(Some(serde_json::to_value(board.countdown_state())?))
        }
        Command::Calendar { cmd } => run_calendar(board, cmd).map(Some),
        Command::Fitness { cmd } => run_fitness(board, cmd).map(Some),
        Command::Journal { cmd } => run_journal(board, cmd).map(Some),
        Command::Vision => Ok(Some(serde_json::to_value(board.vision_board())?)),
        Command::Locale { cmd } => match cmd {
            LocaleCommand::Show => Ok(Some(json!({ "locale": board.locale() }))),
            LocaleCommand::Set { locale } => {
                let persistence = board.set_locale(locale);
                report_persistence(&persistence);
                Ok(Some(json!({ "locale": locale })))
            }
        },
    }
}

fn watch_countdown(board: &mut JourneyBoard<&SqliteKvStore>, ticks: Option<u32>) -> Result<()> {
    let states = board
        .start_ticker()
        .context("failed to start countdown ticker")?;
    let mut printed = 0_u32;
    for state in states.iter() {
        println!("{}", serde_json::to_string(&state)?);
        printed += 1;
        if ticks.is_some_and(|limit| printed >= limit) {
            break;
        }
    }
    board.stop_ticker();
    Ok(())
}

fn run_calendar(board: &mut JourneyBoard<&SqliteKvStore>, cmd: CalendarCommand) -> Result<Value> {
    match cmd {
        CalendarCommand::Show { month } => {
            let locale = board.locale();
            let today_label = board.translator().translate("progress.today");
            let months = board
                .calendar()
                .grouped(&month)
                .into_iter()
                .map(|group| {
                    let days = group
                        .days
                        .iter()
                        .map(|day| {
                            let today = is_today(day.date, board.clock());
                            let mut cell = json!({
                                "date": day.date,
                                "completed": day.completed,
                                "today": today,
                            });
                            if today {
                                cell["label"] = Value::from(today_label.as_str());
                            }
                            cell
                        })
                        .collect::<Vec<_>>();
                    json!({
                        "month": group.key,
                        "label": group.label(locale),
                        "leadingBlankCells": group.leading_blank_cells(),
                        "days": days,
                    })
                })
                .collect::<Vec<_>>();
            Ok(Value::Array(months))
        }
        CalendarCommand::Summary => Ok(summary_json(board)),
        CalendarCommand::Toggle { date } => {
            if board.calendar().progress().get(date).is_none() {
                bail!("{date} is outside the journey");
            }
            let persistence = board.calendar_mut().toggle(date);
            report_persistence(&persistence);
            let completed = board
                .calendar()
                .progress()
                .get(date)
                .is_some_and(|day| day.completed);
            Ok(json!({ "date": date, "completed": completed }))
        }
        CalendarCommand::Reset => {
            let persistence = board.calendar_mut().reset();
            report_persistence(&persistence);
            Ok(summary_json(board))
        }
    }
}

fn summary_json(board: &JourneyBoard<&SqliteKvStore>) -> Value {
    let summary = board.calendar().summary();
    json!({
        "completed": summary.completed,
        "total": summary.total,
        "percent": summary.percent,
    })
}

fn run_fitness(board: &mut JourneyBoard<&SqliteKvStore>, cmd: FitnessCommand) -> Result<Value> {
    match cmd {
        FitnessCommand::Show => {}
        FitnessCommand::Adjust {
            day,
            exercise,
            field,
            down,
        } => {
            ensure_exercise(board, day, exercise)?;
            let step = if down { Step::Decrement } else { Step::Increment };
            let persistence = board.fitness_mut().adjust(day, exercise, field, step);
            report_persistence(&persistence);
        }
        FitnessCommand::Set {
            day,
            exercise,
            field,
            value,
        } => {
            ensure_exercise(board, day, exercise)?;
            let persistence = board.fitness_mut().set_field(day, exercise, field, value);
            report_persistence(&persistence);
        }
        FitnessCommand::Stat { field, value } => {
            if !value.is_finite() {
                bail!("stat value must be a finite number");
            }
            let persistence = board.fitness_mut().set_stat(field, value);
            report_persistence(&persistence);
        }
    }

    let fitness = board.fitness();
    Ok(json!({
        "plan": fitness.plan(),
        "stats": fitness.stats(),
        "weightUnit": unit_label(&board.translator()),
        "weightProgressPercent": fitness.weight_progress_percent(),
    }))
}

fn ensure_exercise(board: &JourneyBoard<&SqliteKvStore>, day: u32, exercise: u32) -> Result<()> {
    if board.fitness().plan().exercise(day, exercise).is_none() {
        bail!("exercise {exercise} on day {day} not found");
    }
    Ok(())
}

fn run_journal(board: &mut JourneyBoard<&SqliteKvStore>, cmd: JournalCommand) -> Result<Value> {
    let locale = board.locale();
    match cmd {
        JournalCommand::List { query, category } => {
            let entries = board
                .journal()
                .filter(&query, category)
                .into_iter()
                .map(|entry| entry_json(entry, locale))
                .collect::<Vec<_>>();
            Ok(Value::Array(entries))
        }
        JournalCommand::Add {
            title,
            content,
            category,
            color,
        } => {
            let synced = board
                .journal_mut()
                .add(draft(title, content, category, color))?;
            report_persistence(&synced.persistence);
            Ok(entry_json(&synced.value, locale))
        }
        JournalCommand::Edit {
            id,
            title,
            content,
            category,
            color,
        } => {
            let synced = board
                .journal_mut()
                .update(&id, draft(title, content, category, color))?;
            report_persistence(&synced.persistence);
            Ok(entry_json(&synced.value, locale))
        }
        JournalCommand::Delete { id } => {
            let persistence = board.journal_mut().delete(&id);
            report_persistence(&persistence);
            Ok(json!({ "id": id, "deleted": persistence != Persistence::Unchanged }))
        }
    }
}

fn draft(title: String, content: String, category: Category, color: Option<String>) -> EntryDraft {
    let draft = EntryDraft::new(title, content).with_category(category);
    match color {
        Some(color) => draft.with_color(color),
        None => draft,
    }
}

fn entry_json(entry: &JournalEntry, locale: Locale) -> Value {
    json!({
        "id": entry.id,
        "title": entry.title,
        "content": entry.content,
        "date": format_date(entry.date, locale),
        "category": entry.category,
        "color": entry.color,
    })
}

fn report_warnings(board: &JourneyBoard<&SqliteKvStore>) {
    for err in board.storage_warnings() {
        eprintln!("warning: running without saved state: {err}");
    }
}

fn report_persistence(persistence: &Persistence) {
    if let Some(err) = persistence.error() {
        eprintln!("warning: change kept in memory only: {err}");
    }
}

fn print_json(value: &Value, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}

fn resolve_database_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    let data_dir = dirs::data_dir().context("could not determine the platform data directory")?;
    Ok(data_dir.join(DB_DIR_NAME).join(DB_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::{resolve_database_path, Cli, Command, FitnessCommand, JournalCommand};
    use clap::{CommandFactory, Parser};
    use journeyboard_core::{Category, CategoryFilter, ExerciseField, StatField};
    use std::path::{Path, PathBuf};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn explicit_database_path_wins() {
        let path = resolve_database_path(Some(Path::new("/tmp/board.sqlite3"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/board.sqlite3"));
    }

    #[test]
    fn fitness_fields_parse_from_arguments() {
        let cli = Cli::parse_from(["journeyboard", "fitness", "adjust", "1", "2", "weight", "--down"]);
        match cli.cmd {
            Command::Fitness {
                cmd: FitnessCommand::Adjust { day, exercise, field, down },
            } => {
                assert_eq!((day, exercise, field, down), (1, 2, ExerciseField::Weight, true));
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::parse_from(["journeyboard", "fitness", "stat", "current-weight", "80.5"]);
        assert!(matches!(
            cli.cmd,
            Command::Fitness {
                cmd: FitnessCommand::Stat { field: StatField::CurrentWeight, .. }
            }
        ));
    }

    #[test]
    fn journal_defaults_apply() {
        let cli = Cli::parse_from(["journeyboard", "journal", "list"]);
        match cli.cmd {
            Command::Journal {
                cmd: JournalCommand::List { query, category },
            } => {
                assert!(query.is_empty());
                assert_eq!(category, CategoryFilter::All);
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::parse_from(["journeyboard", "journal", "add", "Title", "Body", "--category", "goal"]);
        assert!(matches!(
            cli.cmd,
            Command::Journal {
                cmd: JournalCommand::Add { category: Category::Goal, color: None, .. }
            }
        ));
    }

    #[test]
    fn invalid_locale_is_rejected() {
        assert!(Cli::try_parse_from(["journeyboard", "locale", "set", "de"]).is_err());
    }
}
