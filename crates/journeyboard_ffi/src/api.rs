//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Mount the board against the on-disk store for every call.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Storage failures degrade to `persisted=false`, never to `ok=false`.
//! - Journal text is never logged.

use journeyboard_core::service::calendar::is_today;
use journeyboard_core::service::fitness::unit_label;
use journeyboard_core::store::Persistence;
use journeyboard_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    BoardConfig, Category, CategoryFilter, EntryDraft, ExerciseField, JournalEntry, JourneyBoard,
    Locale, MonthFilter, SqliteKvStore, StatField, Step, SystemClock, UuidIds,
};
use chrono::NaiveDate;
use log::warn;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

const BOARD_DB_FILE_NAME: &str = "journeyboard.sqlite3";
static BOARD_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static BOARD_CONFIG: OnceLock<Result<BoardConfig, String>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Generic mutation envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardActionResponse {
    /// Whether the operation was accepted.
    pub ok: bool,
    /// `false` when the change lives in memory only for this call.
    pub persisted: bool,
    /// Created or edited journal entry ID, when relevant.
    pub entry_id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl BoardActionResponse {
    fn from_persistence(message: impl Into<String>, persistence: &Persistence) -> Self {
        let message = message.into();
        match persistence.error() {
            Some(err) => Self {
                ok: true,
                persisted: false,
                entry_id: None,
                message: format!("{message} Not saved: {err}"),
            },
            None => Self {
                ok: true,
                persisted: true,
                entry_id: None,
                message,
            },
        }
    }

    fn with_entry_id(mut self, entry_id: String) -> Self {
        self.entry_id = Some(entry_id);
        self
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            persisted: false,
            entry_id: None,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountdownResponse {
    pub ok: bool,
    pub days_total: i64,
    pub days_elapsed: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub progress_percent: f64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDayItem {
    /// `YYYY-MM-DD`.
    pub date: String,
    pub completed: bool,
    pub is_today: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarMonthItem {
    /// `YYYY-MM`.
    pub key: String,
    pub label: String,
    pub leading_blank_cells: u32,
    pub days: Vec<CalendarDayItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarResponse {
    pub ok: bool,
    pub months: Vec<CalendarMonthItem>,
    pub completed: u32,
    pub total: u32,
    pub percent: u32,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseItem {
    pub id: u32,
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutDayItem {
    pub id: u32,
    pub day: String,
    pub is_rest_day: bool,
    pub exercises: Vec<ExerciseItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FitnessResponse {
    pub ok: bool,
    pub days: Vec<WorkoutDayItem>,
    pub current_weight: f64,
    pub target_weight: f64,
    pub daily_calories: f64,
    pub weekly_workouts: f64,
    pub weight_unit: String,
    pub weight_progress_percent: f64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalItem {
    pub id: String,
    pub title: String,
    pub content: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub category: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalListResponse {
    pub ok: bool,
    pub items: Vec<JournalItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisionItemView {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub image: String,
}

/// Returns the persisted locale tag (`ru|en`).
///
/// Falls back to the configured default when the store cannot be opened.
#[flutter_rust_bridge::frb(sync)]
pub fn board_locale() -> String {
    match with_board(|board| Ok(board.locale())) {
        Ok(locale) => locale.as_tag().to_string(),
        Err(_) => resolve_board_config()
            .map(|config| config.default_locale)
            .unwrap_or_default()
            .as_tag()
            .to_string(),
    }
}

/// Persists the locale preference. Other collections are never reseeded.
#[flutter_rust_bridge::frb(sync)]
pub fn board_set_locale(tag: String) -> BoardActionResponse {
    let locale = match tag.parse::<Locale>() {
        Ok(locale) => locale,
        Err(err) => return BoardActionResponse::failure(err.to_string()),
    };
    with_board(|board| {
        let persistence = board.set_locale(locale);
        Ok(BoardActionResponse::from_persistence(
            format!("Locale set to {locale}."),
            &persistence,
        ))
    })
    .unwrap_or_else(BoardActionResponse::failure)
}

/// Countdown snapshot at adjusted now.
///
/// # FFI contract
/// - Sync call; the caller polls on its own cadence (1 s in the UI).
#[flutter_rust_bridge::frb(sync)]
pub fn countdown_snapshot() -> CountdownResponse {
    match with_board(|board| Ok(board.countdown_state())) {
        Ok(state) => CountdownResponse {
            ok: true,
            days_total: state.days_total,
            days_elapsed: state.days_elapsed,
            days: state.time_remaining.days,
            hours: state.time_remaining.hours,
            minutes: state.time_remaining.minutes,
            seconds: state.time_remaining.seconds,
            progress_percent: state.progress_percent,
            message: String::new(),
        },
        Err(err) => CountdownResponse {
            ok: false,
            days_total: 0,
            days_elapsed: 0,
            days: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
            progress_percent: 0.0,
            message: format!("countdown_snapshot failed: {err}"),
        },
    }
}

/// Calendar grouped by month with the completion summary.
///
/// `month`: `None`, `"all"` or `YYYY-MM`.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_view(month: Option<String>) -> CalendarResponse {
    let filter = match month.as_deref().map(str::parse::<MonthFilter>).transpose() {
        Ok(filter) => filter.unwrap_or_default(),
        Err(err) => return calendar_failure(err),
    };
    with_board(|board| {
        let locale = board.locale();
        let calendar = board.calendar();
        let months = calendar
            .grouped(&filter)
            .into_iter()
            .map(|group| CalendarMonthItem {
                label: group.label(locale),
                leading_blank_cells: group.leading_blank_cells(),
                days: group
                    .days
                    .iter()
                    .map(|day| CalendarDayItem {
                        date: day.date.to_string(),
                        completed: day.completed,
                        is_today: is_today(day.date, board.clock()),
                    })
                    .collect(),
                key: group.key,
            })
            .collect();
        let summary = calendar.summary();
        Ok(CalendarResponse {
            ok: true,
            months,
            completed: u32::try_from(summary.completed).unwrap_or(u32::MAX),
            total: u32::try_from(summary.total).unwrap_or(u32::MAX),
            percent: summary.percent,
            message: String::new(),
        })
    })
    .unwrap_or_else(calendar_failure)
}

/// Flips completion for one `YYYY-MM-DD` date.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_toggle(date: String) -> BoardActionResponse {
    let date = match NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d") {
        Ok(date) => date,
        Err(err) => return BoardActionResponse::failure(format!("invalid date `{date}`: {err}")),
    };
    with_board(|board| {
        if board.calendar().progress().get(date).is_none() {
            return Err(format!("{date} is outside the journey"));
        }
        let persistence = board.calendar_mut().toggle(date);
        Ok(BoardActionResponse::from_persistence(
            format!("Toggled {date}."),
            &persistence,
        ))
    })
    .unwrap_or_else(BoardActionResponse::failure)
}

/// Marks every day pending.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_reset() -> BoardActionResponse {
    with_board(|board| {
        let persistence = board.calendar_mut().reset();
        Ok(BoardActionResponse::from_persistence(
            "Progress reset.",
            &persistence,
        ))
    })
    .unwrap_or_else(BoardActionResponse::failure)
}

/// Weekly plan and stats, with the weight label of the current locale.
#[flutter_rust_bridge::frb(sync)]
pub fn fitness_view() -> FitnessResponse {
    with_board(|board| {
        let fitness = board.fitness();
        let stats = *fitness.stats();
        Ok(FitnessResponse {
            ok: true,
            days: fitness
                .plan()
                .days()
                .iter()
                .map(|day| WorkoutDayItem {
                    id: day.id,
                    day: day.day.clone(),
                    is_rest_day: day.is_rest_day,
                    exercises: day
                        .exercises
                        .iter()
                        .map(|exercise| ExerciseItem {
                            id: exercise.id,
                            name: exercise.name.clone(),
                            sets: exercise.sets,
                            reps: exercise.reps,
                            weight: exercise.weight,
                        })
                        .collect(),
                })
                .collect(),
            current_weight: stats.current_weight,
            target_weight: stats.target_weight,
            daily_calories: stats.daily_calories,
            weekly_workouts: stats.weekly_workouts,
            weight_unit: unit_label(&board.translator()),
            weight_progress_percent: fitness.weight_progress_percent(),
            message: String::new(),
        })
    })
    .unwrap_or_else(|err| FitnessResponse {
        ok: false,
        days: Vec::new(),
        current_weight: 0.0,
        target_weight: 0.0,
        daily_calories: 0.0,
        weekly_workouts: 0.0,
        weight_unit: String::new(),
        weight_progress_percent: 0.0,
        message: format!("fitness_view failed: {err}"),
    })
}

/// Steps `sets|reps|weight` of one exercise up or down (floors enforced).
#[flutter_rust_bridge::frb(sync)]
pub fn fitness_adjust(
    day_id: u32,
    exercise_id: u32,
    field: String,
    increment: bool,
) -> BoardActionResponse {
    let field = match field.parse::<ExerciseField>() {
        Ok(field) => field,
        Err(err) => return BoardActionResponse::failure(err),
    };
    let step = if increment {
        Step::Increment
    } else {
        Step::Decrement
    };
    with_board(|board| {
        if board.fitness().plan().exercise(day_id, exercise_id).is_none() {
            return Err(format!("exercise {day_id}/{exercise_id} not found"));
        }
        let persistence = board
            .fitness_mut()
            .adjust(day_id, exercise_id, field, step);
        Ok(BoardActionResponse::from_persistence(
            "Exercise updated.",
            &persistence,
        ))
    })
    .unwrap_or_else(BoardActionResponse::failure)
}

/// Sets one exercise field directly; negative values clamp to the floor.
#[flutter_rust_bridge::frb(sync)]
pub fn fitness_set_field(
    day_id: u32,
    exercise_id: u32,
    field: String,
    value: f64,
) -> BoardActionResponse {
    let field = match field.parse::<ExerciseField>() {
        Ok(field) => field,
        Err(err) => return BoardActionResponse::failure(err),
    };
    with_board(|board| {
        if board.fitness().plan().exercise(day_id, exercise_id).is_none() {
            return Err(format!("exercise {day_id}/{exercise_id} not found"));
        }
        let persistence = board
            .fitness_mut()
            .set_field(day_id, exercise_id, field, value);
        Ok(BoardActionResponse::from_persistence(
            "Exercise updated.",
            &persistence,
        ))
    })
    .unwrap_or_else(BoardActionResponse::failure)
}

/// Sets one stat (`currentWeight|targetWeight|dailyCalories|weeklyWorkouts`).
#[flutter_rust_bridge::frb(sync)]
pub fn fitness_set_stat(field: String, value: f64) -> BoardActionResponse {
    let field = match field.parse::<StatField>() {
        Ok(field) => field,
        Err(err) => return BoardActionResponse::failure(err),
    };
    if !value.is_finite() {
        return BoardActionResponse::failure("stat value must be a finite number");
    }
    with_board(|board| {
        let persistence = board.fitness_mut().set_stat(field, value);
        Ok(BoardActionResponse::from_persistence(
            "Stat updated.",
            &persistence,
        ))
    })
    .unwrap_or_else(BoardActionResponse::failure)
}

/// Creates a journal entry at the top of the list.
///
/// `category` defaults to `idea`, `color` to the palette default.
#[flutter_rust_bridge::frb(sync)]
pub fn journal_add(
    title: String,
    content: String,
    category: Option<String>,
    color: Option<String>,
) -> BoardActionResponse {
    let draft = match build_draft(title, content, category, color) {
        Ok(draft) => draft,
        Err(err) => return BoardActionResponse::failure(err),
    };
    with_board(|board| {
        let synced = board.journal_mut().add(draft).map_err(|err| err.to_string())?;
        Ok(
            BoardActionResponse::from_persistence("Entry saved.", &synced.persistence)
                .with_entry_id(synced.value.id),
        )
    })
    .unwrap_or_else(BoardActionResponse::failure)
}

/// Replaces title, content, category and color of entry `id`.
#[flutter_rust_bridge::frb(sync)]
pub fn journal_update(
    id: String,
    title: String,
    content: String,
    category: Option<String>,
    color: Option<String>,
) -> BoardActionResponse {
    let draft = match build_draft(title, content, category, color) {
        Ok(draft) => draft,
        Err(err) => return BoardActionResponse::failure(err),
    };
    with_board(|board| {
        let synced = board
            .journal_mut()
            .update(id.trim(), draft)
            .map_err(|err| err.to_string())?;
        Ok(
            BoardActionResponse::from_persistence("Entry updated.", &synced.persistence)
                .with_entry_id(synced.value.id),
        )
    })
    .unwrap_or_else(BoardActionResponse::failure)
}

/// Deletes entry `id`; unknown IDs succeed without writing.
#[flutter_rust_bridge::frb(sync)]
pub fn journal_delete(id: String) -> BoardActionResponse {
    with_board(|board| {
        let persistence = board.journal_mut().delete(id.trim());
        let message = if persistence == Persistence::Unchanged {
            "No such entry."
        } else {
            "Entry deleted."
        };
        Ok(BoardActionResponse::from_persistence(message, &persistence))
    })
    .unwrap_or_else(BoardActionResponse::failure)
}

/// Entries matching `query` and `category` (`all` or one category), newest first.
#[flutter_rust_bridge::frb(sync)]
pub fn journal_list(query: String, category: Option<String>) -> JournalListResponse {
    let filter = match category.as_deref().map(str::parse::<CategoryFilter>).transpose() {
        Ok(filter) => filter.unwrap_or_default(),
        Err(err) => {
            return JournalListResponse {
                ok: false,
                items: Vec::new(),
                message: err,
            }
        }
    };
    with_board(|board| {
        let items = board
            .journal()
            .filter(query.trim(), filter)
            .into_iter()
            .map(to_journal_item)
            .collect::<Vec<_>>();
        let message = if items.is_empty() {
            "No entries.".to_string()
        } else {
            format!("Found {} result(s).", items.len())
        };
        Ok(JournalListResponse {
            ok: true,
            items,
            message,
        })
    })
    .unwrap_or_else(|err| JournalListResponse {
        ok: false,
        items: Vec::new(),
        message: format!("journal_list failed: {err}"),
    })
}

/// Vision board items localized to the persisted locale.
#[flutter_rust_bridge::frb(sync)]
pub fn vision_board() -> Vec<VisionItemView> {
    with_board(|board| Ok(board.vision_board()))
        .unwrap_or_default()
        .into_iter()
        .map(|item| VisionItemView {
            id: item.id,
            title: item.title,
            description: item.description,
            image: item.image,
        })
        .collect()
}

fn build_draft(
    title: String,
    content: String,
    category: Option<String>,
    color: Option<String>,
) -> Result<EntryDraft, String> {
    let mut draft = EntryDraft::new(title, content);
    if let Some(raw) = category.filter(|raw| !raw.trim().is_empty()) {
        draft = draft.with_category(raw.parse::<Category>()?);
    }
    if let Some(raw) = color.filter(|raw| !raw.trim().is_empty()) {
        draft = draft.with_color(raw.trim());
    }
    Ok(draft)
}

fn to_journal_item(entry: &JournalEntry) -> JournalItem {
    JournalItem {
        id: entry.id.clone(),
        title: entry.title.clone(),
        content: entry.content.clone(),
        date: entry.date.to_string(),
        category: entry.category.as_str().to_string(),
        color: entry.color.clone(),
    }
}

fn calendar_failure(err: String) -> CalendarResponse {
    CalendarResponse {
        ok: false,
        months: Vec::new(),
        completed: 0,
        total: 0,
        percent: 0,
        message: format!("calendar_view failed: {err}"),
    }
}

fn resolve_board_db_path() -> PathBuf {
    BOARD_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("JOURNEYBOARD_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(BOARD_DB_FILE_NAME)
        })
        .clone()
}

fn resolve_board_config() -> Result<BoardConfig, String> {
    BOARD_CONFIG
        .get_or_init(|| match std::env::var("JOURNEYBOARD_CONFIG") {
            Ok(raw) if !raw.trim().is_empty() => {
                BoardConfig::load(raw.trim()).map_err(|err| err.to_string())
            }
            _ => Ok(BoardConfig::default()),
        })
        .clone()
}

fn with_board<T>(
    f: impl FnOnce(&mut JourneyBoard<&SqliteKvStore>) -> Result<T, String>,
) -> Result<T, String> {
    let config = resolve_board_config()?;
    let db_path = resolve_board_db_path();
    let store = SqliteKvStore::open(&db_path, config.storage_quota_bytes).map_err(|err| {
        warn!("event=ffi_board_open module=ffi status=error error={err}");
        format!("board DB open failed: {err}")
    })?;
    let mut board = JourneyBoard::mount(
        &store,
        config,
        Arc::new(SystemClock),
        Box::new(UuidIds),
    );
    f(&mut board)
}
