//! Workout plan and fitness stats tracker.
//!
//! # Responsibility
//! - Seed a locale-specific weekly plan and stats once.
//! - Apply clamped exercise mutations and stat edits as whole writes.
//!
//! # Invariants
//! - Seeding depends only on the `Locale` argument.
//! - Existing plans and stats are never re-seeded or re-converted when the
//!   locale changes.
//! - Exercise floors (`sets>=1`, `reps>=1`, `weight>=0`) hold on every path.

use crate::locale::{exercise_name, weekday_names, Locale, Translator};
use crate::model::workout::{
    Exercise, ExerciseField, FitnessStats, StatField, Step, WorkoutDay, WorkoutPlan,
};
use crate::store::{KvStore, Persistence, RecordStore};
use log::info;

/// Weight unit implied by the locale at seed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSystem {
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::Ru => Self::Metric,
            Locale::En => Self::Imperial,
        }
    }
}

const DAILY_CALORIES: f64 = 2200.0;
const WEEKLY_WORKOUTS: f64 = 5.0;

type SeedExercise = (&'static str, u32, u32, f64);

// Monday..Sunday; an empty list marks a rest day.
const WEEKLY_TEMPLATE: [&[SeedExercise]; 7] = [
    &[
        ("Bench Press", 4, 8, 135.0),
        ("Incline Dumbbell Press", 3, 10, 50.0),
        ("Cable Flyes", 3, 12, 30.0),
    ],
    &[
        ("Squats", 4, 8, 185.0),
        ("Leg Press", 3, 10, 300.0),
        ("Leg Extensions", 3, 12, 100.0),
    ],
    &[],
    &[
        ("Pull-ups", 4, 8, 0.0),
        ("Barbell Rows", 3, 10, 135.0),
        ("Lat Pulldowns", 3, 12, 120.0),
    ],
    &[
        ("Overhead Press", 4, 8, 95.0),
        ("Lateral Raises", 3, 12, 20.0),
        ("Face Pulls", 3, 15, 50.0),
    ],
    &[
        ("Deadlifts", 4, 6, 225.0),
        ("Romanian Deadlifts", 3, 10, 155.0),
        ("Leg Curls", 3, 12, 80.0),
    ],
    &[],
];

/// Default weekly plan with day and exercise names in `locale`.
pub fn default_workout_plan(locale: Locale) -> WorkoutPlan {
    let names = weekday_names(locale, false);
    let days = WEEKLY_TEMPLATE
        .iter()
        .enumerate()
        .map(|(index, exercises)| WorkoutDay {
            id: index as u32 + 1,
            // Template is Monday-first, name table is Sunday-first.
            day: names[(index + 1) % 7].to_string(),
            is_rest_day: exercises.is_empty(),
            exercises: exercises
                .iter()
                .enumerate()
                .map(|(position, (name, sets, reps, weight))| Exercise {
                    id: position as u32 + 1,
                    name: exercise_name(locale, name),
                    sets: *sets,
                    reps: *reps,
                    weight: *weight,
                })
                .collect(),
        })
        .collect();
    WorkoutPlan(days)
}

/// Default stats; body weights are fixed per unit system, not converted.
pub fn default_fitness_stats(locale: Locale) -> FitnessStats {
    let (current_weight, target_weight) = match UnitSystem::for_locale(locale) {
        UnitSystem::Metric => (82.0, 75.0),
        UnitSystem::Imperial => (180.0, 165.0),
    };
    FitnessStats {
        current_weight,
        target_weight,
        daily_calories: DAILY_CALORIES,
        weekly_workouts: WEEKLY_WORKOUTS,
    }
}

/// Weight label for the active locale.
pub fn unit_label(translator: &dyn Translator) -> String {
    translator.translate("fitness.units.weight")
}

/// Workout plan and stats bound to their record store.
pub struct FitnessTracker<S> {
    store: RecordStore<S>,
    plan: WorkoutPlan,
    stats: FitnessStats,
    persistence: Persistence,
}

impl<S: KvStore> FitnessTracker<S> {
    /// Loads plan and stats, seeding each from `locale` if absent.
    pub fn mount(store: RecordStore<S>, locale: Locale) -> Self {
        let plan = store.seed_if_absent(|| default_workout_plan(locale));
        let stats = store.seed_if_absent(|| default_fitness_stats(locale));
        let persistence = match (&plan.persistence, &stats.persistence) {
            (Persistence::MemoryOnly(err), _) | (_, Persistence::MemoryOnly(err)) => {
                Persistence::MemoryOnly(err.clone())
            }
            (Persistence::Saved, _) | (_, Persistence::Saved) => Persistence::Saved,
            _ => Persistence::Unchanged,
        };
        info!(
            "event=fitness_mount module=fitness status=ok training_days={}",
            plan.value.training_days()
        );
        Self {
            store,
            plan: plan.value,
            stats: stats.value,
            persistence,
        }
    }

    pub fn plan(&self) -> &WorkoutPlan {
        &self.plan
    }

    pub fn stats(&self) -> &FitnessStats {
        &self.stats
    }

    pub fn persistence(&self) -> &Persistence {
        &self.persistence
    }

    /// Moves one exercise field by its fixed step (±1 or ±5).
    pub fn adjust(
        &mut self,
        day_id: u32,
        exercise_id: u32,
        field: ExerciseField,
        step: Step,
    ) -> Persistence {
        self.update_exercise(day_id, exercise_id, |exercise| exercise.step(field, step))
    }

    /// Sets one exercise field directly; the value is clamped to its floor.
    pub fn set_field(
        &mut self,
        day_id: u32,
        exercise_id: u32,
        field: ExerciseField,
        value: f64,
    ) -> Persistence {
        self.update_exercise(day_id, exercise_id, |exercise| {
            exercise.set_clamped(field, value)
        })
    }

    /// Sets one stat and persists. Non-finite input is ignored.
    pub fn set_stat(&mut self, field: StatField, value: f64) -> Persistence {
        if !value.is_finite() {
            return Persistence::Unchanged;
        }
        let synced = self.store.mutate(&self.stats, |stats| stats.with(field, value));
        self.stats = synced.value;
        self.persistence = synced.persistence.clone();
        synced.persistence
    }

    /// How close current weight is to target, in `0..=100`.
    pub fn weight_progress_percent(&self) -> f64 {
        let FitnessStats {
            current_weight: current,
            target_weight: target,
            ..
        } = self.stats;
        let percent = if current > target {
            100.0 - (current - target) / (current - target + 20.0) * 100.0
        } else {
            100.0 - (target - current) / target * 100.0
        };
        if percent.is_finite() {
            percent.clamp(0.0, 100.0)
        } else {
            0.0
        }
    }

    fn update_exercise(
        &mut self,
        day_id: u32,
        exercise_id: u32,
        edit: impl Fn(&mut Exercise),
    ) -> Persistence {
        if self.plan.exercise(day_id, exercise_id).is_none() {
            return Persistence::Unchanged;
        }
        let synced = self.store.mutate(&self.plan, |plan| {
            let mut next = plan.clone();
            for day in next.0.iter_mut().filter(|day| day.id == day_id) {
                for exercise in day.exercises.iter_mut().filter(|e| e.id == exercise_id) {
                    edit(exercise);
                }
            }
            next
        });
        self.plan = synced.value;
        self.persistence = synced.persistence.clone();
        synced.persistence
    }
}
