//! Weekly workout plan and body/nutrition stats.
//!
//! # Invariants
//! - `sets >= 1`, `reps >= 1`, `weight >= 0` after every mutation.
//! - Rest days carry no exercises.

use super::{FITNESS_STATS_KEY, WORKOUT_PLAN_KEY};
use crate::store::Collection;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const MIN_SETS: u32 = 1;
pub const MIN_REPS: u32 = 1;
pub const MIN_WEIGHT: f64 = 0.0;
/// Increment for sets and reps.
pub const COUNT_STEP: u32 = 1;
/// Increment for weight, in whatever unit the plan was seeded with.
pub const WEIGHT_STEP: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    /// Unique within the parent day.
    pub id: u32,
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    pub weight: f64,
}

/// Numeric exercise field addressed by mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseField {
    Sets,
    Reps,
    Weight,
}

impl FromStr for ExerciseField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sets" => Ok(Self::Sets),
            "reps" => Ok(Self::Reps),
            "weight" => Ok(Self::Weight),
            _ => Err(format!("unknown exercise field `{value}`")),
        }
    }
}

/// Direction of a stepped adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Increment,
    Decrement,
}

impl Exercise {
    pub fn value(&self, field: ExerciseField) -> f64 {
        match field {
            ExerciseField::Sets => f64::from(self.sets),
            ExerciseField::Reps => f64::from(self.reps),
            ExerciseField::Weight => self.weight,
        }
    }

    /// Sets `field` to `value`, clamped to the field's floor.
    ///
    /// Counts are rounded to the nearest integer; non-finite input clamps
    /// to the floor.
    pub fn set_clamped(&mut self, field: ExerciseField, value: f64) {
        match field {
            ExerciseField::Sets => self.sets = clamp_count(value, MIN_SETS),
            ExerciseField::Reps => self.reps = clamp_count(value, MIN_REPS),
            ExerciseField::Weight => {
                self.weight = if value.is_finite() {
                    value.max(MIN_WEIGHT)
                } else {
                    MIN_WEIGHT
                };
            }
        }
    }

    /// Moves `field` one fixed step, never below its floor.
    pub fn step(&mut self, field: ExerciseField, step: Step) {
        let delta = match field {
            ExerciseField::Sets | ExerciseField::Reps => f64::from(COUNT_STEP),
            ExerciseField::Weight => WEIGHT_STEP,
        };
        let next = match step {
            Step::Increment => self.value(field) + delta,
            Step::Decrement => self.value(field) - delta,
        };
        self.set_clamped(field, next);
    }
}

fn clamp_count(value: f64, floor: u32) -> u32 {
    if !value.is_finite() || value < f64::from(floor) {
        return floor;
    }
    let rounded = value.round();
    if rounded >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        rounded as u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDay {
    /// 1 (Monday) through 7 (Sunday).
    pub id: u32,
    /// Localized weekday name captured at seed time.
    pub day: String,
    pub is_rest_day: bool,
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutPlan(pub Vec<WorkoutDay>);

impl WorkoutPlan {
    pub fn days(&self) -> &[WorkoutDay] {
        &self.0
    }

    pub fn day(&self, day_id: u32) -> Option<&WorkoutDay> {
        self.0.iter().find(|day| day.id == day_id)
    }

    pub fn exercise(&self, day_id: u32, exercise_id: u32) -> Option<&Exercise> {
        self.day(day_id)?
            .exercises
            .iter()
            .find(|exercise| exercise.id == exercise_id)
    }

    /// Number of non-rest days.
    pub fn training_days(&self) -> usize {
        self.0.iter().filter(|day| !day.is_rest_day).count()
    }
}

impl Collection for WorkoutPlan {
    const KEY: &'static str = WORKOUT_PLAN_KEY;
}

/// Body and nutrition targets. Weight unit is fixed by the seeding locale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitnessStats {
    pub current_weight: f64,
    pub target_weight: f64,
    pub daily_calories: f64,
    pub weekly_workouts: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatField {
    CurrentWeight,
    TargetWeight,
    DailyCalories,
    WeeklyWorkouts,
}

impl FromStr for StatField {
    type Err = String;

    /// Accepts camelCase storage names and kebab-case CLI spellings.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().replace(['-', '_'], "").to_ascii_lowercase();
        match normalized.as_str() {
            "currentweight" => Ok(Self::CurrentWeight),
            "targetweight" => Ok(Self::TargetWeight),
            "dailycalories" => Ok(Self::DailyCalories),
            "weeklyworkouts" => Ok(Self::WeeklyWorkouts),
            _ => Err(format!("unknown stat `{value}`")),
        }
    }
}

impl FitnessStats {
    pub fn get(&self, field: StatField) -> f64 {
        match field {
            StatField::CurrentWeight => self.current_weight,
            StatField::TargetWeight => self.target_weight,
            StatField::DailyCalories => self.daily_calories,
            StatField::WeeklyWorkouts => self.weekly_workouts,
        }
    }

    pub fn with(mut self, field: StatField, value: f64) -> Self {
        match field {
            StatField::CurrentWeight => self.current_weight = value,
            StatField::TargetWeight => self.target_weight = value,
            StatField::DailyCalories => self.daily_calories = value,
            StatField::WeeklyWorkouts => self.weekly_workouts = value,
        }
        self
    }
}

impl Collection for FitnessStats {
    const KEY: &'static str = FITNESS_STATS_KEY;
}
