//! Daily progress records.

use super::JOURNEY_PROGRESS_KEY;
use crate::store::Collection;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Completion flag for one calendar date (`pending` until toggled).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayProgress {
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub completed: bool,
}

impl DayProgress {
    pub fn pending(date: NaiveDate) -> Self {
        Self {
            date,
            completed: false,
        }
    }

    /// `YYYY-MM` bucket used for month grouping.
    pub fn month_key(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}

/// Date-ordered progress for the whole journey. The date set is fixed at seed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JourneyProgress(pub Vec<DayProgress>);

impl JourneyProgress {
    pub fn days(&self) -> &[DayProgress] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DayProgress> {
        self.0.iter().find(|day| day.date == date)
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.0.first().map(|day| day.date)
    }
}

impl Collection for JourneyProgress {
    const KEY: &'static str = JOURNEY_PROGRESS_KEY;
}
