use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::{MealLogEntry, SourceKind};
use crate::nutrients::NutrientVector;

/// What `check_rollover` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolloverResult {
    /// Observed date matches the current day.
    Unchanged,
    /// Day advanced. `archived` is false when the old day had no calories
    /// or was already in the archive.
    RolledOver { previous: NaiveDate, archived: bool },
}

/// Per-identity daily nutrition state.
///
/// The archive never holds the current date and holds at most one snapshot
/// per date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLedger {
    current_date: NaiveDate,
    #[serde(default)]
    current_summary: NutrientVector,
    #[serde(default)]
    meal_log: Vec<MealLogEntry>,
    #[serde(default)]
    archive: BTreeMap<NaiveDate, NutrientVector>,
}

impl DailyLedger {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            current_date: today,
            current_summary: NutrientVector::zero(),
            meal_log: Vec::new(),
            archive: BTreeMap::new(),
        }
    }

    pub fn current_date(&self) -> NaiveDate {
        self.current_date
    }

    pub fn current_summary(&self) -> &NutrientVector {
        &self.current_summary
    }

    pub fn meal_log(&self) -> &[MealLogEntry] {
        &self.meal_log
    }

    pub fn archive(&self) -> &BTreeMap<NaiveDate, NutrientVector> {
        &self.archive
    }

    pub fn archived(&self, date: NaiveDate) -> Option<&NutrientVector> {
        self.archive.get(&date)
    }

    /// Record a meal at the current time.
    pub fn log_meal(
        &mut self,
        nutrients: NutrientVector,
        name: &str,
        source: SourceKind,
    ) -> MealLogEntry {
        self.log_meal_at(nutrients, name, source, Utc::now())
    }

    /// Record a meal with an explicit timestamp. Every nutrient is added to
    /// the day's summary after normalization (NaN and negatives count as 0).
    pub fn log_meal_at(
        &mut self,
        nutrients: NutrientVector,
        name: &str,
        source: SourceKind,
        logged_at: DateTime<Utc>,
    ) -> MealLogEntry {
        let nutrients = nutrients.normalized();
        self.current_summary += nutrients;

        let entry = MealLogEntry {
            name: name.to_string(),
            calories: nutrients.calories,
            source,
            logged_at,
            date: self.current_date,
        };
        self.meal_log.push(entry.clone());

        debug!(
            date = %self.current_date,
            meal = name,
            calories = nutrients.calories,
            total = self.current_summary.calories,
            "meal logged"
        );
        entry
    }

    /// Advance to `observed` if it differs from the current date.
    ///
    /// Safe to call repeatedly: a second call with the same date is a no-op,
    /// and an already archived day is never overwritten.
    pub fn check_rollover(&mut self, observed: NaiveDate) -> RolloverResult {
        if observed == self.current_date {
            return RolloverResult::Unchanged;
        }

        let previous = self.current_date;
        let archived = if self.current_summary.calories > 0.0 {
            self.archive_snapshot(previous, self.current_summary)
        } else {
            debug!(date = %previous, "skipping archive of zero-calorie day");
            false
        };

        self.meal_log.clear();
        self.current_date = observed;
        // clock went backwards onto an archived day: reopen it
        self.current_summary = self.archive.remove(&observed).unwrap_or_default();

        info!(from = %previous, to = %observed, archived, "ledger rolled over");
        RolloverResult::RolledOver { previous, archived }
    }

    /// Defensive: the archive never holds the current date, so an existing
    /// key here means the record was built outside `DailyLedger`'s API.
    fn archive_snapshot(&mut self, date: NaiveDate, summary: NutrientVector) -> bool {
        if self.archive.contains_key(&date) {
            debug!(date = %date, "day already archived, keeping existing snapshot");
            return false;
        }
        self.archive.insert(date, summary);
        true
    }

    /// Drop the in-progress day, keeping the archive.
    pub fn clear_current(&mut self) {
        self.current_summary = NutrientVector::zero();
        self.meal_log.clear();
    }

    /// Restore invariants on a ledger loaded from storage.
    pub(crate) fn normalize(&mut self) {
        self.current_summary = self.current_summary.normalized();
        for v in self.archive.values_mut() {
            *v = v.normalized();
        }
        self.archive.remove(&self.current_date);
    }
}
