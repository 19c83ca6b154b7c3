use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::WeightLogEntry;

/// Date-unique weight observations, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightLog {
    entries: Vec<WeightLogEntry>,
}

impl WeightLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the weight for `date`.
    ///
    /// Weight must be finite and positive; on error the log is unchanged.
    pub fn upsert(&mut self, date: NaiveDate, weight: f64) -> Result<WeightLogEntry> {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(Error::invalid(format!(
                "weight must be a positive number, got {}",
                weight
            )));
        }

        let entry = WeightLogEntry { date, weight };
        match self.entries.iter_mut().find(|e| e.date == date) {
            Some(existing) => {
                debug!(date = %date, old = existing.weight, new = weight, "weight replaced");
                existing.weight = weight;
            }
            None => {
                debug!(date = %date, weight, "weight added");
                self.entries.push(entry.clone());
            }
        }
        self.sort();

        Ok(entry)
    }

    /// The authoritative current weight.
    pub fn latest(&self) -> Option<&WeightLogEntry> {
        self.entries.first()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&WeightLogEntry> {
        self.entries.iter().find(|e| e.date == date)
    }

    pub fn entries(&self) -> &[WeightLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries between `start` and `end` inclusive, oldest first.
    pub fn range(&self, start: NaiveDate, end: NaiveDate) -> Vec<WeightLogEntry> {
        let mut out: Vec<WeightLogEntry> = self
            .entries
            .iter()
            .filter(|e| e.date >= start && e.date <= end)
            .cloned()
            .collect();
        out.sort_by_key(|e| e.date);
        out
    }

    /// Restore invariants on a log loaded from storage: invalid weights are
    /// dropped and for duplicate dates the first stored entry wins.
    pub(crate) fn normalize(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.entries
            .retain(|e| e.weight.is_finite() && e.weight > 0.0 && seen.insert(e.date));
        self.sort();
    }

    fn sort(&mut self) {
        self.entries.sort_by(|a, b| b.date.cmp(&a.date));
    }
}
