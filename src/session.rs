use chrono::NaiveDate;
use tracing::info;

use crate::error::Result;
use crate::ledger::{DailyLedger, RolloverResult};
use crate::models::{MealLogEntry, SourceKind, WeightLogEntry};
use crate::nutrients::NutrientVector;
use crate::store::{LedgerStore, UserRecord};
use crate::weight::WeightLog;

/// One identity's ledger and weight log, written through to the store after
/// every mutation.
///
/// Two sessions for the same identity are not coordinated; whichever saves
/// last wins.
pub struct Session<'a, S: LedgerStore + ?Sized> {
    store: &'a S,
    identity: String,
    record: UserRecord,
}

impl<'a, S: LedgerStore + ?Sized> Session<'a, S> {
    /// Hydrate the identity's record, or start a fresh one dated `today`.
    /// A stored ledger from an earlier day is rolled over to `today`.
    pub fn start(store: &'a S, identity: &str, today: NaiveDate) -> Result<Self> {
        let record = match store.load(identity)? {
            Some(record) => record.normalized(),
            None => {
                info!(identity, "new ledger");
                UserRecord {
                    ledger: DailyLedger::new(today),
                    weights: WeightLog::new(),
                }
            }
        };

        let mut session = Self {
            store,
            identity: identity.to_string(),
            record,
        };
        session.check_rollover(today)?;
        Ok(session)
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn ledger(&self) -> &DailyLedger {
        &self.record.ledger
    }

    pub fn weights(&self) -> &WeightLog {
        &self.record.weights
    }

    pub fn log_meal(
        &mut self,
        nutrients: NutrientVector,
        name: &str,
        source: SourceKind,
    ) -> Result<MealLogEntry> {
        let entry = self.record.ledger.log_meal(nutrients, name, source);
        self.save()?;
        Ok(entry)
    }

    /// Only writes when the day actually changed.
    pub fn check_rollover(&mut self, observed: NaiveDate) -> Result<RolloverResult> {
        let result = self.record.ledger.check_rollover(observed);
        if result != RolloverResult::Unchanged {
            self.save()?;
        }
        Ok(result)
    }

    pub fn log_weight(&mut self, date: NaiveDate, weight: f64) -> Result<WeightLogEntry> {
        let entry = self.record.weights.upsert(date, weight)?;
        self.save()?;
        Ok(entry)
    }

    /// Logout: drop today's progress but keep history and weights.
    pub fn end(mut self) -> Result<()> {
        self.record.ledger.clear_current();
        self.save()
    }

    fn save(&self) -> Result<()> {
        self.store.save(&self.identity, &self.record)
    }
}
