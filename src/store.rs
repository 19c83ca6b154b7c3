use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::ledger::DailyLedger;
use crate::weight::WeightLog;

/// Everything persisted for one identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub ledger: DailyLedger,
    #[serde(default)]
    pub weights: WeightLog,
}

impl UserRecord {
    /// Restore ledger and weight log invariants after loading.
    pub fn normalized(mut self) -> Self {
        self.ledger.normalize();
        self.weights.normalize();
        self
    }
}

/// Persistence collaborator, keyed by identity. Writes replace the whole
/// record, so concurrent writers for one identity are last-write-wins.
pub trait LedgerStore {
    fn load(&self, identity: &str) -> Result<Option<UserRecord>>;

    fn save(&self, identity: &str, record: &UserRecord) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, UserRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for MemoryStore {
    fn load(&self, identity: &str) -> Result<Option<UserRecord>> {
        let records = self
            .records
            .lock()
            .map_err(|_| Error::Storage("memory store lock poisoned".to_string()))?;
        Ok(records.get(identity).cloned())
    }

    fn save(&self, identity: &str, record: &UserRecord) -> Result<()> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| Error::Storage("memory store lock poisoned".to_string()))?;
        records.insert(identity.to_string(), record.clone());
        Ok(())
    }
}

/// One pretty-printed `<identity>.json` per identity.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, identity: &str) -> Result<PathBuf> {
        let valid = !identity.is_empty()
            && identity
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@'))
            && !identity.starts_with('.');
        if !valid {
            return Err(Error::invalid(format!("bad identity {:?}", identity)));
        }
        Ok(self.dir.join(format!("{}.json", identity)))
    }
}

impl LedgerStore for JsonFileStore {
    fn load(&self, identity: &str) -> Result<Option<UserRecord>> {
        let path = self.path_for(identity)?;
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(Error::Storage(format!("reading {}: {}", path.display(), e)));
            }
        };
        let record: UserRecord = serde_json::from_str(&raw)?;
        debug!(path = %path.display(), "record loaded");
        Ok(Some(record))
    }

    fn save(&self, identity: &str, record: &UserRecord) -> Result<()> {
        let path = self.path_for(identity)?;
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| Error::Storage(format!("creating {}: {}", self.dir.display(), e)))?;

        // write then rename so a crash never leaves a half-written record
        let tmp = path.with_extension("json.tmp");
        let body = serde_json::to_string_pretty(record)?;
        std::fs::write(&tmp, body)
            .map_err(|e| Error::Storage(format!("writing {}: {}", tmp.display(), e)))?;
        std::fs::rename(&tmp, &path)
            .map_err(|e| Error::Storage(format!("renaming to {}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "record saved");
        Ok(())
    }
}
