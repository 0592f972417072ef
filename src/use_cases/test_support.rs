use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::errors::StorageError;
use crate::domain::ports::{Clock, SessionStorage};

pub(crate) type KeyTable = Arc<Mutex<HashMap<String, String>>>;

// Shared fixed time source for deterministic use-case tests.
pub(crate) struct FixedClock(pub(crate) NaiveDateTime);

impl FixedClock {
    pub(crate) fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> Self {
        let now = NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, 0))
            .expect("valid fixture time");
        Self(now)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub get: bool,
    pub set: bool,
    pub remove: bool,
}

// In-memory storage whose contents tests can seed and inspect.
#[derive(Clone)]
pub(crate) struct RecordingStorage {
    entries: KeyTable,
    failures: FailureFlags,
}

impl RecordingStorage {
    pub(crate) fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            failures: FailureFlags::default(),
        }
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn seed(&self, key: &str, value: &str) {
        let mut guard = self.entries.lock().expect("entries mutex poisoned");
        guard.insert(key.to_string(), value.to_string());
    }

    pub(crate) fn peek(&self, key: &str) -> Option<String> {
        let guard = self.entries.lock().expect("entries mutex poisoned");
        guard.get(key).cloned()
    }

    pub(crate) fn is_empty(&self) -> bool {
        let guard = self.entries.lock().expect("entries mutex poisoned");
        guard.is_empty()
    }
}

impl SessionStorage for RecordingStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.failures.get {
            return Err(StorageError::Unavailable("get failed".to_string()));
        }
        let guard = self.entries.lock().expect("entries mutex poisoned");
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.failures.set {
            return Err(StorageError::Unavailable("quota exceeded".to_string()));
        }
        let mut guard = self.entries.lock().expect("entries mutex poisoned");
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        if self.failures.remove {
            return Err(StorageError::Unavailable("remove failed".to_string()));
        }
        let mut guard = self.entries.lock().expect("entries mutex poisoned");
        guard.remove(key);
        Ok(())
    }
}
