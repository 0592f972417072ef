use chrono::NaiveDateTime;

use crate::domain::errors::StorageError;

// Port for the durable key/value store that survives process restarts.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// Port the gateway reads the bearer token through, once per request.
pub trait TokenSource: Send + Sync {
    fn current_token(&self) -> Option<String>;
}

// Port for retrieving the current local time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

// System clock adapter used outside of tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}
