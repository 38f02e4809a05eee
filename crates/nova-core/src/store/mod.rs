//! Entity store and persistence lifecycle
//!
//! This module is organized by domain:
//! - `backend` - Persistence adapters (memory, file)
//! - `accounts` - Account and debt operations
//! - `goals` - Savings goal operations
//! - `subscriptions` - Bills and the planning calendar
//! - `transactions` - Transaction lookup and removal
//! - `user` - Profile and security settings
//!
//! Entity operations are plain functions over `&mut AppState`: they validate,
//! mutate in place and return an outcome. `Store::apply` wraps them so every
//! successful mutation is persisted before anyone else can observe it.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{NaiveDate, Utc};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::AppState;
use crate::seed;

mod accounts;
mod backend;
mod goals;
mod subscriptions;
mod transactions;
mod user;

pub use accounts::{
    account_name, add_debt, asset_accounts, debt_accounts, delete_account, NewDebt,
    UNKNOWN_ACCOUNT,
};
pub use backend::{FileBackend, MemoryBackend, StateBackend};
pub use goals::{add_goal, delete_goal, smart_icon};
pub use subscriptions::{add_bill, bills_due_on, upcoming_bills_total};
pub use transactions::{delete_transaction, find_transaction};
pub use user::{set_security, update_user_name};

/// Store shared with deferred callbacks
///
/// The lock is only held for a synchronous read or mutation, never across
/// an `.await`.
pub type SharedStore = Arc<Mutex<Store>>;

/// Lock a shared store
pub fn lock(shared: &SharedStore) -> Result<MutexGuard<'_, Store>> {
    shared
        .lock()
        .map_err(|_| Error::Persistence("store lock poisoned".to_string()))
}

/// Default data directory (~/.local/share/nova)
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nova")
}

/// Allocate an id of the form `<prefix><unix millis>`, bumping until unused
pub(crate) fn next_id<F>(prefix: &str, taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    let mut stamp = Utc::now().timestamp_millis();
    loop {
        let id = format!("{}{}", prefix, stamp);
        if !taken(&id) {
            return id;
        }
        stamp += 1;
    }
}

/// Backfill fields absent in older snapshots
///
/// Returns the names of the fields that were added.
pub fn migrate(snapshot: &mut Value) -> Result<Vec<&'static str>> {
    let root = snapshot
        .as_object_mut()
        .ok_or_else(|| Error::Persistence("snapshot is not a JSON object".to_string()))?;

    let mut backfilled = Vec::new();
    for field in ["chatHistory", "rules"] {
        if !root.contains_key(field) || root[field].is_null() {
            root.insert(field.to_string(), Value::Array(Vec::new()));
            backfilled.push(field);
        }
    }
    Ok(backfilled)
}

/// Parse a persisted snapshot, applying migrations
pub fn parse_snapshot(blob: &str) -> Result<AppState> {
    let mut value: Value = serde_json::from_str(blob)?;
    for field in migrate(&mut value)? {
        info!(field, "Migrated snapshot: backfilled missing field");
    }
    Ok(serde_json::from_value(value)?)
}

fn write_snapshot(backend: &mut dyn StateBackend, key: &str, state: &AppState) -> Result<()> {
    let blob = serde_json::to_string(state)?;
    backend.set(key, &blob)
}

/// The single owned root of financial state plus its persistence adapter
pub struct Store {
    state: AppState,
    backend: Box<dyn StateBackend>,
    key: String,
}

impl Store {
    /// Load the snapshot under `key`, or seed and persist a fresh state
    pub fn open(mut backend: Box<dyn StateBackend>, key: &str, today: NaiveDate) -> Result<Self> {
        let state = match backend.get(key)? {
            Some(blob) => {
                let state = parse_snapshot(&blob)?;
                debug!(
                    backend = backend.name(),
                    transactions = state.transactions.len(),
                    "Loaded snapshot"
                );
                state
            }
            None => {
                let state = seed::generate_with_greeting(today);
                write_snapshot(backend.as_mut(), key, &state)?;
                info!(backend = backend.name(), key, "No snapshot found, seeded new state");
                state
            }
        };

        Ok(Self {
            state,
            backend,
            key: key.to_string(),
        })
    }

    /// Open over a fresh in-memory backend
    pub fn in_memory(today: NaiveDate) -> Result<Self> {
        Self::open(Box::new(MemoryBackend::new()), crate::config::DEFAULT_STATE_KEY, today)
    }

    /// Read accessor for the current state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Run a mutation and persist the result
    ///
    /// The operation runs against a copy. The copy is written through the
    /// backend and only then becomes the current state, so a rejected
    /// operation or a failed write leaves both memory and the snapshot as
    /// they were.
    pub fn apply<T, F>(&mut self, op: F) -> Result<T>
    where
        F: FnOnce(&mut AppState) -> Result<T>,
    {
        let mut next = self.state.clone();
        let outcome = op(&mut next)?;
        write_snapshot(self.backend.as_mut(), &self.key, &next)?;
        self.state = next;
        Ok(outcome)
    }

    /// Write the current state in full
    pub fn persist(&mut self) -> Result<()> {
        write_snapshot(self.backend.as_mut(), &self.key, &self.state)
    }

    /// Start again from the seed state
    ///
    /// The seed replaces the snapshot in a single write; a failed write
    /// leaves both memory and the snapshot as they were.
    pub fn reset(&mut self, today: NaiveDate) -> Result<()> {
        let state = seed::generate_with_greeting(today);
        write_snapshot(self.backend.as_mut(), &self.key, &state)?;
        self.state = state;
        info!(key = %self.key, "State reset to seed data");
        Ok(())
    }

    pub fn into_shared(self) -> SharedStore {
        Arc::new(Mutex::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChatMessage;
    use crate::test_utils::{sample_state, today};

    const KEY: &str = "novaState";

    /// Backend whose writes can be switched off
    struct FlakyBackend {
        inner: MemoryBackend,
        fail_writes: Arc<Mutex<bool>>,
    }

    impl StateBackend for FlakyBackend {
        fn name(&self) -> &str {
            "flaky"
        }

        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, blob: &str) -> Result<()> {
            if *self.fail_writes.lock().unwrap() {
                return Err(Error::Persistence("disk full".to_string()));
            }
            self.inner.set(key, blob)
        }

        fn remove(&mut self, key: &str) -> Result<()> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn test_open_seeds_and_persists() {
        let backend = MemoryBackend::new();
        let store = Store::open(Box::new(backend.clone()), KEY, today()).unwrap();

        assert_eq!(store.state().chat_history.len(), 1);
        assert_eq!(store.state().chat_history[0].content, seed::GREETING);

        let blob = backend.get(KEY).unwrap().expect("seed persisted");
        let persisted = parse_snapshot(&blob).unwrap();
        assert_eq!(&persisted, store.state());
    }

    #[test]
    fn test_open_loads_existing_snapshot() {
        let state = sample_state();
        let blob = serde_json::to_string(&state).unwrap();
        let backend = MemoryBackend::with_entry(KEY, &blob);

        let store = Store::open(Box::new(backend), KEY, today()).unwrap();
        assert_eq!(store.state(), &state);
    }

    #[test]
    fn test_migration_backfills_chat_history_and_rules() {
        let mut value = serde_json::to_value(sample_state()).unwrap();
        let root = value.as_object_mut().unwrap();
        root.remove("chatHistory");
        root.remove("rules");
        let blob = value.to_string();

        let state = parse_snapshot(&blob).unwrap();
        assert!(state.chat_history.is_empty());
        assert!(state.rules.is_empty());

        let mut value: Value = serde_json::from_str(&blob).unwrap();
        assert_eq!(migrate(&mut value).unwrap(), vec!["chatHistory", "rules"]);
        assert!(migrate(&mut value).unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_snapshot_is_an_error() {
        let backend = MemoryBackend::with_entry(KEY, "{not json");
        let result = Store::open(Box::new(backend.clone()), KEY, today());
        assert!(matches!(result, Err(Error::Json(_))));
        // Not overwritten
        assert_eq!(backend.get(KEY).unwrap().as_deref(), Some("{not json"));
    }

    #[test]
    fn test_apply_persists_on_success() {
        let backend = MemoryBackend::new();
        let mut store = Store::open(Box::new(backend.clone()), KEY, today()).unwrap();

        store
            .apply(|s| {
                s.chat_history.push(ChatMessage::user("hi"));
                Ok(())
            })
            .unwrap();

        let persisted = parse_snapshot(&backend.get(KEY).unwrap().unwrap()).unwrap();
        assert_eq!(persisted.chat_history.len(), 2);
    }

    #[test]
    fn test_apply_rejected_leaves_state_untouched() {
        let mut store = Store::in_memory(today()).unwrap();
        let before = store.state().clone();

        let result: Result<()> = store.apply(|s| {
            s.goals.clear();
            Err(Error::Validation("nope".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn test_apply_write_failure_is_atomic() {
        let fail_writes = Arc::new(Mutex::new(false));
        let backend = FlakyBackend {
            inner: MemoryBackend::new(),
            fail_writes: fail_writes.clone(),
        };
        let observer = backend.inner.clone();
        let mut store = Store::open(Box::new(backend), KEY, today()).unwrap();
        let before = store.state().clone();

        *fail_writes.lock().unwrap() = true;
        let result = store.apply(|s| {
            s.goals.clear();
            Ok(())
        });

        assert!(matches!(result, Err(Error::Persistence(_))));
        assert_eq!(store.state(), &before);
        let persisted = parse_snapshot(&observer.get(KEY).unwrap().unwrap()).unwrap();
        assert_eq!(persisted, before);
    }

    #[test]
    fn test_reset_reseeds() {
        let mut store = Store::in_memory(today()).unwrap();
        store
            .apply(|s| {
                s.goals.clear();
                Ok(())
            })
            .unwrap();
        assert!(store.state().goals.is_empty());

        store.reset(today()).unwrap();
        assert_eq!(store.state().goals.len(), 2);
        assert_eq!(store.state().chat_history.len(), 1);
    }

    #[test]
    fn test_reset_write_failure_keeps_state_and_snapshot() {
        let fail_writes = Arc::new(Mutex::new(false));
        let backend = FlakyBackend {
            inner: MemoryBackend::new(),
            fail_writes: fail_writes.clone(),
        };
        let observer = backend.inner.clone();
        let mut store = Store::open(Box::new(backend), KEY, today()).unwrap();
        store
            .apply(|s| {
                s.goals.clear();
                Ok(())
            })
            .unwrap();
        let before = store.state().clone();

        *fail_writes.lock().unwrap() = true;
        let result = store.reset(today());

        assert!(matches!(result, Err(Error::Persistence(_))));
        assert!(store.state().goals.is_empty());
        assert_eq!(store.state(), &before);
        let blob = observer.get(KEY).unwrap().expect("snapshot kept");
        assert_eq!(parse_snapshot(&blob).unwrap(), before);
    }

    #[test]
    fn test_next_id_skips_taken() {
        let first = next_id("g", |_| false);
        assert!(first.starts_with('g'));

        let taken = first.clone();
        let second = next_id("g", |id| id == taken);
        assert_ne!(second, first);
    }
}
