//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_store` / `open_store_with_env` - Resolve config and open the store
//! - `parse_date` - YYYY-MM-DD argument parsing
//! - `cmd_reset` - Reset state to sample data

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use nova_core::{EngineConfig, FileBackend, MemoryBackend, StateBackend, Store};
use tracing::debug;

/// Today's date in local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Resolve config against the process environment, then open the store
pub fn open_store(
    config_path: Option<&Path>,
    data_dir: Option<&Path>,
    ephemeral: bool,
    today: NaiveDate,
) -> Result<(EngineConfig, Store)> {
    open_store_with_env(config_path, data_dir, ephemeral, today, |key| {
        std::env::var(key).ok()
    })
}

/// Open the store on disk or in memory, with `env` answering `NOVA_*` lookups
///
/// `--data-dir` overrides both the config file and `NOVA_DATA_DIR`.
pub fn open_store_with_env<F>(
    config_path: Option<&Path>,
    data_dir: Option<&Path>,
    ephemeral: bool,
    today: NaiveDate,
    env: F,
) -> Result<(EngineConfig, Store)>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = EngineConfig::load(config_path, env).context("Failed to load config")?;
    if let Some(dir) = data_dir {
        config.data_dir = Some(dir.to_path_buf());
    }

    let backend: Box<dyn StateBackend> = if ephemeral {
        Box::new(MemoryBackend::new())
    } else {
        let dir = config.resolved_data_dir();
        Box::new(FileBackend::new(&dir).context("Failed to open data directory")?)
    };
    debug!(backend = backend.name(), key = %config.state_key, "Opening store");

    let store = Store::open(backend, &config.state_key, today).context("Failed to open store")?;
    Ok((config, store))
}

/// Parse a YYYY-MM-DD argument
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}' (use YYYY-MM-DD)", raw))
}

/// Parse an on/off switch argument
pub fn parse_switch(raw: &str) -> Result<bool> {
    match raw.to_lowercase().as_str() {
        "on" | "true" | "yes" | "enable" => Ok(true),
        "off" | "false" | "no" | "disable" => Ok(false),
        _ => anyhow::bail!("Expected on or off, got '{}'", raw),
    }
}

pub fn cmd_reset(store: &mut Store, today: NaiveDate) -> Result<()> {
    println!(
        "🔄 Resetting {} ({} backend)...",
        store.key(),
        store.backend_name()
    );
    store.reset(today).context("Failed to reset state")?;

    let state = store.state();
    println!("✅ State reset to sample data");
    println!(
        "   {} accounts, {} transactions, {} bills, {} goals",
        state.accounts.len(),
        state.transactions.len(),
        state.subscriptions.len(),
        state.goals.len()
    );
    Ok(())
}
