//! Configuration registry for the text-rendering subsystem
//!
//! Settings are resolved once into an immutable [`TextConfig`] and shared by
//! reference. Code that can pass the snapshot around should build one with
//! [`TextConfig::from_store`]; code that needs process-wide access calls
//! [`init`] (or [`init_with`]) during startup and [`get`] afterwards.

#![deny(unsafe_code)]

pub mod common;
pub mod config;
pub mod constants;

use anyhow::Result;
use std::sync::OnceLock;
use tracing::{debug, error, info};

pub use common::FilterType;
pub use config::{ConfigPage, ConfigStore, Layer, TextConfig};

use constants::LOG_TARGET;

static TEXT_CONFIG: OnceLock<TextConfig> = OnceLock::new();

/// Initialize from the discovered config files and the environment.
///
/// Only the first call does any work; every call returns the same snapshot.
/// Config pages that fail to load are logged and skipped; an unreadable
/// config directory leaves only the environment layer.
pub fn init() -> &'static TextConfig {
    TEXT_CONFIG.get_or_init(|| {
        let store = ConfigStore::load_default().unwrap_or_else(|e| {
            error!(
                target: LOG_TARGET,
                error = %e,
                "Failed to read config directory, using environment only"
            );
            ConfigStore::new().with_environment()
        });
        publish(TextConfig::from_store(&store))
    })
}

/// Initialize from `store` unless already initialized.
///
/// The first initialization wins; later stores are ignored.
pub fn init_with(store: &ConfigStore) -> &'static TextConfig {
    if let Some(config) = TEXT_CONFIG.get() {
        debug!(target: LOG_TARGET, "Text config already initialized, ignoring store");
        return config;
    }
    TEXT_CONFIG.get_or_init(|| publish(TextConfig::from_store(store)))
}

/// Strict form of [`init_with`]: a malformed value is an error and leaves
/// the registry uninitialized.
pub fn try_init_strict(store: &ConfigStore) -> Result<&'static TextConfig> {
    if let Some(config) = TEXT_CONFIG.get() {
        debug!(target: LOG_TARGET, "Text config already initialized, ignoring store");
        return Ok(config);
    }
    let config = TextConfig::from_store_strict(store)?;
    Ok(TEXT_CONFIG.get_or_init(|| publish(config)))
}

/// The process-wide snapshot, initializing with [`init`] on first use
pub fn get() -> &'static TextConfig {
    match TEXT_CONFIG.get() {
        Some(config) => config,
        None => init(),
    }
}

/// The process-wide snapshot, if initialization has happened
pub fn try_get() -> Option<&'static TextConfig> {
    TEXT_CONFIG.get()
}

pub fn is_initialized() -> bool {
    TEXT_CONFIG.get().is_some()
}

fn publish(config: TextConfig) -> TextConfig {
    info!(
        target: LOG_TARGET,
        page_size = ?config.page_size(),
        minfilter = %config.minfilter(),
        magfilter = %config.magfilter(),
        "Text config initialized"
    );
    config
}
