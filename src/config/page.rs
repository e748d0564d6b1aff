//! Configuration pages
//!
//! A page is one source of `key value` declarations: a `.prc` text file, a
//! `.json` object, the process environment, or a set of explicit overrides.
//! Pages are stacked by [`ConfigStore`](crate::config::ConfigStore).

use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::ffi::OsString;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::constants::{KEY_PREFIX, LOG_TARGET, files, pages};

/// Precedence class of a page. Later variants override earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    /// Loaded from a configuration file on disk
    File,
    /// Taken from process environment variables
    Environment,
    /// Set programmatically (or with `--set` on the command line)
    Explicit,
}

/// A single `key value` pair as written in a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct ConfigPage {
    name: String,
    layer: Layer,
    declarations: Vec<Declaration>,
}

impl ConfigPage {
    pub fn new(name: impl Into<String>, layer: Layer) -> Self {
        Self {
            name: name.into(),
            layer,
            declarations: Vec::new(),
        }
    }

    /// Page name used in log lines and problem reports (usually a path)
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Append a declaration. An earlier declaration of the same key still wins.
    pub fn declare(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.declarations.push(Declaration {
            key: key.into(),
            value: value.into(),
        });
    }

    /// Replace every declaration of `key` with a single new one
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.declarations.retain(|d| d.key != key);
        self.declare(key, value);
    }

    /// Value of the first declaration of `key` in this page
    pub fn get(&self, key: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|d| d.key == key)
            .map(|d| d.value.as_str())
    }

    /// Parse prc text: one `key value` per line, `#` comment lines.
    ///
    /// The value is the rest of the line after the first run of whitespace,
    /// trimmed. A bare key declares the empty string.
    pub fn parse_prc(name: impl Into<String>, layer: Layer, text: &str) -> Self {
        let mut page = Self::new(name, layer);

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = match line.split_once(char::is_whitespace) {
                Some((key, value)) => (key, value.trim()),
                None => (line, ""),
            };
            page.declare(key, value);
        }

        page
    }

    /// Parse a JSON object of scalar members into a page
    pub fn parse_json(name: impl Into<String>, layer: Layer, text: &str) -> Result<Self> {
        let name = name.into();
        let object: serde_json::Map<String, Value> = serde_json::from_str(text)
            .with_context(|| format!("Failed to parse JSON object from {}", name))?;

        let mut page = Self::new(name, layer);
        for (key, value) in object {
            let value = match value {
                Value::String(s) => s,
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                other => bail!(
                    "Key {} in {} must be a string, number or boolean, found {}",
                    key,
                    page.name,
                    other
                ),
            };
            page.declare(key, value);
        }

        Ok(page)
    }

    /// Build the environment page from `(name, value)` pairs.
    ///
    /// `TEXT_TEXTURE_MARGIN=4` declares `text-texture-margin 4`. The
    /// discovery directory variable is not a setting and is skipped.
    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut page = Self::new(pages::ENVIRONMENT, Layer::Environment);

        for (name, value) in vars {
            if name == files::DIR_ENV_VAR {
                continue;
            }
            if let Some(key) = env_var_to_key(&name) {
                page.declare(key, value.trim());
            }
        }

        page
    }

    /// [`ConfigPage::from_vars`] over raw OS strings, as from `std::env::vars_os`.
    ///
    /// Pairs that are not valid UTF-8 are skipped.
    pub fn from_vars_os<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        Self::from_vars(vars.into_iter().filter_map(|(name, value)| {
            match (name.into_string(), value.into_string()) {
                (Ok(name), Ok(value)) => Some((name, value)),
                (Ok(name), Err(_)) if env_var_to_key(&name).is_some() => {
                    warn!(
                        target: LOG_TARGET,
                        var = %name,
                        "Environment value is not valid UTF-8, ignoring"
                    );
                    None
                }
                _ => None,
            }
        }))
    }

    /// Load a page from disk, choosing the format by file extension
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config page {:?}", path))?;
        let name = path.display().to_string();

        let page = if is_json(path) {
            Self::parse_json(name, Layer::File, &contents)?
        } else {
            Self::parse_prc(name, Layer::File, &contents)
        };

        debug!(
            target: LOG_TARGET,
            page = %page.name,
            declarations = page.len(),
            "Loaded config page"
        );
        Ok(page)
    }
}

/// True for files this crate knows how to load as pages
pub fn is_page_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some(files::PRC_EXTENSION) | Some(files::JSON_EXTENSION)
    )
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some(files::JSON_EXTENSION)
}

/// `TEXT_TAB_WIDTH` -> `text-tab-width`; `None` for names outside the prefix
fn env_var_to_key(name: &str) -> Option<String> {
    if !name
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
    {
        return None;
    }

    let key = name.to_ascii_lowercase().replace('_', "-");
    (key.starts_with(KEY_PREFIX) && key.len() > KEY_PREFIX.len()).then_some(key)
}

/// `text-tab-width` -> `TEXT_TAB_WIDTH`
pub fn key_to_env_var(key: &str) -> String {
    key.to_ascii_uppercase().replace('-', "_")
}
