//! Layered key/value store
//!
//! Pages are kept ordered by [`Layer`], then by the order they were added.
//! A lookup walks from the highest-precedence page down and returns the
//! first page that declares the key.

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::config::page::{ConfigPage, Layer, is_page_file};
use crate::constants::{KEY_PREFIX, LOG_TARGET, files, pages};

/// The winning declaration for a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookup<'a> {
    pub value: &'a str,
    /// Name of the page that supplied the value
    pub page: &'a str,
    pub layer: Layer,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    pages: Vec<ConfigPage>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discovered files plus the process environment.
    ///
    /// Pages that fail to load are logged and skipped.
    pub fn load_default() -> Result<Self> {
        Self::load_layered(&Self::default_dir(), std::env::vars_os())
    }

    /// Pages from `dir` (leniently) under an environment page built from `vars`
    pub fn load_layered<I>(dir: &Path, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let mut store = Self::new();
        store.load_dir_lenient(dir)?;
        Ok(store.with_page(ConfigPage::from_vars_os(vars)))
    }

    /// Directory scanned for pages: `$TEXT_CONFIG_DIR`, else the user config dir
    pub fn default_dir() -> PathBuf {
        Self::default_dir_with(|name| std::env::var_os(name), dirs::config_dir())
    }

    /// [`ConfigStore::default_dir`] with the environment lookup and the user
    /// config dir supplied by the caller
    pub fn default_dir_with<F>(var: F, config_dir: Option<PathBuf>) -> PathBuf
    where
        F: Fn(&str) -> Option<OsString>,
    {
        if let Some(dir) = var(files::DIR_ENV_VAR) {
            return PathBuf::from(dir);
        }

        let mut path = config_dir.unwrap_or_else(|| PathBuf::from("."));
        path.push(files::APP_DIR);
        path
    }

    pub fn add_page(&mut self, page: ConfigPage) {
        let index = self.pages.partition_point(|p| p.layer() <= page.layer());
        self.pages.insert(index, page);
    }

    pub fn with_page(mut self, page: ConfigPage) -> Self {
        self.add_page(page);
        self
    }

    /// Add the process environment as an [`Layer::Environment`] page
    pub fn with_environment(self) -> Self {
        self.with_page(ConfigPage::from_vars_os(std::env::vars_os()))
    }

    /// Set an explicit override, replacing any earlier override of the key
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let index = match self
            .pages
            .iter()
            .rposition(|p| p.layer() == Layer::Explicit && p.name() == pages::EXPLICIT)
        {
            Some(index) => index,
            None => {
                self.add_page(ConfigPage::new(pages::EXPLICIT, Layer::Explicit));
                self.pages.len() - 1
            }
        };
        self.pages[index].set(key, value);
    }

    /// Load every `.prc` and `.json` page in `dir`, in file-name order.
    ///
    /// A missing directory loads nothing. Any page that fails to load fails
    /// the whole call. Returns the number of pages added.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize> {
        let paths = page_paths(dir)?;
        for path in &paths {
            self.add_page(ConfigPage::load(path)?);
        }

        info!(target: LOG_TARGET, dir = ?dir, pages = paths.len(), "Loaded config pages");
        Ok(paths.len())
    }

    /// Like [`ConfigStore::load_dir`], but a page that fails to load is
    /// logged and skipped. Only an unreadable directory is an error.
    pub fn load_dir_lenient(&mut self, dir: &Path) -> Result<usize> {
        let mut loaded = 0;
        for path in page_paths(dir)? {
            match ConfigPage::load(&path) {
                Ok(page) => {
                    self.add_page(page);
                    loaded += 1;
                }
                Err(e) => error!(
                    target: LOG_TARGET,
                    page = ?path,
                    error = %format!("{:#}", e),
                    "Failed to load config page, skipping"
                ),
            }
        }

        info!(target: LOG_TARGET, dir = ?dir, pages = loaded, "Loaded config pages");
        Ok(loaded)
    }

    pub fn pages(&self) -> &[ConfigPage] {
        &self.pages
    }

    pub fn lookup(&self, key: &str) -> Option<Lookup<'_>> {
        self.pages.iter().rev().find_map(|page| {
            page.get(key).map(|value| Lookup {
                value,
                page: page.name(),
                layer: page.layer(),
            })
        })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.lookup(key).map(|found| found.value)
    }

    /// `text-` keys declared in file or explicit pages that are not in `known`.
    ///
    /// The environment page is skipped: unrelated `TEXT_*` variables are common.
    pub fn unknown_keys(&self, known: &[&str]) -> Vec<String> {
        let mut unknown: Vec<String> = self
            .pages
            .iter()
            .filter(|page| page.layer() != Layer::Environment)
            .flat_map(|page| page.declarations())
            .map(|d| d.key.as_str())
            .filter(|key| key.starts_with(KEY_PREFIX) && !known.contains(key))
            .map(str::to_string)
            .collect();
        unknown.sort();
        unknown.dedup();
        unknown
    }
}

/// Page files in `dir`, sorted by name; empty if `dir` does not exist
fn page_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        debug!(target: LOG_TARGET, dir = ?dir, "Config directory not found, skipping");
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)
        .with_context(|| format!("Failed to read config directory {:?}", dir))?
    {
        let path = entry?.path();
        if path.is_file() && is_page_file(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
