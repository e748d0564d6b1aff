//! Typed variable declarations
//!
//! A [`ConfigVariable`] names a key, documents it, and knows its default.
//! Resolving it against a [`ConfigStore`] never fails: malformed values are
//! reported as [`Problem`]s and replaced by the default, and the caller
//! decides whether problems are warnings or errors.

use std::fmt;
use tracing::trace;

use crate::config::store::ConfigStore;
use crate::config::value::ConfigValue;
use crate::constants::LOG_TARGET;

/// Range or consistency check run after a value parses
pub type Check<T> = fn(&T) -> Result<(), String>;

pub struct ConfigVariable<T> {
    name: &'static str,
    description: &'static str,
    default: fn() -> T,
    check: Option<Check<T>>,
}

/// A declared value that could not be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub key: &'static str,
    pub value: String,
    /// Page that supplied the bad value
    pub page: String,
    pub reason: String,
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} = '{}' (from {}): {}",
            self.key, self.value, self.page, self.reason
        )
    }
}

/// Type-erased description of a variable, for listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableInfo {
    pub name: &'static str,
    pub type_name: &'static str,
    pub default: String,
    pub description: &'static str,
}

impl<T: ConfigValue> ConfigVariable<T> {
    pub const fn new(name: &'static str, description: &'static str, default: fn() -> T) -> Self {
        Self {
            name,
            description,
            default,
            check: None,
        }
    }

    pub const fn with_check(mut self, check: Check<T>) -> Self {
        self.check = Some(check);
        self
    }

    pub fn default_value(&self) -> T {
        (self.default)()
    }

    pub fn info(&self) -> VariableInfo {
        VariableInfo {
            name: self.name,
            type_name: T::TYPE_NAME,
            default: self.default_value().to_config_string(),
            description: self.description,
        }
    }

    /// Look the key up and parse it, falling back to the default.
    ///
    /// Parse and check failures are pushed onto `problems`.
    pub fn resolve(&self, store: &ConfigStore, problems: &mut Vec<Problem>) -> T {
        let Some(found) = store.lookup(self.name) else {
            return self.default_value();
        };

        let parsed = T::parse_value(found.value).and_then(|value| match self.check {
            Some(check) => check(&value).map(|()| value),
            None => Ok(value),
        });

        match parsed {
            Ok(value) => {
                trace!(
                    target: LOG_TARGET,
                    key = self.name,
                    value = found.value,
                    page = found.page,
                    "Resolved config variable"
                );
                value
            }
            Err(reason) => {
                problems.push(Problem {
                    key: self.name,
                    value: found.value.to_string(),
                    page: found.page.to_string(),
                    reason,
                });
                self.default_value()
            }
        }
    }
}
