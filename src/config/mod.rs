//! Configuration management
//!
//! Pages of `key value` declarations are stacked in a [`ConfigStore`] and
//! resolved into a typed [`TextConfig`] snapshot. Files (`.prc` or `.json`)
//! sit at the bottom, then the process environment, then explicit overrides.

pub mod page;
pub mod store;
pub mod text;
pub mod value;
pub mod variable;

pub use page::{ConfigPage, Declaration, Layer};
pub use store::{ConfigStore, Lookup};
pub use text::TextConfig;
pub use value::ConfigValue;
pub use variable::{ConfigVariable, Problem, VariableInfo};
