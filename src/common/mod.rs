//! Types shared with the rendering side

pub mod filter;

pub use filter::FilterType;
