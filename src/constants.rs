//! Crate-wide constants
//!
//! Configuration keys, their documented defaults, and the names used to
//! discover configuration files and environment overrides.

/// Tracing target used for every log line emitted by the registry
pub const LOG_TARGET: &str = "text";

/// Prefix shared by every key this registry declares
pub const KEY_PREFIX: &str = "text-";

/// Configuration key names
pub mod keys {
    pub const FLATTEN: &str = "text-flatten";
    pub const UPDATE_CLEARED_GLYPHS: &str = "text-update-cleared-glyphs";
    pub const ANISOTROPIC_DEGREE: &str = "text-anisotropic-degree";
    pub const TEXTURE_MARGIN: &str = "text-texture-margin";
    pub const POLY_MARGIN: &str = "text-poly-margin";
    pub const PAGE_X_SIZE: &str = "text-page-x-size";
    pub const PAGE_Y_SIZE: &str = "text-page-y-size";
    pub const SMALL_CAPS: &str = "text-small-caps";
    pub const SMALL_CAPS_SCALE: &str = "text-small-caps-scale";
    pub const DEFAULT_FONT: &str = "text-default-font";
    pub const TAB_WIDTH: &str = "text-tab-width";
    pub const SOFT_HYPHEN_KEY: &str = "text-soft-hyphen-key";
    pub const SOFT_BREAK_KEY: &str = "text-soft-break-key";
    pub const SOFT_HYPHEN_OUTPUT: &str = "text-soft-hyphen-output";
    pub const HYPHEN_RATIO: &str = "text-hyphen-ratio";
    pub const NEVER_BREAK_BEFORE: &str = "text-never-break-before";
    pub const MAX_NEVER_BREAK: &str = "text-max-never-break";
    pub const MINFILTER: &str = "text-minfilter";
    pub const MAGFILTER: &str = "text-magfilter";
}

/// Default values applied when a key is absent or malformed
pub mod defaults {
    use crate::common::FilterType;

    pub const FLATTEN: bool = true;
    pub const UPDATE_CLEARED_GLYPHS: bool = false;
    pub const ANISOTROPIC_DEGREE: i32 = 1;

    /// Padding pixels around each glyph in an atlas page
    pub const TEXTURE_MARGIN: i32 = 2;
    pub const POLY_MARGIN: f32 = 0.0;

    pub const PAGE_X_SIZE: i32 = 256;
    pub const PAGE_Y_SIZE: i32 = 256;

    pub const SMALL_CAPS: bool = false;
    pub const SMALL_CAPS_SCALE: f32 = 0.8;

    /// Empty means "use the built-in font"
    pub const DEFAULT_FONT: &str = "";
    pub const TAB_WIDTH: f32 = 5.0;

    /// ASCII ETX, embedded in text to mark an optional hyphenation point
    pub const SOFT_HYPHEN_KEY: i32 = 3;
    /// ASCII EOT, embedded in text to mark an optional break without a hyphen
    pub const SOFT_BREAK_KEY: i32 = 4;
    pub const SOFT_HYPHEN_OUTPUT: &str = "-";

    pub const HYPHEN_RATIO: f32 = 0.7;
    pub const NEVER_BREAK_BEFORE: &str = ",.-:?!;";
    pub const MAX_NEVER_BREAK: i32 = 3;

    pub const MINFILTER: FilterType = FilterType::LinearMipmapLinear;
    pub const MAGFILTER: FilterType = FilterType::Linear;
}

/// Configuration file discovery
pub mod files {
    /// Directory under the user config dir holding configuration pages
    pub const APP_DIR: &str = "text-config";

    /// Environment variable overriding the discovery directory
    pub const DIR_ENV_VAR: &str = "TEXT_CONFIG_DIR";

    /// Extensions recognized as configuration pages
    pub const PRC_EXTENSION: &str = "prc";
    pub const JSON_EXTENSION: &str = "json";
}

/// Names given to pages that do not come from a file
pub mod pages {
    pub const ENVIRONMENT: &str = "environment";
    pub const EXPLICIT: &str = "explicit";
}
