//! The text configuration snapshot
//!
//! Every setting the text subsystem reads is declared here with its key,
//! default and description. [`TextConfig`] is built once from a
//! [`ConfigStore`] and is immutable afterwards.

use anyhow::{Result, bail};
use serde::Serialize;
use std::io::{self, Write};
use tracing::{debug, info, warn};

use crate::common::FilterType;
use crate::config::store::ConfigStore;
use crate::config::value::{ConfigValue, expand_vars};
use crate::config::variable::{ConfigVariable, Problem, VariableInfo};
use crate::constants::{LOG_TARGET, defaults, keys};

pub static FLATTEN: ConfigVariable<bool> = ConfigVariable::new(
    keys::FLATTEN,
    "Flatten generated text geometry into static geometry",
    || defaults::FLATTEN,
);

pub static UPDATE_CLEARED_GLYPHS: ConfigVariable<bool> = ConfigVariable::new(
    keys::UPDATE_CLEARED_GLYPHS,
    "Re-render glyphs whose cache entries were cleared",
    || defaults::UPDATE_CLEARED_GLYPHS,
);

pub static ANISOTROPIC_DEGREE: ConfigVariable<i32> = ConfigVariable::new(
    keys::ANISOTROPIC_DEGREE,
    "Anisotropic filtering degree for glyph page textures",
    || defaults::ANISOTROPIC_DEGREE,
)
.with_check(at_least_one);

pub static TEXTURE_MARGIN: ConfigVariable<i32> = ConfigVariable::new(
    keys::TEXTURE_MARGIN,
    "Pixels of padding around each glyph in a page texture",
    || defaults::TEXTURE_MARGIN,
)
.with_check(non_negative);

pub static POLY_MARGIN: ConfigVariable<f32> = ConfigVariable::new(
    keys::POLY_MARGIN,
    "Padding in polygon units around each glyph quad",
    || defaults::POLY_MARGIN,
)
.with_check(finite_non_negative);

pub static PAGE_X_SIZE: ConfigVariable<i32> = ConfigVariable::new(
    keys::PAGE_X_SIZE,
    "Width in pixels of a glyph page texture",
    || defaults::PAGE_X_SIZE,
)
.with_check(positive);

pub static PAGE_Y_SIZE: ConfigVariable<i32> = ConfigVariable::new(
    keys::PAGE_Y_SIZE,
    "Height in pixels of a glyph page texture",
    || defaults::PAGE_Y_SIZE,
)
.with_check(positive);

pub static SMALL_CAPS: ConfigVariable<bool> = ConfigVariable::new(
    keys::SMALL_CAPS,
    "Render lowercase letters as scaled-down capitals",
    || defaults::SMALL_CAPS,
);

pub static SMALL_CAPS_SCALE: ConfigVariable<f32> = ConfigVariable::new(
    keys::SMALL_CAPS_SCALE,
    "Scale applied to capitals standing in for lowercase letters",
    || defaults::SMALL_CAPS_SCALE,
)
.with_check(finite_positive);

pub static DEFAULT_FONT: ConfigVariable<String> = ConfigVariable::new(
    keys::DEFAULT_FONT,
    "Font file used when none is specified; empty selects the built-in font",
    || defaults::DEFAULT_FONT.to_string(),
);

pub static TAB_WIDTH: ConfigVariable<f32> = ConfigVariable::new(
    keys::TAB_WIDTH,
    "Width of a tab stop in text units",
    || defaults::TAB_WIDTH,
)
.with_check(finite_non_negative);

pub static SOFT_HYPHEN_KEY: ConfigVariable<i32> = ConfigVariable::new(
    keys::SOFT_HYPHEN_KEY,
    "Character code marking an optional hyphenation point",
    || defaults::SOFT_HYPHEN_KEY,
)
.with_check(char_code);

pub static SOFT_BREAK_KEY: ConfigVariable<i32> = ConfigVariable::new(
    keys::SOFT_BREAK_KEY,
    "Character code marking an optional break without a hyphen",
    || defaults::SOFT_BREAK_KEY,
)
.with_check(char_code);

pub static SOFT_HYPHEN_OUTPUT: ConfigVariable<String> = ConfigVariable::new(
    keys::SOFT_HYPHEN_OUTPUT,
    "Text shown at a line break taken at a soft hyphen",
    || defaults::SOFT_HYPHEN_OUTPUT.to_string(),
);

pub static HYPHEN_RATIO: ConfigVariable<f32> = ConfigVariable::new(
    keys::HYPHEN_RATIO,
    "Fraction of the line that must be filled before a soft hyphen is preferred over a word break",
    || defaults::HYPHEN_RATIO,
)
.with_check(unit_ratio);

pub static NEVER_BREAK_BEFORE: ConfigVariable<String> = ConfigVariable::new(
    keys::NEVER_BREAK_BEFORE,
    "Characters that may not begin a new line",
    || defaults::NEVER_BREAK_BEFORE.to_string(),
);

pub static MAX_NEVER_BREAK: ConfigVariable<i32> = ConfigVariable::new(
    keys::MAX_NEVER_BREAK,
    "Most never-break characters to carry back to the previous line",
    || defaults::MAX_NEVER_BREAK,
)
.with_check(non_negative);

pub static MINFILTER: ConfigVariable<FilterType> = ConfigVariable::new(
    keys::MINFILTER,
    "Minification filter for glyph page textures",
    || defaults::MINFILTER,
);

pub static MAGFILTER: ConfigVariable<FilterType> = ConfigVariable::new(
    keys::MAGFILTER,
    "Magnification filter for glyph page textures",
    || defaults::MAGFILTER,
);

fn at_least_one(v: &i32) -> Result<(), String> {
    if *v >= 1 {
        Ok(())
    } else {
        Err(format!("Must be at least 1, found {}", v))
    }
}

fn non_negative(v: &i32) -> Result<(), String> {
    if *v >= 0 {
        Ok(())
    } else {
        Err(format!("Must not be negative, found {}", v))
    }
}

fn positive(v: &i32) -> Result<(), String> {
    if *v > 0 {
        Ok(())
    } else {
        Err(format!("Must be positive, found {}", v))
    }
}

fn finite_non_negative(v: &f32) -> Result<(), String> {
    if v.is_finite() && *v >= 0.0 {
        Ok(())
    } else {
        Err(format!("Must be a finite non-negative number, found {}", v))
    }
}

fn finite_positive(v: &f32) -> Result<(), String> {
    if v.is_finite() && *v > 0.0 {
        Ok(())
    } else {
        Err(format!("Must be a finite positive number, found {}", v))
    }
}

fn unit_ratio(v: &f32) -> Result<(), String> {
    if (0.0..=1.0).contains(v) {
        Ok(())
    } else {
        Err(format!("Must be between 0 and 1, found {}", v))
    }
}

fn char_code(v: &i32) -> Result<(), String> {
    u32::try_from(*v)
        .ok()
        .and_then(char::from_u32)
        .map(|_| ())
        .ok_or_else(|| format!("Not a valid character code: {}", v))
}

/// Immutable snapshot of every text setting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextConfig {
    #[serde(rename = "text-flatten")]
    flatten: bool,
    #[serde(rename = "text-update-cleared-glyphs")]
    update_cleared_glyphs: bool,
    #[serde(rename = "text-anisotropic-degree")]
    anisotropic_degree: i32,
    #[serde(rename = "text-texture-margin")]
    texture_margin: i32,
    #[serde(rename = "text-poly-margin")]
    poly_margin: f32,
    #[serde(rename = "text-page-x-size")]
    page_x_size: i32,
    #[serde(rename = "text-page-y-size")]
    page_y_size: i32,
    #[serde(rename = "text-small-caps")]
    small_caps: bool,
    #[serde(rename = "text-small-caps-scale")]
    small_caps_scale: f32,
    /// Font path as declared, before `$NAME` expansion
    #[serde(rename = "text-default-font")]
    declared_font: String,
    #[serde(skip)]
    default_font: String,
    #[serde(rename = "text-tab-width")]
    tab_width: f32,
    #[serde(rename = "text-soft-hyphen-key")]
    soft_hyphen_key: i32,
    #[serde(rename = "text-soft-break-key")]
    soft_break_key: i32,
    #[serde(rename = "text-soft-hyphen-output")]
    soft_hyphen_output: String,
    #[serde(rename = "text-hyphen-ratio")]
    hyphen_ratio: f32,
    #[serde(rename = "text-never-break-before")]
    never_break_before: String,
    #[serde(rename = "text-max-never-break")]
    max_never_break: i32,
    #[serde(rename = "text-minfilter")]
    minfilter: FilterType,
    #[serde(rename = "text-magfilter")]
    magfilter: FilterType,
}

impl TextConfig {
    /// Resolve from `store`, logging malformed values and using their defaults
    pub fn from_store(store: &ConfigStore) -> Self {
        let (config, problems) = Self::resolve(store, |name| std::env::var(name).ok());

        for problem in &problems {
            warn!(
                target: LOG_TARGET,
                key = problem.key,
                value = %problem.value,
                page = %problem.page,
                reason = %problem.reason,
                "Invalid config value, using default"
            );
        }

        config
    }

    /// Resolve from `store`, failing if any declared value is malformed
    pub fn from_store_strict(store: &ConfigStore) -> Result<Self> {
        let (config, problems) = Self::resolve(store, |name| std::env::var(name).ok());

        if !problems.is_empty() {
            let listing: Vec<String> = problems.iter().map(|p| format!("  {}", p)).collect();
            bail!(
                "{} invalid text config value(s):\n{}",
                problems.len(),
                listing.join("\n")
            );
        }

        Ok(config)
    }

    /// `env` resolves `$NAME` references in the default font path
    fn resolve<F>(store: &ConfigStore, env: F) -> (Self, Vec<Problem>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut problems = Vec::new();
        let p = &mut problems;

        let mut magfilter = MAGFILTER.resolve(store, p);
        if magfilter.uses_mipmaps() {
            warn!(
                target: LOG_TARGET,
                configured = %magfilter,
                using = %magfilter.without_mipmaps(),
                "Magnification cannot use mipmaps"
            );
            magfilter = magfilter.without_mipmaps();
        }
        let declared_font = DEFAULT_FONT.resolve(store, p);

        let config = Self {
            flatten: FLATTEN.resolve(store, p),
            update_cleared_glyphs: UPDATE_CLEARED_GLYPHS.resolve(store, p),
            anisotropic_degree: ANISOTROPIC_DEGREE.resolve(store, p),
            texture_margin: TEXTURE_MARGIN.resolve(store, p),
            poly_margin: POLY_MARGIN.resolve(store, p),
            page_x_size: PAGE_X_SIZE.resolve(store, p),
            page_y_size: PAGE_Y_SIZE.resolve(store, p),
            small_caps: SMALL_CAPS.resolve(store, p),
            small_caps_scale: SMALL_CAPS_SCALE.resolve(store, p),
            default_font: expand_vars(&declared_font, env),
            declared_font,
            tab_width: TAB_WIDTH.resolve(store, p),
            soft_hyphen_key: SOFT_HYPHEN_KEY.resolve(store, p),
            soft_break_key: SOFT_BREAK_KEY.resolve(store, p),
            soft_hyphen_output: SOFT_HYPHEN_OUTPUT.resolve(store, p),
            hyphen_ratio: HYPHEN_RATIO.resolve(store, p),
            never_break_before: NEVER_BREAK_BEFORE.resolve(store, p),
            max_never_break: MAX_NEVER_BREAK.resolve(store, p),
            minfilter: MINFILTER.resolve(store, p),
            magfilter,
        };

        let known = Self::keys();
        for key in store.unknown_keys(&known) {
            warn!(target: LOG_TARGET, key = %key, "Unknown text config key");
        }

        let overridden = known.iter().filter(|k| store.lookup(k).is_some()).count();
        info!(
            target: LOG_TARGET,
            overridden,
            invalid = problems.len(),
            "Resolved text config"
        );

        (config, problems)
    }

    /// Every declared key, in declaration order
    pub fn keys() -> Vec<&'static str> {
        Self::variables().into_iter().map(|v| v.name).collect()
    }

    /// Key, type, default and description of every declared variable
    pub fn variables() -> Vec<VariableInfo> {
        vec![
            FLATTEN.info(),
            UPDATE_CLEARED_GLYPHS.info(),
            ANISOTROPIC_DEGREE.info(),
            TEXTURE_MARGIN.info(),
            POLY_MARGIN.info(),
            PAGE_X_SIZE.info(),
            PAGE_Y_SIZE.info(),
            SMALL_CAPS.info(),
            SMALL_CAPS_SCALE.info(),
            DEFAULT_FONT.info(),
            TAB_WIDTH.info(),
            SOFT_HYPHEN_KEY.info(),
            SOFT_BREAK_KEY.info(),
            SOFT_HYPHEN_OUTPUT.info(),
            HYPHEN_RATIO.info(),
            NEVER_BREAK_BEFORE.info(),
            MAX_NEVER_BREAK.info(),
            MINFILTER.info(),
            MAGFILTER.info(),
        ]
    }

    /// `(key, value)` pairs of the effective settings, in declaration order
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            (keys::FLATTEN, self.flatten.to_config_string()),
            (
                keys::UPDATE_CLEARED_GLYPHS,
                self.update_cleared_glyphs.to_config_string(),
            ),
            (
                keys::ANISOTROPIC_DEGREE,
                self.anisotropic_degree.to_config_string(),
            ),
            (keys::TEXTURE_MARGIN, self.texture_margin.to_config_string()),
            (keys::POLY_MARGIN, self.poly_margin.to_config_string()),
            (keys::PAGE_X_SIZE, self.page_x_size.to_config_string()),
            (keys::PAGE_Y_SIZE, self.page_y_size.to_config_string()),
            (keys::SMALL_CAPS, self.small_caps.to_config_string()),
            (
                keys::SMALL_CAPS_SCALE,
                self.small_caps_scale.to_config_string(),
            ),
            (keys::DEFAULT_FONT, self.declared_font.to_config_string()),
            (keys::TAB_WIDTH, self.tab_width.to_config_string()),
            (keys::SOFT_HYPHEN_KEY, self.soft_hyphen_key.to_config_string()),
            (keys::SOFT_BREAK_KEY, self.soft_break_key.to_config_string()),
            (
                keys::SOFT_HYPHEN_OUTPUT,
                self.soft_hyphen_output.to_config_string(),
            ),
            (keys::HYPHEN_RATIO, self.hyphen_ratio.to_config_string()),
            (
                keys::NEVER_BREAK_BEFORE,
                self.never_break_before.to_config_string(),
            ),
            (keys::MAX_NEVER_BREAK, self.max_never_break.to_config_string()),
            (keys::MINFILTER, self.minfilter.to_config_string()),
            (keys::MAGFILTER, self.magfilter.to_config_string()),
        ]
    }

    /// Write the effective settings as a prc page that resolves back to `self`.
    ///
    /// Leading and trailing whitespace in string values is not preserved.
    pub fn write_prc<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "# Effective text configuration")?;
        for (key, value) in self.entries() {
            if value.is_empty() {
                writeln!(out, "{}", key)?;
            } else {
                writeln!(out, "{} {}", key, value)?;
            }
        }
        debug!(target: LOG_TARGET, "Wrote text config as prc");
        Ok(())
    }

    pub fn flatten(&self) -> bool {
        self.flatten
    }

    pub fn update_cleared_glyphs(&self) -> bool {
        self.update_cleared_glyphs
    }

    pub fn anisotropic_degree(&self) -> i32 {
        self.anisotropic_degree
    }

    /// Pixels of padding around each glyph in a page texture
    pub fn texture_margin(&self) -> i32 {
        self.texture_margin
    }

    pub fn poly_margin(&self) -> f32 {
        self.poly_margin
    }

    pub fn page_x_size(&self) -> i32 {
        self.page_x_size
    }

    pub fn page_y_size(&self) -> i32 {
        self.page_y_size
    }

    /// `(width, height)` of a glyph page
    pub fn page_size(&self) -> (i32, i32) {
        (self.page_x_size, self.page_y_size)
    }

    pub fn small_caps(&self) -> bool {
        self.small_caps
    }

    pub fn small_caps_scale(&self) -> f32 {
        self.small_caps_scale
    }

    /// Font path with `$NAME` references expanded; empty for the built-in font
    pub fn default_font(&self) -> &str {
        &self.default_font
    }

    pub fn tab_width(&self) -> f32 {
        self.tab_width
    }

    pub fn soft_hyphen_key(&self) -> i32 {
        self.soft_hyphen_key
    }

    pub fn soft_break_key(&self) -> i32 {
        self.soft_break_key
    }

    pub fn soft_hyphen_output(&self) -> &str {
        &self.soft_hyphen_output
    }

    pub fn hyphen_ratio(&self) -> f32 {
        self.hyphen_ratio
    }

    pub fn never_break_before(&self) -> &str {
        &self.never_break_before
    }

    pub fn max_never_break(&self) -> i32 {
        self.max_never_break
    }

    pub fn minfilter(&self) -> FilterType {
        self.minfilter
    }

    /// Never a mipmap mode
    pub fn magfilter(&self) -> FilterType {
        self.magfilter
    }

    pub fn is_soft_hyphen(&self, c: char) -> bool {
        i32::try_from(u32::from(c)).is_ok_and(|code| code == self.soft_hyphen_key)
    }

    pub fn is_soft_break(&self, c: char) -> bool {
        i32::try_from(u32::from(c)).is_ok_and(|code| code == self.soft_break_key)
    }

    /// True if a line may not start with `c`
    pub fn is_never_break_before(&self, c: char) -> bool {
        self.never_break_before.contains(c)
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            flatten: FLATTEN.default_value(),
            update_cleared_glyphs: UPDATE_CLEARED_GLYPHS.default_value(),
            anisotropic_degree: ANISOTROPIC_DEGREE.default_value(),
            texture_margin: TEXTURE_MARGIN.default_value(),
            poly_margin: POLY_MARGIN.default_value(),
            page_x_size: PAGE_X_SIZE.default_value(),
            page_y_size: PAGE_Y_SIZE.default_value(),
            small_caps: SMALL_CAPS.default_value(),
            small_caps_scale: SMALL_CAPS_SCALE.default_value(),
            declared_font: DEFAULT_FONT.default_value(),
            default_font: expand_vars(&DEFAULT_FONT.default_value(), |_| None),
            tab_width: TAB_WIDTH.default_value(),
            soft_hyphen_key: SOFT_HYPHEN_KEY.default_value(),
            soft_break_key: SOFT_BREAK_KEY.default_value(),
            soft_hyphen_output: SOFT_HYPHEN_OUTPUT.default_value(),
            hyphen_ratio: HYPHEN_RATIO.default_value(),
            never_break_before: NEVER_BREAK_BEFORE.default_value(),
            max_never_break: MAX_NEVER_BREAK.default_value(),
            minfilter: MINFILTER.default_value(),
            magfilter: MAGFILTER.default_value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::page::{ConfigPage, Layer};

    fn store(text: &str) -> ConfigStore {
        ConfigStore::new().with_page(ConfigPage::parse_prc("test.prc", Layer::File, text))
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_values() {
        let config = TextConfig::default();

        assert!(config.flatten());
        assert!(!config.update_cleared_glyphs());
        assert_eq!(config.anisotropic_degree(), 1);
        assert_eq!(config.texture_margin(), 2);
        assert_eq!(config.poly_margin(), 0.0);
        assert_eq!(config.page_size(), (256, 256));
        assert!(!config.small_caps());
        assert_eq!(config.small_caps_scale(), 0.8);
        assert_eq!(config.default_font(), "");
        assert_eq!(config.tab_width(), 5.0);
        assert_eq!(config.soft_hyphen_key(), 3);
        assert_eq!(config.soft_break_key(), 4);
        assert_eq!(config.soft_hyphen_output(), "-");
        assert_eq!(config.hyphen_ratio(), 0.7);
        assert_eq!(config.never_break_before(), ",.-:?!;");
        assert_eq!(config.max_never_break(), 3);
        assert_eq!(config.minfilter(), FilterType::LinearMipmapLinear);
        assert_eq!(config.magfilter(), FilterType::Linear);
    }

    #[test]
    fn test_empty_store_resolves_to_defaults() {
        assert_eq!(TextConfig::from_store(&ConfigStore::new()), TextConfig::default());
        assert_eq!(
            TextConfig::from_store_strict(&ConfigStore::new()).unwrap(),
            TextConfig::default()
        );
    }

    #[test]
    fn test_single_override_leaves_others_at_default() {
        let config = TextConfig::from_store(&store("text-texture-margin 4\n"));

        assert_eq!(config.texture_margin(), 4);
        assert_eq!(config.tab_width(), defaults::TAB_WIDTH);
        assert_eq!(
            TextConfig {
                texture_margin: defaults::TEXTURE_MARGIN,
                ..config
            },
            TextConfig::default()
        );
    }

    #[test]
    fn test_all_settings_override() {
        let text = "\
text-flatten 0
text-update-cleared-glyphs #t
text-anisotropic-degree 4
text-texture-margin 1
text-poly-margin 0.25
text-page-x-size 512
text-page-y-size 128
text-small-caps yes
text-small-caps-scale 0.6
text-default-font fonts/serif.ttf
text-tab-width 8
text-soft-hyphen-key 0xAD
text-soft-break-key 0x200B
text-soft-hyphen-output \u{2010}
text-hyphen-ratio 0.5
text-never-break-before ,.)
text-max-never-break 5
text-minfilter nearest
text-magfilter nearest
";
        let config = TextConfig::from_store_strict(&store(text)).unwrap();

        assert!(!config.flatten());
        assert!(config.update_cleared_glyphs());
        assert_eq!(config.anisotropic_degree(), 4);
        assert_eq!(config.texture_margin(), 1);
        assert_eq!(config.poly_margin(), 0.25);
        assert_eq!(config.page_size(), (512, 128));
        assert!(config.small_caps());
        assert_eq!(config.small_caps_scale(), 0.6);
        assert_eq!(config.default_font(), "fonts/serif.ttf");
        assert_eq!(config.tab_width(), 8.0);
        assert_eq!(config.soft_hyphen_key(), 0xAD);
        assert_eq!(config.soft_break_key(), 0x200B);
        assert_eq!(config.soft_hyphen_output(), "\u{2010}");
        assert_eq!(config.hyphen_ratio(), 0.5);
        assert_eq!(config.never_break_before(), ",.)");
        assert_eq!(config.max_never_break(), 5);
        assert_eq!(config.minfilter(), FilterType::Nearest);
        assert_eq!(config.magfilter(), FilterType::Nearest);
    }

    #[test]
    fn test_malformed_values_fall_back_when_lenient() {
        let text = "\
text-texture-margin wide
text-page-x-size 0
text-hyphen-ratio 1.5
text-soft-hyphen-key -1
text-minfilter blurry
text-tab-width 3
";
        let (config, problems) = TextConfig::resolve(&store(text), no_env);

        assert_eq!(config.texture_margin(), defaults::TEXTURE_MARGIN);
        assert_eq!(config.page_x_size(), defaults::PAGE_X_SIZE);
        assert_eq!(config.hyphen_ratio(), defaults::HYPHEN_RATIO);
        assert_eq!(config.soft_hyphen_key(), defaults::SOFT_HYPHEN_KEY);
        assert_eq!(config.minfilter(), defaults::MINFILTER);
        // Well-formed values alongside bad ones still apply
        assert_eq!(config.tab_width(), 3.0);

        let keys: Vec<&str> = problems.iter().map(|p| p.key).collect();
        assert_eq!(
            keys,
            vec![
                keys::TEXTURE_MARGIN,
                keys::PAGE_X_SIZE,
                keys::SOFT_HYPHEN_KEY,
                keys::HYPHEN_RATIO,
                keys::MINFILTER,
            ]
        );

        assert_eq!(TextConfig::from_store(&store(text)), config);
    }

    #[test]
    fn test_malformed_values_fail_when_strict() {
        let err = TextConfig::from_store_strict(&store(
            "text-texture-margin wide\ntext-small-caps-scale -1\n",
        ))
        .unwrap_err();

        let message = err.to_string();
        assert!(message.starts_with("2 invalid"));
        assert!(message.contains("text-texture-margin = 'wide'"));
        assert!(message.contains("text-small-caps-scale"));
        assert!(message.contains("test.prc"));
    }

    #[test]
    fn test_non_finite_floats_rejected() {
        let page = "text-tab-width inf\ntext-poly-margin NaN\n";
        let (_, problems) = TextConfig::resolve(&store(page), no_env);
        assert_eq!(problems.len(), 2);
    }

    #[test]
    fn test_mipmap_magfilter_is_downgraded() {
        let config = TextConfig::from_store_strict(&store(
            "text-magfilter nearest_mipmap_linear\ntext-minfilter mipmap\n",
        ))
        .unwrap();

        assert_eq!(config.magfilter(), FilterType::Nearest);
        assert_eq!(config.minfilter(), FilterType::LinearMipmapLinear);
    }

    #[test]
    fn test_default_font_expands_variables() {
        let env = |name: &str| (name == "FONT_DIR").then(|| "/opt/fonts".to_string());
        let (config, problems) =
            TextConfig::resolve(&store("text-default-font $FONT_DIR/sans.ttf\n"), env);

        assert!(problems.is_empty());
        assert_eq!(config.default_font(), "/opt/fonts/sans.ttf");
    }

    #[test]
    fn test_unknown_keys_do_not_affect_values() {
        let config = TextConfig::from_store(&store("text-flaten 0\ntext-flatten 1\n"));
        assert!(config.flatten());
    }

    #[test]
    fn test_accessors_are_stable() {
        let config = TextConfig::from_store(&store("text-tab-width 2.5\n"));
        let first = (config.tab_width(), config.never_break_before().to_string());
        let second = (config.tab_width(), config.never_break_before().to_string());
        assert_eq!(first, second);
    }

    #[test]
    fn test_consumer_helpers() {
        let config = TextConfig::default();

        assert!(config.is_soft_hyphen('\u{3}'));
        assert!(!config.is_soft_hyphen('-'));
        assert!(config.is_soft_break('\u{4}'));
        assert!(config.is_never_break_before(','));
        assert!(config.is_never_break_before('?'));
        assert!(!config.is_never_break_before('a'));
    }

    #[test]
    fn test_write_prc_reloads_to_same_config() {
        let page = "text-page-x-size 1024\n\
                    text-never-break-before ,.;\n\
                    text-hyphen-ratio 0.35\n\
                    text-minfilter nearest_mipmap_nearest\n";
        let original = TextConfig::from_store_strict(&store(page)).unwrap();

        let mut buffer = Vec::new();
        original.write_prc(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.contains("text-page-x-size 1024\n"));
        // Empty default font is written as a bare key
        assert!(text.contains("\ntext-default-font\n"));

        let reloaded = TextConfig::from_store_strict(&store(&text)).unwrap();
        assert_eq!(reloaded, original);
    }

    #[test]
    fn test_write_prc_keeps_font_unexpanded() {
        let original = TextConfig::from_store_strict(&store("text-default-font fonts/a$$b.ttf\n"))
            .unwrap();
        assert_eq!(original.default_font(), "fonts/a$b.ttf");

        let mut buffer = Vec::new();
        original.write_prc(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("\ntext-default-font fonts/a$$b.ttf\n"));

        let reloaded = TextConfig::from_store_strict(&store(&text)).unwrap();
        assert_eq!(reloaded.default_font(), "fonts/a$b.ttf");
        assert_eq!(reloaded, original);

        let json = serde_json::to_string(&original).unwrap();
        let page = ConfigPage::parse_json("dump.json", Layer::File, &json).unwrap();
        let from_json = TextConfig::from_store_strict(&ConfigStore::new().with_page(page)).unwrap();
        assert_eq!(from_json, original);
    }

    #[test]
    fn test_json_uses_config_keys() {
        let value = serde_json::to_value(TextConfig::default()).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), TextConfig::keys().len());
        for key in TextConfig::keys() {
            assert!(object.contains_key(key), "missing {}", key);
        }
        assert_eq!(object["text-minfilter"], "linear_mipmap_linear");
        assert_eq!(object["text-texture-margin"], 2);
    }

    #[test]
    fn test_json_output_loads_as_page() {
        let json = serde_json::to_string(&TextConfig::default()).unwrap();
        let page = ConfigPage::parse_json("dump.json", Layer::File, &json).unwrap();
        let store = ConfigStore::new().with_page(page);

        assert_eq!(
            TextConfig::from_store_strict(&store).unwrap(),
            TextConfig::default()
        );
    }

    #[test]
    fn test_variables_listing() {
        let variables = TextConfig::variables();
        assert_eq!(variables.len(), 19);

        let mut names: Vec<&str> = variables.iter().map(|v| v.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 19);

        let margin = variables
            .iter()
            .find(|v| v.name == keys::TEXTURE_MARGIN)
            .unwrap();
        assert_eq!(margin.type_name, "int");
        assert_eq!(margin.default, "2");
        assert!(variables.iter().all(|v| !v.description.is_empty()));
    }

    #[test]
    fn test_entries_match_variables() {
        let config = TextConfig::default();
        let entry_keys: Vec<&str> = config.entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(entry_keys, TextConfig::keys());

        for (info, (_, value)) in TextConfig::variables().iter().zip(config.entries()) {
            assert_eq!(info.default, value);
        }
    }
}
