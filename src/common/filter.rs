//! Texture sampling filter modes
//!
//! Shared between the configuration registry and the renderer that builds
//! glyph page samplers. Names follow the usual GL spelling:
//! `<texel filter>_mipmap_<level filter>`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Filter used when a texture is minified or magnified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    /// Point sample the nearest texel
    Nearest,
    /// Bilinear blend of the four nearest texels
    Linear,
    NearestMipmapNearest,
    LinearMipmapNearest,
    NearestMipmapLinear,
    /// Trilinear filtering
    LinearMipmapLinear,
}

impl FilterType {
    pub const ALL: [FilterType; 6] = [
        FilterType::Nearest,
        FilterType::Linear,
        FilterType::NearestMipmapNearest,
        FilterType::LinearMipmapNearest,
        FilterType::NearestMipmapLinear,
        FilterType::LinearMipmapLinear,
    ];

    /// Canonical lowercase name, as written in configuration files
    pub fn name(self) -> &'static str {
        match self {
            FilterType::Nearest => "nearest",
            FilterType::Linear => "linear",
            FilterType::NearestMipmapNearest => "nearest_mipmap_nearest",
            FilterType::LinearMipmapNearest => "linear_mipmap_nearest",
            FilterType::NearestMipmapLinear => "nearest_mipmap_linear",
            FilterType::LinearMipmapLinear => "linear_mipmap_linear",
        }
    }

    /// True if sampling reads more than the base level
    pub fn uses_mipmaps(self) -> bool {
        !matches!(self, FilterType::Nearest | FilterType::Linear)
    }

    /// The base-level filter this mode uses within a single mip level
    pub fn without_mipmaps(self) -> FilterType {
        match self {
            FilterType::Nearest
            | FilterType::NearestMipmapNearest
            | FilterType::NearestMipmapLinear => FilterType::Nearest,
            FilterType::Linear
            | FilterType::LinearMipmapNearest
            | FilterType::LinearMipmapLinear => FilterType::Linear,
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterType {
    type Err = String;

    /// Case-insensitive; `mipmap` is shorthand for `linear_mipmap_linear`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "mipmap" {
            return Ok(FilterType::LinearMipmapLinear);
        }

        FilterType::ALL
            .into_iter()
            .find(|filter| filter.name() == lower)
            .ok_or_else(|| format!("Unknown filter type: {}", s.trim()))
    }
}
