use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AtlasError, Result};

/// Maximum atlas sizes offered to users.
pub const ATLAS_SIZE_CHOICES: [u32; 5] = [256, 512, 1024, 2048, 4096];

/// Free-rectangle placement heuristics.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Heuristic {
    BestShortSideFit,
    BestLongSideFit,
    #[default]
    BestAreaFit,
    BottomLeft,
    ContactPoint,
}

impl Heuristic {
    pub const ALL: [Heuristic; 5] = [
        Heuristic::BestShortSideFit,
        Heuristic::BestLongSideFit,
        Heuristic::BestAreaFit,
        Heuristic::BottomLeft,
        Heuristic::ContactPoint,
    ];

    /// Short name accepted by `FromStr`.
    pub fn short_name(&self) -> &'static str {
        match self {
            Heuristic::BestShortSideFit => "bssf",
            Heuristic::BestLongSideFit => "blsf",
            Heuristic::BestAreaFit => "baf",
            Heuristic::BottomLeft => "bl",
            Heuristic::ContactPoint => "cp",
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for Heuristic {
    type Err = AtlasError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "baf" | "bestareafit" => Ok(Self::BestAreaFit),
            "bssf" | "bestshortsidefit" => Ok(Self::BestShortSideFit),
            "blsf" | "bestlongsidefit" => Ok(Self::BestLongSideFit),
            "bl" | "bottomleft" => Ok(Self::BottomLeft),
            "cp" | "contactpoint" => Ok(Self::ContactPoint),
            other => Err(AtlasError::InvalidConfig(format!(
                "unknown heuristic '{other}' (expected baf|bssf|blsf|bl|cp)"
            ))),
        }
    }
}

/// Settings for one pack call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackingConfig {
    /// Gutter added to the right and bottom of every sprite.
    #[serde(default = "default_padding")]
    pub padding: u32,
    /// Power-of-two cap on both sheet dimensions.
    #[serde(default = "default_max_atlas_size")]
    pub max_atlas_size: u32,
    /// Keep the sheet square while growing.
    #[serde(default)]
    pub force_square: bool,
    #[serde(default)]
    pub heuristic: Heuristic,
    /// Replicate sprite edges into the gutter (needs `padding >= 2` to do anything).
    #[serde(default)]
    pub extrude_edges: bool,
    /// First sheet size tried before growing.
    #[serde(default = "default_initial_size")]
    pub initial_size: (u32, u32),
}

impl Default for PackingConfig {
    fn default() -> Self {
        Self {
            padding: default_padding(),
            max_atlas_size: default_max_atlas_size(),
            force_square: false,
            heuristic: Heuristic::default(),
            extrude_edges: false,
            initial_size: default_initial_size(),
        }
    }
}

impl PackingConfig {
    /// Validates the configuration parameters.
    ///
    /// Returns an error if the size cap is zero or not a power of two, or if the
    /// initial sheet size has a zero side.
    pub fn validate(&self) -> Result<()> {
        if self.max_atlas_size == 0 || !self.max_atlas_size.is_power_of_two() {
            return Err(AtlasError::InvalidConfig(format!(
                "max_atlas_size must be a non-zero power of two, got {}",
                self.max_atlas_size
            )));
        }
        let (w, h) = self.initial_size;
        if w == 0 || h == 0 {
            return Err(AtlasError::InvalidConfig(format!(
                "initial_size must be non-zero, got {w}x{h}"
            )));
        }
        Ok(())
    }

    /// Half the padding: how far edges get extruded into the gutter.
    pub fn extrude_amount(&self) -> u32 {
        if self.extrude_edges { self.padding / 2 } else { 0 }
    }

    /// Create a fluent builder for `PackingConfig`.
    pub fn builder() -> PackingConfigBuilder {
        PackingConfigBuilder::new()
    }
}

fn default_padding() -> u32 {
    2
}
fn default_max_atlas_size() -> u32 {
    4096
}
fn default_initial_size() -> (u32, u32) {
    (256, 128)
}

/// Builder for `PackingConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct PackingConfigBuilder {
    cfg: PackingConfig,
}

impl PackingConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: PackingConfig::default(),
        }
    }
    pub fn padding(mut self, v: u32) -> Self {
        self.cfg.padding = v;
        self
    }
    pub fn max_atlas_size(mut self, v: u32) -> Self {
        self.cfg.max_atlas_size = v;
        self
    }
    pub fn force_square(mut self, v: bool) -> Self {
        self.cfg.force_square = v;
        self
    }
    pub fn heuristic(mut self, v: Heuristic) -> Self {
        self.cfg.heuristic = v;
        self
    }
    pub fn extrude_edges(mut self, v: bool) -> Self {
        self.cfg.extrude_edges = v;
        self
    }
    pub fn initial_size(mut self, w: u32, h: u32) -> Self {
        self.cfg.initial_size = (w, h);
        self
    }
    pub fn build(self) -> PackingConfig {
        self.cfg
    }
}
