#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas for the slide rocker runtime.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - The `[extent]` table accepts either a layout length (with optional
//!   indicator radius) or explicit center/span/edge-margin geometry.
use serde::Deserialize;

/// Rate and tier settings for the rocker engine.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct RockerCfg {
    /// Number of speed tiers on each side of center.
    pub interval_count: u32,
    /// Tick period at tier 1 (ms); higher tiers divide it.
    pub base_rate_ms: u64,
    /// Which side of center counts as positive: "low" or "high".
    pub polarity: PolarityCfg,
}

impl Default for RockerCfg {
    fn default() -> Self {
        Self {
            interval_count: 1,
            base_rate_ms: 1_000,
            polarity: PolarityCfg::Low,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PolarityCfg {
    #[default]
    Low,
    High,
}

/// Drag geometry. Accepts either:
/// - a layout length: `{ length = 240.0, indicator_radius = 20.0 }`
/// - explicit geometry: `{ center = 0.0, span = 100.0, edge_margin = 100.0 }`
///
/// When both shapes could match, the length form wins.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(untagged)]
pub enum ExtentCfg {
    Length {
        length: f32,
        #[serde(default)]
        indicator_radius: f32,
    },
    Explicit {
        center: f32,
        span: f32,
        edge_margin: f32,
    },
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
}

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rocker: RockerCfg,
    pub extent: ExtentCfg,
    #[serde(default)]
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Rocker
        if self.rocker.interval_count == 0 {
            eyre::bail!("rocker.interval_count must be >= 1");
        }
        if self.rocker.interval_count > 1_000 {
            eyre::bail!("rocker.interval_count is unreasonably large (>1000)");
        }
        if self.rocker.base_rate_ms == 0 {
            eyre::bail!("rocker.base_rate_ms must be >= 1");
        }
        if self.rocker.base_rate_ms > 60_000 {
            eyre::bail!("rocker.base_rate_ms is unreasonably large (>60s)");
        }

        // Extent
        match self.extent {
            ExtentCfg::Length {
                length,
                indicator_radius,
            } => {
                if !length.is_finite() || length <= 0.0 {
                    eyre::bail!("extent.length must be > 0");
                }
                if !indicator_radius.is_finite() || indicator_radius < 0.0 {
                    eyre::bail!("extent.indicator_radius must be >= 0");
                }
                if indicator_radius >= length / 2.0 {
                    eyre::bail!(
                        "extent.indicator_radius must be smaller than half of extent.length"
                    );
                }
            }
            ExtentCfg::Explicit {
                center,
                span,
                edge_margin,
            } => {
                if !center.is_finite() {
                    eyre::bail!("extent.center must be finite");
                }
                if !span.is_finite() || span <= 0.0 {
                    eyre::bail!("extent.span must be > 0");
                }
                if !edge_margin.is_finite() || edge_margin <= 0.0 || edge_margin > span {
                    eyre::bail!("extent.edge_margin must be in (0, extent.span]");
                }
            }
        }

        Ok(())
    }
}
