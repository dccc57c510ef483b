//! Effect configuration
//!
//! Read at construction. Persisted as JSON in LocalStorage on the web.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{HanabiError, Result};

/// How the glow and trail layers are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Sparks on primary, primary downscaled into glow
    Glow,
    /// Sparks drawn straight into both primary and glow
    DualDraw,
    /// Glow plus a persistent fading trail layer
    #[default]
    Trails,
}

impl RenderMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderMode::Glow => "glow",
            RenderMode::DualDraw => "dual_draw",
            RenderMode::Trails => "trails",
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderMode {
    type Err = HanabiError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "glow" => Ok(RenderMode::Glow),
            "dual_draw" | "dual" => Ok(RenderMode::DualDraw),
            "trails" | "trail" => Ok(RenderMode::Trails),
            _ => Err(HanabiError::UnknownRenderMode(s.to_string())),
        }
    }
}

/// Construction parameters for an effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    /// Max initial spark speed (px/step)
    pub explosion_size: f64,
    /// Target simulation rate in Hz, clamped to 1-60
    pub fps: f64,
    pub spark_capacity: usize,
    pub smoke_capacity: usize,
    pub sparks_per_burst: usize,
    /// Smoke puffs per burst (0 disables smoke)
    pub smoke_per_burst: usize,
    pub render_mode: RenderMode,
    /// Fixed RNG seed; random when absent
    pub seed: Option<u64>,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            explosion_size: EXPLOSION_SIZE,
            fps: DEFAULT_FPS,
            spark_capacity: SPARK_CAPACITY,
            smoke_capacity: SMOKE_CAPACITY,
            sparks_per_burst: SPARKS_PER_BURST,
            smoke_per_burst: SMOKE_PER_BURST,
            render_mode: RenderMode::default(),
            seed: None,
        }
    }
}

impl EffectConfig {
    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Effective frame rate after clamping
    pub fn effective_fps(&self) -> f64 {
        crate::clamp_fps(self.fps)
    }

    /// Milliseconds between simulation steps
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.effective_fps()
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "hanabi_config";

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded effect config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {}", e),
                }
            }
        }

        Self::default()
    }

    /// Save config to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        let Some(storage) = storage else {
            log::warn!("LocalStorage unavailable, config not saved");
            return;
        };
        match self.to_json() {
            Ok(json) => match storage.set_item(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Effect config saved"),
                Err(e) => log::warn!("Failed to save config: {:?}", e),
            },
            Err(e) => log::warn!("Failed to encode config: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HanabiError;

    #[test]
    fn test_defaults() {
        let c = EffectConfig::default();
        assert_eq!(c.explosion_size, 10.0);
        assert_eq!(c.fps, 30.0);
        assert_eq!(c.spark_capacity, 2000);
        assert_eq!(c.sparks_per_burst, 200);
        assert_eq!(c.render_mode, RenderMode::Trails);
    }

    #[test]
    fn test_frame_interval_is_clamped() {
        let mut c = EffectConfig::default();
        assert!((c.frame_interval_ms() - 1000.0 / 30.0).abs() < 1e-9);
        c.fps = 500.0;
        assert!((c.frame_interval_ms() - 1000.0 / 60.0).abs() < 1e-9);
        c.fps = 0.0;
        assert_eq!(c.frame_interval_ms(), 1000.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let c = EffectConfig::from_json(r#"{"fps": 60, "render_mode": "dual_draw"}"#).unwrap();
        assert_eq!(c.fps, 60.0);
        assert_eq!(c.render_mode, RenderMode::DualDraw);
        assert_eq!(c.spark_capacity, SPARK_CAPACITY);
        assert_eq!(c.seed, None);
    }

    #[test]
    fn test_json_round_trip() {
        let c = EffectConfig {
            seed: Some(7),
            render_mode: RenderMode::Glow,
            ..Default::default()
        };
        let back = EffectConfig::from_json(&c.to_json().unwrap()).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            EffectConfig::from_json("{not json"),
            Err(HanabiError::Config(_))
        ));
    }

    #[test]
    fn test_render_mode_names() {
        for mode in [RenderMode::Glow, RenderMode::DualDraw, RenderMode::Trails] {
            assert_eq!(mode.to_string().parse::<RenderMode>().unwrap(), mode);
        }
        assert_eq!(" Dual ".parse::<RenderMode>().unwrap(), RenderMode::DualDraw);
        assert!(matches!(
            "bloom".parse::<RenderMode>(),
            Err(HanabiError::UnknownRenderMode(name)) if name == "bloom"
        ));
    }
}
