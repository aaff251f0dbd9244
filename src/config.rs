//! Runtime configuration.
//!
//! Everything here has a default matching the classic demo: a 640x480 screen,
//! 30000 particles, 5000 ticks of animation after each click, and a three-layer
//! white/red/yellow explosion. A TOML file only needs the keys it changes:
//!
//! ```toml
//! target_fps = 60
//!
//! [screen]
//! width = 800
//! height = 600
//!
//! [[bursts]]
//! color = [0, 200, 255]
//! energy = 12
//! count = 400
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::particles::MAX_PARTICLES;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub screen: ScreenConfig,
    pub particles: ParticleConfig,
    /// Layers fired together on every click, in order.
    pub bursts: Vec<Burst>,
    /// Image blitted under the particles each frame instead of a flat clear.
    pub background: Option<PathBuf>,
    /// Window refresh cap; 0 leaves it uncapped.
    pub target_fps: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: usize,
    pub height: usize,
    /// 0xRRGGBB used by the per-frame clear.
    pub clear_color: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub max_particles: usize,
    /// Ticks simulated after the most recent explosion before the loop idles.
    pub tick_budget: u32,
    /// Fixed RNG seed; random per run when absent.
    pub seed: Option<u64>,
}

/// One layer of an explosion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Burst {
    pub color: [u8; 3],
    /// Upper bound (exclusive) on spark speed, pixels per tick.
    pub energy: u32,
    pub count: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            screen: ScreenConfig::default(),
            particles: ParticleConfig::default(),
            bursts: vec![
                Burst { color: [255, 255, 255], energy: 15, count: 300 },
                Burst { color: [255, 0, 0], energy: 10, count: 100 },
                Burst { color: [255, 255, 0], energy: 5, count: 50 },
            ],
            background: None,
            target_fps: 30,
        }
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self { width: 640, height: 480, clear_color: 0x00_00_00 }
    }
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self { max_particles: MAX_PARTICLES, tick_budget: 5000, seed: None }
    }
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&text)
    }
}
