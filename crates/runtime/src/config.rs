//! Simulation tunables.
//!
//! Defaults reproduce the reference behaviour; every field can be overridden
//! from TOML (through [`SimulationConfig::load`]) or from `STEALTH_*`
//! environment variables.

use std::env;
use std::path::Path;

use game_content::ConfigLoader;
use game_core::GridConfig;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RuntimeError};

/// Per-agent behaviour and body parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub max_energy: f32,
    /// Energy lost per second, also while under manual control.
    pub energy_depletion_rate: f32,
    /// Energy strictly below this counts as low.
    pub low_energy_threshold: f32,
    /// Visibility radius in cells.
    pub view_radius: u32,
    pub chase_speed: f32,
    pub roam_speed: f32,
    pub recharge_speed: f32,
    /// Distance at which a waypoint counts as reached.
    pub arrival_tolerance: f32,
    /// How far the chased target may drift from the path's destination before
    /// the path is recomputed.
    pub replan_threshold: f32,
    /// Minimum seconds between two chase path recomputations.
    pub replan_interval: f32,
    pub roam_radius: f32,
    /// Random roam points tried per planning attempt.
    pub roam_attempts: u32,
    pub attack_range: f32,
    /// Seconds between two attacks from the same agent.
    pub attack_interval: f32,
}

impl AgentConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_ENERGY: f32 = 100.0;
    pub const DEFAULT_DEPLETION_RATE: f32 = 1.0;
    pub const DEFAULT_LOW_ENERGY_THRESHOLD: f32 = 25.0;
    pub const DEFAULT_VIEW_RADIUS: u32 = 8;
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_energy: Self::DEFAULT_MAX_ENERGY,
            energy_depletion_rate: Self::DEFAULT_DEPLETION_RATE,
            low_energy_threshold: Self::DEFAULT_LOW_ENERGY_THRESHOLD,
            view_radius: Self::DEFAULT_VIEW_RADIUS,
            chase_speed: 5.0,
            roam_speed: 3.0,
            recharge_speed: 5.0,
            arrival_tolerance: 0.1,
            replan_threshold: 2.0,
            replan_interval: 0.5,
            roam_radius: 15.0,
            roam_attempts: 8,
            attack_range: 1.5,
            attack_interval: 2.0,
        }
    }
}

/// Top-level configuration for a [`Simulation`](crate::Simulation).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub grid: GridConfig,
    pub agent: AgentConfig,
    /// Base seed for every agent's random stream.
    pub seed: u64,
    /// Re-query the obstacle oracle for every cell at the start of each step.
    ///
    /// O(cells) per step. Off by default; walkability is otherwise refreshed
    /// only when stations are added or destroyed.
    pub refresh_walkability_every_tick: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            agent: AgentConfig::default(),
            seed: 0x5eed,
            refresh_walkability_every_tick: false,
        }
    }
}

impl SimulationConfig {
    /// Loads a configuration from a TOML file; missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        ConfigLoader::load(path).map_err(|e| RuntimeError::Config {
            path: path.to_path_buf(),
            message: format!("{e:#}"),
        })
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `STEALTH_SEED` - Base RNG seed
    /// - `STEALTH_CELL_RADIUS` - Grid cell radius in world units (default: 0.5)
    /// - `STEALTH_REFRESH_WALKABILITY` - Refresh walkability every tick (default: false)
    /// - `STEALTH_MAX_ENERGY` - Agent energy capacity (default: 100)
    /// - `STEALTH_ENERGY_DEPLETION_RATE` - Energy lost per second (default: 1)
    /// - `STEALTH_LOW_ENERGY_THRESHOLD` - Low-energy boundary (default: 25)
    /// - `STEALTH_VIEW_RADIUS` - Agent view radius in cells (default: 8)
    /// - `STEALTH_CHASE_SPEED` - Chase move speed (default: 5)
    /// - `STEALTH_ROAM_SPEED` - Roam move speed (default: 3)
    /// - `STEALTH_REPLAN_THRESHOLD` - Target drift that triggers a repath (default: 2)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(seed) = read_env::<u64>("STEALTH_SEED") {
            config.seed = seed;
        }
        if let Some(radius) = read_env::<f32>("STEALTH_CELL_RADIUS") {
            if radius > 0.0 {
                config.grid.cell_radius = radius;
            }
        }
        if let Some(refresh) = read_env_bool("STEALTH_REFRESH_WALKABILITY") {
            config.refresh_walkability_every_tick = refresh;
        }

        let agent = &mut config.agent;
        if let Some(max) = read_env::<f32>("STEALTH_MAX_ENERGY") {
            agent.max_energy = max.max(0.0);
        }
        if let Some(rate) = read_env::<f32>("STEALTH_ENERGY_DEPLETION_RATE") {
            agent.energy_depletion_rate = rate.max(0.0);
        }
        if let Some(threshold) = read_env::<f32>("STEALTH_LOW_ENERGY_THRESHOLD") {
            agent.low_energy_threshold = threshold;
        }
        if let Some(radius) = read_env::<u32>("STEALTH_VIEW_RADIUS") {
            agent.view_radius = radius;
        }
        if let Some(speed) = read_env::<f32>("STEALTH_CHASE_SPEED") {
            agent.chase_speed = speed;
        }
        if let Some(speed) = read_env::<f32>("STEALTH_ROAM_SPEED") {
            agent.roam_speed = speed;
        }
        if let Some(threshold) = read_env::<f32>("STEALTH_REPLAN_THRESHOLD") {
            agent.replan_threshold = threshold;
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_match_reference_tunables() {
        let config = AgentConfig::default();
        assert_eq!(config.chase_speed, 5.0);
        assert_eq!(config.roam_speed, 3.0);
        assert_eq!(config.replan_threshold, 2.0);
        assert_eq!(config.roam_radius, 15.0);
        assert_eq!(config.attack_range, 1.5);
        assert_eq!(config.attack_interval, 2.0);
        assert!(!SimulationConfig::default().refresh_walkability_every_tick);
    }

    #[test]
    fn toml_overrides_keep_unlisted_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "seed = 7\n\n[agent]\nview_radius = 3\nlow_energy_threshold = 40.0\n"
        )
        .unwrap();

        let config = SimulationConfig::load(file.path()).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.agent.view_radius, 3);
        assert_eq!(config.agent.low_energy_threshold, 40.0);
        assert_eq!(config.agent.chase_speed, 5.0);
        assert_eq!(config.grid, GridConfig::default());
    }

    #[test]
    fn load_failures_carry_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        match SimulationConfig::load(&path) {
            Err(RuntimeError::Config { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
