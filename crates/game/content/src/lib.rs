//! Data-driven scenario definitions and loaders.
//!
//! This crate describes the static content a simulation starts from and
//! provides loaders for it:
//! - Scenarios (RON): text layout, player spawn, energy stations, agents
//! - Tunables (TOML): any serde-deserialisable configuration struct
//!
//! Content is consumed once by the runtime when a simulation is built and is
//! never mutated afterwards.

pub mod scenario;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use scenario::{AgentSpec, Scenario, StationSpec};

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, LoadResult, ScenarioLoader};
