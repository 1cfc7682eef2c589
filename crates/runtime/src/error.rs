//! Unified error types surfaced by the runtime API.
//!
//! Only construction and external commands can fail. Per-tick outcomes such
//! as "no path" or "no plan" are ordinary states of the agent loop and are
//! reported as [`SimEvent`](crate::SimEvent)s instead.
use std::path::PathBuf;

use game_core::{GridError, WorldPoint};
use thiserror::Error;

use crate::events::{AgentId, StationId};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("unknown agent {0}")]
    UnknownAgent(AgentId),

    #[error("unknown station {0}")]
    UnknownStation(StationId),

    #[error("no walkable cell near spawn point {point}")]
    NoWalkableSpawn { point: WorldPoint },

    #[error("failed to load configuration from {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}
