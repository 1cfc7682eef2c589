//! Deterministic perception and navigation primitives.
//!
//! `game-core` owns the walkability [`Grid`] (with seeded obstacle
//! scattering), symmetric shadow-casting [`visibility`] and A*
//! [`pathfinding`]. Everything here is synchronous and
//! side-effect free apart from the grid's own walkable flags, so the runtime
//! can run every query each tick and get the same answer for the same input.
pub mod config;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod pathfinding;
pub mod rng;
pub mod visibility;

pub use config::GridConfig;
pub use error::GridError;
pub use geometry::{DIAGONAL_COST, ORTHOGONAL_COST, Position, WorldPoint};
pub use grid::{
    BLOCKED_GLYPH, BoxObstacles, Cell, Grid, Neighbors, ObstacleOracle, ObstacleScatter, OpenField,
    WALKABLE_GLYPH, WalkabilityMask, parse_layout,
};
pub use pathfinding::{IndexedHeap, Path, Pathfinder, find_path};
pub use rng::Pcg32;
pub use visibility::{FieldOfView, Octant, Shadow, compute_visibility};
