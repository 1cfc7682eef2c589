//! Goal-oriented action planning.
//!
//! A small, deterministic GOAP core for real-time agents:
//!
//! - [`WorldState`]: uniquely keyed boolean facts; writing a key overwrites it
//! - [`Action`]: a stateful unit of behaviour with symbolic preconditions and
//!   effects plus live-world hooks, generic over a context type `C`
//! - [`Planner`]: tree search from an initial state to the cheapest action
//!   chain that satisfies a goal
//! - [`Plan`]: the FIFO of roster indices the agent consumes one by one
//!
//! Action instances are owned by the caller and reused across planning
//! attempts; the planner only ever refers to them by their index in the
//! roster slice, so a plan stays valid for exactly as long as the roster
//! keeps its order.

pub mod action;
pub mod plan;
pub mod planner;
pub mod state;

pub use action::Action;
pub use plan::Plan;
pub use planner::Planner;
pub use state::{GoalState, WorldState};
