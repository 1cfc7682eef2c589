//! Agent control loop for the stealth/chase simulation.
//!
//! This crate wires the `game-core` perception and navigation primitives and
//! the `goap` planner into autonomous agents that roam, chase a player they
//! can see, and go back to energy stations before they run dry. Consumers
//! embed [`Simulation`] to drive fixed-step updates and drain [`SimEvent`]s.
//!
//! Modules are organized by responsibility:
//! - [`simulation`] hosts the driver and its builder
//! - [`agent`] runs perception, the state machine and attacks per agent
//! - [`actions`] holds the concrete GOAP actions and their context
//! - [`facts`] and [`fsm`] define the planning vocabulary and state stack
//! - [`world`] keeps the grid, stations and player shared by all agents
//! - [`config`], [`error`], [`events`] and [`rng`] are the supporting plumbing
pub mod actions;
pub mod agent;
pub mod body;
pub mod config;
pub mod error;
pub mod events;
pub mod facts;
pub mod fsm;
pub mod rng;
pub mod simulation;
pub mod world;

pub use actions::{AgentAction, AgentContext, MoveTo, PathFollower, Progress, Recharge, Roam};
pub use agent::{Agent, Surroundings};
pub use body::{Body, Energy};
pub use config::{AgentConfig, SimulationConfig};
pub use error::{Result, RuntimeError};
pub use events::{AbortReason, AgentId, SimEvent, StationId};
pub use facts::{Fact, Goal};
pub use fsm::{AgentState, StateStack};
pub use rng::RngStream;
pub use simulation::{Simulation, SimulationBuilder};
pub use world::{Player, Station, World};
