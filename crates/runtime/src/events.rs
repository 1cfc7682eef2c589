//! Events raised during a simulation step.
//!
//! The simulation never pushes into presentation. Callers drain the events
//! accumulated since the last drain and react to them (animations, score,
//! player damage) on their own terms.

use std::fmt;

use game_core::WorldPoint;
use strum::Display;

use crate::facts::Goal;

/// Stable identifier of an agent within one simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent#{}", self.0)
    }
}

/// Stable identifier of an energy station within one simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StationId(pub u32);

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "station#{}", self.0)
    }
}

/// Why an in-flight plan was dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
pub enum AbortReason {
    /// Energy fell below the threshold while pursuing another goal.
    LowEnergy,
    /// The target came into view while roaming.
    TargetSpotted,
    /// The current action reported an unrecoverable failure.
    ActionFailed,
    /// The agent was taken over by manual control.
    ManualControl,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SimEvent {
    PlanFound {
        agent: AgentId,
        goal: Goal,
        actions: Vec<&'static str>,
        cost: u32,
    },
    PlanFailed {
        agent: AgentId,
        goal: Goal,
    },
    PlanAborted {
        agent: AgentId,
        action: &'static str,
        reason: AbortReason,
    },
    ActionsFinished {
        agent: AgentId,
        goal: Goal,
    },
    /// The chase path was recomputed towards a moved target without dropping the plan.
    Replanned {
        agent: AgentId,
        destination: WorldPoint,
    },
    PlayerAttacked {
        agent: AgentId,
    },
    AgentDepleted {
        agent: AgentId,
    },
    StationDestroyed {
        station: StationId,
    },
}

impl SimEvent {
    /// Agent the event concerns, if any.
    pub fn agent(&self) -> Option<AgentId> {
        match self {
            SimEvent::PlanFound { agent, .. }
            | SimEvent::PlanFailed { agent, .. }
            | SimEvent::PlanAborted { agent, .. }
            | SimEvent::ActionsFinished { agent, .. }
            | SimEvent::Replanned { agent, .. }
            | SimEvent::PlayerAttacked { agent }
            | SimEvent::AgentDepleted { agent } => Some(*agent),
            SimEvent::StationDestroyed { .. } => None,
        }
    }
}
