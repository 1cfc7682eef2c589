//! Fact vocabulary and goals of the chase agent.

use goap::{GoalState, WorldState};
use strum::{Display, EnumIter};
use tracing::debug;

/// Boolean propositions the agent plans over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
pub enum Fact {
    /// A last-known target position is being pursued.
    HasDestination,
    IsAtDestination,
    IsLowOnEnergy,
    HasRoamed,
}

/// What the agent is currently trying to achieve.
///
/// Variants are declared from highest to lowest priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
pub enum Goal {
    /// Get energy back above the low threshold.
    Survive,
    /// Reach the last known target position.
    Chase,
    /// Wander to a random nearby point.
    Roam,
}

impl Goal {
    /// Picks the goal by fixed priority: survival, then chase, then roam.
    pub fn select(low_on_energy: bool, has_destination: bool) -> Goal {
        let goal = if low_on_energy {
            Goal::Survive
        } else if has_destination {
            Goal::Chase
        } else {
            Goal::Roam
        };
        debug!(%goal, low_on_energy, has_destination, "goal selected");
        goal
    }

    /// Facts a plan for this goal must make true.
    pub fn state(self) -> GoalState<Fact> {
        match self {
            Goal::Survive => WorldState::new().with(Fact::IsLowOnEnergy, false),
            Goal::Chase => WorldState::new().with(Fact::IsAtDestination, true),
            Goal::Roam => WorldState::new().with(Fact::HasRoamed, true),
        }
    }
}
