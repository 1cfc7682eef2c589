use std::collections::VecDeque;

/// Ordered queue of actions produced by the [`Planner`](crate::Planner).
///
/// Steps are indices into the action roster the plan was built from. The
/// front step is the one currently executing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Plan {
    steps: VecDeque<usize>,
    cost: u32,
}

impl Plan {
    pub fn new(steps: impl IntoIterator<Item = usize>, cost: u32) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            cost,
        }
    }

    /// Roster index of the action at the front of the queue.
    pub fn current(&self) -> Option<usize> {
        self.steps.front().copied()
    }

    /// Drops the front action and returns it.
    pub fn advance(&mut self) -> Option<usize> {
        self.steps.pop_front()
    }

    pub fn steps(&self) -> impl Iterator<Item = usize> + '_ {
        self.steps.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Total cost of the plan as found, unaffected by [`Plan::advance`].
    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }
}
