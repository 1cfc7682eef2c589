//! Stack-based agent state machine.
//!
//! The bottom of the stack is always [`AgentState::Idle`]. `Move` may push
//! `Plan` on top of itself when an interrupt forces a replan; a successful
//! plan pops back into the same `Move`, a failed one unwinds to `Idle`.

use strum::Display;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
pub enum AgentState {
    Idle,
    Plan,
    Move,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateStack {
    states: Vec<AgentState>,
}

impl Default for StateStack {
    fn default() -> Self {
        Self {
            states: vec![AgentState::Idle],
        }
    }
}

impl StateStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> AgentState {
        self.states.last().copied().unwrap_or(AgentState::Idle)
    }

    pub fn push(&mut self, state: AgentState) {
        self.states.push(state);
    }

    /// Pops the top state. The bottom `Idle` is never removed.
    pub fn pop(&mut self) -> Option<AgentState> {
        if self.states.len() > 1 {
            self.states.pop()
        } else {
            None
        }
    }

    /// Replaces the top state (or pushes above the bottom `Idle`).
    pub fn change(&mut self, state: AgentState) {
        self.pop();
        self.push(state);
    }

    /// Unwinds to the bottom `Idle`.
    pub fn reset(&mut self) {
        self.states.truncate(1);
    }

    pub fn depth(&self) -> usize {
        self.states.len()
    }

    pub fn states(&self) -> &[AgentState] {
        &self.states
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bottom_idle_survives_pops() {
        let mut stack = StateStack::new();
        assert_eq!(stack.pop(), None);
        stack.push(AgentState::Plan);
        assert_eq!(stack.current(), AgentState::Plan);
        assert_eq!(stack.pop(), Some(AgentState::Plan));
        assert_eq!(stack.current(), AgentState::Idle);
    }

    #[test]
    fn change_swaps_the_top_and_reset_unwinds() {
        let mut stack = StateStack::new();
        stack.push(AgentState::Plan);
        stack.change(AgentState::Move);
        assert_eq!(stack.states(), &[AgentState::Idle, AgentState::Move]);

        stack.push(AgentState::Plan);
        assert_eq!(stack.depth(), 3);
        stack.reset();
        assert_eq!(stack.states(), &[AgentState::Idle]);
    }
}
