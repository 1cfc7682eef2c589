//! Core action trait.
//!
//! An [`Action`] is declared symbolically (cost, preconditions, effects) for
//! the planner and executed against a live context `C` by the agent. The
//! same instance is reused across planning attempts, so it carries per-run
//! state (a resolved target, path progress) that [`Action::reset`] clears.

use std::fmt;

use crate::WorldState;

/// A plannable, stateful unit of agent behaviour.
pub trait Action<C> {
    /// Fact identifier used in preconditions and effects.
    type Fact: Copy + Ord + fmt::Debug;

    /// Stable name for logs and plan summaries.
    fn name(&self) -> &'static str;

    /// Cost added to a plan's running total when this action is chained.
    fn cost(&self) -> u32 {
        1
    }

    /// Facts that must hold before this action can be chained.
    fn preconditions(&self) -> &WorldState<Self::Fact>;

    /// Facts written over the state once this action completes.
    fn effects(&self) -> &WorldState<Self::Fact>;

    /// Checks live world data and resolves the action's dynamic target.
    ///
    /// Runs once per planning attempt, before the symbolic search. Returning
    /// `false` removes the action from that attempt entirely; any target or
    /// path found is kept on `self` for [`Action::perform`].
    fn check_procedural_precondition(&mut self, ctx: &mut C) -> bool;

    /// Advances execution by one tick.
    ///
    /// Returns `false` only on unrecoverable failure. "Still running" is `true`.
    fn perform(&mut self, ctx: &mut C) -> bool;

    /// Whether the action has finished its work.
    fn is_done(&self) -> bool;

    /// Whether the agent must be at the action's target before it completes.
    fn requires_in_range(&self) -> bool {
        false
    }

    /// Releases anything the action holds when its plan is dropped.
    ///
    /// Must be idempotent and safe to call on an action that never started.
    fn on_plan_aborted(&mut self, _ctx: &mut C) {}

    /// Returns the action to its pre-planning state.
    fn reset(&mut self);
}

/// Blanket implementation for boxed actions.
///
/// Lets heterogeneous rosters (`Vec<Box<dyn Action<C, Fact = F>>>`) go
/// through the planner like any concrete action type.
impl<C, F> Action<C> for Box<dyn Action<C, Fact = F>>
where
    F: Copy + Ord + fmt::Debug,
{
    type Fact = F;

    #[inline]
    fn name(&self) -> &'static str {
        (**self).name()
    }

    #[inline]
    fn cost(&self) -> u32 {
        (**self).cost()
    }

    #[inline]
    fn preconditions(&self) -> &WorldState<F> {
        (**self).preconditions()
    }

    #[inline]
    fn effects(&self) -> &WorldState<F> {
        (**self).effects()
    }

    #[inline]
    fn check_procedural_precondition(&mut self, ctx: &mut C) -> bool {
        (**self).check_procedural_precondition(ctx)
    }

    #[inline]
    fn perform(&mut self, ctx: &mut C) -> bool {
        (**self).perform(ctx)
    }

    #[inline]
    fn is_done(&self) -> bool {
        (**self).is_done()
    }

    #[inline]
    fn requires_in_range(&self) -> bool {
        (**self).requires_in_range()
    }

    #[inline]
    fn on_plan_aborted(&mut self, ctx: &mut C) {
        (**self).on_plan_aborted(ctx)
    }

    #[inline]
    fn reset(&mut self) {
        (**self).reset()
    }
}
