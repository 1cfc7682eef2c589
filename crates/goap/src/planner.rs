//! Tree search from an initial world state to a goal.
//!
//! The search expands every usable action whose preconditions hold in the
//! current node, applies its effects, and records the child as a leaf once
//! the goal is satisfied. Nothing is memoised: repeated states are allowed,
//! and termination comes only from removing the action just used from the
//! set its children may try. Depth is therefore bounded by the roster size.

use tracing::{debug, trace};

use crate::{Action, GoalState, Plan, WorldState};

#[derive(Clone, Debug)]
struct SearchNode<K: Ord> {
    parent: Option<usize>,
    running_cost: u32,
    state: WorldState<K>,
    action: Option<usize>,
}

/// Reusable GOAP planner.
///
/// Search nodes live in an arena owned by the planner and are cleared at the
/// start of every [`Planner::plan`] call.
#[derive(Clone, Debug)]
pub struct Planner<K: Ord> {
    nodes: Vec<SearchNode<K>>,
    leaves: Vec<usize>,
}

impl<K: Ord> Default for Planner<K> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            leaves: Vec::new(),
        }
    }
}

impl<K: Copy + Ord + std::fmt::Debug> Planner<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds the cheapest action chain turning `initial` into a state that satisfies `goal`.
    ///
    /// Every action is [`reset`](Action::reset) first, then asked for its
    /// procedural precondition once, in roster order. Among equally cheap
    /// plans the one discovered first wins, which means the plan whose
    /// actions come earliest in the roster. Returns `None` when no chain
    /// reaches the goal; that is an ordinary outcome, not an error.
    pub fn plan<C, A>(
        &mut self,
        ctx: &mut C,
        actions: &mut [A],
        initial: &WorldState<K>,
        goal: &GoalState<K>,
    ) -> Option<Plan>
    where
        A: Action<C, Fact = K>,
    {
        self.nodes.clear();
        self.leaves.clear();

        for action in actions.iter_mut() {
            action.reset();
        }

        let mut usable = Vec::with_capacity(actions.len());
        for (index, action) in actions.iter_mut().enumerate() {
            let passed = action.check_procedural_precondition(ctx);
            trace!(action = action.name(), passed, "procedural precondition");
            if passed {
                usable.push(index);
            }
        }

        self.nodes.push(SearchNode {
            parent: None,
            running_cost: 0,
            state: initial.clone(),
            action: None,
        });
        self.build::<C, A>(0, &usable, actions, goal);

        let Some(cheapest) = self
            .leaves
            .iter()
            .copied()
            .min_by_key(|&leaf| self.nodes[leaf].running_cost)
        else {
            debug!(usable = usable.len(), ?goal, "no plan reaches the goal");
            return None;
        };

        let mut steps = Vec::new();
        let mut cursor = Some(cheapest);
        while let Some(index) = cursor {
            let node = &self.nodes[index];
            if let Some(action) = node.action {
                steps.push(action);
            }
            cursor = node.parent;
        }
        steps.reverse();

        let plan = Plan::new(steps, self.nodes[cheapest].running_cost);
        debug!(
            cost = plan.cost(),
            leaves = self.leaves.len(),
            steps = ?plan.steps().map(|index| actions[index].name()).collect::<Vec<_>>(),
            "plan found"
        );
        Some(plan)
    }

    fn build<C, A>(&mut self, parent: usize, usable: &[usize], actions: &[A], goal: &GoalState<K>)
    where
        A: Action<C, Fact = K>,
    {
        for (position, &index) in usable.iter().enumerate() {
            let action = &actions[index];
            if !self.nodes[parent].state.satisfies(action.preconditions()) {
                continue;
            }

            let state = self.nodes[parent].state.apply(action.effects());
            let reached = state.satisfies(goal);
            let node = self.nodes.len();
            self.nodes.push(SearchNode {
                parent: Some(parent),
                running_cost: self.nodes[parent].running_cost + action.cost(),
                state,
                action: Some(index),
            });

            if reached {
                self.leaves.push(node);
            } else {
                let subset: Vec<usize> = usable
                    .iter()
                    .enumerate()
                    .filter(|&(other, _)| other != position)
                    .map(|(_, &index)| index)
                    .collect();
                self.build::<C, A>(node, &subset, actions, goal);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    enum Fact {
        HasDestination,
        IsAtDestination,
        HasRoamed,
        HasAxe,
        HasWood,
    }

    #[derive(Default)]
    struct Log {
        checked: Vec<&'static str>,
    }

    struct Scripted {
        name: &'static str,
        cost: u32,
        usable: bool,
        resets: usize,
        preconditions: WorldState<Fact>,
        effects: WorldState<Fact>,
    }

    impl Scripted {
        fn new(name: &'static str, cost: u32) -> Self {
            Self {
                name,
                cost,
                usable: true,
                resets: 0,
                preconditions: WorldState::new(),
                effects: WorldState::new(),
            }
        }

        fn requires(mut self, fact: Fact, value: bool) -> Self {
            self.preconditions.set(fact, value);
            self
        }

        fn causes(mut self, fact: Fact, value: bool) -> Self {
            self.effects.set(fact, value);
            self
        }

        fn unusable(mut self) -> Self {
            self.usable = false;
            self
        }
    }

    impl Action<Log> for Scripted {
        type Fact = Fact;

        fn name(&self) -> &'static str {
            self.name
        }

        fn cost(&self) -> u32 {
            self.cost
        }

        fn preconditions(&self) -> &WorldState<Fact> {
            &self.preconditions
        }

        fn effects(&self) -> &WorldState<Fact> {
            &self.effects
        }

        fn check_procedural_precondition(&mut self, ctx: &mut Log) -> bool {
            ctx.checked.push(self.name);
            self.usable
        }

        fn perform(&mut self, _ctx: &mut Log) -> bool {
            true
        }

        fn is_done(&self) -> bool {
            false
        }

        fn reset(&mut self) {
            self.resets += 1;
        }
    }

    fn names(plan: &Plan, actions: &[Scripted]) -> Vec<&'static str> {
        plan.steps().map(|index| actions[index].name).collect()
    }

    fn move_and_roam() -> Vec<Scripted> {
        vec![
            Scripted::new("MoveTo", 1)
                .requires(Fact::HasDestination, true)
                .causes(Fact::IsAtDestination, true),
            Scripted::new("Roam", 1)
                .requires(Fact::HasDestination, false)
                .causes(Fact::HasRoamed, true),
        ]
    }

    #[test]
    fn single_action_reaches_destination() {
        let mut actions = move_and_roam();
        let initial = WorldState::new().with(Fact::HasDestination, true);
        let goal = WorldState::new().with(Fact::IsAtDestination, true);

        let plan = Planner::new()
            .plan(&mut Log::default(), &mut actions, &initial, &goal)
            .unwrap();
        assert_eq!(names(&plan, &actions), vec!["MoveTo"]);
        assert_eq!(plan.cost(), 1);
    }

    #[test]
    fn roam_goal_without_destination() {
        let mut actions = move_and_roam();
        let initial = WorldState::new().with(Fact::HasDestination, false);
        let goal = WorldState::new().with(Fact::HasRoamed, true);

        let plan = Planner::new()
            .plan(&mut Log::default(), &mut actions, &initial, &goal)
            .unwrap();
        assert_eq!(names(&plan, &actions), vec!["Roam"]);
    }

    #[test]
    fn cheaper_action_wins() {
        let mut actions = vec![
            Scripted::new("Sprint", 5).causes(Fact::IsAtDestination, true),
            Scripted::new("Walk", 2).causes(Fact::IsAtDestination, true),
        ];
        let goal = WorldState::new().with(Fact::IsAtDestination, true);

        let plan = Planner::new()
            .plan(&mut Log::default(), &mut actions, &WorldState::new(), &goal)
            .unwrap();
        assert_eq!(names(&plan, &actions), vec!["Walk"]);
        assert_eq!(plan.cost(), 2);
    }

    #[test]
    fn equal_costs_follow_roster_order() {
        let mut actions = vec![
            Scripted::new("First", 3).causes(Fact::IsAtDestination, true),
            Scripted::new("Second", 3).causes(Fact::IsAtDestination, true),
        ];
        let goal = WorldState::new().with(Fact::IsAtDestination, true);

        let plan = Planner::new()
            .plan(&mut Log::default(), &mut actions, &WorldState::new(), &goal)
            .unwrap();
        assert_eq!(names(&plan, &actions), vec!["First"]);
    }

    #[test]
    fn chains_actions_in_dependency_order() {
        let mut actions = vec![
            Scripted::new("ChopWood", 2)
                .requires(Fact::HasAxe, true)
                .causes(Fact::HasWood, true),
            Scripted::new("GetAxe", 1)
                .requires(Fact::HasAxe, false)
                .causes(Fact::HasAxe, true),
            Scripted::new("BuyWood", 10).causes(Fact::HasWood, true),
        ];
        let initial = WorldState::new().with(Fact::HasAxe, false);
        let goal = WorldState::new().with(Fact::HasWood, true);

        let plan = Planner::new()
            .plan(&mut Log::default(), &mut actions, &initial, &goal)
            .unwrap();
        assert_eq!(names(&plan, &actions), vec!["GetAxe", "ChopWood"]);
        assert_eq!(plan.cost(), 3);
    }

    #[test]
    fn procedural_precondition_filters_the_roster() {
        let mut actions = vec![
            Scripted::new("Walk", 1)
                .causes(Fact::IsAtDestination, true)
                .unusable(),
            Scripted::new("Sprint", 4).causes(Fact::IsAtDestination, true),
        ];
        let goal = WorldState::new().with(Fact::IsAtDestination, true);
        let mut log = Log::default();

        let plan = Planner::new()
            .plan(&mut log, &mut actions, &WorldState::new(), &goal)
            .unwrap();
        assert_eq!(names(&plan, &actions), vec!["Sprint"]);
        assert_eq!(log.checked, vec!["Walk", "Sprint"], "checked once each, in order");
    }

    #[test]
    fn every_action_is_reset_before_planning() {
        let mut actions = move_and_roam();
        let initial = WorldState::new().with(Fact::HasDestination, true);
        let goal = WorldState::new().with(Fact::HasWood, true);
        let mut planner = Planner::new();

        planner.plan(&mut Log::default(), &mut actions, &initial, &goal);
        planner.plan(&mut Log::default(), &mut actions, &initial, &goal);
        assert!(actions.iter().all(|action| action.resets == 2));
    }

    #[test]
    fn unreachable_goal_yields_none() {
        let mut actions = vec![
            Scripted::new("Arm", 1)
                .requires(Fact::HasAxe, false)
                .causes(Fact::HasAxe, true),
            Scripted::new("Disarm", 1)
                .requires(Fact::HasAxe, true)
                .causes(Fact::HasAxe, false),
        ];
        let initial = WorldState::new().with(Fact::HasAxe, false);
        let goal = WorldState::new().with(Fact::HasWood, true);

        let mut planner = Planner::new();
        assert_eq!(
            planner.plan(&mut Log::default(), &mut actions, &initial, &goal),
            None
        );
        assert_eq!(
            planner.plan(&mut Log::default(), &mut Vec::<Scripted>::new(), &initial, &goal),
            None
        );
    }

    #[test]
    fn boxed_rosters_plan_like_concrete_ones() {
        struct Counting(Scripted);

        impl Action<Log> for Counting {
            type Fact = Fact;

            fn name(&self) -> &'static str {
                self.0.name
            }

            fn preconditions(&self) -> &WorldState<Fact> {
                &self.0.preconditions
            }

            fn effects(&self) -> &WorldState<Fact> {
                &self.0.effects
            }

            fn check_procedural_precondition(&mut self, ctx: &mut Log) -> bool {
                self.0.check_procedural_precondition(ctx)
            }

            fn perform(&mut self, _ctx: &mut Log) -> bool {
                true
            }

            fn is_done(&self) -> bool {
                false
            }

            fn reset(&mut self) {}
        }

        let mut actions: Vec<Box<dyn Action<Log, Fact = Fact>>> = move_and_roam()
            .into_iter()
            .map(|action| Box::new(Counting(action)) as Box<dyn Action<Log, Fact = Fact>>)
            .collect();
        let initial = WorldState::new().with(Fact::HasDestination, true);
        let goal = WorldState::new().with(Fact::IsAtDestination, true);
        let mut log = Log::default();

        let plan = Planner::new()
            .plan(&mut log, &mut actions, &initial, &goal)
            .unwrap();
        assert_eq!(plan.current().map(|index| actions[index].name()), Some("MoveTo"));
        assert_eq!(log.checked.len(), 2);
    }
}
