//! Game facade: the entry points the flow and UI layers call.
//!
//! `Game` owns the state, the action registry and the turn flow. Every
//! entry point scopes the acting player's viewpoint around the work it
//! does, so queries like "my pieces" see the right player.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::flow::{ActionStep, TurnFlow};
use super::registry::ActionRegistry;
use crate::action::{MoveOutcome, PendingMove, PendingStep};
use crate::core::{Args, GameState, PlayerId};
use crate::error::MoveError;

/// Answer to "what should this player be shown next".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolvedMoves {
    /// Prompt for the step as a whole.
    pub prompt: Option<String>,
    /// Pending moves to offer.
    pub moves: Vec<PendingMove>,
}

/// A running game.
pub struct Game<F: TurnFlow> {
    state: GameState,
    registry: ActionRegistry,
    flow: F,
}

impl<F: TurnFlow> Game<F> {
    /// Create a game.
    ///
    /// Panics if the state has no players.
    pub fn new(state: GameState, registry: ActionRegistry, flow: F) -> Self {
        if state.player_count() == 0 {
            panic!("Game requires at least one player");
        }
        Self {
            state,
            registry,
            flow,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Current state, mutable (setup and tests).
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// The action registry.
    #[must_use]
    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// The turn flow.
    #[must_use]
    pub fn flow(&self) -> &F {
        &self.flow
    }

    /// The turn flow, mutable.
    pub fn flow_mut(&mut self) -> &mut F {
        &mut self.flow
    }

    /// Actions the flow currently allows `player`.
    ///
    /// Panics if the flow names an unregistered action.
    #[must_use]
    pub fn allowed_actions(&self, player: PlayerId) -> ActionStep {
        let step = self.flow.allowed_actions(&self.state, player);
        for name in &step.actions {
            if !self.registry.contains(name) {
                panic!("Flow allows unregistered action {name}");
            }
        }
        step
    }

    /// Next steps for `player`.
    ///
    /// With an action name, resolves that action against `args`. Without
    /// one, resolves every allowed action from scratch (`args` is ignored)
    /// and folds them: a lone feasible action is surfaced directly, expand
    /// flattens all first steps together, otherwise each feasible action
    /// becomes a choose-action step.
    ///
    /// `None` means nothing is feasible: the player has no legal move.
    pub fn resolved_selections(
        &mut self,
        player: PlayerId,
        action: Option<&str>,
        args: &Args,
    ) -> Option<ResolvedMoves> {
        if !self.state.has_player(player) {
            return None;
        }
        let step = self.allowed_actions(player);
        let registry = &self.registry;

        self.state.with_viewpoint(player, |state| match action {
            Some(name) => {
                if !step.allows(name) {
                    return None;
                }
                let action = registry.build(name, player, state);
                let steps = action.resolved_selections(state, args).into_steps()?;
                Some(ResolvedMoves {
                    prompt: action.prompt_text().map(str::to_string).or(step.prompt.clone()),
                    moves: or_confirm(name, args, steps),
                })
            }
            None => fold_actions(registry, &step, state, player),
        })
    }

    /// Submit a move.
    ///
    /// `Err(MoveError::Incomplete)` is the normal answer while selections
    /// remain.
    pub fn process_move(
        &mut self,
        player: PlayerId,
        action: &str,
        args: &Args,
    ) -> Result<MoveOutcome, MoveError> {
        if !self.state.has_player(player) {
            return Err(MoveError::NoSuchPlayer);
        }
        if !self.allowed_actions(player).allows(action) {
            return Err(MoveError::NotAllowed {
                action: action.to_string(),
            });
        }

        let registry = &self.registry;
        let outcome = self.state.with_viewpoint(player, |state| {
            let built = registry.build(action, player, state);
            built.process(state, player, args)
        })?;

        self.flow.after_move(&mut self.state, player, action, &outcome);
        Ok(outcome)
    }
}

/// A lone complete move becomes a confirm step.
fn or_confirm(action: &str, args: &Args, steps: Vec<PendingMove>) -> Vec<PendingMove> {
    if steps.is_empty() {
        vec![PendingMove {
            action: action.to_string(),
            args: args.clone(),
            step: PendingStep::Confirm,
        }]
    } else {
        steps
    }
}

fn fold_actions(
    registry: &ActionRegistry,
    step: &ActionStep,
    state: &GameState,
    player: PlayerId,
) -> Option<ResolvedMoves> {
    let empty = Args::new();
    let mut surviving: Vec<(&str, Option<String>, Vec<PendingMove>)> = Vec::new();
    for name in &step.actions {
        let action = registry.build(name, player, state);
        if let Some(steps) = action.resolved_selections(state, &empty).into_steps() {
            surviving.push((name.as_str(), action.prompt_text().map(str::to_string), steps));
        }
    }

    if surviving.is_empty() {
        debug!(player = %player, "no legal move");
        return None;
    }

    if surviving.len() == 1 && step.skip_if_only_one {
        let (name, prompt, steps) = surviving.remove(0);
        return Some(ResolvedMoves {
            prompt: prompt.or(step.prompt.clone()),
            moves: or_confirm(name, &empty, steps),
        });
    }

    let moves = if step.expand && surviving.iter().all(|(_, _, steps)| !steps.is_empty()) {
        surviving.into_iter().flat_map(|(_, _, steps)| steps).collect()
    } else {
        surviving
            .into_iter()
            .map(|(name, _, _)| PendingMove {
                action: name.to_string(),
                args: empty.clone(),
                step: PendingStep::ChooseAction,
            })
            .collect()
    };
    Some(ResolvedMoves {
        prompt: step.prompt.clone(),
        moves,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::selection::Selection;

    struct Fixed(ActionStep);

    impl TurnFlow for Fixed {
        fn allowed_actions(&self, _state: &GameState, _player: PlayerId) -> ActionStep {
            self.0.clone()
        }
    }

    fn registry() -> ActionRegistry {
        let mut registry = ActionRegistry::new();
        registry.register("pass", |_, _| Action::new().prompt("Pass"));
        registry.register("blocked", |_, _| Action::new().condition(false));
        registry.register("count", |_, _| {
            Action::new().select(Selection::number("n").min(1).max(3))
        });
        registry
    }

    fn game(step: ActionStep) -> Game<Fixed> {
        Game::new(GameState::new(2, 1), registry(), Fixed(step))
    }

    #[test]
    fn test_infeasible_actions_are_not_offered() {
        let mut game = game(ActionStep::new(["pass", "blocked", "count"]));
        let moves = game.resolved_selections(PlayerId::new(0), None, &Args::new()).unwrap();

        let names: Vec<_> = moves.moves.iter().map(|m| m.action.as_str()).collect();
        assert_eq!(names, vec!["pass", "count"]);
        assert!(moves.moves.iter().all(|m| m.step == PendingStep::ChooseAction));
    }

    #[test]
    fn test_lone_action_is_surfaced() {
        let mut game = game(ActionStep::new(["blocked", "count"]));
        let moves = game.resolved_selections(PlayerId::new(0), None, &Args::new()).unwrap();
        assert_eq!(moves.moves.len(), 1);
        assert_eq!(moves.moves[0].selection_name(), Some("n"));
    }

    #[test]
    fn test_lone_complete_action_is_confirm() {
        let mut game = game(ActionStep::new(["pass"]));
        let moves = game.resolved_selections(PlayerId::new(0), None, &Args::new()).unwrap();
        assert_eq!(moves.prompt.as_deref(), Some("Pass"));
        assert_eq!(moves.moves[0].step, PendingStep::Confirm);
    }

    #[test]
    fn test_no_legal_move() {
        let mut game = game(ActionStep::new(["blocked"]));
        assert!(game.resolved_selections(PlayerId::new(0), None, &Args::new()).is_none());
    }

    #[test]
    fn test_expand_disabled_by_complete_action() {
        let mut game = game(ActionStep::new(["pass", "count"]).with_expand(true));
        let moves = game.resolved_selections(PlayerId::new(0), None, &Args::new()).unwrap();
        assert!(moves.moves.iter().all(|m| m.step == PendingStep::ChooseAction));
    }

    #[test]
    fn test_named_action_must_be_allowed() {
        let mut game = game(ActionStep::new(["pass"]));
        assert!(game.resolved_selections(PlayerId::new(0), Some("count"), &Args::new()).is_none());
        assert_eq!(
            game.process_move(PlayerId::new(0), "count", &Args::new().with("n", 1)),
            Err(MoveError::NotAllowed { action: "count".into() })
        );
    }

    #[test]
    fn test_unknown_player() {
        let mut game = game(ActionStep::new(["pass"]));
        assert_eq!(
            game.process_move(PlayerId::new(5), "pass", &Args::new()),
            Err(MoveError::NoSuchPlayer)
        );
        assert!(game.resolved_selections(PlayerId::new(5), None, &Args::new()).is_none());
    }

    #[test]
    #[should_panic(expected = "unregistered action")]
    fn test_flow_naming_unknown_action_panics() {
        let game = game(ActionStep::new(["fly"]));
        let _ = game.allowed_actions(PlayerId::new(0));
    }
}
