//! Actions and the feasibility search.
//!
//! An `Action` is an ordered list of selections plus the behaviors that run
//! once every selection has a value. `resolved_selections` explores the
//! remaining selections depth-first to find out which values still lead to
//! a complete move, and folds the result so single-valued choices are
//! skipped and expanded choices are surfaced ahead of time.
//!
//! ## Example
//!
//! ```
//! use rust_tabletop::action::Action;
//! use rust_tabletop::core::{Args, GameState, PlayerId};
//! use rust_tabletop::selection::Selection;
//!
//! let trade = Action::new()
//!     .named("trade")
//!     .select(Selection::choices("resource", ["oil", "garbage"]))
//!     .select(Selection::number("amount").max(3))
//!     .message("{{player}} trades {{amount}} {{resource}}");
//!
//! let mut state = GameState::new(2, 1);
//! let pending = trade.resolved_selections(&state, &Args::new());
//! assert_eq!(pending.steps()[0].selection_name(), Some("resource"));
//!
//! let args = Args::new().with("resource", "oil").with("amount", 2);
//! let outcome = trade.process(&mut state, PlayerId::new(0), &args).unwrap();
//! assert_eq!(outcome.messages, vec!["Player 1 trades 2 oil"]);
//! ```

use std::rc::Rc;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use tracing::{debug, trace, warn};

use super::context::{MoveContext, MoveOutcome};
use super::pending::{PendingMove, Resolution};
use crate::core::{Args, GameState, PlayerId};
use crate::error::{BehaviorError, MoveError};
use crate::selection::{Field, ResolveContext, ResolvedSelection, Selection};

/// Callback run when a move completes.
pub type Behavior = Rc<dyn Fn(&mut MoveContext<'_>, &Args) -> Result<(), BehaviorError>>;

/// A named, player-invocable move.
#[derive(Clone)]
pub struct Action {
    name: String,
    prompt: Option<String>,
    condition: Field<bool>,
    selections: Vec<Selection>,
    behaviors: Vec<Behavior>,
    messages: Vec<String>,
}

impl Default for Action {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name)
            .field("prompt", &self.prompt)
            .field("condition", &self.condition)
            .field("selections", &self.selections)
            .field("behaviors", &self.behaviors.len())
            .field("messages", &self.messages)
            .finish()
    }
}

impl Action {
    /// Create an empty action. The registry assigns its name.
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: String::new(),
            prompt: None,
            condition: Field::Constant(true),
            selections: Vec::new(),
            behaviors: Vec::new(),
            messages: Vec::new(),
        }
    }

    /// Set the action's name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Prompt shown when choosing this action, and for selections without one.
    #[must_use]
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Gate availability on a fixed condition.
    #[must_use]
    pub fn condition(mut self, allowed: bool) -> Self {
        self.condition = Field::Constant(allowed);
        self
    }

    /// Gate availability on a computed condition.
    #[must_use]
    pub fn condition_with(mut self, allowed: impl Fn(&ResolveContext<'_>) -> bool + 'static) -> Self {
        self.condition = Field::computed(allowed);
        self
    }

    /// Append a selection.
    ///
    /// # Panics
    ///
    /// Panics if a selection with the same name already exists.
    #[must_use]
    pub fn select(mut self, selection: Selection) -> Self {
        if self.selection(selection.name()).is_some() {
            panic!("Selection {} declared twice in action {}", selection.name(), self.name);
        }
        self.selections.push(selection);
        self
    }

    /// Register a behavior run on completion, after those already registered.
    #[must_use]
    pub fn on_complete(
        mut self,
        behavior: impl Fn(&mut MoveContext<'_>, &Args) -> Result<(), BehaviorError> + 'static,
    ) -> Self {
        self.behaviors.push(Rc::new(behavior));
        self
    }

    /// Add a message template logged on completion.
    ///
    /// `{{name}}` is replaced by the argument `name`, `{{player}}` by the
    /// acting player's name.
    #[must_use]
    pub fn message(mut self, template: impl Into<String>) -> Self {
        self.messages.push(template.into());
        self
    }

    // === Accessors ===

    /// Action name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Action prompt.
    #[must_use]
    pub fn prompt_text(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    /// Declared selections, in order.
    #[must_use]
    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    /// Selection by name.
    #[must_use]
    pub fn selection(&self, name: &str) -> Option<&Selection> {
        self.selections.iter().find(|s| s.name() == name)
    }

    /// Whether the action's condition holds.
    #[must_use]
    pub fn is_allowed(&self, state: &GameState, args: &Args) -> bool {
        self.condition.resolve(&ResolveContext::new(state, args))
    }

    // === Resolution ===

    /// First selection without a value in `args`, resolved.
    ///
    /// Selections whose skip condition holds are passed over. `None` means
    /// the move is fully specified.
    #[must_use]
    pub fn next_selection(&self, state: &GameState, args: &Args) -> Option<ResolvedSelection> {
        let cx = ResolveContext::new(state, args);
        self.selections
            .iter()
            .filter(|s| !args.contains(s.name()))
            .find(|s| !s.is_skipped(&cx))
            .map(|s| {
                let mut resolved = s.resolve(&cx);
                if resolved.prompt.is_none() {
                    resolved.prompt.clone_from(&self.prompt);
                }
                resolved
            })
    }

    /// Remaining steps for a partial move, or `Infeasible` when no
    /// completion exists.
    ///
    /// Reads `state` only; nothing is changed during the search.
    #[must_use]
    pub fn resolved_selections(&self, state: &GameState, args: &Args) -> Resolution {
        if !self.is_allowed(state, args) {
            debug!(action = %self.name, "condition not met");
            return Resolution::Infeasible;
        }
        let resolution = self.explore(state, args, 0);
        if resolution.is_infeasible() {
            debug!(action = %self.name, "no valid completion");
        }
        resolution
    }

    fn pending(&self, args: &Args, selection: ResolvedSelection) -> Resolution {
        Resolution::Steps(vec![PendingMove::select(&self.name, args.clone(), selection)])
    }

    fn explore(&self, state: &GameState, args: &Args, depth: usize) -> Resolution {
        let Some(selection) = self.next_selection(state, args) else {
            return Resolution::Steps(Vec::new());
        };

        if !selection.is_possible() {
            trace!(action = %self.name, selection = %selection.name, depth, "impossible");
            return Resolution::Infeasible;
        }

        if selection.is_unbounded() {
            return self.pending(args, selection);
        }

        let options = selection.options();
        let considered = options.len();
        let mut surviving = Vec::with_capacity(considered);
        let mut aggregate = Vec::new();
        let mut may_expand = selection.expand;

        for option in options {
            let extended = args.with(selection.name.clone(), option.clone());
            match self.explore(state, &extended, depth + 1) {
                Resolution::Infeasible => {}
                Resolution::Steps(steps) => {
                    if steps.is_empty() {
                        may_expand = false;
                    }
                    surviving.push(option);
                    aggregate.extend(steps);
                }
            }
        }

        trace!(
            action = %self.name,
            selection = %selection.name,
            depth,
            considered,
            surviving = surviving.len(),
            "explored"
        );

        if surviving.is_empty() {
            return Resolution::Infeasible;
        }

        let selection = if surviving.len() < considered && !selection.is_multi() {
            selection.with_options(&surviving)
        } else {
            selection
        };

        // Single board picks are always presented, even with one candidate.
        if aggregate.is_empty() || selection.is_single_board() {
            return self.pending(args, selection);
        }

        if may_expand {
            return Resolution::Steps(aggregate);
        }

        if selection.skip_if_only_one && surviving.len() == 1 {
            return Resolution::Steps(aggregate);
        }

        self.pending(args, selection)
    }

    // === Processing ===

    /// Validate `args`, fill forced values, and run the behaviors if the
    /// move is complete.
    ///
    /// Validation stops at the first invalid argument; later arguments are
    /// discarded. Behaviors run in registration order; state changed by
    /// earlier behaviors is kept when a later one fails.
    pub fn process(
        &self,
        state: &mut GameState,
        player: PlayerId,
        args: &Args,
    ) -> Result<MoveOutcome, MoveError> {
        let (accepted, invalid) = self.accept(state, args);

        match self.resolved_selections(state, &accepted) {
            Resolution::Infeasible => {
                return Err(invalid.unwrap_or_else(|| MoveError::Infeasible {
                    action: self.name.clone(),
                }));
            }
            Resolution::Steps(steps) if !steps.is_empty() => {
                if let Some(err) = invalid {
                    return Err(err);
                }
                debug!(action = %self.name, remaining = steps.len(), "incomplete move");
                return Err(MoveError::Incomplete {
                    action: self.name.clone(),
                });
            }
            Resolution::Steps(_) => {}
        }
        if let Some(err) = invalid {
            return Err(err);
        }

        let mut cx = MoveContext::new(state, player);
        for behavior in &self.behaviors {
            if let Err(source) = behavior(&mut cx, &accepted) {
                warn!(action = %self.name, error = %source, "behavior failed");
                return Err(MoveError::Behavior {
                    action: self.name.clone(),
                    source,
                });
            }
        }
        let follow_ups = cx.into_follow_ups();

        let messages: Vec<String> = self
            .messages
            .iter()
            .map(|template| interpolate(template, state, player, &accepted))
            .collect();
        if state.config().log_messages {
            for message in &messages {
                state.log_message(message.clone());
            }
        }

        debug!(action = %self.name, player = %player, "move complete");
        Ok(MoveOutcome { follow_ups, messages })
    }

    /// Walk the selections in order, keeping valid supplied values and
    /// forced values, up to the first invalid or missing one.
    fn accept(&self, state: &GameState, args: &Args) -> (Args, Option<MoveError>) {
        for name in args.names() {
            if self.selection(name).is_none() {
                warn!(action = %self.name, argument = %name, "dropping unknown argument");
            }
        }

        let mut accepted = Args::new();
        for selection in &self.selections {
            let cx = ResolveContext::new(state, &accepted);
            if selection.is_skipped(&cx) {
                continue;
            }
            let resolved = selection.resolve(&cx);
            match args.get(selection.name()) {
                Some(value) => {
                    if let Err(reason) = resolved.validate(value) {
                        let err = MoveError::Invalid {
                            selection: selection.name().to_string(),
                            reason,
                        };
                        return (accepted, Some(err));
                    }
                    accepted.insert(selection.name(), value.clone());
                }
                // Buttons and single board picks always wait for the player.
                None => match resolved.is_forced() {
                    Some(forced) if !resolved.is_unbounded() && !resolved.is_single_board() => {
                        accepted.insert(selection.name(), forced);
                    }
                    _ => break,
                },
            }
        }
        (accepted, None)
    }
}

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{\{\s*(\w+)\s*\}\}").unwrap_or_else(|e| panic!("placeholder pattern: {e}"))
    })
}

/// Fill `{{name}}` placeholders from the arguments.
///
/// Unknown names are left as written.
fn interpolate(template: &str, state: &GameState, player: PlayerId, args: &Args) -> String {
    placeholder()
        .replace_all(template, |caps: &Captures<'_>| {
            let key = &caps[1];
            if key == "player" {
                return state
                    .player_name(player)
                    .map_or_else(|| player.to_string(), str::to_string);
            }
            args.get(key)
                .map_or_else(|| caps[0].to_string(), |arg| arg.describe(&state.board))
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::action::PendingStep;
    use crate::board::ElementQuery;
    use crate::core::{Argument, ElementId};
    use crate::error::ValidationError;

    fn state() -> GameState {
        GameState::new(2, 7)
    }

    #[test]
    fn test_complete_args_resolve_to_no_steps() {
        let action = Action::new().named("a").select(Selection::number("n").min(0).max(3));
        let args = Args::new().with("n", 2);
        assert!(action.resolved_selections(&state(), &args).is_complete());
    }

    #[test]
    fn test_condition_false_is_infeasible() {
        let action = Action::new().named("a").condition(false);
        assert!(action.resolved_selections(&state(), &Args::new()).is_infeasible());
    }

    #[test]
    fn test_condition_reads_state() {
        let action = Action::new()
            .named("a")
            .condition_with(|cx| cx.state.messages().count() > 0);
        let mut s = state();
        assert!(!action.is_allowed(&s, &Args::new()));
        s.log_message("x");
        assert!(action.is_allowed(&s, &Args::new()));
    }

    #[test]
    fn test_next_selection_skips_filled_and_skipped() {
        let action = Action::new()
            .named("a")
            .prompt("Do it")
            .select(Selection::number("first").max(2))
            .select(Selection::number("skipped").skip_if(true))
            .select(Selection::number("last").max(2).prompt("Last"));

        let s = state();
        let next = action.next_selection(&s, &Args::new()).unwrap();
        assert_eq!(next.name, "first");
        assert_eq!(next.prompt.as_deref(), Some("Do it"));

        let next = action.next_selection(&s, &Args::new().with("first", 1)).unwrap();
        assert_eq!(next.name, "last");
        assert_eq!(next.prompt.as_deref(), Some("Last"));

        let done = Args::new().with("first", 1).with("last", 1);
        assert!(action.next_selection(&s, &done).is_none());
    }

    #[test]
    fn test_single_choice_is_skipped() {
        let action = Action::new()
            .named("a")
            .select(Selection::choices("only", ["x"]))
            .select(Selection::number("n").min(1).max(2));

        let steps = action.resolved_selections(&state(), &Args::new()).into_steps().unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].selection_name(), Some("n"));
        assert_eq!(steps[0].args.text("only"), Some("x"));
    }

    #[test]
    fn test_single_choice_shown_when_skip_disabled() {
        let action = Action::new()
            .named("a")
            .select(Selection::choices("only", ["x"]).skip_if_only_one(false))
            .select(Selection::number("n").min(1).max(2));

        let steps = action.resolved_selections(&state(), &Args::new()).into_steps().unwrap();
        assert_eq!(steps[0].selection_name(), Some("only"));
    }

    #[test]
    fn test_single_board_candidate_is_presented() {
        let mut s = state();
        let space = s.board.create(ElementId::ROOT, "space", "A1");
        let action = Action::new()
            .named("place")
            .select(Selection::board("space", ElementQuery::class("space")))
            .select(Selection::number("n").min(1).max(2));

        let steps = action.resolved_selections(&s, &Args::new()).into_steps().unwrap();
        assert_eq!(steps.len(), 1);
        let sel = steps[0].selection().unwrap();
        assert_eq!(sel.name, "space");
        assert_eq!(sel.candidates(), &[space]);
    }

    #[test]
    fn test_dead_end_candidates_are_pruned() {
        let action = Action::new()
            .named("a")
            .select(Selection::choices("resource", ["oil", "garbage", "ore"]))
            .select(Selection::choices_with("amount", |cx| {
                if cx.args.text("resource") == Some("ore") {
                    Vec::new()
                } else {
                    vec![1.into(), 2.into()]
                }
            }));

        let steps = action.resolved_selections(&state(), &Args::new()).into_steps().unwrap();
        assert_eq!(steps.len(), 1);
        let sel = steps[0].selection().unwrap();
        assert_eq!(sel.options(), vec![Argument::from("oil"), Argument::from("garbage")]);
    }

    #[test]
    fn test_expand_disabled_by_terminal_branch() {
        let action = Action::new()
            .named("a")
            .select(Selection::choices("mode", ["stop", "go"]).expand(true))
            .select(
                Selection::number("n")
                    .min(1)
                    .max(3)
                    .skip_if_with(|cx| cx.args.text("mode") == Some("stop")),
            );

        let steps = action.resolved_selections(&state(), &Args::new()).into_steps().unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].selection_name(), Some("mode"));
    }

    #[test]
    fn test_unbounded_is_a_leaf() {
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        let action = Action::new()
            .named("a")
            .select(Selection::text("word"))
            .select(Selection::choices_with("never", move |_| {
                *counter.borrow_mut() += 1;
                vec!["x".into()]
            }));

        let steps = action.resolved_selections(&state(), &Args::new()).into_steps().unwrap();
        assert_eq!(steps[0].selection_name(), Some("word"));
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn test_process_invalid_reports_first_bad_argument() {
        let action = Action::new()
            .named("a")
            .select(Selection::number("a").min(1).max(3))
            .select(Selection::number("b").min(1).max(3));

        let err = action
            .process(&mut state(), PlayerId::new(0), &Args::new().with("a", 9).with("b", 9))
            .unwrap_err();
        assert_eq!(
            err,
            MoveError::Invalid {
                selection: "a".into(),
                reason: ValidationError::AboveMaximum { max: 3 },
            }
        );
    }

    #[test]
    fn test_process_incomplete() {
        let action = Action::new()
            .named("a")
            .select(Selection::number("a").min(1).max(3))
            .select(Selection::number("b").min(1).max(3));

        let err = action
            .process(&mut state(), PlayerId::new(0), &Args::new().with("a", 2))
            .unwrap_err();
        assert!(err.is_incomplete());
    }

    #[test]
    fn test_process_fills_forced_values() {
        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        let action = Action::new()
            .named("a")
            .select(Selection::choices("only", ["x"]))
            .select(Selection::number("n").min(1).max(2))
            .on_complete(move |_, args| {
                *sink.borrow_mut() = args.text("only").map(str::to_string);
                Ok(())
            });

        action
            .process(&mut state(), PlayerId::new(0), &Args::new().with("n", 1))
            .unwrap();
        assert_eq!(seen.borrow().as_deref(), Some("x"));
    }

    #[test]
    fn test_button_is_not_auto_pressed() {
        let action = Action::new()
            .named("a")
            .select(Selection::button("confirm", true));

        let err = action.process(&mut state(), PlayerId::new(0), &Args::new()).unwrap_err();
        assert!(err.is_incomplete());

        let steps = action.resolved_selections(&state(), &Args::new()).into_steps().unwrap();
        assert_eq!(steps[0].selection_name(), Some("confirm"));
        assert!(matches!(steps[0].step, PendingStep::Select(_)));
    }

    #[test]
    fn test_behavior_error_keeps_earlier_changes() {
        let action = Action::new()
            .named("a")
            .on_complete(|cx, _| {
                cx.state.log_message("first ran");
                Ok(())
            })
            .on_complete(|_, _| Err("out of stock".into()))
            .message("never logged");

        let mut s = state();
        let err = action.process(&mut s, PlayerId::new(0), &Args::new()).unwrap_err();
        assert_eq!(err.to_string(), "a: out of stock");
        assert_eq!(s.messages().cloned().collect::<Vec<_>>(), vec!["first ran"]);
    }

    #[test]
    fn test_follow_ups_returned() {
        let action = Action::new().named("a").on_complete(|cx, _| {
            cx.follow_up("b", Args::new().with("n", 1));
            Ok(())
        });
        let outcome = action.process(&mut state(), PlayerId::new(0), &Args::new()).unwrap();
        assert_eq!(outcome.follow_ups.len(), 1);
        assert_eq!(outcome.follow_ups[0].action, "b");
    }

    #[test]
    fn test_messages_interpolate_elements_and_unknowns() {
        let mut s = state();
        let space = s.board.create(ElementId::ROOT, "space", "Harbor");
        s.set_player_name(PlayerId::new(1), "Ada");
        let action = Action::new()
            .named("a")
            .select(Selection::board("space", ElementQuery::class("space")))
            .message("{{player}} builds at {{ space }} for {{cost}}");

        let outcome = action
            .process(&mut s, PlayerId::new(1), &Args::new().with("space", space))
            .unwrap();
        assert_eq!(outcome.messages, vec!["Ada builds at Harbor for {{cost}}"]);
        assert_eq!(s.messages().count(), 1);
    }

    #[test]
    fn test_messages_not_logged_when_disabled() {
        use crate::core::EngineConfig;

        let mut s = GameState::with_config(2, 1, EngineConfig::default().without_messages());
        let action = Action::new().named("a").message("done");
        let outcome = action.process(&mut s, PlayerId::new(0), &Args::new()).unwrap();
        assert_eq!(outcome.messages, vec!["done"]);
        assert_eq!(s.messages().count(), 0);
    }

    #[test]
    #[should_panic(expected = "declared twice")]
    fn test_duplicate_selection_panics() {
        let _ = Action::new()
            .select(Selection::number("n"))
            .select(Selection::number("n"));
    }
}
