//! Action resolution scenarios.
//!
//! These tests drive `Action::resolved_selections` and `Action::process`
//! through the behaviors a game relies on: dependent selections, pruning,
//! skipping, expansion and behavior execution.

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;
use rust_tabletop::action::{Action, PendingMove, Resolution};
use rust_tabletop::board::ElementQuery;
use rust_tabletop::core::{Args, Argument, ElementId, GameState, PlayerId};
use rust_tabletop::error::{MoveError, ValidationError};
use rust_tabletop::selection::{ResolveContext, ResolvedKind, Selection};

fn steps(resolution: Resolution) -> Vec<PendingMove> {
    resolution.into_steps().expect("expected a feasible resolution")
}

/// Number then dependent number, recording what the behavior saw.
fn dependent_numbers(spy: Rc<RefCell<Vec<(i64, i64)>>>) -> Action {
    Action::new()
        .named("pick")
        .select(Selection::number("n").min(0).max(3))
        .select(
            Selection::number("m")
                .min_with(|cx| cx.args.number("n").unwrap_or(0))
                .max_with(|cx| cx.args.number("n").unwrap_or(0) * 2),
        )
        .on_complete(move |_, args| {
            let n = args.number("n").ok_or("missing n")?;
            let m = args.number("m").ok_or("missing m")?;
            spy.borrow_mut().push((n, m));
            Ok(())
        })
}

#[test]
fn test_dependent_numbers_first_step() {
    let spy = Rc::new(RefCell::new(Vec::new()));
    let action = dependent_numbers(spy);
    let state = GameState::new(2, 1);

    let moves = steps(action.resolved_selections(&state, &Args::new()));
    assert_eq!(moves.len(), 1);
    let sel = moves[0].selection().unwrap();
    assert_eq!(sel.name, "n");
    assert_eq!(sel.kind, ResolvedKind::Number);
    assert_eq!((sel.min, sel.max), (Some(0), Some(3)));
}

#[test]
fn test_dependent_numbers_second_step() {
    let spy = Rc::new(RefCell::new(Vec::new()));
    let action = dependent_numbers(spy);
    let state = GameState::new(2, 1);

    let moves = steps(action.resolved_selections(&state, &Args::new().with("n", 1)));
    assert_eq!(moves.len(), 1);
    let sel = moves[0].selection().unwrap();
    assert_eq!(sel.name, "m");
    assert_eq!((sel.min, sel.max), (Some(1), Some(2)));
    assert_eq!(moves[0].args.number("n"), Some(1));
}

#[test]
fn test_dependent_numbers_process() {
    let spy = Rc::new(RefCell::new(Vec::new()));
    let action = dependent_numbers(Rc::clone(&spy));
    let mut state = GameState::new(2, 1);

    let result = action.process(&mut state, PlayerId::new(0), &Args::new().with("n", 1).with("m", 2));
    assert!(result.is_ok());
    assert_eq!(*spy.borrow(), vec![(1, 2)]);
}

#[test]
fn test_empty_choices_is_infeasible_not_complete() {
    let action = Action::new()
        .named("nothing")
        .select(Selection::choices("c", Vec::<&str>::new()));
    let state = GameState::new(2, 1);

    let resolution = action.resolved_selections(&state, &Args::new());
    assert_eq!(resolution, Resolution::Infeasible);
    assert!(!resolution.is_complete());
}

fn trade() -> Action {
    Action::new()
        .named("trade")
        .select(Selection::choices("resource", ["oil", "garbage"]).expand(true))
        .select(Selection::number("amount").max_with(|cx| {
            if cx.args.text("resource") == Some("oil") {
                3
            } else {
                1
            }
        }))
}

#[test]
fn test_expand_surfaces_one_move_per_choice() {
    let state = GameState::new(2, 1);
    let moves = steps(trade().resolved_selections(&state, &Args::new()));

    assert_eq!(moves.len(), 2);
    assert!(moves.iter().all(|m| m.selection().unwrap().kind == ResolvedKind::Number));
    assert_eq!(moves[0].args.text("resource"), Some("oil"));
    assert_eq!(moves[0].selection().unwrap().max, Some(3));
    assert_eq!(moves[1].args.text("resource"), Some("garbage"));
    assert_eq!(moves[1].selection().unwrap().max, Some(1));
}

#[test]
fn test_expand_after_choice() {
    let state = GameState::new(2, 1);
    let moves = steps(trade().resolved_selections(&state, &Args::new().with("resource", "oil")));

    assert_eq!(moves.len(), 1);
    let sel = moves[0].selection().unwrap();
    assert_eq!(sel.name, "amount");
    assert_eq!(sel.max, Some(3));
}

#[test]
fn test_multi_select_explores_every_combination() {
    let mut state = GameState::new(2, 1);
    for i in 0..5 {
        state.board.create(ElementId::ROOT, "piece", format!("p{i}"));
    }

    let explored = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&explored);
    let action = Action::new()
        .named("take")
        .select(Selection::board("pieces", ElementQuery::class("piece")).min(1).max(3))
        .select(Selection::choices_with("confirm", move |_| {
            *counter.borrow_mut() += 1;
            vec!["ok".into()]
        }));

    let moves = steps(action.resolved_selections(&state, &Args::new()));
    assert_eq!(*explored.borrow(), 5 + 10 + 10);

    assert_eq!(moves.len(), 1);
    let sel = moves[0].selection().unwrap();
    assert!(sel.is_multi());
    assert_eq!(sel.options().len(), 25);
}

#[test]
fn test_multi_select_downstream_pruning_keeps_candidates() {
    let mut state = GameState::new(2, 1);
    let pieces: Vec<_> = (0..3)
        .map(|i| state.board.create(ElementId::ROOT, "piece", format!("p{i}")))
        .collect();

    // Only pairs can be completed.
    let action = Action::new()
        .named("take")
        .select(Selection::board("pieces", ElementQuery::class("piece")).min(1).max(2))
        .select(Selection::choices_with("confirm", |cx| {
            if cx.args.elements("pieces").map_or(0, <[_]>::len) == 2 {
                vec!["ok".into()]
            } else {
                Vec::new()
            }
        }));

    let moves = steps(action.resolved_selections(&state, &Args::new()));
    let sel = moves[0].selection().unwrap();
    assert_eq!(sel.candidates(), pieces.as_slice());
}

#[test]
fn test_inverted_range_is_infeasible() {
    let action = Action::new()
        .named("broken")
        .select(Selection::number("n").min(5).max(4));
    let mut state = GameState::new(2, 1);

    assert!(action.resolved_selections(&state, &Args::new()).is_infeasible());
    assert_eq!(
        action.process(&mut state, PlayerId::new(0), &Args::new()),
        Err(MoveError::Infeasible { action: "broken".into() })
    );
}

#[test]
fn test_infeasibility_propagates_through_levels() {
    let action = Action::new()
        .named("deep")
        .select(Selection::choices("a", ["x", "y"]))
        .select(Selection::choices("b", ["z"]))
        .select(Selection::number("c").min(5).max(4));
    let state = GameState::new(2, 1);

    assert!(action.resolved_selections(&state, &Args::new()).is_infeasible());
}

#[test]
fn test_behaviors_run_once_in_order() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let mut action = Action::new()
        .named("ordered")
        .select(Selection::number("n").min(1).max(2));
    for label in ["first", "second", "third"] {
        let calls = Rc::clone(&calls);
        action = action.on_complete(move |_, _| {
            calls.borrow_mut().push(label);
            Ok(())
        });
    }

    let mut state = GameState::new(2, 1);
    action.process(&mut state, PlayerId::new(0), &Args::new().with("n", 2)).unwrap();
    assert_eq!(*calls.borrow(), vec!["first", "second", "third"]);
}

#[test]
fn test_incomplete_runs_no_behaviors() {
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    let action = dependent_numbers(Rc::new(RefCell::new(Vec::new()))).on_complete(move |_, _| {
        *counter.borrow_mut() += 1;
        Ok(())
    });

    let mut state = GameState::new(2, 1);
    let err = action
        .process(&mut state, PlayerId::new(0), &Args::new().with("n", 2))
        .unwrap_err();
    assert_eq!(err, MoveError::Incomplete { action: "pick".into() });
    assert_eq!(*calls.borrow(), 0);
}

#[test]
fn test_invalid_argument_truncates_the_rest() {
    let spy = Rc::new(RefCell::new(Vec::new()));
    let action = dependent_numbers(Rc::clone(&spy));
    let mut state = GameState::new(2, 1);

    let err = action
        .process(&mut state, PlayerId::new(0), &Args::new().with("n", 1).with("m", 5))
        .unwrap_err();
    assert_eq!(
        err,
        MoveError::Invalid {
            selection: "m".into(),
            reason: ValidationError::AboveMaximum { max: 2 },
        }
    );
    assert!(spy.borrow().is_empty());
}

#[test]
fn test_unknown_arguments_are_ignored() {
    let spy = Rc::new(RefCell::new(Vec::new()));
    let action = dependent_numbers(Rc::clone(&spy));
    let mut state = GameState::new(2, 1);

    let args = Args::new().with("n", 0).with("m", 0).with("bogus", "x");
    action.process(&mut state, PlayerId::new(0), &args).unwrap();
    assert_eq!(*spy.borrow(), vec![(0, 0)]);
}

#[test]
fn test_single_board_candidate_is_not_skipped() {
    let mut state = GameState::new(2, 1);
    state.board.create(ElementId::ROOT, "space", "only");
    let action = Action::new()
        .named("move")
        .select(Selection::board("to", ElementQuery::class("space")))
        .select(Selection::number("n").min(1).max(2));

    let moves = steps(action.resolved_selections(&state, &Args::new()));
    assert_eq!(moves[0].selection().unwrap().name, "to");
}

#[test]
fn test_single_board_candidate_is_not_filled_on_process() {
    let mut state = GameState::new(2, 1);
    let only = state.board.create(ElementId::ROOT, "space", "only");
    let ran = Rc::new(RefCell::new(false));
    let sink = Rc::clone(&ran);
    let action = Action::new()
        .named("move")
        .select(Selection::board("to", ElementQuery::class("space")))
        .on_complete(move |_, _| {
            *sink.borrow_mut() = true;
            Ok(())
        });

    let moves = steps(action.resolved_selections(&state, &Args::new()));
    assert_eq!(moves[0].selection_name(), Some("to"));

    let err = action.process(&mut state, PlayerId::new(0), &Args::new()).unwrap_err();
    assert!(matches!(err, MoveError::Incomplete { .. }));
    assert!(!*ran.borrow());

    action
        .process(&mut state, PlayerId::new(0), &Args::new().with("to", only))
        .unwrap();
    assert!(*ran.borrow());
}

#[test]
fn test_exact_multi_select_is_skipped() {
    let mut state = GameState::new(2, 1);
    let a = state.board.create(ElementId::ROOT, "piece", "a");
    let b = state.board.create(ElementId::ROOT, "piece", "b");
    let action = Action::new()
        .named("take-both")
        .select(Selection::board("pieces", ElementQuery::class("piece")).count(2))
        .select(Selection::number("n").min(1).max(2));

    let moves = steps(action.resolved_selections(&state, &Args::new()));
    assert_eq!(moves.len(), 1);
    assert_eq!(moves[0].selection().unwrap().name, "n");
    assert_eq!(moves[0].args.get("pieces"), Some(&Argument::from(vec![a, b])));
}

#[test]
fn test_skip_if_selection_never_surfaces() {
    let action = Action::new()
        .named("a")
        .select(Selection::number("hidden").min(1).max(3).skip_if(true))
        .select(Selection::number("shown").min(1).max(3));
    let state = GameState::new(2, 1);

    let moves = steps(action.resolved_selections(&state, &Args::new()));
    assert_eq!(moves[0].selection().unwrap().name, "shown");
    assert!(!moves[0].args.contains("hidden"));
}

#[test]
fn test_resolution_does_not_touch_state() {
    let mut state = GameState::new(2, 1);
    for i in 0..4 {
        state.board.create(ElementId::ROOT, "piece", format!("p{i}"));
    }
    let before = state.snapshot().unwrap();

    let action = Action::new()
        .named("look")
        .select(Selection::board("pieces", ElementQuery::class("piece")).min(1).max(4))
        .select(Selection::choices("c", ["x", "y"]));
    let _ = action.resolved_selections(&state, &Args::new());

    assert_eq!(state.snapshot().unwrap(), before);
}

proptest! {
    #[test]
    fn prop_forced_selection_is_never_surfaced(value in "[a-z]{1,8}", upper in 2i64..6, numeric in any::<bool>()) {
        let forced = if numeric {
            Selection::number("forced").min(upper).max(upper)
        } else {
            Selection::choices("forced", [value.as_str()])
        };
        let action = Action::new()
            .named("a")
            .select(forced)
            .select(Selection::number("next").min(1).max(upper));
        let state = GameState::new(2, 1);

        let moves = steps(action.resolved_selections(&state, &Args::new()));
        prop_assert!(!moves.is_empty());
        for m in &moves {
            prop_assert_ne!(m.selection().map(|s| s.name.as_str()), Some("forced"));
        }
    }

    #[test]
    fn prop_resolve_is_idempotent(n in -50i64..50, width in 0i64..200, oil in any::<bool>()) {
        let selection = Selection::number("m")
            .min_with(|cx| cx.args.number("n").unwrap_or(0))
            .max_with(|cx| cx.args.number("n").unwrap_or(0) + cx.args.number("w").unwrap_or(0))
            .prompt_with(|cx| format!("Pick for {}", cx.args.text("r").unwrap_or("?")));
        let state = GameState::new(2, 1);
        let args = Args::new().with("n", n).with("w", width).with("r", if oil { "oil" } else { "garbage" });
        let cx = ResolveContext::new(&state, &args);

        let first = selection.resolve(&cx);
        let second = selection.resolve(&cx);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.options(), second.options());
    }
}
