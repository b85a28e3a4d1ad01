//! Client view of pending moves.
//!
//! Pending moves hold element ids and engine arguments; clients get the
//! same content with every reference replaced by its handle.

use serde::{Deserialize, Serialize};

use super::codec::{element_handle, serialize_arg, serialize_args, WireArgs, WireArgument};
use crate::action::{PendingMove, PendingStep};
use crate::board::Board;
use crate::dispatch::ResolvedMoves;
use crate::error::EngineError;
use crate::selection::{ResolvedKind, ResolvedSelection};

/// One choice as shown to a client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireChoice {
    pub value: WireArgument,
    pub label: String,
}

/// Selection as shown to a client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSelection {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub board_choices: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub choices: Vec<WireChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial: Option<WireArgument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regexp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<WireArgument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_context: Option<serde_json::Value>,
}

/// Pending move as shown to a client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WirePendingMove {
    pub action: String,
    pub args: WireArgs,
    /// `None` for choose-action and confirm steps.
    pub selection: Option<WireSelection>,
    /// Every selection is filled.
    pub complete: bool,
}

/// Client view of a selection.
#[must_use]
pub fn wire_selection(selection: &ResolvedSelection, board: &Board) -> WireSelection {
    let mut wire = WireSelection {
        name: selection.name.clone(),
        kind: selection.kind.name().to_string(),
        prompt: selection.prompt.clone(),
        board_choices: Vec::new(),
        choices: Vec::new(),
        min: selection.min,
        max: selection.max,
        initial: selection.initial.as_ref().map(|a| serialize_arg(a, board)),
        regexp: None,
        value: None,
        client_context: selection.client_context.clone(),
    };
    match &selection.kind {
        ResolvedKind::Board { candidates } => {
            wire.board_choices = candidates.iter().map(|&id| element_handle(board, id)).collect();
        }
        ResolvedKind::Choices { choices } => {
            wire.choices = choices
                .iter()
                .map(|c| WireChoice {
                    value: serialize_arg(&c.value, board),
                    label: c.label.clone(),
                })
                .collect();
        }
        ResolvedKind::Number => {}
        ResolvedKind::Text { pattern } => wire.regexp.clone_from(pattern),
        ResolvedKind::Button { value } => wire.value = Some(serialize_arg(value, board)),
    }
    wire
}

/// Client view of a pending move.
#[must_use]
pub fn wire_pending_move(pending: &PendingMove, board: &Board) -> WirePendingMove {
    WirePendingMove {
        action: pending.action.clone(),
        args: serialize_args(&pending.args, board),
        selection: pending.selection().map(|s| wire_selection(s, board)),
        complete: pending.step == PendingStep::Confirm,
    }
}

/// Client view of a whole answer, as JSON.
pub fn resolved_moves_json(moves: &ResolvedMoves, board: &Board) -> Result<serde_json::Value, EngineError> {
    let pending: Vec<WirePendingMove> = moves.moves.iter().map(|m| wire_pending_move(m, board)).collect();
    Ok(serde_json::json!({
        "prompt": moves.prompt,
        "moves": serde_json::to_value(pending)?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Args, ElementId, GameState};
    use crate::selection::{ResolveContext, Selection};

    #[test]
    fn test_board_selection_uses_handles() {
        let mut state = GameState::new(2, 1);
        state.board.create(ElementId::ROOT, "space", "a");
        state.board.create(ElementId::ROOT, "space", "b");

        let args = Args::new();
        let resolved = Selection::board("space", crate::board::ElementQuery::class("space"))
            .prompt("Where?")
            .resolve(&ResolveContext::new(&state, &args));
        let wire = wire_selection(&resolved, &state.board);

        assert_eq!(wire.kind, "board");
        assert_eq!(wire.board_choices, vec!["$el[0/0]", "$el[0/1]"]);
        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(json["type"], "board");
        assert_eq!(json["boardChoices"][1], "$el[0/1]");
        assert!(json.get("choices").is_none());
    }

    #[test]
    fn test_pending_move_json() {
        let state = GameState::new(2, 1);
        let args = Args::new().with("resource", "oil");
        let resolved = Selection::number("amount")
            .min(1)
            .max(3)
            .client_context(serde_json::json!({ "slider": true }))
            .resolve(&ResolveContext::new(&state, &args));
        let moves = ResolvedMoves {
            prompt: Some("Trade".into()),
            moves: vec![PendingMove::select("trade", args, resolved)],
        };

        let json = resolved_moves_json(&moves, &state.board).unwrap();
        assert_eq!(json["prompt"], "Trade");
        let first = &json["moves"][0];
        assert_eq!(first["action"], "trade");
        assert_eq!(first["args"]["resource"], "oil");
        assert_eq!(first["selection"]["max"], 3);
        assert_eq!(first["selection"]["clientContext"]["slider"], true);
        assert_eq!(first["complete"], false);
    }

    #[test]
    fn test_confirm_step_is_complete() {
        let state = GameState::new(2, 1);
        let pending = PendingMove {
            action: "pass".into(),
            args: Args::new(),
            step: PendingStep::Confirm,
        };
        let wire = wire_pending_move(&pending, &state.board);
        assert!(wire.complete);
        assert!(wire.selection.is_none());
    }
}
