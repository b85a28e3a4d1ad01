//! Argument wire codec.
//!
//! Primitives pass through; references become handles:
//!
//! | Argument | Wire |
//! |---|---|
//! | player at seat 2 | `"$p[2]"` |
//! | element at branch `0/1/3` | `"$el[0/1/3]"` |
//! | element list | list of element handles |
//! | text `"$5"` | `"$$5"` |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::core::{Args, Argument, ElementId, ElementList, GameState, PlayerId};
use crate::error::{EngineError, WireError};

const PLAYER_PREFIX: &str = "$p[";
const ELEMENT_PREFIX: &str = "$el[";
const ESCAPE: &str = "$$";

/// Wire-safe rendition of an `Argument`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireArgument {
    Bool(bool),
    Number(i64),
    Text(String),
    List(Vec<WireArgument>),
}

/// Arguments keyed by selection name, in wire form.
pub type WireArgs = BTreeMap<String, WireArgument>;

/// Handle for an element.
#[must_use]
pub fn element_handle(board: &Board, id: ElementId) -> String {
    format!("{ELEMENT_PREFIX}{}]", board.branch(id))
}

/// Handle for a player.
#[must_use]
pub fn player_handle(player: PlayerId) -> String {
    format!("{PLAYER_PREFIX}{}]", player.position())
}

/// Convert an argument to its wire form.
#[must_use]
pub fn serialize_arg(arg: &Argument, board: &Board) -> WireArgument {
    match arg {
        Argument::Text(s) if s.starts_with('$') => WireArgument::Text(format!("${s}")),
        Argument::Text(s) => WireArgument::Text(s.clone()),
        Argument::Number(n) => WireArgument::Number(*n),
        Argument::Flag(b) => WireArgument::Bool(*b),
        Argument::Element(id) => WireArgument::Text(element_handle(board, *id)),
        Argument::Elements(list) => WireArgument::List(
            list.iter()
                .map(|id| WireArgument::Text(element_handle(board, *id)))
                .collect(),
        ),
        Argument::Player(p) => WireArgument::Text(player_handle(*p)),
    }
}

/// Rehydrate a wire value against the live game.
pub fn deserialize_arg(wire: &WireArgument, state: &GameState) -> Result<Argument, WireError> {
    match wire {
        WireArgument::Bool(b) => Ok(Argument::Flag(*b)),
        WireArgument::Number(n) => Ok(Argument::Number(*n)),
        WireArgument::Text(s) => deserialize_text(s, state),
        WireArgument::List(items) => {
            let mut list = ElementList::new();
            for item in items {
                match item {
                    WireArgument::Text(s) if s.starts_with(ELEMENT_PREFIX) => {
                        list.push(parse_element(s, &state.board)?);
                    }
                    _ => return Err(WireError::MixedList),
                }
            }
            Ok(Argument::Elements(list))
        }
    }
}

fn deserialize_text(s: &str, state: &GameState) -> Result<Argument, WireError> {
    if let Some(rest) = s.strip_prefix(ESCAPE) {
        return Ok(Argument::Text(format!("${rest}")));
    }
    if s.starts_with(PLAYER_PREFIX) {
        return parse_player(s, state).map(Argument::Player);
    }
    if s.starts_with(ELEMENT_PREFIX) {
        return parse_element(s, &state.board).map(Argument::Element);
    }
    if s.starts_with('$') {
        return Err(WireError::MalformedHandle(s.to_string()));
    }
    Ok(Argument::Text(s.to_string()))
}

/// Inner text of `prefix...]`.
fn handle_body<'a>(s: &'a str, prefix: &str) -> Result<&'a str, WireError> {
    s.strip_prefix(prefix)
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| WireError::MalformedHandle(s.to_string()))
}

fn parse_player(s: &str, state: &GameState) -> Result<PlayerId, WireError> {
    let position: usize = handle_body(s, PLAYER_PREFIX)?
        .parse()
        .map_err(|_| WireError::MalformedHandle(s.to_string()))?;
    PlayerId::from_position(position)
        .filter(|&p| state.has_player(p))
        .ok_or(WireError::UnknownPlayer(position))
}

fn parse_element(s: &str, board: &Board) -> Result<ElementId, WireError> {
    let branch = handle_body(s, ELEMENT_PREFIX)?;
    board
        .at_branch(branch)
        .ok_or_else(|| WireError::UnknownBranch(branch.to_string()))
}

/// Convert a whole argument set.
#[must_use]
pub fn serialize_args(args: &Args, board: &Board) -> WireArgs {
    args.iter()
        .map(|(name, arg)| (name.clone(), serialize_arg(arg, board)))
        .collect()
}

/// Rehydrate a whole argument set; fails on the first bad value.
pub fn deserialize_args(wire: &WireArgs, state: &GameState) -> Result<Args, WireError> {
    let mut args = Args::new();
    for (name, value) in wire {
        args.insert(name.clone(), deserialize_arg(value, state)?);
    }
    Ok(args)
}

/// Arguments as a JSON object.
pub fn args_to_json(args: &Args, board: &Board) -> Result<String, EngineError> {
    Ok(serde_json::to_string(&serialize_args(args, board))?)
}

/// Arguments from a JSON object received from a client.
pub fn args_from_json(json: &str, state: &GameState) -> Result<Args, EngineError> {
    let wire: WireArgs = serde_json::from_str(json)?;
    Ok(deserialize_args(&wire, state)?)
}
