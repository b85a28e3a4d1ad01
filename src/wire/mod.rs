//! Conversion between engine arguments and wire-safe values.
//!
//! Used at the trust boundary: everything a client sends goes through
//! `deserialize_arg`/`args_from_json` before it reaches an action, and
//! every pending move sent out goes through `wire_pending_move`.

mod codec;
mod pending;

pub use codec::{
    args_from_json, args_to_json, deserialize_arg, deserialize_args, element_handle,
    player_handle, serialize_arg, serialize_args, WireArgs, WireArgument,
};
pub use pending::{
    resolved_moves_json, wire_pending_move, wire_selection, WireChoice, WirePendingMove,
    WireSelection,
};
