//! Simple game implementation.

use crate::action::{Action, MoveOutcome};
use crate::board::{AttributeValue, Board, ElementQuery};
use crate::core::{Args, ElementId, GameState, PlayerId};
use crate::dispatch::{ActionRegistry, ActionStep, Game, TurnFlow};
use crate::error::BehaviorError;
use crate::selection::{Choice, Selection};

/// Resources a space can yield.
pub const RESOURCES: [&str; 2] = ["oil", "garbage"];

/// Points per unit traded.
fn rate(resource: &str) -> i64 {
    if resource == "oil" {
        2
    } else {
        1
    }
}

/// A player's mat, holding resource counts and score.
#[must_use]
pub fn mat_of(board: &Board, player: PlayerId) -> Option<ElementId> {
    board.first(&ElementQuery::class("mat").owned_by(player), None)
}

/// How much of `key` a player holds.
#[must_use]
pub fn holding(state: &GameState, player: PlayerId, key: &str) -> i64 {
    mat_of(&state.board, player)
        .and_then(|mat| state.board.element(mat).attribute(key))
        .and_then(AttributeValue::as_int)
        .unwrap_or(0)
}

fn gain(state: &mut GameState, player: PlayerId, key: &str, delta: i64) -> Result<(), BehaviorError> {
    let mat = mat_of(&state.board, player).ok_or("player has no mat")?;
    let current = holding(state, player, key);
    if current + delta < 0 {
        return Err(format!("not enough {key}").into());
    }
    state.board.set_attribute(mat, key, current + delta);
    Ok(())
}

/// Workers still in the active player's supply.
fn supply_workers() -> ElementQuery {
    ElementQuery::class("worker").mine().matching(|el, board| {
        el.parent()
            .and_then(|parent| board.get(parent))
            .is_some_and(|parent| parent.class == "supply")
    })
}

fn place(_player: PlayerId, _state: &GameState) -> Action {
    Action::new()
        .prompt("Place a worker")
        .select(Selection::board("worker", supply_workers()).prompt("Choose a worker"))
        .select(Selection::board("space", ElementQuery::class("space").empty()).prompt("Choose a space"))
        .on_complete(|cx, args| {
            let worker = args.element("worker").ok_or("no worker chosen")?;
            let space = args.element("space").ok_or("no space chosen")?;
            cx.state.board.put_into(worker, space);

            let target = cx.state.board.element(space);
            let resource = target
                .attribute("yield")
                .and_then(AttributeValue::as_text)
                .map(str::to_string)
                .ok_or("space yields nothing")?;
            let bonus = target.attribute("bonus").and_then(AttributeValue::as_bool) == Some(true);

            gain(cx.state, cx.player, &resource, 1)?;
            if bonus {
                cx.follow_up("trade", Args::new());
            }
            Ok(())
        })
        .message("{{player}} places a worker on {{space}}")
}

fn trade(player: PlayerId, _state: &GameState) -> Action {
    Action::new()
        .prompt("Trade resources")
        .condition_with(move |cx| RESOURCES.iter().any(|r| holding(cx.state, player, r) > 0))
        .select(
            Selection::choices_with("resource", move |cx| {
                RESOURCES
                    .iter()
                    .filter(|r| holding(cx.state, player, r) > 0)
                    .map(|&r| Choice::from(r))
                    .collect()
            })
            .prompt("Trade which resource?")
            .expand(true),
        )
        .select(
            Selection::number("amount")
                .min(1)
                .max_with(move |cx| cx.args.text("resource").map_or(0, |r| holding(cx.state, player, r)))
                .prompt("How many?"),
        )
        .on_complete(|cx, args| {
            let resource = args.text("resource").ok_or("no resource chosen")?;
            let amount = args.number("amount").ok_or("no amount chosen")?;
            gain(cx.state, cx.player, resource, -amount)?;
            gain(cx.state, cx.player, "score", amount * rate(resource))
        })
        .message("{{player}} trades {{amount}} {{resource}}")
}

fn pass(_player: PlayerId, _state: &GameState) -> Action {
    Action::new().prompt("Pass").message("{{player}} passes")
}

/// Actions of the simple game.
#[must_use]
pub fn registry() -> ActionRegistry {
    let mut registry = ActionRegistry::new();
    registry.register("place", place);
    registry.register("trade", trade);
    registry.register("pass", pass);
    registry
}

/// Turn order: players act in seat order; a bonus space grants an extra
/// trade; the game ends once every player passes in a row.
#[derive(Clone, Debug)]
pub struct SimpleFlow {
    current: PlayerId,
    player_count: usize,
    consecutive_passes: usize,
    bonus_pending: bool,
}

impl SimpleFlow {
    /// Flow starting with the first player.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            current: PlayerId::new(0),
            player_count,
            consecutive_passes: 0,
            bonus_pending: false,
        }
    }

    /// Player to act.
    #[must_use]
    pub fn current(&self) -> PlayerId {
        self.current
    }

    /// Whether every player passed in a row.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.consecutive_passes >= self.player_count
    }
}

impl TurnFlow for SimpleFlow {
    fn allowed_actions(&self, _state: &GameState, player: PlayerId) -> ActionStep {
        if self.is_finished() || player != self.current {
            return ActionStep::none();
        }
        if self.bonus_pending {
            return ActionStep::new(["trade", "pass"]).with_prompt("Bonus trade");
        }
        ActionStep::new(["place", "trade", "pass"]).with_prompt("Your turn")
    }

    fn after_move(&mut self, _state: &mut GameState, _player: PlayerId, action: &str, outcome: &MoveOutcome) {
        if !self.bonus_pending && outcome.follow_ups.iter().any(|f| f.action == "trade") {
            self.bonus_pending = true;
            self.consecutive_passes = 0;
            return;
        }
        let was_bonus = std::mem::take(&mut self.bonus_pending);
        if action == "pass" && !was_bonus {
            self.consecutive_passes += 1;
        } else {
            self.consecutive_passes = 0;
        }
        self.current = PlayerId::new(((self.current.index() + 1) % self.player_count) as u8);
    }
}

/// Builder for the simple game.
pub struct SimpleGameBuilder {
    player_count: usize,
    workers_per_player: usize,
    rows: usize,
    columns: usize,
}

impl Default for SimpleGameBuilder {
    fn default() -> Self {
        Self {
            player_count: 2,
            workers_per_player: 3,
            rows: 3,
            columns: 3,
        }
    }
}

impl SimpleGameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player_count(mut self, count: usize) -> Self {
        assert!((2..=4).contains(&count), "Player count must be 2-4");
        self.player_count = count;
        self
    }

    pub fn workers_per_player(mut self, count: usize) -> Self {
        self.workers_per_player = count;
        self
    }

    pub fn map_size(mut self, rows: usize, columns: usize) -> Self {
        assert!(rows <= 26, "At most 26 rows");
        self.rows = rows;
        self.columns = columns;
        self
    }

    /// Build the initial state only.
    pub fn setup(&self, seed: u64) -> GameState {
        let mut state = GameState::new(self.player_count, seed);

        // Layout has its own stream; the game rng stays at its seed.
        let mut map_rng = state.rng.for_context("map");
        let mut yields: Vec<&str> = RESOURCES.iter().copied().cycle().take(self.rows * self.columns).collect();
        map_rng.shuffle(&mut yields);

        let map = state.board.create(ElementId::ROOT, "map", "map");
        let mut yields = yields.into_iter();
        for row in 0..self.rows {
            for column in 0..self.columns {
                let name = format!("{}{}", (b'A' + row as u8) as char, column + 1);
                let space = state.board.create(map, "space", name);
                let resource = yields.next().unwrap_or(RESOURCES[0]);
                let bonus = map_rng.roll(4) == 4;
                state.board.set_attribute(space, "yield", resource);
                state.board.set_attribute(space, "bonus", bonus);
            }
        }

        let players: Vec<_> = state.player_ids().collect();
        for player in players {
            let mat = state.board.create_owned(ElementId::ROOT, "mat", format!("{player} mat"), player);
            for key in RESOURCES.iter().copied().chain(["score"]) {
                state.board.set_attribute(mat, key, 0);
            }
            let supply = state.board.create_owned(ElementId::ROOT, "supply", format!("{player} supply"), player);
            for i in 0..self.workers_per_player {
                state
                    .board
                    .create_owned(supply, "worker", format!("worker {}-{}", player.position(), i + 1), player);
            }
        }
        state
    }

    /// Build a ready-to-play game.
    pub fn build(self, seed: u64) -> Game<SimpleFlow> {
        let state = self.setup(seed);
        Game::new(state, registry(), SimpleFlow::new(self.player_count))
    }
}
