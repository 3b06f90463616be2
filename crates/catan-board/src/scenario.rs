//! Scenario files: a board shape, its setup and a script of player actions.
//!
//! ```json
//! {
//!   "rows": [1, 2, 1],
//!   "players": ["red", "blue"],
//!   "tiles": [{ "id": 1, "terrain": "hills", "dice": 6 }],
//!   "ports": [{ "kind": "any", "slots": [100, 101] }],
//!   "actions": [
//!     { "player": "red", "action": { "place_settlement": { "slot": 100, "founding": true } } }
//!   ]
//! }
//! ```

use crate::actions::{BoardEvent, PlayerAction};
use crate::board::{Board, BoardBuilder, PortKind, SlotId, Terrain, TileId, CLASSIC_ROWS};
use crate::error::BoardError;
use crate::player::PlayerColor;
use crate::setup::{add_standard_ports, assign_standard_terrain};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Terrain and dice for one tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TileSetup {
    pub id: TileId,
    pub terrain: Terrain,
    #[serde(default)]
    pub dice: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PortSetup {
    pub kind: PortKind,
    pub slots: (SlotId, SlotId),
}

/// One step of a scenario script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptedAction {
    pub player: PlayerColor,
    pub action: PlayerAction,
}

/// Complete description of a board and what happens on it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Scenario {
    pub rows: Vec<usize>,
    pub players: Vec<PlayerColor>,
    pub tiles: Vec<TileSetup>,
    /// Shuffle standard terrain, numbers and ports before applying `tiles` and `ports`
    pub randomize: bool,
    pub seed: Option<u64>,
    pub ports: Vec<PortSetup>,
    pub actions: Vec<ScriptedAction>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            rows: CLASSIC_ROWS.to_vec(),
            players: PlayerColor::ALL.to_vec(),
            tiles: Vec::new(),
            randomize: false,
            seed: None,
            ports: Vec::new(),
            actions: Vec::new(),
        }
    }
}

impl Scenario {
    /// Parse a scenario from JSON text
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Build the board described by this scenario, without running its actions
    pub fn build(&self) -> Result<Board, BoardError> {
        let mut builder = BoardBuilder::new().rows(&self.rows);
        for color in &self.players {
            builder = builder.with_player(*color);
        }
        let mut board = builder.build()?;

        if self.randomize {
            let seed = self.seed.unwrap_or_else(|| rand::thread_rng().gen());
            let mut rng = StdRng::seed_from_u64(seed);
            assign_standard_terrain(&mut board, &mut rng)?;
            add_standard_ports(&mut board, &mut rng)?;
            info!(seed, "Randomised board");
        }

        for tile in &self.tiles {
            board.set_tile(tile.id, tile.terrain, tile.dice)?;
        }
        for port in &self.ports {
            board.add_port(port.kind, port.slots)?;
        }

        Ok(board)
    }

    /// Build the board and replay every scripted action, stopping at the first failure
    pub fn run(&self) -> Result<(Board, Vec<BoardEvent>), BoardError> {
        let mut board = self.build()?;
        let mut events = Vec::new();
        for step in &self.actions {
            events.extend(board.apply(step.player, step.action.clone())?);
        }
        Ok((board, events))
    }
}
