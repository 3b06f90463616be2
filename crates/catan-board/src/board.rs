//! Board state: every entity of a game and the relations between them.
//!
//! This module contains:
//! - Resource, terrain, port and structure types
//! - Tiles, building slots (corners) and street slots (sides)
//! - The `Board` arena holding all of them plus players, the development
//!   deck and the robber
//! - `BoardBuilder` for constructing boards from row lengths
//!
//! Entities are kept in typed maps keyed by stable ids. Tiles are numbered
//! from 1 and building slots from 100, both in layout order, so the same row
//! lengths always produce the same ids.

use crate::development::DevelopmentDeck;
use crate::error::BoardError;
use crate::geometry::{layout_rows, unique_corners, Point, HEXAGON_SIDES};
use crate::player::{Player, PlayerColor, PlayerState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info};

/// Tile identifier, counted from `FIRST_TILE_ID`
pub type TileId = u32;

/// Building slot identifier, counted from `FIRST_SLOT_ID`
pub type SlotId = u32;

/// Port identifier (index in creation order)
pub type PortId = usize;

pub const FIRST_TILE_ID: TileId = 1;
pub const FIRST_SLOT_ID: SlotId = 100;

/// The classic island: 19 tiles in five rows
pub const CLASSIC_ROWS: [usize; 5] = [3, 4, 5, 4, 3];

/// Resource cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Brick,
    Lumber,
    Wool,
    Grain,
    Ore,
}

impl Resource {
    /// All resource types
    pub const ALL: [Resource; 5] = [
        Resource::Brick,
        Resource::Lumber,
        Resource::Wool,
        Resource::Grain,
        Resource::Ore,
    ];
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Resource::Brick => "brick",
            Resource::Lumber => "lumber",
            Resource::Wool => "wool",
            Resource::Grain => "grain",
            Resource::Ore => "ore",
        })
    }
}

/// Terrain of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terrain {
    /// Not assigned yet
    #[default]
    Missing,
    Mountains,
    Hills,
    Forest,
    Fields,
    Pasture,
    Desert,
}

impl Terrain {
    /// The resource this terrain produces, if any
    pub fn resource(&self) -> Option<Resource> {
        match self {
            Terrain::Mountains => Some(Resource::Ore),
            Terrain::Hills => Some(Resource::Brick),
            Terrain::Forest => Some(Resource::Lumber),
            Terrain::Fields => Some(Resource::Grain),
            Terrain::Pasture => Some(Resource::Wool),
            Terrain::Desert | Terrain::Missing => None,
        }
    }
}

/// Port types for maritime trading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortKind {
    /// 3:1 trade any resource
    Any,
    /// 2:1 trade for a specific resource
    Specific(Resource),
}

impl PortKind {
    /// How many cards are given for one card received
    pub fn rate(&self) -> u32 {
        match self {
            PortKind::Any => 3,
            PortKind::Specific(_) => 2,
        }
    }
}

impl fmt::Display for PortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortKind::Any => f.write_str("3:1"),
            PortKind::Specific(resource) => write!(f, "2:1 {}", resource),
        }
    }
}

/// Kind of building a player can put on a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureKind {
    Settlement,
    City,
}

impl StructureKind {
    /// How many of these a single player may have on the board
    pub fn limit(&self) -> usize {
        match self {
            StructureKind::Settlement => 5,
            StructureKind::City => 4,
        }
    }
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StructureKind::Settlement => "settlement",
            StructureKind::City => "city",
        })
    }
}

/// What's built on a building slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Structure {
    /// Nothing built
    #[default]
    Empty,
    /// Settlement (1 VP, 1 resource per adjacent tile)
    Settlement(PlayerColor),
    /// City (2 VP, 2 resources per adjacent tile)
    City(PlayerColor),
}

impl Structure {
    /// Get the owner of this building, if any
    pub fn owner(&self) -> Option<PlayerColor> {
        match self {
            Structure::Empty => None,
            Structure::Settlement(p) | Structure::City(p) => Some(*p),
        }
    }

    /// Kind of building, if any
    pub fn kind(&self) -> Option<StructureKind> {
        match self {
            Structure::Empty => None,
            Structure::Settlement(_) => Some(StructureKind::Settlement),
            Structure::City(_) => Some(StructureKind::City),
        }
    }

    /// Resource multiplier (how many resources per production)
    pub fn resource_multiplier(&self) -> u32 {
        match self {
            Structure::Empty => 0,
            Structure::Settlement(_) => 1,
            Structure::City(_) => 2,
        }
    }
}

/// Kind of connection a street slot can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    Road,
    /// Reserved for seafaring boards
    Boat,
}

impl fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConnectionKind::Road => "road",
            ConnectionKind::Boat => "boat",
        })
    }
}

/// What's built on a street slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Connection {
    /// Nothing built
    #[default]
    Empty,
    Road(PlayerColor),
    Boat(PlayerColor),
}

impl Connection {
    /// Get the owner of this connection, if any
    pub fn owner(&self) -> Option<PlayerColor> {
        match self {
            Connection::Empty => None,
            Connection::Road(p) | Connection::Boat(p) => Some(*p),
        }
    }
}

/// A single hex tile on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub terrain: Terrain,
    /// Dice number that triggers production (2-12, None while unassigned)
    pub dice: Option<u8>,
    /// Centre of the hexagon
    pub center: Point,
    /// The six building slots on this tile's corners, ascending
    pub slots: Vec<SlotId>,
}

impl Tile {
    /// Get the resource this tile produces, if any
    pub fn resource(&self) -> Option<Resource> {
        self.terrain.resource()
    }
}

/// A corner where a settlement or city may be placed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingSlot {
    pub id: SlotId,
    pub coord: Point,
    pub structure: Structure,
    /// Tiles producing to this slot (up to 3)
    pub tiles: Vec<TileId>,
    /// Slots one street away (up to 3)
    pub neighbours: Vec<SlotId>,
}

impl BuildingSlot {
    fn new(id: SlotId, coord: Point) -> Self {
        Self {
            id,
            coord,
            structure: Structure::Empty,
            tiles: Vec::new(),
            neighbours: Vec::new(),
        }
    }
}

/// Order-independent identity of a street slot: its two endpoints, smaller first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StreetKey(SlotId, SlotId);

impl StreetKey {
    /// Key for the street between two slots, in either order
    pub fn new(a: SlotId, b: SlotId) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    /// Both endpoints, smaller first
    pub fn endpoints(&self) -> [SlotId; 2] {
        [self.0, self.1]
    }

    /// The endpoint opposite to `slot`
    pub fn other(&self, slot: SlotId) -> SlotId {
        if self.0 == slot {
            self.1
        } else {
            self.0
        }
    }

    /// Whether `slot` is one of the endpoints
    pub fn touches(&self, slot: SlotId) -> bool {
        self.0 == slot || self.1 == slot
    }
}

impl fmt::Display for StreetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.0, self.1)
    }
}

/// A side between two building slots where a road may be placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreetSlot {
    pub key: StreetKey,
    pub connection: Connection,
}

/// A port serving two building slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub id: PortId,
    pub kind: PortKind,
    pub slots: [SlotId; 2],
}

/// Robber variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RobberKind {
    #[default]
    Normal,
    /// Reserved for seafaring boards
    Sea,
}

/// The single robber of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Robber {
    pub kind: RobberKind,
    /// None while the robber has not been put on a tile
    pub tile: Option<TileId>,
}

/// The complete board
#[derive(Debug, Clone)]
pub struct Board {
    tiles: BTreeMap<TileId, Tile>,
    slots: BTreeMap<SlotId, BuildingSlot>,
    streets: BTreeMap<StreetKey, StreetSlot>,
    ports: Vec<Port>,
    players: Vec<PlayerState>,
    pub(crate) deck: DevelopmentDeck,
    robber: Robber,
}

impl Board {
    /// Create an empty board (no tiles) with a full development deck
    pub fn new() -> Self {
        Self {
            tiles: BTreeMap::new(),
            slots: BTreeMap::new(),
            streets: BTreeMap::new(),
            ports: Vec::new(),
            players: Vec::new(),
            deck: DevelopmentDeck::standard(),
            robber: Robber::default(),
        }
    }

    /// Build the tile, building slot and street slot topology for the given row lengths
    pub fn from_rows(rows: &[usize]) -> Self {
        let mut board = Self::new();
        let layouts = layout_rows(rows);
        let corners = unique_corners(&layouts);

        for (offset, corner) in corners.iter().enumerate() {
            let id = FIRST_SLOT_ID + offset as SlotId;
            board.slots.insert(id, BuildingSlot::new(id, *corner));
        }

        let slot_at = |point: &Point| -> Option<SlotId> {
            corners
                .binary_search_by_key(&point.key(), |c| c.key())
                .ok()
                .map(|offset| FIRST_SLOT_ID + offset as SlotId)
        };

        for (offset, layout) in layouts.iter().enumerate() {
            let id = FIRST_TILE_ID + offset as TileId;
            let slots: Vec<SlotId> = layout.sorted_corners().iter().filter_map(|c| slot_at(c)).collect();

            for slot in &slots {
                if let Some(building) = board.slots.get_mut(slot) {
                    building.tiles.push(id);
                }
            }

            for (a, b) in HEXAGON_SIDES {
                if let (Some(&a), Some(&b)) = (slots.get(a), slots.get(b)) {
                    board.connect(a, b);
                }
            }

            board.tiles.insert(
                id,
                Tile {
                    id,
                    terrain: Terrain::Missing,
                    dice: None,
                    center: layout.center,
                    slots,
                },
            );
        }

        info!(
            rows = ?rows,
            tiles = board.tiles.len(),
            slots = board.slots.len(),
            streets = board.streets.len(),
            "Built board"
        );

        board
    }

    /// Add an empty street slot between two building slots (idempotent)
    fn connect(&mut self, a: SlotId, b: SlotId) {
        let key = StreetKey::new(a, b);
        if self.streets.contains_key(&key) {
            return;
        }
        self.streets.insert(
            key,
            StreetSlot {
                key,
                connection: Connection::Empty,
            },
        );
        for (from, to) in [(a, b), (b, a)] {
            if let Some(slot) = self.slots.get_mut(&from) {
                slot.neighbours.push(to);
            }
        }
    }

    // ==================== Setup Methods ====================

    /// Seat a player. Seating the same color twice keeps the first seat.
    pub fn add_player(&mut self, player: impl Into<Player>) -> &mut Self {
        let player = player.into();
        if self.has_player(player.color) {
            debug!(color = %player.color, "Player already seated");
        } else {
            self.players.push(PlayerState::new(player));
        }
        self
    }

    /// Add a port serving two building slots
    pub fn add_port(&mut self, kind: PortKind, slots: (SlotId, SlotId)) -> Result<PortId, BoardError> {
        let (a, b) = slots;
        for slot in [a, b] {
            if !self.slots.contains_key(&slot) {
                return Err(BoardError::InvalidTopology(format!(
                    "port slot {} does not exist",
                    slot
                )));
            }
        }
        if a == b {
            return Err(BoardError::InvalidTopology(format!(
                "a port needs two different slots, got {} twice",
                a
            )));
        }

        let id = self.ports.len();
        self.ports.push(Port {
            id,
            kind,
            slots: [a, b],
        });
        debug!(port = id, %kind, a, b, "Added port");
        Ok(id)
    }

    /// Non-raising form of `add_port`
    pub fn try_add_port(&mut self, kind: PortKind, slots: (SlotId, SlotId)) -> Option<PortId> {
        match self.add_port(kind, slots) {
            Ok(id) => Some(id),
            Err(err) => {
                debug!(%kind, error = %err, "Port not added");
                None
            }
        }
    }

    /// Assign terrain and dice number to a tile
    pub fn set_tile(&mut self, id: TileId, terrain: Terrain, dice: Option<u8>) -> Result<(), BoardError> {
        if let Some(value) = dice {
            if !(2..=12).contains(&value) {
                return Err(BoardError::InvalidTopology(format!(
                    "dice value {} on tile {} is outside 2-12",
                    value, id
                )));
            }
        }
        let tile = self
            .tiles
            .get_mut(&id)
            .ok_or_else(|| BoardError::InvalidTopology(format!("tile {} does not exist", id)))?;
        tile.terrain = terrain;
        tile.dice = dice;
        Ok(())
    }

    /// Non-raising form of `set_tile`
    pub fn try_set_tile(&mut self, id: TileId, terrain: Terrain, dice: Option<u8>) -> bool {
        match self.set_tile(id, terrain, dice) {
            Ok(()) => true,
            Err(err) => {
                debug!(tile = id, error = %err, "Tile not set");
                false
            }
        }
    }

    // ==================== Query Methods ====================

    /// Get a tile by id
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    /// All tiles in id order
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    pub fn tile_ids(&self) -> Vec<TileId> {
        self.tiles.keys().copied().collect()
    }

    /// Get a building slot by id
    pub fn slot(&self, id: SlotId) -> Option<&BuildingSlot> {
        self.slots.get(&id)
    }

    /// All building slots in id order
    pub fn slots(&self) -> impl Iterator<Item = &BuildingSlot> {
        self.slots.values()
    }

    pub fn slot_ids(&self) -> Vec<SlotId> {
        self.slots.keys().copied().collect()
    }

    /// Get the street slot between two building slots, in either order
    pub fn street(&self, a: SlotId, b: SlotId) -> Option<&StreetSlot> {
        self.streets.get(&StreetKey::new(a, b))
    }

    /// All street slots ordered by endpoints
    pub fn streets(&self) -> impl Iterator<Item = &StreetSlot> {
        self.streets.values()
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    pub fn robber(&self) -> Robber {
        self.robber
    }

    /// Seated players in seating order
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().map(|state| &state.player)
    }

    pub fn has_player(&self, color: PlayerColor) -> bool {
        self.players.iter().any(|state| state.color() == color)
    }

    pub(crate) fn player_state(&self, color: PlayerColor) -> Result<&PlayerState, BoardError> {
        self.players
            .iter()
            .find(|state| state.color() == color)
            .ok_or(BoardError::UnknownPlayer(color))
    }

    pub(crate) fn player_state_mut(&mut self, color: PlayerColor) -> Result<&mut PlayerState, BoardError> {
        self.players
            .iter_mut()
            .find(|state| state.color() == color)
            .ok_or(BoardError::UnknownPlayer(color))
    }

    /// The development deck with all drawn and undrawn cards
    pub fn development_deck(&self) -> &DevelopmentDeck {
        &self.deck
    }

    /// Owner of the building on a slot, if any
    pub fn slot_owner(&self, slot: SlotId) -> Option<PlayerColor> {
        self.slots.get(&slot).and_then(|s| s.structure.owner())
    }

    /// Slots one street away from `slot`
    pub fn neighbours(&self, slot: SlotId) -> &[SlotId] {
        self.slots
            .get(&slot)
            .map(|s| s.neighbours.as_slice())
            .unwrap_or(&[])
    }

    /// Slots holding a building of the given kind owned by `player`
    pub fn structures_of(&self, player: PlayerColor, kind: StructureKind) -> Vec<SlotId> {
        self.slots
            .values()
            .filter(|slot| {
                slot.structure.owner() == Some(player) && slot.structure.kind() == Some(kind)
            })
            .map(|slot| slot.id)
            .collect()
    }

    pub fn settlements_of(&self, player: PlayerColor) -> Vec<SlotId> {
        self.structures_of(player, StructureKind::Settlement)
    }

    pub fn cities_of(&self, player: PlayerColor) -> Vec<SlotId> {
        self.structures_of(player, StructureKind::City)
    }

    /// Street slots carrying a road owned by `player`
    pub fn roads_of(&self, player: PlayerColor) -> Vec<StreetKey> {
        self.streets
            .values()
            .filter(|street| street.connection == Connection::Road(player))
            .map(|street| street.key)
            .collect()
    }

    /// Tiles sharing a side with `tile`
    pub fn neighbouring_tiles(&self, tile: TileId) -> Vec<TileId> {
        let Some(center) = self.tiles.get(&tile) else {
            return Vec::new();
        };
        self.tiles
            .values()
            .filter(|other| other.id != tile)
            .filter(|other| {
                other
                    .slots
                    .iter()
                    .filter(|slot| center.slots.contains(slot))
                    .count()
                    == 2
            })
            .map(|other| other.id)
            .collect()
    }

    /// Street slots on the edge of the island (bordering a single tile)
    pub fn coastal_streets(&self) -> Vec<StreetKey> {
        self.streets
            .keys()
            .filter(|key| {
                let [a, b] = key.endpoints();
                self.tiles
                    .values()
                    .filter(|tile| tile.slots.contains(&a) && tile.slots.contains(&b))
                    .count()
                    == 1
            })
            .copied()
            .collect()
    }

    /// Midpoint of a street slot
    pub fn street_midpoint(&self, key: StreetKey) -> Option<Point> {
        let [a, b] = key.endpoints();
        let a = self.slots.get(&a)?;
        let b = self.slots.get(&b)?;
        Some(a.coord.midpoint(&b.coord))
    }

    // ==================== Mutation Methods ====================

    /// Put a structure on a slot (assumes validation already done)
    pub(crate) fn set_structure(&mut self, slot: SlotId, structure: Structure) {
        if let Some(building) = self.slots.get_mut(&slot) {
            building.structure = structure;
        }
    }

    /// Put a connection on a street slot (assumes validation already done)
    pub(crate) fn set_connection(&mut self, key: StreetKey, connection: Connection) {
        if let Some(street) = self.streets.get_mut(&key) {
            street.connection = connection;
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Step-by-step construction of a board
///
/// ```
/// use catan_board::{BoardBuilder, PlayerColor, PortKind};
///
/// let board = BoardBuilder::new()
///     .rows(&[1, 2, 1])
///     .with_player(PlayerColor::Red)
///     .with_port(PortKind::Any, (100, 101))
///     .build()
///     .unwrap();
/// assert_eq!(board.tiles().count(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct BoardBuilder {
    rows: Vec<usize>,
    tiles: Vec<(TileId, Terrain, Option<u8>)>,
    players: Vec<Player>,
    ports: Vec<(PortKind, (SlotId, SlotId))>,
}

impl BoardBuilder {
    /// Start from the classic five-row island
    pub fn new() -> Self {
        Self {
            rows: CLASSIC_ROWS.to_vec(),
            tiles: Vec::new(),
            players: Vec::new(),
            ports: Vec::new(),
        }
    }

    pub fn rows(mut self, rows: &[usize]) -> Self {
        self.rows = rows.to_vec();
        self
    }

    pub fn with_tile(mut self, id: TileId, terrain: Terrain, dice: Option<u8>) -> Self {
        self.tiles.push((id, terrain, dice));
        self
    }

    pub fn with_player(mut self, player: impl Into<Player>) -> Self {
        self.players.push(player.into());
        self
    }

    pub fn with_port(mut self, kind: PortKind, slots: (SlotId, SlotId)) -> Self {
        self.ports.push((kind, slots));
        self
    }

    pub fn build(self) -> Result<Board, BoardError> {
        let mut board = Board::from_rows(&self.rows);
        for (id, terrain, dice) in self.tiles {
            board.set_tile(id, terrain, dice)?;
        }
        for player in self.players {
            board.add_player(player);
        }
        for (kind, slots) in self.ports {
            board.add_port(kind, slots)?;
        }
        Ok(board)
    }
}

impl Default for BoardBuilder {
    fn default() -> Self {
        Self::new()
    }
}
