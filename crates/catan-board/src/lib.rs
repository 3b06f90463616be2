//! Catan board - board graph and rule validation for a Catan-like game
//!
//! This crate models everything that lives on the table:
//! - Row-based board geometry with deterministic slot numbering
//! - Tiles, building slots, street slots, ports and the robber
//! - Player hands, trades and dice production
//! - Settlement, city and road placement rules
//! - The development card market
//! - Victory points, longest road and largest army
//!
//! Turn order and phases are left to the caller: every operation can be
//! called at any time and only checks the rules of the board itself.
//!
//! # Modules
//!
//! - [`geometry`]: Tile centres, corner coordinates and the street pattern
//! - [`board`]: The entity graph and its builder
//! - [`ledger`]: Resource credit, debit, trades and dice resolution
//! - [`placement`]: Building and road placement
//! - [`development`]: Development card deck
//! - [`scoring`]: Victory points
//! - [`setup`]: Randomised standard terrain, numbers and ports
//! - [`scenario`]: JSON scenario files
//! - [`actions`]: Player actions and board events

pub mod actions;
pub mod board;
pub mod development;
pub mod error;
pub mod geometry;
pub mod ledger;
pub mod placement;
pub mod player;
pub mod scenario;
pub mod scoring;
pub mod setup;

// Re-export commonly used types
pub use actions::{BoardEvent, PlayerAction};
pub use board::{
    Board, BoardBuilder, BuildingSlot, Connection, ConnectionKind, Port, PortKind, Resource, Robber,
    RobberKind, SlotId, StreetKey, StreetSlot, Structure, StructureKind, Terrain, Tile, TileId,
    CLASSIC_ROWS,
};
pub use development::DevelopmentDeck;
pub use error::{BoardError, PlacementError};
pub use geometry::Point;
pub use player::{costs, DevelopmentCard, Player, PlayerColor, ResourceHand};
pub use scenario::Scenario;
pub use scoring::VictoryPoints;
