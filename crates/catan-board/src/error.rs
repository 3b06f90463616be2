//! Errors raised by board operations.
//!
//! Every fallible operation validates completely before it mutates anything,
//! so an `Err` always means the board is unchanged.

use crate::board::{ConnectionKind, PortKind, Resource, SlotId, StructureKind, TileId};
use crate::player::{DevelopmentCard, PlayerColor, ResourceHand};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when operating on the board
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum BoardError {
    #[error("Placement rejected: {0}")]
    PlacementRejected(#[from] PlacementError),

    #[error("Player {player} needs {needed} more")]
    InsufficientResources {
        player: PlayerColor,
        needed: ResourceHand,
    },

    #[error("Player {player} holds no {resource}")]
    ResourceUnavailable {
        player: PlayerColor,
        resource: Resource,
    },

    #[error("Player {player} does not control a {port} port")]
    PortNotClaimed { player: PlayerColor, port: PortKind },

    #[error("No development cards left")]
    NoCardsAvailable,

    #[error("Requested {0} card is no longer available")]
    RequestedCardUnavailable(DevelopmentCard),

    #[error("Invalid board topology: {0}")]
    InvalidTopology(String),

    #[error("Player {0} is not on the board")]
    UnknownPlayer(PlayerColor),
}

/// Why a settlement, city or road could not be placed
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum PlacementError {
    #[error("too many {kind}s, {limit} already placed")]
    TooMany { kind: StructureKind, limit: usize },

    #[error("node {0} does not exist")]
    UnknownNode(SlotId),

    #[error("node {0} is a tile, only building slots take buildings")]
    NotABuildingSlot(TileId),

    #[error("slot {slot} already holds a {existing}")]
    Occupied {
        slot: SlotId,
        existing: StructureKind,
    },

    #[error("cannot afford a {piece}, missing {missing}")]
    CannotAfford { piece: String, missing: ResourceHand },

    #[error("slot {slot} is too close to the building on slot {neighbour}")]
    TooClose { slot: SlotId, neighbour: SlotId },

    #[error("slot {0} does not connect to one of your roads")]
    NotConnected(SlotId),

    #[error("slot {slot} holds no settlement to upgrade, found {found}")]
    NoSettlement { slot: SlotId, found: String },

    #[error("the settlement on slot {slot} belongs to {owner}, you are {player}")]
    NotOwner {
        slot: SlotId,
        owner: PlayerColor,
        player: PlayerColor,
    },

    #[error("{0} and {1} are not joined by a street slot")]
    NotAStreet(u32, u32),

    #[error("the street between {0} and {1} is already taken")]
    StreetTaken(SlotId, SlotId),

    #[error("no road or building of yours touches the street between {0} and {1}")]
    NotAdjacentToNetwork(SlotId, SlotId),

    #[error("{0} connections are not supported")]
    UnsupportedConnection(ConnectionKind),
}
