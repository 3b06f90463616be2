//! Player actions and the events they produce.
//!
//! Every action maps onto exactly one board operation; `Board::apply` adds no
//! rules of its own. It does report award changes (longest road, largest
//! army) caused by the action.

use crate::board::{Board, ConnectionKind, Resource, SlotId, StreetKey, StructureKind};
use crate::error::BoardError;
use crate::player::{DevelopmentCard, PlayerColor, ResourceHand};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Everything a player can ask the board to do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerAction {
    /// Build a settlement (free and road-less while founding)
    PlaceSettlement {
        slot: SlotId,
        #[serde(default)]
        founding: bool,
    },
    /// Upgrade an own settlement
    PlaceCity { slot: SlotId },
    /// Build a road between two adjacent slots
    PlaceRoad { from: SlotId, to: SlotId },
    /// Buy a development card, optionally of a given kind
    DrawDevelopmentCard {
        #[serde(default)]
        requested: Option<DevelopmentCard>,
    },
    /// 4:1 with the bank
    BankTrade { give: Resource, receive: Resource },
    /// Trade through the best port the player controls
    PortTrade { give: Resource, receive: Resource },
    /// Swap cards with another player
    PlayerTrade {
        with: PlayerColor,
        offer: ResourceHand,
        request: ResourceHand,
    },
    /// Pay out production for a rolled value
    ResolveRoll { value: u8 },
}

/// What happened on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardEvent {
    SettlementBuilt {
        player: PlayerColor,
        slot: SlotId,
    },

    /// A settlement was upgraded to a city
    CityBuilt {
        player: PlayerColor,
        slot: SlotId,
    },

    RoadBuilt {
        player: PlayerColor,
        street: StreetKey,
    },

    DevelopmentCardDrawn {
        player: PlayerColor,
        card: DevelopmentCard,
    },

    /// Bank or port trade completed
    ResourcesTraded {
        player: PlayerColor,
        gave: Resource,
        gave_count: u32,
        received: Resource,
    },

    PlayersTraded {
        player: PlayerColor,
        partner: PlayerColor,
        offer: ResourceHand,
        request: ResourceHand,
    },

    /// Resources were distributed after a dice roll
    ResourcesDistributed {
        value: u8,
        distributions: Vec<(PlayerColor, Resource, u32)>,
    },

    LongestRoadChanged {
        previous: Option<PlayerColor>,
        current: Option<PlayerColor>,
    },

    LargestArmyChanged {
        previous: Option<PlayerColor>,
        current: Option<PlayerColor>,
    },
}

impl Board {
    /// Carry out one player action
    pub fn apply(&mut self, player: PlayerColor, action: PlayerAction) -> Result<Vec<BoardEvent>, BoardError> {
        let road_holder = self.longest_road_holder();
        let army_holder = self.largest_army_holder();
        let mut events = Vec::new();

        match action {
            PlayerAction::PlaceSettlement { slot, founding } => {
                self.place_building(player, slot, StructureKind::Settlement, founding)?;
                events.push(BoardEvent::SettlementBuilt { player, slot });
            }

            PlayerAction::PlaceCity { slot } => {
                self.place_building(player, slot, StructureKind::City, false)?;
                events.push(BoardEvent::CityBuilt { player, slot });
            }

            PlayerAction::PlaceRoad { from, to } => {
                self.place_connection(player, from, to, ConnectionKind::Road)?;
                events.push(BoardEvent::RoadBuilt {
                    player,
                    street: StreetKey::new(from, to),
                });
            }

            PlayerAction::DrawDevelopmentCard { requested } => {
                let card = self.draw_development_card(player, requested)?;
                events.push(BoardEvent::DevelopmentCardDrawn { player, card });
            }

            PlayerAction::BankTrade { give, receive } => {
                self.trade_with_bank(player, give, receive)?;
                events.push(BoardEvent::ResourcesTraded {
                    player,
                    gave: give,
                    gave_count: crate::ledger::BANK_RATE,
                    received: receive,
                });
            }

            PlayerAction::PortTrade { give, receive } => {
                let rate = self.trade_with_best_port(player, give, receive)?;
                events.push(BoardEvent::ResourcesTraded {
                    player,
                    gave: give,
                    gave_count: rate,
                    received: receive,
                });
            }

            PlayerAction::PlayerTrade { with, offer, request } => {
                self.trade_with_player(player, offer, with, request)?;
                events.push(BoardEvent::PlayersTraded {
                    player,
                    partner: with,
                    offer,
                    request,
                });
            }

            PlayerAction::ResolveRoll { value } => {
                let distributions = self.distribute_roll(value);
                events.push(BoardEvent::ResourcesDistributed { value, distributions });
            }
        }

        let current = self.longest_road_holder();
        if current != road_holder {
            events.push(BoardEvent::LongestRoadChanged {
                previous: road_holder,
                current,
            });
        }
        let current = self.largest_army_holder();
        if current != army_holder {
            events.push(BoardEvent::LargestArmyChanged {
                previous: army_holder,
                current,
            });
        }

        debug!(%player, events = events.len(), "Applied action");
        Ok(events)
    }
}
