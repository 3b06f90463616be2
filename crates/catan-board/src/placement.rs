//! Settlement, city and road placement.
//!
//! Every placement runs its full validation before touching the board, so a
//! rejected placement leaves both the board and the player's hand unchanged.
//! `check_building` and `check_connection` run the same validation without
//! committing.

use crate::board::{Board, Connection, ConnectionKind, SlotId, Structure, StructureKind, StreetKey};
use crate::error::{BoardError, PlacementError};
use crate::player::{costs, PlayerColor, ResourceHand};
use tracing::debug;

impl Board {
    // ==================== Buildings ====================

    /// Place a settlement or upgrade one of the player's settlements to a city.
    ///
    /// During founding the building is free and a settlement needs no road.
    pub fn place_building(
        &mut self,
        player: PlayerColor,
        slot: SlotId,
        kind: StructureKind,
        founding: bool,
    ) -> Result<(), BoardError> {
        let cost = self.validate_building(player, slot, kind, founding)?;

        let structure = match kind {
            StructureKind::Settlement => Structure::Settlement(player),
            StructureKind::City => Structure::City(player),
        };
        self.set_structure(slot, structure);
        if let Some(cost) = cost {
            self.player_state_mut(player)?.resources.subtract(&cost);
        }

        debug!(%player, slot, %kind, founding, "Placed building");
        Ok(())
    }

    /// Non-raising form of `place_building`
    pub fn try_place_building(
        &mut self,
        player: PlayerColor,
        slot: SlotId,
        kind: StructureKind,
        founding: bool,
    ) -> bool {
        match self.place_building(player, slot, kind, founding) {
            Ok(()) => true,
            Err(err) => {
                debug!(%player, slot, %kind, error = %err, "Building rejected");
                false
            }
        }
    }

    /// Whether `place_building` would succeed, without placing anything
    pub fn check_building(
        &self,
        player: PlayerColor,
        slot: SlotId,
        kind: StructureKind,
        founding: bool,
    ) -> bool {
        self.validate_building(player, slot, kind, founding).is_ok()
    }

    /// Run every building rule in order; returns the cost to charge, if any
    fn validate_building(
        &self,
        player: PlayerColor,
        slot: SlotId,
        kind: StructureKind,
        founding: bool,
    ) -> Result<Option<ResourceHand>, BoardError> {
        let hand = self.player_state(player)?.resources;

        if self.structures_of(player, kind).len() >= kind.limit() {
            return Err(PlacementError::TooMany {
                kind,
                limit: kind.limit(),
            }
            .into());
        }

        let Some(target) = self.slot(slot) else {
            let reason = if self.tile(slot).is_some() {
                PlacementError::NotABuildingSlot(slot)
            } else {
                PlacementError::UnknownNode(slot)
            };
            return Err(reason.into());
        };

        let cost = match kind {
            StructureKind::Settlement => costs::settlement(),
            StructureKind::City => costs::city(),
        };

        match kind {
            StructureKind::Settlement => {
                if let Some(existing) = target.structure.kind() {
                    return Err(PlacementError::Occupied { slot, existing }.into());
                }
                if !founding {
                    ensure_affordable(&hand, &cost, kind.to_string())?;
                }
                if let Some(&neighbour) = target
                    .neighbours
                    .iter()
                    .find(|n| self.slot_owner(**n).is_some())
                {
                    return Err(PlacementError::TooClose { slot, neighbour }.into());
                }
                if !founding && !self.has_road_at(player, slot) {
                    return Err(PlacementError::NotConnected(slot).into());
                }
            }
            StructureKind::City => {
                match target.structure {
                    Structure::Settlement(owner) if owner == player => {}
                    Structure::Settlement(owner) => {
                        return Err(PlacementError::NotOwner {
                            slot,
                            owner,
                            player,
                        }
                        .into());
                    }
                    Structure::City(_) => {
                        return Err(PlacementError::NoSettlement {
                            slot,
                            found: "a city".to_string(),
                        }
                        .into());
                    }
                    Structure::Empty => {
                        return Err(PlacementError::NoSettlement {
                            slot,
                            found: "nothing".to_string(),
                        }
                        .into());
                    }
                }
                if !founding {
                    ensure_affordable(&hand, &cost, kind.to_string())?;
                }
            }
        }

        Ok((!founding).then_some(cost))
    }

    /// Whether one of the player's roads ends at `slot`
    fn has_road_at(&self, player: PlayerColor, slot: SlotId) -> bool {
        self.neighbours(slot).iter().any(|&other| {
            self.street(slot, other)
                .is_some_and(|street| street.connection == Connection::Road(player))
        })
    }

    // ==================== Connections ====================

    /// Build a road on the street slot between `from` and `to`
    pub fn place_connection(
        &mut self,
        player: PlayerColor,
        from: SlotId,
        to: SlotId,
        kind: ConnectionKind,
    ) -> Result<(), BoardError> {
        let key = self.validate_connection(player, from, to, kind)?;

        self.set_connection(key, Connection::Road(player));
        self.player_state_mut(player)?.resources.subtract(&costs::road());

        debug!(%player, street = %key, "Placed road");
        Ok(())
    }

    /// Non-raising form of `place_connection`
    pub fn try_place_connection(
        &mut self,
        player: PlayerColor,
        from: SlotId,
        to: SlotId,
        kind: ConnectionKind,
    ) -> bool {
        match self.place_connection(player, from, to, kind) {
            Ok(()) => true,
            Err(err) => {
                debug!(%player, from, to, error = %err, "Connection rejected");
                false
            }
        }
    }

    /// Whether `place_connection` would succeed, without placing anything
    pub fn check_connection(
        &self,
        player: PlayerColor,
        from: SlotId,
        to: SlotId,
        kind: ConnectionKind,
    ) -> bool {
        self.validate_connection(player, from, to, kind).is_ok()
    }

    fn validate_connection(
        &self,
        player: PlayerColor,
        from: SlotId,
        to: SlotId,
        kind: ConnectionKind,
    ) -> Result<StreetKey, BoardError> {
        let hand = self.player_state(player)?.resources;

        if kind != ConnectionKind::Road {
            return Err(PlacementError::UnsupportedConnection(kind).into());
        }

        let street = self
            .street(from, to)
            .ok_or(PlacementError::NotAStreet(from, to))?;
        if street.connection.owner().is_some() {
            let [a, b] = street.key.endpoints();
            return Err(PlacementError::StreetTaken(a, b).into());
        }

        ensure_affordable(&hand, &costs::road(), kind.to_string())?;

        let joins_network = street
            .key
            .endpoints()
            .iter()
            .any(|&end| self.slot_owner(end) == Some(player) || self.has_road_at(player, end));
        if !joins_network {
            return Err(PlacementError::NotAdjacentToNetwork(from, to).into());
        }

        Ok(street.key)
    }

    /// Slots where `place_building` would currently accept a settlement
    pub fn legal_settlement_slots(&self, player: PlayerColor, founding: bool) -> Vec<SlotId> {
        self.slot_ids()
            .into_iter()
            .filter(|slot| self.check_building(player, *slot, StructureKind::Settlement, founding))
            .collect()
    }

    /// Street slots where `place_connection` would currently accept a road
    pub fn legal_road_streets(&self, player: PlayerColor) -> Vec<StreetKey> {
        self.streets()
            .map(|street| street.key)
            .filter(|key| {
                let [a, b] = key.endpoints();
                self.check_connection(player, a, b, ConnectionKind::Road)
            })
            .collect()
    }
}

fn ensure_affordable(hand: &ResourceHand, cost: &ResourceHand, piece: String) -> Result<(), PlacementError> {
    if hand.can_afford(cost) {
        Ok(())
    } else {
        Err(PlacementError::CannotAfford {
            piece,
            missing: hand.shortfall(cost),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Resource;
    use pretty_assertions::assert_eq;

    fn board() -> Board {
        let mut board = Board::from_rows(&[1, 2, 1]);
        board.add_player(PlayerColor::Red).add_player(PlayerColor::Blue);
        board
    }

    fn fund(board: &mut Board, player: PlayerColor, hand: ResourceHand) {
        for resource in Resource::ALL {
            board.give_resources(player, resource, hand.get(resource)).unwrap();
        }
    }

    fn rejection(result: Result<(), BoardError>) -> PlacementError {
        match result {
            Err(BoardError::PlacementRejected(reason)) => reason,
            other => panic!("Expected a placement rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_founding_needs_no_resources_or_roads() {
        let mut board = board();
        board
            .place_building(PlayerColor::Red, 101, StructureKind::Settlement, true)
            .unwrap();
        assert_eq!(board.settlements_of(PlayerColor::Red), vec![101]);
    }

    #[test]
    fn test_settlement_needs_resources() {
        let mut board = board();
        let reason = rejection(board.place_building(PlayerColor::Red, 101, StructureKind::Settlement, false));
        assert_eq!(
            reason,
            PlacementError::CannotAfford {
                piece: "settlement".to_string(),
                missing: costs::settlement(),
            }
        );
    }

    #[test]
    fn test_settlement_needs_own_road() {
        let mut board = board();
        fund(&mut board, PlayerColor::Red, costs::settlement());
        let reason = rejection(board.place_building(PlayerColor::Red, 101, StructureKind::Settlement, false));
        assert_eq!(reason, PlacementError::NotConnected(101));

        // Someone else's road does not help
        board.set_connection(StreetKey::new(100, 101), Connection::Road(PlayerColor::Blue));
        assert!(!board.check_building(PlayerColor::Red, 101, StructureKind::Settlement, false));

        board.set_connection(StreetKey::new(101, 103), Connection::Road(PlayerColor::Red));
        board
            .place_building(PlayerColor::Red, 101, StructureKind::Settlement, false)
            .unwrap();
        assert!(board.resource_counts(PlayerColor::Red).unwrap().is_empty());
    }

    #[test]
    fn test_distance_rule() {
        let mut board = board();
        board
            .place_building(PlayerColor::Blue, 100, StructureKind::Settlement, true)
            .unwrap();
        let reason = rejection(board.place_building(PlayerColor::Red, 101, StructureKind::Settlement, true));
        assert_eq!(
            reason,
            PlacementError::TooClose {
                slot: 101,
                neighbour: 100,
            }
        );
    }

    #[test]
    fn test_occupied_slot() {
        let mut board = board();
        board
            .place_building(PlayerColor::Blue, 100, StructureKind::Settlement, true)
            .unwrap();
        let reason = rejection(board.place_building(PlayerColor::Red, 100, StructureKind::Settlement, true));
        assert_eq!(
            reason,
            PlacementError::Occupied {
                slot: 100,
                existing: StructureKind::Settlement,
            }
        );
    }

    #[test]
    fn test_unknown_and_tile_nodes() {
        let mut board = board();
        let reason = rejection(board.place_building(PlayerColor::Red, 404, StructureKind::Settlement, true));
        assert_eq!(reason, PlacementError::UnknownNode(404));

        let reason = rejection(board.place_building(PlayerColor::Red, 1, StructureKind::Settlement, true));
        assert_eq!(reason, PlacementError::NotABuildingSlot(1));
    }

    #[test]
    fn test_city_upgrade() {
        let mut board = board();
        board
            .place_building(PlayerColor::Red, 100, StructureKind::Settlement, true)
            .unwrap();
        fund(&mut board, PlayerColor::Red, costs::city());
        board
            .place_building(PlayerColor::Red, 100, StructureKind::City, false)
            .unwrap();

        assert_eq!(board.slot(100).unwrap().structure, Structure::City(PlayerColor::Red));
        assert!(board.settlements_of(PlayerColor::Red).is_empty());
        assert_eq!(board.cities_of(PlayerColor::Red), vec![100]);
        assert!(board.resource_counts(PlayerColor::Red).unwrap().is_empty());
    }

    #[test]
    fn test_city_requires_own_settlement() {
        let mut board = board();
        let reason = rejection(board.place_building(PlayerColor::Red, 100, StructureKind::City, true));
        assert!(matches!(reason, PlacementError::NoSettlement { slot: 100, .. }));

        board
            .place_building(PlayerColor::Blue, 100, StructureKind::Settlement, true)
            .unwrap();
        let reason = rejection(board.place_building(PlayerColor::Red, 100, StructureKind::City, true));
        assert_eq!(
            reason,
            PlacementError::NotOwner {
                slot: 100,
                owner: PlayerColor::Blue,
                player: PlayerColor::Red,
            }
        );
    }

    #[test]
    fn test_city_needs_resources() {
        let mut board = board();
        board
            .place_building(PlayerColor::Red, 100, StructureKind::Settlement, true)
            .unwrap();
        board.give_resources(PlayerColor::Red, Resource::Ore, 3).unwrap();

        let reason = rejection(board.place_building(PlayerColor::Red, 100, StructureKind::City, false));
        assert!(matches!(reason, PlacementError::CannotAfford { .. }));
        assert_eq!(board.resource_counts(PlayerColor::Red).unwrap().ore, 3);
    }

    #[test]
    fn test_settlement_limit() {
        let mut board = Board::from_rows(&[3, 4, 5, 4, 3]);
        board.add_player(PlayerColor::Red);
        let spread: Vec<SlotId> = board.legal_settlement_slots(PlayerColor::Red, true);

        let mut placed = 0;
        for slot in spread {
            if placed == 5 {
                let reason = rejection(board.place_building(
                    PlayerColor::Red,
                    slot,
                    StructureKind::Settlement,
                    true,
                ));
                assert_eq!(
                    reason,
                    PlacementError::TooMany {
                        kind: StructureKind::Settlement,
                        limit: 5,
                    }
                );
                break;
            }
            if board.try_place_building(PlayerColor::Red, slot, StructureKind::Settlement, true) {
                placed += 1;
            }
        }
        assert_eq!(board.settlements_of(PlayerColor::Red).len(), 5);
    }

    #[test]
    fn test_road_from_settlement() {
        let mut board = board();
        board
            .place_building(PlayerColor::Red, 100, StructureKind::Settlement, true)
            .unwrap();
        fund(&mut board, PlayerColor::Red, costs::road());

        board
            .place_connection(PlayerColor::Red, 102, 100, ConnectionKind::Road)
            .unwrap();
        assert_eq!(board.roads_of(PlayerColor::Red), vec![StreetKey::new(100, 102)]);
        assert!(board.resource_counts(PlayerColor::Red).unwrap().is_empty());
    }

    #[test]
    fn test_road_extends_network() {
        let mut board = board();
        board.set_connection(StreetKey::new(100, 102), Connection::Road(PlayerColor::Red));
        fund(&mut board, PlayerColor::Red, costs::road());

        assert!(board.check_connection(PlayerColor::Red, 102, 104, ConnectionKind::Road));
        assert!(!board.check_connection(PlayerColor::Red, 103, 105, ConnectionKind::Road));
        board
            .place_connection(PlayerColor::Red, 102, 104, ConnectionKind::Road)
            .unwrap();
    }

    #[test]
    fn test_road_rejections() {
        let mut board = board();
        board
            .place_building(PlayerColor::Blue, 100, StructureKind::Settlement, true)
            .unwrap();

        let reason = rejection(board.place_connection(PlayerColor::Red, 100, 115, ConnectionKind::Road));
        assert_eq!(reason, PlacementError::NotAStreet(100, 115));

        let reason = rejection(board.place_connection(PlayerColor::Red, 100, 101, ConnectionKind::Road));
        assert!(matches!(reason, PlacementError::CannotAfford { .. }));

        fund(&mut board, PlayerColor::Red, costs::road());
        // An opponent's settlement is not part of the network
        let reason = rejection(board.place_connection(PlayerColor::Red, 100, 101, ConnectionKind::Road));
        assert_eq!(reason, PlacementError::NotAdjacentToNetwork(100, 101));

        let reason = rejection(board.place_connection(PlayerColor::Red, 100, 101, ConnectionKind::Boat));
        assert_eq!(reason, PlacementError::UnsupportedConnection(ConnectionKind::Boat));

        board.set_connection(StreetKey::new(100, 101), Connection::Road(PlayerColor::Blue));
        let reason = rejection(board.place_connection(PlayerColor::Red, 101, 100, ConnectionKind::Road));
        assert_eq!(reason, PlacementError::StreetTaken(100, 101));
        assert!(!board.try_place_connection(PlayerColor::Red, 101, 100, ConnectionKind::Road));
        assert_eq!(board.resource_counts(PlayerColor::Red).unwrap(), costs::road());
    }

    #[test]
    fn test_legal_road_streets() {
        let mut board = board();
        board
            .place_building(PlayerColor::Red, 100, StructureKind::Settlement, true)
            .unwrap();
        fund(&mut board, PlayerColor::Red, costs::road());

        assert_eq!(
            board.legal_road_streets(PlayerColor::Red),
            vec![StreetKey::new(100, 101), StreetKey::new(100, 102)]
        );
    }
}
