//! Development card market.
//!
//! All 25 cards exist from the moment a board is created. Drawing a card
//! hands it to a player for good; the deck never grows and owned cards never
//! return.

use crate::board::Board;
use crate::error::BoardError;
use crate::player::{costs, DevelopmentCard, PlayerColor};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Index of a card in the deck
pub type CardId = usize;

/// One physical development card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckCard {
    pub id: CardId,
    pub kind: DevelopmentCard,
    /// None while the card is still face down in the pool
    pub owner: Option<PlayerColor>,
}

/// The shared pool of development cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevelopmentDeck {
    cards: Vec<DeckCard>,
}

impl DevelopmentDeck {
    /// The standard composition: 14 knights, 5 victory points, 2 of each other kind
    pub fn standard() -> Self {
        let cards = DevelopmentCard::standard_deck()
            .into_iter()
            .enumerate()
            .map(|(id, kind)| DeckCard {
                id,
                kind,
                owner: None,
            })
            .collect();
        Self { cards }
    }

    pub fn cards(&self) -> &[DeckCard] {
        &self.cards
    }

    /// Number of undrawn cards
    pub fn remaining(&self) -> usize {
        self.undrawn().count()
    }

    /// Number of undrawn cards of one kind
    pub fn remaining_of(&self, kind: DevelopmentCard) -> usize {
        self.undrawn().filter(|card| card.kind == kind).count()
    }

    fn undrawn(&self) -> impl Iterator<Item = &DeckCard> {
        self.cards.iter().filter(|card| card.owner.is_none())
    }

    /// Cards owned by a player, by kind
    pub fn owned_by(&self, player: PlayerColor) -> HashMap<DevelopmentCard, u32> {
        let mut owned = HashMap::new();
        for card in self.cards.iter().filter(|card| card.owner == Some(player)) {
            *owned.entry(card.kind).or_insert(0) += 1;
        }
        owned
    }

    /// Number of cards of one kind owned by a player
    pub fn count_owned(&self, player: PlayerColor, kind: DevelopmentCard) -> u32 {
        self.cards
            .iter()
            .filter(|card| card.owner == Some(player) && card.kind == kind)
            .count() as u32
    }

    /// Pick a card to hand out without changing the deck
    fn select<R: Rng + ?Sized>(
        &self,
        requested: Option<DevelopmentCard>,
        rng: &mut R,
    ) -> Result<CardId, BoardError> {
        let available: Vec<&DeckCard> = self.undrawn().collect();
        if available.is_empty() {
            return Err(BoardError::NoCardsAvailable);
        }

        match requested {
            Some(kind) => available
                .iter()
                .find(|card| card.kind == kind)
                .map(|card| card.id)
                .ok_or(BoardError::RequestedCardUnavailable(kind)),
            None => Ok(available[rng.gen_range(0..available.len())].id),
        }
    }

    fn assign(&mut self, id: CardId, player: PlayerColor) -> Option<DevelopmentCard> {
        let card = self.cards.get_mut(id)?;
        card.owner = Some(player);
        Some(card.kind)
    }
}

impl Default for DevelopmentDeck {
    fn default() -> Self {
        Self::standard()
    }
}

impl Board {
    /// Buy a development card: a card of the requested kind, or a random one
    pub fn draw_development_card(
        &mut self,
        player: PlayerColor,
        requested: Option<DevelopmentCard>,
    ) -> Result<DevelopmentCard, BoardError> {
        self.draw_development_card_with_rng(player, requested, &mut rand::thread_rng())
    }

    /// Same as `draw_development_card`, with a caller-supplied random source
    pub fn draw_development_card_with_rng<R: Rng + ?Sized>(
        &mut self,
        player: PlayerColor,
        requested: Option<DevelopmentCard>,
        rng: &mut R,
    ) -> Result<DevelopmentCard, BoardError> {
        let cost = costs::development_card();
        let hand = self.player_state(player)?.resources;
        if !hand.can_afford(&cost) {
            return Err(BoardError::InsufficientResources {
                player,
                needed: hand.shortfall(&cost),
            });
        }

        let id = self.deck.select(requested, rng)?;
        let card = self.deck.assign(id, player).ok_or(BoardError::NoCardsAvailable)?;
        self.player_state_mut(player)?.resources.subtract(&cost);

        debug!(%player, %card, remaining = self.deck.remaining(), "Drew development card");
        Ok(card)
    }

    /// Non-raising form of `draw_development_card`
    pub fn try_draw_development_card(
        &mut self,
        player: PlayerColor,
        requested: Option<DevelopmentCard>,
    ) -> Option<DevelopmentCard> {
        self.try_draw_development_card_with_rng(player, requested, &mut rand::thread_rng())
    }

    /// Non-raising form of `draw_development_card_with_rng`
    pub fn try_draw_development_card_with_rng<R: Rng + ?Sized>(
        &mut self,
        player: PlayerColor,
        requested: Option<DevelopmentCard>,
        rng: &mut R,
    ) -> Option<DevelopmentCard> {
        match self.draw_development_card_with_rng(player, requested, rng) {
            Ok(card) => Some(card),
            Err(err) => {
                debug!(%player, error = %err, "Development card not drawn");
                None
            }
        }
    }

    /// Development cards owned by a player, by kind
    pub fn development_cards(&self, player: PlayerColor) -> HashMap<DevelopmentCard, u32> {
        self.deck.owned_by(player)
    }

    /// Number of cards of one kind owned by a player
    pub fn development_card_count(&self, player: PlayerColor, kind: DevelopmentCard) -> u32 {
        self.deck.count_owned(player, kind)
    }

    /// Whether the player holds the wool, grain and ore a card costs
    pub fn can_afford_development_card(&self, player: PlayerColor) -> bool {
        self.player_state(player)
            .map(|state| state.resources.can_afford(&costs::development_card()))
            .unwrap_or(false)
    }

    /// Whether an undrawn card of this kind is left in the pool
    pub fn card_available(&self, kind: DevelopmentCard) -> bool {
        self.deck.remaining_of(kind) > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Resource;
    use crate::player::ResourceHand;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn board_with_buyer(cards: u32) -> Board {
        let mut board = Board::from_rows(&[1]);
        board.add_player(PlayerColor::Red);
        for resource in [Resource::Wool, Resource::Grain, Resource::Ore] {
            board.give_resources(PlayerColor::Red, resource, cards).unwrap();
        }
        board
    }

    #[test]
    fn test_standard_deck_composition() {
        let deck = DevelopmentDeck::standard();
        assert_eq!(deck.remaining(), 25);
        assert_eq!(deck.remaining_of(DevelopmentCard::Knight), 14);
        assert_eq!(deck.remaining_of(DevelopmentCard::VictoryPoint), 5);
        assert_eq!(deck.remaining_of(DevelopmentCard::Monopoly), 2);
    }

    #[test]
    fn test_draw_requested_card() {
        let mut board = board_with_buyer(1);
        let card = board
            .draw_development_card(PlayerColor::Red, Some(DevelopmentCard::Monopoly))
            .unwrap();

        assert_eq!(card, DevelopmentCard::Monopoly);
        assert_eq!(board.development_card_count(PlayerColor::Red, DevelopmentCard::Monopoly), 1);
        assert_eq!(board.resource_counts(PlayerColor::Red).unwrap(), ResourceHand::new());
        assert_eq!(board.development_deck().remaining(), 24);
    }

    #[test]
    fn test_draw_random_card_with_seed() {
        let mut board = board_with_buyer(3);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..3 {
            board
                .draw_development_card_with_rng(PlayerColor::Red, None, &mut rng)
                .unwrap();
        }

        let owned: u32 = board.development_cards(PlayerColor::Red).values().sum();
        assert_eq!(owned, 3);
        assert_eq!(board.development_deck().remaining(), 22);
    }

    #[test]
    fn test_draw_without_resources() {
        let mut board = Board::from_rows(&[1]);
        board.add_player(PlayerColor::Red);
        board.give_resource(PlayerColor::Red, Resource::Wool).unwrap();

        let err = board.draw_development_card(PlayerColor::Red, None).unwrap_err();
        assert_eq!(
            err,
            BoardError::InsufficientResources {
                player: PlayerColor::Red,
                needed: ResourceHand::with_amounts(0, 0, 0, 1, 1),
            }
        );
        assert_eq!(board.development_deck().remaining(), 25);
        assert!(board.try_draw_development_card(PlayerColor::Red, None).is_none());
    }

    #[test]
    fn test_requested_kind_runs_out() {
        let mut board = board_with_buyer(3);
        for _ in 0..2 {
            board
                .draw_development_card(PlayerColor::Red, Some(DevelopmentCard::Invention))
                .unwrap();
        }
        assert!(!board.card_available(DevelopmentCard::Invention));

        let err = board
            .draw_development_card(PlayerColor::Red, Some(DevelopmentCard::Invention))
            .unwrap_err();
        assert_eq!(err, BoardError::RequestedCardUnavailable(DevelopmentCard::Invention));
        // Rejected draw keeps the payment
        assert!(board.can_afford_development_card(PlayerColor::Red));
    }

    #[test]
    fn test_empty_pool() {
        let mut board = board_with_buyer(26);
        for _ in 0..25 {
            board.draw_development_card(PlayerColor::Red, None).unwrap();
        }
        let err = board.draw_development_card(PlayerColor::Red, None).unwrap_err();
        assert_eq!(err, BoardError::NoCardsAvailable);
        let err = board
            .draw_development_card(PlayerColor::Red, Some(DevelopmentCard::Knight))
            .unwrap_err();
        assert_eq!(err, BoardError::NoCardsAvailable);
    }

    #[test]
    fn test_try_draw_with_seeded_rng() {
        let mut board = board_with_buyer(1);
        let mut rng = StdRng::seed_from_u64(3);
        assert!(board
            .try_draw_development_card_with_rng(PlayerColor::Red, None, &mut rng)
            .is_some());
        assert_eq!(board.development_deck().remaining(), 24);

        // Out of resources now
        assert_eq!(
            board.try_draw_development_card_with_rng(PlayerColor::Red, None, &mut rng),
            None
        );
        assert_eq!(board.development_deck().remaining(), 24);
    }

    #[test]
    fn test_cards_never_change_owner() {
        let mut board = board_with_buyer(1);
        board.add_player(PlayerColor::Blue);
        for resource in [Resource::Wool, Resource::Grain, Resource::Ore] {
            board.give_resource(PlayerColor::Blue, resource).unwrap();
        }
        board
            .draw_development_card(PlayerColor::Red, Some(DevelopmentCard::Knight))
            .unwrap();
        board
            .draw_development_card(PlayerColor::Blue, Some(DevelopmentCard::Knight))
            .unwrap();

        let owners: Vec<_> = board
            .development_deck()
            .cards()
            .iter()
            .filter_map(|card| card.owner)
            .collect();
        assert_eq!(owners, vec![PlayerColor::Red, PlayerColor::Blue]);
    }
}
