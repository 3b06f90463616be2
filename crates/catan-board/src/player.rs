//! Player identity and resource management.
//!
//! This module contains:
//! - PlayerColor, the identity of a player on the board
//! - Player, a plain value type (color plus display name)
//! - ResourceHand for counting resource cards
//! - Development card kinds and the standard deck composition
//! - Building costs

use crate::board::Resource;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Player color, which doubles as the player's identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerColor {
    Red,
    Blue,
    White,
    Orange,
}

impl PlayerColor {
    /// All colors in seating order
    pub const ALL: [PlayerColor; 4] = [
        PlayerColor::Red,
        PlayerColor::Blue,
        PlayerColor::White,
        PlayerColor::Orange,
    ];

    /// Lower-case name, as used in messages and scenario files
    pub fn name(&self) -> &'static str {
        match self {
            PlayerColor::Red => "red",
            PlayerColor::Blue => "blue",
            PlayerColor::White => "white",
            PlayerColor::Orange => "orange",
        }
    }
}

impl fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A player seated at the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Unique color
    pub color: PlayerColor,
    /// Display name
    pub name: String,
}

impl Player {
    /// Create a new player
    pub fn new(color: PlayerColor, name: impl Into<String>) -> Self {
        Self {
            color,
            name: name.into(),
        }
    }
}

impl From<PlayerColor> for Player {
    fn from(color: PlayerColor) -> Self {
        Self::new(color, color.name())
    }
}

/// Development card kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DevelopmentCard {
    /// Counts toward Largest Army
    Knight,
    /// Worth 1 VP
    VictoryPoint,
    /// Build 2 roads for free
    RoadBuilding,
    /// Take any 2 resources from the bank
    Invention,
    /// All players must give you all of one resource type
    Monopoly,
}

impl DevelopmentCard {
    /// All card kinds
    pub const ALL: [DevelopmentCard; 5] = [
        DevelopmentCard::Knight,
        DevelopmentCard::VictoryPoint,
        DevelopmentCard::RoadBuilding,
        DevelopmentCard::Invention,
        DevelopmentCard::Monopoly,
    ];

    /// How many cards of this kind the standard deck holds
    pub fn copies_in_deck(&self) -> usize {
        match self {
            DevelopmentCard::Knight => 14,
            DevelopmentCard::VictoryPoint => 5,
            DevelopmentCard::RoadBuilding
            | DevelopmentCard::Invention
            | DevelopmentCard::Monopoly => 2,
        }
    }

    /// The standard deck (25 cards), grouped by kind
    pub fn standard_deck() -> Vec<DevelopmentCard> {
        let mut deck = Vec::with_capacity(25);
        for card in Self::ALL {
            deck.extend(std::iter::repeat(card).take(card.copies_in_deck()));
        }
        deck
    }
}

impl fmt::Display for DevelopmentCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DevelopmentCard::Knight => "knight",
            DevelopmentCard::VictoryPoint => "victory point",
            DevelopmentCard::RoadBuilding => "road building",
            DevelopmentCard::Invention => "invention",
            DevelopmentCard::Monopoly => "monopoly",
        })
    }
}

/// A hand of resources
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceHand {
    pub brick: u32,
    pub lumber: u32,
    pub wool: u32,
    pub grain: u32,
    pub ore: u32,
}

impl ResourceHand {
    /// Create an empty hand
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a hand with specific amounts
    pub fn with_amounts(brick: u32, lumber: u32, wool: u32, grain: u32, ore: u32) -> Self {
        Self {
            brick,
            lumber,
            wool,
            grain,
            ore,
        }
    }

    /// Create a hand with a single resource
    pub fn single(resource: Resource, amount: u32) -> Self {
        let mut hand = Self::new();
        hand.add(resource, amount);
        hand
    }

    /// Build a hand from a list of individual cards
    pub fn from_cards(cards: &[Resource]) -> Self {
        let mut hand = Self::new();
        for card in cards {
            hand.add(*card, 1);
        }
        hand
    }

    /// Total number of resource cards
    pub fn total(&self) -> u32 {
        self.brick + self.lumber + self.wool + self.grain + self.ore
    }

    /// Check if hand is empty
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Get count of a specific resource
    pub fn get(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Brick => self.brick,
            Resource::Lumber => self.lumber,
            Resource::Wool => self.wool,
            Resource::Grain => self.grain,
            Resource::Ore => self.ore,
        }
    }

    fn slot_mut(&mut self, resource: Resource) -> &mut u32 {
        match resource {
            Resource::Brick => &mut self.brick,
            Resource::Lumber => &mut self.lumber,
            Resource::Wool => &mut self.wool,
            Resource::Grain => &mut self.grain,
            Resource::Ore => &mut self.ore,
        }
    }

    /// Add resources to hand
    pub fn add(&mut self, resource: Resource, amount: u32) {
        *self.slot_mut(resource) += amount;
    }

    /// Add another hand to this one
    pub fn add_hand(&mut self, other: &ResourceHand) {
        for resource in Resource::ALL {
            self.add(resource, other.get(resource));
        }
    }

    /// Remove resources, returning false (and changing nothing) if too few are held
    pub fn remove(&mut self, resource: Resource, amount: u32) -> bool {
        let held = self.slot_mut(resource);
        if *held < amount {
            return false;
        }
        *held -= amount;
        true
    }

    /// Check if can afford a cost
    pub fn can_afford(&self, cost: &ResourceHand) -> bool {
        Resource::ALL.iter().all(|r| self.get(*r) >= cost.get(*r))
    }

    /// Subtract a cost (panics if insufficient)
    pub fn subtract(&mut self, cost: &ResourceHand) {
        assert!(self.can_afford(cost), "Cannot afford {}", cost);
        for resource in Resource::ALL {
            *self.slot_mut(resource) -= cost.get(resource);
        }
    }

    /// Try to subtract, returning false if insufficient
    pub fn try_subtract(&mut self, cost: &ResourceHand) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.subtract(cost);
        true
    }

    /// The part of `cost` this hand cannot cover
    pub fn shortfall(&self, cost: &ResourceHand) -> ResourceHand {
        let mut missing = ResourceHand::new();
        for resource in Resource::ALL {
            missing.add(resource, cost.get(resource).saturating_sub(self.get(resource)));
        }
        missing
    }

    /// Every card in the hand as its own entry, grouped by resource
    pub fn to_cards(&self) -> Vec<Resource> {
        Resource::ALL
            .iter()
            .flat_map(|r| std::iter::repeat(*r).take(self.get(*r) as usize))
            .collect()
    }

    /// Convert to HashMap, leaving out resources the hand does not hold
    pub fn to_map(&self) -> HashMap<Resource, u32> {
        Resource::ALL
            .iter()
            .filter(|r| self.get(**r) > 0)
            .map(|r| (*r, self.get(*r)))
            .collect()
    }
}

impl fmt::Display for ResourceHand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("nothing");
        }
        let parts: Vec<String> = Resource::ALL
            .iter()
            .filter(|r| self.get(**r) > 0)
            .map(|r| format!("{} {}", self.get(*r), r))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

/// Building costs
pub mod costs {
    use super::ResourceHand;

    /// Cost to build a road: 1 brick, 1 lumber
    pub fn road() -> ResourceHand {
        ResourceHand::with_amounts(1, 1, 0, 0, 0)
    }

    /// Cost to build a settlement: 1 brick, 1 lumber, 1 wool, 1 grain
    pub fn settlement() -> ResourceHand {
        ResourceHand::with_amounts(1, 1, 1, 1, 0)
    }

    /// Cost to upgrade to city: 2 grain, 3 ore
    pub fn city() -> ResourceHand {
        ResourceHand::with_amounts(0, 0, 0, 2, 3)
    }

    /// Cost to buy a development card: 1 wool, 1 grain, 1 ore
    pub fn development_card() -> ResourceHand {
        ResourceHand::with_amounts(0, 0, 1, 1, 1)
    }
}

/// A player's seat at the board: identity plus resource cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub player: Player,
    pub resources: ResourceHand,
}

impl PlayerState {
    pub fn new(player: Player) -> Self {
        Self {
            player,
            resources: ResourceHand::new(),
        }
    }

    pub fn color(&self) -> PlayerColor {
        self.player.color
    }
}
