//! Victory point scoring, longest road and largest army.

use crate::board::{Board, SlotId, StreetKey};
use crate::player::{DevelopmentCard, PlayerColor};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Roads a player needs before longest road can be awarded
pub const LONGEST_ROAD_MINIMUM: u32 = 5;

/// Knights a player needs before largest army can be awarded
pub const LARGEST_ARMY_MINIMUM: u32 = 3;

/// Points for holding longest road or largest army
pub const AWARD_POINTS: u32 = 2;

/// Victory point breakdown of one player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VictoryPoints {
    pub settlements: u32,
    pub cities: u32,
    pub largest_army: u32,
    pub longest_road: u32,
    pub development_cards: u32,
}

impl VictoryPoints {
    pub fn total(&self) -> u32 {
        self.settlements + self.cities + self.largest_army + self.longest_road + self.development_cards
    }
}

impl Board {
    /// Length of the player's longest road, counted in street slots.
    ///
    /// Slots held by another player cut the network: roads leading into them
    /// are left out entirely.
    pub fn longest_road(&self, player: PlayerColor) -> u32 {
        let mut network: HashMap<SlotId, Vec<StreetKey>> = HashMap::new();
        for road in self.roads_of(player) {
            let open = road
                .endpoints()
                .iter()
                .all(|slot| self.slot_owner(*slot).map_or(true, |owner| owner == player));
            if !open {
                continue;
            }
            for slot in road.endpoints() {
                network.entry(slot).or_default().push(road);
            }
        }

        let mut used = HashSet::new();
        network
            .keys()
            .map(|start| walk(&network, *start, &mut used))
            .max()
            .unwrap_or(0)
    }

    /// The single player whose road is at least 5 long and longer than everyone else's
    pub fn longest_road_holder(&self) -> Option<PlayerColor> {
        let lengths: Vec<_> = self
            .players()
            .map(|p| (p.color, self.longest_road(p.color)))
            .collect();
        unique_leader(&lengths, LONGEST_ROAD_MINIMUM)
    }

    /// The single player owning at least 3 knights and more than everyone else
    pub fn largest_army_holder(&self) -> Option<PlayerColor> {
        let knights: Vec<_> = self
            .players()
            .map(|p| (p.color, self.development_card_count(p.color, DevelopmentCard::Knight)))
            .collect();
        unique_leader(&knights, LARGEST_ARMY_MINIMUM)
    }

    pub fn victory_points(&self, player: PlayerColor) -> VictoryPoints {
        let award = |holder: Option<PlayerColor>| {
            if holder == Some(player) {
                AWARD_POINTS
            } else {
                0
            }
        };

        VictoryPoints {
            settlements: self.settlements_of(player).len() as u32,
            cities: self.cities_of(player).len() as u32 * 2,
            largest_army: award(self.largest_army_holder()),
            longest_road: award(self.longest_road_holder()),
            development_cards: self.development_card_count(player, DevelopmentCard::VictoryPoint),
        }
    }

    /// Victory points of every seated player, in seating order
    pub fn scoreboard(&self) -> Vec<(PlayerColor, VictoryPoints)> {
        self.players()
            .map(|p| (p.color, self.victory_points(p.color)))
            .collect()
    }
}

/// Longest trail from `slot` that never reuses a street
fn walk(network: &HashMap<SlotId, Vec<StreetKey>>, slot: SlotId, used: &mut HashSet<StreetKey>) -> u32 {
    let mut best = 0;
    for road in network.get(&slot).into_iter().flatten() {
        if used.insert(*road) {
            best = best.max(1 + walk(network, road.other(slot), used));
            used.remove(road);
        }
    }
    best
}

/// Player with the highest value, if it reaches `minimum` and nobody ties it
fn unique_leader(values: &[(PlayerColor, u32)], minimum: u32) -> Option<PlayerColor> {
    let best = values.iter().map(|(_, value)| *value).max()?;
    if best < minimum {
        return None;
    }
    let mut leaders = values.iter().filter(|(_, value)| *value == best);
    match (leaders.next(), leaders.next()) {
        (Some((player, _)), None) => Some(*player),
        _ => None,
    }
}
