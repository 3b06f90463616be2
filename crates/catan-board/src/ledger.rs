//! Resource ledger: player hands, trades and dice production.

use crate::board::{Board, PortKind, Resource};
use crate::error::BoardError;
use crate::player::{PlayerColor, ResourceHand};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Cards given to the bank for one card when no port helps
pub const BANK_RATE: u32 = 4;

impl Board {
    // ==================== Credit / Debit ====================

    /// Credit one resource card to a player
    pub fn give_resource(&mut self, player: PlayerColor, resource: Resource) -> Result<(), BoardError> {
        self.give_resources(player, resource, 1)
    }

    /// Credit several cards of one resource to a player
    pub fn give_resources(
        &mut self,
        player: PlayerColor,
        resource: Resource,
        amount: u32,
    ) -> Result<(), BoardError> {
        self.player_state_mut(player)?.resources.add(resource, amount);
        Ok(())
    }

    /// Non-raising form of `give_resource`
    pub fn try_give_resource(&mut self, player: PlayerColor, resource: Resource) -> bool {
        self.try_give_resources(player, resource, 1)
    }

    /// Non-raising form of `give_resources`
    pub fn try_give_resources(&mut self, player: PlayerColor, resource: Resource, amount: u32) -> bool {
        match self.give_resources(player, resource, amount) {
            Ok(()) => true,
            Err(err) => {
                debug!(%player, %resource, amount, error = %err, "Resources not given");
                false
            }
        }
    }

    /// Debit one resource card from a player
    pub fn take_resource(&mut self, player: PlayerColor, resource: Resource) -> Result<(), BoardError> {
        let state = self.player_state_mut(player)?;
        if state.resources.remove(resource, 1) {
            Ok(())
        } else {
            Err(BoardError::ResourceUnavailable { player, resource })
        }
    }

    /// Non-raising form of `take_resource`
    pub fn try_take_resource(&mut self, player: PlayerColor, resource: Resource) -> bool {
        match self.take_resource(player, resource) {
            Ok(()) => true,
            Err(err) => {
                debug!(%player, error = %err, "Resource not taken");
                false
            }
        }
    }

    // ==================== Hand Queries ====================

    /// Every card the player holds, grouped by resource
    pub fn resources(&self, player: PlayerColor) -> Result<Vec<Resource>, BoardError> {
        Ok(self.player_state(player)?.resources.to_cards())
    }

    /// Per-resource counts of the player's hand
    pub fn resource_counts(&self, player: PlayerColor) -> Result<ResourceHand, BoardError> {
        Ok(self.player_state(player)?.resources)
    }

    /// Resource to count mapping, leaving out resources the player does not hold
    pub fn resource_map(&self, player: PlayerColor) -> Result<HashMap<Resource, u32>, BoardError> {
        Ok(self.player_state(player)?.resources.to_map())
    }

    // ==================== Ports ====================

    /// Kinds of the ports a player has a building on
    pub fn ports_of(&self, player: PlayerColor) -> Vec<PortKind> {
        self.ports()
            .iter()
            .filter(|port| {
                port.slots
                    .iter()
                    .any(|slot| self.slot_owner(*slot) == Some(player))
            })
            .map(|port| port.kind)
            .collect()
    }

    /// Best rate the player gets when giving this resource: 2, 3 or 4
    pub fn trade_ratio(&self, player: PlayerColor, resource: Resource) -> u32 {
        let ports = self.ports_of(player);
        if ports.contains(&PortKind::Specific(resource)) {
            PortKind::Specific(resource).rate()
        } else if ports.contains(&PortKind::Any) {
            PortKind::Any.rate()
        } else {
            BANK_RATE
        }
    }

    // ==================== Trades ====================

    /// Give 4 cards of one resource to the bank for 1 card of another
    pub fn trade_with_bank(
        &mut self,
        player: PlayerColor,
        give: Resource,
        receive: Resource,
    ) -> Result<(), BoardError> {
        self.trade_at_rate(player, give, receive, BANK_RATE, None)
    }

    pub fn try_trade_with_bank(&mut self, player: PlayerColor, give: Resource, receive: Resource) -> bool {
        let result = self.trade_with_bank(player, give, receive);
        report_trade(player, result)
    }

    /// 3:1 trade, requires a building on an any-port
    pub fn trade_with_any_port(
        &mut self,
        player: PlayerColor,
        give: Resource,
        receive: Resource,
    ) -> Result<(), BoardError> {
        let port = PortKind::Any;
        self.trade_at_rate(player, give, receive, port.rate(), Some(port))
    }

    pub fn try_trade_with_any_port(&mut self, player: PlayerColor, give: Resource, receive: Resource) -> bool {
        let result = self.trade_with_any_port(player, give, receive);
        report_trade(player, result)
    }

    /// 2:1 trade, requires a building on the port for the given resource
    pub fn trade_with_resource_port(
        &mut self,
        player: PlayerColor,
        give: Resource,
        receive: Resource,
    ) -> Result<(), BoardError> {
        let port = PortKind::Specific(give);
        self.trade_at_rate(player, give, receive, port.rate(), Some(port))
    }

    pub fn try_trade_with_resource_port(
        &mut self,
        player: PlayerColor,
        give: Resource,
        receive: Resource,
    ) -> bool {
        let result = self.trade_with_resource_port(player, give, receive);
        report_trade(player, result)
    }

    /// Trade through the best port the player controls for `give`.
    ///
    /// Returns the rate used. Fails with `PortNotClaimed` when the player
    /// controls no port at all.
    pub fn trade_with_best_port(
        &mut self,
        player: PlayerColor,
        give: Resource,
        receive: Resource,
    ) -> Result<u32, BoardError> {
        let port = if self.ports_of(player).contains(&PortKind::Specific(give)) {
            PortKind::Specific(give)
        } else {
            PortKind::Any
        };
        self.trade_at_rate(player, give, receive, port.rate(), Some(port))?;
        Ok(port.rate())
    }

    /// Non-raising form of `trade_with_best_port`, returning the rate used
    pub fn try_trade_with_best_port(
        &mut self,
        player: PlayerColor,
        give: Resource,
        receive: Resource,
    ) -> Option<u32> {
        match self.trade_with_best_port(player, give, receive) {
            Ok(rate) => Some(rate),
            Err(err) => {
                debug!(%player, error = %err, "Trade rejected");
                None
            }
        }
    }

    fn trade_at_rate(
        &mut self,
        player: PlayerColor,
        give: Resource,
        receive: Resource,
        rate: u32,
        port: Option<PortKind>,
    ) -> Result<(), BoardError> {
        let price = ResourceHand::single(give, rate);
        let hand = self.player_state(player)?.resources;
        if !hand.can_afford(&price) {
            return Err(BoardError::InsufficientResources {
                player,
                needed: hand.shortfall(&price),
            });
        }
        if let Some(port) = port {
            if !self.ports_of(player).contains(&port) {
                return Err(BoardError::PortNotClaimed { player, port });
            }
        }

        let resources = &mut self.player_state_mut(player)?.resources;
        resources.subtract(&price);
        resources.add(receive, 1);
        debug!(%player, %give, %receive, rate, "Traded with bank");
        Ok(())
    }

    /// Swap cards between two players, all or nothing
    pub fn trade_with_player(
        &mut self,
        player: PlayerColor,
        offer: ResourceHand,
        partner: PlayerColor,
        request: ResourceHand,
    ) -> Result<(), BoardError> {
        let own = self.player_state(player)?.resources;
        let theirs = self.player_state(partner)?.resources;
        if !own.can_afford(&offer) {
            return Err(BoardError::InsufficientResources {
                player,
                needed: own.shortfall(&offer),
            });
        }
        if !theirs.can_afford(&request) {
            return Err(BoardError::InsufficientResources {
                player: partner,
                needed: theirs.shortfall(&request),
            });
        }

        {
            let resources = &mut self.player_state_mut(player)?.resources;
            resources.subtract(&offer);
            resources.add_hand(&request);
        }
        {
            let resources = &mut self.player_state_mut(partner)?.resources;
            resources.subtract(&request);
            resources.add_hand(&offer);
        }

        debug!(%player, %partner, %offer, %request, "Players traded");
        Ok(())
    }

    pub fn try_trade_with_player(
        &mut self,
        player: PlayerColor,
        offer: ResourceHand,
        partner: PlayerColor,
        request: ResourceHand,
    ) -> bool {
        let result = self.trade_with_player(player, offer, partner, request);
        report_trade(player, result)
    }

    // ==================== Production ====================

    /// Hand out resources for a dice roll.
    ///
    /// Every tile carrying `value` pays each building on its corners: one card
    /// per settlement, two per city. Returns what was paid, per player and
    /// resource.
    pub fn distribute_roll(&mut self, value: u8) -> Vec<(PlayerColor, Resource, u32)> {
        let mut payout: BTreeMap<(PlayerColor, Resource), u32> = BTreeMap::new();

        for tile in self.tiles().filter(|tile| tile.dice == Some(value)) {
            let Some(resource) = tile.resource() else {
                continue;
            };
            for slot in tile.slots.iter().filter_map(|id| self.slot(*id)) {
                if let Some(owner) = slot.structure.owner() {
                    *payout.entry((owner, resource)).or_insert(0) += slot.structure.resource_multiplier();
                }
            }
        }

        let mut paid = Vec::with_capacity(payout.len());
        for ((player, resource), amount) in payout {
            match self.give_resources(player, resource, amount) {
                Ok(()) => paid.push((player, resource, amount)),
                Err(err) => debug!(%player, %resource, amount, error = %err, "Production not paid"),
            }
        }

        debug!(value, payouts = paid.len(), "Distributed resources");
        paid
    }
}

fn report_trade(player: PlayerColor, result: Result<(), BoardError>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            debug!(%player, error = %err, "Trade rejected");
            false
        }
    }
}
