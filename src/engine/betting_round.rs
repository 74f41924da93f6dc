use crate::core::{ChipRange, Chips, Player, SeatSet};

use super::errors::BetError;
use super::round::{Round, TurnAction};

/// The chip-level shape of a turn, one layer below the table's
/// fold/check/call/raise vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BetAction {
    /// Fold or forced departure. No chip movement.
    Leave,
    /// Check or call: commit `min(biggest_bet, total_chips)`.
    Match,
    /// Raise to the given street total.
    Raise(Chips),
}

/// Result of a legality query: whether the seat to act may raise, and the
/// inclusive range of legal raise totals when it may.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionRange {
    pub can_raise: bool,
    pub chip_range: ChipRange,
}

/// A [`Round`] with chip semantics: tracks the biggest bet and the minimum
/// raise increment, computes legal actions, and validates raises.
///
/// Holds no player state of its own; callers pass the seat array as a
/// short-lived view on every query and mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BettingRound {
    round: Round,
    biggest_bet: Chips,
    min_raise: Chips,
}

impl BettingRound {
    pub fn new(
        active: SeatSet,
        num_seats: usize,
        first_to_act: usize,
        min_raise: Chips,
        biggest_bet: Chips,
    ) -> Self {
        BettingRound {
            round: Round::new(active, num_seats, first_to_act),
            biggest_bet,
            min_raise,
        }
    }

    /// Whether any further action is possible.
    ///
    /// Beyond the raw turn-order check this applies a multiway-safe early
    /// termination: if every seat between the player to act and the lap
    /// boundary is either out of the round or all-in with the biggest bet
    /// fully matched, betting must stop even though the lap has not formally
    /// closed.
    pub fn in_progress(&self, players: &[Option<Player>]) -> bool {
        if !self.round.in_progress() {
            return false;
        }
        let active = self.round.active_seats();
        let end = self.round.last_aggressive_actor();
        let mut idx = self.round.player_to_act();
        loop {
            if active.get(idx) {
                if let Some(player) = &players[idx] {
                    let can_act = player.stack() > 0
                        && (player.bet_size() < self.biggest_bet
                            || player.total_chips() > self.biggest_bet);
                    if can_act {
                        return true;
                    }
                }
            }
            idx = (idx + 1) % players.len();
            if idx == end {
                break;
            }
        }
        false
    }

    pub fn player_to_act(&self) -> usize {
        self.round.player_to_act()
    }

    pub fn biggest_bet(&self) -> Chips {
        self.biggest_bet
    }

    pub fn min_raise(&self) -> Chips {
        self.min_raise
    }

    pub fn active_seats(&self) -> SeatSet {
        self.round.active_seats()
    }

    pub fn num_active_players(&self) -> usize {
        self.round.num_active_players()
    }

    /// Legal actions for the seat to act. Raising requires chips beyond the
    /// biggest bet and at least one other active seat that could respond.
    pub fn legal_actions(&self, players: &[Option<Player>]) -> ActionRange {
        let seat = self.round.player_to_act();
        let player = players[seat]
            .as_ref()
            .expect("player to act must be seated");
        let total = player.total_chips();

        let others_can_respond = self
            .round
            .active_seats()
            .ones()
            .filter(|idx| *idx != seat)
            .any(|idx| players[idx].map_or(false, |p| p.stack() > 0));

        let can_raise = others_can_respond && total > self.biggest_bet;
        if can_raise {
            // Saturating: a huge reraise can push the formal minimum past
            // the chip type's range, and the bound is clamped to `total`
            // anyway.
            let min_bet = self.biggest_bet.saturating_add(self.min_raise).min(total);
            ActionRange {
                can_raise,
                chip_range: ChipRange::new(min_bet, total),
            }
        } else {
            ActionRange {
                can_raise,
                chip_range: ChipRange::new(0, 0),
            }
        }
    }

    /// Apply the seat-to-act's action, moving chips and advancing the turn.
    pub fn action_taken(
        &mut self,
        players: &mut [Option<Player>],
        action: BetAction,
    ) -> Result<(), BetError> {
        let seat = self.round.player_to_act();
        match action {
            BetAction::Raise(bet) => {
                self.validate_raise(players, bet)?;
                let player = players[seat]
                    .as_mut()
                    .expect("player to act must be seated");
                player.bet(bet);
                self.min_raise = bet - self.biggest_bet;
                self.biggest_bet = bet;
                let emptied = player.stack() == 0;
                self.round.action_taken(TurnAction::Aggressive, emptied);
            }
            BetAction::Match => {
                let player = players[seat]
                    .as_mut()
                    .expect("player to act must be seated");
                player.bet(self.biggest_bet.min(player.total_chips()));
                let emptied = player.stack() == 0;
                self.round.action_taken(TurnAction::Passive, emptied);
            }
            BetAction::Leave => {
                self.round.action_taken(TurnAction::Leave, false);
            }
        }
        Ok(())
    }

    /// A raise total is valid when it lies in `[biggest_bet + min_raise,
    /// total_chips]`, with one exception: a seat that can beat the biggest
    /// bet but cannot reach the formal minimum may raise all-in for exactly
    /// its total chips.
    fn validate_raise(&self, players: &[Option<Player>], bet: Chips) -> Result<(), BetError> {
        if !self.legal_actions(players).can_raise {
            return Err(BetError::CannotRaise);
        }
        let seat = self.round.player_to_act();
        let player = players[seat]
            .as_ref()
            .expect("player to act must be seated");
        let chips = player.total_chips();
        // Saturating for the same reason as in legal_actions; a saturated
        // minimum above the player's chips falls into the all-in branch.
        let min_bet = self.biggest_bet.saturating_add(self.min_raise);

        if chips > self.biggest_bet && chips < min_bet {
            if bet == chips {
                Ok(())
            } else {
                Err(BetError::ShortRaiseMustBeAllIn { bet, total: chips })
            }
        } else if bet < min_bet {
            Err(BetError::RaiseSizeTooSmall { bet, min_bet })
        } else if bet > chips {
            Err(BetError::RaiseSizeTooLarge { bet, total: chips })
        } else {
            Ok(())
        }
    }
}
