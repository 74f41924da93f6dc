use crate::core::SeatSet;

/// What a seat did on its turn, from the round's point of view.
///
/// An all-in is not a separate kind of action here: the caller passes the
/// underlying aggression (or passivity) together with the independent
/// `emptied_stack` flag, and the round removes emptied seats the same way it
/// removes leavers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnAction {
    /// A bet or raise. Starts a new lap: everyone else must act again.
    Aggressive,
    /// A check or call.
    Passive,
    /// A fold or forced departure. No new lap.
    Leave,
}

/// Pure turn-order and liveness bookkeeping over a fixed seat layout.
///
/// Knows nothing about chips. A betting lap closes when the turn cycles back
/// to the last aggressive actor without a new aggressive action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    active: SeatSet,
    num_seats: usize,
    player_to_act: usize,
    last_aggressive_actor: usize,
    /// True once anyone has checked, called, bet, or raised. Keeps the round
    /// alive for a lone remaining actor who still owes a decision (facing an
    /// all-in), while a round emptied purely by folds ends at once.
    contested: bool,
    first_action: bool,
}

impl Round {
    pub fn new(active: SeatSet, num_seats: usize, first_to_act: usize) -> Self {
        debug_assert!(first_to_act < num_seats, "seat index must be in range");
        debug_assert!(active.get(first_to_act), "first player to act must be active");
        Round {
            active,
            num_seats,
            player_to_act: first_to_act,
            last_aggressive_actor: first_to_act,
            contested: false,
            first_action: true,
        }
    }

    pub fn in_progress(&self) -> bool {
        (self.contested || self.active.count() > 1)
            && (self.first_action || self.player_to_act != self.last_aggressive_actor)
    }

    pub fn active_seats(&self) -> SeatSet {
        self.active
    }

    pub fn num_active_players(&self) -> usize {
        self.active.count()
    }

    pub fn player_to_act(&self) -> usize {
        self.player_to_act
    }

    pub fn last_aggressive_actor(&self) -> usize {
        self.last_aggressive_actor
    }

    pub fn num_seats(&self) -> usize {
        self.num_seats
    }

    /// Record the current seat's action and advance the turn.
    pub fn action_taken(&mut self, action: TurnAction, emptied_stack: bool) {
        debug_assert!(self.in_progress());
        self.first_action = false;
        match action {
            TurnAction::Aggressive => {
                self.last_aggressive_actor = self.player_to_act;
                self.contested = true;
            }
            TurnAction::Passive => self.contested = true,
            TurnAction::Leave => {}
        }
        if matches!(action, TurnAction::Leave) || emptied_stack {
            self.active.disable(self.player_to_act);
        }
        self.advance_player();
    }

    /// Move to the next active seat in index order, wrapping. Stops on the
    /// lap boundary even when that seat is no longer active, so the closing
    /// condition stays detectable after the aggressor goes all-in.
    fn advance_player(&mut self) {
        loop {
            self.player_to_act = (self.player_to_act + 1) % self.num_seats;
            if self.player_to_act == self.last_aggressive_actor
                || self.active.get(self.player_to_act)
            {
                break;
            }
        }
    }
}
