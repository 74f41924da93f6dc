use super::chips::Chips;

/// A seated player's chip state.
///
/// `stack` is what has not yet been committed this street, `bet_size` is what
/// has. Their sum, [`Player::total_chips`], is constant for the duration of a
/// street; it only changes when bets are settled into the pot or winnings are
/// paid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Player {
    stack: Chips,
    bet_size: Chips,
}

impl Player {
    pub fn new(stack: Chips) -> Self {
        Player { stack, bet_size: 0 }
    }

    pub fn stack(&self) -> Chips {
        self.stack
    }

    /// Chips committed this street.
    pub fn bet_size(&self) -> Chips {
        self.bet_size
    }

    pub fn total_chips(&self) -> Chips {
        self.stack + self.bet_size
    }

    /// Set this street's committed total to `total`, moving the difference
    /// out of the stack. Capped at `total_chips`; never takes chips back.
    pub(crate) fn bet(&mut self, total: Chips) {
        let total = total.min(self.total_chips());
        debug_assert!(total >= self.bet_size, "a bet can never shrink");
        self.stack -= total - self.bet_size;
        self.bet_size = total;
    }

    /// Take chips straight from the stack (forced antes). Returns the amount
    /// actually taken, capped at the stack.
    pub(crate) fn post(&mut self, amount: Chips) -> Chips {
        let taken = amount.min(self.stack);
        self.stack -= taken;
        taken
    }

    /// Settle the street: zero out `bet_size` and return it.
    pub(crate) fn take_bet(&mut self) -> Chips {
        std::mem::take(&mut self.bet_size)
    }

    pub(crate) fn add_chips(&mut self, amount: Chips) {
        self.stack += amount;
    }
}
