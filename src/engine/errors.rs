use thiserror::Error;

use crate::core::Chips;

/// Errors from invalid chip-level actions in a betting round.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BetError {
    #[error("raising is not possible for the player to act")]
    CannotRaise,
    #[error("raise to {bet} is below the minimum of {min_bet}")]
    RaiseSizeTooSmall { bet: Chips, min_bet: Chips },
    #[error("raise to {bet} exceeds the player's {total} total chips")]
    RaiseSizeTooLarge { bet: Chips, total: Chips },
    #[error("a short raise must be all-in for exactly {total}, not {bet}")]
    ShortRaiseMustBeAllIn { bet: Chips, total: Chips },
}

/// Errors from table-level operations called out of turn, out of phase, or
/// with bad arguments.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    #[error("seat {seat} is out of range for a table with {num_seats} seats")]
    SeatOutOfRange { seat: usize, num_seats: usize },
    #[error("seat {0} is already occupied")]
    SeatOccupied(usize),
    #[error("buy-in must be greater than zero")]
    InvalidBuyIn,
    #[error("a hand is already in progress")]
    HandInProgress,
    #[error("no hand is in progress")]
    NoHandInProgress,
    #[error("at least two players with chips are needed to start a hand")]
    NotEnoughPlayers,
    #[error("seat {0} cannot take the button: not an eligible participant")]
    InvalidButton(usize),
    #[error("no betting round is in progress")]
    NoBettingRound,
    #[error("the betting round is still in progress")]
    BettingRoundInProgress,
    #[error("betting has already been completed")]
    BettingAlreadyCompleted,
    #[error("betting has not been completed yet")]
    BettingNotCompleted,
    #[error("cannot check while owing {owed} to match the bet")]
    IllegalCheck { owed: Chips },
    #[error("automatic action is not currently legal for seat {seat}")]
    IllegalAutomaticAction { seat: usize },
    #[error("seat {0} is the player to act and must act directly")]
    SeatIsToAct(usize),
    #[error("the deck ran out of cards")]
    DeckExhausted,
    #[error(transparent)]
    Bet(#[from] BetError),
}

/// Errors from building a [`Table`](crate::engine::table::Table) with an
/// invalid configuration.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableBuilderError {
    #[error("forced bets are required")]
    MissingForcedBets,
    #[error("a deck is required")]
    MissingDeck,
    #[error("a hand evaluator is required")]
    MissingEvaluator,
    #[error("seat count {actual} is outside the supported range")]
    InvalidSeatCount { actual: usize },
    #[error("blinds {small}/{big} are invalid: need 0 < small <= big")]
    InvalidBlinds { small: Chips, big: Chips },
}
