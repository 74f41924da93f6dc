//! A multi-seat no-limit Texas hold'em table engine.
//!
//! The crate drives the mechanics of a poker table: seating, blinds and
//! antes, turn order, betting legality, side pots, and settlement. It does
//! not evaluate poker hands or represent card identities itself; callers
//! plug in a [`Deck`] and a [`HandEvaluator`] and the engine moves opaque
//! [`Card`]s and exact integer [`Chips`] around between them.
//!
//! The main entry point is [`Table`]. A typical hand:
//!
//! ```
//! use holdem_table::{Action, ForcedBets, Table};
//! use holdem_table::testutil::{HighCardEvaluator, ShuffledDeck};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut table = Table::builder()
//!     .num_seats(6)
//!     .forced_bets(ForcedBets::blinds(25, 50))
//!     .deck(Box::new(ShuffledDeck::from_seed(7)))
//!     .evaluator(Box::new(HighCardEvaluator))
//!     .build()?;
//!
//! table.sit_down(0, 1000)?;
//! table.sit_down(1, 1000)?;
//! table.sit_down(2, 1000)?;
//!
//! table.start_hand(None)?;
//! table.action_taken(Action::Fold)?;
//! table.action_taken(Action::Fold)?;
//! table.end_betting_round()?;
//! table.showdown()?;
//!
//! // The big blind picked up the small blind uncontested.
//! assert_eq!(table.winners().len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! Betting rounds are closed explicitly with
//! [`Table::end_betting_round`] once no action is pending, and the hand is
//! settled with [`Table::showdown`] once betting is complete. This keeps
//! the caller in control of pacing (and of revealing cards) between
//! streets.

pub mod core;
pub mod engine;
pub mod testutil;

pub use crate::core::{Card, ChipRange, Chips, Deck, HandEvaluator, HandRank, Player, SeatSet};
pub use crate::engine::{
    Action, AutomaticAction, AutomaticActionSet, BetError, ForcedBets, LegalActions, Pot, Street,
    Table, TableBuilder, TableBuilderError, TableError,
};
