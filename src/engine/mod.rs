//! The table engine: turn order, betting rounds, pots, the per-hand dealer,
//! and the table that ties them together.

pub mod action;
pub mod betting_round;
pub mod dealer;
pub mod errors;
pub mod pot;
pub mod round;
pub mod table;

pub use action::Action;
pub use betting_round::{ActionRange, BetAction, BettingRound};
pub use dealer::{Dealer, LegalActions, Street};
pub use errors::{BetError, TableBuilderError, TableError};
pub use pot::{build_pots, Pot};
pub use round::{Round, TurnAction};
pub use table::{AutomaticAction, AutomaticActionSet, ForcedBets, Table, TableBuilder};
