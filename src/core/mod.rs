//! Leaf value types and the collaborator traits the engine is built on.

pub mod cards;
pub mod chips;
pub mod eval;
pub mod player;
pub mod seat_set;

pub use cards::{Card, Deck};
pub use chips::{ChipRange, Chips};
pub use eval::{HandEvaluator, HandRank};
pub use player::Player;
pub use seat_set::{SeatSet, MAX_SEATS};
