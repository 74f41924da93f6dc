use std::fmt;

/// An opaque card identity.
///
/// The engine never looks inside a card; it only moves cards from the deck
/// into hole-card and community-card slots. How the 52 indices map onto ranks
/// and suits is the deck implementation's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Card(pub u8);

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Source of cards for a single hand.
///
/// The table shuffles once per hand and then deals hole cards and community
/// cards in order. A conforming deck holds enough cards for a full ring
/// (two per seat plus five community cards).
pub trait Deck {
    /// Prepare a fresh, full deck for a new hand.
    fn shuffle(&mut self);

    /// Deal the next card, or `None` if the deck is exhausted.
    fn deal(&mut self) -> Option<Card>;
}
