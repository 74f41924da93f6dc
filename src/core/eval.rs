use super::cards::Card;

/// A comparable hand strength. Greater is better; equal ranks split the pot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandRank(pub u64);

/// Ranks the best five-card hand makeable from a seat's hole cards plus the
/// community cards.
///
/// The trait is object safe so a table can hold a `Box<dyn HandEvaluator>`;
/// implementations map card combinations onto the totally ordered
/// [`HandRank`] space however they see fit.
pub trait HandEvaluator {
    fn evaluate(&self, hole: &[Card; 2], community: &[Card]) -> HandRank;
}
