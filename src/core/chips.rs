/// Chip amounts. All arithmetic is in exact integer units; there is no
/// fractional chip anywhere in the engine.
pub type Chips = u32;

/// An inclusive `[min, max]` bound on a bet total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChipRange {
    pub min: Chips,
    pub max: Chips,
}

impl ChipRange {
    pub fn new(min: Chips, max: Chips) -> Self {
        ChipRange { min, max }
    }

    pub fn contains(&self, amount: Chips) -> bool {
        self.min <= amount && amount <= self.max
    }
}
