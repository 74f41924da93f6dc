use std::fmt;

use crate::core::Chips;

/// A player-facing betting action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    Fold,
    Check,
    Call,
    /// Raise to the given street total, not the increment.
    Raise(Chips),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Fold => write!(f, "fold"),
            Action::Check => write!(f, "check"),
            Action::Call => write!(f, "call"),
            Action::Raise(bet) => write!(f, "raise to {bet}"),
        }
    }
}
