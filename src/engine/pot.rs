use crate::core::{Chips, SeatSet};

/// A main or side pot: a chip amount and the seats still contesting it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pot {
    size: Chips,
    eligible: Vec<usize>,
}

impl Pot {
    pub fn size(&self) -> Chips {
        self.size
    }

    /// Seats eligible to win this pot, in ascending seat order.
    pub fn eligible_players(&self) -> &[usize] {
        &self.eligible
    }
}

/// Split per-seat contributions into main and side pots.
///
/// Each distinct contribution level forms a tier funded by every seat that
/// contributed at least that much. A folded seat funds tiers but is never
/// eligible to win them. Adjacent tiers with identical eligible sets collapse
/// into a single pot, so an uncontested overbet folds back into the pot below
/// it rather than forming a pot of its own. If every contributor has folded
/// (mid-hand departures can empty a pot this way) the pot survives with an
/// empty eligible set and nobody can claim it.
pub fn build_pots(contributions: &[Chips], folded: SeatSet) -> Vec<Pot> {
    let mut levels: Vec<Chips> = contributions.iter().copied().filter(|c| *c > 0).collect();
    levels.sort_unstable();
    levels.dedup();

    let mut pots: Vec<Pot> = Vec::new();
    let mut prev_level: Chips = 0;
    for level in levels {
        let funders = contributions.iter().filter(|c| **c >= level).count() as Chips;
        let size = (level - prev_level) * funders;
        prev_level = level;

        let eligible: Vec<usize> = contributions
            .iter()
            .enumerate()
            .filter(|(seat, c)| **c >= level && !folded.get(*seat))
            .map(|(seat, _)| seat)
            .collect();

        let merged = match pots.last_mut() {
            Some(last) if last.eligible == eligible || eligible.is_empty() => {
                last.size += size;
                true
            }
            _ => false,
        };
        if !merged {
            pots.push(Pot { size, eligible });
        }
    }

    if pots.is_empty() {
        pots.push(Pot {
            size: 0,
            eligible: (0..contributions.len())
                .filter(|seat| !folded.get(*seat))
                .collect(),
        });
    }
    pots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(pots: &[Pot]) -> Chips {
        pots.iter().map(|p| p.size()).sum()
    }

    #[test]
    fn test_equal_contributions_make_one_pot() {
        let contributions = [100, 100, 100];
        let pots = build_pots(&contributions, SeatSet::default());
        assert_eq!(pots.len(), 1);
        assert_eq!(pots[0].size(), 300);
        assert_eq!(pots[0].eligible_players(), &[0, 1, 2]);
    }

    #[test]
    fn test_short_all_in_creates_side_pot() {
        let contributions = [100, 40, 100];
        let pots = build_pots(&contributions, SeatSet::default());
        assert_eq!(pots.len(), 2);
        assert_eq!(pots[0].size(), 120);
        assert_eq!(pots[0].eligible_players(), &[0, 1, 2]);
        assert_eq!(pots[1].size(), 120);
        assert_eq!(pots[1].eligible_players(), &[0, 2]);
        assert_eq!(total(&pots), 240);
    }

    #[test]
    fn test_folded_seat_funds_but_is_never_eligible() {
        let mut folded = SeatSet::default();
        folded.enable(1);
        let contributions = [100, 60, 100];
        let pots = build_pots(&contributions, folded);
        assert_eq!(pots.len(), 1);
        assert_eq!(pots[0].size(), 260);
        assert_eq!(pots[0].eligible_players(), &[0, 2]);
    }

    #[test]
    fn test_uncontested_overbet_merges_down() {
        // Seat 0 contributed more than anyone can contest. The surplus stays
        // in the pot seat 0 alone is eligible for rather than splitting off.
        let contributions = [500, 200, 200];
        let pots = build_pots(&contributions, SeatSet::default());
        assert_eq!(pots.len(), 2);
        assert_eq!(pots[0].size(), 600);
        assert_eq!(pots[1].size(), 300);
        assert_eq!(pots[1].eligible_players(), &[0]);
        assert_eq!(total(&pots), 900);
    }

    #[test]
    fn test_three_way_ladder() {
        let contributions = [100, 1000, 1000, 0];
        let pots = build_pots(&contributions, SeatSet::default());
        assert_eq!(pots.len(), 2);
        assert_eq!(pots[0].size(), 300);
        assert_eq!(pots[0].eligible_players(), &[0, 1, 2]);
        assert_eq!(pots[1].size(), 1800);
        assert_eq!(pots[1].eligible_players(), &[1, 2]);
        assert_eq!(total(&pots), 2100);
    }

    #[test]
    fn test_all_contributors_folded_keeps_pot_with_no_eligible() {
        let mut folded = SeatSet::default();
        folded.enable(0);
        folded.enable(1);
        let pots = build_pots(&[500, 500], folded);
        assert_eq!(pots.len(), 1);
        assert_eq!(pots[0].size(), 1000);
        assert!(pots[0].eligible_players().is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_pots_round_trip_through_json() {
        let pots = build_pots(&[100, 40, 100], SeatSet::default());
        let json = serde_json::to_string(&pots).unwrap();
        let back: Vec<Pot> = serde_json::from_str(&json).unwrap();
        assert_eq!(pots, back);
    }

    #[test]
    fn test_no_contributions_yields_single_empty_pot() {
        let contributions = [0, 0, 0];
        let pots = build_pots(&contributions, SeatSet::default());
        assert_eq!(pots.len(), 1);
        assert_eq!(pots[0].size(), 0);
        assert_eq!(pots[0].eligible_players(), &[0, 1, 2]);
    }
}
