use std::fmt;

use tracing::{debug, trace};

use crate::core::{Card, ChipRange, Chips, Deck, HandEvaluator, Player, SeatSet};

use super::action::Action;
use super::betting_round::{BetAction, BettingRound};
use super::errors::TableError;
use super::pot::{build_pots, Pot};
use super::table::ForcedBets;

/// The streets of a hand, in play order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
}

impl Street {
    pub fn next(self) -> Option<Street> {
        match self {
            Street::Preflop => Some(Street::Flop),
            Street::Flop => Some(Street::Turn),
            Street::Turn => Some(Street::River),
            Street::River => None,
        }
    }

    /// How many community cards are on the board once this street is dealt.
    fn community_target(self) -> usize {
        match self {
            Street::Preflop => 0,
            Street::Flop => 3,
            Street::Turn => 4,
            Street::River => 5,
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Street::Preflop => write!(f, "preflop"),
            Street::Flop => write!(f, "flop"),
            Street::Turn => write!(f, "turn"),
            Street::River => write!(f, "river"),
        }
    }
}

/// What the player to act may legally do right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegalActions {
    pub can_check: bool,
    pub can_raise: bool,
    /// Inclusive bounds on a raise total. Only meaningful when `can_raise`.
    pub raise_range: ChipRange,
}

/// Runs a single hand: posts forced bets, deals cards, threads the betting
/// rounds street by street, and settles the pots at showdown.
///
/// The dealer owns no players. The table passes its per-hand seat copy into
/// every call, so the dealer's own state is only cards, contributions, and
/// round bookkeeping.
pub struct Dealer {
    participants: SeatSet,
    num_seats: usize,
    button: usize,
    big_blind: Chips,
    street: Street,
    betting_round: Option<BettingRound>,
    community_cards: Vec<Card>,
    hole_cards: Vec<Option<[Card; 2]>>,
    /// Chips settled out of bets (and antes) per seat, across all streets.
    contributions: Vec<Chips>,
    folded: SeatSet,
    betting_completed: bool,
    winners: Vec<Vec<(usize, Chips)>>,
}

impl Dealer {
    /// Start a hand: post antes and blinds, deal hole cards, and open the
    /// preflop betting round.
    ///
    /// Every `Some` seat in `players` is a participant. Heads-up the button
    /// posts the small blind and acts first; otherwise the blinds sit on the
    /// two seats after the button and action starts one further on.
    pub fn new(
        players: &mut [Option<Player>],
        button: usize,
        forced_bets: ForcedBets,
        deck: &mut dyn Deck,
    ) -> Result<Self, TableError> {
        let num_seats = players.len();
        let mut participants = SeatSet::default();
        for (seat, player) in players.iter().enumerate() {
            if player.is_some() {
                participants.enable(seat);
            }
        }
        debug_assert!(participants.count() >= 2);
        debug_assert!(participants.get(button));

        let mut contributions = vec![0; num_seats];
        if forced_bets.ante > 0 {
            for seat in participants.ones() {
                let player = players[seat].as_mut().expect("participant is seated");
                contributions[seat] += player.post(forced_bets.ante);
            }
        }

        let (sb_seat, bb_seat, first_to_act) = if participants.count() == 2 {
            let other = participants
                .next_after(button, num_seats)
                .expect("two participants");
            (button, other, button)
        } else {
            let sb = participants
                .next_after(button, num_seats)
                .expect("participants present");
            let bb = participants
                .next_after(sb, num_seats)
                .expect("participants present");
            let first = participants
                .next_after(bb, num_seats)
                .expect("participants present");
            (sb, bb, first)
        };

        players[sb_seat]
            .as_mut()
            .expect("small blind is seated")
            .bet(forced_bets.small_blind);
        players[bb_seat]
            .as_mut()
            .expect("big blind is seated")
            .bet(forced_bets.big_blind);
        debug!(
            button,
            sb_seat,
            bb_seat,
            small_blind = forced_bets.small_blind,
            big_blind = forced_bets.big_blind,
            "posted blinds"
        );

        let mut hole_cards = vec![None; num_seats];
        let mut seat = button;
        for _ in 0..participants.count() {
            seat = participants
                .next_after(seat, num_seats)
                .expect("participants present");
            let first = deck.deal().ok_or(TableError::DeckExhausted)?;
            let second = deck.deal().ok_or(TableError::DeckExhausted)?;
            hole_cards[seat] = Some([first, second]);
        }

        Ok(Dealer {
            participants,
            num_seats,
            button,
            big_blind: forced_bets.big_blind,
            street: Street::Preflop,
            betting_round: Some(BettingRound::new(
                participants,
                num_seats,
                first_to_act,
                forced_bets.big_blind,
                forced_bets.big_blind,
            )),
            community_cards: Vec::with_capacity(5),
            hole_cards,
            contributions,
            folded: SeatSet::default(),
            betting_completed: false,
            winners: Vec::new(),
        })
    }

    pub fn street(&self) -> Street {
        self.street
    }

    pub fn button(&self) -> usize {
        self.button
    }

    pub fn community_cards(&self) -> &[Card] {
        &self.community_cards
    }

    pub fn hole_cards(&self, seat: usize) -> Option<&[Card; 2]> {
        self.hole_cards.get(seat).and_then(|cards| cards.as_ref())
    }

    pub fn is_participant(&self, seat: usize) -> bool {
        self.participants.get(seat)
    }

    pub fn is_folded(&self, seat: usize) -> bool {
        self.folded.get(seat)
    }

    /// Participants who have not folded.
    pub fn contesting_seats(&self) -> SeatSet {
        let mut contesting = self.participants;
        for seat in self.folded.ones() {
            contesting.disable(seat);
        }
        contesting
    }

    pub fn betting_completed(&self) -> bool {
        self.betting_completed
    }

    pub fn biggest_bet(&self) -> Option<Chips> {
        self.betting_round.as_ref().map(|round| round.biggest_bet())
    }

    pub fn num_active_players(&self) -> usize {
        self.betting_round
            .as_ref()
            .map_or(0, |round| round.num_active_players())
    }

    pub fn betting_round_in_progress(&self, players: &[Option<Player>]) -> bool {
        self.betting_round
            .as_ref()
            .map_or(false, |round| round.in_progress(players))
    }

    /// The seat to act, while the betting round is in progress.
    pub fn player_to_act(&self, players: &[Option<Player>]) -> Option<usize> {
        self.betting_round
            .as_ref()
            .filter(|round| round.in_progress(players))
            .map(|round| round.player_to_act())
    }

    pub fn legal_actions(&self, players: &[Option<Player>]) -> Option<LegalActions> {
        let round = self.betting_round.as_ref()?;
        let seat = round.player_to_act();
        let player = players[seat].as_ref()?;
        let range = round.legal_actions(players);
        Some(LegalActions {
            can_check: player.bet_size() == round.biggest_bet(),
            can_raise: range.can_raise,
            raise_range: range.chip_range,
        })
    }

    /// Apply the seat-to-act's action to the current betting round.
    pub fn action_taken(
        &mut self,
        players: &mut [Option<Player>],
        action: Action,
    ) -> Result<(), TableError> {
        let round = self.betting_round.as_mut().ok_or(TableError::NoBettingRound)?;
        let seat = round.player_to_act();
        trace!(seat, %action, street = %self.street, "action taken");
        match action {
            Action::Fold => {
                round.action_taken(players, BetAction::Leave)?;
                self.folded.enable(seat);
            }
            Action::Check => {
                let player = players[seat].as_ref().expect("player to act is seated");
                let owed = round.biggest_bet() - player.bet_size();
                if owed > 0 {
                    return Err(TableError::IllegalCheck { owed });
                }
                round.action_taken(players, BetAction::Match)?;
            }
            Action::Call => {
                round.action_taken(players, BetAction::Match)?;
            }
            Action::Raise(bet) => {
                round.action_taken(players, BetAction::Raise(bet))?;
            }
        }
        Ok(())
    }

    /// Mark a seat folded outside the normal turn flow.
    ///
    /// Used when a seat that cannot act anymore (all-in, or betting already
    /// completed) leaves the table mid-hand. Its contributions stay in the
    /// pots but it can no longer win any of them.
    pub fn fold_out(&mut self, seat: usize) {
        debug_assert!(self.participants.get(seat));
        self.folded.enable(seat);
    }

    /// Close the current betting round: settle bets into the pot
    /// contributions, then either open the next street or finish betting.
    ///
    /// If fewer than two seats remain contesting, or the last street is
    /// done, betting is complete. If at least two contesting seats are
    /// all-in so nobody can act, the remaining community cards are dealt
    /// straight through to the river.
    pub fn end_betting_round(
        &mut self,
        players: &mut [Option<Player>],
        deck: &mut dyn Deck,
    ) -> Result<(), TableError> {
        debug_assert!(self.betting_round.is_some());
        for (seat, player) in players.iter_mut().enumerate() {
            if let Some(player) = player {
                self.contributions[seat] += player.take_bet();
            }
        }
        self.betting_round = None;

        if self.contesting_seats().count() <= 1 {
            self.betting_completed = true;
            debug!(street = %self.street, "betting complete, hand is uncontested");
            return Ok(());
        }

        loop {
            let next = match self.street.next() {
                Some(street) => street,
                None => {
                    self.betting_completed = true;
                    debug!("betting complete after the river");
                    return Ok(());
                }
            };
            self.street = next;
            while self.community_cards.len() < next.community_target() {
                let card = deck.deal().ok_or(TableError::DeckExhausted)?;
                self.community_cards.push(card);
            }
            debug!(street = %next, board = self.community_cards.len(), "dealt street");

            let mut actionable = SeatSet::default();
            for seat in self.contesting_seats().ones() {
                let has_stack = players[seat].map_or(false, |p| p.stack() > 0);
                if has_stack {
                    actionable.enable(seat);
                }
            }
            if actionable.count() >= 2 {
                let first = actionable
                    .next_after(self.button, self.num_seats)
                    .expect("actionable seats present");
                self.betting_round = Some(BettingRound::new(
                    actionable,
                    self.num_seats,
                    first,
                    self.big_blind,
                    0,
                ));
                return Ok(());
            }
        }
    }

    /// The main and side pots, including any bets not yet settled from the
    /// betting round in progress.
    pub fn pots(&self, players: &[Option<Player>]) -> Vec<Pot> {
        let mut totals = self.contributions.clone();
        for (seat, player) in players.iter().enumerate() {
            if let Some(player) = player {
                totals[seat] += player.bet_size();
            }
        }
        build_pots(&totals, self.folded)
    }

    /// Resolve every pot and pay the winners.
    ///
    /// A pot with a single eligible seat is paid without consulting the
    /// evaluator, so hands that end on folds never require a showdown
    /// comparison. Split pots are shared equally; odd remainder chips go to
    /// the winners closest to the button's left. A pot whose every
    /// contributor folded out (all remaining contestants left the table)
    /// has no winner and its chips go unawarded.
    pub fn showdown(
        &mut self,
        players: &mut [Option<Player>],
        evaluator: &dyn HandEvaluator,
    ) -> Result<(), TableError> {
        if !self.betting_completed {
            return Err(TableError::BettingNotCompleted);
        }
        let pots = build_pots(&self.contributions, self.folded);
        for pot in &pots {
            let eligible = pot.eligible_players();
            if pot.size() == 0 || eligible.is_empty() {
                if eligible.is_empty() && pot.size() > 0 {
                    debug!(pot = pot.size(), "pot has no claimants, chips unawarded");
                }
                self.winners.push(Vec::new());
                continue;
            }
            if eligible.len() == 1 {
                let seat = eligible[0];
                players[seat]
                    .as_mut()
                    .expect("eligible player is seated")
                    .add_chips(pot.size());
                debug!(seat, amount = pot.size(), "pot awarded uncontested");
                self.winners.push(vec![(seat, pot.size())]);
                continue;
            }

            let best = eligible
                .iter()
                .map(|seat| {
                    let hole = self.hole_cards[*seat]
                        .as_ref()
                        .expect("eligible player holds cards");
                    evaluator.evaluate(hole, &self.community_cards)
                })
                .max()
                .expect("pot has eligible players");
            let mut winners: Vec<usize> = eligible
                .iter()
                .copied()
                .filter(|seat| {
                    let hole = self.hole_cards[*seat]
                        .as_ref()
                        .expect("eligible player holds cards");
                    evaluator.evaluate(hole, &self.community_cards) == best
                })
                .collect();

            // Odd chips go to the earliest seats clockwise from the button.
            let start = (self.button + 1) % self.num_seats;
            winners.sort_by_key(|seat| (seat + self.num_seats - start) % self.num_seats);

            let share = pot.size() / winners.len() as Chips;
            let remainder = pot.size() % winners.len() as Chips;
            let mut paid = Vec::with_capacity(winners.len());
            for (idx, seat) in winners.into_iter().enumerate() {
                let amount = share + if (idx as Chips) < remainder { 1 } else { 0 };
                players[seat]
                    .as_mut()
                    .expect("winner is seated")
                    .add_chips(amount);
                paid.push((seat, amount));
            }
            debug!(winners = ?paid, pot = pot.size(), "pot split at showdown");
            self.winners.push(paid);
        }
        Ok(())
    }

    /// Per-pot payouts recorded by [`Dealer::showdown`], in pot order.
    pub fn winners(&self) -> &[Vec<(usize, Chips)>] {
        &self.winners
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::testutil::{HighCardEvaluator, StackedDeck};

    struct NoEval;
    impl HandEvaluator for NoEval {
        fn evaluate(&self, _hole: &[Card; 2], _community: &[Card]) -> crate::core::HandRank {
            panic!("evaluator must not be consulted");
        }
    }

    fn seated(stacks: &[Chips]) -> Vec<Option<Player>> {
        stacks.iter().map(|s| Some(Player::new(*s))).collect()
    }

    fn blinds(small: Chips, big: Chips) -> ForcedBets {
        ForcedBets::blinds(small, big)
    }

    #[test]
    fn test_three_handed_blind_posting() {
        let mut players = seated(&[1000, 1000, 1000]);
        let mut deck = StackedDeck::sequential();
        let dealer = Dealer::new(&mut players, 0, blinds(25, 50), &mut deck).unwrap();

        assert_eq!(players[1].unwrap().bet_size(), 25);
        assert_eq!(players[2].unwrap().bet_size(), 50);
        assert_eq!(players[0].unwrap().bet_size(), 0);
        assert_eq!(dealer.player_to_act(&players), Some(0));
        assert_eq!(dealer.street(), Street::Preflop);
    }

    #[test]
    fn test_heads_up_button_posts_small_blind_and_acts_first() {
        let mut players = seated(&[1000, 1000]);
        let mut deck = StackedDeck::sequential();
        let dealer = Dealer::new(&mut players, 0, blinds(25, 50), &mut deck).unwrap();

        assert_eq!(players[0].unwrap().bet_size(), 25);
        assert_eq!(players[1].unwrap().bet_size(), 50);
        assert_eq!(dealer.player_to_act(&players), Some(0));
    }

    #[test]
    fn test_hole_cards_dealt_from_seat_after_button() {
        let mut players = seated(&[1000, 1000, 1000]);
        let mut deck = StackedDeck::sequential();
        let dealer = Dealer::new(&mut players, 0, blinds(25, 50), &mut deck).unwrap();

        assert_eq!(dealer.hole_cards(1), Some(&[Card(0), Card(1)]));
        assert_eq!(dealer.hole_cards(2), Some(&[Card(2), Card(3)]));
        assert_eq!(dealer.hole_cards(0), Some(&[Card(4), Card(5)]));
    }

    #[test]
    fn test_antes_go_straight_to_the_pot() {
        let mut players = seated(&[1000, 1000, 1000]);
        let mut deck = StackedDeck::sequential();
        let forced = ForcedBets {
            small_blind: 25,
            big_blind: 50,
            ante: 10,
        };
        let dealer = Dealer::new(&mut players, 0, forced, &mut deck).unwrap();

        // Antes are committed immediately; blinds are still live bets.
        let pots = dealer.pots(&players);
        let total: Chips = pots.iter().map(|p| p.size()).sum();
        assert_eq!(total, 30 + 25 + 50);
        assert_eq!(players[0].unwrap().stack(), 990);
    }

    #[test]
    fn test_folds_end_betting_without_dealing_more_cards() {
        let mut players = seated(&[1000, 1000, 1000]);
        let mut deck = StackedDeck::sequential();
        let mut dealer = Dealer::new(&mut players, 0, blinds(25, 50), &mut deck).unwrap();

        dealer.action_taken(&mut players, Action::Fold).unwrap();
        dealer.action_taken(&mut players, Action::Fold).unwrap();
        assert!(!dealer.betting_round_in_progress(&players));

        dealer.end_betting_round(&mut players, &mut deck).unwrap();
        assert!(dealer.betting_completed());
        assert!(dealer.community_cards().is_empty());
    }

    #[test]
    fn test_all_in_runout_deals_through_the_river() {
        let mut players = seated(&[1000, 1000]);
        let mut deck = StackedDeck::sequential();
        let mut dealer = Dealer::new(&mut players, 0, blinds(25, 50), &mut deck).unwrap();

        dealer.action_taken(&mut players, Action::Raise(1000)).unwrap();
        dealer.action_taken(&mut players, Action::Call).unwrap();
        assert!(!dealer.betting_round_in_progress(&players));

        dealer.end_betting_round(&mut players, &mut deck).unwrap();
        assert!(dealer.betting_completed());
        assert_eq!(dealer.street(), Street::River);
        assert_eq!(dealer.community_cards().len(), 5);
    }

    #[test]
    fn test_postflop_action_starts_left_of_button() {
        let mut players = seated(&[1000, 1000, 1000]);
        let mut deck = StackedDeck::sequential();
        let mut dealer = Dealer::new(&mut players, 0, blinds(25, 50), &mut deck).unwrap();

        dealer.action_taken(&mut players, Action::Call).unwrap();
        dealer.action_taken(&mut players, Action::Call).unwrap();
        dealer.action_taken(&mut players, Action::Check).unwrap();
        dealer.end_betting_round(&mut players, &mut deck).unwrap();

        assert_eq!(dealer.street(), Street::Flop);
        assert_eq!(dealer.community_cards().len(), 3);
        assert_eq!(dealer.player_to_act(&players), Some(1));
    }

    #[test]
    fn test_check_owing_chips_is_rejected() {
        let mut players = seated(&[1000, 1000, 1000]);
        let mut deck = StackedDeck::sequential();
        let mut dealer = Dealer::new(&mut players, 0, blinds(25, 50), &mut deck).unwrap();

        assert_eq!(
            dealer.action_taken(&mut players, Action::Check),
            Err(TableError::IllegalCheck { owed: 50 })
        );
    }

    #[test]
    fn test_uncontested_pot_skips_the_evaluator() {
        let mut players = seated(&[1000, 1000]);
        let mut deck = StackedDeck::sequential();
        let mut dealer = Dealer::new(&mut players, 0, blinds(25, 50), &mut deck).unwrap();

        dealer.action_taken(&mut players, Action::Fold).unwrap();
        dealer.end_betting_round(&mut players, &mut deck).unwrap();
        dealer.showdown(&mut players, &NoEval).unwrap();

        // The big blind collects the button's small blind.
        assert_eq!(players[1].unwrap().stack(), 1025);
        assert_eq!(dealer.winners(), &[vec![(1, 75)]]);
    }

    #[test]
    fn test_split_pot_odd_chip_goes_left_of_button() {
        let mut players = seated(&[1000, 1000, 1000]);
        // Identical hole ranks for the two remaining seats.
        let mut deck = StackedDeck::new(vec![
            Card(10),
            Card(2),
            Card(10),
            Card(2),
            Card(0),
            Card(1),
            Card(20),
            Card(21),
            Card(22),
            Card(23),
            Card(24),
        ]);
        let forced = ForcedBets {
            small_blind: 25,
            big_blind: 50,
            ante: 1,
        };
        let mut dealer = Dealer::new(&mut players, 0, forced, &mut deck).unwrap();

        dealer.action_taken(&mut players, Action::Fold).unwrap();
        dealer.action_taken(&mut players, Action::Call).unwrap();
        dealer.action_taken(&mut players, Action::Check).unwrap();
        for _ in 0..3 {
            dealer.end_betting_round(&mut players, &mut deck).unwrap();
            dealer.action_taken(&mut players, Action::Check).unwrap();
            dealer.action_taken(&mut players, Action::Check).unwrap();
        }
        dealer.end_betting_round(&mut players, &mut deck).unwrap();
        assert!(dealer.betting_completed());

        dealer.showdown(&mut players, &HighCardEvaluator).unwrap();
        // The 103 chip pot splits 52/51; the extra chip lands on seat 1,
        // the first winner clockwise of the button.
        assert_eq!(dealer.winners(), &[vec![(1, 52), (2, 51)]]);
        assert_eq!(players[1].unwrap().stack(), 1001);
        assert_eq!(players[2].unwrap().stack(), 1000);
    }

    #[test]
    fn test_side_pot_paid_separately() {
        let mut players = seated(&[100, 1000, 1000]);
        let mut deck = StackedDeck::new(vec![
            // Dealt from the seat after the button: seat 1 gets the best
            // hole cards, seat 2 the worst, seat 0 in between.
            Card(50),
            Card(51),
            Card(10),
            Card(11),
            Card(30),
            Card(31),
            Card(0),
            Card(1),
            Card(2),
            Card(3),
            Card(4),
        ]);
        let mut dealer = Dealer::new(&mut players, 0, blinds(25, 50), &mut deck).unwrap();

        dealer.action_taken(&mut players, Action::Raise(100)).unwrap();
        dealer.action_taken(&mut players, Action::Raise(1000)).unwrap();
        dealer.action_taken(&mut players, Action::Call).unwrap();
        dealer.end_betting_round(&mut players, &mut deck).unwrap();
        assert!(dealer.betting_completed());

        dealer.showdown(&mut players, &HighCardEvaluator).unwrap();
        // Main pot 300 goes to seat 1; side pot 1800 also to seat 1 over 2.
        assert_eq!(dealer.winners(), &[vec![(1, 300)], vec![(1, 1800)]]);
        assert_eq!(players[1].unwrap().stack(), 2100);
        assert_eq!(players[0].unwrap().stack(), 0);
    }
}
