use std::fmt;

use rand::Rng;
use tracing::{debug, trace};

use crate::core::{Card, Chips, Deck, HandEvaluator, Player, SeatSet, MAX_SEATS};

use super::action::Action;
use super::dealer::{Dealer, LegalActions, Street};
use super::errors::{TableBuilderError, TableError};
use super::pot::Pot;

/// The forced bets posted at the start of every hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForcedBets {
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub ante: Chips,
}

impl ForcedBets {
    /// Blinds only, no ante.
    pub fn blinds(small_blind: Chips, big_blind: Chips) -> Self {
        ForcedBets {
            small_blind,
            big_blind,
            ante: 0,
        }
    }
}

/// A standing instruction a seat leaves for its next turn.
///
/// Directives are hand scoped and consumed (or invalidated) as the hand
/// develops; a raise downgrades or clears the ones it makes unsound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AutomaticAction {
    Fold = 0,
    CheckFold = 1,
    Check = 2,
    Call = 3,
    CallAny = 4,
    AllIn = 5,
}

impl AutomaticAction {
    const ALL: [AutomaticAction; 6] = [
        AutomaticAction::Fold,
        AutomaticAction::CheckFold,
        AutomaticAction::Check,
        AutomaticAction::Call,
        AutomaticAction::CallAny,
        AutomaticAction::AllIn,
    ];
}

impl fmt::Display for AutomaticAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutomaticAction::Fold => write!(f, "fold"),
            AutomaticAction::CheckFold => write!(f, "check/fold"),
            AutomaticAction::Check => write!(f, "check"),
            AutomaticAction::Call => write!(f, "call"),
            AutomaticAction::CallAny => write!(f, "call any"),
            AutomaticAction::AllIn => write!(f, "all in"),
        }
    }
}

/// The set of automatic actions currently legal for a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AutomaticActionSet(u8);

impl AutomaticActionSet {
    pub fn insert(&mut self, action: AutomaticAction) {
        self.0 |= 1 << action as u8;
    }

    pub fn contains(&self, action: AutomaticAction) -> bool {
        self.0 & (1 << action as u8) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = AutomaticAction> + '_ {
        AutomaticAction::ALL
            .into_iter()
            .filter(move |action| self.contains(*action))
    }
}

/// Per-hand state. `players` is the table's snapshot of the participating
/// seats for this hand; `staying` tracks which of them get written back to
/// the public seats when the hand settles.
struct HandState {
    dealer: Dealer,
    players: Vec<Option<Player>>,
    staying: SeatSet,
    button: usize,
    id: u128,
}

/// A multi-seat no-limit hold'em table.
///
/// Players sit down and stand up between (or during) hands; the table runs
/// one [`Dealer`] at a time, plays out queued automatic actions, and settles
/// winnings back into the seats at showdown.
pub struct Table {
    num_seats: usize,
    seats: Vec<Option<Player>>,
    forced_bets: ForcedBets,
    auto_button: Option<usize>,
    deck: Box<dyn Deck>,
    evaluator: Box<dyn HandEvaluator>,
    automatic_actions: Vec<Option<AutomaticAction>>,
    hand: Option<HandState>,
    last_winners: Vec<Vec<(usize, Chips)>>,
}

/// Builder for [`Table`]. The forced bets, deck, and evaluator have no
/// defaults and must be supplied.
pub struct TableBuilder {
    num_seats: usize,
    forced_bets: Option<ForcedBets>,
    deck: Option<Box<dyn Deck>>,
    evaluator: Option<Box<dyn HandEvaluator>>,
}

impl TableBuilder {
    pub fn num_seats(mut self, num_seats: usize) -> Self {
        self.num_seats = num_seats;
        self
    }

    pub fn forced_bets(mut self, forced_bets: ForcedBets) -> Self {
        self.forced_bets = Some(forced_bets);
        self
    }

    pub fn deck(mut self, deck: Box<dyn Deck>) -> Self {
        self.deck = Some(deck);
        self
    }

    pub fn evaluator(mut self, evaluator: Box<dyn HandEvaluator>) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    pub fn build(self) -> Result<Table, TableBuilderError> {
        let forced_bets = self
            .forced_bets
            .ok_or(TableBuilderError::MissingForcedBets)?;
        let deck = self.deck.ok_or(TableBuilderError::MissingDeck)?;
        let evaluator = self.evaluator.ok_or(TableBuilderError::MissingEvaluator)?;
        if self.num_seats < 2 || self.num_seats > MAX_SEATS {
            return Err(TableBuilderError::InvalidSeatCount {
                actual: self.num_seats,
            });
        }
        if forced_bets.small_blind == 0 || forced_bets.small_blind > forced_bets.big_blind {
            return Err(TableBuilderError::InvalidBlinds {
                small: forced_bets.small_blind,
                big: forced_bets.big_blind,
            });
        }
        Ok(Table {
            num_seats: self.num_seats,
            seats: vec![None; self.num_seats],
            forced_bets,
            auto_button: None,
            deck,
            evaluator,
            automatic_actions: vec![None; self.num_seats],
            hand: None,
            last_winners: Vec::new(),
        })
    }
}

enum StandUpDisposition {
    NotInHand,
    FoldedAlready,
    ToAct,
    CanActLater,
    CannotAct,
}

impl Table {
    pub fn builder() -> TableBuilder {
        TableBuilder {
            num_seats: 9,
            forced_bets: None,
            deck: None,
            evaluator: None,
        }
    }

    pub fn num_seats(&self) -> usize {
        self.num_seats
    }

    pub fn forced_bets(&self) -> ForcedBets {
        self.forced_bets
    }

    /// Change the forced bets. Takes effect from the next hand.
    pub fn set_forced_bets(&mut self, forced_bets: ForcedBets) {
        self.forced_bets = forced_bets;
    }

    /// Seat a new player with a fresh stack.
    ///
    /// Sitting down during a hand is allowed; the newcomer is dealt in from
    /// the next hand.
    pub fn sit_down(&mut self, seat: usize, buy_in: Chips) -> Result<(), TableError> {
        if seat >= self.num_seats {
            return Err(TableError::SeatOutOfRange {
                seat,
                num_seats: self.num_seats,
            });
        }
        if self.seats[seat].is_some() {
            return Err(TableError::SeatOccupied(seat));
        }
        if buy_in == 0 {
            return Err(TableError::InvalidBuyIn);
        }
        self.seats[seat] = Some(Player::new(buy_in));
        debug!(seat, buy_in, "player sat down");
        Ok(())
    }

    /// Remove a player from the table.
    ///
    /// Leaving mid-hand forfeits the hand: the seat to act folds at once, a
    /// seat with actions still ahead of it gets a queued fold, and a seat
    /// that cannot act anymore is folded out of the pots directly. Chips
    /// already committed stay in the pots.
    pub fn stand_up(&mut self, seat: usize) {
        if seat >= self.num_seats {
            return;
        }
        let disposition = match &self.hand {
            Some(hand) if hand.dealer.is_participant(seat) => {
                if hand.dealer.is_folded(seat) {
                    StandUpDisposition::FoldedAlready
                } else if hand.dealer.player_to_act(&hand.players) == Some(seat) {
                    StandUpDisposition::ToAct
                } else {
                    let has_stack = hand.players[seat].map_or(false, |p| p.stack() > 0);
                    if !hand.dealer.betting_completed() && has_stack {
                        StandUpDisposition::CanActLater
                    } else {
                        StandUpDisposition::CannotAct
                    }
                }
            }
            _ => StandUpDisposition::NotInHand,
        };

        match disposition {
            StandUpDisposition::NotInHand => {}
            StandUpDisposition::FoldedAlready => {
                self.automatic_actions[seat] = None;
                self.leave_hand(seat);
            }
            StandUpDisposition::ToAct => {
                self.leave_hand(seat);
                let res = self.apply_action(Action::Fold);
                debug_assert!(res.is_ok(), "player to act can always fold");
                let res = self.run_automatic_actions();
                debug_assert!(res.is_ok());
            }
            StandUpDisposition::CanActLater => {
                self.automatic_actions[seat] = Some(AutomaticAction::Fold);
                self.leave_hand(seat);
            }
            StandUpDisposition::CannotAct => {
                self.automatic_actions[seat] = None;
                if let Some(hand) = self.hand.as_mut() {
                    hand.dealer.fold_out(seat);
                }
                self.leave_hand(seat);
            }
        }
        self.seats[seat] = None;
        debug!(seat, "player stood up");
    }

    fn leave_hand(&mut self, seat: usize) {
        if let Some(hand) = self.hand.as_mut() {
            hand.staying.disable(seat);
        }
    }

    /// Start a new hand among the occupied seats that still hold chips.
    ///
    /// With no explicit button the button advances clockwise from its last
    /// automatic position (or to the first eligible seat for the very first
    /// hand). Passing a button seat uses it for this hand only; the
    /// automatic rotation is not disturbed.
    pub fn start_hand(&mut self, button: Option<usize>) -> Result<(), TableError> {
        if self.hand.is_some() {
            return Err(TableError::HandInProgress);
        }
        let mut participants = SeatSet::default();
        for (seat, player) in self.seats.iter().enumerate() {
            if player.map_or(false, |p| p.total_chips() > 0) {
                participants.enable(seat);
            }
        }
        if participants.count() < 2 {
            return Err(TableError::NotEnoughPlayers);
        }

        let button = match button {
            Some(seat) => {
                if !participants.get(seat) {
                    return Err(TableError::InvalidButton(seat));
                }
                seat
            }
            None => {
                let base = self.auto_button.unwrap_or(self.num_seats - 1);
                let next = participants
                    .next_after(base, self.num_seats)
                    .expect("participants present");
                self.auto_button = Some(next);
                next
            }
        };

        self.automatic_actions = vec![None; self.num_seats];
        self.last_winners.clear();

        let mut players = self.seats.clone();
        for (seat, slot) in players.iter_mut().enumerate() {
            if !participants.get(seat) {
                *slot = None;
            }
        }

        self.deck.shuffle();
        let id: u128 = rand::rng().random();
        let dealer = Dealer::new(&mut players, button, self.forced_bets, self.deck.as_mut())?;
        debug!(
            hand_id = %id,
            button,
            participants = participants.count(),
            "hand started"
        );
        self.hand = Some(HandState {
            dealer,
            players,
            staying: participants,
            button,
            id,
        });
        Ok(())
    }

    /// Apply the seat-to-act's action, then play out any queued automatic
    /// actions that the turn reaches.
    pub fn action_taken(&mut self, action: Action) -> Result<(), TableError> {
        let hand = self.hand.as_ref().ok_or(TableError::NoHandInProgress)?;
        if hand.dealer.player_to_act(&hand.players).is_none() {
            return Err(TableError::NoBettingRound);
        }
        self.apply_action(action)?;
        self.run_automatic_actions()
    }

    /// Close the finished betting round and deal the next street (or the
    /// whole runout) as appropriate.
    pub fn end_betting_round(&mut self) -> Result<(), TableError> {
        let hand = self.hand.as_mut().ok_or(TableError::NoHandInProgress)?;
        if hand.dealer.betting_completed() {
            return Err(TableError::BettingAlreadyCompleted);
        }
        if hand.dealer.betting_round_in_progress(&hand.players) {
            return Err(TableError::BettingRoundInProgress);
        }
        hand.dealer
            .end_betting_round(&mut hand.players, self.deck.as_mut())?;
        self.run_automatic_actions()
    }

    /// Settle the pots and end the hand, writing winnings back to the seats.
    pub fn showdown(&mut self) -> Result<(), TableError> {
        let hand = self.hand.as_mut().ok_or(TableError::NoHandInProgress)?;
        if !hand.dealer.betting_completed() {
            return Err(TableError::BettingNotCompleted);
        }
        hand.dealer
            .showdown(&mut hand.players, self.evaluator.as_ref())?;

        let hand = self.hand.take().expect("hand present");
        self.last_winners = hand.dealer.winners().to_vec();
        for seat in hand.staying.ones() {
            self.seats[seat] = hand.players[seat];
        }
        self.automatic_actions = vec![None; self.num_seats];
        debug!(hand_id = %hand.id, "hand settled");
        Ok(())
    }

    /// Queue (or clear, with `None`) an automatic action for a seat that is
    /// not currently to act.
    pub fn set_automatic_action(
        &mut self,
        seat: usize,
        action: Option<AutomaticAction>,
    ) -> Result<(), TableError> {
        if seat >= self.num_seats {
            return Err(TableError::SeatOutOfRange {
                seat,
                num_seats: self.num_seats,
            });
        }
        let hand = self.hand.as_ref().ok_or(TableError::NoHandInProgress)?;
        let to_act = hand
            .dealer
            .player_to_act(&hand.players)
            .ok_or(TableError::NoBettingRound)?;
        if to_act == seat {
            return Err(TableError::SeatIsToAct(seat));
        }
        if let Some(action) = action {
            if !self.legal_automatic_actions(seat)?.contains(action) {
                return Err(TableError::IllegalAutomaticAction { seat });
            }
        }
        trace!(seat, action = ?action, "automatic action set");
        self.automatic_actions[seat] = action;
        Ok(())
    }

    /// The automatic actions a seat could queue right now. Folding is always
    /// possible; checking requires the seat's bet to already match the
    /// biggest, calling requires it not to.
    pub fn legal_automatic_actions(&self, seat: usize) -> Result<AutomaticActionSet, TableError> {
        let hand = self.hand.as_ref().ok_or(TableError::NoHandInProgress)?;
        let biggest = hand.dealer.biggest_bet().ok_or(TableError::NoBettingRound)?;
        let mut set = AutomaticActionSet::default();
        if !hand.dealer.is_participant(seat) || hand.dealer.is_folded(seat) {
            return Ok(set);
        }
        let player = match &hand.players[seat] {
            Some(player) => player,
            None => return Ok(set),
        };
        set.insert(AutomaticAction::Fold);
        if player.bet_size() == biggest {
            set.insert(AutomaticAction::Check);
            set.insert(AutomaticAction::CheckFold);
        } else {
            set.insert(AutomaticAction::Call);
        }
        set.insert(AutomaticAction::CallAny);
        set.insert(AutomaticAction::AllIn);
        Ok(set)
    }

    pub fn automatic_action(&self, seat: usize) -> Option<AutomaticAction> {
        self.automatic_actions.get(seat).copied().flatten()
    }

    /// The queued directive for every seat, indexed by seat number.
    pub fn automatic_actions(&self) -> &[Option<AutomaticAction>] {
        &self.automatic_actions
    }

    fn apply_action(&mut self, action: Action) -> Result<(), TableError> {
        let hand = self.hand.as_mut().ok_or(TableError::NoHandInProgress)?;
        let seat = hand
            .dealer
            .player_to_act(&hand.players)
            .ok_or(TableError::NoBettingRound)?;
        hand.dealer.action_taken(&mut hand.players, action)?;
        self.automatic_actions[seat] = None;
        if matches!(action, Action::Raise(_)) {
            self.maintain_directives_after_raise();
        }
        Ok(())
    }

    /// A raise invalidates some queued directives: a pure check is no longer
    /// sound, a check/fold collapses to its fold half, and a call-any
    /// becomes a plain call once the bet covers the seat's whole stack.
    fn maintain_directives_after_raise(&mut self) {
        let hand = self.hand.as_ref().expect("hand in progress");
        let biggest = hand.dealer.biggest_bet().unwrap_or(0);
        for (seat, slot) in self.automatic_actions.iter_mut().enumerate() {
            let Some(directive) = *slot else { continue };
            match directive {
                AutomaticAction::Check => *slot = None,
                AutomaticAction::CheckFold => *slot = Some(AutomaticAction::Fold),
                AutomaticAction::CallAny => {
                    let total = hand.players[seat].map_or(0, |p| p.total_chips());
                    if biggest >= total {
                        *slot = Some(AutomaticAction::Call);
                    }
                }
                _ => {}
            }
        }
    }

    /// Play out queued directives for as long as the seat to act has one.
    fn run_automatic_actions(&mut self) -> Result<(), TableError> {
        loop {
            let Some(hand) = self.hand.as_ref() else {
                return Ok(());
            };
            let Some(seat) = hand.dealer.player_to_act(&hand.players) else {
                return Ok(());
            };
            let Some(directive) = self.automatic_actions[seat] else {
                return Ok(());
            };
            let legal = hand
                .dealer
                .legal_actions(&hand.players)
                .expect("betting round in progress");
            let total = hand.players[seat]
                .as_ref()
                .expect("player to act is seated")
                .total_chips();
            let action = match directive {
                AutomaticAction::Fold => Action::Fold,
                AutomaticAction::CheckFold => {
                    if legal.can_check {
                        Action::Check
                    } else {
                        Action::Fold
                    }
                }
                AutomaticAction::Check => Action::Check,
                AutomaticAction::Call | AutomaticAction::CallAny => Action::Call,
                AutomaticAction::AllIn => {
                    if legal.can_raise {
                        Action::Raise(total)
                    } else {
                        Action::Call
                    }
                }
            };
            trace!(seat, %directive, %action, "automatic action fires");
            self.apply_action(action)?;
        }
    }

    /// A snapshot of every seat, with in-hand chip state where a hand is
    /// running.
    pub fn seats(&self) -> Vec<Option<Player>> {
        let mut seats = self.seats.clone();
        if let Some(hand) = &self.hand {
            for seat in hand.staying.ones() {
                seats[seat] = hand.players[seat];
            }
        }
        seats
    }

    pub fn hand_in_progress(&self) -> bool {
        self.hand.is_some()
    }

    pub fn betting_round_in_progress(&self) -> bool {
        self.hand
            .as_ref()
            .map_or(false, |hand| hand.dealer.betting_round_in_progress(&hand.players))
    }

    pub fn betting_rounds_completed(&self) -> bool {
        self.hand
            .as_ref()
            .map_or(false, |hand| hand.dealer.betting_completed())
    }

    pub fn button(&self) -> Option<usize> {
        self.hand.as_ref().map(|hand| hand.button)
    }

    pub fn player_to_act(&self) -> Option<usize> {
        self.hand
            .as_ref()
            .and_then(|hand| hand.dealer.player_to_act(&hand.players))
    }

    pub fn num_active_players(&self) -> usize {
        self.hand
            .as_ref()
            .map_or(0, |hand| hand.dealer.num_active_players())
    }

    pub fn round_of_betting(&self) -> Option<Street> {
        self.hand.as_ref().map(|hand| hand.dealer.street())
    }

    pub fn community_cards(&self) -> &[Card] {
        self.hand
            .as_ref()
            .map_or(&[], |hand| hand.dealer.community_cards())
    }

    pub fn hole_cards(&self, seat: usize) -> Option<&[Card; 2]> {
        self.hand.as_ref().and_then(|hand| hand.dealer.hole_cards(seat))
    }

    /// Participants still contesting the current hand.
    pub fn hand_players(&self) -> SeatSet {
        self.hand
            .as_ref()
            .map_or(SeatSet::default(), |hand| hand.dealer.contesting_seats())
    }

    pub fn pots(&self) -> Vec<Pot> {
        self.hand
            .as_ref()
            .map_or(Vec::new(), |hand| hand.dealer.pots(&hand.players))
    }

    /// Per-pot payouts of the last completed hand. Cleared when the next
    /// hand starts.
    pub fn winners(&self) -> &[Vec<(usize, Chips)>] {
        &self.last_winners
    }

    pub fn legal_actions(&self) -> Option<LegalActions> {
        let hand = self.hand.as_ref()?;
        if !hand.dealer.betting_round_in_progress(&hand.players) {
            return None;
        }
        hand.dealer.legal_actions(&hand.players)
    }

    pub fn hand_id(&self) -> Option<u128> {
        self.hand.as_ref().map(|hand| hand.id)
    }
}
