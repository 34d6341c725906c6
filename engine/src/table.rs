//! The `Table`: hand lifecycle and betting protocol (spec §4.1–§4.2),
//! wired to the evaluator and settlement modules at showdown.

use std::collections::{BTreeMap, BTreeSet};

use crate::action::{ActionInput, ApplyOutcome};
use crate::card::{Card, Deck};
use crate::config::TableConfig;
use crate::error::GameError;
use crate::evaluator;
use crate::player::{LastAction, Player};
use crate::seat::{cyclic_from, next_seat, Seat};
use crate::settlement::{self, HandResult};
use crate::stage::Stage;

/// A single table's full state: seated players, the in-progress hand
/// (if any), and the fixed blind configuration. Owns its players
/// directly (spec §9's Open Question, resolved in favor of the Table
/// being the sole authority over Player records — see DESIGN.md) so
/// every operation below is a plain `&mut self` method.
#[derive(Debug, Clone)]
pub struct Table {
    pub config: TableConfig,

    pub stage: Stage,
    pub board: Vec<Card>,
    pub hand_no: u64,

    pub dealer_seat: Option<Seat>,
    pub sb_seat: Option<Seat>,
    pub bb_seat: Option<Seat>,
    pub utg_seat: Option<Seat>,
    pub action_seat: Option<Seat>,

    pub current_bet: u64,
    pub min_raise: u64,

    pub to_act: Vec<Seat>,
    pub showdown_reveal: BTreeMap<Seat, Vec<Card>>,

    players: BTreeMap<Seat, Player>,
    deck: Deck,
    last_result: Option<HandResult>,
    /// Seats that have acted (fold/check/call/raise) since the last
    /// full-sized raise reopened the round. Only consulted when
    /// `config.short_all_in_reopens` is `false`, to decide which seats a
    /// short all-in raise is allowed to reopen action for (spec §9).
    acted_since_last_raise: BTreeSet<Seat>,
}

impl Table {
    pub fn new(config: TableConfig) -> Self {
        Self {
            config,
            stage: Stage::Waiting,
            board: Vec::new(),
            hand_no: 0,
            dealer_seat: None,
            sb_seat: None,
            bb_seat: None,
            utg_seat: None,
            action_seat: None,
            current_bet: 0,
            min_raise: 0,
            to_act: Vec::new(),
            showdown_reveal: BTreeMap::new(),
            players: BTreeMap::new(),
            deck: Deck::fresh(),
            last_result: None,
            acted_since_last_raise: BTreeSet::new(),
        }
    }

    /// Total chips committed this hand, equal to Σ `total_bet` (spec §3's
    /// `pot` invariant) — derived rather than tracked separately so the
    /// two can never drift apart.
    pub fn pot(&self) -> u64 {
        self.players.values().map(|p| p.total_bet).sum()
    }

    pub fn player(&self, seat: Seat) -> Option<&Player> {
        self.players.get(&seat)
    }

    pub fn players(&self) -> impl Iterator<Item = (&Seat, &Player)> {
        self.players.iter()
    }

    pub fn last_result(&self) -> Option<&HandResult> {
        self.last_result.as_ref()
    }

    fn seat_of_sid(&self, sid: &str) -> Option<Seat> {
        self.players
            .iter()
            .find(|(_, p)| p.sid == sid)
            .map(|(&seat, _)| seat)
    }

    fn seats(&self) -> Vec<Seat> {
        self.players.keys().copied().collect()
    }

    /// Seats this hand where `!folded && !all_in` — the only seats that
    /// can be asked to act.
    fn can_act_seats(&self) -> Vec<Seat> {
        self.players
            .iter()
            .filter(|(_, p)| !p.folded && !p.all_in)
            .map(|(&s, _)| s)
            .collect()
    }

    /// Seats a player at the table. `seat` must be free and in `1..=9`;
    /// seating itself (choosing the lowest free seat, gating on
    /// `RoomFull`) is the Room's job, not the engine's.
    pub fn seat_player(&mut self, seat: Seat, player: Player) -> Result<(), GameError> {
        if !(1..=9).contains(&seat) {
            return Err(GameError::EngineFault(format!("seat {seat} out of range")));
        }
        if self.players.contains_key(&seat) {
            return Err(GameError::EngineFault(format!("seat {seat} already occupied")));
        }
        self.players.insert(seat, player);
        Ok(())
    }

    pub fn remove_seat(&mut self, seat: Seat) -> Option<Player> {
        self.players.remove(&seat)
    }

    pub fn set_ready(&mut self, seat: Seat, ready: bool) -> Result<(), GameError> {
        self.players.get_mut(&seat).ok_or(GameError::NotSeated)?.ready = ready;
        Ok(())
    }

    /// Credits chips to a seated player's stack. Buy-in gating
    /// (`¬started`, amount > 0) is the Room's responsibility.
    pub fn add_chips(&mut self, seat: Seat, amount: u64) -> Result<(), GameError> {
        self.players.get_mut(&seat).ok_or(GameError::NotSeated)?.chips += amount;
        Ok(())
    }

    /// Forces the current `actionSeat` to fold — the engine-side half of
    /// a disconnect auto-fold; the Room decides when to call it.
    pub fn force_fold_action_seat(&mut self) -> Result<(), GameError> {
        let seat = self.action_seat.ok_or(GameError::NotStarted)?;
        let sid = self.players[&seat].sid.clone();
        self.apply_action(&sid, ActionInput::Fold).map(|_| ())
    }

    /// Starts a new hand with a freshly shuffled deck. See
    /// [`Table::start_hand_with_deck`] for the deterministic variant
    /// used by tests.
    pub fn start_hand(&mut self) -> Result<(), GameError> {
        self.start_hand_with_deck(Deck::shuffled())
    }

    /// Starts a new hand using an explicitly supplied deck (injected in
    /// tests to fix the draw order; `Deck::from_cards` documents the
    /// draw direction).
    pub fn start_hand_with_deck(&mut self, deck: Deck) -> Result<(), GameError> {
        if self.stage != Stage::Waiting {
            return Err(GameError::EngineFault("hand already in progress".into()));
        }
        let seats = self.seats();
        if seats.iter().filter(|&&s| self.players[&s].chips > 0).count() < 2 {
            return Err(GameError::EngineFault("fewer than 2 players with chips".into()));
        }

        self.hand_no += 1;
        self.stage = Stage::Preflop;
        self.board.clear();
        self.showdown_reveal.clear();
        self.last_result = None;
        self.deck = deck;
        for p in self.players.values_mut() {
            p.reset_for_new_hand();
        }

        self.dealer_seat = Some(match self.dealer_seat {
            None => seats[0],
            Some(prev) => next_seat(&seats, prev),
        });
        let dealer = self.dealer_seat.unwrap();

        let deal_order = cyclic_from(&seats, next_seat(&seats, dealer));
        for _ in 0..2 {
            for &seat in &deal_order {
                if let Some(card) = self.deck.deal() {
                    self.players.get_mut(&seat).unwrap().hand.push(card);
                }
            }
        }

        let (sb_seat, bb_seat) = if seats.len() == 2 {
            (dealer, next_seat(&seats, dealer))
        } else {
            let sb = next_seat(&seats, dealer);
            (sb, next_seat(&seats, sb))
        };
        self.sb_seat = Some(sb_seat);
        self.bb_seat = Some(bb_seat);

        let sb_paid = self.post_blind(sb_seat, self.config.small_blind);
        let bb_paid = self.post_blind(bb_seat, self.config.big_blind);
        self.current_bet = sb_paid.max(bb_paid);
        self.min_raise = self.config.big_blind;

        let first = if seats.len() == 2 { sb_seat } else { next_seat(&seats, bb_seat) };
        self.utg_seat = Some(first);
        self.start_betting_round(first);

        Ok(())
    }

    fn post_blind(&mut self, seat: Seat, amount: u64) -> u64 {
        let p = self.players.get_mut(&seat).unwrap();
        let pay = amount.min(p.chips);
        p.chips -= pay;
        p.bet += pay;
        p.total_bet += pay;
        if p.chips == 0 {
            p.all_in = true;
        }
        pay
    }

    fn start_betting_round(&mut self, first: Seat) {
        self.acted_since_last_raise.clear();
        let can_act = self.can_act_seats();
        if can_act.is_empty() {
            self.to_act = Vec::new();
            self.action_seat = None;
            return;
        }
        let order = cyclic_from(&can_act, first);
        self.action_seat = order.first().copied();
        self.to_act = order;
    }

    fn remove_from_to_act(&mut self, seat: Seat) {
        self.to_act.retain(|&s| s != seat);
        self.action_seat = self.to_act.first().copied();
    }

    /// Applies one action from `sid`, the currently-seated player
    /// believed to hold `actionSeat`. See spec §4.2 for the full
    /// semantics of each variant.
    pub fn apply_action(&mut self, sid: &str, input: ActionInput) -> Result<ApplyOutcome, GameError> {
        if self.stage == Stage::Waiting || self.stage == Stage::Showdown {
            return Err(GameError::NotStarted);
        }
        let seat = self.seat_of_sid(sid).ok_or(GameError::NotSeated)?;
        if self.action_seat != Some(seat) {
            return Err(GameError::NotYourTurn);
        }
        if self.players[&seat].folded {
            return Err(GameError::AlreadyFolded);
        }

        match input {
            ActionInput::Fold => {
                let p = self.players.get_mut(&seat).unwrap();
                p.folded = true;
                p.last_action = Some(LastAction::Fold);
                self.acted_since_last_raise.insert(seat);
                self.remove_from_to_act(seat);
                if let Some(outcome) = self.maybe_early_terminate() {
                    return Ok(outcome);
                }
            }
            ActionInput::Check => {
                if self.players[&seat].bet != self.current_bet {
                    return Err(GameError::CannotCheck);
                }
                let p = self.players.get_mut(&seat).unwrap();
                p.last_action = Some(LastAction::Check);
                self.acted_since_last_raise.insert(seat);
                self.remove_from_to_act(seat);
            }
            ActionInput::Call => {
                self.apply_call(seat);
                self.acted_since_last_raise.insert(seat);
                self.remove_from_to_act(seat);
            }
            ActionInput::Raise { amount } => {
                if amount <= self.current_bet {
                    self.apply_call(seat);
                    self.acted_since_last_raise.insert(seat);
                    self.remove_from_to_act(seat);
                } else {
                    self.apply_raise(seat, amount)?;
                }
            }
        }

        if self.to_act.is_empty()
            && matches!(self.stage, Stage::Preflop | Stage::Flop | Stage::Turn | Stage::River)
        {
            self.advance_stage();
        }
        self.maybe_auto_run_out();

        Ok(if self.stage == Stage::Waiting {
            ApplyOutcome::HandEndedEarly
        } else if self.action_seat.is_none() {
            ApplyOutcome::Advanced
        } else {
            ApplyOutcome::Continue
        })
    }

    fn apply_call(&mut self, seat: Seat) {
        let p = self.players.get_mut(&seat).unwrap();
        let need = self.current_bet.saturating_sub(p.bet);
        let pay = need.min(p.chips);
        p.chips -= pay;
        p.bet += pay;
        p.total_bet += pay;
        if p.chips == 0 && need > 0 {
            p.all_in = true;
        }
        p.last_action = Some(if need > 0 { LastAction::Call } else { LastAction::Check });
    }

    fn apply_raise(&mut self, seat: Seat, amount: u64) -> Result<(), GameError> {
        let p = &self.players[&seat];
        if amount > p.bet + p.chips {
            return Err(GameError::InsufficientChips);
        }
        let raise_amount = amount - self.current_bet;
        let is_all_in = amount == p.bet + p.chips;
        if raise_amount < self.min_raise && !is_all_in {
            return Err(GameError::BelowMinRaise);
        }

        let p = self.players.get_mut(&seat).unwrap();
        let delta = amount - p.bet;
        p.chips -= delta;
        p.bet = amount;
        p.total_bet += delta;
        if p.chips == 0 {
            p.all_in = true;
        }
        p.last_action = Some(LastAction::Raise);

        // A short all-in (raise_amount < min_raise) does not bump min_raise
        // per spec §8's minimum-raise law; a full-sized raise does.
        let reopens_fully = !is_all_in || raise_amount >= self.min_raise || self.config.short_all_in_reopens;
        self.min_raise = self.min_raise.max(raise_amount);
        self.current_bet = amount;

        let all_seats = self.seats();
        let mut can_act: Vec<Seat> = self
            .players
            .iter()
            .filter(|&(&s, p)| s != seat && !p.folded && !p.all_in)
            .map(|(&s, _)| s)
            .collect();
        if reopens_fully {
            // Full reopen: every eligible player must act again, starting a
            // fresh "acted since last raise" cycle.
            self.acted_since_last_raise.clear();
        } else {
            // Short all-in with shortAllInReopens=false: only players who
            // have not yet acted this round remain obligated to respond.
            can_act.retain(|s| !self.acted_since_last_raise.contains(s));
        }
        self.acted_since_last_raise.insert(seat);

        if can_act.is_empty() {
            self.to_act = Vec::new();
            self.action_seat = None;
        } else {
            let order = cyclic_from(&can_act, next_seat(&all_seats, seat));
            self.action_seat = order.first().copied();
            self.to_act = order;
        }
        Ok(())
    }

    /// After a fold that leaves exactly one non-folded player, award the
    /// pot and return to `waiting` (spec §4.1 "Early termination").
    fn maybe_early_terminate(&mut self) -> Option<ApplyOutcome> {
        let remaining: Vec<Seat> = self.players.iter().filter(|(_, p)| !p.folded).map(|(&s, _)| s).collect();
        if remaining.len() != 1 {
            return None;
        }
        let winner = remaining[0];
        let pot = self.pot();
        self.players.get_mut(&winner).unwrap().chips += pot;
        self.last_result = Some(HandResult {
            winners: vec![winner],
            payouts: BTreeMap::from([(winner, pot)]),
            ranking: Vec::new(),
        });
        self.clear_committed_chips();
        self.stage = Stage::Waiting;
        self.action_seat = None;
        self.to_act.clear();
        Some(ApplyOutcome::HandEndedEarly)
    }

    /// Advances exactly one street. On reaching the river, resolves the
    /// showdown and returns the table to `waiting` directly — there is
    /// no separate idle "showdown" window the Room must drive.
    fn advance_stage(&mut self) {
        match self.stage {
            Stage::Preflop => {
                let cards = self.deck.deal_n(3);
                self.board.extend(cards);
                self.stage = Stage::Flop;
                self.start_postflop_round();
            }
            Stage::Flop => {
                let cards = self.deck.deal_n(1);
                self.board.extend(cards);
                self.stage = Stage::Turn;
                self.start_postflop_round();
            }
            Stage::Turn => {
                let cards = self.deck.deal_n(1);
                self.board.extend(cards);
                self.stage = Stage::River;
                self.start_postflop_round();
            }
            Stage::River => {
                self.run_showdown();
            }
            Stage::Waiting | Stage::Showdown => {}
        }
    }

    fn start_postflop_round(&mut self) {
        for p in self.players.values_mut() {
            if !p.folded {
                p.reset_for_new_round();
            }
        }
        self.current_bet = 0;
        self.min_raise = self.config.big_blind;

        let seats = self.seats();
        let dealer = self.dealer_seat.unwrap();
        let first = if seats.len() == 2 { dealer } else { next_seat(&seats, dealer) };
        self.start_betting_round(first);
    }

    /// If no one can act and every non-folded player is all-in or
    /// matched, deals remaining streets back-to-back (spec §4.1
    /// "Auto-run-out"). The inner loop is unconditional per spec §9's
    /// Design Notes — the precondition already rules out the case a
    /// mid-loop break would guard against.
    fn maybe_auto_run_out(&mut self) {
        if self.action_seat.is_some() {
            return;
        }
        if !self.all_active_all_in_or_matched() {
            return;
        }
        while matches!(self.stage, Stage::Preflop | Stage::Flop | Stage::Turn | Stage::River) {
            self.advance_stage();
        }
    }

    fn all_active_all_in_or_matched(&self) -> bool {
        self.players
            .values()
            .all(|p| p.folded || p.all_in || p.bet == self.current_bet)
    }

    /// Resolves the showdown: scores every contender, builds side pots,
    /// credits payouts, reveals hole cards, and returns to `waiting`
    /// (spec §4.4).
    fn run_showdown(&mut self) {
        let contenders: Vec<Seat> = self.players.iter().filter(|(_, p)| !p.folded).map(|(&s, _)| s).collect();
        let totals: BTreeMap<Seat, u64> = self.players.iter().map(|(&s, p)| (s, p.total_bet)).collect();
        let scores = contenders
            .iter()
            .map(|&seat| {
                let p = &self.players[&seat];
                (seat, evaluator::score(&p.hand, &self.board))
            })
            .collect();

        let result = settlement::resolve_side_pots(&totals, &contenders, &scores);
        for (&seat, &amount) in &result.payouts {
            if amount > 0 {
                self.players.get_mut(&seat).unwrap().chips += amount;
            }
        }
        for &seat in &contenders {
            let hand = self.players[&seat].hand.clone();
            self.showdown_reveal.insert(seat, hand);
        }
        self.last_result = Some(result);

        self.clear_committed_chips();
        self.stage = Stage::Waiting;
        self.action_seat = None;
        self.to_act.clear();
    }

    /// Zeroes `bet`/`total_bet` once a hand is fully settled, so `pot()`
    /// reads 0 in the idle `waiting` state instead of the last hand's
    /// stale contributions lingering until the next `StartHand` reset.
    fn clear_committed_chips(&mut self) {
        for p in self.players.values_mut() {
            p.bet = 0;
            p.total_bet = 0;
        }
    }
}
