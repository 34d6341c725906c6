//! Read-only views of a `Table`, built fresh on request rather than kept
//! in sync incrementally (spec §6). Buy-in bookkeeping (`buyinTotal`,
//! `net`) is not tracked here — that is the Room's concern layered on
//! top, since the engine itself has no notion of a running buy-in total
//! (see DESIGN.md).

use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::player::LastAction;
use crate::seat::Seat;
use crate::stage::Stage;
use crate::table::Table;

/// One seated player as everyone else sees them: no hole cards, unless
/// the hand has reached showdown and this seat was a contender (carried
/// separately on `PublicState::showdown`, matching the source's
/// dict-of-revealed-hands rather than inlining it per player).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub seat: Seat,
    pub name: String,
    pub chips: u64,
    pub bet: u64,
    pub total_bet: u64,
    pub folded: bool,
    pub all_in: bool,
    pub ready: bool,
    pub last_action: Option<LastAction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicState {
    pub hand_no: u64,
    pub stage: Stage,
    pub dealer_seat: Option<Seat>,
    pub sb_seat: Option<Seat>,
    pub bb_seat: Option<Seat>,
    pub utg_seat: Option<Seat>,
    pub action_seat: Option<Seat>,
    pub pot: u64,
    pub board: Vec<Card>,
    pub current_bet: u64,
    pub min_raise: u64,
    pub players: Vec<PlayerView>,
    pub showdown: std::collections::BTreeMap<Seat, Vec<Card>>,
}

/// Per-session view: a player's own 2 hole cards, empty outside an
/// in-progress hand or once folded (spec §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivateState {
    pub sid: String,
    pub hand: Vec<Card>,
}

impl Table {
    pub fn public_state(&self) -> PublicState {
        let players = self
            .players()
            .map(|(_, p)| PlayerView {
                seat: p.seat,
                name: p.name.clone(),
                chips: p.chips,
                bet: p.bet,
                total_bet: p.total_bet,
                folded: p.folded,
                all_in: p.all_in,
                ready: p.ready,
                last_action: p.last_action,
            })
            .collect();
        PublicState {
            hand_no: self.hand_no,
            stage: self.stage,
            dealer_seat: self.dealer_seat,
            sb_seat: self.sb_seat,
            bb_seat: self.bb_seat,
            utg_seat: self.utg_seat,
            action_seat: self.action_seat,
            pot: self.pot(),
            board: self.board.clone(),
            current_bet: self.current_bet,
            min_raise: self.min_raise,
            players,
            showdown: self.showdown_reveal.clone(),
        }
    }

    /// `hand` is empty when no hand is in progress, the sid isn't
    /// seated, or the seat folded before ever being dealt a hand that
    /// reached this query (folding never clears `hand` mid-hand — it
    /// stays populated for the player's own view — but outside a hand
    /// the stage is `waiting` and there is nothing to show).
    pub fn private_state(&self, sid: &str) -> PrivateState {
        let hand = self
            .players()
            .find(|(_, p)| p.sid == sid)
            .filter(|_| self.stage != Stage::Waiting)
            .map(|(_, p)| p.hand.clone())
            .unwrap_or_default();
        PrivateState { sid: sid.to_string(), hand }
    }
}
