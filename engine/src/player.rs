use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::seat::Seat;

/// The most recent verb applied by a player this hand, kept only for
/// display (spec §3's `lastAction`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LastAction {
    Fold,
    Check,
    Call,
    Raise,
}

/// A seated player. Lifetime spans one or more hands; fields reset at
/// `StartHand` are listed on `Table::start_hand`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub sid: String,
    pub name: String,
    pub seat: Seat,

    pub chips: u64,
    pub ready: bool,

    pub hand: Vec<Card>,

    /// Chips committed in the current betting round.
    pub bet: u64,
    /// Chips committed across all rounds of this hand.
    pub total_bet: u64,

    pub folded: bool,
    pub all_in: bool,

    pub last_action: Option<LastAction>,
}

impl Player {
    pub fn new(sid: impl Into<String>, name: impl Into<String>, seat: Seat, chips: u64) -> Self {
        Self {
            sid: sid.into(),
            name: name.into(),
            seat,
            chips,
            ready: false,
            hand: Vec::new(),
            bet: 0,
            total_bet: 0,
            folded: false,
            all_in: false,
            last_action: None,
        }
    }

    pub(crate) fn reset_for_new_hand(&mut self) {
        self.hand.clear();
        self.bet = 0;
        self.total_bet = 0;
        self.folded = false;
        self.all_in = false;
        self.last_action = None;
    }

    pub(crate) fn reset_for_new_round(&mut self) {
        self.bet = 0;
    }
}
