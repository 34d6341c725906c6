//! Room-level snapshot types: the engine's `PublicState` with buy-in
//! bookkeeping layered on top (spec §8 — `buyinTotal`/`net` are a Room
//! concern, derived from data the Room already owns).

use std::collections::BTreeMap;

use serde::Serialize;
use texas_engine::{Card, LastAction, Seat, Stage};

#[derive(Debug, Clone, Serialize)]
pub struct RoomPlayerView {
    pub seat: Seat,
    pub name: String,
    pub chips: u64,
    pub buyin_total: u64,
    pub net: i64,
    pub bet: u64,
    pub total_bet: u64,
    pub folded: bool,
    pub all_in: bool,
    pub ready: bool,
    pub last_action: Option<LastAction>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomPublicState {
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
    pub players: Vec<RoomPlayerView>,
    pub showdown: BTreeMap<Seat, Vec<Card>>,
}
