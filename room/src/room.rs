//! Room coordination: seat assignment, buy-in gating, ready-gating,
//! disconnect handling and bounded logs/chat layered on top of a
//! `texas_engine::Table` (spec §4.5, expanded in SPEC_FULL.md §8).

use std::collections::{BTreeMap, BTreeSet};

use texas_engine::{ActionInput, ApplyOutcome, GameError, Player, PrivateState, Seat, Stage, Table, TableConfig};
use tracing::{debug, info};

use crate::config::RoomConfig;
use crate::error::RoomError;
use crate::snapshot::{RoomPlayerView, RoomPublicState};

const MAX_LOG_ENTRIES: usize = 200;
const MAX_CHAT_ENTRIES: usize = 200;
const MAX_CHAT_CHARS: usize = 300;

#[derive(Debug, Clone, serde::Serialize)]
pub struct ChatEntry {
    pub sid: String,
    pub name: String,
    pub text: String,
}

pub struct Room {
    pub id: String,
    config: RoomConfig,
    table: Table,
    buyin_total: BTreeMap<Seat, u64>,
    /// Seats that disconnected mid-hand; kept in the hand (their
    /// `total_bet` still funds the pot they were part of) and removed
    /// only once the hand returns to `waiting` — the corrected rule from
    /// spec.md §9, not the source's immediate removal.
    vacated: BTreeSet<Seat>,
    log: Vec<String>,
    chat: Vec<ChatEntry>,
}

impl Room {
    pub fn new(id: impl Into<String>, config: RoomConfig) -> Self {
        let table_config = TableConfig {
            small_blind: config.small_blind,
            big_blind: config.big_blind,
            ..TableConfig::default()
        };
        Self {
            id: id.into(),
            config,
            table: Table::new(table_config),
            buyin_total: BTreeMap::new(),
            vacated: BTreeSet::new(),
            log: Vec::new(),
            chat: Vec::new(),
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn logs(&self) -> &[String] {
        &self.log
    }

    pub fn chat(&self) -> &[ChatEntry] {
        &self.chat
    }

    pub fn name_of(&self, sid: &str) -> Option<String> {
        self.table.players().find(|(_, p)| p.sid == sid).map(|(_, p)| p.name.clone())
    }

    fn seat_of(&self, sid: &str) -> Option<Seat> {
        self.table.players().find(|(_, p)| p.sid == sid).map(|(&s, _)| s)
    }

    /// Seats not marked vacated — the set `start_hand`'s gating counts,
    /// since a disconnected seat should neither block nor join a new hand.
    fn effective_seats(&self) -> Vec<Seat> {
        self.table
            .players()
            .map(|(&s, _)| s)
            .filter(|s| !self.vacated.contains(s))
            .collect()
    }

    fn push_log(&mut self, entry: impl Into<String>) {
        self.log.push(entry.into());
        if self.log.len() > MAX_LOG_ENTRIES {
            let excess = self.log.len() - MAX_LOG_ENTRIES;
            self.log.drain(0..excess);
        }
    }

    pub fn add_chat(&mut self, sid: &str, name: &str, text: &str) {
        let trimmed: String = text.chars().take(MAX_CHAT_CHARS).collect();
        self.chat.push(ChatEntry {
            sid: sid.to_string(),
            name: name.to_string(),
            text: trimmed,
        });
        if self.chat.len() > MAX_CHAT_ENTRIES {
            let excess = self.chat.len() - MAX_CHAT_ENTRIES;
            self.chat.drain(0..excess);
        }
    }

    /// Assigns the lowest free seat in `1..=max_seats`, failing with
    /// `RoomFull` past the last one.
    pub fn join(&mut self, sid: &str, name: &str, buyin: u64) -> Result<Seat, RoomError> {
        let taken: BTreeSet<Seat> = self.table.players().map(|(&s, _)| s).collect();
        let seat = (1..=self.config.max_seats)
            .find(|s| !taken.contains(s))
            .ok_or(RoomError::RoomFull)?;
        self.table
            .seat_player(seat, Player::new(sid, name, seat, buyin))?;
        self.buyin_total.insert(seat, buyin);
        self.push_log(format!("{name} joined seat {seat}"));
        info!(room_id = %self.id, seat, sid, "player_joined");
        Ok(seat)
    }

    /// Buy-ins are only accepted between hands, for a positive amount
    /// (spec §4.5).
    pub fn buyin(&mut self, sid: &str, amount: u64) -> Result<(), RoomError> {
        if self.table.stage != Stage::Waiting || amount == 0 {
            return Err(RoomError::BuyInInProgress);
        }
        let seat = self.seat_of(sid).ok_or(GameError::NotSeated)?;
        self.table.add_chips(seat, amount)?;
        *self.buyin_total.entry(seat).or_insert(0) += amount;
        debug!(room_id = %self.id, seat, amount, "buyin");
        Ok(())
    }

    pub fn set_ready(&mut self, sid: &str, ready: bool) -> Result<(), RoomError> {
        let seat = self.seat_of(sid).ok_or(GameError::NotSeated)?;
        self.table.set_ready(seat, ready)?;
        Ok(())
    }

    /// Gates `StartHand` on `>= 2` (non-vacated) players and every one of
    /// them ready (spec §4.5); `Table::start_hand` itself still checks
    /// `¬started` and the chip-count precondition.
    pub fn start_hand(&mut self) -> Result<(), RoomError> {
        let seats = self.effective_seats();
        if seats.len() < 2 {
            return Err(RoomError::MinPlayers);
        }
        if !seats
            .iter()
            .all(|&s| self.table.player(s).is_some_and(|p| p.ready))
        {
            return Err(RoomError::NotReady);
        }
        self.table.start_hand()?;
        info!(room_id = %self.id, hand_no = self.table.hand_no, "hand_started");
        Ok(())
    }

    pub fn apply_action(&mut self, sid: &str, input: ActionInput) -> Result<ApplyOutcome, GameError> {
        let outcome = self.table.apply_action(sid, input)?;
        info!(room_id = %self.id, sid, ?input, ?outcome, "action_applied");
        if self.table.stage == Stage::Waiting {
            self.on_hand_ended();
        }
        Ok(outcome)
    }

    /// Auto-folds `sid` if it held `actionSeat`, then either removes the
    /// seat immediately (no hand in progress) or marks it vacated for
    /// removal at the next between-hands reset.
    pub fn leave(&mut self, sid: &str) {
        let Some(seat) = self.seat_of(sid) else { return };
        if self.table.stage == Stage::Waiting {
            self.table.remove_seat(seat);
            self.buyin_total.remove(&seat);
            self.vacated.remove(&seat);
        } else {
            if self.table.action_seat == Some(seat) {
                let _ = self.table.force_fold_action_seat();
            }
            let _ = self.table.set_ready(seat, false);
            self.vacated.insert(seat);
        }
        self.push_log(format!("seat {seat} left"));
        info!(room_id = %self.id, seat, "player_left");
        if self.table.stage == Stage::Waiting {
            self.on_hand_ended();
        }
    }

    /// Resets every `ready` flag and sweeps seats vacated mid-hand, run
    /// once a hand returns to `waiting` (spec §4.5's re-ready rule).
    fn on_hand_ended(&mut self) {
        for seat in std::mem::take(&mut self.vacated) {
            self.table.remove_seat(seat);
            self.buyin_total.remove(&seat);
        }
        let seats: Vec<Seat> = self.table.players().map(|(&s, _)| s).collect();
        for seat in seats {
            let _ = self.table.set_ready(seat, false);
        }
    }

    pub fn public_state(&self) -> RoomPublicState {
        let inner = self.table.public_state();
        let players = inner
            .players
            .into_iter()
            .map(|p| {
                let buyin_total = self.buyin_total.get(&p.seat).copied().unwrap_or(0);
                RoomPlayerView {
                    net: p.chips as i64 - buyin_total as i64,
                    buyin_total,
                    seat: p.seat,
                    name: p.name,
                    chips: p.chips,
                    bet: p.bet,
                    total_bet: p.total_bet,
                    folded: p.folded,
                    all_in: p.all_in,
                    ready: p.ready,
                    last_action: p.last_action,
                }
            })
            .collect();
        RoomPublicState {
            hand_no: inner.hand_no,
            stage: inner.stage,
            dealer_seat: inner.dealer_seat,
            sb_seat: inner.sb_seat,
            bb_seat: inner.bb_seat,
            utg_seat: inner.utg_seat,
            action_seat: inner.action_seat,
            pot: inner.pot,
            board: inner.board,
            current_bet: inner.current_bet,
            min_raise: inner.min_raise,
            players,
            showdown: inner.showdown,
        }
    }

    pub fn private_state(&self, sid: &str) -> PrivateState {
        self.table.private_state(sid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> Room {
        Room::new("r1", RoomConfig::default())
    }

    #[test]
    fn join_assigns_lowest_free_seat() {
        let mut r = room();
        assert_eq!(r.join("a", "Alice", 1000).unwrap(), 1);
        assert_eq!(r.join("b", "Bob", 1000).unwrap(), 2);
        r.leave("a");
        assert_eq!(r.join("c", "Carol", 1000).unwrap(), 1);
    }

    #[test]
    fn tenth_join_is_room_full() {
        let mut r = room();
        for i in 1..=9 {
            r.join(&format!("p{i}"), "p", 1000).unwrap();
        }
        let err = r.join("p10", "p", 1000).unwrap_err();
        assert_eq!(err, RoomError::RoomFull);
    }

    #[test]
    fn start_hand_requires_min_players_and_ready() {
        let mut r = room();
        r.join("a", "Alice", 1000).unwrap();
        assert_eq!(r.start_hand().unwrap_err(), RoomError::MinPlayers);

        r.join("b", "Bob", 1000).unwrap();
        assert_eq!(r.start_hand().unwrap_err(), RoomError::NotReady);

        r.set_ready("a", true).unwrap();
        r.set_ready("b", true).unwrap();
        r.start_hand().unwrap();
        assert_eq!(r.table().stage, Stage::Preflop);
    }

    #[test]
    fn buyin_rejected_once_hand_started() {
        let mut r = room();
        r.join("a", "Alice", 1000).unwrap();
        r.join("b", "Bob", 1000).unwrap();
        r.set_ready("a", true).unwrap();
        r.set_ready("b", true).unwrap();
        r.start_hand().unwrap();
        assert_eq!(r.buyin("a", 500).unwrap_err(), RoomError::BuyInInProgress);
    }

    #[test]
    fn leave_during_own_turn_auto_folds() {
        let mut r = room();
        r.join("a", "Alice", 1000).unwrap();
        r.join("b", "Bob", 1000).unwrap();
        r.set_ready("a", true).unwrap();
        r.set_ready("b", true).unwrap();
        r.start_hand().unwrap();
        let acting_sid = if r.table().action_seat == Some(1) { "a" } else { "b" };
        r.leave(acting_sid);
        assert_eq!(r.table().stage, Stage::Waiting);
    }

    #[test]
    fn leave_mid_hand_off_turn_is_deferred() {
        let mut r = room();
        r.join("a", "Alice", 1000).unwrap();
        r.join("b", "Bob", 1000).unwrap();
        r.join("c", "Carol", 1000).unwrap();
        r.set_ready("a", true).unwrap();
        r.set_ready("b", true).unwrap();
        r.set_ready("c", true).unwrap();
        r.start_hand().unwrap();
        let off_turn_sid = ["a", "b", "c"]
            .into_iter()
            .find(|sid| r.seat_of(sid) != r.table().action_seat)
            .unwrap();
        r.leave(off_turn_sid);
        // still seated in the engine (contributions must fund the pot),
        // but marked vacated so it can't be counted toward the next hand.
        assert!(r.table().player(r.seat_of(off_turn_sid).unwrap_or(99)).is_some());
        assert_eq!(r.effective_seats().len(), 2);
    }

    #[test]
    fn ready_resets_after_hand_ends() {
        let mut r = room();
        r.join("a", "Alice", 1000).unwrap();
        r.join("b", "Bob", 1000).unwrap();
        r.set_ready("a", true).unwrap();
        r.set_ready("b", true).unwrap();
        r.start_hand().unwrap();
        let acting_sid = if r.table().action_seat == Some(1) { "a" } else { "b" };
        r.apply_action(acting_sid, ActionInput::Fold).unwrap();
        assert_eq!(r.table().stage, Stage::Waiting);
        assert!(r.table().players().all(|(_, p)| !p.ready));
    }

    #[test]
    fn chat_is_bounded_to_200_entries() {
        let mut r = room();
        for i in 0..250 {
            r.add_chat("a", "Alice", &format!("msg {i}"));
        }
        assert_eq!(r.chat().len(), 200);
        assert_eq!(r.chat().first().unwrap().text, "msg 50");
    }

    #[test]
    fn chat_text_is_trimmed_to_300_chars() {
        let mut r = room();
        r.add_chat("a", "Alice", &"x".repeat(400));
        assert_eq!(r.chat()[0].text.len(), 300);
    }
}
