/// Generalized from the teacher's `RoomConfig` in `poker-ws/src/main.rs`;
/// `rebuy_hands`, `room_duration_sec` and `action_time_ms` are dropped,
/// not carried, since there is no rebuy/timebank/tournament-duration
/// feature left to drive them (see DESIGN.md).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomConfig {
    pub small_blind: u64,
    pub big_blind: u64,
    pub starting_buyin: u64,
    pub max_seats: u32,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            small_blind: 5,
            big_blind: 10,
            starting_buyin: 1000,
            max_seats: 9,
        }
    }
}
