use thiserror::Error;

/// Room-level protocol violations: properties of seating and readiness
/// rather than of a hand in progress, so they stay separate from
/// `texas_engine::GameError` even though both surface at the same
/// websocket boundary (spec §6).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoomError {
    #[error("not every seated player is ready")]
    NotReady,
    #[error("room is full")]
    RoomFull,
    #[error("buy-ins are only allowed between hands, for a positive amount")]
    BuyInInProgress,
    #[error("at least 2 players are required to start a hand")]
    MinPlayers,
    #[error(transparent)]
    Engine(#[from] texas_engine::GameError),
}
