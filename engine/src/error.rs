use thiserror::Error;

/// Protocol violations and internal faults surfaced by the engine.
///
/// The boundary-facing variants (everything up to `UnknownAction`) are
/// protocol violations per spec §7: the caller sent a disallowed action,
/// state is left unchanged, and the room keeps running. `EngineFault`
/// is the other category: a contradiction the engine itself detected
/// (chip conservation broken, a showdown with no contenders). Callers
/// should treat `EngineFault` as fatal to the hand, never repaired.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("seat is not occupied")]
    NotSeated,
    #[error("hand has not started")]
    NotStarted,
    #[error("it is not this seat's turn to act")]
    NotYourTurn,
    #[error("seat has already folded")]
    AlreadyFolded,
    #[error("cannot check, a bet is outstanding")]
    CannotCheck,
    #[error("not enough chips for this action")]
    InsufficientChips,
    #[error("raise is below the minimum raise increment")]
    BelowMinRaise,
    #[error("unrecognized action type")]
    UnknownAction,
    #[error("action amount is missing or invalid")]
    InvalidAmount,
    #[error("internal engine invariant violated: {0}")]
    EngineFault(String),
}
