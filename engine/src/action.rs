use serde::{Deserialize, Serialize};

/// `{type, amount?}` from spec §6. For `Raise`, `amount` is the absolute
/// raise-TO value, not an increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionInput {
    Fold,
    Check,
    Call,
    Raise { amount: u64 },
}

/// What happened to the table as a result of applying an action, so a
/// caller (the Room) knows whether to keep soliciting actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Betting round continues; `action_seat` has moved to the next
    /// seat in `toAct`.
    Continue,
    /// The round (and possibly several streets) advanced; the hand may
    /// now be at showdown.
    Advanced,
    /// Only one non-folded player remained; they were awarded the pot
    /// and the table returned to `waiting`.
    HandEndedEarly,
}
