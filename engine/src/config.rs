/// Blinds are fixed for the life of a `Table` (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    pub small_blind: u64,
    pub big_blind: u64,
    /// Whether a short all-in raise (below the minimum raise increment)
    /// reopens action to players who already acted this round. The
    /// source behavior reopens unconditionally; tournament rulesets
    /// usually do not. See spec §9's Open Question.
    pub short_all_in_reopens: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            small_blind: 5,
            big_blind: 10,
            short_all_in_reopens: true,
        }
    }
}
