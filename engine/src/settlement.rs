//! Side-pot construction and showdown payout (spec §4.4).

use std::collections::BTreeMap;

use crate::evaluator::HandScore;
use crate::seat::Seat;

/// Result of resolving a showdown.
#[derive(Debug, Clone)]
pub struct HandResult {
    pub winners: Vec<Seat>,
    pub payouts: BTreeMap<Seat, u64>,
    /// `(seat, score)` sorted ascending — best hand first.
    pub ranking: Vec<(Seat, HandScore)>,
}

/// Builds side pots from each player's total contribution this hand and
/// awards each layer to the best-scoring eligible (non-folded)
/// contributor, splitting ties evenly and handing any remainder one
/// chip at a time to the lowest seats (deterministic).
///
/// `totals` includes folded players — their chips still fund pots they
/// are no longer eligible to win. `scores` need only cover contenders
/// (non-folded players); callers pass every seat still in the hand.
pub fn resolve_side_pots(
    totals: &BTreeMap<Seat, u64>,
    contenders: &[Seat],
    scores: &BTreeMap<Seat, HandScore>,
) -> HandResult {
    let mut payouts: BTreeMap<Seat, u64> = totals.keys().map(|&s| (s, 0)).collect();

    if contenders.len() == 1 {
        let winner = contenders[0];
        let pot: u64 = totals.values().sum();
        payouts.insert(winner, pot);
        let ranking = vec![(winner, scores[&winner])];
        return HandResult {
            winners: vec![winner],
            payouts,
            ranking,
        };
    }

    let mut levels: Vec<u64> = totals.values().copied().filter(|&t| t > 0).collect();
    levels.sort_unstable();
    levels.dedup();

    let mut prev = 0u64;
    for level in levels {
        let contributors: Vec<Seat> = totals
            .iter()
            .filter(|&(_, &t)| t >= level)
            .map(|(&s, _)| s)
            .collect();
        let pot_amount = (level - prev) * contributors.len() as u64;
        prev = level;

        let mut eligible: Vec<Seat> = contributors
            .into_iter()
            .filter(|s| contenders.contains(s))
            .collect();
        if eligible.is_empty() {
            continue;
        }
        eligible.sort_unstable();

        let best_score = eligible.iter().map(|s| scores[s]).min().unwrap();
        let winners: Vec<Seat> = eligible
            .into_iter()
            .filter(|s| scores[s] == best_score)
            .collect();

        let share = pot_amount / winners.len() as u64;
        let remainder = pot_amount - share * winners.len() as u64;
        for &w in &winners {
            *payouts.get_mut(&w).unwrap() += share;
        }
        for &w in winners.iter().take(remainder as usize) {
            *payouts.get_mut(&w).unwrap() += 1;
        }
    }

    let mut ranking: Vec<(Seat, HandScore)> = contenders.iter().map(|&s| (s, scores[&s])).collect();
    ranking.sort_by_key(|&(_, score)| score);

    let winners = payouts
        .iter()
        .filter(|&(seat, &amt)| amt > 0 && contenders.contains(seat))
        .map(|(&s, _)| s)
        .collect();

    HandResult {
        winners,
        payouts,
        ranking,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::HandCategory;

    fn score(rank: u8) -> HandScore {
        // Ranks 0..5 map to distinct, strictly increasing-strength
        // categories so tests can express "s1 beats s2" without
        // constructing real cards.
        let categories = [
            HandCategory::StraightFlush,
            HandCategory::FourOfAKind,
            HandCategory::FullHouse,
            HandCategory::Flush,
            HandCategory::Straight,
            HandCategory::ThreeOfAKind,
        ];
        let cat = categories[rank as usize % categories.len()];
        HandScore::new(cat, &[])
    }

    #[test]
    fn single_contender_wins_everything() {
        let totals = BTreeMap::from([(1, 100u64), (2, 50)]);
        let scores = BTreeMap::from([(1, score(0))]);
        let result = resolve_side_pots(&totals, &[1], &scores);
        assert_eq!(result.payouts[&1], 150);
        assert_eq!(result.winners, vec![1]);
    }

    #[test]
    fn equal_total_bets_all_to_best_score() {
        // scenario #4 from spec.md: three equal 300 stacks, s1 < s2 < s3
        // (s1 strongest per "lower is stronger").
        let totals = BTreeMap::from([(1, 300u64), (2, 300), (3, 300)]);
        let scores = BTreeMap::from([(1, score(0)), (2, score(1)), (3, score(2))]);
        let result = resolve_side_pots(&totals, &[1, 2, 3], &scores);
        assert_eq!(result.payouts[&1], 900);
        assert_eq!(result.payouts.get(&2).copied().unwrap_or(0), 0);
        assert_eq!(result.payouts.get(&3).copied().unwrap_or(0), 0);
    }

    #[test]
    fn side_pot_isolation_with_folded_contributor() {
        // scenario #5 from spec.md: totals 50/200/200/200, seat1 folded,
        // others tie for best score.
        let totals = BTreeMap::from([(1, 50u64), (2, 200), (3, 200), (4, 200)]);
        let tie = score(0);
        let scores = BTreeMap::from([(2, tie), (3, tie), (4, tie)]);
        let result = resolve_side_pots(&totals, &[2, 3, 4], &scores);
        // main pot: 50 * 4 = 200 split 3 ways -> 66,66,68 with remainder
        // to lowest seat; side pot: 150 * 3 = 450 split evenly -> 150 each.
        let total_paid: u64 = result.payouts.values().sum();
        assert_eq!(total_paid, 50 * 4 + 150 * 3);
        assert!(result.payouts[&2] >= result.payouts[&3]);
        assert_eq!(result.payouts.get(&1).copied().unwrap_or(0), 0);
    }

    #[test]
    fn chip_conservation_holds() {
        let totals = BTreeMap::from([(1, 100u64), (2, 1000), (3, 1000)]);
        let scores = BTreeMap::from([(1, score(4)), (2, score(1)), (3, score(0))]);
        let result = resolve_side_pots(&totals, &[1, 2, 3], &scores);
        let pot: u64 = totals.values().sum();
        let paid: u64 = result.payouts.values().sum();
        assert_eq!(pot, paid);
    }
}
