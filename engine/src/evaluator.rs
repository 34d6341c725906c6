//! Hand evaluation: scoring any 5-of-7 card selection so that hands
//! compare by score alone, lower score stronger (spec §4.3).

use std::collections::HashMap;

use itertools::Itertools;

use crate::card::{Card, Rank};

/// Hand category, ordered weakest to strongest so `Ord` reads naturally
/// next to the kicker comparison (`StraightFlush` beats `HighCard`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandCategory {
    HighCard,
    OnePair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
}

/// A fully-ordered hand score. **Lower is stronger**, per spec §4.3's
/// external contract — the packed internal representation (category
/// dominant, highest first; then up to 5 kicker ranks, most significant
/// first) is inverted so the comparison reads correctly without every
/// call site having to remember which direction is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandScore(u32);

impl HandScore {
    fn pack(category: HandCategory, kickers: &[Rank]) -> u32 {
        let mut packed: u32 = category as u32;
        for i in 0..5 {
            packed <<= 4;
            if let Some(r) = kickers.get(i) {
                packed |= r.value() as u32;
            }
        }
        packed
    }

    pub(crate) fn new(category: HandCategory, kickers: &[Rank]) -> Self {
        let packed = Self::pack(category, kickers);
        HandScore(u32::MAX - packed)
    }

    pub fn category(self) -> HandCategory {
        let packed = u32::MAX - self.0;
        let bits = packed >> 20;
        match bits {
            0 => HandCategory::HighCard,
            1 => HandCategory::OnePair,
            2 => HandCategory::TwoPair,
            3 => HandCategory::ThreeOfAKind,
            4 => HandCategory::Straight,
            5 => HandCategory::Flush,
            6 => HandCategory::FullHouse,
            7 => HandCategory::FourOfAKind,
            _ => HandCategory::StraightFlush,
        }
    }
}

/// Evaluates a single 5-card hand.
fn evaluate_five(cards: &[Card; 5]) -> HandScore {
    let mut rank_counts: HashMap<Rank, u8> = HashMap::new();
    for c in cards {
        *rank_counts.entry(c.rank).or_insert(0) += 1;
    }
    let is_flush = cards.iter().all(|c| c.suit == cards[0].suit);

    let mut values: Vec<u8> = cards.iter().map(|c| c.rank.value()).collect();
    values.sort_unstable();
    values.dedup();
    let (is_straight, straight_high) = check_straight(&values);

    let mut by_count: Vec<(Rank, u8)> = rank_counts.into_iter().collect();
    // Sort by count desc, then rank desc, so the "best" group of each
    // size is first and kicker extraction is a simple scan.
    by_count.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));

    let counts: Vec<u8> = by_count.iter().map(|&(_, c)| c).collect();

    if is_flush && is_straight {
        return HandScore::new(HandCategory::StraightFlush, &[straight_high]);
    }
    if counts[0] == 4 {
        let quad = by_count[0].0;
        let kicker = by_count.iter().find(|&&(r, _)| r != quad).unwrap().0;
        return HandScore::new(HandCategory::FourOfAKind, &[quad, kicker]);
    }
    if counts[0] == 3 && counts.get(1).copied().unwrap_or(0) >= 2 {
        let trips = by_count[0].0;
        let pair = by_count[1].0;
        return HandScore::new(HandCategory::FullHouse, &[trips, pair]);
    }
    if is_flush {
        let mut ranks: Vec<Rank> = cards.iter().map(|c| c.rank).collect();
        ranks.sort_unstable_by(|a, b| b.cmp(a));
        return HandScore::new(HandCategory::Flush, &ranks);
    }
    if is_straight {
        return HandScore::new(HandCategory::Straight, &[straight_high]);
    }
    if counts[0] == 3 {
        let trips = by_count[0].0;
        let kickers: Vec<Rank> = by_count
            .iter()
            .filter(|&&(r, _)| r != trips)
            .map(|&(r, _)| r)
            .collect();
        return HandScore::new(HandCategory::ThreeOfAKind, &[trips, kickers[0], kickers[1]]);
    }
    if counts[0] == 2 && counts.get(1).copied().unwrap_or(0) == 2 {
        let high_pair = by_count[0].0;
        let low_pair = by_count[1].0;
        let kicker = by_count[2].0;
        return HandScore::new(HandCategory::TwoPair, &[high_pair, low_pair, kicker]);
    }
    if counts[0] == 2 {
        let pair = by_count[0].0;
        let kickers: Vec<Rank> = by_count
            .iter()
            .filter(|&&(r, _)| r != pair)
            .map(|&(r, _)| r)
            .collect();
        return HandScore::new(
            HandCategory::OnePair,
            &[pair, kickers[0], kickers[1], kickers[2]],
        );
    }

    let mut ranks: Vec<Rank> = cards.iter().map(|c| c.rank).collect();
    ranks.sort_unstable_by(|a, b| b.cmp(a));
    HandScore::new(HandCategory::HighCard, &ranks)
}

/// `values` must be sorted ascending and deduplicated. Returns whether
/// five consecutive ranks exist, and if so the high card of that run
/// (the wheel `A-2-3-4-5` scores its high card as `Five`).
fn check_straight(values: &[u8]) -> (bool, Rank) {
    let mut values = values.to_vec();
    if values.contains(&14) {
        values.insert(0, 1); // ace can also play low
    }

    let mut run = 1;
    let mut best_high = 0u8;
    for i in 1..values.len() {
        if values[i] == values[i - 1] + 1 {
            run += 1;
            if run >= 5 {
                best_high = values[i];
            }
        } else if values[i] != values[i - 1] {
            run = 1;
        }
    }

    if best_high > 0 {
        (true, Rank::from_value(best_high).unwrap())
    } else {
        (false, Rank::Two)
    }
}

/// Scores the best 5-of-7 hand formed from `hole` and `board`, returning
/// the winning score plus the 5 cards that produced it (`BestFive`,
/// spec §4.3 — used only for display).
pub fn best_five(hole: &[Card], board: &[Card]) -> (HandScore, [Card; 5]) {
    let mut all: Vec<Card> = Vec::with_capacity(hole.len() + board.len());
    all.extend_from_slice(hole);
    all.extend_from_slice(board);

    all.into_iter()
        .combinations(5)
        .map(|combo| {
            let five: [Card; 5] = combo.try_into().unwrap();
            (evaluate_five(&five), five)
        })
        .min_by_key(|(score, _)| *score)
        .expect("evaluating a hand requires at least 5 cards")
}

/// Scores the best 5-of-7 hand, discarding the winning combination.
pub fn score(hole: &[Card], board: &[Card]) -> HandScore {
    best_five(hole, board).0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Suit;

    fn card(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    #[test]
    fn royal_flush_beats_everything() {
        let hole = [card(Rank::Ace, Suit::Hearts), card(Rank::King, Suit::Hearts)];
        let board = [
            card(Rank::Queen, Suit::Hearts),
            card(Rank::Jack, Suit::Hearts),
            card(Rank::Ten, Suit::Hearts),
            card(Rank::Two, Suit::Diamonds),
            card(Rank::Three, Suit::Clubs),
        ];
        let s = score(&hole, &board);
        assert_eq!(s.category(), HandCategory::StraightFlush);
    }

    #[test]
    fn wheel_straight_scores_as_five_high() {
        let hole = [card(Rank::Ace, Suit::Spades), card(Rank::Two, Suit::Hearts)];
        let board = [
            card(Rank::Three, Suit::Diamonds),
            card(Rank::Four, Suit::Clubs),
            card(Rank::Five, Suit::Spades),
            card(Rank::Nine, Suit::Hearts),
            card(Rank::King, Suit::Diamonds),
        ];
        let s = score(&hole, &board);
        assert_eq!(s.category(), HandCategory::Straight);
    }

    #[test]
    fn two_pair_beats_one_pair() {
        let board = [
            card(Rank::Two, Suit::Clubs),
            card(Rank::Seven, Suit::Diamonds),
            card(Rank::Nine, Suit::Hearts),
            card(Rank::King, Suit::Spades),
            card(Rank::Four, Suit::Clubs),
        ];
        let two_pair = score(&[card(Rank::Two, Suit::Hearts), card(Rank::Seven, Suit::Clubs)], &board);
        let one_pair = score(&[card(Rank::Two, Suit::Spades), card(Rank::Three, Suit::Hearts)], &board);
        assert!(two_pair < one_pair);
    }

    #[test]
    fn kicker_breaks_tie_within_same_category() {
        let board = [
            card(Rank::Ace, Suit::Hearts),
            card(Rank::Ace, Suit::Diamonds),
            card(Rank::King, Suit::Clubs),
            card(Rank::Seven, Suit::Clubs),
            card(Rank::Two, Suit::Spades),
        ];
        let with_queen_kicker = score(&[card(Rank::Queen, Suit::Diamonds), card(Rank::Three, Suit::Clubs)], &board);
        let with_jack_kicker = score(&[card(Rank::Jack, Suit::Diamonds), card(Rank::Four, Suit::Clubs)], &board);
        assert!(with_queen_kicker < with_jack_kicker);
    }

    #[test]
    fn best_five_picks_the_winning_subset() {
        let hole = [card(Rank::Ace, Suit::Hearts), card(Rank::Ace, Suit::Spades)];
        let board = [
            card(Rank::Ace, Suit::Diamonds),
            card(Rank::Ace, Suit::Clubs),
            card(Rank::King, Suit::Hearts),
            card(Rank::Two, Suit::Diamonds),
            card(Rank::Three, Suit::Clubs),
        ];
        let (s, five) = best_five(&hole, &board);
        assert_eq!(s.category(), HandCategory::FourOfAKind);
        assert_eq!(five.iter().filter(|c| c.rank == Rank::Ace).count(), 4);
    }
}
