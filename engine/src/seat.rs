//! Seat-cyclic iteration primitives. Every traversal in the betting
//! protocol (dealer rotation, blind assignment, first-to-act, rebuilding
//! `toAct` after a raise) is built from these two functions rather than
//! duplicating modular arithmetic at each call site.

/// A table seat: a small positive integer, stable across hands. Gaps
/// are allowed; "seat order" is numeric ascending, treated cyclically.
pub type Seat = u32;

/// Returns `seats` sorted ascending and rotated so that `start` comes
/// first. If `start` is not present in `seats` (the designated
/// first-to-act just folded or went all-in on the posting blind, say),
/// the rotation is a no-op and the sorted order is returned as-is —
/// matching `_seat_order`'s fallback in the reference implementation.
pub fn cyclic_from(seats: &[Seat], start: Seat) -> Vec<Seat> {
    if seats.is_empty() {
        return Vec::new();
    }
    let mut sorted: Vec<Seat> = seats.to_vec();
    sorted.sort_unstable();
    let start_idx = sorted.iter().position(|&s| s == start).unwrap_or(0);
    let mut rotated = Vec::with_capacity(sorted.len());
    rotated.extend_from_slice(&sorted[start_idx..]);
    rotated.extend_from_slice(&sorted[..start_idx]);
    rotated
}

/// The seat cyclically after `current` among `seats`. `current` is
/// always a genuine member at every call site (dealer, blind seats, a
/// raiser); absence falls back to the lowest seat, same as
/// `_next_seat` in the reference implementation.
pub fn next_seat(seats: &[Seat], current: Seat) -> Seat {
    let mut sorted: Vec<Seat> = seats.to_vec();
    sorted.sort_unstable();
    match sorted.iter().position(|&s| s == current) {
        Some(idx) => sorted[(idx + 1) % sorted.len()],
        None => sorted[0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotates_from_start() {
        assert_eq!(cyclic_from(&[1, 3, 5, 7], 5), vec![5, 7, 1, 3]);
    }

    #[test]
    fn missing_start_falls_back_to_sorted_order() {
        assert_eq!(cyclic_from(&[3, 1, 2], 9), vec![1, 2, 3]);
    }

    #[test]
    fn next_seat_wraps_around() {
        assert_eq!(next_seat(&[1, 2, 3], 3), 1);
        assert_eq!(next_seat(&[1, 2, 3], 1), 2);
    }

    #[test]
    fn next_seat_missing_current_returns_lowest() {
        assert_eq!(next_seat(&[2, 4, 6], 5), 2);
    }
}
