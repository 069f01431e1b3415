//! Closed enumerations stepped by directional keys.
//!
//! The same value can be driven by two controls with different boundary
//! policies: single-letter keys (`h`/`l`) stop at the ends, while the
//! dedicated next/previous-field keys wrap around. Both paths are kept.

use super::Direction;

/// A small ordered enum that can be stepped through.
pub trait Cycle: Copy + Eq + 'static {
    /// Every variant, in display order.
    const ALL: &'static [Self];

    fn index(self) -> usize {
        Self::ALL.iter().position(|v| *v == self).unwrap_or(0)
    }

    fn is_first(self) -> bool {
        self.index() == 0
    }

    fn is_last(self) -> bool {
        self.index() + 1 == Self::ALL.len()
    }

    /// One step in `direction`, staying put past either end.
    #[must_use]
    fn step_clamped(self, direction: Direction) -> Self {
        let index = self.index();
        let next = match direction {
            Direction::Forward if index + 1 < Self::ALL.len() => index + 1,
            Direction::Backward if index > 0 => index - 1,
            _ => index,
        };
        Self::ALL[next]
    }

    /// One step in `direction`, wrapping from last to first and back.
    #[must_use]
    fn step_wrapping(self, direction: Direction) -> Self {
        let len = Self::ALL.len();
        let index = self.index();
        let next = match direction {
            Direction::Forward => (index + 1) % len,
            Direction::Backward => (index + len - 1) % len,
        };
        Self::ALL[next]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Kind {
        Attach,
        Prompt,
        Review,
        Remove,
    }

    impl Cycle for Kind {
        const ALL: &'static [Self] = &[Kind::Attach, Kind::Prompt, Kind::Review, Kind::Remove];
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Single {
        Only,
    }

    impl Cycle for Single {
        const ALL: &'static [Self] = &[Single::Only];
    }

    #[test]
    fn test_clamped_then_wrapping_scenario() {
        let mut kind = Kind::Attach;
        for _ in 0..3 {
            kind = kind.step_clamped(Direction::Forward);
        }
        assert_eq!(kind, Kind::Remove);

        kind = kind.step_clamped(Direction::Forward);
        assert_eq!(kind, Kind::Remove);

        kind = kind.step_wrapping(Direction::Forward);
        assert_eq!(kind, Kind::Attach);
    }

    #[test]
    fn test_clamped_backward_stops_at_first() {
        let mut kind = Kind::Prompt;
        for _ in 0..10 {
            kind = kind.step_clamped(Direction::Backward);
        }
        assert_eq!(kind, Kind::Attach);
    }

    #[test]
    fn test_clamped_forward_from_last_is_fixed_point() {
        let mut kind = Kind::Remove;
        for _ in 0..25 {
            kind = kind.step_clamped(Direction::Forward);
            assert_eq!(kind, Kind::Remove);
        }
    }

    #[test]
    fn test_wrapping_backward_from_first() {
        assert_eq!(Kind::Attach.step_wrapping(Direction::Backward), Kind::Remove);
    }

    #[test]
    fn test_wrapping_n_steps_returns_home() {
        for &start in Kind::ALL {
            for direction in [Direction::Forward, Direction::Backward] {
                let mut kind = start;
                for _ in 0..Kind::ALL.len() {
                    kind = kind.step_wrapping(direction);
                }
                assert_eq!(kind, start);
            }
        }
    }

    #[test]
    fn test_index_and_ends() {
        assert_eq!(Kind::Review.index(), 2);
        assert!(Kind::Attach.is_first());
        assert!(Kind::Remove.is_last());
        assert!(!Kind::Prompt.is_last());
    }

    #[test]
    fn test_single_variant_is_stable() {
        assert_eq!(Single::Only.step_wrapping(Direction::Forward), Single::Only);
        assert_eq!(Single::Only.step_clamped(Direction::Backward), Single::Only);
    }
}
