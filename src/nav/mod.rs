//! Navigation primitives shared by every modal.
//!
//! A modal composes a [`FocusRing`] (which field owns input), one or more
//! [`Cycle`] enums (small closed choices), and a [`ListNav`] for lists that can
//! outgrow their viewport.

pub mod cursor;
pub mod cycle;
pub mod focus;
pub mod list;
pub mod viewport;

pub use cursor::Cursor;
pub use cycle::Cycle;
pub use focus::{Boundary, FocusRing};
pub use list::ListNav;
pub use viewport::Viewport;

/// Direction of a navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// Signed unit step for this direction.
    pub fn delta(self) -> isize {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }

    pub fn reverse(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_delta() {
        assert_eq!(Direction::Forward.delta(), 1);
        assert_eq!(Direction::Backward.delta(), -1);
    }

    #[test]
    fn test_direction_reverse() {
        assert_eq!(Direction::Forward.reverse(), Direction::Backward);
        assert_eq!(Direction::Backward.reverse(), Direction::Forward);
    }
}
