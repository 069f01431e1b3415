//! Bounded selection cursor.

use super::Direction;

/// Selection index over a list of `count` items.
///
/// Movement clamps at both ends; there is no wraparound. When the list is
/// empty the position is always 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    position: usize,
    count: usize,
}

impl Cursor {
    pub fn new(count: usize) -> Self {
        Self { position: 0, count }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Move by `delta` rows, clamping into `[0, count - 1]`.
    /// Returns true if the position changed.
    pub fn move_by(&mut self, delta: isize) -> bool {
        if self.count == 0 {
            return false;
        }
        let last = self.count - 1;
        let target = if delta.is_negative() {
            self.position.saturating_sub(delta.unsigned_abs())
        } else {
            self.position.saturating_add(delta.unsigned_abs()).min(last)
        };
        let moved = target != self.position;
        self.position = target;
        moved
    }

    /// Move selection up one row.
    pub fn move_up(&mut self) -> bool {
        self.move_by(-1)
    }

    /// Move selection down one row.
    pub fn move_down(&mut self) -> bool {
        self.move_by(1)
    }

    /// Jump to an index, clamped into range.
    pub fn select(&mut self, index: usize) {
        self.position = if self.count == 0 {
            0
        } else {
            index.min(self.count - 1)
        };
    }

    pub fn first(&mut self) {
        self.position = 0;
    }

    pub fn last(&mut self) {
        self.position = self.count.saturating_sub(1);
    }

    /// Replace the item count (e.g. the list was reloaded) and clamp the
    /// position into the new range.
    pub fn set_count(&mut self, count: usize) {
        self.count = count;
        self.select(self.position);
    }

    pub fn at_start(&self) -> bool {
        self.position == 0
    }

    pub fn at_end(&self) -> bool {
        self.position + 1 >= self.count
    }

    /// Whether a step in `direction` would be absorbed by the clamp.
    pub fn at_boundary(&self, direction: Direction) -> bool {
        match direction {
            Direction::Forward => self.at_end(),
            Direction::Backward => self.at_start(),
        }
    }
}
