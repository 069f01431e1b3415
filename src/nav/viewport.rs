//! Scroll window over a list that may be taller than the rows available.

use std::ops::Range;

/// Compute the scroll offset that keeps `position` visible.
///
/// Minimal-scroll semantics: the previous `offset` is kept when `position` is
/// already inside `[offset, offset + capacity)`, otherwise the window moves just
/// far enough to show it. The result never exceeds `total - capacity`.
pub fn scroll_offset(offset: usize, position: usize, capacity: usize, total: usize) -> usize {
    let capacity = capacity.max(1);
    if total <= capacity {
        return 0;
    }
    let max_offset = total - capacity;
    let position = position.min(total - 1);
    let offset = offset.min(max_offset);

    if position < offset {
        position
    } else if position >= offset + capacity {
        position + 1 - capacity
    } else {
        offset
    }
}

/// Derived scroll state for a list.
///
/// Never mutated directly; a new value is produced by [`Viewport::recompute`]
/// whenever the cursor or the item count changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    offset: usize,
    capacity: usize,
    total: usize,
}

impl Viewport {
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0, "viewport capacity must be positive");
        Self {
            offset: 0,
            capacity,
            total: 0,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Same window start with room for `capacity` rows. Follow with
    /// [`Viewport::recompute`] to pull the window back around the cursor.
    #[must_use]
    pub fn resized(self, capacity: usize) -> Self {
        debug_assert!(capacity > 0, "viewport capacity must be positive");
        Self { capacity, ..self }
    }

    /// Re-derive the window for `position` within `total` items.
    #[must_use]
    pub fn recompute(self, position: usize, total: usize) -> Self {
        Self {
            offset: scroll_offset(self.offset, position, self.capacity, total),
            capacity: self.capacity,
            total,
        }
    }

    /// Indices currently on screen.
    pub fn visible_range(&self) -> Range<usize> {
        let end = (self.offset + self.capacity.max(1)).min(self.total);
        self.offset.min(end)..end
    }

    pub fn is_visible(&self, index: usize) -> bool {
        self.visible_range().contains(&index)
    }

    /// Whether some items are scrolled out of view.
    pub fn overflows(&self) -> bool {
        self.total > self.capacity
    }

    /// Footer text like `4-13 of 15`, only when the list overflows.
    pub fn scroll_hint(&self) -> Option<String> {
        if !self.overflows() {
            return None;
        }
        let range = self.visible_range();
        Some(format!("{}-{} of {}", range.start + 1, range.end, self.total))
    }
}
