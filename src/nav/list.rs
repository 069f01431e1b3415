//! Cursor plus viewport for scrollable lists.

use super::{Cursor, Direction, Viewport};

/// Selection over a list that keeps its scroll window in sync.
///
/// Every mutation re-derives the viewport from the cursor, so the two can
/// never drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListNav {
    cursor: Cursor,
    viewport: Viewport,
}

impl ListNav {
    pub fn new(count: usize, capacity: usize) -> Self {
        let cursor = Cursor::new(count);
        let viewport = Viewport::new(capacity).recompute(0, count);
        Self { cursor, viewport }
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn selected(&self) -> usize {
        self.cursor.position()
    }

    pub fn is_empty(&self) -> bool {
        self.cursor.is_empty()
    }

    pub fn move_by(&mut self, delta: isize) -> bool {
        let moved = self.cursor.move_by(delta);
        self.sync();
        moved
    }

    pub fn step(&mut self, direction: Direction) -> bool {
        self.move_by(direction.delta())
    }

    /// Move a full viewport height.
    pub fn page(&mut self, direction: Direction) -> bool {
        let rows = self.viewport.capacity().max(1) as isize;
        self.move_by(direction.delta() * rows)
    }

    pub fn first(&mut self) {
        self.cursor.first();
        self.sync();
    }

    pub fn last(&mut self) {
        self.cursor.last();
        self.sync();
    }

    pub fn select(&mut self, index: usize) {
        self.cursor.select(index);
        self.sync();
    }

    /// Replace the item count after the backing list was swapped out.
    pub fn set_count(&mut self, count: usize) {
        self.cursor.set_count(count);
        self.sync();
    }

    /// Resize the window, e.g. after the terminal changed height.
    pub fn set_capacity(&mut self, capacity: usize) {
        if capacity == self.viewport.capacity() {
            return;
        }
        self.viewport = self.viewport.resized(capacity.max(1));
        self.sync();
    }

    fn sync(&mut self) {
        self.viewport = self
            .viewport
            .recompute(self.cursor.position(), self.cursor.count());
    }
}
