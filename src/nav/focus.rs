//! Focus ring over conditionally enabled targets.

use std::fmt::Debug;

use super::Direction;

/// What happens when a focus step runs off either end of the ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Boundary {
    /// Jump to the opposite end.
    #[default]
    Wrap,
    /// Stay on the last reachable target.
    Clamp,
}

/// Ordered focus targets with one current target.
///
/// The ring never stores which targets are enabled. Callers pass an
/// `enabled` predicate into every step so that flag changes (including ones
/// that depend on another target's value) apply on the very next move.
/// Disabling the focused target does not move focus by itself; the next step
/// skips over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusRing<T: 'static> {
    order: &'static [T],
    current: T,
}

impl<T> FocusRing<T>
where
    T: Copy + Eq + Debug + 'static,
{
    pub fn new(order: &'static [T], current: T) -> Self {
        debug_assert!(order.contains(&current), "{current:?} is not in the ring");
        Self { order, current }
    }

    /// Ring focused on the first enabled target, or on the first target when
    /// none are enabled.
    pub fn first_enabled(order: &'static [T], enabled: impl Fn(T) -> bool) -> Self {
        debug_assert!(!order.is_empty(), "focus ring needs at least one target");
        let current = order
            .iter()
            .copied()
            .find(|t| enabled(*t))
            .unwrap_or(order[0]);
        Self { order, current }
    }

    pub fn current(&self) -> T {
        self.current
    }

    pub fn is_focused(&self, target: T) -> bool {
        self.current == target
    }

    /// Focus a target directly. Targets outside the ring are ignored.
    pub fn focus(&mut self, target: T) {
        if self.order.contains(&target) {
            self.current = target;
        }
    }

    /// Advance to the next enabled target, wrapping at the end.
    pub fn next(&mut self, enabled: impl Fn(T) -> bool) -> bool {
        self.step(Direction::Forward, Boundary::Wrap, enabled)
    }

    /// Retreat to the previous enabled target, wrapping at the start.
    pub fn prev(&mut self, enabled: impl Fn(T) -> bool) -> bool {
        self.step(Direction::Backward, Boundary::Wrap, enabled)
    }

    /// Step to the nearest enabled target in `direction`.
    ///
    /// Returns false (focus unchanged) when no other enabled target is
    /// reachable under `boundary`.
    pub fn step(
        &mut self,
        direction: Direction,
        boundary: Boundary,
        enabled: impl Fn(T) -> bool,
    ) -> bool {
        let len = self.order.len();
        let Some(start) = self.order.iter().position(|t| *t == self.current) else {
            return false;
        };

        let candidates: Box<dyn Iterator<Item = usize>> = match (direction, boundary) {
            (Direction::Forward, Boundary::Wrap) => {
                Box::new((1..len).map(move |i| (start + i) % len))
            }
            (Direction::Backward, Boundary::Wrap) => {
                Box::new((1..len).map(move |i| (start + len - i) % len))
            }
            (Direction::Forward, Boundary::Clamp) => Box::new(start + 1..len),
            (Direction::Backward, Boundary::Clamp) => Box::new((0..start).rev()),
        };

        for index in candidates {
            let target = self.order[index];
            if enabled(target) {
                self.current = target;
                return true;
            }
        }
        false
    }

    /// The live ring: enabled targets in order.
    pub fn enabled_targets(&self, enabled: impl Fn(T) -> bool) -> Vec<T> {
        self.order.iter().copied().filter(|t| enabled(*t)).collect()
    }

    /// 1-based position of the focused target among enabled targets, with the
    /// enabled count. `None` while focus rests on a disabled target.
    pub fn ordinal(&self, enabled: impl Fn(T) -> bool) -> Option<(usize, usize)> {
        let live = self.enabled_targets(enabled);
        live.iter()
            .position(|t| *t == self.current)
            .map(|i| (i + 1, live.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Field {
        List,
        Base,
        Autonomous,
        Branch,
        Container,
    }

    const FIELDS: &[Field] = &[
        Field::List,
        Field::Base,
        Field::Autonomous,
        Field::Branch,
        Field::Container,
    ];

    struct Flags {
        locked: bool,
        autonomous: bool,
    }

    impl Flags {
        fn enabled(&self, field: Field) -> bool {
            match field {
                Field::List => !self.locked,
                Field::Branch | Field::Container => !self.autonomous,
                _ => true,
            }
        }
    }

    #[test]
    fn test_next_visits_every_target_and_wraps() {
        let mut ring = FocusRing::new(FIELDS, Field::List);
        let mut seen = vec![ring.current()];
        for _ in 0..5 {
            ring.next(|_| true);
            seen.push(ring.current());
        }
        assert_eq!(
            seen,
            vec![
                Field::List,
                Field::Base,
                Field::Autonomous,
                Field::Branch,
                Field::Container,
                Field::List
            ]
        );
    }

    #[test]
    fn test_prev_wraps_to_last() {
        let mut ring = FocusRing::new(FIELDS, Field::List);
        assert!(ring.prev(|_| true));
        assert_eq!(ring.current(), Field::Container);
    }

    #[test]
    fn test_autonomous_skips_branch_and_container() {
        let mut flags = Flags {
            locked: false,
            autonomous: false,
        };
        let mut ring = FocusRing::new(FIELDS, Field::Base);

        ring.next(|f| flags.enabled(f));
        assert_eq!(ring.current(), Field::Autonomous);

        flags.autonomous = true;
        ring.next(|f| flags.enabled(f));
        assert_eq!(ring.current(), Field::List);
    }

    #[test]
    fn test_disabling_focused_target_does_not_move_focus() {
        let mut flags = Flags {
            locked: false,
            autonomous: false,
        };
        let mut ring = FocusRing::new(FIELDS, Field::Branch);
        flags.autonomous = true;
        assert_eq!(ring.current(), Field::Branch);
        assert_eq!(ring.ordinal(|f| flags.enabled(f)), None);

        ring.next(|f| flags.enabled(f));
        assert_eq!(ring.current(), Field::List);
    }

    #[test]
    fn test_prev_from_disabled_target_lands_on_enabled_one() {
        let flags = Flags {
            locked: false,
            autonomous: true,
        };
        let mut ring = FocusRing::new(FIELDS, Field::Container);
        ring.prev(|f| flags.enabled(f));
        assert_eq!(ring.current(), Field::Autonomous);
    }

    #[test]
    fn test_ring_closes_over_enabled_subset() {
        let flags = Flags {
            locked: true,
            autonomous: true,
        };
        let enabled = |f| flags.enabled(f);
        let mut ring = FocusRing::new(FIELDS, Field::Base);
        let live = ring.enabled_targets(enabled);
        assert_eq!(live, vec![Field::Base, Field::Autonomous]);

        for _ in 0..live.len() {
            ring.next(enabled);
            assert!(enabled(ring.current()));
        }
        assert_eq!(ring.current(), Field::Base);

        for _ in 0..live.len() {
            ring.prev(enabled);
        }
        assert_eq!(ring.current(), Field::Base);
    }

    #[test]
    fn test_locked_list_renumbers_ring() {
        let flags = Flags {
            locked: true,
            autonomous: false,
        };
        let ring = FocusRing::first_enabled(FIELDS, |f| flags.enabled(f));
        assert_eq!(ring.current(), Field::Base);
        assert_eq!(ring.ordinal(|f| flags.enabled(f)), Some((1, 4)));
    }

    #[test]
    fn test_no_other_enabled_target_keeps_focus() {
        let mut ring = FocusRing::new(FIELDS, Field::Autonomous);
        let only_autonomous = |f: Field| f == Field::Autonomous;
        assert!(!ring.next(only_autonomous));
        assert!(!ring.prev(only_autonomous));
        assert_eq!(ring.current(), Field::Autonomous);
    }

    #[test]
    fn test_clamp_stops_at_ends() {
        let mut ring = FocusRing::new(FIELDS, Field::Branch);
        assert!(ring.step(Direction::Forward, Boundary::Clamp, |_| true));
        assert_eq!(ring.current(), Field::Container);
        assert!(!ring.step(Direction::Forward, Boundary::Clamp, |_| true));
        assert_eq!(ring.current(), Field::Container);

        let mut ring = FocusRing::new(FIELDS, Field::List);
        assert!(!ring.step(Direction::Backward, Boundary::Clamp, |_| true));
        assert_eq!(ring.current(), Field::List);
    }

    #[test]
    fn test_clamp_skips_disabled_but_does_not_wrap() {
        let flags = Flags {
            locked: false,
            autonomous: true,
        };
        let mut ring = FocusRing::new(FIELDS, Field::Autonomous);
        assert!(!ring.step(Direction::Forward, Boundary::Clamp, |f| flags.enabled(f)));
        assert_eq!(ring.current(), Field::Autonomous);
    }

    #[test]
    fn test_focus_ignores_unknown_target() {
        const SHORT: &[Field] = &[Field::Base, Field::Autonomous];
        let mut ring = FocusRing::new(SHORT, Field::Base);
        ring.focus(Field::Container);
        assert_eq!(ring.current(), Field::Base);
        ring.focus(Field::Autonomous);
        assert!(ring.is_focused(Field::Autonomous));
    }
}
