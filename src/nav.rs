//! Clamped navigation over a fixed number of positions (pages or tabs).
//!
//! Pure data, no effects. Mutators clamp at both ends instead of wrapping.

use crate::types::Error;

/// A single navigation step, decoupled from the key that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Previous,
    Next,
    First,
    Last,
}

/// Current position within `[0, extent)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    current: usize,
    extent: usize,
}

impl NavigationState {
    /// Start at position 0 of `extent` positions.
    ///
    /// # Errors
    /// `EmptyExtent` if `extent` is zero.
    pub fn new(extent: usize) -> Result<Self, Error> {
        if extent == 0 {
            return Err(Error::EmptyExtent);
        }
        Ok(Self { current: 0, extent })
    }

    pub fn next(&mut self) {
        if self.current < self.extent - 1 {
            self.current += 1;
        }
    }

    pub fn previous(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    pub fn first(&mut self) {
        self.current = 0;
    }

    pub fn last(&mut self) {
        self.current = self.extent - 1;
    }

    /// Zero-based current position.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Number of positions. Always at least 1.
    pub fn extent(&self) -> usize {
        self.extent
    }

    pub fn apply(&mut self, nav: Nav) {
        match nav {
            Nav::Previous => self.previous(),
            Nav::Next => self.next(),
            Nav::First => self.first(),
            Nav::Last => self.last(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_extent_is_rejected() {
        assert!(matches!(NavigationState::new(0), Err(Error::EmptyExtent)));
    }

    #[test]
    fn starts_at_zero() {
        let nav = NavigationState::new(4).unwrap();
        assert_eq!(nav.current(), 0);
        assert_eq!(nav.extent(), 4);
    }

    #[test]
    fn next_clamps_at_last_position() {
        let mut nav = NavigationState::new(3).unwrap();
        nav.next();
        nav.next();
        assert_eq!(nav.current(), 2);
        nav.next();
        nav.next();
        assert_eq!(nav.current(), 2);
    }

    #[test]
    fn previous_clamps_at_zero() {
        let mut nav = NavigationState::new(3).unwrap();
        nav.previous();
        assert_eq!(nav.current(), 0);
        nav.next();
        nav.previous();
        nav.previous();
        assert_eq!(nav.current(), 0);
    }

    #[test]
    fn first_then_previous_stays_at_zero() {
        let mut nav = NavigationState::new(7).unwrap();
        nav.last();
        nav.first();
        for _ in 0..10 {
            nav.previous();
        }
        assert_eq!(nav.current(), 0);
    }

    #[test]
    fn last_then_next_stays_at_end() {
        let mut nav = NavigationState::new(7).unwrap();
        nav.last();
        for _ in 0..10 {
            nav.next();
        }
        assert_eq!(nav.current(), 6);
    }

    #[test]
    fn single_position_never_moves() {
        let mut nav = NavigationState::new(1).unwrap();
        for step in [Nav::Next, Nav::Last, Nav::Previous, Nav::First] {
            nav.apply(step);
            assert_eq!(nav.current(), 0);
        }
    }

    #[test]
    fn apply_dispatches_each_step() {
        let mut nav = NavigationState::new(5).unwrap();
        nav.apply(Nav::Last);
        assert_eq!(nav.current(), 4);
        nav.apply(Nav::Previous);
        assert_eq!(nav.current(), 3);
        nav.apply(Nav::First);
        assert_eq!(nav.current(), 0);
        nav.apply(Nav::Next);
        assert_eq!(nav.current(), 1);
    }
}
