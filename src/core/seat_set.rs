use std::fmt;

/// Maximum number of seats supported (based on SeatSet using u16).
pub const MAX_SEATS: usize = 16;

/// A set of seat indices backed by a `u16`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeatSet(u16);

impl SeatSet {
    /// A set with the first `count` seats enabled.
    pub fn new(count: usize) -> Self {
        debug_assert!(count <= MAX_SEATS);
        SeatSet(((1u32 << count) - 1) as u16)
    }

    pub fn enable(&mut self, idx: usize) {
        debug_assert!(idx < MAX_SEATS);
        self.0 |= 1 << idx;
    }

    pub fn disable(&mut self, idx: usize) {
        debug_assert!(idx < MAX_SEATS);
        self.0 &= !(1 << idx);
    }

    pub fn get(&self, idx: usize) -> bool {
        idx < MAX_SEATS && (self.0 >> idx) & 1 == 1
    }

    pub fn count(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterate the enabled seat indices in ascending order.
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        (0..MAX_SEATS).filter(move |idx| self.get(*idx))
    }

    /// The next enabled seat strictly after `from`, wrapping at `num_seats`.
    pub fn next_after(&self, from: usize, num_seats: usize) -> Option<usize> {
        (1..=num_seats)
            .map(|step| (from + step) % num_seats)
            .find(|idx| self.get(*idx))
    }
}

impl fmt::Debug for SeatSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.ones()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_enables_prefix() {
        let set = SeatSet::new(3);
        assert_eq!(set.count(), 3);
        assert!(set.get(0) && set.get(1) && set.get(2));
        assert!(!set.get(3));
    }

    #[test]
    fn test_enable_disable() {
        let mut set = SeatSet::default();
        assert!(set.is_empty());
        set.enable(7);
        set.enable(2);
        assert_eq!(set.ones().collect::<Vec<_>>(), vec![2, 7]);
        set.disable(7);
        assert_eq!(set.count(), 1);
        assert!(!set.get(7));
    }

    #[test]
    fn test_next_after_wraps() {
        let mut set = SeatSet::default();
        set.enable(0);
        set.enable(3);
        set.enable(8);
        assert_eq!(set.next_after(3, 9), Some(8));
        assert_eq!(set.next_after(8, 9), Some(0));
        assert_eq!(set.next_after(0, 9), Some(3));
    }

    #[test]
    fn test_next_after_empty_set() {
        let set = SeatSet::default();
        assert_eq!(set.next_after(0, 9), None);
    }

    #[test]
    fn test_max_seats_boundary() {
        let set = SeatSet::new(MAX_SEATS);
        assert_eq!(set.count(), MAX_SEATS);
        assert!(!set.get(MAX_SEATS));
    }
}
