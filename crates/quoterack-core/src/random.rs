use rand::Rng;

/// Source of random indices for quote picking
///
/// Injected into the store so picking is deterministic under test. The
/// production source is intentionally unseeded.
pub trait RandomSource: Send {
    /// Pick an index in `[0, len)`. Callers never pass `len == 0`.
    fn pick_index(&mut self, len: usize) -> usize;
}

/// Thread-local RNG, the production source
#[derive(Debug, Default)]
pub struct ThreadRngSource;

impl RandomSource for ThreadRngSource {
    fn pick_index(&mut self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Deterministic source that cycles through a fixed list of picks
#[derive(Debug)]
pub struct FixedSource {
    picks: Vec<usize>,
    next: usize,
}

impl FixedSource {
    pub fn new(picks: Vec<usize>) -> Self {
        assert!(!picks.is_empty(), "FixedSource needs at least one pick");
        Self { picks, next: 0 }
    }
}

impl RandomSource for FixedSource {
    fn pick_index(&mut self, len: usize) -> usize {
        let pick = self.picks[self.next % self.picks.len()];
        self.next += 1;
        pick % len
    }
}
