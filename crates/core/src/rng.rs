use rand::{rngs::StdRng, seq::SliceRandom, RngCore, SeedableRng};

/// The single random source of a run. Every roll the engine makes goes
/// through this state, so a seed fully determines a run.
#[derive(Debug, Clone)]
pub struct RngState {
    seed: u64,
    rng: StdRng,
}

impl RngState {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    /// Uniform index below `len`. `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        (self.next_u64() % len.max(1) as u64) as usize
    }

    /// Inclusive integer range.
    pub fn range_i64(&mut self, min: i64, max: i64) -> i64 {
        if min >= max {
            return min;
        }
        let span = (max - min + 1) as u64;
        min + (self.next_u64() % span) as i64
    }

    /// True one time in `sides`.
    pub fn chance(&mut self, sides: u64) -> bool {
        if sides <= 1 {
            return true;
        }
        self.next_u64() % sides == 0
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.index(items.len());
        items.get(idx)
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = RngState::from_seed(7);
        let mut b = RngState::from_seed(7);
        for _ in 0..32 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn range_is_inclusive_and_degenerate_safe() {
        let mut rng = RngState::from_seed(1);
        for _ in 0..64 {
            let v = rng.range_i64(2, 4);
            assert!((2..=4).contains(&v));
        }
        assert_eq!(rng.range_i64(5, 5), 5);
        assert_eq!(rng.range_i64(9, 3), 9);
    }

    #[test]
    fn chance_one_always_hits() {
        let mut rng = RngState::from_seed(3);
        assert!(rng.chance(1));
    }
}
