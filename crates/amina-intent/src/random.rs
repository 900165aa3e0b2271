use rand::Rng;

/// Chooses an entry from a canned-response pool.
///
/// Implementations must return an index `< len`; callers never pass `0`.
pub trait RandomSource: Send + Sync {
    fn pick(&self, len: usize) -> usize;
}

/// Uniform choice backed by the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Always picks the same slot, clamped to the pool. Used to pin output in tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedIndex(pub usize);

impl RandomSource for FixedIndex {
    fn pick(&self, len: usize) -> usize {
        self.0.min(len.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_random_stays_in_range() {
        let rng = ThreadRandom;
        for len in 1..20 {
            for _ in 0..50 {
                assert!(rng.pick(len) < len);
            }
        }
    }

    #[test]
    fn fixed_index_clamps() {
        assert_eq!(FixedIndex(0).pick(3), 0);
        assert_eq!(FixedIndex(2).pick(3), 2);
        assert_eq!(FixedIndex(9).pick(3), 2);
    }
}
