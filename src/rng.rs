use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seedable source for the cosmetic parts of the output. Analysis itself
/// never draws from it.
#[derive(Clone)]
pub struct TriviaRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl TriviaRng {
    /// Create a new TriviaRng; without a seed one is drawn from the thread RNG
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
        TriviaRng {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed in use, so a run can be repeated
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Random index in [0, max)
    pub fn random_range(&mut self, max: usize) -> usize {
        self.rng.gen_range(0..max)
    }

    /// Uniformly pick one item; None for an empty slice
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.random_range(items.len());
        items.get(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_picks() {
        let items = ["a", "b", "c", "d", "e", "f"];
        let mut rng1 = TriviaRng::new(Some(12345));
        let mut rng2 = TriviaRng::new(Some(12345));
        for _ in 0..50 {
            assert_eq!(rng1.pick(&items), rng2.pick(&items));
        }
    }

    #[test]
    fn test_seed_getter() {
        assert_eq!(TriviaRng::new(Some(999)).seed(), 999);
    }

    #[test]
    fn test_pick_empty() {
        let mut rng = TriviaRng::new(Some(1));
        let empty: [u8; 0] = [];
        assert_eq!(rng.pick(&empty), None);
    }

    #[test]
    fn test_random_range_bounds() {
        let mut rng = TriviaRng::new(Some(123));
        for _ in 0..1000 {
            assert!(rng.random_range(10) < 10);
        }
    }
}
