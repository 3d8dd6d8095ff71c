use std::sync::Mutex;

use rand::{rngs::StdRng, seq::index, Rng, SeedableRng};

/// Source of randomness for the fallback bundles.
pub trait Sampler: Send + Sync {
    /// A count in `min..=max`.
    fn pick_count(&self, min: usize, max: usize) -> usize;

    /// Up to `amount` distinct indices below `len`.
    fn pick_distinct(&self, len: usize, amount: usize) -> Vec<usize>;
}

/// Non-seeded sampler backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngSampler;

impl Sampler for ThreadRngSampler {
    fn pick_count(&self, min: usize, max: usize) -> usize {
        rand::thread_rng().gen_range(min..=max.max(min))
    }

    fn pick_distinct(&self, len: usize, amount: usize) -> Vec<usize> {
        index::sample(&mut rand::thread_rng(), len, amount.min(len)).into_vec()
    }
}

/// Reproducible sampler; the same seed replays the same sequence of picks.
#[derive(Debug)]
pub struct SeededSampler {
    rng: Mutex<StdRng>,
}

impl SeededSampler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut rng)
    }
}

impl Sampler for SeededSampler {
    fn pick_count(&self, min: usize, max: usize) -> usize {
        self.with_rng(|rng| rng.gen_range(min..=max.max(min)))
    }

    fn pick_distinct(&self, len: usize, amount: usize) -> Vec<usize> {
        self.with_rng(|rng| index::sample(rng, len, amount.min(len)).into_vec())
    }
}

/// Replays scripted answers; used to pin the fallback path in tests.
#[cfg(test)]
pub(crate) struct ScriptedSampler {
    counts: Mutex<std::collections::VecDeque<usize>>,
    picks: Mutex<std::collections::VecDeque<Vec<usize>>>,
}

#[cfg(test)]
impl ScriptedSampler {
    pub(crate) fn new(counts: Vec<usize>, picks: Vec<Vec<usize>>) -> Self {
        Self {
            counts: Mutex::new(counts.into()),
            picks: Mutex::new(picks.into()),
        }
    }
}

#[cfg(test)]
impl Sampler for ScriptedSampler {
    fn pick_count(&self, min: usize, _max: usize) -> usize {
        self.counts.lock().unwrap().pop_front().unwrap_or(min)
    }

    fn pick_distinct(&self, _len: usize, amount: usize) -> Vec<usize> {
        let mut picks = self.picks.lock().unwrap().pop_front().unwrap_or_default();
        picks.truncate(amount);
        picks
    }
}
