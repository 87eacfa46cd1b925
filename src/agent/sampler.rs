//! Synthetic user behaviour.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::counter::Action;

/// Picks the action of each synthetic request with a Bernoulli draw.
#[derive(Debug, Clone)]
pub struct ActionSampler<R = StdRng> {
    rng: R,
    download_probability: f64,
}

impl ActionSampler<StdRng> {
    pub fn from_entropy(download_probability: f64) -> Self {
        Self::new(StdRng::from_entropy(), download_probability)
    }
}

impl<R: Rng> ActionSampler<R> {
    pub fn new(rng: R, download_probability: f64) -> Self {
        Self {
            rng,
            download_probability: download_probability.clamp(0.0, 1.0),
        }
    }

    pub fn next_action(&mut self) -> Action {
        if self.rng.gen_bool(self.download_probability) {
            Action::Download
        } else {
            Action::View
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mix_is_roughly_ninety_ten() {
        let mut sampler = ActionSampler::new(StdRng::seed_from_u64(7), 0.1);
        let downloads = (0..10_000)
            .filter(|_| sampler.next_action() == Action::Download)
            .count();
        assert!((800..1200).contains(&downloads), "got {downloads} downloads");
    }

    #[test]
    fn test_extremes() {
        let mut never = ActionSampler::new(StdRng::seed_from_u64(1), 0.0);
        assert!((0..100).all(|_| never.next_action() == Action::View));

        let mut always = ActionSampler::new(StdRng::seed_from_u64(1), 1.0);
        assert!((0..100).all(|_| always.next_action() == Action::Download));
    }
}
