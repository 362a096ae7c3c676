//! Sampling helpers shared by the model, the builder and the CCF assigner.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Closed probability interval used for basic events and CCF groups.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityRange {
    pub min: f64,
    pub max: f64,
}

impl ProbabilityRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Sample a probability uniformly from `[min, max]`.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        if self.min >= self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Flip a coin that lands `true` with probability `p`.
pub fn coin<R: Rng>(rng: &mut R, p: f64) -> bool {
    rng.gen::<f64>() < p
}

/// Round a nonnegative bound to an integer, rounding up with probability
/// equal to its fractional part so the long-run mean equals `value`.
pub fn round_stochastic<R: Rng>(rng: &mut R, value: f64) -> usize {
    let floor = value.floor();
    let mut rounded = floor as usize;
    if rng.gen::<f64>() < value - floor {
        rounded += 1;
    }
    rounded
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_sample_within_range() {
        let mut rng = SmallRng::seed_from_u64(7);
        let range = ProbabilityRange::new(0.001, 0.1);
        for _ in 0..1000 {
            assert!(range.contains(range.sample(&mut rng)));
        }
    }

    #[test]
    fn test_sample_degenerate_range() {
        let mut rng = SmallRng::seed_from_u64(7);
        let range = ProbabilityRange::new(0.5, 0.5);
        assert_eq!(range.sample(&mut rng), 0.5);
    }

    #[test]
    fn test_round_stochastic_integral_value() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(round_stochastic(&mut rng, 4.0), 4);
        }
    }

    #[test]
    fn test_round_stochastic_preserves_mean() {
        let mut rng = SmallRng::seed_from_u64(3);
        let samples = 20_000;
        let total: usize = (0..samples)
            .map(|_| round_stochastic(&mut rng, 3.25))
            .sum();
        let mean = total as f64 / samples as f64;
        assert!((mean - 3.25).abs() < 0.03, "mean was {mean}");
    }

    #[test]
    fn test_coin_extremes() {
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..100 {
            assert!(!coin(&mut rng, 0.0));
            assert!(coin(&mut rng, 1.0));
        }
    }
}
