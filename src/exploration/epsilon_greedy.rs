use rand::Rng;

use crate::{check_interval, Result};

use super::Choice;

/// Epsilon greedy exploration policy with a fixed epsilon threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpsilonGreedy {
    epsilon: f64,
}

impl EpsilonGreedy {
    /// Initialize epsilon greedy policy
    ///
    /// **Errors** if `epsilon` is not in the interval `[0,1]`
    pub fn new(epsilon: f64) -> Result<Self> {
        check_interval!(epsilon, 0.0, 1.0);
        Ok(Self { epsilon })
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Draw `r` uniformly from `[0,1)` and explore if `r < epsilon`
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Choice {
        if rng.gen::<f64>() < self.epsilon {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }
}
