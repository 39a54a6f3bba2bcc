use std::fmt::Debug;

use crate::{config::ForceMode, Float};

/// A pairwise force between two particles on a line.
pub trait Interaction<F: Float>: Clone + Debug + Send + Sync {
    /// Calculate the force of the particle at `source` on the particle at `receiver`.
    ///
    /// A positive value pushes the receiver towards larger positions.
    fn eval(&self, receiver: F, source: F) -> F;
}

/// A force whose magnitude decays with the `decay_power`-th power of the separation.
///
/// For a separation `dx = receiver - source` the force is
/// $\text{direction} \cdot \operatorname{sign}(dx) / |dx|^{p}$,
/// where the direction is $+1$ for [`ForceMode::Repulsive`] and $-1$ for [`ForceMode::Attractive`].
/// Coincident particles exert no force on each other.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PowerLaw<F: Float> {
    decay_power: F,
    mode: ForceMode,
}

impl<F: Float> PowerLaw<F> {
    #[must_use]
    pub fn new(decay_power: F, mode: ForceMode) -> Self {
        Self { decay_power, mode }
    }

    #[must_use]
    pub fn repulsive(decay_power: F) -> Self {
        Self::new(decay_power, ForceMode::Repulsive)
    }

    #[must_use]
    pub fn attractive(decay_power: F) -> Self {
        Self::new(decay_power, ForceMode::Attractive)
    }

    #[must_use]
    pub fn decay_power(&self) -> F {
        self.decay_power
    }

    #[must_use]
    pub fn mode(&self) -> ForceMode {
        self.mode
    }
}

impl<F: Float> Interaction<F> for PowerLaw<F> {
    fn eval(&self, receiver: F, source: F) -> F {
        let dx = receiver - source;
        // singularity: coincident particles are ignored for this tick
        if dx == F::zero() {
            return F::zero();
        }

        let sign = if dx > F::zero() { F::one() } else { -F::one() };
        self.mode.direction::<F>() * sign / dx.abs().powf(self.decay_power)
    }
}
