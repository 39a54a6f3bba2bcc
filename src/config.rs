#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{interaction::PowerLaw, Float};

/// Whether particles push each other apart or pull each other together.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ForceMode {
    #[default]
    Repulsive,
    Attractive,
}

impl ForceMode {
    #[must_use]
    pub fn from_repulsive(repulsive: bool) -> Self {
        if repulsive {
            Self::Repulsive
        } else {
            Self::Attractive
        }
    }

    #[must_use]
    pub fn is_repulsive(self) -> bool {
        self == Self::Repulsive
    }

    /// $+1$ for repulsion, $-1$ for attraction.
    #[must_use]
    pub fn direction<F: Float>(self) -> F {
        match self {
            Self::Repulsive => F::one(),
            Self::Attractive => -F::one(),
        }
    }
}

/// How the free particles are advanced within one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum UpdateScheme {
    /// All forces are computed from the positions at the start of the tick,
    /// then every free particle moves at once.
    #[default]
    Synchronous,
    /// Free particles are visited in index order and each one moves
    /// immediately, so later particles already see the new positions of earlier ones.
    Sequential,
}

/// Parameters of the relaxation.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config<F: Float> {
    /// Exponent of the distance in the force law.
    pub decay_power: F,
    /// Step size turning a force into a displacement.
    pub gain: F,
    pub mode: ForceMode,
    pub scheme: UpdateScheme,
}

impl<F: Float> Config<F> {
    /// No value is validated; nonsensical parameters are passed through to the force law.
    #[must_use]
    pub fn new(decay_power: F, gain: F, repulsive: bool) -> Self {
        Self {
            decay_power,
            gain,
            mode: ForceMode::from_repulsive(repulsive),
            scheme: UpdateScheme::Synchronous,
        }
    }

    #[must_use]
    pub fn decay_power(mut self, decay_power: F) -> Self {
        self.decay_power = decay_power;
        self
    }

    #[must_use]
    pub fn gain(mut self, gain: F) -> Self {
        self.gain = gain;
        self
    }

    #[must_use]
    pub fn attractive(mut self) -> Self {
        self.mode = ForceMode::Attractive;
        self
    }

    #[must_use]
    pub fn repulsive(mut self) -> Self {
        self.mode = ForceMode::Repulsive;
        self
    }

    /// Move every particle right after its force is known (Gauss-Seidel sweep).
    #[must_use]
    pub fn sequential(mut self) -> Self {
        self.scheme = UpdateScheme::Sequential;
        self
    }

    #[must_use]
    pub fn synchronous(mut self) -> Self {
        self.scheme = UpdateScheme::Synchronous;
        self
    }

    /// The force law described by this configuration.
    #[must_use]
    pub fn power_law(&self) -> PowerLaw<F> {
        PowerLaw::new(self.decay_power, self.mode)
    }
}

impl<F: Float> Default for Config<F> {
    fn default() -> Self {
        Self::new(F::one(), nalgebra::convert(0.03), true)
    }
}
