use std::{fmt, str::FromStr};

use crate::{config::Config, relaxation::Relaxation, Float};

/// Left boundary of the reference setups.
pub const LEFT: f64 = 0.;
/// Right boundary of the reference setups.
pub const RIGHT: f64 = 6.;

/// The reference setups: free particles between fixed boundaries at [`LEFT`] and [`RIGHT`],
/// repelling each other with an inverse distance force.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Scenario {
    /// One free particle starting at `1`.
    SingleParticle,
    /// Two free particles starting at `1` and `2`.
    TwoParticles,
    /// Five free particles evenly spaced between `1` and `2`.
    #[default]
    FiveParticles,
}

impl Scenario {
    pub const ALL: [Self; 3] = [Self::SingleParticle, Self::TwoParticles, Self::FiveParticles];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::SingleParticle => "single-particle",
            Self::TwoParticles => "two-particles",
            Self::FiveParticles => "five-particles",
        }
    }

    #[must_use]
    pub fn free_positions(self) -> &'static [f64] {
        match self {
            Self::SingleParticle => &[1.],
            Self::TwoParticles => &[1., 2.],
            Self::FiveParticles => &[1., 1.25, 1.5, 1.75, 2.],
        }
    }

    #[must_use]
    pub fn config<F: Float>(self) -> Config<F> {
        let gain = match self {
            Self::SingleParticle => 0.1,
            Self::TwoParticles | Self::FiveParticles => 0.03,
        };
        Config::default().gain(nalgebra::convert(gain))
    }

    /// Length of a run of this setup.
    #[must_use]
    pub fn num_ticks(self) -> usize {
        300
    }

    #[must_use]
    pub fn build<F: Float>(self) -> Relaxation<F> {
        Relaxation::line_segment(
            nalgebra::convert(LEFT),
            nalgebra::convert(RIGHT),
            self.free_positions().iter().map(|&p| nalgebra::convert(p)),
            self.config(),
        )
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownScenario(pub String);

impl fmt::Display for UnknownScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown scenario `{}`, expected one of", self.0)?;
        for scenario in Scenario::ALL {
            write!(f, " `{scenario}`")?;
        }
        Ok(())
    }
}

impl std::error::Error for UnknownScenario {}

impl FromStr for Scenario {
    type Err = UnknownScenario;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|scenario| scenario.name() == s)
            .ok_or_else(|| UnknownScenario(s.to_owned()))
    }
}

#[cfg(feature = "randomization")]
pub use random::*;

#[cfg(feature = "randomization")]
mod random {
    use rand::Rng;
    use rand_distr::{uniform::SampleUniform, Distribution, Uniform};

    use super::*;

    /// Places free particles uniformly at random between two boundaries.
    pub struct UniformCreator<F, R>
    where
        F: Float + SampleUniform,
        R: Rng,
    {
        rng: R,
        left: F,
        right: F,
        distr: Uniform<F>,
    }

    impl<F> UniformCreator<F, rand::rngs::ThreadRng>
    where
        F: Float + SampleUniform,
    {
        /// `left` has to be smaller than `right`.
        pub fn new(left: F, right: F) -> Self {
            Self::with_rng(rand::thread_rng(), left, right)
        }
    }

    impl<F, R> UniformCreator<F, R>
    where
        F: Float + SampleUniform,
        R: Rng,
    {
        pub fn with_rng(rng: R, left: F, right: F) -> Self {
            Self {
                rng,
                left,
                right,
                distr: Uniform::new(left, right),
            }
        }

        /// A position strictly between the boundaries.
        pub fn create_position(&mut self) -> F {
            loop {
                let p = self.distr.sample(&mut self.rng);
                if p != self.left {
                    return p;
                }
            }
        }

        pub fn create_positions(&mut self, n: usize) -> Vec<F> {
            (0..n).map(|_| self.create_position()).collect()
        }

        /// `n` random free particles between the fixed boundaries.
        pub fn create_relaxation(&mut self, n: usize, config: Config<F>) -> Relaxation<F> {
            let free = self.create_positions(n);
            Relaxation::line_segment(self.left, self.right, free, config)
        }
    }
}
