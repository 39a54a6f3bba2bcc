pub mod config;
pub mod csv;
pub mod interaction;
pub mod particle;
pub mod relaxation;
pub mod scenario;

pub use config::{Config, ForceMode, UpdateScheme};
pub use interaction::{Interaction, PowerLaw};
pub use particle::{Particle, Role};
pub use relaxation::{Execution, Relaxation};
pub use scenario::Scenario;
#[cfg(feature = "randomization")]
pub use scenario::UniformCreator;

use nalgebra::RealField;

/// Scalar type of positions and forces.
///
/// Implemented for every [`RealField`] that is [`Copy`], i.e. `f32` and `f64`.
pub trait Float: RealField + Copy {}

impl<F: RealField + Copy> Float for F {}
