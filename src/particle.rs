use crate::{interaction::Interaction, Float};

/// Whether the relaxation may move a particle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// A boundary particle. It exerts force but never moves.
    Fixed,
    Free,
}

impl Role {
    #[must_use]
    pub fn from_fixed(is_fixed: bool) -> Self {
        if is_fixed {
            Self::Fixed
        } else {
            Self::Free
        }
    }
}

/// A point particle on a line.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle<F: Float> {
    position: F,
    accumulated_force: F,
    role: Role,
}

impl<F: Float> Particle<F> {
    #[must_use]
    pub fn new(position: F, role: Role) -> Self {
        Self {
            position,
            accumulated_force: F::zero(),
            role,
        }
    }

    #[must_use]
    pub fn fixed(position: F) -> Self {
        Self::new(position, Role::Fixed)
    }

    #[must_use]
    pub fn free(position: F) -> Self {
        Self::new(position, Role::Free)
    }

    #[must_use]
    pub fn position(&self) -> F {
        self.position
    }

    #[must_use]
    pub fn accumulated_force(&self) -> F {
        self.accumulated_force
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn is_fixed(&self) -> bool {
        self.role == Role::Fixed
    }

    pub fn reset_force(&mut self) {
        self.accumulated_force = F::zero();
    }

    /// Add the force a particle at `source` exerts on this particle.
    pub fn accumulate<I: Interaction<F>>(&mut self, source: F, interaction: &I) {
        self.accumulated_force += interaction.eval(self.position, source);
    }

    /// Add the force of `other` on this particle.
    pub fn accumulate_from<I: Interaction<F>>(&mut self, other: &Self, interaction: &I) {
        self.accumulate(other.position, interaction);
    }

    /// Move by `gain` times the accumulated force. Fixed particles stay put.
    pub fn advance(&mut self, gain: F) {
        if self.is_fixed() {
            return;
        }
        self.position += gain * self.accumulated_force;
    }
}
