use log::{debug, trace};
use nalgebra::DMatrix;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::{
    config::{Config, UpdateScheme},
    interaction::{Interaction, PowerLaw},
    particle::{Particle, Role},
    Float,
};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Execution {
    #[default]
    SingleThreaded,
    /// Accumulate the forces of the free particles in parallel.
    ///
    /// Every particle still sums its contributions in the same order,
    /// so the results equal the single threaded ones bit for bit.
    /// Only used with [`UpdateScheme::Synchronous`].
    #[cfg(feature = "rayon")]
    Rayon,
}

/// Relaxation of particles on a line towards a force balanced configuration.
///
/// The engine owns all particles, fixed and free. Each [`tick`](Self::tick)
/// resets the forces of the free particles, accumulates the pairwise forces
/// and moves every free particle by `gain` times its force.
#[derive(Clone, Debug)]
pub struct Relaxation<F: Float, I: Interaction<F> = PowerLaw<F>> {
    particles: Vec<Particle<F>>,
    /// Indices of the fixed particles followed by the free ones.
    /// This is the summation order of the forces.
    order: Vec<usize>,
    num_fixed: usize,
    interaction: I,
    gain: F,
    scheme: UpdateScheme,
    execution: Execution,
    snapshot: Vec<F>,
    ticks: usize,
}

impl<F: Float> Relaxation<F> {
    /// Create the particle set from `(initial_position, is_fixed)` pairs.
    pub fn new(particles: impl IntoIterator<Item = (F, bool)>, config: Config<F>) -> Self {
        Self::with_interaction(
            particles
                .into_iter()
                .map(|(position, is_fixed)| Particle::new(position, Role::from_fixed(is_fixed))),
            config.power_law(),
            config.gain,
            config.scheme,
        )
    }

    /// Free particles between two fixed boundary particles at `left` and `right`.
    ///
    /// The boundaries get the indices `0` and `1`, the free particles follow in the given order.
    pub fn line_segment(
        left: F,
        right: F,
        free_positions: impl IntoIterator<Item = F>,
        config: Config<F>,
    ) -> Self {
        let boundaries = [(left, true), (right, true)];
        let free = free_positions.into_iter().map(|p| (p, false));
        Self::new(boundaries.into_iter().chain(free), config)
    }
}

impl<F: Float, I: Interaction<F>> Relaxation<F, I> {
    pub fn with_interaction(
        particles: impl IntoIterator<Item = Particle<F>>,
        interaction: I,
        gain: F,
        scheme: UpdateScheme,
    ) -> Self {
        let particles: Vec<_> = particles.into_iter().collect();

        let fixed = particles
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_fixed())
            .map(|(i, _)| i);
        let free = particles
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.is_fixed())
            .map(|(i, _)| i);
        let order: Vec<_> = fixed.chain(free).collect();
        let num_fixed = particles.iter().filter(|p| p.is_fixed()).count();

        debug!(
            "relaxation of {} particles ({} fixed, {} free), {:?} with gain {:?}",
            particles.len(),
            num_fixed,
            particles.len() - num_fixed,
            interaction,
            gain
        );

        Self {
            snapshot: Vec::with_capacity(particles.len()),
            particles,
            order,
            num_fixed,
            interaction,
            gain,
            scheme,
            execution: Execution::SingleThreaded,
            ticks: 0,
        }
    }

    /// Accumulate the forces with Rayon.
    #[cfg(feature = "rayon")]
    #[must_use]
    pub fn rayon(mut self) -> Self {
        self.execution = Execution::Rayon;
        self
    }

    #[must_use]
    pub fn single_threaded(mut self) -> Self {
        self.execution = Execution::SingleThreaded;
        self
    }

    /// Advance all free particles by one tick and return their new positions in index order.
    pub fn tick(&mut self) -> Vec<F> {
        self.step();
        self.free_positions().collect()
    }

    /// Advance all free particles by one tick.
    pub fn step(&mut self) {
        match self.scheme {
            UpdateScheme::Synchronous => self.step_synchronous(),
            UpdateScheme::Sequential => self.step_sequential(),
        }
        self.ticks += 1;
        trace!("tick {} done", self.ticks);
    }

    fn step_synchronous(&mut self) {
        self.snapshot.clear();
        self.snapshot
            .extend(self.particles.iter().map(Particle::position));

        let order = &self.order;
        let positions = &self.snapshot;
        let interaction = &self.interaction;

        match self.execution {
            Execution::SingleThreaded => {
                for (i, par) in self.particles.iter_mut().enumerate() {
                    if !par.is_fixed() {
                        accumulate_force(i, par, order, positions, interaction);
                    }
                }
            }
            #[cfg(feature = "rayon")]
            Execution::Rayon => {
                self.particles
                    .par_iter_mut()
                    .enumerate()
                    .filter(|(_, par)| !par.is_fixed())
                    .for_each(|(i, par)| {
                        accumulate_force(i, par, order, positions, interaction);
                    });
            }
        }

        for par in &mut self.particles {
            par.advance(self.gain);
        }
    }

    fn step_sequential(&mut self) {
        for &i in &self.order[self.num_fixed..] {
            self.particles[i].reset_force();
            for &j in &self.order {
                if i == j {
                    continue;
                }
                let source = self.particles[j].position();
                self.particles[i].accumulate(source, &self.interaction);
            }
            self.particles[i].advance(self.gain);
        }
    }

    /// Run `num_ticks` ticks.
    ///
    /// Row `t` of the result holds the positions of all particles after `t` ticks,
    /// so row `0` is the state before the first tick.
    pub fn simulate(&mut self, num_ticks: usize) -> DMatrix<F> {
        let mut positions = DMatrix::zeros(num_ticks + 1, self.len());
        self.record(&mut positions, 0);

        for t in 1..=num_ticks {
            self.step();
            self.record(&mut positions, t);
        }

        positions
    }

    fn record(&self, positions: &mut DMatrix<F>, t: usize) {
        for (j, par) in self.particles.iter().enumerate() {
            positions[(t, j)] = par.position();
        }
    }

    #[must_use]
    pub fn particles(&self) -> &[Particle<F>] {
        &self.particles
    }

    #[must_use]
    pub fn particle(&self, index: usize) -> Option<&Particle<F>> {
        self.particles.get(index)
    }

    /// Position of the particle with the given index.
    #[must_use]
    pub fn position(&self, index: usize) -> Option<F> {
        self.particle(index).map(Particle::position)
    }

    /// Positions of all particles in index order.
    pub fn positions(&self) -> impl Iterator<Item = F> + '_ {
        self.particles.iter().map(Particle::position)
    }

    /// Positions of the free particles in index order.
    pub fn free_positions(&self) -> impl Iterator<Item = F> + '_ {
        self.order[self.num_fixed..]
            .iter()
            .map(|&i| self.particles[i].position())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[must_use]
    pub fn num_fixed(&self) -> usize {
        self.num_fixed
    }

    #[must_use]
    pub fn num_free(&self) -> usize {
        self.particles.len() - self.num_fixed
    }

    /// Number of ticks performed so far.
    #[must_use]
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    #[must_use]
    pub fn gain(&self) -> F {
        self.gain
    }

    #[must_use]
    pub fn scheme(&self) -> UpdateScheme {
        self.scheme
    }

    #[must_use]
    pub fn execution(&self) -> Execution {
        self.execution
    }

    #[must_use]
    pub fn interaction(&self) -> &I {
        &self.interaction
    }
}

/// Sum the forces of all other particles on `par`, reading the positions from `positions`.
fn accumulate_force<F: Float, I: Interaction<F>>(
    index: usize,
    par: &mut Particle<F>,
    order: &[usize],
    positions: &[F],
    interaction: &I,
) {
    par.reset_force();
    for &j in order {
        if j == index {
            continue;
        }
        par.accumulate(positions[j], interaction);
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_ulps_eq};

    use super::*;

    fn single(start: f64, gain: f64) -> Relaxation<f64> {
        Relaxation::line_segment(0., 6., [start], Config::default().gain(gain))
    }

    fn five() -> Relaxation<f64> {
        Relaxation::line_segment(0., 6., [1., 1.25, 1.5, 1.75, 2.], Config::default())
    }

    #[test]
    fn midpoint_is_equilibrium() {
        let mut relax = single(3., 0.1);
        for _ in 0..100 {
            assert_eq!(relax.tick(), vec![3.]);
            assert_eq!(relax.particles()[2].accumulated_force(), 0.);
        }
        assert_eq!(relax.ticks(), 100);
    }

    #[test]
    fn single_particle_converges_to_midpoint() {
        let mut relax = single(1., 0.1);

        let mut prev = 1.;
        let mut prev_disp = f64::INFINITY;
        for _ in 0..500 {
            let x = relax.tick()[0];
            let disp = x - prev;
            assert!(disp > 0.);
            assert!(x < 3.);
            assert!(disp < prev_disp);
            prev_disp = disp;
            prev = x;
        }

        for _ in 0..1500 {
            relax.step();
        }
        assert_abs_diff_eq!(relax.position(2).unwrap(), 3., epsilon = 1e-6);
    }

    #[test]
    fn first_tick() {
        let mut relax = single(1., 0.1);
        let x = relax.tick();
        // 1 + 0.1 * (1/1 - 1/5)
        assert_ulps_eq!(x[0], 1.08);
        assert_ulps_eq!(relax.particles()[2].accumulated_force(), 0.8);
    }

    #[test]
    fn attraction_moves_to_nearer_boundary() {
        let mut relax = Relaxation::line_segment(0., 6., [1.], Config::new(1., 0.1, false));
        let x = relax.tick();
        assert_ulps_eq!(x[0], 0.92);
    }

    #[test]
    fn fixed_particles_stay() {
        let mut relax = five();
        let positions = relax.simulate(300);

        assert_eq!(positions.shape(), (301, 7));
        for t in 0..=300 {
            assert_eq!(positions[(t, 0)], 0.);
            assert_eq!(positions[(t, 1)], 6.);
        }
        assert_eq!(positions[(0, 2)], 1.);
        assert_eq!(positions[(0, 6)], 2.);
    }

    #[test]
    fn synchronous_update() {
        let mut relax = Relaxation::line_segment(0., 6., [1., 2.], Config::default());
        let x = relax.tick();

        // both forces from the positions before the tick
        let f1 = 1. / 1. - 1. / 5. - 1. / 1.;
        let f2 = 1. / 2. - 1. / 4. + 1. / 1.;
        assert_ulps_eq!(x[0], 1. + 0.03 * f1);
        assert_ulps_eq!(x[1], 2. + 0.03 * f2);
        assert_ulps_eq!(relax.particles()[2].accumulated_force(), f1);
        assert_ulps_eq!(relax.particles()[3].accumulated_force(), f2);
    }

    #[test]
    fn sequential_update() {
        let mut relax =
            Relaxation::line_segment(0., 6., [1., 2.], Config::default().sequential());
        let x = relax.tick();

        let x1 = 1. + 0.03 * (1. / 1. - 1. / 5. - 1. / 1.);
        // the second particle already sees the moved first one
        let x2 = 2. + 0.03 * (1. / 2. - 1. / 4. + 1. / (2. - x1));
        assert_ulps_eq!(x[0], x1);
        assert_ulps_eq!(x[1], x2);
    }

    #[test]
    fn trajectory_matches_engine_state() {
        let mut ticked = five();
        let mut simulated = five();
        let positions = simulated.simulate(50);

        for t in 1..=50 {
            let x = ticked.tick();
            let row: Vec<_> = positions.row(t).iter().skip(2).copied().collect();
            assert_eq!(row, x);
        }
        let last: Vec<_> = positions.row(50).iter().copied().collect();
        assert_eq!(last, simulated.positions().collect::<Vec<_>>());
        assert_eq!(simulated.ticks(), 50);
    }

    #[test]
    fn deterministic() {
        let mut a = five();
        let mut b = five();
        let pos_a = a.simulate(1000);
        let pos_b = b.simulate(1000);
        assert_eq!(pos_a, pos_b);
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn rayon_matches_single_threaded() {
        let mut single = five();
        let mut rayon = five().rayon();
        assert_eq!(rayon.execution(), Execution::Rayon);

        for _ in 0..200 {
            assert_eq!(single.tick(), rayon.tick());
        }
    }

    #[test]
    fn symmetry() {
        let mut relax = Relaxation::line_segment(0., 6., [1., 2., 4., 5.], Config::default());
        relax.simulate(3000);

        let x: Vec<_> = relax.free_positions().collect();
        assert_abs_diff_eq!(x[0] + x[3], 6., epsilon = 1e-9);
        assert_abs_diff_eq!(x[1] + x[2], 6., epsilon = 1e-9);
        assert!(x.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn five_particles_equilibrium() {
        let mut relax = five();
        relax.simulate(5000);

        let before: Vec<_> = relax.free_positions().collect();
        let after = relax.tick();
        for (b, a) in before.iter().zip(&after) {
            assert_abs_diff_eq!(*b, *a, epsilon = 1e-9);
        }

        for par in &relax.particles()[2..] {
            assert_abs_diff_eq!(par.accumulated_force(), 0., epsilon = 1e-8);
        }

        // the middle particle settles on the midpoint, the gaps mirror each other
        let x: Vec<_> = relax.positions().collect();
        let mut sorted = x.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let gaps: Vec<_> = sorted.windows(2).map(|w| w[1] - w[0]).collect();
        assert_abs_diff_eq!(sorted[3], 3., epsilon = 1e-6);
        for k in 0..3 {
            assert_abs_diff_eq!(gaps[k], gaps[5 - k], epsilon = 1e-6);
        }
        assert_abs_diff_eq!(gaps[0], 0.5093, epsilon = 1e-3);
        assert_abs_diff_eq!(gaps[2], 1.4065, epsilon = 1e-3);
    }

    #[test]
    fn coincident_free_particles() {
        let mut relax = Relaxation::line_segment(0., 6., [2., 2.], Config::<f64>::default());
        for _ in 0..10 {
            let x = relax.tick();
            assert!(x.iter().all(|p| p.is_finite()));
            assert_eq!(x[0], x[1]);
        }
    }

    #[test]
    fn without_boundaries() {
        let mut relax = Relaxation::new([(-1., false), (1., false)], Config::default());
        assert_eq!(relax.num_fixed(), 0);
        assert_eq!(relax.num_free(), 2);

        let x = relax.tick();
        assert_ulps_eq!(x[0], -1. - 0.03 * 0.5);
        assert_ulps_eq!(x[1], 1. + 0.03 * 0.5);
    }

    #[test]
    fn mixed_roles() {
        let relax = Relaxation::new(
            [(1., false), (0., true), (2., false), (6., true)],
            Config::<f64>::default(),
        );
        assert_eq!(relax.len(), 4);
        assert_eq!(relax.num_fixed(), 2);
        assert_eq!(relax.free_positions().collect::<Vec<_>>(), vec![1., 2.]);
        assert_eq!(relax.position(3), Some(6.));
        assert_eq!(relax.position(4), None);
        assert_eq!(relax.particle(1).map(Particle::role), Some(Role::Fixed));
    }

    #[test]
    fn custom_interaction() {
        #[derive(Clone, Debug)]
        struct Spring;

        impl Interaction<f64> for Spring {
            fn eval(&self, receiver: f64, source: f64) -> f64 {
                source - receiver
            }
        }

        let particles = [Particle::fixed(0.), Particle::free(4.), Particle::fixed(6.)];
        let mut relax =
            Relaxation::with_interaction(particles, Spring, 0.1, UpdateScheme::Synchronous);
        relax.simulate(500);
        assert_abs_diff_eq!(relax.position(1).unwrap(), 3., epsilon = 1e-9);
    }
}
