use line_relaxation::{Config, UniformCreator};
use rand::{rngs::StdRng, SeedableRng};

fn main() {
    let rng = StdRng::seed_from_u64(0);
    let mut creator = UniformCreator::with_rng(rng, 0., 10.);

    let config = Config::default().gain(0.01);
    let mut relax = creator.create_relaxation(20, config);

    let num_ticks = 2_000;
    for t in 0..num_ticks {
        relax.step();

        if t % 500 == 0 {
            println!("{t} out of {num_ticks} ticks done.");
        }
    }

    let mut positions: Vec<f64> = relax.positions().collect();
    positions.sort_by(|a, b| a.total_cmp(b));
    for pair in positions.windows(2) {
        println!("{:.3} .. {:.3} gap {:.3}", pair[0], pair[1], pair[1] - pair[0]);
    }
}
