use line_relaxation::Scenario;

fn main() {
    let scenario = Scenario::FiveParticles;
    let mut relax = scenario.build::<f64>();

    let num_ticks = scenario.num_ticks();
    for t in 0..num_ticks {
        let positions = relax.tick();

        if t % 50 == 0 {
            let labels: Vec<_> = positions.iter().map(|p| format!("{p:.2}")).collect();
            println!("tick {t:>3}: {}", labels.join(" "));
        }
    }

    println!("{num_ticks} ticks done.");
}
