use std::env;

use color_eyre::eyre::{eyre, WrapErr};
use line_relaxation::{csv::write_trajectory_file, Scenario};
use log::info;

const PROGRESS_INTERVAL: usize = 100;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = env::args().skip(1);
    let scenario: Scenario = match args.next() {
        Some(name) => name.parse()?,
        None => Scenario::default(),
    };
    let num_ticks = match args.next() {
        Some(ticks) => ticks
            .parse()
            .wrap_err_with(|| format!("invalid tick count `{ticks}`"))?,
        None => scenario.num_ticks(),
    };
    let csv_path = args.next();
    if let Some(extra) = args.next() {
        return Err(eyre!(
            "unexpected argument `{extra}`, usage: relax [scenario] [ticks] [csv-path]"
        ));
    }

    info!("relaxing {scenario} for {num_ticks} ticks");
    let mut relax = scenario.build::<f64>();
    let trajectory = relax.simulate(num_ticks);

    for t in (PROGRESS_INTERVAL..=num_ticks).step_by(PROGRESS_INTERVAL) {
        let positions: Vec<_> = trajectory.row(t).iter().copied().collect();
        info!("{t} out of {num_ticks} ticks done: {positions:.4?}");
    }

    let positions: Vec<_> = trajectory.row(num_ticks).iter().copied().collect();
    info!("final positions: {positions:.6?}");

    if let Some(path) = csv_path {
        write_trajectory_file(&trajectory, &path)
            .wrap_err_with(|| format!("failed to write trajectory to `{path}`"))?;
        info!("wrote trajectory to {path}");
    }

    Ok(())
}
