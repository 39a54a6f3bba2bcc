use std::{
    fmt::Display,
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use nalgebra::DMatrix;

/// Write a trajectory as returned by [`Relaxation::simulate`](crate::Relaxation::simulate).
///
/// The header is `t,x0,x1,...`, followed by one row per tick.
pub fn write_trajectory<T: Display>(
    positions: &DMatrix<T>,
    mut writer: impl Write,
) -> Result<(), io::Error> {
    let (_, num_particles) = positions.shape();

    write!(writer, "t")?;
    for i in 0..num_particles {
        write!(writer, ",x{i}")?;
    }
    writeln!(writer)?;

    for (t, row) in positions.row_iter().enumerate() {
        write!(writer, "{t}")?;
        for elem in row.iter() {
            write!(writer, ",{elem}")?;
        }
        writeln!(writer)?;
    }

    writer.flush()
}

pub fn write_trajectory_file<T: Display>(
    positions: &DMatrix<T>,
    path: impl AsRef<Path>,
) -> Result<(), io::Error> {
    let file = BufWriter::new(File::create(path)?);
    write_trajectory(positions, file)
}
