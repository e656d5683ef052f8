use std::path::Path;

use ndarray::{Array2, Array3};

use crate::error::{Result, RigError};
use crate::extract::calib::{MAT_COLS, MAT_ROWS};
use crate::store::Container;

use super::{record_group, require_series, Record, SessionStore, Signal, TrialKey};

// ---------------------------------------------------------------------------
// MatDataset
// ---------------------------------------------------------------------------

/// Accessor over the pressure-mat container. `read` subtracts the stored
/// reference vector from every raw frame, clamps negatives to zero, and
/// reshapes each frame to the 64×32 grid.
pub struct MatDataset {
    container: Container,
    ids: Vec<String>,
}

impl MatDataset {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::from_container(Container::open(path)?))
    }

    pub fn from_container(container: Container) -> Self {
        let ids = container.ids();
        Self { container, ids }
    }
}

impl SessionStore for MatDataset {
    fn container(&self) -> &Container {
        &self.container
    }

    fn ids(&self) -> &[String] {
        &self.ids
    }

    fn read(&self, key: &TrialKey, absolute_time: bool) -> Result<Record> {
        let id = self.resolve(key)?;
        let group = record_group(&self.container, &id)?;

        let reference = require_series(group, &id, "ref_mat")?;
        let data = group
            .table("data")
            .ok_or_else(|| RigError::SchemaMismatch(format!("record {id} has no 'data' table")))?;
        let frames = reconstruct_frames(data, reference, (MAT_ROWS, MAT_COLS))?;

        let mut record = Record::new();
        record.insert("intervals".into(), Signal::Series(self.intervals(&id, absolute_time)?));
        record.insert("mat".into(), Signal::Frames(frames));
        Ok(record)
    }
}

/// Offset removal: `max(data - reference, 0)` broadcast across frames, each
/// row reshaped to `shape`.
pub fn reconstruct_frames(
    data: &Array2<f64>,
    reference: &[f64],
    shape: (usize, usize),
) -> Result<Array3<f64>> {
    let (rows, cols) = shape;
    if data.ncols() != reference.len() || reference.len() != rows * cols {
        return Err(RigError::SchemaMismatch(format!(
            "cannot reshape {} cells against {} reference cells to {rows}x{cols}",
            data.ncols(),
            reference.len()
        )));
    }

    let mut out = Array3::zeros((data.nrows(), rows, cols));
    for (i, row) in data.outer_iter().enumerate() {
        for (j, (&raw, &offset)) in row.iter().zip(reference).enumerate() {
            out[[i, j / cols, j % cols]] = (raw - offset).max(0.0);
        }
    }
    Ok(out)
}
