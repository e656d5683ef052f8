use std::collections::BTreeMap;

use ndarray::Array3;

// ---------------------------------------------------------------------------
// Record – one trial's postprocessed data
// ---------------------------------------------------------------------------

/// One field of a materialized trial record.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// Record-level scalar (ring `baseline`).
    Scalar(f64),
    /// Sample series co-indexed with `intervals`.
    Series(Vec<f64>),
    /// Per-frame grids (mat reconstruction): `(frames, rows, cols)`.
    Frames(Array3<f64>),
    /// Two-level component → series mapping (position locations).
    Nested(BTreeMap<String, Vec<f64>>),
}

impl Signal {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Signal::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_series(&self) -> Option<&[f64]> {
        match self {
            Signal::Series(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_frames(&self) -> Option<&Array3<f64>> {
        match self {
            Signal::Frames(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_nested(&self) -> Option<&BTreeMap<String, Vec<f64>>> {
        match self {
            Signal::Nested(v) => Some(v),
            _ => None,
        }
    }
}

/// Field name → signal; the flat (or, for position, two-level) view handed
/// to downstream analysis.
pub type Record = BTreeMap<String, Signal>;
