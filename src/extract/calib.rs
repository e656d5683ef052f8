use std::fs::File;
use std::path::Path;

use ndarray::{s, Array2, ShapeBuilder};

use crate::error::{Result, RigError};

// ---------------------------------------------------------------------------
// Mat calibration (companion `outMatrix.mat`)
// ---------------------------------------------------------------------------

/// Pressure-mat grid shape: 64 rows × 32 columns.
pub const MAT_ROWS: usize = 64;
pub const MAT_COLS: usize = 32;

/// Cells per frame line.
pub const FRAME_WIDTH: usize = MAT_ROWS * MAT_COLS;

const CALIB_FILE: &str = "outMatrix.mat";
const CALIB_KEY: &str = "RepairMatrix";

/// Read the session's reference matrix, mirror it left-right, and flatten it
/// row-major — the form it is stored in and subtracted from raw frames.
///
/// A missing file yields `MissingCalibration` (the caller skips the mat
/// record for that session).
pub fn load_reference(session_dir: &Path) -> Result<Vec<f64>> {
    let path = session_dir.join(CALIB_FILE);
    if !path.is_file() {
        return Err(RigError::MissingCalibration(path));
    }

    let file = File::open(&path)?;
    let mat_file = matfile::MatFile::parse(file)
        .map_err(|e| bad_calib(&path, format!("unreadable: {e}")))?;
    let array = mat_file
        .find_by_name(CALIB_KEY)
        .ok_or_else(|| bad_calib(&path, format!("no '{CALIB_KEY}' entry")))?;

    if array.size().as_slice() != [MAT_ROWS, MAT_COLS] {
        return Err(bad_calib(
            &path,
            format!("shape {:?}, expected [{MAT_ROWS}, {MAT_COLS}]", array.size()),
        ));
    }

    let real: Vec<f64> = match array.data() {
        matfile::NumericData::Double { real, .. } => real.clone(),
        matfile::NumericData::Single { real, .. } => real.iter().map(|&v| v as f64).collect(),
        other => return Err(bad_calib(&path, format!("unsupported numeric class {other:?}"))),
    };

    // MAT files are column-major.
    let grid = Array2::from_shape_vec((MAT_ROWS, MAT_COLS).f(), real)
        .map_err(|e| bad_calib(&path, e.to_string()))?;
    Ok(mirror_flatten(&grid))
}

/// Left-right mirror, then row-major flatten.
pub fn mirror_flatten(grid: &Array2<f64>) -> Vec<f64> {
    grid.slice(s![.., ..;-1]).iter().copied().collect()
}

fn bad_calib(path: &Path, message: String) -> RigError {
    RigError::SchemaMismatch(format!("calibration {}: {message}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn mirror_flatten_reverses_each_row() {
        let grid = arr2(&[[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(mirror_flatten(&grid), vec![2.0, 1.0, 4.0, 3.0]);
    }

    #[test]
    fn missing_file_is_missing_calibration() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_reference(dir.path()).unwrap_err();
        assert!(matches!(err, RigError::MissingCalibration(_)));
    }
}
