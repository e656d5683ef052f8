use ndarray::Array2;
use roxmltree::Document;

use crate::error::{Result, RigError};
use crate::store::Group;

use super::calib::FRAME_WIDTH;
use super::{parse_floats, xml};

const BLOCK: &str = "mat_daq";

/// Mat record: intervals + raw pressure table (one row per frame) + the
/// mirrored-and-flattened reference vector from the companion calibration
/// file. The reference is subtracted at read time, not here.
pub fn extract_mat(doc: &Document, reference: Vec<f64>) -> Result<Group> {
    if reference.len() != FRAME_WIDTH {
        return Err(RigError::SchemaMismatch(format!(
            "reference vector has {} cells, expected {FRAME_WIDTH}",
            reference.len()
        )));
    }

    let intervals = parse_floats("mat_daq timestamp", &xml::block_attr(doc, BLOCK, "timestamp"))?;
    if intervals.is_empty() {
        return Err(RigError::SchemaMismatch("no mat_daq frames in document".into()));
    }

    let lines = xml::sensor_attr(doc, BLOCK, "type", "mat_raw", "raw_data");
    if lines.len() != intervals.len() {
        return Err(RigError::SchemaMismatch(format!(
            "{} mat frames but {} intervals",
            lines.len(),
            intervals.len()
        )));
    }

    let mut flat = Vec::with_capacity(lines.len() * FRAME_WIDTH);
    for line in &lines {
        flat.extend(parse_frame_line(line, FRAME_WIDTH)?);
    }
    let data = Array2::from_shape_vec((lines.len(), FRAME_WIDTH), flat)
        .map_err(|e| RigError::SchemaMismatch(e.to_string()))?;

    let mut root = Group::new();
    root.set_series("intervals", intervals);
    root.set_series("ref_mat", reference);
    root.set_table("data", data);
    Ok(root)
}

/// One raw frame: space-separated integer cells with a trailing separator.
pub(crate) fn parse_frame_line(line: &str, width: usize) -> Result<Vec<f64>> {
    let cells: Vec<f64> = line
        .split_whitespace()
        .map(|tok| {
            tok.parse::<i64>().map(|v| v as f64).map_err(|_| RigError::BadNumber {
                field: "mat raw_data".to_string(),
                value: tok.to_string(),
            })
        })
        .collect::<Result<_>>()?;
    if cells.len() != width {
        return Err(RigError::SchemaMismatch(format!(
            "mat frame has {} cells, expected {width}",
            cells.len()
        )));
    }
    Ok(cells)
}
