use roxmltree::Document;

use crate::error::{Result, RigError};
use crate::store::Group;

use super::{ensure_coindexed, parse_flags, parse_floats, xml, IMU_AXIS_KEYS};

const BLOCK: &str = "ring";

/// Ring record: intervals + `baseline` attr + `pressure {raw_value, value}`
/// + `imu {acc,gyro,mag}×{x,y,z}` + `actuators {speaker, light}`.
pub fn extract_ring(doc: &Document) -> Result<Group> {
    let intervals = parse_floats("ring timestamp", &xml::block_attr(doc, BLOCK, "timestamp"))?;
    if intervals.is_empty() {
        return Err(RigError::SchemaMismatch("no ring frames in document".into()));
    }

    let baseline = xml::first_sensor_attr(doc, BLOCK, "type", "pressure", "baseline")
        .ok_or_else(|| RigError::SchemaMismatch("ring pressure sensor has no baseline".into()))?;
    let baseline = parse_floats("ring baseline", &[baseline])?[0];

    let mut root = Group::new();
    root.set_attr("baseline", baseline);
    root.set_series("intervals", intervals);

    let mut pressure = Group::new();
    for key in ["raw_value", "value"] {
        let field = format!("ring pressure {key}");
        pressure.set_series(key, parse_floats(&field, &xml::sensor_attr(doc, BLOCK, "type", "pressure", key))?);
    }
    root.add_child("pressure", pressure);

    let mut imu = Group::new();
    for key in IMU_AXIS_KEYS {
        let field = format!("ring imu {key}");
        imu.set_series(key, parse_floats(&field, &xml::sensor_attr(doc, BLOCK, "type", "imu", key))?);
    }
    root.add_child("imu", imu);

    let mut actuators = Group::new();
    for kind in ["speaker", "light"] {
        actuators.set_series(kind, parse_flags(&xml::actuator_attr(doc, BLOCK, kind, "active")));
    }
    root.add_child("actuators", actuators);

    ensure_coindexed(&root)?;
    Ok(root)
}
