use roxmltree::Document;

use crate::error::{Result, RigError};
use crate::store::Group;

use super::{ensure_coindexed, parse_floats, xml, IMU_AXIS_KEYS};

const BLOCK: &str = "body_imu";

/// Body-worn IMU locations, one nested group each.
pub const IMU_LOCATIONS: [&str; 3] = ["lh", "rh", "trunk"];

/// Derived measures published by the `measured_angles` sensor. Hand units
/// report azimuth/elevation against their baselines, the trunk unit reports
/// rotations.
const HAND_MEASURES: [&str; 4] = ["az", "az_base", "elev", "elev_base"];
const TRUNK_MEASURES: [&str; 4] = ["alpha", "pitch", "roll", "yaw"];

/// IMU record: intervals + per-location group of `{acc,gyro,mag}×{x,y,z}`
/// plus the location's derived measures, stored under their prefixed names.
///
/// Raw components are selected by the sensor's `name` attribute rather than
/// its position in the document, so frames may list sensors in any order.
pub fn extract_imu(doc: &Document) -> Result<Group> {
    let intervals = parse_floats("body_imu timestamp", &xml::block_attr(doc, BLOCK, "timestamp"))?;
    if intervals.is_empty() {
        return Err(RigError::SchemaMismatch("no body_imu frames in document".into()));
    }

    let mut root = Group::new();
    root.set_series("intervals", intervals);

    for location in IMU_LOCATIONS {
        let mut group = Group::new();

        for key in IMU_AXIS_KEYS {
            let field = format!("{location} {key}");
            group.set_series(key, parse_floats(&field, &xml::sensor_attr(doc, BLOCK, "name", location, key))?);
        }

        let measures = if location == "trunk" { &TRUNK_MEASURES } else { &HAND_MEASURES };
        for measure in measures {
            let key = format!("{location}_{measure}");
            let values = xml::sensor_attr(doc, BLOCK, "type", "measured_angles", &key);
            group.set_series(key.clone(), parse_floats(&key, &values)?);
        }

        root.add_child(location, group);
    }

    ensure_coindexed(&root)?;
    Ok(root)
}
