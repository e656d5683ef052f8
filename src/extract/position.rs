use std::collections::BTreeMap;

use roxmltree::Document;

use crate::error::{Result, RigError};
use crate::store::Group;

use super::{ensure_coindexed, parse_floats, xml};

const BLOCK: &str = "position";

/// Position record: intervals + per-frame `error` code + one subtree per
/// tracked body location. Locations and their components are not fixed by a
/// schema: each distinct sensor `location` becomes a child group, and its
/// component set is whatever float attributes the first matched element
/// carries.
pub fn extract_position(doc: &Document) -> Result<Group> {
    let intervals = parse_floats("position timestamp", &xml::block_attr(doc, BLOCK, "timestamp"))?;
    if intervals.is_empty() {
        return Err(RigError::SchemaMismatch("no position frames in document".into()));
    }

    let error = parse_floats("position error", &xml::block_attr(doc, BLOCK, "error"))?;
    if error.len() != intervals.len() {
        return Err(RigError::SchemaMismatch(format!(
            "{} position error codes but {} intervals",
            error.len(),
            intervals.len()
        )));
    }

    let sensors = xml::sensors(doc, BLOCK);

    // Discover the location → component layout from the first element seen
    // for each location.
    let mut components: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for sensor in &sensors {
        if let Some(location) = sensor.attribute("location") {
            components.entry(location).or_insert_with(|| {
                sensor
                    .attributes()
                    .filter(|a| a.name() != "location")
                    .map(|a| a.name())
                    .collect()
            });
        }
    }

    let mut root = Group::new();
    root.set_series("intervals", intervals);
    root.set_series("error", error);

    for (location, keys) in components {
        let mut group = Group::new();
        for key in keys {
            let values: Vec<&str> = sensors
                .iter()
                .filter(|s| s.attribute("location") == Some(location))
                .filter_map(|s| s.attribute(key))
                .collect();
            let field = format!("position {location} {key}");
            group.set_series(key, parse_floats(&field, &values)?);
        }
        root.add_child(location, group);
    }

    ensure_coindexed(&root)?;
    Ok(root)
}
