use std::path::Path;

use crate::error::{Result, RigError};
use crate::extract::IMU_AXIS_KEYS;
use crate::store::Container;

use super::{record_group, require_child, require_series, Record, SessionStore, Signal, TrialKey};

// ---------------------------------------------------------------------------
// RingDataset
// ---------------------------------------------------------------------------

/// Accessor over the ring container. `read` flattens the stored sensor
/// groups into a single-level record: `pressure`, `raw_pressure`,
/// `baseline`, the nine IMU axes, and the `speaker` / `light` flags.
pub struct RingDataset {
    container: Container,
    ids: Vec<String>,
}

impl RingDataset {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::from_container(Container::open(path)?))
    }

    pub fn from_container(container: Container) -> Self {
        let ids = container.ids();
        Self { container, ids }
    }
}

impl SessionStore for RingDataset {
    fn container(&self) -> &Container {
        &self.container
    }

    fn ids(&self) -> &[String] {
        &self.ids
    }

    fn read(&self, key: &TrialKey, absolute_time: bool) -> Result<Record> {
        let id = self.resolve(key)?;
        let group = record_group(&self.container, &id)?;

        let mut record = Record::new();
        record.insert("intervals".into(), Signal::Series(self.intervals(&id, absolute_time)?));

        let baseline = group
            .attr("baseline")
            .ok_or_else(|| RigError::SchemaMismatch(format!("record {id} has no baseline")))?;
        record.insert("baseline".into(), Signal::Scalar(baseline));

        let pressure = require_child(group, &id, "pressure")?;
        record.insert(
            "pressure".into(),
            Signal::Series(require_series(pressure, &id, "value")?.to_vec()),
        );
        record.insert(
            "raw_pressure".into(),
            Signal::Series(require_series(pressure, &id, "raw_value")?.to_vec()),
        );

        let imu = require_child(group, &id, "imu")?;
        for key in IMU_AXIS_KEYS {
            record.insert(key.into(), Signal::Series(require_series(imu, &id, key)?.to_vec()));
        }

        let actuators = require_child(group, &id, "actuators")?;
        for key in ["speaker", "light"] {
            record.insert(key.into(), Signal::Series(require_series(actuators, &id, key)?.to_vec()));
        }

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ring::tests::one_frame_ring_xml;
    use crate::store::Group;

    fn dataset() -> RingDataset {
        let text = one_frame_ring_xml();
        let doc = roxmltree::Document::parse(&text).unwrap();
        let record = crate::extract::ring::extract_ring(&doc).unwrap();
        let mut container = Container::new();
        container.insert("223_s1", record);
        RingDataset::from_container(container)
    }

    #[test]
    fn read_flattens_the_stored_groups() {
        let ds = dataset();
        let record = ds.read(&0.into(), false).unwrap();

        assert_eq!(record["baseline"].as_scalar(), Some(5.0));
        assert_eq!(record["pressure"].as_series(), Some(&[10.0][..]));
        assert_eq!(record["raw_pressure"].as_series(), Some(&[12.0][..]));
        assert_eq!(record["speaker"].as_series(), Some(&[1.0][..]));
        assert_eq!(record["light"].as_series(), Some(&[0.0][..]));
        assert_eq!(record["acc_x"].as_series(), Some(&[1.0][..]));
        assert_eq!(record["intervals"].as_series(), Some(&[0.0][..]));
    }

    #[test]
    fn actuator_flags_are_boolean_valued() {
        let ds = dataset();
        let record = ds.read(&0.into(), false).unwrap();
        for key in ["speaker", "light"] {
            for &v in record[key].as_series().unwrap() {
                assert!(v == 0.0 || v == 1.0);
            }
        }
    }

    #[test]
    fn merge_all_lines_columns_up_with_reads() {
        let text = one_frame_ring_xml();
        let doc = roxmltree::Document::parse(&text).unwrap();
        let mut container = Container::new();
        container.insert("223_s1", crate::extract::ring::extract_ring(&doc).unwrap());
        container.insert("224_s2", crate::extract::ring::extract_ring(&doc).unwrap());
        let ds = RingDataset::from_container(container);

        let merged = ds.merge_all().unwrap();
        assert_eq!(merged.ids.len(), 2);
        for (name, column) in &merged.columns {
            assert_eq!(column.len(), 2, "{name}");
        }
        let first = ds.read(&0.into(), false).unwrap();
        assert_eq!(merged.columns["pressure"][0], first["pressure"]);
    }

    #[test]
    fn read_with_incomplete_record_is_a_schema_mismatch() {
        let mut container = Container::new();
        let mut g = Group::new();
        g.set_series("intervals", vec![0.0]);
        g.set_attr("baseline", 1.0);
        container.insert("223_s1", g);
        let ds = RingDataset::from_container(container);
        assert!(matches!(ds.read(&0.into(), false), Err(RigError::SchemaMismatch(_))));
    }
}
