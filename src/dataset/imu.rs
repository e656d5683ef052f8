use std::path::Path;

use crate::error::Result;
use crate::extract::imu::IMU_LOCATIONS;
use crate::extract::IMU_AXIS_KEYS;
use crate::store::Container;

use super::{record_group, require_child, require_series, Record, SessionStore, Signal, TrialKey};

// ---------------------------------------------------------------------------
// ImuDataset
// ---------------------------------------------------------------------------

/// Accessor over the body-IMU container. `read` flattens each location
/// group into `{location}_{component}` fields; the derived measures are
/// already stored under their prefixed names and pass through as-is.
pub struct ImuDataset {
    container: Container,
    ids: Vec<String>,
}

impl ImuDataset {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::from_container(Container::open(path)?))
    }

    pub fn from_container(container: Container) -> Self {
        let ids = container.ids();
        Self { container, ids }
    }
}

impl SessionStore for ImuDataset {
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

        for location in IMU_LOCATIONS {
            let sensor = require_child(group, &id, location)?;
            for key in IMU_AXIS_KEYS {
                record.insert(
                    format!("{location}_{key}"),
                    Signal::Series(require_series(sensor, &id, key)?.to_vec()),
                );
            }
            // Measures are stored under their prefixed names.
            for (name, data) in &sensor.series {
                if name.starts_with(&format!("{location}_")) {
                    record.insert(name.clone(), Signal::Series(data.clone()));
                }
            }
        }

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::imu::tests::two_frame_imu_xml;

    fn dataset() -> ImuDataset {
        let text = two_frame_imu_xml();
        let doc = roxmltree::Document::parse(&text).unwrap();
        let record = crate::extract::imu::extract_imu(&doc).unwrap();
        let mut container = Container::new();
        container.insert("223_s1", record);
        ImuDataset::from_container(container)
    }

    #[test]
    fn read_prefixes_location_components() {
        let ds = dataset();
        let record = ds.read(&0.into(), false).unwrap();

        assert_eq!(record["lh_acc_x"].as_series(), Some(&[0.0, 1.0][..]));
        assert_eq!(record["trunk_gyro_z"].as_series(), Some(&[0.0, 1.0][..]));
        assert_eq!(record["rh_az"].as_series(), Some(&[0.5, 0.5][..]));
        assert_eq!(record["trunk_yaw"].as_series(), Some(&[0.5, 0.5][..]));
        assert_eq!(record["intervals"].as_series(), Some(&[0.0, 0.5][..]));
    }

    #[test]
    fn every_series_matches_interval_length() {
        let ds = dataset();
        let record = ds.read(&0.into(), false).unwrap();
        let n = record["intervals"].as_series().unwrap().len();
        for (name, signal) in &record {
            assert_eq!(signal.as_series().unwrap().len(), n, "{name}");
        }
    }
}
