use std::path::Path;

use crate::error::Result;
use crate::store::Container;

use super::{record_group, require_series, Record, SessionStore, Signal, TrialKey};

// ---------------------------------------------------------------------------
// PositionDataset
// ---------------------------------------------------------------------------

/// Accessor over the positional-tracking container. Unlike ring and IMU,
/// the stored layout is not flattened: each discovered body location stays a
/// two-level `location → component → series` mapping. Nonzero per-frame
/// error codes collapse to a uniform 1.0 flag.
pub struct PositionDataset {
    container: Container,
    ids: Vec<String>,
}

impl PositionDataset {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::from_container(Container::open(path)?))
    }

    pub fn from_container(container: Container) -> Self {
        let ids = container.ids();
        Self { container, ids }
    }
}

impl SessionStore for PositionDataset {
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

        let error = require_series(group, &id, "error")?
            .iter()
            .map(|&code| if code != 0.0 { 1.0 } else { 0.0 })
            .collect();
        record.insert("error".into(), Signal::Series(error));

        for (location, sensor) in &group.children {
            record.insert(location.clone(), Signal::Nested(sensor.series.clone()));
        }

        Ok(record)
    }
}
