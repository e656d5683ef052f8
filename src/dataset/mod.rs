/// Dataset layer: read-side accessors over the per-modality containers.
///
/// Each accessor wraps one opened `Container` and shares the indexing,
/// interval, and merging behavior through the [`SessionStore`] trait; only
/// `read` differs per modality.
pub mod imu;
pub mod mat;
pub mod position;
pub mod record;
pub mod ring;

use std::collections::BTreeMap;
use std::fmt;

pub use imu::ImuDataset;
pub use mat::MatDataset;
pub use position::PositionDataset;
pub use record::{Record, Signal};
pub use ring::RingDataset;

use crate::error::{Result, RigError};
use crate::store::{Container, Group};

// ---------------------------------------------------------------------------
// Trial keys
// ---------------------------------------------------------------------------

/// How callers address a trial: by position in the id list, or by the
/// `(subject, session)` pair it was extracted from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrialKey {
    Index(usize),
    Session { subject: String, session: String },
}

impl From<usize> for TrialKey {
    fn from(index: usize) -> Self {
        TrialKey::Index(index)
    }
}

impl From<(&str, &str)> for TrialKey {
    fn from((subject, session): (&str, &str)) -> Self {
        TrialKey::Session {
            subject: subject.to_string(),
            session: session.to_string(),
        }
    }
}

impl fmt::Display for TrialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrialKey::Index(i) => write!(f, "#{i}"),
            TrialKey::Session { subject, session } => write!(f, "{subject}_{session}"),
        }
    }
}

/// `merge_all` output: per field, that field's value across every trial in
/// id order, plus the parallel id sequence.
#[derive(Debug, Clone)]
pub struct Merged {
    pub ids: Vec<String>,
    pub columns: BTreeMap<String, Vec<Signal>>,
}

// ---------------------------------------------------------------------------
// SessionStore – capability set shared by the modality accessors
// ---------------------------------------------------------------------------

pub trait SessionStore {
    /// The wrapped container (exclusively owned since construction).
    fn container(&self) -> &Container;

    /// Stored session keys, sorted; positions index into this list.
    fn ids(&self) -> &[String];

    /// Resolve a key, read intervals, and materialize the modality-specific
    /// postprocessed record.
    fn read(&self, key: &TrialKey, absolute_time: bool) -> Result<Record>;

    fn len(&self) -> usize {
        self.ids().len()
    }

    fn is_empty(&self) -> bool {
        self.ids().is_empty()
    }

    /// Canonical stored key for a trial key. `Index` must be in range,
    /// `Session` must name a stored pair; anything else is `UnknownKey`.
    fn resolve(&self, key: &TrialKey) -> Result<String> {
        match key {
            TrialKey::Index(i) => self.ids().get(*i).cloned().ok_or_else(|| {
                RigError::UnknownKey(format!("index {i} out of range 0..{}", self.len()))
            }),
            TrialKey::Session { subject, session } => {
                let id = format!("{subject}_{session}");
                if self.ids().iter().any(|stored| *stored == id) {
                    Ok(id)
                } else {
                    Err(RigError::UnknownKey(id))
                }
            }
        }
    }

    /// Stored timestamps if `absolute`, otherwise zero-shifted and rescaled
    /// to seconds (the stored unit is milliseconds).
    fn intervals(&self, stored_id: &str, absolute: bool) -> Result<Vec<f64>> {
        let group = record_group(self.container(), stored_id)?;
        let t = require_series(group, stored_id, "intervals")?;
        if absolute {
            return Ok(t.to_vec());
        }
        let t0 = t.first().copied().unwrap_or(0.0);
        Ok(t.iter().map(|v| (v - t0) / 1000.0).collect())
    }

    /// Merge every trial into columnar form. Well-defined only when all
    /// trials expose the same field set; a diverging trial fails the call.
    fn merge_all(&self) -> Result<Merged> {
        let mut merged = Merged {
            ids: self.ids().to_vec(),
            columns: BTreeMap::new(),
        };
        for (i, id) in self.ids().iter().enumerate() {
            let record = self.read(&TrialKey::Index(i), false)?;
            if i == 0 {
                for name in record.keys() {
                    merged.columns.insert(name.clone(), Vec::with_capacity(self.len()));
                }
            }
            if record.len() != merged.columns.len()
                || record.keys().any(|name| !merged.columns.contains_key(name))
            {
                return Err(RigError::SchemaMismatch(format!(
                    "trial {id} field set diverges from the first trial"
                )));
            }
            for (name, value) in record {
                if let Some(column) = merged.columns.get_mut(&name) {
                    column.push(value);
                }
            }
        }
        Ok(merged)
    }

    /// Indented layout of one stored record, for diagnostics.
    fn describe(&self, stored_id: &str) -> Result<String> {
        let group = record_group(self.container(), stored_id)?;
        Ok(format!("|{stored_id}/\n{}", group.describe()))
    }
}

// ---------------------------------------------------------------------------
// Shared lookup helpers
// ---------------------------------------------------------------------------

pub(crate) fn record_group<'a>(container: &'a Container, stored_id: &str) -> Result<&'a Group> {
    container
        .get(stored_id)
        .ok_or_else(|| RigError::UnknownKey(stored_id.to_string()))
}

pub(crate) fn require_series<'a>(group: &'a Group, id: &str, name: &str) -> Result<&'a [f64]> {
    group
        .get_series(name)
        .ok_or_else(|| RigError::SchemaMismatch(format!("record {id} has no '{name}' series")))
}

pub(crate) fn require_child<'a>(group: &'a Group, id: &str, name: &str) -> Result<&'a Group> {
    group
        .child(name)
        .ok_or_else(|| RigError::SchemaMismatch(format!("record {id} has no '{name}' group")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(ids: &[&str]) -> RingDataset {
        let mut container = Container::new();
        for (i, id) in ids.iter().enumerate() {
            let mut g = Group::new();
            g.set_series("intervals", vec![1000.0 * i as f64, 1000.0 * i as f64 + 500.0]);
            container.insert(*id, g);
        }
        RingDataset::from_container(container)
    }

    #[test]
    fn resolve_accepts_positions_and_pairs() {
        let ds = store_with(&["223_20140630-1648", "224_20140701-0930"]);
        assert_eq!(ds.resolve(&0.into()).unwrap(), "223_20140630-1648");
        assert_eq!(
            ds.resolve(&("224", "20140701-0930").into()).unwrap(),
            "224_20140701-0930"
        );
    }

    #[test]
    fn resolve_is_idempotent() {
        let ds = store_with(&["223_s1"]);
        let key: TrialKey = ("223", "s1").into();
        assert_eq!(ds.resolve(&key).unwrap(), ds.resolve(&key).unwrap());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let ds = store_with(&["223_s1"]);
        assert!(matches!(ds.resolve(&1.into()), Err(RigError::UnknownKey(_))));
        assert!(matches!(
            ds.resolve(&("999", "nope").into()),
            Err(RigError::UnknownKey(_))
        ));
    }

    #[test]
    fn relative_intervals_start_at_zero_in_seconds() {
        let ds = store_with(&["223_s1", "224_s2"]);
        let t = ds.intervals("224_s2", false).unwrap();
        assert_eq!(t, vec![0.0, 0.5]);
        let raw = ds.intervals("224_s2", true).unwrap();
        assert_eq!(raw, vec![1000.0, 1500.0]);
    }

    #[test]
    fn describe_names_the_session() {
        let ds = store_with(&["223_s1"]);
        let text = ds.describe("223_s1").unwrap();
        assert!(text.starts_with("|223_s1/"));
        assert!(text.contains("|intervals [2]"));
    }
}
