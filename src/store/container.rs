use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RigError};

use super::group::Group;

// ---------------------------------------------------------------------------
// Container – one modality's on-disk store
// ---------------------------------------------------------------------------

/// Mapping from composite session key (`<subject>_<session>`) to that
/// session's record tree. Serialized as one bincode file per modality.
///
/// Records are inserted fully built, so a key is either absent or complete;
/// `save` writes to a temporary sibling and renames, so the file on disk is
/// never half-written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Container {
    sessions: BTreeMap<String, Group>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        bincode::deserialize_from(BufReader::new(file))
            .map_err(|e| RigError::Store(format!("decoding {}: {e}", path.display())))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let tmp = path.with_extension("tmp");
        {
            let file = File::create(&tmp)?;
            let mut writer = BufWriter::new(file);
            bincode::serialize_into(&mut writer, self)
                .map_err(|e| RigError::Store(format!("encoding {}: {e}", path.display())))?;
        }
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    pub fn insert(&mut self, key: impl Into<String>, record: Group) {
        self.sessions.insert(key.into(), record);
    }

    pub fn get(&self, key: &str) -> Option<&Group> {
        self.sessions.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.sessions.contains_key(key)
    }

    /// Session keys in stored (sorted) order.
    pub fn ids(&self) -> Vec<String> {
        self.sessions.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(v: f64) -> Group {
        let mut g = Group::new();
        g.set_series("intervals", vec![v, v + 1.0]);
        g
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ringDataset.bin");

        let mut container = Container::new();
        container.insert("223_20140630-1648", record(0.0));
        container.insert("224_20140701-0930", record(5.0));
        container.save(&path).unwrap();

        let back = Container::open(&path).unwrap();
        assert_eq!(back.ids(), vec!["223_20140630-1648", "224_20140701-0930"]);
        assert_eq!(
            back.get("223_20140630-1648").unwrap().get_series("intervals"),
            Some(&[0.0, 1.0][..])
        );
    }

    #[test]
    fn save_leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matDataset.bin");
        Container::new().save(&path).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn open_missing_file_is_io_error() {
        let err = Container::open(Path::new("/nonexistent/ds.bin")).unwrap_err();
        assert!(matches!(err, RigError::Io(_)));
    }
}
