use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Extraction configuration
// ---------------------------------------------------------------------------

/// The two paths the extraction phase needs, passed explicitly instead of
/// living as global constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Corpus root: one directory per subject, one subdirectory per session,
    /// each holding a `sensors.xml` (and `outMatrix.mat` for mat sessions).
    pub corpus_root: PathBuf,
    /// Where the per-modality container files are written.
    pub output_dir: PathBuf,
}

impl ExtractConfig {
    pub fn new(corpus_root: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            corpus_root: corpus_root.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Load from a JSON file: `{ "corpus_root": "...", "output_dir": "..." }`.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Source document path for one session.
    pub fn session_xml(&self, subject: &str, session: &str) -> PathBuf {
        self.corpus_root.join(subject).join(session).join("sensors.xml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_xml_path() {
        let cfg = ExtractConfig::new("/data/corpus", "/data/out");
        assert_eq!(
            cfg.session_xml("223", "20140630-1648"),
            PathBuf::from("/data/corpus/223/20140630-1648/sensors.xml")
        );
    }

    #[test]
    fn config_round_trips_through_json() {
        let cfg = ExtractConfig::new("/a", "/b");
        let text = serde_json::to_string(&cfg).unwrap();
        let back: ExtractConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back.corpus_root, cfg.corpus_root);
        assert_eq!(back.output_dir, cfg.output_dir);
    }
}
