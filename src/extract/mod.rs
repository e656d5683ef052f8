/// Extraction layer: one session's XML log → per-modality record groups.
///
/// Architecture:
/// ```text
///  <subject>/<session>/sensors.xml
///        │
///        ▼
///   ┌──────────┐
///   │   xml     │  attribute queries over the parsed tree
///   └──────────┘
///        │
///        ▼
///   ┌────────────────────────────┐
///   │ ring / imu / mat / position │  strings → f64 series, one Group each
///   └────────────────────────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ Container  │  session key → Group, saved per modality
///   └───────────┘
/// ```
pub mod calib;
pub mod imu;
pub mod mat;
pub mod position;
pub mod ring;
pub mod xml;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use anyhow::Context;
use log::{info, warn};
use roxmltree::Document;

use crate::config::ExtractConfig;
use crate::error::{Result, RigError};
use crate::store::{Container, Group};

// ---------------------------------------------------------------------------
// Modalities
// ---------------------------------------------------------------------------

/// The four sensor categories a session may carry. Each maps to one block
/// name in the source document and one container file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, clap::ValueEnum)]
pub enum Modality {
    Ring,
    Imu,
    Mat,
    Position,
}

impl Modality {
    pub const ALL: [Modality; 4] = [Modality::Ring, Modality::Imu, Modality::Mat, Modality::Position];

    /// Block `name` attribute announcing this modality in a frame.
    pub fn block_name(self) -> &'static str {
        match self {
            Modality::Ring => "ring",
            Modality::Imu => "body_imu",
            Modality::Mat => "mat_daq",
            Modality::Position => "position",
        }
    }

    pub fn from_block_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.block_name() == name)
    }

    /// File name of this modality's container in the output directory.
    pub fn container_file(self) -> &'static str {
        match self {
            Modality::Ring => "ringDataset.bin",
            Modality::Imu => "imuDataset.bin",
            Modality::Mat => "matDataset.bin",
            Modality::Position => "positionDataset.bin",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Modality::Ring => "ring",
            Modality::Imu => "imu",
            Modality::Mat => "mat",
            Modality::Position => "position",
        };
        write!(f, "{name}")
    }
}

/// The nine raw IMU component keys, shared by the ring's onboard IMU and the
/// body-worn units.
pub const IMU_AXIS_KEYS: [&str; 9] = [
    "acc_x", "acc_y", "acc_z", "mag_x", "mag_y", "mag_z", "gyro_x", "gyro_y", "gyro_z",
];

// ---------------------------------------------------------------------------
// Per-document operations
// ---------------------------------------------------------------------------

/// Which modalities are present in this session: the distinct block names of
/// the first frame's direct children, mapped to known modalities.
pub fn detect_modalities(doc: &Document) -> BTreeSet<Modality> {
    let Some(frame) = xml::first_frame(doc) else {
        return BTreeSet::new();
    };
    frame
        .children()
        .filter(|n| n.is_element() && n.has_tag_name("block"))
        .filter_map(|b| b.attribute("name"))
        .filter_map(Modality::from_block_name)
        .collect()
}

/// Run one modality's extraction routine against a parsed document.
/// `session_dir` locates companion files (the mat calibration matrix).
pub fn extract_record(doc: &Document, modality: Modality, session_dir: &Path) -> Result<Group> {
    match modality {
        Modality::Ring => ring::extract_ring(doc),
        Modality::Imu => imu::extract_imu(doc),
        Modality::Mat => {
            let reference = calib::load_reference(session_dir)?;
            mat::extract_mat(doc, reference)
        }
        Modality::Position => position::extract_position(doc),
    }
}

// ---------------------------------------------------------------------------
// String → number conversion
// ---------------------------------------------------------------------------

pub(crate) fn parse_floats(field: &str, values: &[&str]) -> Result<Vec<f64>> {
    values
        .iter()
        .map(|v| {
            v.parse::<f64>().map_err(|_| RigError::BadNumber {
                field: field.to_string(),
                value: (*v).to_string(),
            })
        })
        .collect()
}

/// `"false"` → 0, anything else → 1 (actuator `active` flags).
pub(crate) fn parse_flags(values: &[&str]) -> Vec<f64> {
    values.iter().map(|v| if *v == "false" { 0.0 } else { 1.0 }).collect()
}

/// Every series and table row count in the record must match `intervals`.
pub(crate) fn ensure_coindexed(group: &Group) -> Result<()> {
    let n = group
        .get_series("intervals")
        .ok_or_else(|| RigError::SchemaMismatch("record has no intervals".into()))?
        .len();
    for len in group.series_lengths() {
        if len != n {
            return Err(RigError::SchemaMismatch(format!(
                "leaf length {len} does not match {n} intervals"
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Corpus driver
// ---------------------------------------------------------------------------

/// Counts reported after a full extraction run.
#[derive(Debug, Default)]
pub struct ExtractionSummary {
    /// Sessions whose document parsed (whatever modalities they carried).
    pub sessions: usize,
    /// Sessions skipped for a missing or unparsable source file.
    pub skipped: usize,
    /// Records written per modality.
    pub records: BTreeMap<Modality, usize>,
}

/// Walk `<corpus_root>/<subject>/<session>/sensors.xml` over the whole
/// corpus, extract every present modality, and save one container file per
/// modality that produced at least one record.
///
/// A missing or unparsable source skips the whole session; a failing
/// extraction routine skips that modality's record only. Both are logged,
/// neither aborts the run.
pub fn run_extraction(cfg: &ExtractConfig) -> anyhow::Result<ExtractionSummary> {
    let mut containers: BTreeMap<Modality, Container> =
        Modality::ALL.iter().map(|m| (*m, Container::new())).collect();
    let mut summary = ExtractionSummary::default();

    for subject in sorted_subdirs(&cfg.corpus_root)? {
        for session in sorted_subdirs(&cfg.corpus_root.join(&subject))? {
            let xml_path = cfg.session_xml(&subject, &session);
            info!("extracting subject={subject} session={session}");

            let text = match std::fs::read_to_string(&xml_path) {
                Ok(text) => text,
                Err(_) => {
                    warn!("{}", RigError::MissingSourceFile(xml_path));
                    summary.skipped += 1;
                    continue;
                }
            };
            let doc = match Document::parse(&text) {
                Ok(doc) => doc,
                Err(source) => {
                    warn!("{}", RigError::UnparsableSource { path: xml_path, source });
                    summary.skipped += 1;
                    continue;
                }
            };
            summary.sessions += 1;

            // Subject underscores would collide with the key separator.
            let key = format!("{}_{}", subject.replace('_', "-"), session);
            let session_dir = cfg.corpus_root.join(&subject).join(&session);

            for modality in detect_modalities(&doc) {
                match extract_record(&doc, modality, &session_dir) {
                    Ok(record) => {
                        containers.entry(modality).or_default().insert(key.clone(), record);
                        *summary.records.entry(modality).or_insert(0) += 1;
                    }
                    Err(e) => warn!("skipping {modality} record for {key}: {e}"),
                }
            }
        }
    }

    std::fs::create_dir_all(&cfg.output_dir)
        .with_context(|| format!("creating {}", cfg.output_dir.display()))?;
    for (modality, container) in &containers {
        if container.is_empty() {
            continue;
        }
        let path = cfg.output_dir.join(modality.container_file());
        container
            .save(&path)
            .with_context(|| format!("saving {}", path.display()))?;
        info!("wrote {} ({} sessions)", path.display(), container.len());
    }

    Ok(summary)
}

fn sorted_subdirs(dir: &Path) -> anyhow::Result<Vec<String>> {
    let mut names = Vec::new();
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))?;
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}
