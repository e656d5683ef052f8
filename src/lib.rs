//! Converts heterogeneous XML sensor logs from a child-development research
//! rig into per-modality binary datasets, and provides read-side accessors
//! that index, denormalize, and reshape the stored data.
//!
//! Two independent phases:
//! * [`extract`] walks one session's document per `(subject, session)` pair,
//!   detects which modalities are present, and writes one record per modality
//!   into that modality's [`store::Container`].
//! * [`dataset`] wraps a saved container and materializes postprocessed trial
//!   records ([`dataset::SessionStore`]), with columnar merging and Parquet
//!   export ([`export`]) for bulk analysis.

pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod extract;
pub mod store;

pub use config::ExtractConfig;
pub use error::RigError;
