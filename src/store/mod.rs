/// Store layer: the hierarchical container each modality's records live in.
///
/// Architecture:
/// ```text
///   extraction routines
///         │  Group per session
///         ▼
///   ┌───────────┐
///   │ Container  │  session key → Group tree
///   └───────────┘
///         │  bincode, tmp + rename
///         ▼
///   <modality>Dataset.bin
/// ```
pub mod container;
pub mod group;

pub use container::Container;
pub use group::Group;
