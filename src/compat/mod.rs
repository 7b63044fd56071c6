//! Version detection and layer-chain migration, independent of any concrete format.

pub mod detector;
pub mod layer;
pub mod manager;
pub mod registry;

pub use detector::{StructureCheck, TypeDetector, VersionMarker, XmlDetector};
pub use layer::{Layer, LayerOutput, MigrationLog, TreeEdit, TreeLayer};
pub use manager::{CompatibilityManager, Migrated, StepRecord};
pub use registry::Registry;
