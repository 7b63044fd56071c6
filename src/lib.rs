#![forbid(unsafe_code)]

pub mod batch;
pub mod compat;
pub mod config;
pub mod formats;
pub mod foundation;
pub mod xml;

pub use batch::{BatchOpts, BatchSummary, FileOutcome, FileReport, WriteMode};
pub use compat::{CompatibilityManager, Layer, Migrated, Registry, StepRecord, TypeDetector};
pub use config::BatchConfig;
pub use foundation::core::{Category, TargetVersion, VersionId};
pub use foundation::error::{MigrateError, MigrateResult};
