use crate::compat::manager::{CompatibilityManager, Migrated};
use crate::foundation::core::{Category, TargetVersion, VersionId};
use crate::foundation::error::{MigrateError, MigrateResult};
use crate::formats;

/// All category managers, built once and passed around explicitly.
#[derive(Debug)]
pub struct Registry {
    managers: Vec<CompatibilityManager>,
}

impl Registry {
    pub fn new(managers: Vec<CompatibilityManager>) -> Self {
        Self { managers }
    }

    /// Every format this crate knows about.
    pub fn builtin() -> Self {
        Self::new(vec![
            formats::font::manager(),
            formats::imageset::manager(),
            formats::layout::manager(),
            formats::scheme::manager(),
        ])
    }

    pub fn managers(&self) -> &[CompatibilityManager] {
        &self.managers
    }

    pub fn manager(&self, category: Category) -> Option<&CompatibilityManager> {
        self.managers.iter().find(|m| m.category() == category)
    }

    /// Migrate `data` of a known category to `target`.
    ///
    /// A category without a manager has no detectors, so it reports an unrecognized format.
    pub fn detect_and_migrate(
        &self,
        category: Category,
        data: &[u8],
        extension: &str,
        target: &TargetVersion,
    ) -> MigrateResult<Migrated> {
        self.migrate_named(category, data, extension, target, None)
    }

    /// Same as [`Registry::detect_and_migrate`], naming the input in any failure.
    pub fn migrate_named(
        &self,
        category: Category,
        data: &[u8],
        extension: &str,
        target: &TargetVersion,
        origin: Option<&str>,
    ) -> MigrateResult<Migrated> {
        match self.manager(category) {
            Some(m) => m.migrate(data, extension, target, origin),
            None => Err(MigrateError::UnrecognizedFormat {
                category,
                origin: origin.map(str::to_owned),
                target: target.to_string(),
            }),
        }
    }

    /// Try every category; the first detector hit in registration order wins.
    pub fn detect_any(&self, data: &[u8], extension: &str) -> Option<(Category, VersionId)> {
        self.managers
            .iter()
            .find_map(|m| m.detect(data, extension).map(|v| (m.category(), v)))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}
