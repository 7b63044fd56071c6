//! Batch settings loaded from a JSON file.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::batch::{BatchOpts, WriteMode};
use crate::foundation::core::{Category, TargetVersion};
use crate::foundation::error::{MigrateError, MigrateResult};

/// On-disk batch settings. Every field is optional; command-line flags override them.
///
/// ```json
/// { "category": "layout", "target": "CEGUI layout 4", "out_dir": "migrated", "parallel": true }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    pub category: Option<Category>,
    /// Version identifier, or "latest".
    pub target: Option<String>,
    pub out_dir: Option<PathBuf>,
    pub in_place: bool,
    pub backup_suffix: Option<String>,
    pub parallel: bool,
    pub threads: Option<usize>,
}

impl BatchConfig {
    pub fn from_path(path: &Path) -> MigrateResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg = serde_json::from_str(&text)
            .with_context(|| format!("parse config '{}'", path.display()))?;
        Ok(cfg)
    }

    pub fn validate(&self) -> MigrateResult<()> {
        if self.in_place && self.out_dir.is_some() {
            return Err(MigrateError::validation(
                "'in_place' and 'out_dir' are mutually exclusive",
            ));
        }
        if self.backup_suffix.is_some() && !self.in_place {
            return Err(MigrateError::validation(
                "'backup_suffix' only applies to in-place migration",
            ));
        }
        if let Some(suffix) = &self.backup_suffix
            && suffix.is_empty()
        {
            return Err(MigrateError::validation("'backup_suffix' must be non-empty"));
        }
        if self.threads == Some(0) {
            return Err(MigrateError::validation("'threads' must be >= 1 when set"));
        }
        if let Some(target) = &self.target
            && target.trim().is_empty()
        {
            return Err(MigrateError::validation("'target' must be non-empty"));
        }
        Ok(())
    }

    pub fn into_opts(self) -> MigrateResult<BatchOpts> {
        self.validate()?;
        let write = match (self.in_place, self.out_dir) {
            (true, _) => WriteMode::InPlace {
                backup_suffix: self.backup_suffix,
            },
            (false, Some(dir)) => WriteMode::OutputDir(dir),
            (false, None) => WriteMode::DryRun,
        };
        Ok(BatchOpts {
            category: self.category,
            target: self
                .target
                .as_deref()
                .map_or(TargetVersion::Latest, TargetVersion::from),
            write,
            parallel: self.parallel,
            threads: self.threads,
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
