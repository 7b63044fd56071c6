use std::collections::{HashSet, VecDeque};

use serde::Serialize;

use crate::compat::detector::TypeDetector;
use crate::compat::layer::Layer;
use crate::foundation::core::{Category, TargetVersion, VersionId};
use crate::foundation::error::{MigrateError, MigrateResult};

/// One applied layer and the notes it produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub source: VersionId,
    pub target: VersionId,
    pub warnings: Vec<String>,
}

/// Outcome of a successful migration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Migrated {
    pub data: Vec<u8>,
    pub detected: VersionId,
    pub target: VersionId,
    /// Empty when the input already was at the target version.
    pub steps: Vec<StepRecord>,
}

impl Migrated {
    pub fn is_unchanged(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.steps
            .iter()
            .flat_map(|s| s.warnings.iter().map(String::as_str))
    }

    /// Human-readable log, grouped per step so each note keeps its provenance.
    pub fn log_text(&self) -> String {
        let mut out = String::new();
        for step in self.steps.iter().filter(|s| !s.warnings.is_empty()) {
            out.push_str(&format!("{} -> {}:\n", step.source, step.target));
            for w in &step.warnings {
                out.push_str("    ");
                out.push_str(w);
                out.push('\n');
            }
        }
        out
    }
}

/// Detectors and layers of one category, plus the path search over them.
///
/// Immutable after construction; one instance can serve any number of callers.
pub struct CompatibilityManager {
    category: Category,
    versions: Vec<VersionId>,
    detectors: Vec<Box<dyn TypeDetector>>,
    layers: Vec<Box<dyn Layer>>,
}

impl CompatibilityManager {
    /// `versions` is ordered oldest to newest; detectors are tried in the given order.
    pub fn new(
        category: Category,
        versions: Vec<VersionId>,
        detectors: Vec<Box<dyn TypeDetector>>,
        layers: Vec<Box<dyn Layer>>,
    ) -> Self {
        Self {
            category,
            versions,
            detectors,
            layers,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn versions(&self) -> &[VersionId] {
        &self.versions
    }

    pub fn latest(&self) -> Option<VersionId> {
        self.versions.last().copied()
    }

    pub fn find_version(&self, tag: &str) -> Option<VersionId> {
        self.versions.iter().copied().find(|v| *v == tag)
    }

    pub fn detectors(&self) -> impl Iterator<Item = &dyn TypeDetector> {
        self.detectors.iter().map(|d| d.as_ref())
    }

    pub fn layers(&self) -> impl Iterator<Item = &dyn Layer> {
        self.layers.iter().map(|l| l.as_ref())
    }

    /// Union of the detectors' extensions, in registration order.
    pub fn extensions(&self) -> Vec<&'static str> {
        let mut out: Vec<&'static str> = Vec::new();
        for d in &self.detectors {
            for ext in d.possible_extensions() {
                if !out.contains(ext) {
                    out.push(ext);
                }
            }
        }
        out
    }

    /// First detector that accepts the data wins.
    pub fn detect(&self, data: &[u8], extension: &str) -> Option<VersionId> {
        let found = self
            .detectors
            .iter()
            .find(|d| d.matches(data, extension))
            .map(|d| d.version());
        tracing::debug!(
            category = %self.category,
            detected = found.map(VersionId::as_str),
            "version detection"
        );
        found
    }

    pub fn resolve_target(&self, target: &TargetVersion) -> Option<VersionId> {
        match target {
            TargetVersion::Latest => self.latest(),
            TargetVersion::Exact(tag) => self.find_version(tag),
        }
    }

    /// Shortest layer chain from `from` to `to`; empty when they are equal.
    ///
    /// Edges are explored in registration order, so on a linear history this is the
    /// plain walk along adjacent versions.
    pub fn plan(&self, from: VersionId, to: VersionId) -> Option<Vec<&dyn Layer>> {
        if from == to {
            return Some(Vec::new());
        }

        let mut seen = HashSet::from([from]);
        let mut queue = VecDeque::from([(from, Vec::<usize>::new())]);
        while let Some((version, path)) = queue.pop_front() {
            for (idx, layer) in self.layers.iter().enumerate() {
                if layer.source() != version || !seen.insert(layer.target()) {
                    continue;
                }
                let mut next = path.clone();
                next.push(idx);
                if layer.target() == to {
                    return Some(next.into_iter().map(|i| self.layers[i].as_ref()).collect());
                }
                queue.push_back((layer.target(), next));
            }
        }
        None
    }

    /// Detect, plan, and run the chain. No partial output is ever returned.
    #[tracing::instrument(
        level = "debug",
        skip(self, data),
        fields(category = %self.category, bytes = data.len())
    )]
    pub fn migrate(
        &self,
        data: &[u8],
        extension: &str,
        target: &TargetVersion,
        origin: Option<&str>,
    ) -> MigrateResult<Migrated> {
        let attach = |e: MigrateError| match origin {
            Some(name) => e.with_origin(name),
            None => e,
        };

        let detected = self.detect(data, extension).ok_or_else(|| {
            attach(MigrateError::UnrecognizedFormat {
                category: self.category,
                origin: None,
                target: target.to_string(),
            })
        })?;

        let no_path = || {
            attach(MigrateError::NoMigrationPath {
                category: self.category,
                origin: None,
                from: detected,
                to: target.to_string(),
            })
        };

        let target_id = self.resolve_target(target).ok_or_else(no_path)?;
        if detected == target_id {
            return Ok(Migrated {
                data: data.to_vec(),
                detected,
                target: target_id,
                steps: Vec::new(),
            });
        }

        let chain = self.plan(detected, target_id).ok_or_else(no_path)?;
        let mut current = data.to_vec();
        let mut steps = Vec::with_capacity(chain.len());
        for layer in chain {
            tracing::debug!(from = %layer.source(), to = %layer.target(), "applying layer");
            let out = layer.transform(&current)?;
            steps.push(StepRecord {
                source: layer.source(),
                target: layer.target(),
                warnings: out.warnings,
            });
            current = out.data;
        }

        Ok(Migrated {
            data: current,
            detected,
            target: target_id,
            steps,
        })
    }
}

impl std::fmt::Debug for CompatibilityManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompatibilityManager")
            .field("category", &self.category)
            .field("versions", &self.versions)
            .field("detectors", &self.detectors.len())
            .field("layers", &self.layers.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compat/manager.rs"]
mod tests;
