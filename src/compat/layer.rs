use crate::foundation::core::VersionId;
use crate::foundation::error::MigrateResult;
use crate::xml::{self, Element};

/// Result of one layer: the rewritten document and its advisory notes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayerOutput {
    pub data: Vec<u8>,
    pub warnings: Vec<String>,
}

/// One directional transform between two adjacent versions.
///
/// Layers are not invertible by construction; the reverse direction is a separate layer.
pub trait Layer: Send + Sync {
    fn source(&self) -> VersionId;
    fn target(&self) -> VersionId;
    fn transform(&self, data: &[u8]) -> MigrateResult<LayerOutput>;
}

/// Advisory notes gathered while rewriting a tree.
///
/// Notes never decide success; a hard problem is an `Err` instead.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MigrationLog {
    lines: Vec<String>,
}

impl MigrationLog {
    pub fn warn(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        tracing::debug!(note = %msg, "migration note");
        self.lines.push(msg);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

/// Rewrites an owned tree. The input tree is consumed; the layer never sees it again.
pub type TreeEdit = fn(Element, &mut MigrationLog) -> MigrateResult<Element>;

/// A layer that parses, applies a [`TreeEdit`], and serializes.
#[derive(Clone, Copy)]
pub struct TreeLayer {
    source: VersionId,
    target: VersionId,
    edit: TreeEdit,
}

impl TreeLayer {
    pub fn new(source: VersionId, target: VersionId, edit: TreeEdit) -> Self {
        Self {
            source,
            target,
            edit,
        }
    }
}

impl std::fmt::Debug for TreeLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeLayer")
            .field("source", &self.source)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl Layer for TreeLayer {
    fn source(&self) -> VersionId {
        self.source
    }

    fn target(&self) -> VersionId {
        self.target
    }

    fn transform(&self, data: &[u8]) -> MigrateResult<LayerOutput> {
        let root = xml::parse(data)?;
        let mut log = MigrationLog::default();
        let root = (self.edit)(root, &mut log)?;
        Ok(LayerOutput {
            data: xml::to_bytes(&root)?,
            warnings: log.into_lines(),
        })
    }
}
