use crate::foundation::core::{VersionId, normalize_extension};
use crate::xml::{self, Element};

/// Classifies raw bytes as one specific format version.
///
/// Implementations must never panic or error on bad input: anything they cannot parse is
/// simply not their format.
pub trait TypeDetector: Send + Sync {
    fn version(&self) -> VersionId;

    /// Extensions (without dot) this format plausibly uses.
    fn possible_extensions(&self) -> &[&'static str];

    fn matches(&self, data: &[u8], extension: &str) -> bool;

    /// An empty extension means "unknown" and is always plausible.
    fn extension_plausible(&self, extension: &str) -> bool {
        let ext = normalize_extension(extension);
        ext.is_empty()
            || self
                .possible_extensions()
                .iter()
                .any(|e| e.eq_ignore_ascii_case(ext))
    }
}

/// How a version shows itself on the root element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VersionMarker {
    /// Legacy format: no `version` attribute at all.
    Absent,
    /// `version` attribute present with exactly this value.
    Exact(&'static str),
}

impl VersionMarker {
    fn as_option(self) -> Option<&'static str> {
        match self {
            VersionMarker::Absent => None,
            VersionMarker::Exact(v) => Some(v),
        }
    }
}

/// Extra check on the fully parsed tree, for versionless formats that share a root tag.
pub type StructureCheck = fn(&Element) -> bool;

/// Root-tag + version-marker detector, optionally refined by a structural check.
///
/// Without a structural check only the root element is streamed; the rest of the
/// document is never parsed.
#[derive(Clone, Debug)]
pub struct XmlDetector {
    version: VersionId,
    root_tag: &'static str,
    extensions: &'static [&'static str],
    marker: VersionMarker,
    structure: Option<StructureCheck>,
}

impl XmlDetector {
    pub fn versioned(
        version: VersionId,
        root_tag: &'static str,
        extensions: &'static [&'static str],
        marker: &'static str,
    ) -> Self {
        Self {
            version,
            root_tag,
            extensions,
            marker: VersionMarker::Exact(marker),
            structure: None,
        }
    }

    pub fn unversioned(
        version: VersionId,
        root_tag: &'static str,
        extensions: &'static [&'static str],
    ) -> Self {
        Self {
            version,
            root_tag,
            extensions,
            marker: VersionMarker::Absent,
            structure: None,
        }
    }

    pub fn with_structure(mut self, check: StructureCheck) -> Self {
        self.structure = Some(check);
        self
    }

    pub fn marker(&self) -> VersionMarker {
        self.marker
    }
}

impl TypeDetector for XmlDetector {
    fn version(&self) -> VersionId {
        self.version
    }

    fn possible_extensions(&self) -> &[&'static str] {
        self.extensions
    }

    fn matches(&self, data: &[u8], extension: &str) -> bool {
        if !self.extension_plausible(extension) {
            return false;
        }
        if !xml::check_data_version(self.root_tag, self.marker.as_option(), data) {
            return false;
        }
        match self.structure {
            None => true,
            // A document whose root looked right but fails a full parse is not ours.
            Some(check) => xml::parse(data).map(|root| check(&root)).unwrap_or(false),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compat/detector.rs"]
mod tests;
