use std::fmt;

use serde::{Deserialize, Serialize};

/// Asset family handled by one compatibility manager.
///
/// Categories never interoperate: a layout detector is never consulted for a font.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Font,
    Imageset,
    Layout,
    Scheme,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Font,
        Category::Imageset,
        Category::Layout,
        Category::Scheme,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Font => "font",
            Category::Imageset => "imageset",
            Category::Layout => "layout",
            Category::Scheme => "scheme",
        }
    }

    /// Guess the category from a file extension (with or without the leading dot).
    pub fn from_extension(extension: &str) -> Option<Self> {
        let ext = normalize_extension(extension);
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(ext))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque tag naming one historical format revision within a category.
///
/// Only equality matters; the framework never interprets the text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct VersionId(&'static str);

impl VersionId {
    pub const fn new(tag: &'static str) -> Self {
        Self(tag)
    }

    pub fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl PartialEq<str> for VersionId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for VersionId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Requested end point of a migration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TargetVersion {
    /// The newest version the category knows about.
    #[default]
    Latest,
    Exact(String),
}

impl TargetVersion {
    pub fn exact(tag: impl Into<String>) -> Self {
        Self::Exact(tag.into())
    }
}

impl From<&str> for TargetVersion {
    fn from(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("latest") {
            Self::Latest
        } else {
            Self::Exact(s.to_owned())
        }
    }
}

impl From<VersionId> for TargetVersion {
    fn from(v: VersionId) -> Self {
        Self::Exact(v.as_str().to_owned())
    }
}

impl fmt::Display for TargetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetVersion::Latest => f.write_str("latest"),
            TargetVersion::Exact(tag) => f.write_str(tag),
        }
    }
}

/// Strip a leading dot; an empty result means "unknown extension".
pub fn normalize_extension(extension: &str) -> &str {
    extension.strip_prefix('.').unwrap_or(extension)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
