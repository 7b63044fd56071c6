//! Fonts: 0.6 (preloaded glyph sets), 0.7 (versionless) and 0.8 (`version="3"`).

use crate::compat::{CompatibilityManager, MigrationLog, TreeLayer, XmlDetector};
use crate::formats::common::{
    Direction, RenameTable, downgrade_auto_scaled, mark_version, rename_attrs, unmark_version,
};
use crate::foundation::core::{Category, VersionId};
use crate::foundation::error::MigrateResult;
use crate::xml::{Element, Node};

pub const FONT_1: VersionId = VersionId::new("CEGUI font 1");
pub const FONT_2: VersionId = VersionId::new("CEGUI font 2");
pub const FONT_3: VersionId = VersionId::new("CEGUI font 3");

const ROOT_TAG: &str = "Font";
const EXTENSIONS: &[&str] = &["font"];

/// Children that only 0.6 understands; 0.7 renders glyphs on demand.
const GLYPH_ELEMENTS: &[&str] = &["GlyphRange", "GlyphSet"];

const ROOT_RENAMES: RenameTable = &[
    ("Name", "name"),
    ("Filename", "filename"),
    ("ResourceGroup", "resourceGroup"),
    ("Type", "type"),
    ("Size", "size"),
    ("NativeHorzRes", "nativeHorzRes"),
    ("NativeVertRes", "nativeVertRes"),
    ("AutoScaled", "autoScaled"),
    ("AntiAlias", "antiAlias"),
    ("LineSpacing", "lineSpacing"),
];

const MAPPING_RENAMES: RenameTable = &[
    ("Codepoint", "codepoint"),
    ("Image", "image"),
    ("HorzAdvance", "horzAdvance"),
];

pub fn manager() -> CompatibilityManager {
    CompatibilityManager::new(
        Category::Font,
        vec![FONT_1, FONT_2, FONT_3],
        vec![
            Box::new(XmlDetector::versioned(FONT_3, ROOT_TAG, EXTENSIONS, "3")),
            Box::new(
                XmlDetector::unversioned(FONT_1, ROOT_TAG, EXTENSIONS).with_structure(has_glyph_sets),
            ),
            Box::new(
                XmlDetector::unversioned(FONT_2, ROOT_TAG, EXTENSIONS).with_structure(lacks_glyph_sets),
            ),
        ],
        vec![
            Box::new(TreeLayer::new(FONT_1, FONT_2, upgrade_1_to_2)),
            Box::new(TreeLayer::new(FONT_2, FONT_1, downgrade_2_to_1)),
            Box::new(TreeLayer::new(FONT_2, FONT_3, upgrade_2_to_3)),
            Box::new(TreeLayer::new(FONT_3, FONT_2, downgrade_3_to_2)),
        ],
    )
}

fn has_glyph_sets(root: &Element) -> bool {
    root.elements().any(|e| GLYPH_ELEMENTS.contains(&e.name.as_str()))
}

fn lacks_glyph_sets(root: &Element) -> bool {
    !has_glyph_sets(root)
}

fn upgrade_1_to_2(mut root: Element, log: &mut MigrationLog) -> MigrateResult<Element> {
    let mut dropped = 0usize;
    root.retain_elements(|e| {
        let glyphs = GLYPH_ELEMENTS.contains(&e.name.as_str());
        dropped += usize::from(glyphs);
        !glyphs
    });
    if dropped > 0 {
        log.warn(format!(
            "Removed {dropped} GlyphRange/GlyphSet element(s), glyphs are now created on demand"
        ));
    }
    Ok(root)
}

fn downgrade_2_to_1(mut root: Element, log: &mut MigrationLog) -> MigrateResult<Element> {
    let freetype = root
        .attr("Type")
        .is_some_and(|t| t.trim().eq_ignore_ascii_case("FreeType"));
    if freetype && !has_glyph_sets(&root) {
        let range = Element::new("GlyphRange")
            .with_attr("StartCodepoint", "32")
            .with_attr("EndCodepoint", "127");
        root.children.insert(0, Node::Element(range));
        log.warn("Added default GlyphRange 32-127 so the font preloads printable ASCII");
    } else if !has_glyph_sets(&root) {
        log.warn(
            "Font has no glyph sets to restore, the output is indistinguishable from the 0.7 format and will detect as such",
        );
    }
    Ok(root)
}

fn upgrade_2_to_3(mut root: Element, _log: &mut MigrationLog) -> MigrateResult<Element> {
    mark_version(&mut root, "3");
    rename_attrs(&mut root, ROOT_RENAMES, Direction::Upgrade);
    for mapping in root.elements_mut().filter(|e| e.is("Mapping")) {
        rename_attrs(mapping, MAPPING_RENAMES, Direction::Upgrade);
    }
    Ok(root)
}

fn downgrade_3_to_2(mut root: Element, log: &mut MigrationLog) -> MigrateResult<Element> {
    unmark_version(&mut root);
    rename_attrs(&mut root, ROOT_RENAMES, Direction::Downgrade);
    downgrade_auto_scaled(&mut root, "AutoScaled", log);
    for mapping in root.elements_mut().filter(|e| e.is("Mapping")) {
        rename_attrs(mapping, MAPPING_RENAMES, Direction::Downgrade);
    }
    Ok(root)
}

#[cfg(test)]
#[path = "../../tests/unit/formats/font.rs"]
mod tests;
