//! Imagesets: 0.7 (versionless, PascalCase attributes) and 0.8 (`version="2"`).

use crate::compat::{CompatibilityManager, MigrationLog, TreeLayer, XmlDetector};
use crate::formats::common::{
    Direction, RenameTable, downgrade_auto_scaled, drop_attrs, mark_version, rename_attrs,
    unmark_version,
};
use crate::foundation::core::{Category, VersionId};
use crate::foundation::error::MigrateResult;
use crate::xml::Element;

pub const IMAGESET_1: VersionId = VersionId::new("CEGUI imageset 1");
pub const IMAGESET_2: VersionId = VersionId::new("CEGUI imageset 2");

const ROOT_TAG: &str = "Imageset";
const EXTENSIONS: &[&str] = &["imageset"];

const ROOT_RENAMES: RenameTable = &[
    ("Name", "name"),
    ("Imagefile", "imagefile"),
    ("ResourceGroup", "resourceGroup"),
    ("NativeHorzRes", "nativeHorzRes"),
    ("NativeVertRes", "nativeVertRes"),
    ("AutoScaled", "autoScaled"),
];

const IMAGE_RENAMES: RenameTable = &[
    ("Name", "name"),
    ("XPos", "xPos"),
    ("YPos", "yPos"),
    ("Width", "width"),
    ("Height", "height"),
    ("XOffset", "xOffset"),
    ("YOffset", "yOffset"),
];

/// Per-image attributes that only exist from version 2 on.
const IMAGE_ONLY_V2: &[&str] = &["type", "autoScaled", "nativeHorzRes", "nativeVertRes"];

pub fn manager() -> CompatibilityManager {
    CompatibilityManager::new(
        Category::Imageset,
        vec![IMAGESET_1, IMAGESET_2],
        vec![
            Box::new(XmlDetector::versioned(IMAGESET_2, ROOT_TAG, EXTENSIONS, "2")),
            // TODO: versionless detection only checks the root; an XSD-backed check would be stricter.
            Box::new(XmlDetector::unversioned(IMAGESET_1, ROOT_TAG, EXTENSIONS)),
        ],
        vec![
            Box::new(TreeLayer::new(IMAGESET_1, IMAGESET_2, upgrade_1_to_2)),
            Box::new(TreeLayer::new(IMAGESET_2, IMAGESET_1, downgrade_2_to_1)),
        ],
    )
}

fn upgrade_1_to_2(mut root: Element, _log: &mut MigrationLog) -> MigrateResult<Element> {
    mark_version(&mut root, "2");
    rename_attrs(&mut root, ROOT_RENAMES, Direction::Upgrade);
    for image in root.elements_mut().filter(|e| e.is("Image")) {
        rename_attrs(image, IMAGE_RENAMES, Direction::Upgrade);
    }
    Ok(root)
}

fn downgrade_2_to_1(mut root: Element, log: &mut MigrationLog) -> MigrateResult<Element> {
    unmark_version(&mut root);
    rename_attrs(&mut root, ROOT_RENAMES, Direction::Downgrade);
    downgrade_auto_scaled(&mut root, "AutoScaled", log);
    for image in root.elements_mut().filter(|e| e.is("Image")) {
        drop_attrs(image, IMAGE_ONLY_V2, log);
        rename_attrs(image, IMAGE_RENAMES, Direction::Downgrade);
    }
    Ok(root)
}

#[cfg(test)]
#[path = "../../tests/unit/formats/imageset.rs"]
mod tests;
