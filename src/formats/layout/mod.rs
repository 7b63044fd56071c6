//! Layouts: 0.6 (legacy auto windows), 0.7 (versionless) and 0.8 (`version="4"`).
//!
//! 0.7 → 0.8 is the heavy step. Window names become parent-relative, a handful of
//! properties are renamed, image references switch from `set:X image:Y` to `X/Y`,
//! and every attribute goes to camelCase.

mod legacy;
mod names;
mod properties;

use crate::compat::{CompatibilityManager, MigrationLog, TreeLayer, XmlDetector};
use crate::formats::common::{Direction, RenameTable, mark_version, rename_attrs, unmark_version};
use crate::foundation::core::{Category, VersionId};
use crate::foundation::error::MigrateResult;
use crate::xml::Element;

pub const LAYOUT_2: VersionId = VersionId::new("CEGUI layout 2");
pub const LAYOUT_3: VersionId = VersionId::new("CEGUI layout 3");
pub const LAYOUT_4: VersionId = VersionId::new("CEGUI layout 4");

const ROOT_TAG: &str = "GUILayout";
const EXTENSIONS: &[&str] = &["layout"];

const ELEMENT_RENAMES: &[(&str, RenameTable)] = &[
    ("Window", &[("Type", "type"), ("Name", "name")]),
    ("Property", &[("Name", "name"), ("Value", "value")]),
    ("Event", &[("Name", "name"), ("Function", "function")]),
    ("UserString", &[("Name", "name"), ("Value", "value")]),
    (
        "LayoutImport",
        &[("Filename", "filename"), ("ResourceGroup", "resourceGroup")],
    ),
];

pub fn manager() -> CompatibilityManager {
    CompatibilityManager::new(
        Category::Layout,
        vec![LAYOUT_2, LAYOUT_3, LAYOUT_4],
        vec![
            Box::new(XmlDetector::versioned(LAYOUT_4, ROOT_TAG, EXTENSIONS, "4")),
            Box::new(
                XmlDetector::unversioned(LAYOUT_2, ROOT_TAG, EXTENSIONS)
                    .with_structure(legacy::has_legacy_auto_windows),
            ),
            Box::new(
                XmlDetector::unversioned(LAYOUT_3, ROOT_TAG, EXTENSIONS)
                    .with_structure(legacy::lacks_legacy_auto_windows),
            ),
        ],
        vec![
            Box::new(TreeLayer::new(LAYOUT_2, LAYOUT_3, legacy::upgrade)),
            Box::new(TreeLayer::new(LAYOUT_3, LAYOUT_2, legacy::downgrade)),
            Box::new(TreeLayer::new(LAYOUT_3, LAYOUT_4, upgrade_3_to_4)),
            Box::new(TreeLayer::new(LAYOUT_4, LAYOUT_3, downgrade_4_to_3)),
        ],
    )
}

fn upgrade_3_to_4(mut root: Element, log: &mut MigrationLog) -> MigrateResult<Element> {
    if let Some(parent) = root.remove_attr("Parent") {
        log.warn(format!(
            "Dropped GUILayout Parent=\"{parent}\", layouts are attached by the application from 0.8 on"
        ));
    }
    names::relativize(&mut root, log);
    names::rename_auto_window_paths(&mut root, Direction::Upgrade);
    properties::migrate(&mut root, Direction::Upgrade, log)?;
    rename_elements(&mut root, Direction::Upgrade, log);
    mark_version(&mut root, "4");
    Ok(root)
}

fn downgrade_4_to_3(mut root: Element, log: &mut MigrationLog) -> MigrateResult<Element> {
    unmark_version(&mut root);
    rename_elements(&mut root, Direction::Downgrade, log);
    properties::migrate(&mut root, Direction::Downgrade, log)?;
    names::rename_auto_window_paths(&mut root, Direction::Downgrade);
    names::absolutize(&mut root);
    Ok(root)
}

fn rename_elements(el: &mut Element, dir: Direction, log: &mut MigrationLog) {
    if let Some((_, table)) = ELEMENT_RENAMES.iter().find(|(tag, _)| el.is(tag)) {
        rename_attrs(el, *table, dir);
    }
    if dir == Direction::Upgrade
        && el.is("LayoutImport")
        && let Some(prefix) = el.remove_attr("Prefix")
    {
        log.warn(format!(
            "Dropped LayoutImport Prefix=\"{prefix}\", imported names are relative from 0.8 on"
        ));
    }
    for child in el.elements_mut() {
        rename_elements(child, dir, log);
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/formats/layout/mod.rs"]
mod tests;
