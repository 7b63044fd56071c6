//! Schemes: 0.7 (versionless) and 0.8 (`version="5"`).
//!
//! Besides the attribute case change, 0.8 renamed the stock window renderer module and
//! moved its renderers from the `Falagard/` to the `Core/` namespace.

use crate::compat::{CompatibilityManager, MigrationLog, TreeLayer, XmlDetector};
use crate::formats::common::{Direction, RenameTable, mark_version, rename_attrs, unmark_version};
use crate::foundation::core::{Category, VersionId};
use crate::foundation::error::MigrateResult;
use crate::xml::Element;

pub const SCHEME_4: VersionId = VersionId::new("CEGUI scheme 4");
pub const SCHEME_5: VersionId = VersionId::new("CEGUI scheme 5");

const ROOT_TAG: &str = "GUIScheme";
const EXTENSIONS: &[&str] = &["scheme"];

const LEGACY_RENDERER_MODULE: &str = "CEGUIFalagardWRBase";
const CORE_RENDERER_MODULE: &str = "CEGUICoreWindowRendererSet";
const LEGACY_RENDERER_PREFIX: &str = "Falagard/";
const CORE_RENDERER_PREFIX: &str = "Core/";

const NAMED_RESOURCE: RenameTable = &[
    ("Name", "name"),
    ("Filename", "filename"),
    ("ResourceGroup", "resourceGroup"),
];

const ELEMENT_RENAMES: &[(&str, RenameTable)] = &[
    ("GUIScheme", &[("Name", "name")]),
    ("Imageset", NAMED_RESOURCE),
    ("ImagesetFromImage", NAMED_RESOURCE),
    ("Font", NAMED_RESOURCE),
    (
        "LookNFeel",
        &[("Filename", "filename"), ("ResourceGroup", "resourceGroup")],
    ),
    ("WindowSet", &[("Filename", "filename")]),
    ("WindowFactory", &[("Name", "name")]),
    ("WindowRendererSet", &[("Filename", "filename")]),
    ("WindowRendererFactory", &[("Name", "name")]),
    ("WindowAlias", &[("Alias", "alias"), ("Target", "target")]),
    (
        "FalagardMapping",
        &[
            ("WindowType", "windowType"),
            ("TargetType", "targetType"),
            ("Renderer", "renderer"),
            ("LookNFeel", "lookNFeel"),
            ("RenderEffect", "renderEffect"),
        ],
    ),
];

pub fn manager() -> CompatibilityManager {
    CompatibilityManager::new(
        Category::Scheme,
        vec![SCHEME_4, SCHEME_5],
        vec![
            Box::new(XmlDetector::versioned(SCHEME_5, ROOT_TAG, EXTENSIONS, "5")),
            Box::new(XmlDetector::unversioned(SCHEME_4, ROOT_TAG, EXTENSIONS)),
        ],
        vec![
            Box::new(TreeLayer::new(SCHEME_4, SCHEME_5, upgrade_4_to_5)),
            Box::new(TreeLayer::new(SCHEME_5, SCHEME_4, downgrade_5_to_4)),
        ],
    )
}

fn upgrade_4_to_5(mut root: Element, _log: &mut MigrationLog) -> MigrateResult<Element> {
    migrate_element(&mut root, Direction::Upgrade);
    mark_version(&mut root, "5");
    Ok(root)
}

fn downgrade_5_to_4(mut root: Element, _log: &mut MigrationLog) -> MigrateResult<Element> {
    unmark_version(&mut root);
    migrate_element(&mut root, Direction::Downgrade);
    Ok(root)
}

fn migrate_element(el: &mut Element, dir: Direction) {
    if let Some((_, table)) = ELEMENT_RENAMES.iter().find(|(tag, _)| el.is(tag)) {
        rename_attrs(el, *table, dir);
    }

    match (el.name.as_str(), dir) {
        ("WindowRendererSet", Direction::Upgrade) => {
            swap_value(el, "filename", LEGACY_RENDERER_MODULE, CORE_RENDERER_MODULE);
        }
        ("WindowRendererSet", Direction::Downgrade) => {
            swap_value(el, "Filename", CORE_RENDERER_MODULE, LEGACY_RENDERER_MODULE);
        }
        ("FalagardMapping", Direction::Upgrade) => {
            swap_prefix(el, "renderer", LEGACY_RENDERER_PREFIX, CORE_RENDERER_PREFIX);
        }
        ("FalagardMapping", Direction::Downgrade) => {
            swap_prefix(el, "Renderer", CORE_RENDERER_PREFIX, LEGACY_RENDERER_PREFIX);
        }
        _ => {}
    }

    for child in el.elements_mut() {
        migrate_element(child, dir);
    }
}

fn swap_value(el: &mut Element, attr: &str, from: &str, to: &str) {
    if el.attr(attr) == Some(from) {
        el.set_attr(attr, to);
    }
}

fn swap_prefix(el: &mut Element, attr: &str, from: &str, to: &str) {
    let renamed = el
        .attr(attr)
        .and_then(|v| v.strip_prefix(from))
        .map(|rest| format!("{to}{rest}"));
    if let Some(value) = renamed {
        el.set_attr(attr, value);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/formats/scheme.rs"]
mod tests;
