//! Window name paths.
//!
//! Up to 0.7 every `Window` carries its absolute path from the layout root
//! (`Root/Frame/Button`); 0.8 names are relative to the parent window (`Button`).
//! Both walks run on 0.7 attribute spelling (`Name`, `NameSuffix`).

use crate::compat::MigrationLog;
use crate::formats::common::{Direction, RenameTable, rename_attrs};
use crate::xml::Element;

const AUTO_WINDOW_RENAMES: RenameTable = &[("NameSuffix", "namePath")];

/// Absolute names to parent-relative names, parents before children.
pub(crate) fn relativize(root: &mut Element, log: &mut MigrationLog) {
    for child in root.elements_mut() {
        relativize_child(child, "", log);
    }
}

fn relativize_child(el: &mut Element, parent_abs: &str, log: &mut MigrationLog) {
    let own_abs = match el.name.as_str() {
        "Window" => match el.attr("Name").map(str::to_owned) {
            Some(abs) => {
                let local = local_name(&abs, parent_abs, log);
                el.set_attr("Name", local);
                abs
            }
            None => parent_abs.to_owned(),
        },
        "AutoWindow" => auto_window_name(el, parent_abs),
        _ => return,
    };
    for child in el.elements_mut() {
        relativize_child(child, &own_abs, log);
    }
}

/// The part of `abs` below `parent_abs`.
///
/// A name that does not nest under its parent keeps only its last path segment.
pub(crate) fn local_name(abs: &str, parent_abs: &str, log: &mut MigrationLog) -> String {
    let stripped = if parent_abs.is_empty() {
        abs
    } else {
        abs.strip_prefix(parent_abs)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(abs)
    };
    match stripped.rsplit_once('/') {
        None => stripped.to_owned(),
        Some((_, last)) => {
            log.warn(format!(
                "Renamed window '{abs}' to '{last}' because it does not nest under its parent '{parent_abs}'"
            ));
            last.to_owned()
        }
    }
}

/// Parent-relative names back to absolute paths, parents before children.
pub(crate) fn absolutize(root: &mut Element) {
    for child in root.elements_mut() {
        absolutize_child(child, "");
    }
}

fn absolutize_child(el: &mut Element, parent_abs: &str) {
    let own_abs = match el.name.as_str() {
        "Window" => match el.attr("Name") {
            Some(local) => {
                let abs = join(parent_abs, local);
                el.set_attr("Name", abs.as_str());
                abs
            }
            None => parent_abs.to_owned(),
        },
        "AutoWindow" => auto_window_name(el, parent_abs),
        _ => return,
    };
    for child in el.elements_mut() {
        absolutize_child(child, &own_abs);
    }
}

fn join(parent_abs: &str, local: &str) -> String {
    if parent_abs.is_empty() {
        local.to_owned()
    } else {
        format!("{parent_abs}/{local}")
    }
}

/// 0.7 auto windows are named by appending their suffix to the owner's name.
fn auto_window_name(auto_window: &Element, owner_abs: &str) -> String {
    format!(
        "{owner_abs}{}",
        auto_window.attr("NameSuffix").unwrap_or_default()
    )
}

/// `NameSuffix` ↔ `namePath` on every auto window, nested ones included.
pub(crate) fn rename_auto_window_paths(el: &mut Element, dir: Direction) {
    if el.is("AutoWindow") {
        rename_attrs(el, AUTO_WINDOW_RENAMES, dir);
    }
    for child in el.elements_mut() {
        rename_auto_window_paths(child, dir);
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/formats/layout/names.rs"]
mod tests;
