//! 0.6 auto windows.
//!
//! 0.6 layouts spell auto windows as untyped `Window`s whose name is the owner's name
//! followed by an `__auto_` suffix. 0.7 gives them their own `AutoWindow` element.

use crate::compat::MigrationLog;
use crate::foundation::error::MigrateResult;
use crate::xml::Element;

const AUTO_PREFIX: &str = "__auto_";

/// Structural marker of a 0.6 layout: legacy auto windows and no `AutoWindow` element.
pub(crate) fn has_legacy_auto_windows(root: &Element) -> bool {
    !root.any_descendant(&|e: &Element| e.is("AutoWindow")) && any_legacy(root, "")
}

pub(crate) fn lacks_legacy_auto_windows(root: &Element) -> bool {
    !has_legacy_auto_windows(root)
}

fn any_legacy(el: &Element, owner_abs: &str) -> bool {
    el.elements().filter(|c| c.is("Window")).any(|w| {
        legacy_suffix(w, owner_abs).is_some() || any_legacy(w, w.attr("Name").unwrap_or(owner_abs))
    })
}

/// The auto-window suffix of `window` relative to its owner, if it is a legacy auto window.
fn legacy_suffix<'a>(window: &'a Element, owner_abs: &str) -> Option<&'a str> {
    if !window.is("Window") || window.has_attr("Type") || owner_abs.is_empty() {
        return None;
    }
    let suffix = window.attr("Name")?.strip_prefix(owner_abs)?;
    suffix.starts_with(AUTO_PREFIX).then_some(suffix)
}

pub(crate) fn upgrade(mut root: Element, _log: &mut MigrationLog) -> MigrateResult<Element> {
    to_auto_windows(&mut root, "");
    Ok(root)
}

fn to_auto_windows(el: &mut Element, owner_abs: &str) {
    for child in el.elements_mut() {
        if let Some(suffix) = legacy_suffix(child, owner_abs).map(str::to_owned) {
            let abs = format!("{owner_abs}{suffix}");
            child.name = "AutoWindow".to_owned();
            child.remove_attr("Name");
            child.insert_attr_front("NameSuffix", suffix);
            to_auto_windows(child, &abs);
        } else if child.is("Window") {
            let abs = child
                .attr("Name")
                .map_or_else(|| owner_abs.to_owned(), str::to_owned);
            to_auto_windows(child, &abs);
        }
    }
}

pub(crate) fn downgrade(mut root: Element, log: &mut MigrationLog) -> MigrateResult<Element> {
    to_legacy_windows(&mut root, "", log);
    if !has_legacy_auto_windows(&root) {
        log.warn(
            "Layout has no auto windows in the 0.6 spelling, the output is indistinguishable from the 0.7 format and will detect as such",
        );
    }
    Ok(root)
}

fn to_legacy_windows(el: &mut Element, owner_abs: &str, log: &mut MigrationLog) {
    for child in el.elements_mut() {
        let abs = match child.name.as_str() {
            "AutoWindow" => {
                let suffix = child.remove_attr("NameSuffix").unwrap_or_default();
                if !suffix.starts_with(AUTO_PREFIX) {
                    log.warn(format!(
                        "Auto window suffix '{suffix}' under '{owner_abs}' does not start with '{AUTO_PREFIX}', older readers will treat it as a plain child window"
                    ));
                }
                let abs = format!("{owner_abs}{suffix}");
                child.name = "Window".to_owned();
                child.insert_attr_front("Name", abs.as_str());
                abs
            }
            "Window" => child
                .attr("Name")
                .map_or_else(|| owner_abs.to_owned(), str::to_owned),
            _ => continue,
        };
        to_legacy_windows(child, &abs, log);
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/formats/layout/legacy.rs"]
mod tests;
