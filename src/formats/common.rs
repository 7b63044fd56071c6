use crate::compat::layer::MigrationLog;
use crate::xml::Element;

/// Legacy name → modern name.
pub(crate) type RenameTable = &'static [(&'static str, &'static str)];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    Upgrade,
    Downgrade,
}

impl Direction {
    /// Map `name` through `table`, or return it unchanged.
    pub(crate) fn map_name<'a>(self, table: RenameTable, name: &'a str) -> &'a str {
        let hit = table.iter().find_map(|&(old, new)| match self {
            Direction::Upgrade if old == name => Some(new),
            Direction::Downgrade if new == name => Some(old),
            _ => None,
        });
        hit.unwrap_or(name)
    }
}

pub(crate) fn rename_attrs(el: &mut Element, table: RenameTable, dir: Direction) {
    for &(old, new) in table {
        match dir {
            Direction::Upgrade => el.rename_attr(old, new),
            Direction::Downgrade => el.rename_attr(new, old),
        };
    }
}

pub(crate) fn mark_version(root: &mut Element, version: &str) {
    root.insert_attr_front("version", version);
}

pub(crate) fn unmark_version(root: &mut Element) {
    root.remove_attr("version");
}

/// Remove attributes the older format does not know, noting each one.
pub(crate) fn drop_attrs(el: &mut Element, names: &[&str], log: &mut MigrationLog) {
    for name in names {
        if let Some(value) = el.remove_attr(name) {
            log.warn(format!(
                "Dropped attribute {name}=\"{value}\" from <{}>, the target version has no equivalent",
                el.name
            ));
        }
    }
}

/// 0.8 widened `autoScaled` from a boolean to an enum; older readers only take booleans.
pub(crate) fn downgrade_auto_scaled(el: &mut Element, attr: &str, log: &mut MigrationLog) {
    let Some(value) = el.attr(attr) else {
        return;
    };
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("true") || trimmed.eq_ignore_ascii_case("false") {
        return;
    }
    let value = value.to_owned();
    el.set_attr(attr, "true");
    log.warn(format!(
        "<{}> {attr}=\"{value}\" has no boolean equivalent, using \"true\"",
        el.name
    ));
}

#[cfg(test)]
#[path = "../../tests/unit/formats/common.rs"]
mod tests;
