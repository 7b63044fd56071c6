//! Property names and image-reference values between 0.7 and 0.8 layouts.

use crate::compat::MigrationLog;
use crate::formats::common::{Direction, RenameTable};
use crate::foundation::error::{MigrateError, MigrateResult};
use crate::xml::Element;

/// Properties whose meaning did not change, only their name.
const PROPERTY_RENAMES: RenameTable = &[
    ("UnifiedAreaRect", "Area"),
    ("UnifiedPosition", "Position"),
    ("UnifiedSize", "Size"),
    ("UnifiedMinSize", "MinSize"),
    ("UnifiedMaxSize", "MaxSize"),
    ("Tooltip", "TooltipText"),
    ("CustomTooltipType", "TooltipType"),
];

/// Image properties every window has.
const COMMON_IMAGE_PROPERTIES: &[&str] = &["MouseCursorImage"];

/// Widget type suffix → its image-valued properties.
const KNOWN_WIDGETS: &[(&str, &[&str])] = &[
    ("StaticImage", &["Image"]),
    (
        "FrameWindow",
        &[
            "NSSizingCursorImage",
            "EWSizingCursorImage",
            "NWSESizingCursorImage",
            "NESWSizingCursorImage",
            "TopLeftSizingCursorImage",
            "TopRightSizingCursorImage",
            "BottomLeftSizingCursorImage",
            "BottomRightSizingCursorImage",
        ],
    ),
    (
        "ImageButton",
        &["NormalImage", "HoverImage", "PushedImage", "DisabledImage"],
    ),
    (
        "ListHeaderSegment",
        &["MovingCursorImage", "SizingCursorImage"],
    ),
    ("DragContainer", &["DragCursorImage"]),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ImagePolicy {
    NotImage,
    /// Known widget and property: a bad value fails the migration.
    Strict,
    /// Unknown widget, name ends in "Image": convert if possible, otherwise note and skip.
    Speculative,
}

pub(crate) fn image_policy(window_type: Option<&str>, property: &str) -> ImagePolicy {
    let known = window_type.and_then(|t| {
        KNOWN_WIDGETS
            .iter()
            .find(|(suffix, _)| t.ends_with(suffix))
    });
    match known {
        Some((_, props)) => {
            if props.contains(&property) || COMMON_IMAGE_PROPERTIES.contains(&property) {
                ImagePolicy::Strict
            } else {
                ImagePolicy::NotImage
            }
        }
        // May misfire on a non-image property that happens to end in "Image".
        None if property.ends_with("Image") => ImagePolicy::Speculative,
        None => ImagePolicy::NotImage,
    }
}

/// `set:<imageset> image:<name>` → `<imageset>/<name>`. Empty means "no image".
pub(crate) fn legacy_to_path(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return Some(String::new());
    }
    let (set_part, image) = value.split_once("image:")?;
    let set = set_part.trim().strip_prefix("set:")?.trim();
    let image = image.trim();
    if set.is_empty() || image.is_empty() {
        return None;
    }
    Some(format!("{set}/{image}"))
}

/// `<imageset>/<name>` → `set:<imageset> image:<name>`. Image names may contain `/`.
pub(crate) fn path_to_legacy(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return Some(String::new());
    }
    let (set, image) = value.split_once('/')?;
    if set.is_empty() || image.is_empty() {
        return None;
    }
    Some(format!("set:{set} image:{image}"))
}

/// Migrate every `Property` under `root`, keyed by the owning window's type.
pub(crate) fn migrate(root: &mut Element, dir: Direction, log: &mut MigrationLog) -> MigrateResult<()> {
    walk(root, None, dir, log)
}

fn walk(
    el: &mut Element,
    window_type: Option<&str>,
    dir: Direction,
    log: &mut MigrationLog,
) -> MigrateResult<()> {
    for child in el.elements_mut() {
        match child.name.as_str() {
            "Property" => migrate_property(child, window_type, dir, log)?,
            "Window" => {
                let own_type = child.attr("Type").map(str::to_owned);
                walk(child, own_type.as_deref(), dir, log)?;
            }
            "AutoWindow" => walk(child, None, dir, log)?,
            _ => {}
        }
    }
    Ok(())
}

fn migrate_property(
    prop: &mut Element,
    window_type: Option<&str>,
    dir: Direction,
    log: &mut MigrationLog,
) -> MigrateResult<()> {
    let Some(name) = prop.attr("Name").map(str::to_owned) else {
        return Ok(());
    };
    let renamed = dir.map_name(PROPERTY_RENAMES, &name).to_owned();
    if renamed != name {
        prop.set_attr("Name", renamed.as_str());
    }

    let modern = match dir {
        Direction::Upgrade => renamed.as_str(),
        Direction::Downgrade => name.as_str(),
    };
    let policy = image_policy(window_type, modern);
    if policy == ImagePolicy::NotImage {
        return Ok(());
    }

    let (value, in_attr) = match prop.attr("Value") {
        Some(v) => (v.to_owned(), true),
        None => match prop.text() {
            Some(t) => (t, false),
            None => return Ok(()),
        },
    };
    let converted = match dir {
        Direction::Upgrade => legacy_to_path(&value),
        Direction::Downgrade => path_to_legacy(&value),
    };

    match (converted, policy) {
        (Some(new), _) if in_attr => prop.set_attr("Value", new),
        (Some(new), _) => prop.set_text(new),
        (None, ImagePolicy::Strict) => {
            return Err(MigrateError::malformed_reference(
                value,
                format!(
                    "property '{modern}' of window type '{}'",
                    window_type.unwrap_or_default()
                ),
            ));
        }
        (None, _) => log.warn(format!(
            "Left property '{modern}' = '{value}' as is: it looks like an image reference but does not parse as one"
        )),
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../../tests/unit/formats/layout/properties.rs"]
mod tests;
