//! Built-in settings schema and default values

use super::{tree::Group, value::Leaf};

/// Groups that mirror live display output and are never persisted
pub const EXCLUDED_GROUPS: &[&str] = &["display"];

/// Build the default settings tree.
///
/// Leaf identity (group + key) is fixed here for the life of the process;
/// only values change afterwards.
pub fn default_root() -> Group {
    Group::new()
        .with_group(
            "colour",
            Group::new()
                .with_leaf("background", Leaf::str("black"))
                .with_leaf("finished", Leaf::str("red"))
                .with_leaf("primary", Leaf::str("green"))
                .with_leaf("warning", Leaf::str("orange")),
        )
        .with_group(
            "display",
            Group::new()
                .with_leaf("background", Leaf::str("black"))
                .with_leaf("foreground", Leaf::str("green"))
                .with_leaf("title", Leaf::str(""))
                .with_leaf("time", Leaf::str(""))
                .with_leaf("speaker", Leaf::str("")),
        )
        .with_group(
            "initial",
            Group::new()
                .with_leaf("duration", Leaf::int(540))
                .with_leaf("title", Leaf::str("My Webinar"))
                .with_leaf("time", Leaf::str(""))
                .with_leaf("speaker", Leaf::str("Welcome"))
                .with_leaf("warning", Leaf::int(60))
                .with_leaf("width", Leaf::int(1280))
                .with_leaf("height", Leaf::int(720)),
        )
        .with_group(
            "next",
            Group::new()
                .with_leaf("duration", Leaf::int(540))
                .with_leaf("speaker", Leaf::str("John Smith"))
                .with_leaf("title", Leaf::str("My Webinar"))
                .with_leaf("warning", Leaf::int(60)),
        )
        .with_leaf("finished_text", Leaf::str("STOP"))
}

/// Whether a top-level node is excluded from file persistence
pub fn is_excluded(name: &str) -> bool {
    EXCLUDED_GROUPS.contains(&name)
}
