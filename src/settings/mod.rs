//! Settings management module
//!
//! A tree of typed, observable values backed by an optional JSON file.

pub mod defaults;
pub mod tree;
pub mod value;

pub use tree::{Group, Node, SettingsTree};
pub use value::{Leaf, SubscriptionId, Value, ValueKind};

/// Dotted paths of the leaves the timer reads and writes
pub mod paths {
    pub const COLOUR_BACKGROUND: &str = "colour.background";
    pub const COLOUR_FINISHED: &str = "colour.finished";
    pub const COLOUR_PRIMARY: &str = "colour.primary";
    pub const COLOUR_WARNING: &str = "colour.warning";

    pub const DISPLAY_BACKGROUND: &str = "display.background";
    pub const DISPLAY_FOREGROUND: &str = "display.foreground";
    pub const DISPLAY_TITLE: &str = "display.title";
    pub const DISPLAY_TIME: &str = "display.time";
    pub const DISPLAY_SPEAKER: &str = "display.speaker";

    pub const INITIAL_DURATION: &str = "initial.duration";
    pub const INITIAL_TITLE: &str = "initial.title";
    pub const INITIAL_TIME: &str = "initial.time";
    pub const INITIAL_SPEAKER: &str = "initial.speaker";
    pub const INITIAL_WARNING: &str = "initial.warning";
    pub const INITIAL_WIDTH: &str = "initial.width";
    pub const INITIAL_HEIGHT: &str = "initial.height";

    pub const NEXT_DURATION: &str = "next.duration";
    pub const NEXT_SPEAKER: &str = "next.speaker";
    pub const NEXT_TITLE: &str = "next.title";
    pub const NEXT_WARNING: &str = "next.warning";

    pub const FINISHED_TEXT: &str = "finished_text";

    /// Display mirror leaves, in the order observers are wired
    pub const DISPLAY: [&str; 5] = [
        DISPLAY_BACKGROUND,
        DISPLAY_FOREGROUND,
        DISPLAY_TITLE,
        DISPLAY_TIME,
        DISPLAY_SPEAKER,
    ];
}
