//! Translation from timer state to display text, colours and layout

use serde::{Deserialize, Serialize};

use super::colour::{normalize, to_rgb};
use crate::settings::{paths, SettingsTree, Value};

/// Format seconds as `MM:SS`.
///
/// Minutes are not wrapped at the hour, so 3661 seconds is `61:01`.
/// Negative values keep a leading minus sign.
pub fn format_remaining(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let abs = seconds.unsigned_abs();
    format!("{}{:02}:{:02}", sign, abs / 60, abs % 60)
}

/// Which palette entry the foreground should use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColourState {
    Primary,
    Warning,
    Finished,
}

impl ColourState {
    /// Finished at zero or below, warning at or below the threshold
    pub fn for_remaining(remaining: i64, warning: i64) -> Self {
        if remaining <= 0 {
            ColourState::Finished
        } else if remaining <= warning {
            ColourState::Warning
        } else {
            ColourState::Primary
        }
    }
}

/// Configured colours, as entered by the operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub primary: String,
    pub warning: String,
    pub finished: String,
    pub background: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: "green".to_string(),
            warning: "orange".to_string(),
            finished: "red".to_string(),
            background: "black".to_string(),
        }
    }
}

impl Palette {
    pub fn from_settings(settings: &mut SettingsTree) -> Self {
        let fallback = Self::default();
        Self {
            primary: settings
                .get_or(paths::COLOUR_PRIMARY, fallback.primary)
                .to_string(),
            warning: settings
                .get_or(paths::COLOUR_WARNING, fallback.warning)
                .to_string(),
            finished: settings
                .get_or(paths::COLOUR_FINISHED, fallback.finished)
                .to_string(),
            background: settings
                .get_or(paths::COLOUR_BACKGROUND, fallback.background)
                .to_string(),
        }
    }

    pub fn colour_for(&self, state: ColourState) -> &str {
        match state {
            ColourState::Primary => &self.primary,
            ColourState::Warning => &self.warning,
            ColourState::Finished => &self.finished,
        }
    }
}

/// Snapshot of the display mirror group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayFrame {
    pub title: String,
    pub time: String,
    pub speaker: String,
    pub foreground: String,
    pub background: String,
}

impl DisplayFrame {
    pub fn from_settings(settings: &mut SettingsTree) -> Self {
        let mut frame = Self::default();
        for path in paths::DISPLAY {
            let value = settings.get_or(path, "");
            frame.apply(path, &value);
        }
        frame
    }

    /// Update the field mirrored by `path`; false if `path` is not a display leaf
    pub fn apply(&mut self, path: &str, value: &Value) -> bool {
        let field = match path {
            paths::DISPLAY_TITLE => &mut self.title,
            paths::DISPLAY_TIME => &mut self.time,
            paths::DISPLAY_SPEAKER => &mut self.speaker,
            paths::DISPLAY_FOREGROUND => &mut self.foreground,
            paths::DISPLAY_BACKGROUND => &mut self.background,
            _ => return false,
        };
        *field = value.to_string();
        true
    }

    /// Resolve colours for an output sink. Never fails.
    pub fn render(&self) -> RenderedFrame {
        RenderedFrame {
            title: self.title.clone(),
            time: self.time.clone(),
            speaker: self.speaker.clone(),
            foreground: RenderedColour::resolve(&self.foreground, "#ffffff"),
            background: RenderedColour::resolve(&self.background, "#000000"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedColour {
    pub hex: String,
    pub rgb: [u8; 3],
}

impl RenderedColour {
    fn resolve(colour: &str, default: &str) -> Self {
        let hex = normalize(colour, default);
        let (r, g, b) = to_rgb(&hex, default).unwrap_or((0xff, 0xff, 0xff));
        Self { hex, rgb: [r, g, b] }
    }
}

/// Display frame with colours resolved to concrete values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedFrame {
    pub title: String,
    pub time: String,
    pub speaker: String,
    pub foreground: RenderedColour,
    pub background: RenderedColour,
}

/// Vertical anchoring of a text slot; text is always centred horizontally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Top,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSlot {
    pub font_size: u32,
    pub y: i64,
    pub anchor: Anchor,
}

/// Placement of title, time and speaker on an output image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameLayout {
    pub width: u32,
    pub height: u32,
    pub title: TextSlot,
    pub time: TextSlot,
    pub speaker: TextSlot,
}

impl FrameLayout {
    pub fn for_size(width: u32, height: u32) -> Self {
        let label = height / 7;
        let h = i64::from(height);
        Self {
            width,
            height,
            title: TextSlot {
                font_size: label,
                y: 5,
                anchor: Anchor::Top,
            },
            time: TextSlot {
                font_size: height / 2,
                y: h / 2 - 15,
                anchor: Anchor::Middle,
            },
            speaker: TextSlot {
                font_size: label,
                y: h - 15 - i64::from(label),
                anchor: Anchor::Top,
            },
        }
    }

    /// Layout for the output size configured in the `initial` group
    pub fn from_settings(settings: &mut SettingsTree) -> Self {
        let dimension = |value: Value, fallback: u32| {
            value
                .as_int()
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(fallback)
        };
        let width = dimension(settings.get_or(paths::INITIAL_WIDTH, 1280), 1280);
        let height = dimension(settings.get_or(paths::INITIAL_HEIGHT, 720), 720);
        Self::for_size(width, height)
    }
}
