//! Display module
//!
//! Stateless helpers that turn timer state into what an output shows.

pub mod colour;
pub mod projector;

pub use colour::{normalize, to_rgb, DEFAULT_COLOUR};
pub use projector::{
    format_remaining, ColourState, DisplayFrame, FrameLayout, Palette, RenderedFrame,
};
