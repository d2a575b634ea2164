//! # Rendering
//!
//! Decides what happens to each frame: reframing to a portrait or landscape
//! box and an optional centered caption. The result is a [`FilterGraph`], or
//! nothing at all when the source should be stream-copied.

pub mod filter;
pub mod types;

pub use filter::{compose, FilterGraph};
pub use types::{
    AspectHandling, AspectMode, BackgroundColor, BitrateCap, RenderConfig, TextOverlay,
    DEFAULT_TEXT_SIZE,
};
