//! Playback controller and the pieces it is built from.
//!
//! The controller exclusively owns one [`AudioResource`], republishes its
//! events as a [`PlaybackState`] snapshot, and uses the playlist [`cursor`]
//! for next/previous and auto-advance. Every `load` starts a new
//! [`Generation`]; events tagged with an older generation are dropped.

mod controller;
pub mod cursor;
mod resource;
mod types;

pub use controller::{EventOutcome, PlaybackController};
pub use resource::AudioResource;
pub use types::*;
