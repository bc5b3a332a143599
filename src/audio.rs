//! rodio-backed [`AudioResource`](crate::playback::AudioResource).
//!
//! A dedicated thread owns the output stream and sink. Commands arrive over a
//! channel, media is downloaded into memory on the async runtime, and events
//! go back tagged with the generation of the attached subscription.

mod player;
mod sink;
mod thread;
mod types;

pub use player::{RodioResource, spawn};
