use crate::error::ResourceError;

use super::types::{Generation, SubscriptionSet};

/// The single audio-rendering object a [`PlaybackController`] owns.
///
/// Transport calls are requests: their effect is reported back as
/// [`ResourceEvent`]s tagged with the generation passed to [`attach`].
/// Implementations must stop delivering events for a subscription set once it
/// has been detached, and hold at most one attached set at a time.
///
/// [`PlaybackController`]: super::PlaybackController
/// [`ResourceEvent`]: super::ResourceEvent
/// [`attach`]: AudioResource::attach
pub trait AudioResource {
    /// Start delivering events tagged with `generation`.
    fn attach(&mut self, generation: Generation) -> SubscriptionSet;

    /// Stop delivering events for `subscriptions`.
    fn detach(&mut self, subscriptions: SubscriptionSet);

    /// Replace the current source, stopping whatever was playing.
    fn set_source(&mut self, url: &str) -> Result<(), ResourceError>;

    /// Request playback. Asynchronous failure arrives as a `Failed` event.
    fn play(&mut self) -> Result<(), ResourceError>;

    fn pause(&mut self) -> Result<(), ResourceError>;

    /// Jump to `position` seconds.
    fn seek(&mut self, position: f64) -> Result<(), ResourceError>;
}
