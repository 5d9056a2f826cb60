use std::sync::mpsc::Sender;
use std::time::Duration;

use super::types::ResourceEvent;

/// The audio output the player drives.
///
/// Commands are fire-and-forget; outcomes come back as `ResourceEvent`s on
/// the subscribed channel.
pub trait PlaybackResource {
    fn load(&mut self, url: &str);
    fn play(&mut self);
    fn pause(&mut self);

    fn current_time(&self) -> Duration;
    fn set_current_time(&mut self, position: Duration);

    fn volume(&self) -> f32;
    fn set_volume(&mut self, volume: f32);

    fn muted(&self) -> bool;
    fn set_muted(&mut self, muted: bool);

    /// Length of the loaded source, `None` until metadata is ready.
    fn duration(&self) -> Option<Duration>;

    fn subscribe(&mut self, events: Sender<ResourceEvent>);
}
