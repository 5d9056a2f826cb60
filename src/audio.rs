//! Audio output: the `PlaybackResource` seam and its rodio implementation.
//!
//! `RodioOutput` owns a dedicated audio thread that fetches, decodes and
//! plays one source at a time, publishing progress through a shared
//! `PlaybackHandle` and notifying subscribers with `ResourceEvent`s.

mod player;
mod resource;
mod sink;
mod thread;
mod types;

pub use player::RodioOutput;
pub use resource::PlaybackResource;
pub use types::ResourceEvent;

#[cfg(test)]
mod tests;
