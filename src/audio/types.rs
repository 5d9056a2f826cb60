//! Audio-related small types and handles.
//!
//! This module defines the commands understood by the audio thread, the
//! notifications it emits, and the shared playback info handle.

use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;

/// Asynchronous notifications emitted by a playback resource.
///
/// Each carries the URL of the source it concerns, so a receiver can ignore
/// events still queued from a source that has since been replaced.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceEvent {
    /// The source is decoded and its duration (if any) is known.
    MetadataReady { source: String },
    /// Playback position advanced or jumped.
    PositionChanged { source: String },
    /// The source played to its end.
    Ended { source: String },
    /// The source could not be fetched or decoded.
    Failed { source: String, reason: String },
}

impl ResourceEvent {
    pub fn source(&self) -> &str {
        match self {
            Self::MetadataReady { source }
            | Self::PositionChanged { source }
            | Self::Ended { source }
            | Self::Failed { source, .. } => source,
        }
    }
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("no audio output device: {0}")]
    NoDevice(String),
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: rodio::decoder::DecoderError,
    },
}

#[derive(Debug)]
pub enum AudioCmd {
    /// Replace the current source with the audio at this URL.
    Load(String),
    /// Internal: a download finished for the given load generation.
    Fetched {
        generation: u64,
        url: String,
        result: Result<Arc<[u8]>, OutputError>,
    },
    /// Start or resume playback (also once a pending load completes).
    Play,
    /// Pause playback.
    Pause,
    /// Jump to an absolute position in the current source.
    Seek(Duration),
    /// Set the output volume (0.0..=1.0).
    SetVolume(f32),
    /// Mute or unmute without losing the volume.
    SetMuted(bool),
    /// Register the receiver of `ResourceEvent`s.
    Subscribe(Sender<ResourceEvent>),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Runtime playback information shared between the audio thread and `RodioOutput`.
#[derive(Debug, Clone)]
pub struct PlaybackInfo {
    /// Whether the current source is decoded and attached to the output.
    pub loaded: bool,
    /// Elapsed playback time for the current source.
    pub elapsed: Duration,
    /// Total length of the current source, when known.
    pub duration: Option<Duration>,
    pub volume: f32,
    pub muted: bool,
}

impl Default for PlaybackInfo {
    fn default() -> Self {
        Self {
            loaded: false,
            elapsed: Duration::ZERO,
            duration: None,
            volume: 1.0,
            muted: false,
        }
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;

/// Volume actually sent to the sink.
pub(crate) fn effective_volume(volume: f32, muted: bool) -> f32 {
    if muted { 0.0 } else { volume.clamp(0.0, 1.0) }
}
