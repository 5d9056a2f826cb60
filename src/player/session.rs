use std::time::Duration;

/// What is loaded and playing, and at what volume.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSession {
    /// Index into the current track list of the loaded track.
    pub current_index: Option<usize>,
    pub is_playing: bool,
    /// Output volume in `0.0..=1.0`.
    pub volume: f32,
    pub muted: bool,
    /// URL loaded into the playback resource.
    pub source_url: Option<String>,
}

impl PlaybackSession {
    pub fn new(volume: f32, muted: bool) -> Self {
        Self {
            current_index: None,
            is_playing: false,
            volume: volume.clamp(0.0, 1.0),
            muted,
            source_url: None,
        }
    }

    pub fn volume_percent(&self) -> u8 {
        (self.volume * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self::new(0.5, false)
    }
}

/// The player's externally visible state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlayerState {
    /// No source loaded.
    #[default]
    Idle,
    /// A track URL is being resolved.
    Loading,
    ReadyPaused,
    ReadyPlaying,
}

/// Elapsed/total time of the loaded source as last reported by the resource.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Progress {
    pub elapsed: Duration,
    pub total: Option<Duration>,
}

/// Index after `from` in a list of `len` items, wrapping to the start.
/// With nothing selected the first item is next.
pub fn next_index(from: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match from {
        Some(i) => (i + 1) % len,
        None => 0,
    })
}

/// Index before `from` in a list of `len` items, wrapping to the end.
/// With nothing selected the last item is previous.
pub fn prev_index(from: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match from {
        Some(i) => (i % len + len - 1) % len,
        None => len - 1,
    })
}
