//! Pure projection of controller state into what the terminal shows.
//!
//! Nothing here touches the terminal; `ui` renders the resulting strings.

use std::borrow::Cow;
use std::time::Duration;

use crate::audio::PlaybackResource;

use super::controller::PlayerController;
use super::session::PlayerState;

pub const PLAY_GLYPH: &str = "▶";
pub const PAUSE_GLYPH: &str = "⏸";
pub const MUTED_GLYPH: &str = "🔇";
pub const UNMUTED_GLYPH: &str = "🔊";

/// Now-playing panel contents.
#[derive(Debug, Clone, PartialEq)]
pub struct NowPlayingView {
    pub title: String,
    pub artist: String,
    pub cover: String,
    pub state: PlayerState,
    /// Position within the source, `0.0..=100.0`.
    pub progress_percent: f64,
    pub elapsed: String,
    pub total: String,
    /// Shows what the play button would do: pause while playing.
    pub play_glyph: &'static str,
    pub mute_glyph: &'static str,
    pub volume_percent: u8,
}

impl NowPlayingView {
    pub fn project<R: PlaybackResource>(player: &PlayerController<R>, default_cover: &str) -> Self {
        let session = player.session();
        let progress = player.progress();

        let (title, artist, cover) = match player.now_playing() {
            Some(track) => (
                sanitize_text(&track.title).into_owned(),
                sanitize_text(&track.artist).into_owned(),
                sanitize_text(track.cover_or(default_cover)).into_owned(),
            ),
            None => (String::new(), String::new(), default_cover.to_string()),
        };

        Self {
            title,
            artist,
            cover,
            state: player.state(),
            progress_percent: progress_percent(progress.elapsed, progress.total),
            elapsed: format_time(progress.elapsed.as_secs_f64()),
            total: progress
                .total
                .map(|t| format_time(t.as_secs_f64()))
                .unwrap_or_else(|| format_time(0.0)),
            play_glyph: if session.is_playing { PAUSE_GLYPH } else { PLAY_GLYPH },
            mute_glyph: if session.muted { MUTED_GLYPH } else { UNMUTED_GLYPH },
            volume_percent: session.volume_percent(),
        }
    }
}

/// `elapsed / total * 100`, or 0 while the total is unknown or zero.
pub fn progress_percent(elapsed: Duration, total: Option<Duration>) -> f64 {
    match total {
        Some(t) if !t.is_zero() => (elapsed.as_secs_f64() / t.as_secs_f64() * 100.0).clamp(0.0, 100.0),
        _ => 0.0,
    }
}

/// Format seconds as `M:SS`: minutes unpadded and unbounded (no hour
/// component), seconds zero-padded.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// Make catalog-supplied text safe to print: it is shown literally, and
/// control characters (ESC and friends) are replaced so they cannot drive
/// the terminal.
pub fn sanitize_text(text: &str) -> Cow<'_, str> {
    if !text.chars().any(char::is_control) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.chars()
            .map(|c| match c {
                '\t' | '\n' | '\r' => ' ',
                c if c.is_control() => '\u{FFFD}',
                c => c,
            })
            .collect(),
    )
}

/// One results-list row: `Artist - Title`, or just the title without an artist.
pub fn track_row(title: &str, artist: &str) -> String {
    let title = sanitize_text(title);
    let artist = sanitize_text(artist);
    let artist = artist.trim();
    if artist.is_empty() {
        title.into_owned()
    } else {
        format!("{} - {}", artist, title.trim())
    }
}
