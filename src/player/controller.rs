use std::collections::VecDeque;
use std::sync::Arc;
#[cfg(test)]
use std::time::{Duration, Instant};

use crate::audio::{PlaybackResource, ResourceEvent};
use crate::catalog::{Catalog, Track};

use super::fetch::{FetchOutcome, Fetcher, RequestId};
use super::session::{PlaybackSession, PlayerState, Progress, next_index, prev_index};

pub const SEARCH_FAILED: &str = "Search failed";
pub const PLAY_FAILED: &str = "Could not play track";
pub const PLAYBACK_ERROR: &str = "Playback error";

#[derive(Debug, Clone, Copy)]
struct PendingPlay {
    request: RequestId,
    index: usize,
}

/// Single owner of the track list and the playback session.
///
/// Mediates between search results, user commands and the playback
/// resource. Catalog calls are dispatched to a `Fetcher`; their outcomes are
/// applied by `pump`/`settle` on the caller's thread. Only the most recent
/// search and the most recent play request may change state; results of
/// superseded requests are dropped.
pub struct PlayerController<R: PlaybackResource> {
    tracks: Vec<Track>,
    tracks_version: u64,
    session: PlaybackSession,
    resource: R,
    fetcher: Fetcher,

    now_playing: Option<Track>,
    progress: Progress,

    pending_search: Option<RequestId>,
    pending_play: Option<PendingPlay>,

    notices: VecDeque<String>,
}

impl<R: PlaybackResource> PlayerController<R> {
    /// Create a controller driving `resource`, with the resource's volume and
    /// mute state aligned to `session`.
    pub fn new(catalog: Arc<dyn Catalog>, mut resource: R, session: PlaybackSession) -> Self {
        resource.set_volume(session.volume);
        resource.set_muted(session.muted);

        Self {
            tracks: Vec::new(),
            tracks_version: 0,
            session,
            resource,
            fetcher: Fetcher::new(catalog),
            now_playing: None,
            progress: Progress::default(),
            pending_search: None,
            pending_play: None,
            notices: VecDeque::new(),
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Bumped every time a search replaces the track list.
    pub fn tracks_version(&self) -> u64 {
        self.tracks_version
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    #[cfg(test)]
    pub fn resource_mut(&mut self) -> &mut R {
        &mut self.resource
    }

    /// Track whose source is loaded, kept even after the list is replaced.
    pub fn now_playing(&self) -> Option<&Track> {
        self.now_playing.as_ref()
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn is_searching(&self) -> bool {
        self.pending_search.is_some()
    }

    pub fn state(&self) -> PlayerState {
        if self.pending_play.is_some() {
            PlayerState::Loading
        } else if self.session.source_url.is_none() {
            PlayerState::Idle
        } else if self.session.is_playing {
            PlayerState::ReadyPlaying
        } else {
            PlayerState::ReadyPaused
        }
    }

    /// Oldest user-facing message not yet dismissed.
    pub fn notice(&self) -> Option<&str> {
        self.notices.front().map(String::as_str)
    }

    pub fn dismiss_notice(&mut self) {
        self.notices.pop_front();
    }

    fn notify(&mut self, message: &str) {
        self.notices.push_back(message.to_string());
    }

    /// Run a catalog search. Blank queries are ignored.
    pub fn search(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }
        let request = self.fetcher.search(query.to_string());
        tracing::info!(%query, ?request, "search started");
        self.pending_search = Some(request);
    }

    /// Resolve and start the track at `index`.
    ///
    /// `index` must be within the current list; call sites only hand out
    /// indices of displayed rows.
    pub fn play_track(&mut self, index: usize) {
        let Some(track) = self.tracks.get(index).cloned() else {
            tracing::warn!(index, len = self.tracks.len(), "play_track index out of range");
            return;
        };
        let request = self.fetcher.resolve(index, track);
        tracing::debug!(index, ?request, "resolving track");
        self.pending_play = Some(PendingPlay { request, index });
    }

    /// Flip between playing and paused. Without a source this does nothing.
    pub fn toggle_playback(&mut self) {
        if self.session.source_url.is_none() {
            return;
        }
        if self.session.is_playing {
            self.resource.pause();
        } else {
            self.resource.play();
        }
        self.session.is_playing = !self.session.is_playing;
    }

    /// Index navigation starts from: the in-flight request if any, else the loaded track.
    fn navigation_base(&self) -> Option<usize> {
        self.pending_play
            .map(|p| p.index)
            .or(self.session.current_index)
    }

    pub fn next_track(&mut self) {
        if let Some(i) = next_index(self.navigation_base(), self.tracks.len()) {
            self.play_track(i);
        }
    }

    pub fn previous_track(&mut self) {
        if let Some(i) = prev_index(self.navigation_base(), self.tracks.len()) {
            self.play_track(i);
        }
    }

    /// Jump to `fraction` of the loaded source's length.
    ///
    /// Needs a loaded source with a known, non-zero duration. The fraction is
    /// clamped to `0.0..=1.0`; non-finite values are ignored.
    pub fn seek(&mut self, fraction: f64) {
        if !fraction.is_finite() || self.session.source_url.is_none() {
            return;
        }
        let Some(duration) = self.resource.duration().filter(|d| !d.is_zero()) else {
            return;
        };
        let position = duration.mul_f64(fraction.clamp(0.0, 1.0));
        self.resource.set_current_time(position);
        self.progress = Progress {
            elapsed: position,
            total: Some(duration),
        };
    }

    /// Set the volume from a percentage (clamped to 100).
    pub fn set_volume(&mut self, percent: u8) {
        self.session.volume = f32::from(percent.min(100)) / 100.0;
        self.resource.set_volume(self.session.volume);
    }

    /// Nudge the volume by `delta` percentage points.
    pub fn adjust_volume(&mut self, delta: i16) {
        let current = i16::from(self.session.volume_percent());
        let target = current.saturating_add(delta).clamp(0, 100) as u8;
        self.set_volume(target);
    }

    pub fn toggle_mute(&mut self) {
        self.session.muted = !self.session.muted;
        self.resource.set_muted(self.session.muted);
    }

    /// React to a notification from the playback resource. Events about any
    /// source other than the one currently loaded are dropped.
    pub fn handle_resource_event(&mut self, event: ResourceEvent) {
        if self.session.source_url.as_deref() != Some(event.source()) {
            tracing::debug!(?event, "dropping event for a replaced source");
            return;
        }

        match event {
            ResourceEvent::MetadataReady { .. } => {
                self.progress.total = self.resource.duration();
            }
            ResourceEvent::PositionChanged { .. } => {
                if let Some(total) = self.resource.duration().filter(|d| !d.is_zero()) {
                    self.progress = Progress {
                        elapsed: self.resource.current_time().min(total),
                        total: Some(total),
                    };
                }
            }
            ResourceEvent::Ended { .. } => {
                tracing::debug!("source ended, advancing");
                self.session.is_playing = false;
                self.next_track();
            }
            ResourceEvent::Failed { source, reason } => {
                tracing::warn!(%source, %reason, "playback resource failed");
                self.session.is_playing = false;
                self.session.source_url = None;
                self.now_playing = None;
                self.progress = Progress::default();
                self.notify(PLAYBACK_ERROR);
            }
        }
    }

    /// Apply every catalog outcome that has already arrived.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(outcome) = self.fetcher.try_next() {
            self.apply(outcome);
            applied += 1;
        }
        applied
    }

    /// Wait up to `timeout` for all in-flight catalog requests, applying each
    /// outcome as it arrives. Returns `true` when nothing is left in flight.
    #[cfg(test)]
    pub fn settle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.fetcher.in_flight() > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            match self.fetcher.wait_next(remaining) {
                Some(outcome) => self.apply(outcome),
                None => return false,
            }
        }
        true
    }

    fn apply(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Search {
                request,
                query,
                result,
            } => {
                if self.pending_search != Some(request) {
                    tracing::debug!(?request, %query, "dropping superseded search result");
                    return;
                }
                self.pending_search = None;

                match result {
                    Ok(tracks) => {
                        tracing::info!(%query, count = tracks.len(), "search finished");
                        self.tracks = tracks;
                        self.tracks_version += 1;
                        // Indices of the old list mean nothing now.
                        self.session.current_index = None;
                        self.pending_play = None;
                    }
                    Err(e) => {
                        tracing::error!(%query, "search failed: {e}");
                        self.notify(SEARCH_FAILED);
                    }
                }
            }
            FetchOutcome::Resolve {
                request,
                index,
                track,
                result,
            } => {
                if self.pending_play.map(|p| p.request) != Some(request) {
                    tracing::debug!(?request, index, "dropping superseded resolution");
                    return;
                }
                self.pending_play = None;

                match result {
                    Ok(url) if self.tracks.get(index) == Some(&track) => {
                        self.start(index, track, url);
                    }
                    Ok(_) => {
                        tracing::debug!(index, "track list changed under resolution");
                    }
                    Err(e) => {
                        tracing::error!(index, id = %track.id, "track resolution failed: {e}");
                        self.notify(PLAY_FAILED);
                    }
                }
            }
        }
    }

    fn start(&mut self, index: usize, track: Track, url: String) {
        tracing::info!(index, title = %track.title, %url, "playing");
        self.resource.load(&url);
        self.resource.play();

        self.session.source_url = Some(url);
        self.session.current_index = Some(index);
        self.session.is_playing = true;
        self.now_playing = Some(track);
        self.progress = Progress::default();
    }
}
