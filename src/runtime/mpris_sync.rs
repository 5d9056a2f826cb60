use crate::audio::PlaybackResource;
use crate::mpris::{MprisHandle, PlaybackStatus};
use crate::player::PlayerController;

/// What MPRIS should currently report, compared between loop iterations to
/// avoid touching the shared state on every frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MprisSnapshot {
    status: PlaybackStatus,
    volume_percent: u8,
    url: Option<String>,
}

impl MprisSnapshot {
    pub fn of<R: PlaybackResource>(player: &PlayerController<R>) -> Self {
        let session = player.session();
        let status = match (&session.source_url, session.is_playing) {
            (None, _) => PlaybackStatus::Stopped,
            (Some(_), true) => PlaybackStatus::Playing,
            (Some(_), false) => PlaybackStatus::Paused,
        };
        Self {
            status,
            volume_percent: session.volume_percent(),
            url: session.source_url.clone(),
        }
    }
}

pub fn update_mpris<R: PlaybackResource>(
    mpris: &MprisHandle,
    player: &PlayerController<R>,
    default_cover: &str,
) -> MprisSnapshot {
    let snapshot = MprisSnapshot::of(player);
    let session = player.session();

    let track = player.now_playing().filter(|_| session.source_url.is_some());
    mpris.set_track_metadata(
        track,
        session.source_url.as_deref(),
        track.map(|t| t.cover_or(default_cover)),
    );
    mpris.set_playback(snapshot.status);
    mpris.set_volume(session.volume);

    snapshot
}
