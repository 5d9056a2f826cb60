use super::*;
use crate::catalog::TrackId;
use std::sync::mpsc;

fn make_track() -> Track {
    Track {
        id: TrackId::new("ab-12"),
        title: "Test Title".to_string(),
        artist: "Test Artist".to_string(),
        cover: Some("http://x/cover.jpg".to_string()),
    }
}

fn iface() -> (PlayerIface, Arc<Mutex<SharedState>>, mpsc::Receiver<ControlCmd>) {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    (
        PlayerIface {
            tx,
            state: state.clone(),
        },
        state,
        rx,
    )
}

#[test]
fn set_track_metadata_sets_and_clears_shared_state() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let handle = MprisHandle {
        state: state.clone(),
    };

    let track = make_track();
    handle.set_track_metadata(Some(&track), Some("http://x/a.mp3"), Some("http://x/cover.jpg"));

    {
        let s = state.lock().unwrap();
        assert_eq!(s.title.as_deref(), Some("Test Title"));
        assert_eq!(s.artist, vec!["Test Artist".to_string()]);
        assert_eq!(s.url.as_deref(), Some("http://x/a.mp3"));
        assert_eq!(s.art_url.as_deref(), Some("http://x/cover.jpg"));
        assert_eq!(
            s.track_id.as_ref().map(|p| p.as_str()),
            Some("/org/mpris/MediaPlayer2/track/ab_12")
        );
    }

    handle.set_track_metadata(None, None, None);
    {
        let s = state.lock().unwrap();
        assert_eq!(s.title, None);
        assert!(s.artist.is_empty());
        assert_eq!(s.url, None);
        assert_eq!(s.art_url, None);
        assert!(s.track_id.is_none());
    }
}

#[test]
fn blank_artist_is_left_out() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let handle = MprisHandle {
        state: state.clone(),
    };
    let mut track = make_track();
    track.artist = "  ".to_string();
    handle.set_track_metadata(Some(&track), None, None);

    assert!(state.lock().unwrap().artist.is_empty());
}

#[test]
fn playback_status_maps_to_mpris_strings() {
    let (iface, state, _rx) = iface();

    assert_eq!(iface.playback_status(), "Stopped");

    state.lock().unwrap().playback = PlaybackStatus::Playing;
    assert_eq!(iface.playback_status(), "Playing");

    state.lock().unwrap().playback = PlaybackStatus::Paused;
    assert_eq!(iface.playback_status(), "Paused");
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let (iface, state, _rx) = iface();
    let handle = MprisHandle { state };
    handle.set_track_metadata(Some(&make_track()), Some("http://x/a.mp3"), Some("c.png"));

    let map = iface.metadata();
    for k in [
        "mpris:trackid",
        "xesam:title",
        "xesam:artist",
        "mpris:artUrl",
        "xesam:url",
    ] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}

#[test]
fn metadata_is_empty_without_track() {
    let (iface, _state, _rx) = iface();
    assert!(iface.metadata().is_empty());
}

#[test]
fn methods_forward_control_commands() {
    let (iface, _state, rx) = iface();
    iface.next();
    iface.previous();
    iface.play_pause();
    iface.stop();

    let got: Vec<ControlCmd> = rx.try_iter().collect();
    assert_eq!(
        got,
        vec![
            ControlCmd::Next,
            ControlCmd::Prev,
            ControlCmd::PlayPause,
            ControlCmd::Stop
        ]
    );
}

#[test]
fn volume_property_round_trips_through_commands() {
    let (mut iface, state, rx) = iface();
    let handle = MprisHandle { state };

    handle.set_volume(0.25);
    assert_eq!(iface.volume(), 0.25);

    iface.set_volume(0.42);
    iface.set_volume(3.0);
    iface.set_volume(f64::NAN);
    let got: Vec<ControlCmd> = rx.try_iter().collect();
    assert_eq!(got, vec![ControlCmd::SetVolume(42), ControlCmd::SetVolume(100)]);
}
