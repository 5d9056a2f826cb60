use super::types::{PlaybackInfo, effective_volume};

#[test]
fn effective_volume_silences_when_muted() {
    assert_eq!(effective_volume(0.5, false), 0.5);
    assert_eq!(effective_volume(0.5, true), 0.0);
}

#[test]
fn effective_volume_clamps_to_unit_range() {
    assert_eq!(effective_volume(1.7, false), 1.0);
    assert_eq!(effective_volume(-0.2, false), 0.0);
}

#[test]
fn playback_info_starts_unloaded_at_full_volume() {
    let info = PlaybackInfo::default();
    assert!(!info.loaded);
    assert_eq!(info.volume, 1.0);
    assert!(!info.muted);
    assert!(info.duration.is_none());
}
