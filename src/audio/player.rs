use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::AudioSettings;

use super::resource::PlaybackResource;
use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, PlaybackHandle, PlaybackInfo, ResourceEvent};

/// `PlaybackResource` backed by a rodio output on a dedicated audio thread.
pub struct RodioOutput {
    tx: Sender<AudioCmd>,
    playback: PlaybackHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl RodioOutput {
    pub fn new(audio_settings: AudioSettings, volume: f32, muted: bool) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let playback_info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo {
            volume,
            muted,
            ..PlaybackInfo::default()
        }));

        let audio_handle = spawn_audio_thread(rx, tx.clone(), playback_info.clone(), audio_settings);

        Self {
            tx,
            playback: playback_info,
            join: Mutex::new(Some(audio_handle)),
        }
    }

    fn send(&self, cmd: AudioCmd) {
        if self.tx.send(cmd).is_err() {
            tracing::warn!("audio thread is gone; command dropped");
        }
    }

    fn read<T>(&self, f: impl FnOnce(&PlaybackInfo) -> T) -> Option<T> {
        self.playback.lock().ok().map(|info| f(&info))
    }

    fn write(&self, f: impl FnOnce(&mut PlaybackInfo)) {
        if let Ok(mut info) = self.playback.lock() {
            f(&mut info);
        }
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl PlaybackResource for RodioOutput {
    fn load(&mut self, url: &str) {
        self.send(AudioCmd::Load(url.to_string()));
    }

    fn play(&mut self) {
        self.send(AudioCmd::Play);
    }

    fn pause(&mut self) {
        self.send(AudioCmd::Pause);
    }

    fn current_time(&self) -> Duration {
        self.read(|i| i.elapsed).unwrap_or(Duration::ZERO)
    }

    fn set_current_time(&mut self, position: Duration) {
        self.write(|i| i.elapsed = position);
        self.send(AudioCmd::Seek(position));
    }

    fn volume(&self) -> f32 {
        self.read(|i| i.volume).unwrap_or(1.0)
    }

    // Mirror into the shared info right away so reads after a write agree
    // before the audio thread catches up.
    fn set_volume(&mut self, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        self.write(|i| i.volume = volume);
        self.send(AudioCmd::SetVolume(volume));
    }

    fn muted(&self) -> bool {
        self.read(|i| i.muted).unwrap_or(false)
    }

    fn set_muted(&mut self, muted: bool) {
        self.write(|i| i.muted = muted);
        self.send(AudioCmd::SetMuted(muted));
    }

    fn duration(&self) -> Option<Duration> {
        self.read(|i| i.duration.filter(|_| i.loaded)).flatten()
    }

    fn subscribe(&mut self, events: Sender<ResourceEvent>) {
        self.send(AudioCmd::Subscribe(events));
    }
}
