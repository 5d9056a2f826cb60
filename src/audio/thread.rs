use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::config::AudioSettings;

use super::sink::{create_sink_at, fetch_source, probe_duration};
use super::types::{AudioCmd, OutputError, PlaybackHandle, ResourceEvent, effective_volume};

/// State owned by the audio thread.
struct Output {
    stream: Option<OutputStream>,
    client: Client,
    self_tx: Sender<AudioCmd>,
    info: PlaybackHandle,
    events: Option<Sender<ResourceEvent>>,

    generation: u64,
    url: Option<String>,
    bytes: Option<Arc<[u8]>>,
    sink: Option<Sink>,
    duration: Option<Duration>,

    want_playing: bool,
    ended: bool,
    // Track start time and accumulated elapsed when paused.
    started_at: Option<Instant>,
    accumulated: Duration,

    volume: f32,
    muted: bool,
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    self_tx: Sender<AudioCmd>,
    info: PlaybackHandle,
    audio_settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when OutputStream is dropped; the TUI owns stderr.
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(e) => {
                tracing::error!("no audio output device: {e}");
                None
            }
        };

        let (volume, muted) = info
            .lock()
            .map(|i| (i.volume, i.muted))
            .unwrap_or((1.0, false));

        let mut out = Output {
            stream,
            client: Client::new(),
            self_tx,
            info,
            events: None,
            generation: 0,
            url: None,
            bytes: None,
            sink: None,
            duration: None,
            want_playing: false,
            ended: false,
            started_at: None,
            accumulated: Duration::ZERO,
            volume,
            muted,
        };

        let tick = Duration::from_millis(audio_settings.tick_ms.max(1));
        tracing::debug!("audio thread started");

        loop {
            match rx.recv_timeout(tick) {
                Ok(AudioCmd::Quit { fade_out_ms }) => {
                    out.quit(fade_out_ms);
                    break;
                }
                Ok(cmd) => out.handle(cmd),
                Err(RecvTimeoutError::Timeout) => out.tick(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        tracing::debug!("audio thread exiting");
    })
}

impl Output {
    fn handle(&mut self, cmd: AudioCmd) {
        match cmd {
            AudioCmd::Load(url) => self.load(url),
            AudioCmd::Fetched {
                generation,
                url,
                result,
            } => {
                if generation != self.generation {
                    tracing::debug!(%url, "dropping superseded download");
                    return;
                }
                match result {
                    Ok(bytes) => self.attach(url, bytes),
                    Err(e) => self.fail(e),
                }
            }
            AudioCmd::Play => self.play(),
            AudioCmd::Pause => self.pause(),
            AudioCmd::Seek(position) => self.seek(position),
            AudioCmd::SetVolume(v) => {
                self.volume = v.clamp(0.0, 1.0);
                self.apply_volume();
            }
            AudioCmd::SetMuted(m) => {
                self.muted = m;
                self.apply_volume();
            }
            AudioCmd::Subscribe(tx) => self.events = Some(tx),
            AudioCmd::Quit { .. } => {}
        }
    }

    /// Send the event built for the current source, if there is one.
    fn emit(&self, event: impl FnOnce(String) -> ResourceEvent) {
        if let (Some(tx), Some(url)) = (&self.events, &self.url) {
            let _ = tx.send(event(url.clone()));
        }
    }

    fn elapsed(&self) -> Duration {
        let e = self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed());
        match self.duration {
            Some(d) => e.min(d),
            None => e,
        }
    }

    fn publish(&self) {
        if let Ok(mut info) = self.info.lock() {
            info.loaded = self.sink.is_some();
            info.elapsed = self.elapsed();
            info.duration = self.duration;
            info.volume = self.volume;
            info.muted = self.muted;
        }
    }

    fn apply_volume(&self) {
        if let Some(s) = &self.sink {
            s.set_volume(effective_volume(self.volume, self.muted));
        }
        self.publish();
    }

    fn stop_sink(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
    }

    fn load(&mut self, url: String) {
        self.stop_sink();
        self.generation += 1;
        self.url = Some(url.clone());
        self.bytes = None;
        self.duration = None;
        self.want_playing = false;
        self.ended = false;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
        self.publish();

        let generation = self.generation;
        let client = self.client.clone();
        let tx = self.self_tx.clone();
        thread::spawn(move || {
            let result = fetch_source(&client, &url);
            let _ = tx.send(AudioCmd::Fetched {
                generation,
                url,
                result,
            });
        });
    }

    fn attach(&mut self, url: String, bytes: Arc<[u8]>) {
        let Some(stream) = self.stream.as_ref() else {
            self.fail(OutputError::NoDevice("default output unavailable".into()));
            return;
        };

        match create_sink_at(stream, &url, &bytes, Duration::ZERO) {
            Ok((sink, total)) => {
                self.duration = total.or_else(|| probe_duration(&bytes));
                sink.set_volume(effective_volume(self.volume, self.muted));
                if self.want_playing {
                    sink.play();
                    self.started_at = Some(Instant::now());
                }
                self.sink = Some(sink);
                self.bytes = Some(bytes);
                tracing::info!(%url, duration = ?self.duration, "source ready");
                self.publish();
                self.emit(|source| ResourceEvent::MetadataReady { source });
            }
            Err(e) => self.fail(e),
        }
    }

    fn fail(&mut self, e: OutputError) {
        tracing::warn!("playback source failed: {e}");
        self.stop_sink();
        self.bytes = None;
        self.want_playing = false;
        self.started_at = None;
        self.publish();
        let reason = e.to_string();
        self.emit(|source| ResourceEvent::Failed { source, reason });
    }

    fn play(&mut self) {
        self.want_playing = true;
        if self.ended {
            // Replaying a finished source starts it over.
            self.ended = false;
            self.rebuild_at(Duration::ZERO);
        }
        if let Some(s) = &self.sink {
            if self.started_at.is_none() {
                s.play();
                self.started_at = Some(Instant::now());
            }
        }
        self.publish();
    }

    fn pause(&mut self) {
        self.want_playing = false;
        if let Some(s) = &self.sink {
            s.pause();
        }
        if let Some(st) = self.started_at.take() {
            self.accumulated += st.elapsed();
        }
        self.publish();
    }

    fn seek(&mut self, position: Duration) {
        if self.sink.is_none() {
            return;
        }
        let position = match self.duration {
            Some(d) => position.min(d),
            None => position,
        };
        self.ended = false;
        self.rebuild_at(position);
        self.publish();
        self.emit(|source| ResourceEvent::PositionChanged { source });
    }

    /// Replace the sink with a fresh one positioned at `position`.
    fn rebuild_at(&mut self, position: Duration) {
        let (Some(stream), Some(bytes), Some(url)) =
            (self.stream.as_ref(), self.bytes.clone(), self.url.clone())
        else {
            return;
        };

        if let Some(old) = self.sink.take() {
            old.stop();
        }
        match create_sink_at(stream, &url, &bytes, position) {
            Ok((sink, _)) => {
                sink.set_volume(effective_volume(self.volume, self.muted));
                if self.want_playing {
                    sink.play();
                    self.started_at = Some(Instant::now());
                } else {
                    self.started_at = None;
                }
                self.accumulated = position;
                self.sink = Some(sink);
            }
            Err(e) => self.fail(e),
        }
    }

    /// Periodic check for position updates and end of source.
    fn tick(&mut self) {
        let Some(s) = &self.sink else {
            return;
        };
        if !self.want_playing || self.ended {
            return;
        }

        if s.empty() {
            self.ended = true;
            self.want_playing = false;
            if let Some(st) = self.started_at.take() {
                self.accumulated += st.elapsed();
            }
            self.publish();
            self.emit(|source| ResourceEvent::Ended { source });
        } else {
            self.publish();
            self.emit(|source| ResourceEvent::PositionChanged { source });
        }
    }

    fn quit(&mut self, fade_out_ms: u64) {
        if let Some(s) = &self.sink {
            // Fade out gently before stopping.
            if self.want_playing {
                fade_out_sink(s, effective_volume(self.volume, self.muted), fade_out_ms);
            }
            s.stop();
        }
        self.want_playing = false;
        // Publish the final position for readers after shutdown.
        self.publish();
    }
}

fn fade_out_sink(sink: &Sink, from: f32, fade_out_ms: u64) {
    if fade_out_ms == 0 || from <= 0.0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(from * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}
