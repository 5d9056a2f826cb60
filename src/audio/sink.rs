//! Utilities for fetching remote sources and creating `rodio` sinks from them.
//!
//! Sources are held fully in memory (`Arc<[u8]>`) so a seek can rebuild the
//! sink without refetching.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use lofty::file::AudioFile;
use lofty::probe::Probe;
use reqwest::blocking::Client;
use rodio::{Decoder, OutputStream, Sink, Source};

use super::types::OutputError;

/// Download `url` into memory. `file://` URLs and bare paths are read from disk.
pub(super) fn fetch_source(client: &Client, url: &str) -> Result<Arc<[u8]>, OutputError> {
    if let Some(path) = local_path(url) {
        return std::fs::read(path)
            .map(Arc::from)
            .map_err(|source| OutputError::Read {
                path: path.to_string(),
                source,
            });
    }

    let fetch = |source| OutputError::Fetch {
        url: url.to_string(),
        source,
    };
    let bytes = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .and_then(|r| r.bytes())
        .map_err(fetch)?;
    Ok(Arc::from(bytes.as_ref()))
}

fn local_path(url: &str) -> Option<&str> {
    if let Some(path) = url.strip_prefix("file://") {
        return Some(path);
    }
    if url.contains("://") { None } else { Some(url) }
}

/// Create a paused `Sink` for `bytes` that starts playback at `start_at`.
///
/// Also returns the decoder's idea of the total length, if it has one.
pub(super) fn create_sink_at(
    handle: &OutputStream,
    url: &str,
    bytes: &Arc<[u8]>,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), OutputError> {
    let source = Decoder::new(Cursor::new(bytes.clone())).map_err(|source| OutputError::Decode {
        url: url.to_string(),
        source,
    })?;
    let total = source.total_duration();

    let sink = Sink::connect_new(handle.mixer());
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    sink.append(source.skip_duration(start_at));
    sink.pause();
    Ok((sink, total))
}

/// Read the duration from container metadata when the decoder cannot tell.
pub(super) fn probe_duration(bytes: &[u8]) -> Option<Duration> {
    let tagged = Probe::new(Cursor::new(bytes))
        .guess_file_type()
        .ok()?
        .read()
        .ok()?;
    let d = tagged.properties().duration();
    (!d.is_zero()).then_some(d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_path_recognizes_file_urls_and_bare_paths() {
        assert_eq!(local_path("file:///tmp/a.mp3"), Some("/tmp/a.mp3"));
        assert_eq!(local_path("/tmp/a.mp3"), Some("/tmp/a.mp3"));
        assert_eq!(local_path("http://x/a.mp3"), None);
        assert_eq!(local_path("https://x/a.mp3"), None);
    }

    #[test]
    fn fetch_source_reads_local_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.bin");
        std::fs::write(&path, b"abc").unwrap();

        let client = Client::new();
        let url = format!("file://{}", path.display());
        let bytes = fetch_source(&client, &url).unwrap();
        assert_eq!(&bytes[..], b"abc");
    }

    #[test]
    fn fetch_source_reports_missing_files() {
        let client = Client::new();
        let err = fetch_source(&client, "/definitely/not/here.mp3").unwrap_err();
        assert!(matches!(err, OutputError::Read { .. }));
    }

    #[test]
    fn probe_duration_is_none_for_garbage() {
        assert_eq!(probe_duration(b"not really audio"), None);
    }
}
