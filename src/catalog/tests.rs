use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

use super::client::{absolutize, parse_resolution, parse_search};
use super::*;
use crate::config::CatalogSettings;

/// Serve exactly one HTTP request with `status` and a JSON `body`, reporting
/// the request line back to the test.
fn serve_once(status: &'static str, body: &'static str) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();
        loop {
            let mut header = String::new();
            if reader.read_line(&mut header).unwrap() == 0 || header == "\r\n" {
                break;
            }
        }
        let _ = tx.send(request_line.trim_end().to_string());

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).unwrap();
    });

    (format!("http://{addr}"), rx)
}

fn catalog_at(base_url: String) -> HttpCatalog {
    HttpCatalog::new(&CatalogSettings {
        base_url,
        timeout_ms: 5_000,
    })
    .unwrap()
}

#[test]
fn track_ids_accept_numbers_and_strings() {
    let tracks = parse_search(
        "test",
        r#"[{"id":1,"title":"A","artist":"X"},{"id":"abc","title":"B","artist":"Y","cover":"http://c/b.jpg"}]"#,
    )
    .unwrap();

    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].id.as_str(), "1");
    assert_eq!(tracks[0].cover, None);
    assert_eq!(tracks[1].id, TrackId::new("abc"));
    assert_eq!(tracks[1].cover.as_deref(), Some("http://c/b.jpg"));
}

#[test]
fn large_numeric_ids_keep_every_digit() {
    let tracks = parse_search("test", r#"[{"id":18446744073709551615,"title":"A","artist":"X"}]"#).unwrap();
    assert_eq!(tracks[0].id.as_str(), "18446744073709551615");
}

#[test]
fn null_title_and_artist_read_as_empty() {
    let tracks = parse_search(
        "test",
        r#"[{"id":1,"title":"A","artist":"X"},{"id":2,"title":null,"artist":"Y"},{"id":3,"title":"C","artist":null}]"#,
    )
    .unwrap();

    assert_eq!(tracks.len(), 3);
    assert_eq!(tracks[1].title, "");
    assert_eq!(tracks[1].artist, "Y");
    assert_eq!(tracks[2].title, "C");
    assert_eq!(tracks[2].artist, "");
}

#[test]
fn empty_cover_falls_back_to_default() {
    let tracks = parse_search("test", r#"[{"id":2,"title":"A","artist":"X","cover":""}]"#).unwrap();
    assert_eq!(tracks[0].cover_or("/static/default-cover.png"), "/static/default-cover.png");
}

#[test]
fn search_body_that_is_not_an_array_is_a_decode_error() {
    let err = parse_search("test", r#"{"error":"boom"}"#).unwrap_err();
    assert!(matches!(err, CatalogError::Decode { .. }));
}

#[test]
fn resolution_requires_non_empty_string_url() {
    let id = TrackId::new("7");
    assert_eq!(
        parse_resolution("t", &id, r#"{"url":"http://x/a.mp3"}"#).unwrap(),
        "http://x/a.mp3"
    );

    for body in [r#"{}"#, r#"{"url":null}"#, r#"{"url":""}"#, r#"{"url":false}"#] {
        let err = parse_resolution("t", &id, body).unwrap_err();
        assert!(
            matches!(err, CatalogError::Unresolved { ref id } if id.as_str() == "7"),
            "body {body} should be unresolved"
        );
    }
}

#[test]
fn urls_are_percent_encoded() {
    let catalog = catalog_at("http://example.test/".into());
    assert_eq!(
        catalog.search_url("rock & roll"),
        "http://example.test/api/search?q=rock%20%26%20roll"
    );
    assert_eq!(
        catalog.track_url(&TrackId::new("a/b")),
        "http://example.test/api/track/a%2Fb"
    );
}

#[test]
fn http_search_decodes_track_list() {
    let (base, requests) = serve_once("200 OK", r#"[{"id":1,"title":"A","artist":"X"}]"#);
    let catalog = catalog_at(base);

    let tracks = catalog.search("test").unwrap();
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].title, "A");
    assert_eq!(requests.recv().unwrap(), "GET /api/search?q=test HTTP/1.1");
}

#[test]
fn http_resolve_reports_non_success_status() {
    let (base, _requests) = serve_once("404 Not Found", r#"{}"#);
    let catalog = catalog_at(base);

    let err = catalog.resolve(&TrackId::new("9")).unwrap_err();
    assert!(matches!(err, CatalogError::Status { status: 404, .. }));
}

#[test]
fn http_resolve_returns_url() {
    let (base, requests) = serve_once("200 OK", r#"{"url":"http://x/a.mp3"}"#);
    let catalog = catalog_at(base);

    assert_eq!(catalog.resolve(&TrackId::new("1")).unwrap(), "http://x/a.mp3");
    assert_eq!(requests.recv().unwrap(), "GET /api/track/1 HTTP/1.1");
}

#[test]
fn unreachable_catalog_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let catalog = catalog_at(format!("http://{addr}"));
    let err = catalog.search("anything").unwrap_err();
    assert!(matches!(err, CatalogError::Network { .. }));
}

#[test]
fn relative_stream_urls_resolve_against_catalog() {
    assert_eq!(absolutize("http://h:5000", "http://cdn/a.mp3"), "http://cdn/a.mp3");
    assert_eq!(absolutize("http://h:5000", "/static/a.mp3"), "http://h:5000/static/a.mp3");
    assert_eq!(absolutize("http://h:5000/music", "/static/a.mp3"), "http://h:5000/static/a.mp3");
    assert_eq!(absolutize("http://h:5000/music", "a.mp3"), "http://h:5000/music/a.mp3");
    assert_eq!(absolutize("http://h:5000", "//cdn.example/a.mp3"), "http://cdn.example/a.mp3");
    assert_eq!(absolutize("https://h/music", "//cdn.example/a.mp3"), "https://cdn.example/a.mp3");
}

#[test]
fn http_resolve_absolutizes_relative_url() {
    let (base, _requests) = serve_once("200 OK", r#"{"url":"/stream/1.mp3"}"#);
    let catalog = catalog_at(base.clone());

    assert_eq!(
        catalog.resolve(&TrackId::new("1")).unwrap(),
        format!("{base}/stream/1.mp3")
    );
}
