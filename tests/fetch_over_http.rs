//! Drives the real HTTP fetcher against a throwaway local server.

use std::fs;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use image_fetcher::checksum::sha256_bytes;
use image_fetcher::{Config, DownloadError, Downloader, Outcome, SkipReason};

const CAT: &[u8] = b"\xff\xd8\xff\xe0 not really a jpeg";
const DOG: &[u8] = b"\x89PNG\r\n\x1a\n not really a png";

/// Starts a server on an ephemeral port and returns its base URL
/// (e.g. "http://127.0.0.1:12345").
fn start_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            thread::spawn(move || handle(stream));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

fn handle(mut stream: TcpStream) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = String::from_utf8_lossy(&buf[..n]);
    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();

    let (status, content_type, body): (&str, &str, &[u8]) = match path.as_str() {
        "/cats/image.jpg" | "/mirror/cat.jpg" => ("200 OK", "image/jpeg", CAT),
        "/dogs/image.jpg" => ("200 OK", "image/png", DOG),
        "/index.html" => ("200 OK", "text/html; charset=utf-8", b"<html></html>"),
        "/slow.png" => {
            thread::sleep(Duration::from_secs(4));
            ("200 OK", "image/png", DOG)
        }
        _ => ("404 Not Found", "text/plain", b"not found"),
    };

    let head = format!(
        "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
}

fn config(dir: &tempfile::TempDir) -> Config {
    Config {
        output_dir: dir.path().join("Fetched_Images"),
        timeout_secs: 1,
        ..Config::default()
    }
}

#[test]
fn batch_survives_every_kind_of_failure() {
    let base = start_server();
    let dir = tempfile::tempdir().unwrap();
    let config = config(&dir);

    let mut downloader = Downloader::new(&config).unwrap();

    let urls = [
        format!("{base}/cats/image.jpg"),
        format!("{base}/slow.png"),
        format!("{base}/mirror/cat.jpg"),
        format!("{base}/index.html"),
        format!("{base}/missing.png"),
        format!("{base}/dogs/image.jpg"),
    ];

    let report = downloader.download_all(&urls);
    let outcomes: Vec<&Outcome> = report.outcomes.iter().map(|entry| &entry.outcome).collect();

    assert!(matches!(outcomes[0], Outcome::Saved(_)));
    assert!(matches!(outcomes[1], Outcome::Failed(DownloadError::Network(_))));
    assert!(matches!(
        outcomes[2],
        Outcome::Skipped(SkipReason::Duplicate { .. })
    ));
    assert!(matches!(
        outcomes[3],
        Outcome::Skipped(SkipReason::NotAnImage { .. })
    ));
    assert!(matches!(outcomes[4], Outcome::Failed(DownloadError::Status(404))));
    assert!(matches!(outcomes[5], Outcome::Saved(_)));

    let out = &config.output_dir;
    assert_eq!(fs::read(out.join("image.jpg")).unwrap(), CAT);
    assert_eq!(fs::read(out.join("image_1.jpg")).unwrap(), DOG);
    assert_eq!(fs::read_dir(out).unwrap().count(), 2);
}

#[test]
fn rerun_rescans_output_directory() {
    let base = start_server();
    let dir = tempfile::tempdir().unwrap();
    let config = config(&dir);

    fs::create_dir_all(&config.output_dir).unwrap();
    fs::write(config.output_dir.join("old_cat.jpg"), CAT).unwrap();

    let mut downloader = Downloader::new(&config).unwrap();
    assert!(downloader.digests().contains(&sha256_bytes(CAT)));

    let outcome = downloader.download(&format!("{base}/cats/image.jpg"));

    assert!(matches!(
        outcome,
        Outcome::Skipped(SkipReason::Duplicate { .. })
    ));
    assert!(!config.output_dir.join("image.jpg").exists());
}
