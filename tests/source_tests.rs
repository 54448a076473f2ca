//! Mock HTTP and filesystem tests for image source resolution.
//!
//! These tests cover:
//! - Fetching image bytes from a URL (single GET, status handling)
//! - Reading image bytes from a local file
//! - Decode failures for non-image bytes
//! - The full fetch -> decode -> convert pipeline

use std::io::Cursor;
use std::time::Duration;

use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage};
use imgscii::ascii::{convert, RenderOptions};
use imgscii::source::{decode, Fetcher, ImageSource, SourceError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Encode a solid-color image as PNG bytes.
fn png_bytes(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(rgb)));
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

// ==================== Remote URL Tests ====================

#[tokio::test]
async fn test_load_from_url_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/image.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes(10, 10, [255, 0, 0])))
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::new().unwrap();
    let source = ImageSource::parse(&format!("{}/image.png", mock_server.uri()));

    let image = fetcher.load(&source).await.unwrap();
    assert_eq!(image.dimensions(), (10, 10));
}

#[tokio::test]
async fn test_fetch_returns_exact_body_bytes() {
    let mock_server = MockServer::start().await;
    let body = png_bytes(4, 4, [0, 255, 0]);

    Mock::given(method("GET"))
        .and(path("/image.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::new().unwrap();
    let source = ImageSource::parse(&format!("{}/image.png", mock_server.uri()));

    let bytes = fetcher.fetch(&source).await.unwrap();
    assert_eq!(bytes, body);
}

#[tokio::test]
async fn test_load_ignores_declared_content_type() {
    // The body is treated as opaque image bytes regardless of content-type
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/image"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(png_bytes(6, 3, [1, 2, 3]))
                .insert_header("content-type", "text/plain"),
        )
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::new().unwrap();
    let source = ImageSource::parse(&format!("{}/image", mock_server.uri()));

    let image = fetcher.load(&source).await.unwrap();
    assert_eq!(image.dimensions(), (6, 3));
}

#[tokio::test]
async fn test_load_404_is_a_status_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::new().unwrap();
    let source = ImageSource::parse(&format!("{}/missing.png", mock_server.uri()));

    let result = fetcher.load(&source).await;
    match result {
        Err(SourceError::HttpStatus { status, .. }) => assert_eq!(status.as_u16(), 404),
        other => panic!("expected HttpStatus error, got {:?}", other.map(|_| "image")),
    }
}

#[tokio::test]
async fn test_load_500_is_a_status_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/image.png"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::new().unwrap();
    let source = ImageSource::parse(&format!("{}/image.png", mock_server.uri()));

    assert!(matches!(
        fetcher.load(&source).await,
        Err(SourceError::HttpStatus { .. })
    ));
}

#[tokio::test]
async fn test_load_non_image_body_is_a_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not an image</html>"))
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::new().unwrap();
    let source = ImageSource::parse(&format!("{}/page.html", mock_server.uri()));

    assert!(matches!(
        fetcher.load(&source).await,
        Err(SourceError::Decode(_))
    ));
}

#[tokio::test]
async fn test_unreachable_host_is_a_request_error() {
    // Nothing listens on this port; the connect attempt must fail, not hang
    let fetcher = Fetcher::with_timeout(Duration::from_secs(2)).unwrap();
    let source = ImageSource::parse("http://127.0.0.1:9/image.png");

    assert!(matches!(
        fetcher.fetch(&source).await,
        Err(SourceError::Request { .. })
    ));
}

// ==================== Local File Tests ====================

#[tokio::test]
async fn test_load_from_local_file() {
    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("image.png");
    std::fs::write(&file_path, png_bytes(8, 5, [10, 20, 30])).unwrap();

    let fetcher = Fetcher::new().unwrap();
    let source = ImageSource::parse(file_path.to_str().unwrap());

    let image = fetcher.load(&source).await.unwrap();
    assert_eq!(image.dimensions(), (8, 5));
}

#[tokio::test]
async fn test_load_nonexistent_file_is_a_read_error() {
    let fetcher = Fetcher::new().unwrap();
    let source = ImageSource::parse("/nonexistent/picture.png");

    assert!(matches!(
        fetcher.load(&source).await,
        Err(SourceError::FileRead { .. })
    ));
}

#[tokio::test]
async fn test_load_local_non_image_is_a_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("notes.txt");
    std::fs::write(&file_path, "plain text").unwrap();

    let fetcher = Fetcher::new().unwrap();
    let source = ImageSource::parse(file_path.to_str().unwrap());

    assert!(matches!(
        fetcher.load(&source).await,
        Err(SourceError::Decode(_))
    ));
}

// ==================== Decode Tests ====================

#[test]
fn test_decode_valid_png() {
    let image = decode(&png_bytes(3, 2, [7, 8, 9])).unwrap();
    assert_eq!(image.dimensions(), (3, 2));
}

#[test]
fn test_decode_garbage_bytes() {
    assert!(matches!(
        decode(b"definitely not an image"),
        Err(SourceError::Decode(_))
    ));
}

#[test]
fn test_decode_empty_bytes() {
    assert!(matches!(decode(&[]), Err(SourceError::Decode(_))));
}

// ==================== Full Pipeline ====================

#[tokio::test]
async fn test_fetch_decode_convert_pipeline() {
    // Serve the documented reference scenario over HTTP: a 200x100 solid
    // intensity-128 PNG at width 10 renders as 3 rows of '='
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gray.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes(200, 100, [128, 128, 128])))
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::new().unwrap();
    let source = ImageSource::parse(&format!("{}/gray.png", mock_server.uri()));
    let image = fetcher.load(&source).await.unwrap();

    let art = convert(
        &image,
        &RenderOptions {
            width: 10,
            ..RenderOptions::default()
        },
    );

    assert_eq!(art.to_string(), "==========\n==========\n==========");
}
