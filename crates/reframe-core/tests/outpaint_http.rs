//! HTTP contract tests for the uncrop client, against a local axum server.

use std::io::Cursor;
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use image::{DynamicImage, ImageFormat, RgbImage};

use reframe_core::decode::decode_image;
use reframe_core::{
    crop_or_extend, ClipdropClient, ExtendMargins, ImageDimensions, OutpaintError, Outpainter,
    PaddingOutpainter, PixelRect, ReframeConfig, ReframeError,
};

#[derive(Debug, Default, Clone)]
struct Captured {
    api_key: Option<String>,
    file_name: Option<String>,
    content_type: Option<String>,
    image: Vec<u8>,
    fields: Vec<(String, String)>,
}

#[derive(Clone)]
enum Reply {
    /// Extend the uploaded image locally by the posted margins.
    Pad,
    /// Fixed status and body.
    Fixed(StatusCode, &'static str),
}

#[derive(Clone)]
struct Shared {
    captured: Arc<Mutex<Option<Captured>>>,
    reply: Reply,
}

async fn uncrop(
    State(shared): State<Shared>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let mut captured = Captured {
        api_key: headers
            .get("x-api-key")
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        ..Captured::default()
    };

    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        if name == "image_file" {
            captured.file_name = field.file_name().map(String::from);
            captured.content_type = field.content_type().map(String::from);
            captured.image = field.bytes().await.unwrap().to_vec();
        } else {
            captured.fields.push((name, field.text().await.unwrap()));
        }
    }
    *shared.captured.lock().unwrap() = Some(captured.clone());

    match shared.reply {
        Reply::Pad => {
            let margin = |key: &str| {
                captured
                    .fields
                    .iter()
                    .find(|(k, _)| k == key)
                    .map(|(_, v)| v.parse::<u32>().unwrap())
                    .unwrap_or(0)
            };
            let margins = ExtendMargins::new(
                margin("extend_left"),
                margin("extend_right"),
                margin("extend_up"),
                margin("extend_down"),
            );
            let body = PaddingOutpainter::new()
                .extend(&captured.image, &margins, "")
                .await
                .unwrap();
            (StatusCode::OK, body).into_response()
        }
        Reply::Fixed(status, body) => (status, body).into_response(),
    }
}

async fn serve(reply: Reply) -> (String, Arc<Mutex<Option<Captured>>>) {
    let captured = Arc::new(Mutex::new(None));
    let app = Router::new()
        .route("/uncrop/v1", post(uncrop))
        .with_state(Shared {
            captured: captured.clone(),
            reply,
        });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/uncrop/v1"), captured)
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| image::Rgb([x as u8, y as u8, 60]));
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buffer, ImageFormat::Png)
        .unwrap();
    buffer.into_inner()
}

#[tokio::test]
async fn test_request_matches_service_contract() {
    let (url, captured) = serve(Reply::Pad).await;
    let client = ClipdropClient::new(&url, 30).unwrap();
    let source = png(40, 30);

    client
        .extend(&source, &ExtendMargins::new(5, 0, 0, 12), "secret-key")
        .await
        .unwrap();

    let captured = captured.lock().unwrap().clone().unwrap();
    assert_eq!(captured.api_key.as_deref(), Some("secret-key"));
    assert_eq!(captured.file_name.as_deref(), Some("image.png"));
    assert_eq!(captured.content_type.as_deref(), Some("image/png"));
    assert_eq!(captured.image, source);
    assert_eq!(
        captured.fields,
        vec![
            ("extend_left".to_string(), "5".to_string()),
            ("extend_down".to_string(), "12".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_success_returns_body_bytes() {
    let (url, _) = serve(Reply::Pad).await;
    let client = ClipdropClient::new(&url, 30).unwrap();

    let bytes = client
        .extend(&png(20, 10), &ExtendMargins::new(0, 4, 3, 0), "k")
        .await
        .unwrap();

    assert_eq!(
        decode_image(&bytes).unwrap().dimensions(),
        ImageDimensions::new(24, 13)
    );
}

#[tokio::test]
async fn test_json_error_message_surfaces() {
    let (url, _) = serve(Reply::Fixed(
        StatusCode::UNAUTHORIZED,
        r#"{"error": "Invalid API key"}"#,
    ))
    .await;
    let client = ClipdropClient::new(&url, 30).unwrap();

    let err = client
        .extend(&png(4, 4), &ExtendMargins::new(1, 0, 0, 0), "bad")
        .await
        .unwrap_err();

    assert_eq!(
        err,
        OutpaintError::Service {
            status: 401,
            message: "Invalid API key".to_string()
        }
    );
    assert_eq!(err.to_string(), "Invalid API key");
}

#[tokio::test]
async fn test_json_without_error_field() {
    let (url, _) = serve(Reply::Fixed(StatusCode::FORBIDDEN, r#"{"status": "nope"}"#)).await;
    let client = ClipdropClient::new(&url, 30).unwrap();

    let err = client
        .extend(&png(4, 4), &ExtendMargins::new(1, 0, 0, 0), "k")
        .await
        .unwrap_err();

    assert_eq!(
        err,
        OutpaintError::Service {
            status: 403,
            message: "API error: 403".to_string()
        }
    );
}

#[tokio::test]
async fn test_non_json_error_body() {
    let (url, _) = serve(Reply::Fixed(
        StatusCode::INTERNAL_SERVER_ERROR,
        "<html>oops</html>",
    ))
    .await;
    let client = ClipdropClient::new(&url, 30).unwrap();

    let err = client
        .extend(&png(4, 4), &ExtendMargins::new(0, 0, 1, 0), "k")
        .await
        .unwrap_err();

    assert_eq!(
        err,
        OutpaintError::Service {
            status: 500,
            message: "Unknown error".to_string()
        }
    );
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ClipdropClient::new(&format!("http://{addr}/uncrop/v1"), 5).unwrap();
    let err = client
        .extend(&png(4, 4), &ExtendMargins::new(1, 0, 0, 0), "k")
        .await
        .unwrap_err();

    assert!(matches!(err, OutpaintError::Transport(_)));
}

#[tokio::test]
async fn test_pipeline_end_to_end() {
    let (url, captured) = serve(Reply::Pad).await;
    let config = ReframeConfig::default()
        .with_endpoint(url)
        .with_api_key(Some("env-key"));
    let client = ClipdropClient::from_config(&config).unwrap();

    let outcome = crop_or_extend(
        &png(100, 80),
        &PixelRect::new(-10, 60, 50, 40),
        &client,
        None,
        &config,
    )
    .await
    .unwrap();

    assert_eq!(outcome.margins, Some(ExtendMargins::new(10, 0, 0, 20)));
    assert_eq!((outcome.width, outcome.height), (50, 40));
    assert_eq!(
        captured.lock().unwrap().as_ref().unwrap().api_key.as_deref(),
        Some("env-key")
    );
}

#[tokio::test]
async fn test_pipeline_service_error() {
    let (url, _) = serve(Reply::Fixed(
        StatusCode::PAYMENT_REQUIRED,
        r#"{"error": "Not enough credits"}"#,
    ))
    .await;
    let config = ReframeConfig::default().with_endpoint(url);
    let client = ClipdropClient::from_config(&config).unwrap();

    let result = crop_or_extend(
        &png(10, 10),
        &PixelRect::new(0, 0, 12, 10),
        &client,
        Some("k"),
        &config,
    )
    .await;

    let err = result.unwrap_err();
    assert!(matches!(
        err,
        ReframeError::Outpaint(OutpaintError::Service { status: 402, .. })
    ));
    assert_eq!(err.to_string(), "Not enough credits");
}
