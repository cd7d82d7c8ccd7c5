//! End-to-end tests for the process-image endpoint, driven through the
//! router without binding a socket.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use image::{Rgba, RgbaImage};
use tower::util::ServiceExt;

use dpframe_framing_core::overlay::builtin_overlays;
use dpframe_framing_core::{CanvasSpec, DecodeLimits};
use dpframe_server::{router, AppState};

const BOUNDARY: &str = "dpframe-test-boundary";

fn test_router() -> Router {
    let canvas = CanvasSpec::dp();
    router(
        AppState {
            canvas,
            limits: DecodeLimits::default(),
            overlays: Arc::new(builtin_overlays(canvas.width, canvas.height)),
            store: None,
        },
        10 * 1024 * 1024,
    )
}

fn multipart_request(field_name: &str, payload: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; \
             name=\"{field_name}\"; filename=\"photo.png\"\r\n\
             Content-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(payload);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/process-image")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn sample_photo_png(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, Rgba([40, 90, 200, 255]));
    let mut out = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn upload_yields_one_data_url_per_overlay() {
    let response = test_router()
        .oneshot(multipart_request("image", &sample_photo_png(320, 200)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let images = body["processedImages"].as_array().unwrap();
    assert_eq!(images.len(), 2);
    for entry in images {
        let url = entry.as_str().unwrap();
        assert!(url.starts_with("data:image/png;base64,"), "{url}");
    }
}

#[tokio::test]
async fn produced_frames_have_canvas_dimensions() {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    let response = test_router()
        .oneshot(multipart_request("image", &sample_photo_png(1600, 800)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let first = body["processedImages"][0].as_str().unwrap();
    let png = STANDARD
        .decode(first.trim_start_matches("data:image/png;base64,"))
        .unwrap();
    let decoded = image::load_from_memory(&png).unwrap();
    assert_eq!(decoded.width(), 800);
    assert_eq!(decoded.height(), 800);
}

#[tokio::test]
async fn missing_image_field_is_a_400() {
    let response = test_router()
        .oneshot(multipart_request("attachment", b"some bytes"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "No image file provided");
}

#[tokio::test]
async fn empty_upload_is_a_400() {
    let response = test_router()
        .oneshot(multipart_request("image", b""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "No image file provided");
}

#[tokio::test]
async fn undecodable_upload_is_a_500_with_a_generic_message() {
    let response = test_router()
        .oneshot(multipart_request("image", b"these bytes are not an image"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Failed to process image");
}

#[tokio::test]
async fn healthz_is_alive() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
