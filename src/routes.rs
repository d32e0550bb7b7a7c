use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::HeaderValue,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use std::{any::Any, sync::Arc};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, Any as AnyCors, CorsLayer},
};

use crate::{
    errors::AppError,
    imaging::{process_photo, Platform, PlatformSpec},
    listing::generate_listing as build_listing,
    models::{Health, PhotoEnhancement, ProductListing, ProductRequest, ServiceInfo},
    translate::TranslationClient,
};

pub const SERVICE_NAME: &str = "KalaMitra API";

#[derive(Clone)]
pub struct AppState {
    pub translator: Arc<TranslationClient>,
}

pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    let routes = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/platforms", get(platforms))
        .route("/generate_listing", post(generate_listing))
        .route("/enhance_photo", post(enhance_photo).layer(DefaultBodyLimit::disable()));
    with_middleware(routes, allowed_origins).with_state(state)
}

/// CORS is outermost so panic responses carry the allow-origin header too.
fn with_middleware<S>(router: Router<S>, allowed_origins: &[String]) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors_layer(allowed_origins))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AnyCors)
        .allow_headers(AnyCors)
}

/// Turns a panicking handler into the same `{detail}` 500 response as any other fault.
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    AppError::internal("Unexpected error", anyhow::anyhow!(detail)).into_response()
}

pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: format!("{} is running!", SERVICE_NAME),
        version: env!("CARGO_PKG_VERSION").to_string(),
        features: vec!["multilingual".into(), "photo_enhancement".into()],
    })
}

pub async fn health() -> Json<Health> {
    Json(Health {
        status: "healthy".into(),
        service: SERVICE_NAME.into(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn platforms() -> Json<Vec<PlatformSpec>> {
    Json(Platform::ALL.iter().map(|p| p.spec()).collect())
}

#[axum::debug_handler]
pub async fn generate_listing(
    State(state): State<AppState>,
    Json(body): Json<ProductRequest>,
) -> Result<Json<ProductListing>, AppError> {
    if let Some(hours) = body.handmade_hours {
        if !hours.is_finite() || hours < 0.0 {
            return Err(AppError::BadRequest("handmade_hours must be a non-negative number".into()));
        }
    }

    tracing::info!("🚀 Generating listing for product: {} ({:?})", body.product_name, body.language);
    let listing = build_listing(&body, &state.translator).await;
    Ok(Json(listing))
}

pub async fn enhance_photo(mut multipart: Multipart) -> Result<Json<PhotoEnhancement>, AppError> {
    let mut upload: Option<Bytes> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let is_image = field.content_type().is_some_and(|ct| ct.starts_with("image/"));
        if !is_image {
            return Err(AppError::BadRequest("File must be an image".into()));
        }
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?;
        upload = Some(data);
        break;
    }
    let data = upload.ok_or_else(|| AppError::BadRequest("Missing 'file' field".into()))?;

    tracing::info!("📷 Enhancing photo ({} bytes)", data.len());
    let enhancement = tokio::task::spawn_blocking(move || process_photo(&data))
        .await
        .map_err(|e| AppError::internal("Error processing image", e))?;
    Ok(Json(enhancement))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::DEFAULT_ALLOWED_ORIGINS, imaging::tests::sample_png};
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const BOUNDARY: &str = "kalamitra-test-boundary";

    fn app() -> Router {
        let state = AppState {
            translator: Arc::new(TranslationClient::new(None, "http://127.0.0.1:9".into()).unwrap()),
        };
        let origins: Vec<String> = DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect();
        build_router(state, &origins)
    }

    async fn send(req: Request<Body>) -> (StatusCode, Value) {
        let resp = app().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn json_post(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn upload(content_type: &str, data: &[u8]) -> Request<Body> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"photo\"\r\nContent-Type: {content_type}\r\n\r\n"
        ).into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        Request::post("/enhance_photo")
            .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn banner_and_health() {
        let (status, body) = send(Request::get("/").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "KalaMitra API is running!");
        assert_eq!(body["features"], json!(["multilingual", "photo_enhancement"]));

        let (status, body) = send(Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "healthy", "service": "KalaMitra API", "version": env!("CARGO_PKG_VERSION") }));
    }

    #[tokio::test]
    async fn platforms_lists_three_targets() {
        let (status, body) = send(Request::get("/platforms").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = body.as_array().unwrap().iter().map(|p| p["id"].as_str().unwrap()).collect();
        assert_eq!(ids, ["instagram_square", "instagram_story", "whatsapp_status"]);
    }

    #[tokio::test]
    async fn generate_listing_for_clay_diya() {
        let (status, body) = send(json_post(
            "/generate_listing",
            json!({ "product_name": "Diya", "materials": "clay", "handmade_hours": 2 }),
        )).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["price_inr"], 320);
        assert_eq!(body["title"], "Handcrafted Diya");
        assert!(body["description_hi"].as_str().unwrap().contains("सांस्कृतिक विरासत"));
        assert!(body["hashtags"].as_array().unwrap().len() <= 15);
    }

    #[tokio::test]
    async fn generate_listing_translates_hindi_name() {
        let (status, body) = send(json_post(
            "/generate_listing",
            json!({ "product_name": "दिया", "language": "hi" }),
        )).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["title"].as_str().unwrap().starts_with("Handcrafted Diya"));
        assert!(body["instagram_caption_hi"].as_str().unwrap().contains("दिया"));
    }

    #[tokio::test]
    async fn negative_hours_rejected() {
        let (status, body) = send(json_post(
            "/generate_listing",
            json!({ "product_name": "Bowl", "handmade_hours": -1.0 }),
        )).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("handmade_hours"));
    }

    #[tokio::test]
    async fn unknown_language_is_unprocessable() {
        let (status, _) = send(json_post(
            "/generate_listing",
            json!({ "product_name": "Bowl", "language": "fr" }),
        )).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn enhance_photo_rejects_non_images() {
        let (status, body) = send(upload("text/plain", b"hello")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "detail": "File must be an image" }));
    }

    #[tokio::test]
    async fn enhance_photo_requires_file_field() {
        let body = format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"other\"\r\n\r\nx\r\n--{BOUNDARY}--\r\n");
        let req = Request::post("/enhance_photo")
            .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(body))
            .unwrap();
        let (status, _) = send(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn enhance_photo_returns_five_data_uris() {
        let (status, body) = send(upload("image/png", &sample_png(48, 32))).await;
        assert_eq!(status, StatusCode::OK);
        for key in ["original", "enhanced", "instagram_square", "instagram_story", "whatsapp_status"] {
            assert!(body[key].as_str().unwrap().starts_with("data:image/jpeg;base64,"), "{key}");
        }
    }

    #[tokio::test]
    async fn corrupt_image_degrades_to_original() {
        let (status, body) = send(upload("image/jpeg", b"not really a jpeg")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["enhanced"], body["original"]);
        assert_eq!(body["instagram_square"], body["original"]);
    }

    #[tokio::test]
    async fn cors_allows_configured_origin_only() {
        let preflight = |origin: &str| {
            Request::builder()
                .method("OPTIONS")
                .uri("/generate_listing")
                .header(header::ORIGIN, origin)
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap()
        };

        let resp = app().oneshot(preflight("http://localhost:3000")).await.unwrap();
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:3000"
        );

        let resp = app().oneshot(preflight("https://evil.example")).await.unwrap();
        assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    async fn boom() -> &'static str {
        panic!("kaboom")
    }

    #[tokio::test]
    async fn panics_become_detail_500_readable_cross_origin() {
        let origins: Vec<String> = DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect();
        let app = with_middleware(Router::new().route("/boom", get(boom)), &origins);
        let req = Request::get("/boom")
            .header(header::ORIGIN, "http://localhost:3000")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:3000"
        );
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["detail"], "Unexpected error: kaboom");
    }
}
