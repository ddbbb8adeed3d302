use crate::config::Config;
use crate::error::{ServerError, ServerResult};
use crate::middleware::VerifiedIdentity;
use crate::state::AppState;
use axum::{
    Extension, Json,
    body::Body,
    extract::{
        Multipart, Path, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::{HeaderMap, StatusCode, header},
    response::Response,
};
use portfolio_store::{StoreError, UploadStorage, uploads::upload_name};
use serde::Serialize;

/// Multipart field carrying the image
const IMAGE_FIELD: &str = "image";

/// Timestamps tried before giving up on a free name
const NAME_ATTEMPTS: i64 = 8;

#[derive(Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// POST /api/upload
pub async fn upload_image(
    State(state): State<AppState>,
    Extension(identity): Extension<VerifiedIdentity>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> ServerResult<Json<UploadResponse>> {
    let mut multipart = multipart.map_err(|e| ServerError::BadRequest(e.body_text()))?;
    let max_bytes = state.config.uploads.max_bytes;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !is_accepted_image(&content_type) {
            return Err(ServerError::UnsupportedMediaType);
        }
        let original = field.file_name().unwrap_or_default().to_string();

        let data = field.bytes().await.map_err(multipart_error)?;
        if data.len() > max_bytes {
            return Err(ServerError::PayloadTooLarge);
        }
        if data.is_empty() {
            break;
        }

        let millis = chrono::Utc::now().timestamp_millis();
        let name = store_unique(state.uploads.as_ref(), &original, &content_type, &data, millis)
            .await?;
        tracing::info!(owner = %identity.owner, name = %name, bytes = data.len(), "image uploaded");

        return Ok(Json(UploadResponse {
            url: format!("{}/uploads/{}", public_base(&state.config, &headers), name),
        }));
    }

    Err(ServerError::Validation("No file uploaded".into()))
}

/// GET /uploads/{name}
pub async fn serve_upload(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ServerResult<Response> {
    let image = state.uploads.get(&name).await.map_err(|e| match e {
        StoreError::InvalidName(_) => ServerError::NotFound("Image".into()),
        other => other.into(),
    })?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, image.content_type)
        .header(header::CONTENT_LENGTH, image.bytes.len())
        .header(header::X_CONTENT_TYPE_OPTIONS, "nosniff")
        .body(Body::from(image.bytes))
        .map_err(|e| ServerError::Internal(e.to_string()))
}

/// `image/*`, except SVG, which can carry script
fn is_accepted_image(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence.starts_with("image/") && !essence.starts_with("image/svg")
}

/// Store under `<millis>-<name>`, moving to later millis while names are taken
async fn store_unique(
    uploads: &dyn UploadStorage,
    original: &str,
    content_type: &str,
    data: &[u8],
    millis: i64,
) -> ServerResult<String> {
    for offset in 0..NAME_ATTEMPTS {
        let name = upload_name(original, millis + offset);
        match uploads.put(&name, content_type, data).await {
            Ok(()) => return Ok(name),
            Err(StoreError::Conflict(_)) => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Err(ServerError::Internal(format!("no free upload name for {original}")))
}

fn multipart_error(err: MultipartError) -> ServerError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ServerError::PayloadTooLarge
    } else {
        ServerError::BadRequest(err.body_text())
    }
}

/// Configured public URL, else the Host the client used
fn public_base(config: &Config, headers: &HeaderMap) -> String {
    if let Some(url) = &config.uploads.public_url {
        return url.trim_end_matches('/').to_string();
    }
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}:{}", config.host, config.port));
    format!("http://{host}")
}
