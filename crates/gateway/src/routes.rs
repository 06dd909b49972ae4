use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, Path, State, multipart::MultipartRejection,
    },
    http::{HeaderMap, Method, Uri, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use classifier::{Fruit, Prediction, thumbnail};
use image::{DynamicImage, ImageFormat};
use serde_json::json;
use std::io::Cursor;
use tower_http::trace::TraceLayer;

use crate::{
    catalog,
    config::ServerSettings,
    error::{GatewayError, Result},
    pages::{self, GalleryTile},
    session,
    state::AppState,
};

const UPLOAD_FIELD: &str = "file";
const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

pub fn create_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .route("/", get(home).fallback(method_not_allowed))
        .route("/select/:fruit", post(select_fruit).fallback(method_not_allowed))
        .route("/gallery/:fruit", get(gallery_image).fallback(method_not_allowed))
        .route(
            "/predict",
            get(predict_page).post(predict).fallback(method_not_allowed),
        )
        .route("/health", get(health).fallback(method_not_allowed))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(settings: &ServerSettings, state: AppState) -> anyhow::Result<()> {
    let app = create_router(state);

    let address = settings.address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Fruit ripeness server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

fn parse_fruit(slug: &str) -> Result<Fruit> {
    Fruit::from_slug(slug).ok_or_else(|| GatewayError::NotFound(format!("Unknown fruit: {}", slug)))
}

async fn is_readable_file(path: &std::path::Path) -> bool {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => tokio::fs::File::open(path).await.is_ok(),
        _ => false,
    }
}

async fn home(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    let mut tiles = Vec::with_capacity(Fruit::ALL.len());
    for info in catalog::all() {
        let path = state.gallery.image_path(info.fruit);
        let has_image = is_readable_file(&path).await;
        if !has_image {
            tracing::debug!(path = %path.display(), "Example image missing or unreadable");
        }
        tiles.push(GalleryTile { info, has_image });
    }

    Html(pages::home(&tiles, session::selected_fruit(&headers)))
}

async fn select_fruit(Path(slug): Path<String>) -> Result<Response> {
    let fruit = parse_fruit(&slug)?;
    tracing::debug!(fruit = fruit.slug(), "Fruit selected");

    Ok((
        [(header::SET_COOKIE, session::select_cookie(fruit))],
        Redirect::to("/"),
    )
        .into_response())
}

/// Square thumbnail of the fruit's example image as PNG. Images that cannot
/// be decoded are served as-is and left to the browser.
async fn gallery_image(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response> {
    let fruit = parse_fruit(&slug)?;
    let path = state.gallery.image_path(fruit);
    let size = state.gallery.thumbnail_size;

    let thumb_path = path.clone();
    let thumbnail = tokio::task::spawn_blocking(move || -> anyhow::Result<Option<Vec<u8>>> {
        let Some(thumb) = thumbnail::square(&thumb_path, size) else {
            return Ok(None);
        };
        let mut png = Cursor::new(Vec::new());
        thumb.write_to(&mut png, ImageFormat::Png)?;
        Ok(Some(png.into_inner()))
    })
    .await??;

    if let Some(png) = thumbnail {
        return Ok(([(header::CONTENT_TYPE, ImageFormat::Png.to_mime_type())], png).into_response());
    }

    // Unreadable files are treated as missing
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %path.display(), error = %e, "Example image unreadable");
            }
            return Err(GatewayError::NotFound(format!(
                "No example image for {}",
                fruit
            )));
        }
    };

    tracing::warn!(path = %path.display(), "Example image not decodable, serving raw bytes");
    let content_type = image::guess_format(&bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream");

    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}

async fn predict_page() -> Html<String> {
    Html(pages::predict_form())
}

struct Upload {
    file_name: String,
    bytes: Vec<u8>,
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        return Ok(Upload {
            file_name,
            bytes: bytes.to_vec(),
        });
    }

    Err(GatewayError::BadRequest(
        "Tidak ada berkas yang diunggah.".to_string(),
    ))
}

fn has_accepted_extension(file_name: &str) -> bool {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
}

/// Decode an upload, accepting JPEG and PNG content only.
fn decode_upload(bytes: &[u8]) -> Result<(ImageFormat, DynamicImage)> {
    let format = match image::guess_format(bytes) {
        Ok(format @ (ImageFormat::Jpeg | ImageFormat::Png)) => format,
        _ => {
            return Err(GatewayError::BadRequest(
                "Berkas harus berupa gambar JPG atau PNG.".to_string(),
            ));
        }
    };

    let image = image::load_from_memory_with_format(bytes, format).map_err(|e| {
        tracing::debug!(error = %e, "Upload could not be decoded");
        GatewayError::BadRequest("Gambar tidak dapat dibaca.".to_string())
    })?;

    Ok((format, image))
}

async fn predict(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Html<String>> {
    let multipart = multipart.map_err(|e| GatewayError::BadRequest(e.body_text()))?;
    let upload = read_upload(multipart).await?;

    if !has_accepted_extension(&upload.file_name) {
        return Err(GatewayError::BadRequest(format!(
            "Jenis berkas tidak didukung: {}. Gunakan jpg, jpeg, atau png.",
            upload.file_name
        )));
    }

    tracing::info!(
        file_name = %upload.file_name,
        bytes = upload.bytes.len(),
        "Classifying upload"
    );

    let classifier = state.classifier.clone();
    let (upload, format, prediction) =
        tokio::task::spawn_blocking(move || -> Result<(Upload, ImageFormat, Prediction)> {
            let (format, image) = decode_upload(&upload.bytes)?;
            let prediction = classifier
                .lock()
                .map_err(|_| anyhow::anyhow!("Classifier lock poisoned"))?
                .predict(&image)?;
            Ok((upload, format, prediction))
        })
        .await??;

    tracing::info!(
        file_name = %upload.file_name,
        label = prediction.label,
        confidence = prediction.confidence,
        "Prediction served"
    );

    let preview = pages::data_uri(format.to_mime_type(), &upload.bytes);
    Ok(Html(pages::predict_result(&preview, &prediction)))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn method_not_allowed(method: Method, uri: Uri) -> GatewayError {
    GatewayError::MethodNotAllowed(format!("{} tidak didukung untuk {}.", method, uri.path()))
}

async fn not_found() -> GatewayError {
    GatewayError::NotFound("Halaman tidak ditemukan.".to_string())
}
