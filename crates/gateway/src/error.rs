//! Errors surfaced by the page handlers, rendered as HTML error pages.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::pages;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Invalid upload: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Prediction task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<MultipartError> for GatewayError {
    fn from(err: MultipartError) -> Self {
        match err.status() {
            StatusCode::PAYLOAD_TOO_LARGE => GatewayError::PayloadTooLarge(err.body_text()),
            _ => GatewayError::BadRequest(err.body_text()),
        }
    }
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::Join(_) | GatewayError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (heading, message) = match &self {
            GatewayError::BadRequest(msg) => ("Gambar tidak valid", msg.clone()),
            GatewayError::NotFound(msg) => ("Halaman tidak ditemukan", msg.clone()),
            GatewayError::MethodNotAllowed(msg) => ("Metode tidak diizinkan", msg.clone()),
            GatewayError::PayloadTooLarge(msg) => ("Gambar terlalu besar", msg.clone()),
            GatewayError::Join(e) => {
                tracing::error!(error = %e, "Prediction task panicked or was cancelled");
                ("Terjadi kesalahan", "Prediksi gagal diproses.".to_string())
            }
            GatewayError::Internal(e) => {
                tracing::error!(error = %format!("{:#}", e), "Internal server error");
                ("Terjadi kesalahan", "Prediksi gagal diproses.".to_string())
            }
        };

        (status, Html(pages::error_page(heading, &message))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
