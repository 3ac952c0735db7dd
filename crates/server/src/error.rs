use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use showtime_catalog::CatalogError;
use showtime_core::error::{ApiError, ErrorEnvelope};
use tracing::error;

use crate::search::SearchError;

/// Newtype wrapper so we can implement `IntoResponse` in this crate.
pub struct AppError(pub ApiError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let envelope = ErrorEnvelope::from(&self.0);
        (status, Json(envelope)).into_response()
    }
}

impl From<ApiError> for AppError {
    fn from(e: ApiError) -> Self {
        Self(e)
    }
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        let api = match e {
            SearchError::Validation(msg) => ApiError::BadRequest(msg),
            SearchError::NoData(msg) => ApiError::BadGateway(msg),
            SearchError::Catalog(CatalogError::Configuration(msg)) => {
                error!(error = %msg, "catalog is not configured");
                ApiError::Internal(msg)
            }
            SearchError::Catalog(e @ (CatalogError::Unavailable(_) | CatalogError::Decode(_))) => {
                error!(error = %e, "catalog request failed");
                ApiError::BadGateway(format!("TMDB request failed: {e}"))
            }
        };
        Self(api)
    }
}
