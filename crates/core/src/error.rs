use serde::Serialize;
use thiserror::Error;

/// Unified API error type.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("bad gateway: {0}")]
    BadGateway(String),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Internal(_) => "internal_error",
            Self::BadGateway(_) => "bad_gateway",
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::Internal(_) => 500,
            Self::BadGateway(_) => 502,
        }
    }
}

/// JSON error envelope: `{ "error": { "code": "…", "message": "…", "details": {} } }`
#[derive(Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
}

impl From<&ApiError> for ErrorEnvelope {
    fn from(e: &ApiError) -> Self {
        Self {
            error: ErrorBody {
                code: e.code().to_string(),
                message: e.to_string(),
                details: serde_json::Value::Object(serde_json::Map::new()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_cover_what_the_service_returns() {
        let cases = [
            (ApiError::BadRequest(String::new()), "bad_request", 400),
            (ApiError::Internal(String::new()), "internal_error", 500),
            (ApiError::BadGateway(String::new()), "bad_gateway", 502),
        ];
        for (err, code, status) in cases {
            assert_eq!(err.code(), code);
            assert_eq!(err.status_code(), status);
        }
    }

    #[test]
    fn bad_gateway_maps_to_502_envelope() {
        let err = ApiError::BadGateway("TMDB request failed".into());
        assert_eq!(err.status_code(), 502);

        let envelope = serde_json::to_value(ErrorEnvelope::from(&err)).unwrap();
        assert_eq!(envelope["error"]["code"], "bad_gateway");
        assert_eq!(
            envelope["error"]["message"],
            "bad gateway: TMDB request failed"
        );
        assert!(envelope["error"]["details"].as_object().unwrap().is_empty());
    }
}
