use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Domain error, mapped to an HTTP status exactly once at the boundary.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found")]
    NotFound,
    #[error("{0}")]
    Conflict(String),
    #[error("incorrect email or password")]
    LoginFailed,
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::LoginFailed | ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the client. Internal detail stays in the logs.
    fn client_message(&self) -> String {
        match self {
            ApiError::Internal(_) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        if matches!(e, sqlx::Error::RowNotFound) {
            return ApiError::NotFound;
        }
        if let sqlx::Error::Database(db) = &e {
            // 23505: unique constraint violation, the store's Conflict signal
            if db.code().as_deref() == Some("23505") {
                let msg = if db.constraint().is_some_and(|c| c.contains("email")) {
                    "email already exists"
                } else {
                    "resource already exists"
                };
                return ApiError::Conflict(msg.into());
            }
        }
        ApiError::Internal(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(e) = &self {
            error!(error = ?e, "request failed");
        }
        let body = Json(json!({ "error": self.client_message() }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_map_to_fixed_status_codes() {
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Conflict("email already exists".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(ApiError::LoginFailed.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::Unauthorized("missing token").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Validation("invalid email".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_detail_is_hidden_from_clients() {
        let err = ApiError::Internal(anyhow::anyhow!("connection refused on 10.0.0.3"));
        assert_eq!(err.client_message(), "internal server error");
    }

    #[test]
    fn domain_messages_pass_through() {
        let err = ApiError::Conflict("email already exists".into());
        assert_eq!(err.client_message(), "email already exists");
        assert_eq!(
            ApiError::LoginFailed.client_message(),
            "incorrect email or password"
        );
    }
}
