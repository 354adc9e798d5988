use axum::Json;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use token_session::SessionError;

/// JSON body sent with every session failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub msg: String,
}

/// Rejection wrapper so handlers can `?` a [`SessionError`].
///
/// Only the public code and message reach the client. Internal detail from
/// `System` and `BadRequest` stays in the logs.
#[derive(Debug)]
pub struct SessionRejection(pub SessionError);

impl From<SessionError> for SessionRejection {
    fn from(err: SessionError) -> Self {
        Self(err)
    }
}

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        if status.is_server_error() {
            tracing::error!("Session failure: {}", self.0);
        } else {
            tracing::debug!("Session rejected: {}", self.0);
        }

        let body = ErrorBody {
            code: self.0.code().to_string(),
            msg: self.0.public_message().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use http::StatusCode;

    async fn render(err: SessionError) -> (StatusCode, ErrorBody) {
        let response = SessionRejection::from(err).into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_unauthorized_response() {
        let (status, body) = render(SessionError::Unauthorized).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.code, "invalid_token");
        assert_eq!(body.msg, "invalid token");
    }

    #[tokio::test]
    async fn test_bad_request_response() {
        let (status, body) =
            render(SessionError::BadRequest("x-forwarded-for missing".to_string())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "bad_request_header");
    }

    #[tokio::test]
    async fn test_system_error_hides_detail() {
        let (status, body) =
            render(SessionError::System("aead open failed for key 0x11".to_string())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, "system_error");
        assert!(!body.msg.contains("aead"));
    }
}
