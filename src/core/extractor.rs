use axum::{
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request},
    http::request::Parts,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use crate::core::error::AppError;
use crate::features::auth::model::Session;

/// JSON request body whose rejections use the API error envelope
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonBodyRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(JsonBodyRejection(rejection)),
        }
    }
}

pub struct JsonBodyRejection(JsonRejection);

impl IntoResponse for JsonBodyRejection {
    fn into_response(self) -> Response {
        let message = match self.0 {
            JsonRejection::JsonDataError(err) => {
                format!("Request fields are missing or have the wrong type: {}", err)
            }
            JsonRejection::JsonSyntaxError(err) => format!("Request body is not valid JSON: {}", err),
            JsonRejection::MissingJsonContentType(_) => {
                "Request body must be sent as application/json".to_string()
            }
            other => {
                tracing::debug!("Unreadable request body: {}", other);
                "Request body could not be read".to_string()
            }
        };

        AppError::BadRequest(message).into_response()
    }
}

/// The session resolved by `session_middleware`
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Sign in to continue".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Router};
    use axum_test::TestServer;
    use serde::Deserialize;
    use serde_json::{json, Value};

    #[derive(Deserialize)]
    struct Note {
        #[allow(dead_code)]
        text: String,
    }

    async fn accept(JsonBody(_): JsonBody<Note>) -> StatusCode {
        StatusCode::NO_CONTENT
    }

    async fn whoami(session: Session) -> String {
        session.profile.email
    }

    fn server() -> TestServer {
        let app = Router::new()
            .route("/notes", post(accept))
            .route("/whoami", post(whoami));
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_wrong_field_type_is_bad_request() {
        let response = server().post("/notes").json(&json!({ "text": 5 })).await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Request fields are missing or have the wrong type"));
    }

    #[tokio::test]
    async fn test_plain_text_body_is_bad_request() {
        let response = server().post("/notes").text("text=hello").await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["message"],
            "Request body must be sent as application/json"
        );
    }

    #[tokio::test]
    async fn test_missing_session_is_unauthorized() {
        let response = server().post("/whoami").await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    }
}
