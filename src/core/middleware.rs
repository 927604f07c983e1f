use crate::core::error::AppError;
use crate::features::auth::SessionStore;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use base64::prelude::*;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

/// Request ID generator using UUID v7 (time-ordered)
#[derive(Clone, Copy)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Custom MakeSpan that includes request_id in the tracing span
#[derive(Clone, Debug)]
pub struct MakeSpanWithRequestId;

impl<B> tower_http::trace::MakeSpan<B> for MakeSpanWithRequestId {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> Span {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    }
}

pub fn cors_layer(allowed_origins: Vec<String>) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    // If origins list contains "*", allow any origin
    if allowed_origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

pub fn basic_auth_middleware(
    valid_credentials: Arc<String>,
) -> impl Fn(
    Request,
    Next,
)
    -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, Response>> + Send>>
       + Clone {
    move |req: Request, next: Next| {
        let credentials = valid_credentials.clone();
        Box::pin(async move {
            let auth_header = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|header| header.to_str().ok());

            if let Some(encoded) = auth_header.and_then(|h| h.strip_prefix("Basic ")) {
                let decoded = BASE64_STANDARD
                    .decode(encoded)
                    .ok()
                    .and_then(|bytes| String::from_utf8(bytes).ok());
                if decoded.as_deref() == Some(credentials.as_str()) {
                    return Ok(next.run(req).await);
                }
            }

            let mut response = Response::new(Body::from("Unauthorized"));
            *response.status_mut() = StatusCode::UNAUTHORIZED;
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Basic realm=\"Swagger UI\""),
            );

            Err(response)
        })
    }
}

/// Resolves `Authorization: Bearer <session token>` into a `Session` extension
pub async fn session_middleware(
    State(sessions): State<Arc<SessionStore>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthorized("Invalid authorization header format".to_string())
    })?;

    let session = sessions
        .resolve(token)
        .await
        .ok_or_else(|| AppError::Unauthorized("Session expired or signed out".to_string()))?;

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::IdentityProfile;
    use axum::{middleware::from_fn_with_state, routing::get, Router};
    use axum_test::TestServer;
    use std::time::Duration;

    async fn whoami(session: crate::features::auth::model::Session) -> String {
        session.profile.email
    }

    fn app(sessions: Arc<SessionStore>) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .route_layer(from_fn_with_state(sessions, session_middleware))
    }

    #[tokio::test]
    async fn test_session_middleware_resolves_bearer_token() {
        let sessions = Arc::new(SessionStore::new(Duration::from_secs(60), Vec::new()));
        let session = sessions
            .create(IdentityProfile {
                subject: "sub-1".to_string(),
                name: "Resident".to_string(),
                email: "resident@example.com".to_string(),
                picture: None,
            })
            .await;

        let server = TestServer::new(app(sessions)).unwrap();
        let response = server
            .get("/whoami")
            .add_header("Authorization", format!("Bearer {}", session.token))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.text(), "resident@example.com");
    }

    #[tokio::test]
    async fn test_session_middleware_rejects_unknown_token() {
        let sessions = Arc::new(SessionStore::new(Duration::from_secs(60), Vec::new()));
        let server = TestServer::new(app(sessions)).unwrap();

        let missing = server.get("/whoami").await;
        assert_eq!(missing.status_code(), StatusCode::UNAUTHORIZED);

        let unknown = server
            .get("/whoami")
            .add_header("Authorization", "Bearer not-a-session")
            .await;
        assert_eq!(unknown.status_code(), StatusCode::UNAUTHORIZED);
    }
}
