use crate::features::auth::handler;
use crate::features::auth::service::AuthService;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Public auth routes (no session required)
pub fn public_routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/api/auth/google", post(handler::sign_in_with_google))
        .with_state(service)
}

/// Protected auth routes (session middleware applied by caller)
pub fn protected_routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/api/auth/me", get(handler::get_me))
        .route("/api/auth/sign-out", post(handler::sign_out))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::middleware::session_middleware;
    use crate::features::auth::profile_store::InMemoryProfileStore;
    use crate::features::auth::session_store::SessionStore;
    use crate::shared::test_helpers::{StubIdentityProvider, TEST_RESIDENT_EMAIL};
    use axum::{http::StatusCode, middleware::from_fn_with_state};
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use std::time::Duration;

    fn server() -> TestServer {
        let sessions = Arc::new(SessionStore::new(Duration::from_secs(60), Vec::new()));
        let service = Arc::new(AuthService::new(
            Arc::new(StubIdentityProvider),
            Arc::new(InMemoryProfileStore::new()),
            sessions.clone(),
        ));

        let app = public_routes(service.clone()).merge(
            protected_routes(service)
                .route_layer(from_fn_with_state(sessions, session_middleware)),
        );
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_sign_in_me_sign_out() {
        let server = server();

        let response = server
            .post("/api/auth/google")
            .json(&json!({ "credential": "valid" }))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let body = response.json::<Value>();
        let token = body["data"]["token"].as_str().unwrap().to_string();
        assert!(body["data"].get("identity_token").is_none());

        let me = server
            .get("/api/auth/me")
            .add_header("Authorization", format!("Bearer {}", token))
            .await;
        assert_eq!(me.status_code(), StatusCode::OK);
        assert_eq!(
            me.json::<Value>()["data"]["profile"]["email"],
            TEST_RESIDENT_EMAIL
        );

        let signed_out = server
            .post("/api/auth/sign-out")
            .add_header("Authorization", format!("Bearer {}", token))
            .await;
        assert_eq!(signed_out.status_code(), StatusCode::OK);

        let after = server
            .get("/api/auth/me")
            .add_header("Authorization", format!("Bearer {}", token))
            .await;
        assert_eq!(after.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_rejected_credential_is_unauthorized() {
        let response = server()
            .post("/api/auth/google")
            .json(&json!({ "credential": "forged" }))
            .await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.json::<Value>()["success"], false);
    }

    #[tokio::test]
    async fn test_empty_credential_is_validation_error() {
        let response = server()
            .post("/api/auth/google")
            .json(&json!({ "credential": "" }))
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }
}
