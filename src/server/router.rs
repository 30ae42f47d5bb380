use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{Router, routing::get};
use chrono::Duration;

use super::account::account_router;
use super::cookbook::cookbook_router;
use crate::store::Store;

pub struct AppState {
    pub store: Arc<dyn Store>,
    /// Lifetime of newly issued sessions. `None` never expires.
    pub session_ttl: Option<Duration>,
}

async fn health() -> &'static str {
    "OK"
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", account_router().merge(cookbook_router()))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::{Duration, Utc};
    use tower::ServiceExt;

    use crate::auth::{hash_password, issue_session};
    use crate::store::SqliteStore;
    use crate::types::{Account, Session};

    fn test_app() -> Router {
        let store = SqliteStore::in_memory().unwrap();
        store.initialize().unwrap();
        create_router(Arc::new(AppState {
            store: Arc::new(store),
            session_ttl: None,
        }))
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_recipes_require_auth() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/recipes")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key("WWW-Authenticate"));
    }

    #[tokio::test]
    async fn test_signup_rejects_short_password() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/auth/signup")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"email":"jo@example.com","password":"123"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_expired_session_is_rejected() {
        let store = SqliteStore::in_memory().unwrap();
        store.initialize().unwrap();
        let now = Utc::now();
        store
            .create_account(&Account {
                id: "acct-1".to_string(),
                email: "jo@example.com".to_string(),
                password_hash: "hash".to_string(),
                created_at: now,
            })
            .unwrap();

        let (session, token) = issue_session(&store, "acct-1", None).unwrap();
        store.delete_session(&session.id).unwrap();
        store
            .create_session(&Session {
                expires_at: Some(now - Duration::minutes(5)),
                ..session
            })
            .unwrap();

        let app = create_router(Arc::new(AppState {
            store: Arc::new(store),
            session_ttl: Some(Duration::days(30)),
        }));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/auth/user")
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key("WWW-Authenticate"));

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Session expired");
    }

    #[tokio::test]
    async fn test_failed_profile_creation_leaves_no_session() {
        let temp = tempfile::TempDir::new().unwrap();
        let db_path = temp.path().join("test.db");
        let store = SqliteStore::new(&db_path).unwrap();
        store.initialize().unwrap();
        store
            .create_account(&Account {
                id: "acct-1".to_string(),
                email: "jo@example.com".to_string(),
                password_hash: hash_password("hunter22").unwrap(),
                created_at: Utc::now(),
            })
            .unwrap();

        let raw = rusqlite::Connection::open(&db_path).unwrap();
        raw.execute_batch(
            "CREATE TRIGGER no_profiles BEFORE INSERT ON profiles
             BEGIN SELECT RAISE(ABORT, 'profiles are read-only'); END;",
        )
        .unwrap();

        let app = create_router(Arc::new(AppState {
            store: Arc::new(store),
            session_ttl: None,
        }));
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/auth/login")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"email":"jo@example.com","password":"hunter22"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let sessions: i64 = raw
            .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))
            .unwrap();
        assert_eq!(sessions, 0);
    }
}
