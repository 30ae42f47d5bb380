use std::path::Path;
use std::sync::Arc;

use recipebox::server::{AppState, create_router};
use recipebox::store::{SqliteStore, Store};
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::task::JoinHandle;

/// A server on an ephemeral port backed by a fresh database.
pub struct TestServer {
    pub temp_dir: TempDir,
    pub base_url: String,
    pub client: reqwest::Client,
    handle: JoinHandle<()>,
}

#[allow(dead_code)]
impl TestServer {
    pub async fn start() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let store = SqliteStore::new(temp_dir.path().join("recipebox.db")).expect("open store");
        store.initialize().expect("initialize store");

        let state = Arc::new(AppState {
            store: Arc::new(store),
            session_ttl: Some(chrono::Duration::days(30)),
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let port = listener.local_addr().expect("local addr").port();
        let app = create_router(state);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });

        Self {
            temp_dir,
            base_url: format!("http://127.0.0.1:{port}"),
            client: reqwest::Client::new(),
            handle,
        }
    }

    pub fn data_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    /// Signs up and logs in, returning the session token.
    pub async fn register(&self, email: &str) -> String {
        let resp = self
            .client
            .post(self.url("/auth/signup"))
            .json(&json!({ "email": email, "password": "secret123" }))
            .send()
            .await
            .expect("signup");
        assert_eq!(resp.status(), 201, "signup failed for {email}");

        let resp: Value = self
            .client
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "password": "secret123" }))
            .send()
            .await
            .expect("login")
            .json()
            .await
            .expect("parse login response");

        resp["data"]["token"]
            .as_str()
            .expect("session token")
            .to_string()
    }

    pub async fn get(&self, token: &str, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("GET request")
    }

    pub async fn post(&self, token: &str, path: &str, body: Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .expect("POST request")
    }

    pub async fn put(&self, token: &str, path: &str, body: Option<Value>) -> reqwest::Response {
        let request = self.client.put(self.url(path)).bearer_auth(token);
        let request = match body {
            Some(body) => request.json(&body),
            None => request,
        };
        request.send().await.expect("PUT request")
    }

    pub async fn patch(&self, token: &str, path: &str, body: Value) -> reqwest::Response {
        self.client
            .patch(self.url(path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .expect("PATCH request")
    }

    pub async fn delete(&self, token: &str, path: &str) -> reqwest::Response {
        self.client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("DELETE request")
    }

    /// Creates a recipe and returns its id.
    pub async fn create_recipe(&self, token: &str, body: Value) -> String {
        let resp = self.post(token, "/recipes", body).await;
        assert_eq!(resp.status(), 201, "create recipe failed");
        let value: Value = resp.json().await.expect("parse recipe");
        value["data"]["id"].as_str().expect("recipe id").to_string()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[allow(dead_code)]
pub fn pancakes() -> Value {
    json!({
        "title": "Pancakes",
        "description": "Fluffy weekend pancakes",
        "ingredients": ["egg", "flour"],
        "instructions": "Mix and fry.",
        "cooking_time": 20,
        "difficulty": "easy",
        "category": "Breakfast"
    })
}
