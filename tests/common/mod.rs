// tests/common/mod.rs

#![allow(dead_code)]

use axum::Router;
use realworld::{config::Config, db, routes, state::AppState};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{Value, json};

pub struct TestApp {
    pub address: String,
    pub client: Client,
}

/// Router over a fresh in-memory database, for driving requests without a socket.
pub async fn build_router() -> Router {
    // 1. Create a pool and run migrations
    let pool = db::connect_in_memory()
        .await
        .expect("Failed to open in-memory database");
    db::migrate(&pool).await.expect("Failed to migrate database");

    // 2. Create test configuration and state
    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600, // 10 minutes for tests
        rust_log: "error".to_string(),
        server_addr: "127.0.0.1:0".parse().unwrap(),
    };

    routes::create_router(AppState::new(pool, config))
}

/// Helper function to spawn the app on a random port for testing.
/// Each app gets its own in-memory database.
pub async fn spawn_app() -> TestApp {
    let app = build_router().await;

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    // Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address,
        client: Client::new(),
    }
}

/// A username short enough for the 50-character limit and unique per call.
pub fn unique_name(prefix: &str) -> String {
    format!("{}_{}", prefix, &uuid::Uuid::new_v4().to_string()[..8])
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path))
    }

    pub fn put(&self, path: &str) -> RequestBuilder {
        self.client.put(self.url(path))
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.client.delete(self.url(path))
    }

    /// Registers `username` (`<username>@example.com` / "password123") and returns its token.
    pub async fn register(&self, username: &str) -> String {
        let response = self
            .post("/api/users")
            .json(&json!({
                "user": {
                    "email": format!("{}@example.com", username),
                    "username": username,
                    "password": "password123"
                }
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 201);

        let body: Value = response.json().await.unwrap();
        body["user"]["token"].as_str().unwrap().to_string()
    }

    /// Creates an article as the token's user and returns its slug.
    pub async fn create_article(&self, token: &str, title: &str, tags: &[&str]) -> String {
        let response = self
            .post("/api/articles")
            .header("Authorization", format!("Token {}", token))
            .json(&json!({
                "article": {
                    "title": title,
                    "description": "Ever wonder how?",
                    "body": "You have to believe",
                    "tagList": tags
                }
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 201);

        let body: Value = response.json().await.unwrap();
        body["article"]["slug"].as_str().unwrap().to_string()
    }
}

pub trait WithToken {
    fn token(self, token: &str) -> Self;
}

impl WithToken for RequestBuilder {
    fn token(self, token: &str) -> Self {
        self.header("Authorization", format!("Token {}", token))
    }
}

/// Status code and JSON body of a response.
pub async fn read(response: Response) -> (u16, Value) {
    let status = response.status().as_u16();
    let body = response.json().await.unwrap_or(Value::Null);
    (status, body)
}

/// First message of a `{"errors": {"body": [...]}}` error body.
pub fn error_message(body: &Value) -> &str {
    body["errors"]["body"][0].as_str().unwrap_or_default()
}
