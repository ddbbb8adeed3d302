use portfolio_server::config::{AuthConfig, Config, UploadConfig};
use reqwest::Client;
use serde_json::{Value, json};
use std::net::SocketAddr;
use tokio::net::TcpListener;

pub const TEST_SECRET: &str = "integration-test-secret";

pub struct TestServer {
    pub url: String,
    #[allow(dead_code)]
    pub addr: SocketAddr,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(Config {
            host: "127.0.0.1".into(),
            port: 0, // OS assigns port
            storage: Default::default(),
            auth: AuthConfig {
                jwt_secret: TEST_SECRET.into(),
                ..Default::default()
            },
            uploads: UploadConfig {
                backend: "memory".into(),
                max_bytes: 64 * 1024,
                ..Default::default()
            },
        })
        .await
    }

    pub async fn start_with(config: Config) -> Self {
        let state = portfolio_server::state::AppState::new(&config).await.unwrap();
        let app = portfolio_server::routes::router(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give server a moment to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Self {
            url: format!("http://{addr}"),
            addr,
        }
    }

    /// Register `username` with `<username>@x.com` / "pw123"
    #[allow(dead_code)]
    pub async fn register(&self, client: &Client, username: &str) -> reqwest::Response {
        client
            .post(format!("{}/api/auth/register", self.url))
            .json(&json!({
                "username": username,
                "email": format!("{username}@x.com"),
                "password": "pw123",
            }))
            .send()
            .await
            .expect("Failed to send request")
    }

    /// Register then log in; returns (token, user id)
    #[allow(dead_code)]
    pub async fn sign_up(&self, client: &Client, username: &str) -> (String, String) {
        assert_eq!(self.register(client, username).await.status(), 201);

        let body: Value = client
            .post(format!("{}/api/auth/login", self.url))
            .json(&json!({ "email": format!("{username}@x.com"), "password": "pw123" }))
            .send()
            .await
            .expect("Failed to send request")
            .json()
            .await
            .expect("Failed to parse JSON");

        (
            body["token"].as_str().unwrap().to_string(),
            body["user"]["id"].as_str().unwrap().to_string(),
        )
    }
}
