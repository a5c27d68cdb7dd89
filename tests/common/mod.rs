#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

use recipe_api::database::MemoryStore;
use recipe_api::{app, AppState};

/// A server on its own port with a fresh in-memory store
pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        let router = app(AppState::new(Arc::new(MemoryStore::new())));
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let server = Self {
            base_url,
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Register through the public endpoint, asserting success
    pub async fn create_user(&self, email: &str, password: &str, name: &str) -> Result<()> {
        let res = self
            .client
            .post(self.url("/users/create"))
            .json(&json!({ "email": email, "password": password, "name": name }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "signup failed: {}", res.status());
        Ok(())
    }

    pub async fn token(&self, email: &str, password: &str) -> Result<String> {
        let body: Value = self
            .client
            .post(self.url("/users/token"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?
            .json()
            .await?;
        body["token"]
            .as_str()
            .map(str::to_string)
            .with_context(|| format!("no token in {}", body))
    }

    /// Sign up and log in, returning the bearer token
    pub async fn login_new_user(&self, email: &str, password: &str) -> Result<String> {
        self.create_user(email, password, "Test user").await?;
        self.token(email, password).await
    }

    pub async fn create_resource(&self, token: &str, path: &str, name: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(&json!({ "name": name }))
            .send()
            .await?)
    }

    pub async fn list(&self, token: &str, path: &str) -> Result<(StatusCode, Value)> {
        let res = self.client.get(self.url(path)).bearer_auth(token).send().await?;
        let status = res.status();
        Ok((status, res.json().await?))
    }
}
