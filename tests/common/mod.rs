#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;

use recipe_api::database::MemoryStore;
use recipe_api::services::UserService;
use recipe_api::{router, AppState};

/// One in-process server per test: its own port and its own empty store.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    client: reqwest::Client,
}

impl TestServer {
    async fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let store = Arc::new(MemoryStore::new());
        let app = router(AppState::new(store.clone()));

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            port,
            base_url,
            store,
            client: reqwest::Client::new(),
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = self.client.get(&url).send().await {
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

    /// Create a user directly in the store and return a client bound to its token
    pub async fn login(&self, email: &str) -> Result<TestClient> {
        let users = UserService::new(self.store.as_ref());
        users.create_user(email, "Test User").await?;
        let token = users.issue_token(email).await?;

        Ok(TestClient {
            base_url: self.base_url.clone(),
            token,
            client: self.client.clone(),
        })
    }

    pub fn anonymous(&self) -> &reqwest::Client {
        &self.client
    }
}

pub async fn start_server() -> Result<TestServer> {
    let server = TestServer::spawn().await?;
    server.wait_ready(Duration::from_secs(5)).await?;
    Ok(server)
}

/// Authenticated client for one user
pub struct TestClient {
    pub base_url: String,
    pub token: String,
    client: reqwest::Client,
}

impl TestClient {
    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.bearer_auth(&self.token)
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.authed(self.client.get(format!("{}{}", self.base_url, path)))
    }

    pub fn post(&self, path: &str, body: &Value) -> RequestBuilder {
        self.authed(self.client.post(format!("{}{}", self.base_url, path)).json(body))
    }

    pub fn put(&self, path: &str, body: &Value) -> RequestBuilder {
        self.authed(self.client.put(format!("{}{}", self.base_url, path)).json(body))
    }

    pub fn patch(&self, path: &str, body: &Value) -> RequestBuilder {
        self.authed(self.client.patch(format!("{}{}", self.base_url, path)).json(body))
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.authed(self.client.delete(format!("{}{}", self.base_url, path)))
    }

    /// POST and return the created object's id, asserting 201
    pub async fn create(&self, path: &str, body: &Value) -> Result<i64> {
        let res = self.post(path, body).send().await?;
        anyhow::ensure!(
            res.status() == StatusCode::CREATED,
            "POST {} returned {}",
            path,
            res.status()
        );
        let body: Value = res.json().await?;
        body["id"].as_i64().context("created object has no id")
    }
}

/// Names from a list response, in response order
pub fn names(body: &Value) -> Vec<String> {
    body.as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item["name"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Ids from a list response, in response order
pub fn ids(body: &Value) -> Vec<i64> {
    body.as_array()
        .map(|items| items.iter().filter_map(|item| item["id"].as_i64()).collect())
        .unwrap_or_default()
}
