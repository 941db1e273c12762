use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use uuid::Uuid;

use secret_vault_api::app::{app, AppState};
use secret_vault_api::auth::{mint_token, Claims};
use secret_vault_api::database::MemorySecretRepository;

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Tests run against in-memory storage; pin it before the first
        // config() access so no DATABASE_URL is needed.
        std::env::set_var("VAULT_STORAGE", "memory");

        // The server runs in-process on a dedicated runtime thread so it
        // outlives any single #[tokio::test] runtime.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build server runtime");

            runtime.block_on(async move {
                let state = AppState {
                    repository: Arc::new(MemorySecretRepository::new()),
                };
                let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
                    .await
                    .expect("failed to bind test port");
                axum::serve(listener, app(state))
                    .await
                    .expect("test server exited");
            });
        });

        Ok(Self { port, base_url })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            match client.get(&url).send().await {
                Ok(resp) => {
                    if resp.status() == StatusCode::OK
                        || resp.status() == StatusCode::SERVICE_UNAVAILABLE
                    {
                        return Ok(());
                    }
                }
                Err(_) => {}
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to start test server"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Bearer token for an arbitrary user. Secrets are scoped per owner, so each
/// test isolates itself by minting its own user id.
pub fn mint_token_for(user_id: Uuid) -> Result<String> {
    let claims = Claims::new(user_id, format!("{}@example.test", user_id.simple()));
    Ok(mint_token(claims)?)
}

/// Seed one secret through the API, returning the created row.
pub async fn create_secret(
    server: &TestServer,
    token: &str,
    title: &str,
    secret: &str,
    secret_type: &str,
    favorite: bool,
) -> Result<serde_json::Value> {
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/secrets", server.base_url))
        .bearer_auth(token)
        .json(&serde_json::json!({
            "title": title,
            "secret": secret,
            "type": secret_type,
            "favorite": favorite,
        }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "seeding a secret failed with {}",
        res.status()
    );
    let body = res.json::<serde_json::Value>().await?;
    Ok(body["data"].clone())
}
