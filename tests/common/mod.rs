#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use uuid::Uuid;

use smartpantry_api::auth::{generate_jwt, Claims};
use smartpantry_api::config::AppConfig;

/// Secret the spawned server signs tokens with.
pub const TEST_SECRET: &str = "integration-test-secret";

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Cargo builds the server binary before running integration tests
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_smartpantry-api"));
        cmd.env("APP_ENV", "development")
            .env("PORT", port.to_string())
            .env("SECRET_KEY", TEST_SECRET)
            .env("BCRYPT_COST", "4")
            // Fail fast when no Postgres is reachable
            .env("DATABASE_CONNECTION_TIMEOUT", "1")
            .env_remove("GIFT_RANDOM_SEED")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // DATABASE_URL is inherited when set; otherwise the development default applies
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            // The root route never touches the database
            if let Ok(resp) = client.get(format!("{}/", self.base_url)).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// A token the spawned server accepts, for a user that need not exist.
pub fn bearer_token(email: &str) -> Result<String> {
    let mut security = AppConfig::development().security;
    security.jwt_secret = TEST_SECRET.to_string();
    let claims = Claims::new(Uuid::new_v4(), email.to_string(), &security);
    let token = generate_jwt(&claims, &security)?;
    Ok(format!("Bearer {}", token))
}
