use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::Value;

use studytrack_api::auth::{generate_jwt, Claims};

/// Shared secret between the test process (which mints tokens) and the
/// spawned server (which validates them).
pub const JWT_SECRET: &str = "studytrack-test-secret";

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests.
        // Environment is inherited so the server sees DATABASE_URL from .env.
        let mut cmd = Command::new("target/debug/studytrack-api");
        cmd.env("STUDYTRACK_PORT", port.to_string())
            .env("STUDYTRACK_JWT_SECRET", JWT_SECRET)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

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
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                // Consider server ready on any non-404 response
                if resp.status() == StatusCode::OK
                    || resp.status() == StatusCode::SERVICE_UNAVAILABLE
                {
                    return Ok(());
                }
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
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Data tests need a live database; skip cleanly when none is configured.
pub fn db_available() -> bool {
    std::env::var("DATABASE_URL").is_ok()
}

/// A unique external identity per scenario, so runs never collide.
pub fn fresh_identity(prefix: &str) -> String {
    format!("{}_{}", prefix, uuid::Uuid::new_v4().simple())
}

/// Mint a bearer token for an external identity, signed with the same
/// secret the spawned server validates against.
pub fn bearer_token(external_id: &str) -> Result<String> {
    // The config singleton reads this on first access in the test process
    std::env::set_var("STUDYTRACK_JWT_SECRET", JWT_SECRET);

    let claims = Claims::new(
        external_id.to_string(),
        "Asha Rao".to_string(),
        format!("{}@example.com", external_id),
        None,
    );
    Ok(generate_jwt(claims)?)
}

/// Provision a user record for an external identity via the public hook.
pub async fn provision_user(
    server: &TestServer,
    client: &reqwest::Client,
    external_id: &str,
) -> Result<()> {
    let res = client
        .post(format!("{}/hooks/users", server.base_url))
        .json(&serde_json::json!({
            "external_id": external_id,
            "name": "Asha Rao",
            "email": format!("{}@example.com", external_id),
        }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::OK,
        "provisioning failed: {}",
        res.status()
    );
    Ok(())
}

/// Extract `data.id` from a success envelope.
pub fn data_id(body: &Value) -> Result<String> {
    body["data"]["id"]
        .as_str()
        .map(|s| s.to_string())
        .context("response has no data.id")
}
