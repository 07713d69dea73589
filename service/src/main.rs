mod relay;
mod server;

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use imgrelay_core::config::{DirectoryConfig, ShareConfig, UploadConfig};
use imgrelay_core::share::smb::SmbTransport;
use imgrelay_core::share::ShareSession;
use imgrelay_core::upload::UploadClient;

use relay::Relay;

/// Relay images from an SMB share to an HTTP endpoint.
///
/// Every setting can be given as a flag or through the environment
/// variable named next to it.
#[derive(Debug, Parser)]
#[command(name = "imgrelay", version)]
struct Settings {
    /// SMB server host name or address.
    #[arg(long, env = "SMB_HOST")]
    smb_host: String,

    /// SMB server port.
    #[arg(long, env = "SMB_PORT", default_value_t = 445)]
    smb_port: u16,

    /// Share name on the server.
    #[arg(long, env = "SMB_SHARE")]
    smb_share: String,

    /// Username for share authentication; guest access when unset.
    #[arg(long, env = "SMB_USERNAME")]
    smb_username: Option<String>,

    /// Password for share authentication.
    #[arg(long, env = "SMB_PASSWORD")]
    smb_password: Option<String>,

    /// Authentication domain / workgroup.
    #[arg(long, env = "SMB_DOMAIN", default_value = "WORKGROUP")]
    smb_domain: String,

    /// Upload endpoint receiving the JSON file envelopes.
    #[arg(long, env = "API_URL")]
    api_url: String,

    /// Upload timeout in seconds (single attempt per file).
    #[arg(long, env = "API_TIMEOUT_SECS", default_value_t = 10)]
    api_timeout_secs: u64,

    /// Listen port for the /process and /health endpoints.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Input directory under the share root.
    #[arg(long, env = "SMB_INPUT_DIR", default_value = "input")]
    input_dir: String,

    /// Output directory under the share root.
    #[arg(long, env = "SMB_OUTPUT_DIR", default_value = "output")]
    output_dir: String,

    /// Run a single processing pass and exit instead of serving HTTP.
    #[arg(long)]
    once: bool,
}

impl Settings {
    fn share_config(&self) -> ShareConfig {
        ShareConfig {
            host: self.smb_host.clone(),
            port: self.smb_port,
            share: self.smb_share.clone(),
            username: self.smb_username.clone(),
            password: self.smb_password.clone(),
            domain: self.smb_domain.clone(),
        }
    }

    fn upload_config(&self) -> UploadConfig {
        UploadConfig {
            url: self.api_url.clone(),
            timeout_secs: self.api_timeout_secs,
        }
    }

    fn directory_config(&self) -> DirectoryConfig {
        DirectoryConfig {
            input: self.input_dir.clone(),
            output: self.output_dir.clone(),
        }
    }
}

/// Log the effective configuration; credentials stay out of the logs.
fn log_settings(settings: &Settings) {
    info!(
        "share endpoint: \\\\{}\\{} (port {})",
        settings.smb_host, settings.smb_share, settings.smb_port
    );
    info!(
        "share user: {}",
        settings.smb_username.as_deref().unwrap_or("(guest)")
    );
    info!("upload endpoint: {}", settings.api_url);
    info!(
        "input dir: '{}', output dir: '{}'",
        settings.input_dir, settings.output_dir
    );
    info!("listen port: {}", settings.port);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    log_settings(&settings);

    let uploader =
        UploadClient::new(&settings.upload_config()).context("building upload client")?;
    let session = ShareSession::new(Box::new(SmbTransport::new(settings.share_config())));
    let mut relay = Relay::new(session, uploader, settings.directory_config());
    relay.initialize();

    if settings.once {
        let outcome = tokio::task::spawn_blocking(move || {
            let result = relay.run_pass();
            relay.shutdown();
            result
        })
        .await
        .context("processing task failed")??;
        info!("{}", outcome.message());
        return Ok(());
    }

    let relay = Arc::new(Mutex::new(relay));
    let app = server::router(relay);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("listening on http://{addr}");
    axum::serve(listener, app).await.context("HTTP server failed")?;

    Ok(())
}
