//! `http-backend`: run one request through the hyper backend.
//!
//! ```text
//! http-backend [--method M] [--data D] [--header K:V]... [--follow-redirects]
//!              [--config FILE] [--include] [--metrics-address A] URL
//! ```
//!
//! The body is streamed to stdout as it arrives; logs and the optional
//! response head go to stderr.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use http::Method;
use tokio::io::AsyncWriteExt;

use http_backend::config::{load_config, BackendConfig};
use http_backend::observability::{logging, metrics};
use http_backend::{HttpRequest, HyperBackend};

#[derive(Parser)]
#[command(name = "http-backend")]
#[command(about = "Send an HTTP request through the hyper client backend", long_about = None)]
struct Cli {
    /// Absolute http or https URL
    url: String,

    #[arg(short = 'X', long, default_value = "GET")]
    method: String,

    /// Request body
    #[arg(short, long)]
    data: Option<String>,

    /// Extra header as `Name: value`; repeatable
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,

    #[arg(short = 'L', long)]
    follow_redirects: bool,

    /// TOML backend configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the response head as JSON to stderr
    #[arg(short, long)]
    include: bool,

    /// Serve Prometheus metrics on this address while running
    #[arg(long)]
    metrics_address: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging("http_backend=info");
    let cli = Cli::parse();

    if let Some(addr) = cli.metrics_address {
        metrics::init_metrics(addr)?;
    }

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => BackendConfig::default(),
    };
    if cli.follow_redirects {
        config.follow_redirects = true;
    }
    tracing::debug!(config = ?config, "Configuration loaded");

    let method = Method::from_bytes(cli.method.to_ascii_uppercase().as_bytes())?;
    let mut builder = HttpRequest::builder(method, &cli.url);
    for header in &cli.headers {
        let (name, value) = header
            .split_once(':')
            .ok_or_else(|| format!("header {:?} is not `Name: value`", header))?;
        builder = builder.header(name.trim(), value.trim());
    }
    if let Some(data) = cli.data {
        builder = builder.body(data);
    }
    let request = builder.build()?;

    let backend = HyperBackend::new(config)?;
    let mut response = backend.execute(request).await?;

    if cli.include {
        eprintln!("{}", serde_json::to_string_pretty(&response.head())?);
    }

    let mut stdout = tokio::io::stdout();
    while let Some(chunk) = response.body.chunk().await? {
        stdout.write_all(&chunk).await?;
    }
    stdout.flush().await?;

    backend.close();
    Ok(())
}
