//! xmlintake Lambda bootstrap.
//!
//! Receives `{ body, bucket?, sid? }` events whose `body` is a base64-encoded
//! XML document, converts the document to JSON and writes it to S3 under
//! `[sid/]<uuid>.json`.
//!
//! # Usage
//!
//! ```text
//! bootstrap                       # Lambda runtime loop
//! bootstrap --event event.json    # invoke once locally and print the result
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `INTAKE_BUCKET` | *(unset)* | Bucket used when the event has none |
//! | `DEFAULT_REGION` | `us-east-1` | Region when the AWS provider chain finds none |
//! | `S3_ENDPOINT_URL` | *(unset)* | Custom S3 endpoint (path-style addressing) |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `LOG_FORMAT` | `text` | `text` or `json` |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use lambda_runtime::{Diagnostic, LambdaEvent, service_fn};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use xmlintake_core::{
    IntakeConfig, IntakeError, IntakeHandler, IntakeRequest, IntakeResponse, LogFormat,
};
use xmlintake_s3::S3ObjectStore;

/// Version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
/// Timestamps are left to the platform's log collector.
fn init_tracing(config: &IntakeConfig) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(&config.log_level)
            .with_context(|| format!("invalid log level filter: {}", config.log_level))?
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .without_time();

    match config.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }

    Ok(())
}

/// Map an intake failure to the diagnostic reported to the Lambda service.
fn diagnostic(err: &IntakeError) -> Diagnostic {
    Diagnostic {
        error_type: err.error_type().to_owned(),
        error_message: err.to_string(),
    }
}

/// Find the `--event <path>` (or `--event=<path>`) argument.
fn parse_event_arg<I>(args: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--event" {
            return args.next().map(PathBuf::from);
        }
        if let Some(path) = arg.strip_prefix("--event=") {
            return Some(PathBuf::from(path));
        }
    }
    None
}

/// Run the handler once on an event read from a JSON file.
async fn invoke_once(handler: &IntakeHandler, path: &Path) -> Result<IntakeResponse> {
    let raw = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read event file {}", path.display()))?;
    let request: IntakeRequest = serde_json::from_slice(&raw)
        .with_context(|| format!("invalid intake event in {}", path.display()))?;

    let response = handler.handle(request).await?;
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = IntakeConfig::from_env();

    init_tracing(&config)?;

    info!(
        default_bucket = config.default_bucket.as_deref().unwrap_or("-"),
        default_region = %config.default_region,
        endpoint_url = config.endpoint_url.as_deref().unwrap_or("-"),
        version = VERSION,
        "starting xmlintake",
    );

    let store = S3ObjectStore::from_config(&config).await;
    let handler = IntakeHandler::new(Arc::new(store), &config);

    if let Some(path) = parse_event_arg(std::env::args().skip(1)) {
        let response = invoke_once(&handler, &path).await.inspect_err(|e| {
            error!(path = %path.display(), error = %e, "local invocation failed");
        })?;
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    lambda_runtime::run(service_fn(move |event: LambdaEvent<IntakeRequest>| {
        let handler = handler.clone();
        async move {
            handler
                .handle(event.payload)
                .await
                .map_err(|e| diagnostic(&e))
        }
    }))
    .await
    .map_err(|e| anyhow::anyhow!(e))
}
