//! Integration tests for xmlintake against an S3-compatible server.
//!
//! These tests require a running server at `localhost:4566` (or
//! `S3_ENDPOINT_URL`). They are marked `#[ignore]` so they don't run during
//! normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p xmlintake-integration -- --ignored
//! ```

use std::sync::{Arc, Once};

use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use xmlintake_core::{IntakeConfig, IntakeHandler};
use xmlintake_s3::S3ObjectStore;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Endpoint URL for the server.
fn endpoint_url() -> String {
    std::env::var("S3_ENDPOINT_URL").unwrap_or_else(|_| "http://localhost:4566".to_owned())
}

/// Create a configured S3 client pointing at the local server.
#[must_use]
pub fn s3_client() -> aws_sdk_s3::Client {
    init_tracing();

    let creds = Credentials::new("test", "test", None, None, "integration-test");

    let config = aws_sdk_s3::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(creds)
        .endpoint_url(endpoint_url())
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(config)
}

/// Create an intake handler writing through `client`.
#[must_use]
pub fn intake_handler(client: &aws_sdk_s3::Client, config: &IntakeConfig) -> IntakeHandler {
    let store = S3ObjectStore::new(client.clone());
    IntakeHandler::new(Arc::new(store), config)
}

/// Generate a unique bucket name for a test.
#[must_use]
pub fn test_bucket_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}

/// Create a bucket and return its name. Caller is responsible for cleanup.
pub async fn create_test_bucket(client: &aws_sdk_s3::Client, prefix: &str) -> String {
    let name = test_bucket_name(prefix);
    client
        .create_bucket()
        .bucket(&name)
        .send()
        .await
        .unwrap_or_else(|e| panic!("failed to create bucket {name}: {e}"));
    name
}

/// List every key in a bucket, optionally under a prefix.
pub async fn list_keys(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    prefix: Option<&str>,
) -> Vec<String> {
    let mut keys = Vec::new();
    let mut continuation_token = None;
    loop {
        let mut req = client.list_objects_v2().bucket(bucket);
        if let Some(prefix) = prefix {
            req = req.prefix(prefix);
        }
        if let Some(token) = continuation_token.take() {
            req = req.continuation_token(token);
        }
        let resp = req
            .send()
            .await
            .unwrap_or_else(|e| panic!("failed to list bucket {bucket}: {e}"));

        keys.extend(
            resp.contents()
                .iter()
                .filter_map(|o| o.key().map(ToOwned::to_owned)),
        );

        if resp.is_truncated() == Some(true) {
            continuation_token = resp.next_continuation_token().map(ToOwned::to_owned);
        } else {
            break;
        }
    }
    keys
}

/// Delete all objects in a bucket, then delete the bucket.
pub async fn cleanup_bucket(client: &aws_sdk_s3::Client, bucket: &str) {
    let Ok(resp) = client.list_objects_v2().bucket(bucket).send().await else {
        return; // Bucket may not exist.
    };
    for obj in resp.contents() {
        if let Some(key) = obj.key() {
            let _ = client.delete_object().bucket(bucket).key(key).send().await;
        }
    }

    let _ = client.delete_bucket().bucket(bucket).send().await;
}

mod test_intake;
