//! Amazon S3 object store for xmlintake.
//!
//! [`S3ObjectStore`] implements [`ObjectStore`] on top of `aws-sdk-s3`. Errors
//! from the SDK are passed on as [`StoreError`]s carrying the service error
//! code and message, with the SDK error itself as the source.

use std::error::Error;
use std::fmt;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_config::meta::region::RegionProviderChain;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use tracing::{debug, info};
use xmlintake_core::{IntakeConfig, ObjectStore, PutObjectOutput, StorageObject, StoreError};

/// Content type of every stored document.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// [`ObjectStore`] backed by Amazon S3 (or any S3-compatible endpoint).
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    /// Wrap an existing client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the AWS provider chain and the intake configuration.
    ///
    /// The region comes from the provider chain, falling back to
    /// [`IntakeConfig::default_region`]. A configured endpoint URL switches the
    /// client to path-style addressing.
    pub async fn from_config(config: &IntakeConfig) -> Self {
        let region = RegionProviderChain::default_provider()
            .or_else(Region::new(config.default_region.clone()));
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &config.endpoint_url {
            info!(endpoint = %endpoint, "using custom S3 endpoint");
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self::new(Client::from_conf(builder.build()))
    }

    /// The underlying S3 client.
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, object: StorageObject) -> Result<PutObjectOutput, StoreError> {
        debug!(
            bucket = %object.bucket,
            key = %object.key,
            size = object.body.len(),
            "putting object"
        );

        let output = self
            .client
            .put_object()
            .bucket(&object.bucket)
            .key(&object.key)
            .content_type(JSON_CONTENT_TYPE)
            .body(ByteStream::from(object.body))
            .send()
            .await
            .map_err(store_error)?;

        Ok(PutObjectOutput {
            e_tag: output.e_tag().map(ToOwned::to_owned),
            version_id: output.version_id().map(ToOwned::to_owned),
        })
    }
}

/// Convert an SDK error into a [`StoreError`], keeping the service's code and
/// message and the SDK error as source.
fn store_error<E, R>(err: SdkError<E, R>) -> StoreError
where
    E: ProvideErrorMetadata + Error + Send + Sync + 'static,
    R: fmt::Debug + Send + Sync + 'static,
{
    let code = err.code().map(ToOwned::to_owned);
    let message = err
        .message()
        .map_or_else(|| DisplayErrorContext(&err).to_string(), ToOwned::to_owned);

    let store_err = StoreError::new(message).with_source(err);
    match code {
        Some(code) => store_err.with_code(code),
        None => store_err,
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_s3::config::http::HttpResponse;
    use aws_sdk_s3::operation::put_object::PutObjectError;

    use super::*;

    #[test]
    fn test_should_keep_sdk_error_context() {
        let err: SdkError<PutObjectError, HttpResponse> =
            SdkError::construction_failure("bucket name is required");
        let store_err = store_error(err);

        assert!(store_err.code().is_none());
        assert!(
            store_err.message().contains("bucket name is required"),
            "message: {}",
            store_err.message()
        );
        assert!(Error::source(&store_err).is_some());
    }

    #[test]
    fn test_should_wrap_existing_client() {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build();
        let store = S3ObjectStore::new(Client::from_conf(config));

        assert_eq!(
            store
                .client()
                .config()
                .region()
                .map(ToString::to_string)
                .as_deref(),
            Some("us-east-1")
        );
    }
}
