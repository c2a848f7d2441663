//! The intake handler: one invocation from request to stored document.
//!
//! [`IntakeHandler::handle`] runs strictly in sequence:
//!
//! ```text
//! resolve bucket -> base64 decode -> XML parse -> JSON serialize -> key -> put_object
//! ```
//!
//! Each step returns early on failure, so the store is only called with a
//! fully converted document. The store's result (or error) is returned as is.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info, instrument};
use xmlintake_xml::{ParseOptions, from_xml_with};

use crate::config::IntakeConfig;
use crate::decode::decode_body;
use crate::error::{IntakeError, IntakeResult};
use crate::key::{IdGenerator, TimeOrderedIds, object_key};
use crate::store::{ObjectStore, StorageObject};
use crate::types::{IntakeRequest, IntakeResponse};

/// Converts XML requests to JSON and writes them to an [`ObjectStore`].
///
/// All dependencies are `Arc`-shared, so cloning is cheap.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use xmlintake_core::{InMemoryObjectStore, IntakeConfig, IntakeHandler, IntakeRequest};
///
/// # tokio_test::block_on(async {
/// let store = Arc::new(InMemoryObjectStore::new());
/// let config = IntakeConfig::builder().default_bucket("docs").build();
/// let handler = IntakeHandler::new(store.clone(), &config);
///
/// let resp = handler
///     .handle(IntakeRequest::from_xml("<root><a>1</a></root>").with_sid("s1"))
///     .await
///     .unwrap();
/// assert!(resp.key.starts_with("s1/"));
/// assert_eq!(store.len(), 1);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct IntakeHandler {
    store: Arc<dyn ObjectStore>,
    ids: Arc<dyn IdGenerator>,
    default_bucket: Option<String>,
    parse_options: ParseOptions,
}

impl IntakeHandler {
    /// Create a handler writing to `store`, with time-ordered ids and default parse options.
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>, config: &IntakeConfig) -> Self {
        Self {
            store,
            ids: Arc::new(TimeOrderedIds),
            default_bucket: config
                .default_bucket
                .clone()
                .filter(|b| !b.trim().is_empty()),
            parse_options: ParseOptions::default(),
        }
    }

    /// Replace the id generator.
    #[must_use]
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Replace the XML parse options.
    #[must_use]
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Handle one invocation.
    #[instrument(
        name = "intake",
        skip_all,
        fields(sid = request.sid.as_deref(), bucket = request.bucket.as_deref())
    )]
    pub async fn handle(&self, request: IntakeRequest) -> IntakeResult<IntakeResponse> {
        let bucket = self.resolve_bucket(request.bucket.as_deref())?;

        let xml = decode_body(&request.body)?;
        let document = from_xml_with(&xml, &self.parse_options)?;
        let json = serde_json::to_vec(&document)?;
        let key = object_key(request.sid.as_deref(), &self.ids.new_id());
        let size = json.len();

        debug!(xml_len = xml.len(), json_len = size, %key, "converted document");

        let output = self
            .store
            .put_object(StorageObject {
                bucket: bucket.clone(),
                key: key.clone(),
                body: Bytes::from(json),
            })
            .await?;

        info!(%bucket, %key, size, "stored converted document");

        Ok(IntakeResponse {
            bucket,
            key,
            e_tag: output.e_tag,
            version_id: output.version_id,
        })
    }

    /// The request's bucket if non-empty, else the configured default.
    fn resolve_bucket(&self, requested: Option<&str>) -> IntakeResult<String> {
        requested
            .filter(|b| !b.trim().is_empty())
            .map(ToOwned::to_owned)
            .or_else(|| self.default_bucket.clone())
            .ok_or_else(|| {
                IntakeError::Config(
                    "no destination bucket: request has no `bucket` and INTAKE_BUCKET is unset"
                        .to_owned(),
                )
            })
    }
}
