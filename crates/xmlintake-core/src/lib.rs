//! Request handling, configuration and storage seam for xmlintake.
//!
//! This crate turns one intake request (a base64-encoded XML document plus an
//! optional bucket and session id) into a JSON object in an object store.
//!
//! # Architecture
//!
//! ```text
//! IntakeRequest
//!        |
//!        v
//! IntakeHandler (bucket -> decode -> parse -> serialize -> key)
//!        |
//!        v
//! dyn ObjectStore (S3 in production, InMemoryObjectStore in tests)
//! ```

pub mod config;
pub mod decode;
pub mod error;
pub mod handler;
pub mod key;
pub mod store;
pub mod types;

pub use config::{IntakeConfig, LogFormat};
pub use error::{IntakeError, IntakeResult};
pub use handler::IntakeHandler;
pub use key::{IdGenerator, TimeOrderedIds};
pub use store::{InMemoryObjectStore, ObjectStore, PutObjectOutput, StorageObject, StoreError};
pub use types::{IntakeRequest, IntakeResponse};
