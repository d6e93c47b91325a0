//! Firestore REST API client.
//!
//! This crate provides:
//! - A typed repository for saved scripts
//! - Service account authentication via gcp_auth with token caching
//! - Merge updates and retry logic

pub mod client;
pub mod error;
pub mod retry;
pub mod script_repo;
pub mod token_cache;
pub mod types;

pub use client::{FirestoreClient, FirestoreConfig};
pub use error::{FirestoreError, FirestoreResult};
pub use script_repo::ScriptRepository;
pub use types::{Document, FromFirestoreValue, ToFirestoreValue, Value};
