//! Upload hand-off
//!
//! Publishing the finished video is an external collaborator, same as asset
//! generation: the core defines the contract and credential resolution,
//! nothing more. Rendering never depends on upload being configured.

use std::env;
use std::path::Path;

use crate::error::{JobError, JobResult};

/// Metadata attached to an uploaded video.
#[derive(Debug, Clone)]
pub struct UploadMetadata {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub category: String,
    pub privacy: String,
}

/// Destination service for finished videos. Implementations own their
/// transport and auth refresh; `upload` returns the remote identifier.
pub trait UploadBackend {
    fn upload(&self, file: &Path, meta: &UploadMetadata) -> JobResult<String>;
}

/// Secondary credential source consulted when the environment variable is
/// unset (a mounted secrets file, a keychain, a test stub).
pub trait CredentialStore {
    fn fetch(&self, key: &str) -> Option<String>;
}

/// Resolve a credential: environment variable first, then the store.
///
/// A missing credential is a [`JobError::Configuration`], which callers
/// treat as "uploads disabled", never as a failed job.
pub fn resolve_credential(
    env_var: &str,
    store: &dyn CredentialStore,
    key: &str,
) -> JobResult<String> {
    if let Ok(value) = env::var(env_var) {
        if !value.trim().is_empty() {
            return Ok(value);
        }
    }
    store.fetch(key).ok_or_else(|| {
        JobError::Configuration(format!(
            "credential {key} not found (set {env_var} or provision the store)"
        ))
    })
}
