//! Audio asset store client.
//!
//! Pronunciation recordings live in a remote blob namespace keyed
//! `audio-pronunciations/{documentId}.{mp3|webm}`. Rename is copy-then-delete:
//! there is no cross-store transaction, so a partial failure leaves a
//! transient duplicate rather than a lost recording, and the intermediate
//! state stays observable to cleanup tooling.
//!
//! Non-production execution contexts never touch the network: the
//! [`placeholder`](AssetStore::placeholder) backend returns deterministic
//! URIs, and the [`in_memory`](AssetStore::in_memory) backend keeps real
//! bytes for exercising rename semantics in tests and demos.

use std::collections::HashMap;

use base64::{Engine as _, engine::general_purpose};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

const PRONUNCIATION_PATH: &str = "audio-pronunciations";
const PLACEHOLDER_URI_PATH: &str = "https://igbo-audio-test-local/audio-pronunciations/";

#[derive(Error, Debug)]
pub enum AssetError {
    /// Malformed or missing input. Never retried, surfaced verbatim.
    #[error("{0}")]
    Validation(String),

    #[error("no asset at {key}")]
    NotFound { key: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("asset store returned {status}: {body}")]
    Server { status: u16, body: String },
}

enum Backend {
    /// Real blob store over HTTP.
    Live {
        client: reqwest::Client,
        base_url: String,
    },
    /// Byte-keeping test backend with live semantics.
    Memory(RwLock<HashMap<String, Vec<u8>>>),
    /// No I/O; every write yields a deterministic URI.
    Placeholder,
}

/// Client for the pronunciation blob namespace.
pub struct AssetStore {
    backend: Backend,
}

fn key_for(id: &str, is_mp3: bool) -> String {
    let extension = if is_mp3 { "mp3" } else { "webm" };
    format!("{PRONUNCIATION_PATH}/{id}.{extension}")
}

fn placeholder_uri(id: &str) -> String {
    format!("{PLACEHOLDER_URI_PATH}{id}")
}

impl AssetStore {
    /// Live client against a blob store base URL (no trailing slash needed).
    pub fn live(base_url: String) -> Self {
        Self {
            backend: Backend::Live {
                client: reqwest::Client::new(),
                base_url: base_url.trim_end_matches('/').to_string(),
            },
        }
    }

    pub fn placeholder() -> Self {
        Self {
            backend: Backend::Placeholder,
        }
    }

    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(RwLock::new(HashMap::new())),
        }
    }

    fn public_uri(&self, key: &str) -> String {
        match &self.backend {
            Backend::Live { base_url, .. } => format!("{base_url}/{key}"),
            Backend::Memory(_) => format!("memory://{key}"),
            Backend::Placeholder => String::new(),
        }
    }

    /// Upload a base64 recording (optionally a `data:` URI) as `{id}.webm`
    /// and return its public URI.
    pub async fn put(&self, id: &str, base64_audio: &str) -> Result<String, AssetError> {
        if id.is_empty() || base64_audio.is_empty() {
            return Err(AssetError::Validation(
                "id and pronunciation must be provided".into(),
            ));
        }
        if let Backend::Placeholder = self.backend {
            return Ok(placeholder_uri(id));
        }

        // Strip any data-URI header before decoding.
        let encoded = base64_audio
            .split_once("base64,")
            .map_or(base64_audio, |(_, rest)| rest);
        let bytes = general_purpose::STANDARD
            .decode(encoded)
            .map_err(|err| AssetError::Validation(format!("invalid base64 payload: {err}")))?;

        let key = key_for(id, false);
        match &self.backend {
            Backend::Live { client, base_url } => {
                let url = format!("{base_url}/{key}");
                let resp = client
                    .put(&url)
                    .header("content-type", "audio/webm")
                    .body(bytes)
                    .send()
                    .await?;
                check_status(resp).await?;
                info!(%key, "uploaded pronunciation");
                Ok(self.public_uri(&key))
            }
            Backend::Memory(blobs) => {
                blobs.write().await.insert(key.clone(), bytes);
                Ok(self.public_uri(&key))
            }
            Backend::Placeholder => unreachable!(),
        }
    }

    /// Delete `{id}.{mp3|webm}`. Deleting a missing asset succeeds.
    pub async fn remove(&self, id: &str, is_mp3: bool) -> Result<(), AssetError> {
        if id.is_empty() {
            return Err(AssetError::Validation("no pronunciation id provided".into()));
        }
        let key = key_for(id, is_mp3);
        match &self.backend {
            Backend::Live { client, base_url } => {
                let url = format!("{base_url}/{key}");
                let resp = client.delete(&url).send().await?;
                if resp.status().as_u16() != 404 {
                    check_status(resp).await?;
                }
                Ok(())
            }
            Backend::Memory(blobs) => {
                blobs.write().await.remove(&key);
                Ok(())
            }
            Backend::Placeholder => Ok(()),
        }
    }

    /// Server-side copy from `{old_id}` to `{new_id}` — no re-upload.
    /// Returns the copied asset's public URI.
    pub async fn copy(&self, old_id: &str, new_id: &str, is_mp3: bool) -> Result<String, AssetError> {
        if old_id.is_empty() || new_id.is_empty() {
            return Err(AssetError::Validation(
                "both source and target ids must be provided".into(),
            ));
        }
        if let Backend::Placeholder = self.backend {
            return Ok(placeholder_uri(new_id));
        }

        let old_key = key_for(old_id, is_mp3);
        let new_key = key_for(new_id, is_mp3);
        match &self.backend {
            Backend::Live { client, base_url } => {
                let url = format!("{base_url}/{new_key}");
                let resp = client
                    .put(&url)
                    .header("x-copy-source", &old_key)
                    .send()
                    .await?;
                check_status(resp).await?;
                Ok(self.public_uri(&new_key))
            }
            Backend::Memory(blobs) => {
                let mut blobs = blobs.write().await;
                let bytes = blobs
                    .get(&old_key)
                    .cloned()
                    .ok_or_else(|| AssetError::NotFound {
                        key: old_key.clone(),
                    })?;
                blobs.insert(new_key.clone(), bytes);
                Ok(self.public_uri(&new_key))
            }
            Backend::Placeholder => unreachable!(),
        }
    }

    /// Move a recording from `old_id` to `new_id`.
    ///
    /// An empty `old_id` means the recording was removed during editing: any
    /// asset at `new_id` is deleted and an empty URI returned. Otherwise the
    /// asset is copied first and the source deleted second, so a failure
    /// between the two steps duplicates rather than loses the recording.
    pub async fn rename(
        &self,
        old_id: &str,
        new_id: &str,
        is_mp3: bool,
    ) -> Result<String, AssetError> {
        if new_id.is_empty() {
            return Err(AssetError::Validation("no target id provided".into()));
        }
        if old_id.is_empty() {
            if let Backend::Placeholder = self.backend {
                return Ok(String::new());
            }
            self.remove(new_id, is_mp3).await?;
            return Ok(String::new());
        }

        let uri = self.copy(old_id, new_id, is_mp3).await?;
        self.remove(old_id, is_mp3).await?;
        info!(old_id, new_id, "renamed pronunciation");
        Ok(uri)
    }

    /// Fetch the bytes stored at `{id}.{mp3|webm}`.
    pub async fn get(&self, id: &str, is_mp3: bool) -> Result<Vec<u8>, AssetError> {
        if id.is_empty() {
            return Err(AssetError::Validation("no pronunciation id provided".into()));
        }
        let key = key_for(id, is_mp3);
        match &self.backend {
            Backend::Live { client, base_url } => {
                let url = format!("{base_url}/{key}");
                let resp = client.get(&url).send().await?;
                if resp.status().as_u16() == 404 {
                    return Err(AssetError::NotFound { key });
                }
                let resp = check_status(resp).await?;
                Ok(resp.bytes().await?.to_vec())
            }
            Backend::Memory(blobs) => blobs
                .read()
                .await
                .get(&key)
                .cloned()
                .ok_or(AssetError::NotFound { key }),
            Backend::Placeholder => Err(AssetError::NotFound { key }),
        }
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, AssetError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(AssetError::Server {
            status: status.as_u16(),
            body,
        });
    }
    Ok(resp)
}
