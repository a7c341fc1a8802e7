//! Local avatar cache.
//!
//! Avatars are stored as `<account_id>_<basename of url>` inside the cache
//! directory. Resolution never fails: any problem falls back to the remote
//! URL so the roster still has something to show.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures_util::stream::{self, StreamExt};

use crate::steam::build_http_client;
use crate::Result;

const DOWNLOAD_TIMEOUT_SECS: u64 = 10;
static DOWNLOAD_SEQ: AtomicU64 = AtomicU64::new(0);
/// Concurrent downloads per resolution batch.
pub const AVATAR_CONCURRENCY: usize = 8;

/// Turns a remote avatar URL into the reference stored in the roster.
pub trait AvatarResolver: Send + Sync {
    /// Local path on success, `remote_url` unchanged on any failure.
    fn resolve(&self, remote_url: &str, account_id: &str) -> impl Future<Output = String> + Send;
}

/// Resolve many `(remote_url, account_id)` pairs with bounded concurrency,
/// keeping input order.
pub async fn resolve_many<A: AvatarResolver>(
    resolver: &A,
    requests: Vec<(String, String)>,
) -> Vec<String> {
    stream::iter(requests)
        .map(|(remote_url, account_id)| async move {
            resolver.resolve(&remote_url, &account_id).await
        })
        .buffered(AVATAR_CONCURRENCY)
        .collect()
        .await
}

/// File-backed avatar cache.
#[derive(Debug, Clone)]
pub struct AvatarCache {
    dir: PathBuf,
    client: reqwest::Client,
}

impl AvatarCache {
    /// Open (creating if needed) a cache directory; downloads go through `proxy`.
    pub fn open(dir: impl Into<PathBuf>, proxy: Option<&str>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        let client = build_http_client(proxy)?;
        Ok(Self { dir, client })
    }

    /// Cache location for an avatar URL.
    pub fn cache_path(&self, remote_url: &str, account_id: &str) -> PathBuf {
        self.dir
            .join(format!("{account_id}_{}", url_basename(remote_url)))
    }

    async fn download(&self, remote_url: &str, path: &Path) -> std::result::Result<(), String> {
        let response = self
            .client
            .get(remote_url)
            .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
            .send()
            .await
            .map_err(|error| format!("request failed: {error}"))?;
        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status().as_u16()));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|error| format!("failed to read body: {error}"))?;

        // Temp name is unique per download, even for the same avatar.
        let mut partial = path.as_os_str().to_os_string();
        partial.push(format!(
            ".part-{}-{}",
            std::process::id(),
            DOWNLOAD_SEQ.fetch_add(1, Ordering::Relaxed)
        ));
        let partial = PathBuf::from(partial);
        tokio::fs::write(&partial, &bytes)
            .await
            .map_err(|error| format!("failed to write {}: {error}", partial.display()))?;
        tokio::fs::rename(&partial, path)
            .await
            .map_err(|error| format!("failed to move {} into place: {error}", partial.display()))
    }
}

impl AvatarResolver for AvatarCache {
    async fn resolve(&self, remote_url: &str, account_id: &str) -> String {
        if remote_url.is_empty() {
            return String::new();
        }

        let path = self.cache_path(remote_url, account_id);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return path.to_string_lossy().into_owned();
        }

        match self.download(remote_url, &path).await {
            Ok(()) => {
                tracing::debug!("Cached avatar for {account_id} at {}", path.display());
                path.to_string_lossy().into_owned()
            }
            Err(error) => {
                tracing::warn!("Avatar download for {account_id} failed: {error}");
                remote_url.to_string()
            }
        }
    }
}

/// Resolver that keeps remote URLs as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoteAvatars;

impl AvatarResolver for RemoteAvatars {
    async fn resolve(&self, remote_url: &str, _account_id: &str) -> String {
        remote_url.to_string()
    }
}

/// Last path segment of a URL, without query or fragment, safe as a file name.
fn url_basename(remote_url: &str) -> String {
    let without_query = remote_url
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    let name: String = without_query
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    if name.is_empty() || name.chars().all(|c| c == '.') {
        "avatar.jpg".to_string()
    } else {
        name
    }
}
