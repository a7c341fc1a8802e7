//! Runtime configuration values passed into the API client and the store.
//!
//! Both are plain immutable values; nothing here is shared or global.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::util::{is_http_url, normalize_text_option};
use crate::{Error, Result};

/// Record file name inside the data directory.
pub const RECORD_FILE_NAME: &str = "friends_data.csv";
/// Avatar cache directory name inside the data directory.
pub const AVATAR_DIR_NAME: &str = "avatar_cache";

/// Credentials for the Steam Web API plus an optional HTTP(S) proxy.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredentials {
    api_key: String,
    steam_id: String,
    proxy: Option<String>,
}

impl ApiCredentials {
    /// Validate and normalize a credential set.
    pub fn new(
        api_key: impl Into<String>,
        steam_id: impl Into<String>,
        proxy: Option<String>,
    ) -> Result<Self> {
        let api_key = normalize_text_option(Some(api_key.into()))
            .ok_or_else(|| Error::InvalidInput("Steam Web API key is required".to_string()))?;
        let steam_id = normalize_text_option(Some(steam_id.into()))
            .ok_or_else(|| Error::InvalidInput("Steam ID is required".to_string()))?;
        let proxy = normalize_text_option(proxy);
        if let Some(proxy) = proxy.as_deref() {
            if !is_http_url(proxy) {
                return Err(Error::InvalidInput(format!(
                    "proxy '{proxy}' must include http:// or https://"
                )));
            }
        }

        Ok(Self {
            api_key,
            steam_id,
            proxy,
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Account whose friends list is managed.
    pub fn steam_id(&self) -> &str {
        &self.steam_id
    }

    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ApiCredentials")
            .field("api_key", &"[REDACTED]")
            .field("steam_id", &self.steam_id)
            .field("proxy", &self.proxy)
            .finish()
    }
}

/// Locations of the record file and the avatar cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub record_file: PathBuf,
    pub avatar_dir: PathBuf,
}

impl DataPaths {
    /// Standard layout under a single data directory.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self {
            record_file: data_dir.join(RECORD_FILE_NAME),
            avatar_dir: data_dir.join(AVATAR_DIR_NAME),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_trim_and_drop_blank_proxy() {
        let credentials =
            ApiCredentials::new(" KEY ", " 76561198000000000 ", Some("  ".to_string())).unwrap();
        assert_eq!(credentials.api_key(), "KEY");
        assert_eq!(credentials.steam_id(), "76561198000000000");
        assert_eq!(credentials.proxy(), None);
    }

    #[test]
    fn credentials_require_key_and_id() {
        assert!(ApiCredentials::new("", "1", None).is_err());
        assert!(ApiCredentials::new("key", " ", None).is_err());
    }

    #[test]
    fn credentials_reject_proxy_without_scheme() {
        let error = ApiCredentials::new("key", "1", Some("127.0.0.1:7890".to_string()))
            .unwrap_err();
        assert!(error.to_string().contains("http://"));
    }

    #[test]
    fn credentials_debug_redacts_key() {
        let credentials = ApiCredentials::new("secret-key", "1", None).unwrap();
        let rendered = format!("{credentials:?}");
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn data_paths_use_fixed_names() {
        let paths = DataPaths::in_dir(Path::new("/tmp/roster"));
        assert_eq!(paths.record_file, Path::new("/tmp/roster/friends_data.csv"));
        assert_eq!(paths.avatar_dir, Path::new("/tmp/roster/avatar_cache"));
    }
}
