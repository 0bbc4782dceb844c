//! Site configuration snapshot.
//!
//! Read once at startup and shared as `Arc<SiteConfig>`. Nothing mutates it
//! afterwards; per-request variation (channel override, locale) is passed
//! explicitly to the resolution calls.

use pageflow_store::{ContentMode, MirrorLocation, RemoteOptions};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const ENV_GUID: &str = "PAGEFLOW_GUID";
pub const ENV_API_FETCH_KEY: &str = "PAGEFLOW_API_FETCH_KEY";
pub const ENV_API_PREVIEW_KEY: &str = "PAGEFLOW_API_PREVIEW_KEY";
pub const ENV_LOCALES: &str = "PAGEFLOW_LOCALES";
pub const ENV_SITEMAP: &str = "PAGEFLOW_SITEMAP";
pub const ENV_SECURITY_KEY: &str = "PAGEFLOW_SECURITY_KEY";
pub const ENV_DEBUG: &str = "PAGEFLOW_DEBUG";
pub const ENV_SYNC: &str = "PAGEFLOW_SYNC";
pub const ENV_CACHE_ROOT: &str = "PAGEFLOW_CACHE_ROOT";
pub const ENV_SCRATCH_ROOT: &str = "PAGEFLOW_SCRATCH_ROOT";
pub const ENV_API_BASE_URL: &str = "PAGEFLOW_API_BASE_URL";

/// Default locale list when none is configured.
pub const DEFAULT_LOCALE: &str = "en-us";
/// Default sitemap channel.
pub const DEFAULT_CHANNEL: &str = "website";
/// Default cache root, relative to the working directory.
pub const DEFAULT_CACHE_ROOT: &str = ".pageflow/cache";

/// Process-wide site configuration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site identifier. Empty means no backend can be built.
    pub site_id: String,
    /// Credential for live content.
    pub fetch_api_key: String,
    /// Credential for preview content.
    pub preview_api_key: String,
    /// Locale codes, lowercased. The first one is the default.
    pub locales: Vec<String>,
    /// Sitemap channel.
    pub channel_name: String,
    /// Key preview tokens are derived from.
    pub security_key: String,
    pub debug: bool,
    /// Whether the local mirror may be used.
    pub sync_enabled: bool,
    /// Durable cache root. Holds the build marker.
    pub cache_root: PathBuf,
    /// Writable copy of the cache root on read-only deploy targets.
    pub scratch_root: Option<PathBuf>,
    /// Content API host. Derived from the site identifier when unset.
    pub api_base_url: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_id: String::new(),
            fetch_api_key: String::new(),
            preview_api_key: String::new(),
            locales: vec![DEFAULT_LOCALE.to_string()],
            channel_name: DEFAULT_CHANNEL.to_string(),
            security_key: String::new(),
            debug: false,
            sync_enabled: true,
            cache_root: PathBuf::from(DEFAULT_CACHE_ROOT),
            scratch_root: None,
            api_base_url: None,
        }
    }
}

impl SiteConfig {
    /// Loads the configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads the configuration from any variable lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let locales = get(ENV_LOCALES)
            .map(|raw| parse_locales(&raw))
            .filter(|locales| !locales.is_empty())
            .unwrap_or(defaults.locales);

        Self {
            site_id: get(ENV_GUID).unwrap_or_default(),
            fetch_api_key: get(ENV_API_FETCH_KEY).unwrap_or_default(),
            preview_api_key: get(ENV_API_PREVIEW_KEY).unwrap_or_default(),
            locales,
            channel_name: get(ENV_SITEMAP).unwrap_or(defaults.channel_name),
            security_key: get(ENV_SECURITY_KEY).unwrap_or_default(),
            debug: get(ENV_DEBUG).is_some_and(|v| v == "true"),
            sync_enabled: get(ENV_SYNC).is_none_or(|v| v != "false"),
            cache_root: get(ENV_CACHE_ROOT).map_or(defaults.cache_root, PathBuf::from),
            scratch_root: get(ENV_SCRATCH_ROOT).map(PathBuf::from),
            api_base_url: get(ENV_API_BASE_URL),
        }
    }

    /// The first configured locale.
    #[must_use]
    pub fn default_locale(&self) -> &str {
        self.locales.first().map_or(DEFAULT_LOCALE, String::as_str)
    }

    /// Language code for a request: the requested locale, else the caller's
    /// default, else the configured default. Always lowercased.
    #[must_use]
    pub fn language_code(&self, locale: Option<&str>, default_locale: Option<&str>) -> String {
        locale
            .filter(|l| !l.is_empty())
            .or(default_locale.filter(|l| !l.is_empty()))
            .unwrap_or_else(|| self.default_locale())
            .to_lowercase()
    }

    /// Channel for a request, honouring a per-request override.
    #[must_use]
    pub fn channel<'a>(&'a self, channel_override: Option<&'a str>) -> &'a str {
        channel_override
            .filter(|c| !c.is_empty())
            .unwrap_or(&self.channel_name)
    }

    /// The single credential used for a request.
    #[must_use]
    pub fn api_key(&self, preview: bool) -> &str {
        if preview {
            &self.preview_api_key
        } else {
            &self.fetch_api_key
        }
    }

    /// The cache root reads and writes go to: the scratch root when one is
    /// configured, else the durable root.
    #[must_use]
    pub fn active_cache_root(&self) -> &Path {
        self.scratch_root.as_deref().unwrap_or(&self.cache_root)
    }

    /// Mirror location for a content mode.
    #[must_use]
    pub fn mirror_location(&self, preview: bool) -> MirrorLocation {
        MirrorLocation::new(
            self.active_cache_root(),
            self.site_id.clone(),
            ContentMode::from_preview(preview),
        )
    }

    /// Connection settings for the content API in a mode.
    #[must_use]
    pub fn remote_options(&self, preview: bool) -> RemoteOptions {
        let options = RemoteOptions::new(
            self.site_id.clone(),
            self.api_key(preview),
            ContentMode::from_preview(preview),
        );
        match &self.api_base_url {
            Some(base_url) => options.with_base_url(base_url.clone()),
            None => options,
        }
    }
}

impl fmt::Debug for SiteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiteConfig")
            .field("site_id", &self.site_id)
            .field("fetch_api_key", &"<redacted>")
            .field("preview_api_key", &"<redacted>")
            .field("locales", &self.locales)
            .field("channel_name", &self.channel_name)
            .field("security_key", &"<redacted>")
            .field("debug", &self.debug)
            .field("sync_enabled", &self.sync_enabled)
            .field("cache_root", &self.cache_root)
            .field("scratch_root", &self.scratch_root)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

fn parse_locales(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|l| l.trim().to_lowercase())
        .filter(|l| !l.is_empty())
        .collect()
}
