use crate::channel::Channel;
use crate::crawler::CollectMode;
use crate::url::UrlScheme;
use crate::{UrlError, UrlResult};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Main configuration structure for the collector
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub collector: CollectorConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub notification: NotificationConfig,
}

/// HTTP fetch behaviour
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FetcherConfig {
    /// Total attempts for one URL while the server answers 502
    pub max_attempts: u32,

    /// Fixed delay between 502 retries (milliseconds)
    pub retry_delay_ms: u64,

    /// Whole-request timeout (seconds)
    pub timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            retry_delay_ms: 500,
            timeout_secs: 30,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler
    pub contact_url: String,

    /// Email address for crawler-related contact
    pub contact_email: String,
}

impl UserAgentConfig {
    /// `User-Agent` header value, `name/version (+url; email)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "ops@example.com".to_string(),
        }
    }
}

/// Which URL scheme the site is walked with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemeKind {
    /// One listing per channel under the section base
    Section,
    /// One listing under the section base shared by all channels
    Aggregate,
    /// Numeric channel ids on the site origin
    Channels,
}

/// Where the bulletins are published
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SourceConfig {
    pub scheme: SchemeKind,

    /// Section base for `section` and `aggregate`, any URL on the site for
    /// `channels`
    pub base_url: String,

    /// Numeric channel id keyed by bulletin code, `channels` scheme only
    #[serde(default)]
    pub channel_ids: BTreeMap<String, String>,
}

impl SourceConfig {
    /// Builds the URL scheme described by this section
    pub fn url_scheme(&self) -> UrlResult<UrlScheme> {
        match self.scheme {
            SchemeKind::Section => UrlScheme::section(&self.base_url),
            SchemeKind::Aggregate => UrlScheme::aggregate(&self.base_url),
            SchemeKind::Channels => UrlScheme::channels(&self.base_url, self.resolved_ids()?),
        }
    }

    /// Channel ids keyed by channel
    pub fn resolved_ids(&self) -> UrlResult<BTreeMap<Channel, String>> {
        self.channel_ids
            .iter()
            .map(|(code, id)| {
                Channel::from_code(code)
                    .map(|channel| (channel, id.clone()))
                    .ok_or_else(|| UrlError::UnknownChannel(code.clone()))
            })
            .collect()
    }
}

/// Which channels are walked and how deep
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CollectorConfig {
    /// Channels in walk order
    pub channels: Vec<Channel>,

    /// Listing pages per channel in incremental mode
    pub incremental_pages: u32,

    /// Listing pages per channel in full mode
    pub full_pages: u32,
}

impl CollectorConfig {
    pub fn page_budget(&self, mode: CollectMode) -> u32 {
        match mode {
            CollectMode::Incremental => self.incremental_pages,
            CollectMode::Full => self.full_pages,
        }
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            channels: Channel::ALL.to_vec(),
            incremental_pages: 10,
            full_pages: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Json,
    Sqlite,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    /// Directory of the JSON documents
    pub data_dir: PathBuf,

    /// Path to the SQLite database file
    pub database_path: PathBuf,

    /// Re-fetch stored JSON documents whose title names the current year
    pub recheck_current_year: bool,

    /// Channels never re-checked by the JSON store
    pub frozen_channels: Vec<Channel>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Json,
            data_dir: PathBuf::from("data"),
            database_path: PathBuf::from("nppa.db"),
            recheck_current_year: true,
            frozen_channels: vec![Channel::MadeInChinaOnlineGame],
        }
    }
}

/// Notification of newly reported bulletins
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct NotificationConfig {
    pub enabled: bool,
    pub subject: String,

    /// Markdown report written alongside the notification
    pub report_path: Option<PathBuf>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            subject: "「ISBN」审批信息".to_string(),
            report_path: None,
        }
    }
}
