use crate::config::types::{
    CollectorConfig, Config, FetcherConfig, SchemeKind, SourceConfig, UserAgentConfig,
};
use crate::channel::Channel;
use crate::ConfigError;
use url::Url;

/// Longest accepted delay between 502 retries
const MAX_RETRY_DELAY_MS: u64 = 60_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetcher_config(&config.fetcher)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_collector_config(&config.collector)?;
    validate_source_config(&config.source, &config.collector)?;
    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max_attempts must be >= 1, got {}",
            config.max_attempts
        )));
    }

    if config.retry_delay_ms > MAX_RETRY_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "retry_delay_ms must be <= {}ms, got {}ms",
            MAX_RETRY_DELAY_MS, config.retry_delay_ms
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates the identity sent in the `User-Agent` header
///
/// The name must be a single product token; the header as a whole must be a
/// legal header value so the HTTP client can be built.
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    let is_token = |s: &str| !s.is_empty() && !s.contains(|c: char| c.is_whitespace() || c == '/');
    if !is_token(&config.crawler_name) || !is_token(&config.crawler_version) {
        return Err(ConfigError::Validation(format!(
            "crawler name and version must be non-empty tokens, got '{}/{}'",
            config.crawler_name, config.crawler_version
        )));
    }

    let contact = Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    if contact.scheme() != "http" && contact.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "contact_url '{}' must use http or https",
            config.contact_url
        )));
    }

    match config.contact_email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
        _ => {
            return Err(ConfigError::Validation(format!(
                "contact_email '{}' is not an address",
                config.contact_email
            )))
        }
    }

    reqwest::header::HeaderValue::from_str(&config.header_value()).map_err(|_| {
        ConfigError::Validation(format!(
            "user agent '{}' is not a valid header value",
            config.header_value()
        ))
    })?;

    Ok(())
}

/// Validates collector configuration
fn validate_collector_config(config: &CollectorConfig) -> Result<(), ConfigError> {
    if config.channels.is_empty() {
        return Err(ConfigError::Validation(
            "collector.channels cannot be empty".to_string(),
        ));
    }

    if config.incremental_pages < 1 || config.full_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "page budgets must be >= 1, got incremental={} full={}",
            config.incremental_pages, config.full_pages
        )));
    }

    Ok(())
}

/// Validates the source section against the channels it must serve
fn validate_source_config(
    source: &SourceConfig,
    collector: &CollectorConfig,
) -> Result<(), ConfigError> {
    let url = Url::parse(&source.base_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid base_url '{}': {}", source.base_url, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base_url '{}' must use http or https",
            source.base_url
        )));
    }

    if !url.path().ends_with('/') {
        return Err(ConfigError::Validation(format!(
            "base_url '{}' must end with '/'",
            source.base_url
        )));
    }

    if let Some(code) = source
        .channel_ids
        .keys()
        .find(|code| Channel::from_code(code).is_none())
    {
        return Err(ConfigError::UnknownChannel(code.clone()));
    }

    if source.scheme == SchemeKind::Channels {
        if let Some(missing) = collector
            .channels
            .iter()
            .find(|channel| !source.channel_ids.contains_key(channel.code()))
        {
            return Err(ConfigError::Validation(format!(
                "channels scheme has no channel id for {}",
                missing
            )));
        }
    }

    Ok(())
}
