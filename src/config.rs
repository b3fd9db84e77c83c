use std::env;
use std::time::Duration;

use anyhow::{anyhow, Result};

pub const DEFAULT_FEED_URL: &str = "https://servicesq.dps.ohio.gov/AmberAlert/";
pub const DEFAULT_WEBSITE_URL: &str = "https://ohioamberplan.org/";
pub const DEFAULT_LISTEN_SECONDS: u64 = 5;
pub const DEFAULT_RECOGNITION_CONTENT_TYPE: &str = "audio/l16; rate=16000";
pub const DEFAULT_RECORD_COMMAND: &str = "arecord -q -f S16_LE -r 16000 -c 1 -t raw -d {seconds}";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub feed_url: String,
    pub website_url: String,
    pub listen_duration: Duration,
    pub recognition_url: Option<String>,
    pub recognition_content_type: String,
    pub record_command: String,
    pub speech_rate: Option<f32>,
    pub speech_volume: Option<f32>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            website_url: DEFAULT_WEBSITE_URL.to_string(),
            listen_duration: Duration::from_secs(DEFAULT_LISTEN_SECONDS),
            recognition_url: None,
            recognition_content_type: DEFAULT_RECOGNITION_CONTENT_TYPE.to_string(),
            record_command: DEFAULT_RECORD_COMMAND.to_string(),
            speech_rate: None,
            speech_volume: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests don't have to touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let feed_url = get("AMBER_FEED_URL").unwrap_or_else(|| DEFAULT_FEED_URL.to_string());
        validate_url("AMBER_FEED_URL", &feed_url)?;

        let website_url =
            get("AMBER_WEBSITE_URL").unwrap_or_else(|| DEFAULT_WEBSITE_URL.to_string());
        validate_url("AMBER_WEBSITE_URL", &website_url)?;

        let recognition_url = get("SPEECH_RECOGNITION_URL");
        if let Some(url) = &recognition_url {
            validate_url("SPEECH_RECOGNITION_URL", url)?;
        }

        let listen_duration = Duration::from_secs(parse_listen_seconds(get("LISTEN_SECONDS")));

        Ok(Self {
            feed_url,
            website_url,
            listen_duration,
            recognition_url,
            recognition_content_type: get("SPEECH_RECOGNITION_CONTENT_TYPE")
                .unwrap_or_else(|| DEFAULT_RECOGNITION_CONTENT_TYPE.to_string()),
            record_command: get("RECORD_COMMAND")
                .unwrap_or_else(|| DEFAULT_RECORD_COMMAND.to_string()),
            speech_rate: get("SPEECH_RATE").and_then(|raw| raw.parse().ok()),
            speech_volume: get("SPEECH_VOLUME").and_then(|raw| raw.parse().ok()),
        })
    }
}

fn parse_listen_seconds(raw: Option<String>) -> u64 {
    raw.and_then(|value| value.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_LISTEN_SECONDS)
}

fn validate_url(key: &str, url: &str) -> Result<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(anyhow!("{key} must be an http(s) URL, got {url:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn uses_defaults_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.feed_url, DEFAULT_FEED_URL);
        assert_eq!(config.website_url, DEFAULT_WEBSITE_URL);
        assert_eq!(config.listen_duration, Duration::from_secs(5));
        assert!(config.recognition_url.is_none());
        assert_eq!(config.record_command, DEFAULT_RECORD_COMMAND);
    }

    #[test]
    fn reads_overrides_and_trims() {
        let config = config_from(&[
            ("AMBER_FEED_URL", " http://localhost:8080/feed.xml "),
            ("AMBER_WEBSITE_URL", "https://example.org/"),
            ("LISTEN_SECONDS", "8"),
            ("SPEECH_RECOGNITION_URL", "https://speech.example.com/recognize?key=abc"),
            ("SPEECH_RATE", "1.5"),
        ])
        .unwrap();
        assert_eq!(config.feed_url, "http://localhost:8080/feed.xml");
        assert_eq!(config.website_url, "https://example.org/");
        assert_eq!(config.listen_duration, Duration::from_secs(8));
        assert_eq!(
            config.recognition_url.as_deref(),
            Some("https://speech.example.com/recognize?key=abc")
        );
        assert_eq!(config.speech_rate, Some(1.5));
        assert_eq!(config.speech_volume, None);
    }

    #[test]
    fn empty_values_fall_back_to_defaults() {
        let config = config_from(&[("AMBER_FEED_URL", "   "), ("SPEECH_RECOGNITION_URL", "")]).unwrap();
        assert_eq!(config.feed_url, DEFAULT_FEED_URL);
        assert!(config.recognition_url.is_none());
    }

    #[test]
    fn invalid_listen_seconds_use_default() {
        assert_eq!(parse_listen_seconds(Some("abc".to_string())), 5);
        assert_eq!(parse_listen_seconds(Some("0".to_string())), 5);
        assert_eq!(parse_listen_seconds(None), 5);
        assert_eq!(parse_listen_seconds(Some("3".to_string())), 3);
    }

    #[test]
    fn rejects_non_http_urls() {
        let err = config_from(&[("AMBER_FEED_URL", "ftp://feeds.example.com")]).unwrap_err();
        assert!(err.to_string().contains("AMBER_FEED_URL"));

        assert!(config_from(&[("SPEECH_RECOGNITION_URL", "localhost:9000")]).is_err());
    }
}
