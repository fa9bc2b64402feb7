//! Filter configuration, read once at startup.
//!
//! Values come from environment variables. Tests inject their own lookup
//! through [`FilterConfig::from_lookup`] instead of touching the process
//! environment.

use std::{str::FromStr, time::Duration};

use url::Url;

use crate::{
    Error, Result,
    filter::{DEFAULT_ISSUE_CONCURRENCY, Dimension},
    token::SigningKey,
};

pub const DEFAULT_AUDIO_SUFFIXES: [&str; 4] = ["-HM", "-HB", "-HW", "-HS"];
pub const DEFAULT_AUDIO_LABEL: &str = "Audio recording";

/// Localizable strings emitted into generated markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    /// Heading shown above an audio-only player.
    pub audio_recording: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            audio_recording: DEFAULT_AUDIO_LABEL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FilterConfig {
    pub player_width: Dimension,
    pub player_height: Dimension,
    /// Height of the compact audio player; audio players are always full width.
    pub audio_height: Dimension,
    pub audio_suffixes: Vec<String>,
    /// Account the token service signs under. Unset means no link can be rewritten.
    pub account_id: Option<String>,
    pub labels: Labels,
    pub signing_key: SigningKey,
    pub token_endpoint: Option<Url>,
    pub token_ttl: Duration,
    pub token_timeout: Duration,
    /// Token requests kept pending at once within one rewrite pass.
    pub token_concurrency: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            player_width: Dimension::Pixels(640),
            player_height: Dimension::Pixels(360),
            audio_height: Dimension::Pixels(100),
            audio_suffixes: DEFAULT_AUDIO_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            account_id: None,
            labels: Labels::default(),
            signing_key: SigningKey::disabled(),
            token_endpoint: None,
            token_ttl: Duration::from_secs(3600),
            token_timeout: Duration::from_millis(5000),
            token_concurrency: DEFAULT_ISSUE_CONCURRENCY,
        }
    }
}

impl FilterConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // Set but empty disables audio mode; unset falls back to the defaults.
        let audio_suffixes = match lookup("STREAM_AUDIO_SUFFIXES") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            None => defaults.audio_suffixes,
        };

        let account_id = get("STREAM_ACCOUNT_ID");
        if account_id.is_none() {
            tracing::warn!("STREAM_ACCOUNT_ID is not set, watch links will be left unmodified");
        }

        let token_endpoint = get("STREAM_TOKEN_ENDPOINT")
            .map(|raw| {
                Url::parse(&raw)
                    .map_err(|e| Error::invalid_config("STREAM_TOKEN_ENDPOINT", e.to_string()))
            })
            .transpose()?;

        let token_concurrency =
            parse_or(&get, "STREAM_TOKEN_CONCURRENCY", defaults.token_concurrency)?;
        if token_concurrency == 0 {
            return Err(Error::invalid_config("STREAM_TOKEN_CONCURRENCY", "must be at least 1"));
        }

        Ok(Self {
            player_width: parse_or(&get, "STREAM_PLAYER_WIDTH", defaults.player_width)?,
            player_height: parse_or(&get, "STREAM_PLAYER_HEIGHT", defaults.player_height)?,
            audio_height: parse_or(&get, "STREAM_AUDIO_HEIGHT", defaults.audio_height)?,
            audio_suffixes,
            account_id,
            labels: Labels {
                audio_recording: get("STREAM_AUDIO_LABEL")
                    .unwrap_or(defaults.labels.audio_recording),
            },
            signing_key: SigningKey::from_value(get("STREAM_SIGNING_KEY")),
            token_endpoint,
            token_ttl: Duration::from_secs(parse_or(&get, "STREAM_TOKEN_TTL_SECS", 3600u64)?),
            token_timeout: Duration::from_millis(parse_or(
                &get,
                "STREAM_TOKEN_TIMEOUT_MS",
                5000u64,
            )?),
            token_concurrency,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| Error::invalid_config(key, e.to_string())),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = FilterConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.player_width, Dimension::Pixels(640));
        assert_eq!(config.player_height, Dimension::Pixels(360));
        assert_eq!(config.audio_suffixes, vec!["-HM", "-HB", "-HW", "-HS"]);
        assert_eq!(config.account_id, None);
        assert_eq!(config.labels.audio_recording, "Audio recording");
        assert!(!config.signing_key.is_enabled());
        assert!(config.token_endpoint.is_none());
        assert_eq!(config.token_concurrency, 8);
    }

    #[test]
    fn test_overrides() {
        let config = FilterConfig::from_lookup(lookup(&[
            ("STREAM_PLAYER_WIDTH", "100%"),
            ("STREAM_PLAYER_HEIGHT", "480"),
            ("STREAM_AUDIO_SUFFIXES", "-HM, -XA ,"),
            ("STREAM_ACCOUNT_ID", "acct-42"),
            ("STREAM_AUDIO_LABEL", "Enregistrement audio"),
            ("STREAM_SIGNING_KEY", "secret"),
            ("STREAM_TOKEN_ENDPOINT", "https://signer.example/issue"),
            ("STREAM_TOKEN_TIMEOUT_MS", "250"),
            ("STREAM_TOKEN_CONCURRENCY", "3"),
        ]))
        .unwrap();

        assert_eq!(config.player_width, Dimension::Percent(100));
        assert_eq!(config.player_height, Dimension::Pixels(480));
        assert_eq!(config.audio_suffixes, vec!["-HM", "-XA"]);
        assert_eq!(config.account_id.as_deref(), Some("acct-42"));
        assert_eq!(config.labels.audio_recording, "Enregistrement audio");
        assert!(config.signing_key.is_enabled());
        assert_eq!(
            config.token_endpoint.unwrap().as_str(),
            "https://signer.example/issue"
        );
        assert_eq!(config.token_timeout, Duration::from_millis(250));
        assert_eq!(config.token_concurrency, 3);
    }

    #[test]
    fn test_empty_audio_suffixes_disable_audio_mode() {
        let config = FilterConfig::from_lookup(lookup(&[("STREAM_AUDIO_SUFFIXES", "")])).unwrap();
        assert!(config.audio_suffixes.is_empty());

        let config = FilterConfig::from_lookup(lookup(&[("STREAM_AUDIO_SUFFIXES", " , ")])).unwrap();
        assert!(config.audio_suffixes.is_empty());
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        let err = FilterConfig::from_lookup(lookup(&[("STREAM_TOKEN_CONCURRENCY", "0")])).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { ref key, .. } if key == "STREAM_TOKEN_CONCURRENCY"));
    }

    #[test]
    fn test_blank_account_id_is_unset() {
        let config = FilterConfig::from_lookup(lookup(&[("STREAM_ACCOUNT_ID", "  ")])).unwrap();
        assert_eq!(config.account_id, None);
    }

    #[test]
    fn test_invalid_dimension_is_rejected() {
        let err = FilterConfig::from_lookup(lookup(&[("STREAM_PLAYER_HEIGHT", "tall")])).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { ref key, .. } if key == "STREAM_PLAYER_HEIGHT"));
    }

    #[test]
    fn test_invalid_endpoint_is_rejected() {
        let err = FilterConfig::from_lookup(lookup(&[("STREAM_TOKEN_ENDPOINT", "not a url")])).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }
}
