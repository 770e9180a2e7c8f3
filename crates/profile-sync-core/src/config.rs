//! Configuration types for the profile sync system
//!
//! This module defines the configuration structures used to build clients.
//! Clients hold only what is configured here and are immutable afterwards.

use serde::{Deserialize, Serialize};

/// Default GitHub REST API base URL
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Default timeout for source requests (seconds)
pub const DEFAULT_SOURCE_TIMEOUT_SECS: u64 = 10;

/// Default timeout for destination requests (seconds)
pub const DEFAULT_DESTINATION_TIMEOUT_SECS: u64 = 30;

/// Main sync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Where profiles are read from
    pub source: SourceConfig,

    /// Where contacts are written to
    pub destination: DestinationConfig,
}

impl SyncConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.source.validate()?;
        self.destination.validate()?;
        Ok(())
    }
}

/// Profile source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceConfig {
    /// GitHub Users API
    Github {
        /// API base URL
        #[serde(default = "default_github_api_url")]
        api_url: String,
        /// Optional token; requests are anonymous without it
        api_token: Option<String>,
        /// Request timeout in seconds
        #[serde(default = "default_source_timeout_secs")]
        timeout_secs: u64,
    },

    /// Custom source
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl SourceConfig {
    /// GitHub source with default URL and timeout
    pub fn github(api_token: Option<String>) -> Self {
        SourceConfig::Github {
            api_url: default_github_api_url(),
            api_token,
            timeout_secs: default_source_timeout_secs(),
        }
    }

    /// Validate the source configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            SourceConfig::Github {
                api_url,
                timeout_secs,
                ..
            } => {
                validate_url("GitHub API URL", api_url)?;
                if *timeout_secs == 0 {
                    return Err(crate::Error::config("GitHub timeout must be > 0"));
                }
                Ok(())
            }
            SourceConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config("Custom source factory cannot be empty"));
                }
                if config.is_null() {
                    return Err(crate::Error::config("Custom source config cannot be null"));
                }
                Ok(())
            }
        }
    }

    /// Get the source type name
    pub fn type_name(&self) -> &str {
        match self {
            SourceConfig::Github { .. } => "github",
            SourceConfig::Custom { factory, .. } => factory,
        }
    }
}

/// Contact destination configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DestinationConfig {
    /// Freshdesk contacts API
    Freshdesk {
        /// Account subdomain, as in `{subdomain}.freshdesk.com`
        subdomain: String,
        /// API key, sent as the basic-auth user name
        api_token: String,
        /// Overrides the URL derived from `subdomain`
        #[serde(default)]
        base_url: Option<String>,
        /// Request timeout in seconds
        #[serde(default = "default_destination_timeout_secs")]
        timeout_secs: u64,
        /// Look up but do not write
        #[serde(default)]
        dry_run: bool,
    },

    /// Custom destination
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl DestinationConfig {
    /// Freshdesk destination with default URL and timeout, live mode
    pub fn freshdesk(subdomain: impl Into<String>, api_token: impl Into<String>) -> Self {
        DestinationConfig::Freshdesk {
            subdomain: subdomain.into(),
            api_token: api_token.into(),
            base_url: None,
            timeout_secs: default_destination_timeout_secs(),
            dry_run: false,
        }
    }

    /// Validate the destination configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            DestinationConfig::Freshdesk {
                subdomain,
                api_token,
                base_url,
                timeout_secs,
                ..
            } => {
                if api_token.is_empty() {
                    return Err(crate::Error::config("Freshdesk API token cannot be empty"));
                }
                match base_url {
                    Some(url) => validate_url("Freshdesk base URL", url)?,
                    None => validate_subdomain(subdomain)?,
                }
                if *timeout_secs == 0 {
                    return Err(crate::Error::config("Freshdesk timeout must be > 0"));
                }
                Ok(())
            }
            DestinationConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom destination factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config(
                        "Custom destination config cannot be null",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the destination type name
    pub fn type_name(&self) -> &str {
        match self {
            DestinationConfig::Freshdesk { .. } => "freshdesk",
            DestinationConfig::Custom { factory, .. } => factory,
        }
    }

    /// Base URL of the Freshdesk account, `None` for other destinations
    ///
    /// `base_url` wins when set; otherwise `https://{subdomain}.freshdesk.com`.
    pub fn freshdesk_base_url(&self) -> Option<String> {
        match self {
            DestinationConfig::Freshdesk {
                base_url: Some(url),
                ..
            } => Some(url.trim_end_matches('/').to_string()),
            DestinationConfig::Freshdesk { subdomain, .. } => {
                Some(format!("https://{}.freshdesk.com", subdomain))
            }
            DestinationConfig::Custom { .. } => None,
        }
    }
}

fn validate_url(what: &str, url: &str) -> Result<(), crate::Error> {
    if url.is_empty() {
        return Err(crate::Error::config(format!("{} cannot be empty", what)));
    }
    if !url.starts_with("https://") && !url.starts_with("http://") {
        return Err(crate::Error::config(format!(
            "{} must use HTTP or HTTPS scheme. Got: {}",
            what, url
        )));
    }
    Ok(())
}

fn validate_subdomain(subdomain: &str) -> Result<(), crate::Error> {
    if subdomain.is_empty() {
        return Err(crate::Error::config("Freshdesk subdomain cannot be empty"));
    }
    if !subdomain.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        || subdomain.starts_with('-')
        || subdomain.ends_with('-')
    {
        return Err(crate::Error::config(format!(
            "Freshdesk subdomain '{}' is invalid. Valid: alphanumeric and inner hyphens only.",
            subdomain
        )));
    }
    Ok(())
}

fn default_github_api_url() -> String {
    DEFAULT_GITHUB_API_URL.to_string()
}

fn default_source_timeout_secs() -> u64 {
    DEFAULT_SOURCE_TIMEOUT_SECS
}

fn default_destination_timeout_secs() -> u64 {
    DEFAULT_DESTINATION_TIMEOUT_SECS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_github_defaults() {
        let config = SourceConfig::github(None);
        assert!(config.validate().is_ok());
        assert_eq!(config.type_name(), "github");

        match config {
            SourceConfig::Github {
                api_url,
                timeout_secs,
                ..
            } => {
                assert_eq!(api_url, "https://api.github.com");
                assert_eq!(timeout_secs, 10);
            }
            _ => panic!("expected github config"),
        }
    }

    #[test]
    fn test_freshdesk_base_url_from_subdomain() {
        let config = DestinationConfig::freshdesk("acme", "token");
        assert!(config.validate().is_ok());
        assert_eq!(
            config.freshdesk_base_url().as_deref(),
            Some("https://acme.freshdesk.com")
        );
    }

    #[test]
    fn test_freshdesk_base_url_override() {
        let config = DestinationConfig::Freshdesk {
            subdomain: String::new(),
            api_token: "token".to_string(),
            base_url: Some("http://127.0.0.1:8080/".to_string()),
            timeout_secs: 5,
            dry_run: false,
        };
        assert!(config.validate().is_ok());
        assert_eq!(
            config.freshdesk_base_url().as_deref(),
            Some("http://127.0.0.1:8080")
        );
    }

    #[test]
    fn test_freshdesk_rejects_bad_input() {
        assert!(DestinationConfig::freshdesk("acme", "").validate().is_err());
        assert!(DestinationConfig::freshdesk("", "token").validate().is_err());
        assert!(DestinationConfig::freshdesk("ac.me", "token").validate().is_err());
        assert!(DestinationConfig::freshdesk("-acme", "token").validate().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = SourceConfig::Github {
            api_url: DEFAULT_GITHUB_API_URL.to_string(),
            api_token: None,
            timeout_secs: 0,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_custom_type_name() {
        let config = DestinationConfig::Custom {
            factory: "hubspot".to_string(),
            config: serde_json::json!({ "portal": 1 }),
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.type_name(), "hubspot");
        assert_eq!(config.freshdesk_base_url(), None);
    }

    #[test]
    fn test_deserialize_tagged() {
        let config: SyncConfig = serde_json::from_value(serde_json::json!({
            "source": { "type": "github", "api_token": null },
            "destination": { "type": "freshdesk", "subdomain": "acme", "api_token": "t" }
        }))
        .unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.source.type_name(), "github");
        assert_eq!(config.destination.type_name(), "freshdesk");
    }
}
