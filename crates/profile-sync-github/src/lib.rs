// # GitHub Profile Source
//
// This crate provides a GitHub user profile source for the profile sync system.
//
// ## Behavior
//
// - One GET request per fetch, no retries, no caching
// - Bounded request timeout (10 seconds by default)
// - Optional token; without one the request is anonymous, which the
//   Users API allows for public profiles
// - Non-2xx responses surface as `Error::Transport` with status and body
// - A body that is not a JSON object surfaces as `Error::MalformedResponse`
// - Missing or null profile keys become absent fields
//
// ## Security Requirements
//
// - API token NEVER appears in logs or Debug output
//
// ## API Reference
//
// - Users API: https://docs.github.com/en/rest/users/users
// - Get a user: GET `/users/{username}`

use async_trait::async_trait;
use profile_sync_core::config::SourceConfig;
use profile_sync_core::traits::{ProfileSource, ProfileSourceFactory};
use profile_sync_core::{ClientRegistry, Error, Result, SourceUser};
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Media type pinning the v3 REST API
const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// GitHub rejects requests without a User-Agent
const CLIENT_USER_AGENT: &str = concat!("profile-sync/", env!("CARGO_PKG_VERSION"));

/// System name used in errors and logs
const SYSTEM: &str = "github";

/// Subset of the Users API response we care about
///
/// Every other key in the response is ignored.
#[derive(Debug, Deserialize)]
struct GitHubProfile {
    name: Option<String>,
    email: Option<String>,
    location: Option<String>,
    twitter_username: Option<String>,
}

impl From<GitHubProfile> for SourceUser {
    fn from(profile: GitHubProfile) -> Self {
        SourceUser {
            name: profile.name,
            email: profile.email,
            location: profile.location,
            handle: profile.twitter_username,
        }
    }
}

/// GitHub profile source
///
/// Stateless and single-shot. Holds only its base URL, optional token and
/// HTTP client; immutable after construction.
pub struct GitHubSource {
    /// API base URL without trailing slash
    api_url: String,

    /// Personal access token
    /// ⚠️ NEVER log this value
    api_token: Option<String>,

    /// Request timeout, kept for error messages
    timeout: Duration,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for GitHubSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubSource")
            .field("api_url", &self.api_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "<REDACTED>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GitHubSource {
    /// Create a new GitHub source
    ///
    /// # Parameters
    ///
    /// - `api_url`: API base URL (e.g. `https://api.github.com`)
    /// - `api_token`: Optional token; empty strings count as absent
    /// - `timeout`: Per-request timeout
    pub fn new(
        api_url: impl Into<String>,
        api_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_token: api_token.filter(|t| !t.is_empty()),
            timeout,
            client,
        })
    }

    /// Whether requests carry an Authorization header
    pub fn is_authenticated(&self) -> bool {
        self.api_token.is_some()
    }

    fn user_url(&self, username: &str) -> String {
        format!("{}/users/{}", self.api_url, username)
    }

    fn parse_profile(body: &str) -> Result<SourceUser> {
        let json: Value = serde_json::from_str(body)
            .map_err(|e| Error::malformed(SYSTEM, format!("Failed to parse response: {}", e)))?;

        if !json.is_object() {
            return Err(Error::malformed(
                SYSTEM,
                "Invalid response format: user profile is not an object",
            ));
        }

        let profile: GitHubProfile = serde_json::from_value(json)
            .map_err(|e| Error::malformed(SYSTEM, format!("Invalid user profile: {}", e)))?;

        Ok(profile.into())
    }
}

#[async_trait]
impl ProfileSource for GitHubSource {
    /// Fetch a user's public profile
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /users/:username
    /// Accept: application/vnd.github.v3+json
    /// Authorization: token <token>   (only when configured)
    /// ```
    async fn fetch_user(&self, username: &str) -> Result<SourceUser> {
        tracing::info!("Retrieving GitHub profile for {}", username);

        let mut request = self
            .client
            .get(self.user_url(username))
            .header(ACCEPT, GITHUB_ACCEPT)
            .header(USER_AGENT, CLIENT_USER_AGENT);

        if let Some(ref token) = self.api_token {
            request = request.header(AUTHORIZATION, format!("token {}", token));
        } else {
            tracing::debug!("No GitHub token configured, fetching anonymously");
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::connection(
                    SYSTEM,
                    format!("Profile fetch for {} timed out after {:?}", username, self.timeout),
                )
            } else {
                Error::connection(SYSTEM, format!("HTTP request failed: {}", e))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::connection(SYSTEM, format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            tracing::error!("GitHub returned {} for user {}", status, username);
            return Err(Error::rejected(
                SYSTEM,
                status.as_u16(),
                &format!("Profile fetch for {}", username),
                &body,
            ));
        }

        let user = Self::parse_profile(&body)?;
        tracing::debug!("Retrieved GitHub profile for {}", username);
        Ok(user)
    }

    fn source_name(&self) -> &'static str {
        SYSTEM
    }
}

/// Factory for creating GitHub sources
pub struct GitHubFactory;

impl ProfileSourceFactory for GitHubFactory {
    fn create(&self, config: &SourceConfig) -> Result<Box<dyn ProfileSource>> {
        match config {
            SourceConfig::Github {
                api_url,
                api_token,
                timeout_secs,
            } => {
                config.validate()?;

                if api_token.as_deref().is_none_or(str::is_empty) {
                    tracing::warn!("No GitHub token configured; anonymous requests are heavily rate limited");
                }

                Ok(Box::new(GitHubSource::new(
                    api_url.clone(),
                    api_token.clone(),
                    Duration::from_secs(*timeout_secs),
                )?))
            }
            _ => Err(Error::config("Invalid config for GitHub source")),
        }
    }
}

/// Register the GitHub source with a registry
pub fn register(registry: &ClientRegistry) {
    registry.register_source("github", Box::new(GitHubFactory));
}
