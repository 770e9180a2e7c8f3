// # Profile Source Trait
//
// Defines the interface for reading user profiles from a directory service.
//
// ## Implementations
//
// - GitHub: `profile-sync-github` crate
//
// ## Usage
//
// ```rust,ignore
// use profile_sync_core::ProfileSource;
//
// let source = /* ProfileSource implementation */;
// let user = source.fetch_user("octocat").await?;
// ```

use async_trait::async_trait;

use crate::model::SourceUser;

/// Trait for profile source implementations
///
/// Sources are read-only and single-shot: one request per call, no retries,
/// no caching. Failures are returned to the caller as-is.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Fetch the public profile of `username`
    ///
    /// The username has already been validated by the caller.
    ///
    /// # Returns
    ///
    /// - `Ok(SourceUser)`: The normalized profile; any field may be absent
    /// - `Err(Error::Transport)`: Non-2xx status, timeout or connection failure
    /// - `Err(Error::MalformedResponse)`: Body is not a profile object
    async fn fetch_user(&self, username: &str) -> Result<SourceUser, crate::Error>;

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}

/// Helper trait for constructing profile sources from configuration
pub trait ProfileSourceFactory: Send + Sync {
    /// Create a ProfileSource instance from configuration
    fn create(
        &self,
        config: &crate::config::SourceConfig,
    ) -> Result<Box<dyn ProfileSource>, crate::Error>;
}
