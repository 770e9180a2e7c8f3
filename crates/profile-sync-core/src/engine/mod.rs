//! Profile sync engine
//!
//! The SyncEngine is responsible for:
//! - Validating the username before any I/O
//! - Fetching the profile via ProfileSource
//! - Mapping the profile to a destination contact
//! - Upserting the contact via ContactDestination
//!
//! ## Architecture
//!
//! ```text
//! username ──▶ validate ──▶ ProfileSource ──▶ map ──▶ ContactDestination
//!                               (fetch)                   (upsert)
//! ```
//!
//! ## Run Flow
//!
//! 1. Reject malformed usernames locally
//! 2. Call ProfileSource::fetch_user()
//! 3. Map SourceUser → DestinationContact
//! 4. Call ContactDestination::upsert_contact()
//!
//! Stages run strictly in order. The first failure ends the run and is
//! returned unchanged; nothing is retried or rolled back.

use crate::error::Result;
use crate::mapping::to_destination_contact;
use crate::traits::{ContactDestination, ProfileSource, UpsertResult};
use crate::validation::validate_username;
use tracing::{debug, error, info};

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    /// The username that was processed
    pub username: String,
    /// What the destination did with the contact
    pub result: UpsertResult,
}

/// Core sync engine
///
/// Composes one source and one destination. Holds no state between runs,
/// so one engine can process any number of usernames one after another.
pub struct SyncEngine {
    /// Source of user profiles
    source: Box<dyn ProfileSource>,

    /// Destination for contacts
    destination: Box<dyn ContactDestination>,
}

impl SyncEngine {
    /// Create a new sync engine
    pub fn new(source: Box<dyn ProfileSource>, destination: Box<dyn ContactDestination>) -> Self {
        Self {
            source,
            destination,
        }
    }

    /// Sync one user from the source into the destination
    ///
    /// # Returns
    ///
    /// - `Ok(SyncOutcome)`: The contact was created, updated, or (dry-run) checked
    /// - `Err(Error::InvalidIdentifier)`: Username rejected; no request was made
    /// - `Err(Error)`: Whatever the source or destination returned
    pub async fn run(&self, username: &str) -> Result<SyncOutcome> {
        let username = validate_username(Some(username))?;

        info!(
            "Syncing user {} from {} to {}",
            username,
            self.source.source_name(),
            self.destination.destination_name()
        );

        let user = self.source.fetch_user(username).await.inspect_err(|e| {
            error!("Failed to fetch user {} from {}: {}", username, self.source.source_name(), e);
        })?;
        debug!("Fetched profile for {}", username);

        let contact = to_destination_contact(&user);

        let result = self
            .destination
            .upsert_contact(&contact)
            .await
            .inspect_err(|e| {
                error!(
                    "Failed to upsert contact for {} into {}: {}",
                    username,
                    self.destination.destination_name(),
                    e
                );
            })?;

        match result {
            UpsertResult::Created => info!("Created contact for {}", username),
            UpsertResult::Updated { id } => info!("Updated contact {} for {}", id, username),
            UpsertResult::DryRun { existing } => {
                info!("Dry run for {} finished (existing contact: {:?})", username, existing)
            }
        }

        Ok(SyncOutcome {
            username: username.to_string(),
            result,
        })
    }
}
