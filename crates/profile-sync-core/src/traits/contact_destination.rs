// # Contact Destination Trait
//
// Defines the interface for creating or updating contacts in a CRM.
//
// ## Implementations
//
// - Freshdesk: `profile-sync-freshdesk` crate
//
// ## Usage
//
// ```rust,ignore
// use profile_sync_core::ContactDestination;
//
// let destination = /* ContactDestination implementation */;
// let result = destination.upsert_contact(&contact).await?;
// ```

use async_trait::async_trait;

use crate::model::{ContactId, DestinationContact};

/// Result of an upsert operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertResult {
    /// No contact matched the lookup key, a new one was created
    Created,
    /// An existing contact was replaced with the submitted fields
    Updated {
        /// Id of the contact found by the lookup
        id: ContactId,
    },
    /// Lookup ran but the write was skipped (dry-run mode)
    DryRun {
        /// Contact that would have been updated, `None` means a create
        existing: Option<ContactId>,
    },
}

/// Trait for contact destination implementations
///
/// # Upsert Protocol
///
/// 1. Reject contacts without email and alternate handle, before any I/O
/// 2. Look up existing contacts by (email, alternate handle)
/// 3. Update the first match, or create a new contact when nothing matched
///
/// Each step completes before the next one starts. A failure at any step
/// aborts the remaining steps. Destinations never retry.
///
/// # Idempotency
///
/// Calling this twice with the same contact finds the record created by the
/// first call and updates it again. Safe, but not free of side effects.
#[async_trait]
pub trait ContactDestination: Send + Sync {
    /// Create or update `contact`
    ///
    /// # Returns
    ///
    /// - `Ok(UpsertResult)`: What the destination did
    /// - `Err(Error::InvalidContact)`: Contact has no lookup key; nothing was sent
    /// - `Err(Error::Transport)`: Any step got a non-2xx response or failed to connect
    /// - `Err(Error::MalformedResponse)`: Lookup response was not a list of contacts
    async fn upsert_contact(
        &self,
        contact: &DestinationContact,
    ) -> Result<UpsertResult, crate::Error>;

    /// Get the destination name (for logging/debugging)
    fn destination_name(&self) -> &'static str;
}

/// Helper trait for constructing contact destinations from configuration
pub trait ContactDestinationFactory: Send + Sync {
    /// Create a ContactDestination instance from configuration
    fn create(
        &self,
        config: &crate::config::DestinationConfig,
    ) -> Result<Box<dyn ContactDestination>, crate::Error>;
}
