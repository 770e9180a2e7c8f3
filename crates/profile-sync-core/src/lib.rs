// # profile-sync-core
//
// Core library for syncing directory profiles into CRM contacts.
//
// ## Architecture Overview
//
// This library provides the pieces of a single-shot profile sync:
// - **ProfileSource**: Trait for reading one user profile (e.g. GitHub)
// - **ContactDestination**: Trait for upserting one contact (e.g. Freshdesk)
// - **validate_username**: Local check run before any network call
// - **to_destination_contact**: Pure field mapping between the two records
// - **SyncEngine**: Orchestrates validate → fetch → map → upsert
// - **ClientRegistry**: Plugin-based registry for sources and destinations
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from API clients
// 2. **Plugin-Based**: Clients are registered by name, no hard-coded if-else
// 3. **Library-First**: The binary is a thin wrapper around this crate
// 4. **All-or-Nothing**: Every failure aborts the run and reaches the caller

pub mod traits;
pub mod engine;
pub mod registry;
pub mod config;
pub mod error;
pub mod model;
pub mod mapping;
pub mod validation;

// Re-export core types for convenience
pub use traits::{ContactDestination, ProfileSource, UpsertResult};
pub use engine::{SyncEngine, SyncOutcome};
pub use registry::ClientRegistry;
pub use config::{DestinationConfig, SourceConfig, SyncConfig};
pub use error::{Error, Result};
pub use model::{ContactId, DestinationContact, SourceUser};
pub use mapping::to_destination_contact;
pub use validation::validate_username;
