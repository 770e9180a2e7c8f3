//! Plugin-based client registry
//!
//! The registry allows profile sources and contact destinations to be
//! registered by name at startup, so the binary builds clients from
//! configuration instead of hard-coding them.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use profile_sync_core::ClientRegistry;
//!
//! let registry = ClientRegistry::new();
//! profile_sync_github::register(&registry);
//! profile_sync_freshdesk::register(&registry);
//!
//! let source = registry.create_source(&config.source)?;
//! let destination = registry.create_destination(&config.destination)?;
//! ```

use crate::config::{DestinationConfig, SourceConfig};
use crate::error::{Error, Result};
use crate::traits::{ContactDestination, ContactDestinationFactory, ProfileSource, ProfileSourceFactory};
use std::collections::HashMap;
use std::sync::RwLock;

/// Registry of source and destination factories keyed by type name
///
/// Uses interior mutability with RwLock, so registration works through a
/// shared reference.
#[derive(Default)]
pub struct ClientRegistry {
    /// Registered profile source factories
    sources: RwLock<HashMap<String, Box<dyn ProfileSourceFactory>>>,

    /// Registered contact destination factories
    destinations: RwLock<HashMap<String, Box<dyn ContactDestinationFactory>>>,
}

impl ClientRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a profile source factory
    ///
    /// # Parameters
    ///
    /// - `name`: Source type name (e.g., "github")
    /// - `factory`: Factory object for creating source instances
    pub fn register_source(&self, name: impl Into<String>, factory: Box<dyn ProfileSourceFactory>) {
        let mut sources = self.sources.write().unwrap_or_else(|e| e.into_inner());
        sources.insert(name.into(), factory);
    }

    /// Register a contact destination factory
    ///
    /// # Parameters
    ///
    /// - `name`: Destination type name (e.g., "freshdesk")
    /// - `factory`: Factory object for creating destination instances
    pub fn register_destination(
        &self,
        name: impl Into<String>,
        factory: Box<dyn ContactDestinationFactory>,
    ) {
        let mut destinations = self.destinations.write().unwrap_or_else(|e| e.into_inner());
        destinations.insert(name.into(), factory);
    }

    /// Create a profile source from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn ProfileSource>)`: Created source instance
    /// - `Err(Error)`: If the source type is not registered or creation fails
    pub fn create_source(&self, config: &SourceConfig) -> Result<Box<dyn ProfileSource>> {
        let source_type = config.type_name();
        let sources = self.sources.read().unwrap_or_else(|e| e.into_inner());

        let factory = sources
            .get(source_type)
            .ok_or_else(|| Error::config(format!("Unknown source type: {}", source_type)))?;

        factory.create(config)
    }

    /// Create a contact destination from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn ContactDestination>)`: Created destination instance
    /// - `Err(Error)`: If the destination type is not registered or creation fails
    pub fn create_destination(
        &self,
        config: &DestinationConfig,
    ) -> Result<Box<dyn ContactDestination>> {
        let destination_type = config.type_name();
        let destinations = self.destinations.read().unwrap_or_else(|e| e.into_inner());

        let factory = destinations.get(destination_type).ok_or_else(|| {
            Error::config(format!("Unknown destination type: {}", destination_type))
        })?;

        factory.create(config)
    }

    /// List all registered source types
    pub fn list_sources(&self) -> Vec<String> {
        let sources = self.sources.read().unwrap_or_else(|e| e.into_inner());
        sources.keys().cloned().collect()
    }

    /// List all registered destination types
    pub fn list_destinations(&self) -> Vec<String> {
        let destinations = self.destinations.read().unwrap_or_else(|e| e.into_inner());
        destinations.keys().cloned().collect()
    }

    /// Check if a source type is registered
    pub fn has_source(&self, name: &str) -> bool {
        let sources = self.sources.read().unwrap_or_else(|e| e.into_inner());
        sources.contains_key(name)
    }

    /// Check if a destination type is registered
    pub fn has_destination(&self, name: &str) -> bool {
        let destinations = self.destinations.read().unwrap_or_else(|e| e.into_inner());
        destinations.contains_key(name)
    }
}
