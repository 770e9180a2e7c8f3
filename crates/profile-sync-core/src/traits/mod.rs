//! Core traits for the profile sync system
//!
//! This module defines the abstract interfaces that all clients must follow.
//!
//! - [`ProfileSource`]: Read one user profile from a directory service
//! - [`ContactDestination`]: Create or update a contact in a CRM

pub mod profile_source;
pub mod contact_destination;

pub use profile_source::{ProfileSource, ProfileSourceFactory};
pub use contact_destination::{ContactDestination, ContactDestinationFactory, UpsertResult};
