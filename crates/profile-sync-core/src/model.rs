//! Value types passed between sources, the mapper and destinations
//!
//! Both records are built once per run and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A user profile as read from the source directory
///
/// Any field may be absent when the source did not supply it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceUser {
    /// Display name
    pub name: Option<String>,
    /// Public email address
    pub email: Option<String>,
    /// Free-form location
    pub location: Option<String>,
    /// Alternate handle (Twitter username on GitHub)
    pub handle: Option<String>,
}

/// A contact record as submitted to the destination
///
/// The wire keys are fixed here: `alt_handle` travels as `twitter_id`.
/// Absent fields serialize as `null`.
///
/// At least one of `email` or `alt_handle` must be set before the contact
/// is submitted; destinations check this, construction does not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationContact {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    #[serde(rename = "twitter_id")]
    pub alt_handle: Option<String>,
}

impl DestinationContact {
    /// Whether the contact carries a lookup key (email or alternate handle)
    pub fn has_lookup_key(&self) -> bool {
        self.email.is_some() || self.alt_handle.is_some()
    }
}

/// Identifier assigned by the destination system
///
/// Only ever obtained from the destination, never generated locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(pub u64);

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
