//! Test doubles and common utilities for engine contract tests
//!
//! This module provides minimal test doubles that record how the engine
//! drives its source and destination.

#![allow(dead_code)]

use profile_sync_core::error::{Error, Result};
use profile_sync_core::model::{ContactId, DestinationContact, SourceUser};
use profile_sync_core::traits::{ContactDestination, ProfileSource, UpsertResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Shared, ordered log of calls across source and destination
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn new_call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// A ProfileSource that returns a canned result and tracks calls
pub struct MockSource {
    /// Result handed back from fetch_user()
    response: Mutex<Option<Result<SourceUser>>>,
    /// Call counter for fetch_user()
    fetch_call_count: Arc<AtomicUsize>,
    /// Usernames passed to fetch_user()
    requested: Arc<Mutex<Vec<String>>>,
    /// Shared call log
    log: CallLog,
}

impl MockSource {
    pub fn returning(user: SourceUser, log: CallLog) -> Self {
        Self::with_result(Ok(user), log)
    }

    pub fn failing(error: Error, log: CallLog) -> Self {
        Self::with_result(Err(error), log)
    }

    fn with_result(response: Result<SourceUser>, log: CallLog) -> Self {
        Self {
            response: Mutex::new(Some(response)),
            fetch_call_count: Arc::new(AtomicUsize::new(0)),
            requested: Arc::new(Mutex::new(Vec::new())),
            log,
        }
    }

    /// Handle for reading the call count after the source moved into the engine
    pub fn fetch_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.fetch_call_count)
    }

    /// Handle for reading requested usernames after the source moved into the engine
    pub fn requested_usernames(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.requested)
    }
}

#[async_trait::async_trait]
impl ProfileSource for MockSource {
    async fn fetch_user(&self, username: &str) -> Result<SourceUser> {
        self.fetch_call_count.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(username.to_string());
        self.log.lock().unwrap().push(format!("fetch:{}", username));

        self.response
            .lock()
            .unwrap()
            .take()
            .expect("fetch_user() called more than once")
    }

    fn source_name(&self) -> &'static str {
        "mock-source"
    }
}

/// A ContactDestination that enforces the lookup-key precondition and tracks calls
pub struct MockDestination {
    /// Result handed back for contacts that pass the precondition
    response: Mutex<Option<Result<UpsertResult>>>,
    /// Call counter for upsert_contact()
    upsert_call_count: Arc<AtomicUsize>,
    /// Contacts passed to upsert_contact()
    received: Arc<Mutex<Vec<DestinationContact>>>,
    /// Shared call log
    log: CallLog,
}

impl MockDestination {
    pub fn returning(result: UpsertResult, log: CallLog) -> Self {
        Self::with_result(Ok(result), log)
    }

    pub fn failing(error: Error, log: CallLog) -> Self {
        Self::with_result(Err(error), log)
    }

    fn with_result(response: Result<UpsertResult>, log: CallLog) -> Self {
        Self {
            response: Mutex::new(Some(response)),
            upsert_call_count: Arc::new(AtomicUsize::new(0)),
            received: Arc::new(Mutex::new(Vec::new())),
            log,
        }
    }

    pub fn upsert_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.upsert_call_count)
    }

    pub fn received_contacts(&self) -> Arc<Mutex<Vec<DestinationContact>>> {
        Arc::clone(&self.received)
    }
}

#[async_trait::async_trait]
impl ContactDestination for MockDestination {
    async fn upsert_contact(&self, contact: &DestinationContact) -> Result<UpsertResult> {
        self.upsert_call_count.fetch_add(1, Ordering::SeqCst);
        self.received.lock().unwrap().push(contact.clone());
        self.log.lock().unwrap().push("upsert".to_string());

        if !contact.has_lookup_key() {
            return Err(Error::invalid_contact("neither email nor twitter id"));
        }

        self.response
            .lock()
            .unwrap()
            .take()
            .expect("upsert_contact() called more than once")
    }

    fn destination_name(&self) -> &'static str {
        "mock-destination"
    }
}

/// A complete profile used by most tests
pub fn full_user() -> SourceUser {
    SourceUser {
        name: Some("Some Name".to_string()),
        email: Some("some@email.com".to_string()),
        location: Some("some location".to_string()),
        handle: Some("twitter username".to_string()),
    }
}

pub fn existing_id() -> ContactId {
    ContactId(2)
}
