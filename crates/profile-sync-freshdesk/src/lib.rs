// # Freshdesk Contact Destination
//
// This crate provides a Freshdesk contact destination for the profile sync system.
//
// ## Upsert Protocol
//
// 1. Reject contacts that have neither email nor twitter id (no request sent)
// 2. Look up contacts filtered by email and twitter id
// 3. First match → PUT the full contact to it; no match → POST a new contact
//
// Steps run one after another; a failure at any step aborts the rest.
//
// ## Implementation Notes
//
// - ✅ Full error propagation to the caller (every non-2xx is `Error::Transport`)
// - ✅ HTTP timeout configured (30 seconds by default)
// - ✅ Dry-run mode: lookup runs, the write is only logged
// - ✅ Ambiguous lookups (several matches) are logged, first match wins
// - ❌ NO retry logic, NO rate-limit handling beyond surfacing the error
// - ❌ NO special case for soft-deleted contacts: Freshdesk rejects the PUT
//   and the rejection is returned like any other
//
// ## Security Requirements
//
// - API token NEVER appears in logs or Debug output
// - Destination MUST fail fast if the token is empty
//
// ## API Reference
//
// - Freshdesk API v2: https://developers.freshdesk.com/api/
// - Authentication: basic auth with the API key as user and "X" as password
// - List contacts: GET `/api/v2/contacts?email=...&twitter_id=...`
// - Create contact: POST `/api/v2/contacts`
// - Update contact: PUT `/api/v2/contacts/:id`

use async_trait::async_trait;
use profile_sync_core::config::DestinationConfig;
use profile_sync_core::traits::{ContactDestination, ContactDestinationFactory, UpsertResult};
use profile_sync_core::{ClientRegistry, ContactId, DestinationContact, Error, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Contacts collection path
const CONTACTS_ENDPOINT: &str = "/api/v2/contacts";

/// Freshdesk ignores the password half of the basic-auth pair
const BASIC_AUTH_PASSWORD: &str = "X";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// System name used in errors and logs
const SYSTEM: &str = "freshdesk";

/// The part of a listed contact the lookup needs
#[derive(Debug, Deserialize)]
struct ContactSummary {
    id: u64,
}

/// Freshdesk contact destination
///
/// Stateless and single-shot: each upsert issues at most one lookup and one
/// write, and nothing is remembered between calls.
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the destination will:
/// - Perform the lookup GET request
/// - Log the intended POST or PUT payload
/// - **NOT** create or modify any contact
pub struct FreshdeskDestination {
    /// Account base URL without trailing slash
    base_url: String,

    /// Freshdesk API key
    /// ⚠️ NEVER log this value
    api_token: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, perform the lookup but skip writes
    dry_run: bool,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for FreshdeskDestination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FreshdeskDestination")
            .field("base_url", &self.base_url)
            .field("api_token", &"<REDACTED>")
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl FreshdeskDestination {
    /// Create a new Freshdesk destination
    ///
    /// # Parameters
    ///
    /// - `base_url`: Account URL, e.g. `https://acme.freshdesk.com`
    /// - `api_token`: Freshdesk API key
    /// - `timeout`: Per-request timeout
    /// - `dry_run`: If true, look up but skip writes
    ///
    /// # Errors
    ///
    /// `Error::Config` if the token is empty or the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        api_token: impl Into<String>,
        timeout: Duration,
        dry_run: bool,
    ) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.is_empty() {
            return Err(Error::config("Freshdesk API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        tracing::debug!("Initializing Freshdesk destination for {}", base_url);

        Ok(Self {
            base_url,
            api_token,
            client,
            dry_run,
        })
    }

    /// Create a live destination for `https://{subdomain}.freshdesk.com`
    pub fn for_subdomain(subdomain: &str, api_token: impl Into<String>) -> Result<Self> {
        let config = DestinationConfig::freshdesk(subdomain, api_token);
        config.validate()?;
        let base_url = config
            .freshdesk_base_url()
            .ok_or_else(|| Error::config("Freshdesk base URL unavailable"))?;

        match config {
            DestinationConfig::Freshdesk { api_token, .. } => {
                Self::new(base_url, api_token, DEFAULT_HTTP_TIMEOUT, false)
            }
            _ => Err(Error::config("Invalid config for Freshdesk destination")),
        }
    }

    /// Whether writes are skipped
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn contacts_url(&self) -> String {
        format!("{}{}", self.base_url, CONTACTS_ENDPOINT)
    }

    fn contact_url(&self, id: ContactId) -> String {
        format!("{}{}/{}", self.base_url, CONTACTS_ENDPOINT, id)
    }

    /// Start a request carrying the credentials and JSON content type
    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .basic_auth(&self.api_token, Some(BASIC_AUTH_PASSWORD))
            .header(CONTENT_TYPE, "application/json")
    }

    /// Send a request and return the body of a 2xx response
    ///
    /// Anything else, including timeouts, becomes `Error::Transport`.
    async fn send(&self, request: RequestBuilder, action: &str) -> Result<String> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::connection(SYSTEM, format!("{} timed out: {}", action, e))
            } else {
                Error::connection(SYSTEM, format!("{} HTTP request failed: {}", action, e))
            }
        })?;

        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            tracing::error!("{} failed with status {}", action, status);
            return Err(Error::rejected(SYSTEM, status.as_u16(), action, &body));
        }

        response.text().await.map_err(|e| {
            Error::connection(SYSTEM, format!("{} response could not be read: {}", action, e))
        })
    }

    /// Find the id of the contact matching the contact's email and twitter id
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /api/v2/contacts?email=...&twitter_id=...
    /// Authorization: Basic <token:X>
    /// ```
    ///
    /// Absent keys are left out of the query. When several contacts match,
    /// the first one is used and the ambiguity is logged.
    async fn find_contact_id(&self, contact: &DestinationContact) -> Result<Option<ContactId>> {
        tracing::debug!(
            "Looking up contact by email {:?} and twitter id {:?}",
            contact.email,
            contact.alt_handle
        );

        let mut query: Vec<(&str, &str)> = Vec::with_capacity(2);
        if let Some(ref email) = contact.email {
            query.push(("email", email));
        }
        if let Some(ref twitter_id) = contact.alt_handle {
            query.push(("twitter_id", twitter_id));
        }

        let request = self.request(Method::GET, &self.contacts_url()).query(&query);
        let body = self.send(request, "Contact lookup").await?;

        let json: Value = serde_json::from_str(&body)
            .map_err(|e| Error::malformed(SYSTEM, format!("Failed to parse response: {}", e)))?;

        if !json.is_array() {
            return Err(Error::malformed(
                SYSTEM,
                "Invalid response format: contact list is not an array",
            ));
        }

        let matches: Vec<ContactSummary> = serde_json::from_value(json)
            .map_err(|e| Error::malformed(SYSTEM, format!("Invalid contact in list: {}", e)))?;

        let Some(first) = matches.first() else {
            tracing::debug!("No existing contact matched");
            return Ok(None);
        };

        if matches.len() > 1 {
            let ids: Vec<u64> = matches.iter().map(|c| c.id).collect();
            tracing::warn!(
                "Lookup by email {:?} and twitter id {:?} is ambiguous, {} contacts matched {:?}; using {}",
                contact.email,
                contact.alt_handle,
                matches.len(),
                ids,
                first.id
            );
        }

        tracing::debug!("Found contact with id {}", first.id);
        Ok(Some(ContactId(first.id)))
    }

    /// Create a new contact
    ///
    /// # API Call
    ///
    /// ```http
    /// POST /api/v2/contacts
    /// { "name": ..., "email": ..., "address": ..., "twitter_id": ... }
    /// ```
    async fn create_contact(&self, contact: &DestinationContact) -> Result<()> {
        tracing::debug!("Attempting to create contact");

        let request = self.request(Method::POST, &self.contacts_url()).json(contact);
        self.send(request, "Contact creation").await?;

        tracing::debug!("Contact was successfully created");
        Ok(())
    }

    /// Replace an existing contact's fields
    ///
    /// Freshdesk rejects updates to soft-deleted contacts; that rejection is
    /// returned like any other non-2xx response.
    ///
    /// # API Call
    ///
    /// ```http
    /// PUT /api/v2/contacts/:id
    /// { "name": ..., "email": ..., "address": ..., "twitter_id": ... }
    /// ```
    async fn update_contact(&self, contact: &DestinationContact, id: ContactId) -> Result<()> {
        tracing::debug!("Attempting to update contact with id {}", id);

        let request = self.request(Method::PUT, &self.contact_url(id)).json(contact);
        self.send(request, &format!("Contact update for id {}", id)).await?;

        tracing::debug!("Successfully updated contact with id {}", id);
        Ok(())
    }
}

#[async_trait]
impl ContactDestination for FreshdeskDestination {
    /// Create or update a contact keyed by email and twitter id
    ///
    /// Issues one lookup and, unless in dry-run mode, one write.
    async fn upsert_contact(&self, contact: &DestinationContact) -> Result<UpsertResult> {
        if !contact.has_lookup_key() {
            return Err(Error::invalid_contact(
                "The contact has neither email nor twitter id. \
                 It is mandatory to have at least one of them.",
            ));
        }

        tracing::info!(
            "Upserting Freshdesk contact [mode: {}]",
            if self.dry_run { "DRY-RUN" } else { "LIVE" }
        );

        let existing = self.find_contact_id(contact).await?;

        if self.dry_run {
            let (method, url) = match existing {
                Some(id) => ("PUT", self.contact_url(id)),
                None => ("POST", self.contacts_url()),
            };
            tracing::info!(
                "[DRY-RUN] Would send {} request to {} with payload: {}",
                method,
                url,
                serde_json::to_string(contact)?
            );
            return Ok(UpsertResult::DryRun { existing });
        }

        let result = match existing {
            Some(id) => {
                tracing::info!("Existing contact {} was found, updating it", id);
                self.update_contact(contact, id).await?;
                UpsertResult::Updated { id }
            }
            None => {
                tracing::info!("No matching contact was found, creating a new one");
                self.create_contact(contact).await?;
                UpsertResult::Created
            }
        };

        tracing::info!("Contact was successfully created or updated");
        Ok(result)
    }

    fn destination_name(&self) -> &'static str {
        SYSTEM
    }
}

/// Factory for creating Freshdesk destinations
pub struct FreshdeskFactory;

impl ContactDestinationFactory for FreshdeskFactory {
    fn create(&self, config: &DestinationConfig) -> Result<Box<dyn ContactDestination>> {
        match config {
            DestinationConfig::Freshdesk {
                api_token,
                timeout_secs,
                dry_run,
                ..
            } => {
                config.validate()?;

                let base_url = config
                    .freshdesk_base_url()
                    .ok_or_else(|| Error::config("Freshdesk base URL unavailable"))?;

                if *dry_run {
                    tracing::warn!("Freshdesk destination running in DRY-RUN mode - no contacts will be written");
                }

                Ok(Box::new(FreshdeskDestination::new(
                    base_url,
                    api_token.clone(),
                    Duration::from_secs(*timeout_secs),
                    *dry_run,
                )?))
            }
            _ => Err(Error::config("Invalid config for Freshdesk destination")),
        }
    }
}

/// Register the Freshdesk destination with a registry
pub fn register(registry: &ClientRegistry) {
    registry.register_destination("freshdesk", Box::new(FreshdeskFactory));
}
