//! Name-uniqueness lookups
//!
//! The lookup itself is a collaborator ([`NameAvailability`]). Two
//! implementations ship here: an HTTP adapter for the roundtrip resource
//! and an in-memory set of taken names.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Failure of a single lookup
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("lookup answered with HTTP status {0}")]
    Status(u16),

    #[error("lookup unavailable: {0}")]
    Unavailable(String),
}

/// One-shot "is this name still free?" lookup
#[async_trait]
pub trait NameAvailability: Send + Sync {
    /// `Ok(true)` when the name is available, `Ok(false)` when taken
    async fn is_available(&self, name: &str) -> Result<bool, QueryError>;
}

/// Terminal state of a uniqueness check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NameCheckOutcome {
    /// Name is free (or empty)
    Available,
    /// Name is already used by another roundtrip
    Duplicate,
    /// Lookup could not be completed; treated as invalid
    TransportError(String),
}

impl NameCheckOutcome {
    /// Value written to the `occupied` validity key
    pub fn is_valid(&self) -> bool {
        matches!(self, NameCheckOutcome::Available)
    }
}

/// Check a candidate name
///
/// Empty or absent names are vacuously valid and never reach the lookup.
pub async fn check_name(query: &dyn NameAvailability, name: Option<&str>) -> NameCheckOutcome {
    let name = match name {
        Some(name) if !name.is_empty() => name,
        _ => return NameCheckOutcome::Available,
    };

    match query.is_available(name).await {
        Ok(true) => NameCheckOutcome::Available,
        Ok(false) => NameCheckOutcome::Duplicate,
        Err(e) => NameCheckOutcome::TransportError(e.to_string()),
    }
}

/// Interpret a response body from the uniqueness resource
///
/// Only the literal `true` means available; surrounding whitespace is
/// ignored.
pub fn body_signals_available(body: &str) -> bool {
    body.trim() == "true"
}

/// Lookup against `GET <endpoint>?name=<candidate>`
pub struct HttpNameQuery {
    client: reqwest::Client,
    endpoint: reqwest::Url,
}

impl HttpNameQuery {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, QueryError> {
        let endpoint = reqwest::Url::parse(endpoint).map_err(|e| QueryError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &reqwest::Url {
        &self.endpoint
    }
}

#[async_trait]
impl NameAvailability for HttpNameQuery {
    async fn is_available(&self, name: &str) -> Result<bool, QueryError> {
        debug!("Looking up name '{}' at {}", name, self.endpoint);

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("name", name)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(QueryError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(body_signals_available(&body))
    }
}

/// In-memory set of names already in use
#[derive(Debug, Default)]
pub struct TakenNames {
    names: RwLock<HashSet<String>>,
}

impl TakenNames {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: RwLock::new(names.into_iter().map(Into::into).collect()),
        }
    }

    /// Mark a name as taken
    pub fn insert(&self, name: impl Into<String>) {
        self.names.write().insert(name.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.read().contains(name)
    }
}

#[async_trait]
impl NameAvailability for TakenNames {
    async fn is_available(&self, name: &str) -> Result<bool, QueryError> {
        Ok(!self.contains(name))
    }
}
