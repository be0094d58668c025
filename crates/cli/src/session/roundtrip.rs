//! Roundtrips and the repository collaborator

use anyhow::Result;
use async_trait::async_trait;
use namecheck::TakenNames;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roundtrip {
    pub id: u64,
    pub name: String,
}

/// Where roundtrips come from and where new ones go
#[async_trait]
pub trait RoundtripRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Roundtrip>>;

    async fn create(&self, name: &str) -> Result<Roundtrip>;
}

/// Repository held in memory for the lifetime of a session
///
/// Every stored name is registered in the shared [`TakenNames`] set, so the
/// uniqueness lookup sees roundtrips created during the session.
pub struct MemoryRoundtrips {
    roundtrips: RwLock<Vec<Roundtrip>>,
    next_id: AtomicU64,
    names: Arc<TakenNames>,
}

impl MemoryRoundtrips {
    pub fn new(names: Arc<TakenNames>) -> Self {
        Self {
            roundtrips: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            names,
        }
    }

    /// Seed with existing roundtrips, numbered from 1
    pub fn with_roundtrips<I, S>(names: Arc<TakenNames>, existing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let repo = Self::new(names);
        for name in existing {
            repo.store(name.into());
        }
        repo
    }

    pub fn names(&self) -> Arc<TakenNames> {
        Arc::clone(&self.names)
    }

    fn store(&self, name: String) -> Roundtrip {
        let roundtrip = Roundtrip {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            name,
        };
        self.names.insert(roundtrip.name.clone());
        self.roundtrips.write().push(roundtrip.clone());
        roundtrip
    }
}

#[async_trait]
impl RoundtripRepository for MemoryRoundtrips {
    async fn list(&self) -> Result<Vec<Roundtrip>> {
        Ok(self.roundtrips.read().clone())
    }

    async fn create(&self, name: &str) -> Result<Roundtrip> {
        if self.names.contains(name) {
            anyhow::bail!("Roundtrip name '{}' is already taken", name);
        }
        Ok(self.store(name.to_string()))
    }
}
