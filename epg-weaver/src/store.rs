//! Persistent program-guide store.
//!
//! The store is one JSON document holding every known event per service,
//! merged across repeated capture runs. Loading migrates documents with
//! the pre-version-2 layout; saving goes through a temporary file and an
//! atomic rename so readers never observe a half-written store.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use eit_codec::{EitBuckets, Event};

/// Current store schema version.
pub const STORE_VERSION: u32 = 2;

/// Errors raised while loading or persisting the store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed store document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Pre-version-2 document layout: `service → table → event`, without the
/// `version`/`services` wrapper.
pub type LegacyStore = BTreeMap<u16, BTreeMap<u8, BTreeMap<u16, Event>>>;

/// The persisted program guide: events per service, schema-versioned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    pub version: u32,
    pub services: BTreeMap<u16, BTreeMap<u16, Event>>,
}

impl Default for Store {
    fn default() -> Self {
        Store {
            version: STORE_VERSION,
            services: BTreeMap::new(),
        }
    }
}

/// Flatten a legacy document into the current layout.
///
/// The table axis is dropped; when the same event id appears under
/// several tables, the later table wins, in stored order.
pub fn migrate_legacy(legacy: LegacyStore) -> Store {
    let mut store = Store::default();
    for (service_id, tables) in legacy {
        for (_table_id, events) in tables {
            let service = store.services.entry(service_id).or_default();
            for (event_id, event) in events {
                service.insert(event_id, event);
            }
        }
    }
    store
}

impl Store {
    /// Load the store from disk, migrating legacy documents.
    ///
    /// A missing file yields an empty current-version store.
    pub fn load(path: &Path) -> Result<Store, StoreError> {
        if !path.exists() {
            debug!("No store at {}, starting empty", path.display());
            return Ok(Store::default());
        }
        let raw = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_document(serde_json::from_str(&raw)?)
    }

    /// Interpret a parsed JSON document, branching on its schema version.
    ///
    /// A document without a `version` key is the legacy layout, the empty
    /// `{}` document included.
    fn from_document(value: serde_json::Value) -> Result<Store, StoreError> {
        let version = value
            .get("version")
            .and_then(|v| v.as_u64())
            .unwrap_or(1);
        if version >= 2 {
            Ok(serde_json::from_value(value)?)
        } else {
            info!("Migrating legacy store to version {}", STORE_VERSION);
            let legacy: LegacyStore = serde_json::from_value(value)?;
            Ok(migrate_legacy(legacy))
        }
    }

    /// Fold one decoded capture buffer into the store.
    ///
    /// Every decoded event replaces any stored event with the same
    /// (service, event) identity, whichever table produced it. Afterwards
    /// each service touched by this buffer is pruned of events that have
    /// ended by `now`.
    pub fn merge(&mut self, buckets: &EitBuckets, now: i64) {
        for services in buckets.values() {
            for (&service_id, tables) in services {
                let service = self.services.entry(service_id).or_default();
                for events in tables.values() {
                    for (&event_id, event) in events {
                        service.insert(event_id, event.clone());
                    }
                }
                service.retain(|_, event| event.end() > now);
            }
        }
    }

    /// Total number of events across all services.
    pub fn event_count(&self) -> usize {
        self.services.values().map(|events| events.len()).sum()
    }

    /// Number of services with at least one stored event entry.
    pub fn service_count(&self) -> usize {
        self.services.len()
    }

    /// Write the store to `path` atomically.
    ///
    /// The document is serialized to `<path>.partial` and renamed over
    /// the canonical file; the rename is the sole publish point, so a
    /// crash leaves either the old or the new store, never a partial one.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(self)?;

        let mut partial = path.as_os_str().to_owned();
        partial.push(".partial");
        let partial = PathBuf::from(partial);

        fs::write(&partial, json).map_err(|source| StoreError::Io {
            path: partial.clone(),
            source,
        })?;
        fs::rename(&partial, path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(())
    }
}
