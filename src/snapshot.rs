//! Atomically swappable catalog for hosts that reload their corpus.
//!
//! Readers take an `Arc` to the current snapshot and rank against it without
//! holding the lock, so an in-flight call sees either the old catalog or the
//! new one in full.

use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::error::TriageError;

/// An immutable catalog plus when it was installed
#[derive(Debug)]
pub struct Snapshot {
    pub catalog: Catalog,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct CatalogHandle {
    current: RwLock<Arc<Snapshot>>,
}

impl CatalogHandle {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(Snapshot {
                catalog,
                loaded_at: Utc::now(),
            })),
        }
    }

    /// Handle seeded with a copy of the compiled-in catalog
    pub fn builtin() -> Self {
        Self::new(Catalog::builtin().clone())
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Install `catalog` and return the snapshot it replaced
    pub fn replace(&self, catalog: Catalog) -> Arc<Snapshot> {
        self.swap(Arc::new(Snapshot {
            catalog,
            loaded_at: Utc::now(),
        }))
    }

    fn swap(&self, next: Arc<Snapshot>) -> Arc<Snapshot> {
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        std::mem::replace(&mut *guard, next)
    }

    /// Load and validate `path`, then swap it in.
    ///
    /// On failure the current snapshot stays installed.
    pub fn reload_from(&self, path: &Path) -> Result<Arc<Snapshot>, TriageError> {
        let catalog = Catalog::load(path).inspect_err(|e| {
            warn!("Keeping current catalog, reload failed: {}", e);
        })?;

        info!(
            "Installing catalog v{} ({} guides) from {}",
            catalog.version(),
            catalog.len(),
            path.display()
        );
        let next = Arc::new(Snapshot {
            catalog,
            loaded_at: Utc::now(),
        });
        self.swap(Arc::clone(&next));
        Ok(next)
    }
}
