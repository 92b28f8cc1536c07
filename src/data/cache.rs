//! Session cache for the loaded dashboard data.
//!
//! The first `get()` runs the loader; later calls hand out the same
//! `Arc<DashboardData>` until one of the source files changes on disk.

use super::loader::{DashboardData, DataLoader, DataSources, LoaderError};
use std::fs;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::SystemTime;

/// Modification time and size of every source, in source order.
type Fingerprint = Vec<(Option<SystemTime>, u64)>;

struct CacheEntry {
    fingerprint: Fingerprint,
    data: Arc<DashboardData>,
}

struct CacheState {
    entry: Option<CacheEntry>,
    loads: usize,
}

pub struct DataCache {
    loader: DataLoader,
    state: Mutex<CacheState>,
}

impl DataCache {
    pub fn new(sources: DataSources) -> Self {
        Self {
            loader: DataLoader::new(sources),
            state: Mutex::new(CacheState {
                entry: None,
                loads: 0,
            }),
        }
    }

    pub fn sources(&self) -> &DataSources {
        self.loader.sources()
    }

    /// Cached data, reloading only when the source files changed.
    ///
    /// The lock is held across the load so concurrent callers wait for the
    /// one load in flight instead of starting their own.
    pub fn get(&self) -> Result<Arc<DashboardData>, LoaderError> {
        let mut state = self.lock();
        let fingerprint = self.fingerprint()?;

        if let Some(entry) = &state.entry {
            if entry.fingerprint == fingerprint {
                tracing::debug!("dashboard data served from cache");
                return Ok(Arc::clone(&entry.data));
            }
            tracing::info!("source files changed, reloading");
        }

        let data = Arc::new(self.loader.load()?);
        state.loads += 1;
        state.entry = Some(CacheEntry {
            fingerprint,
            data: Arc::clone(&data),
        });
        Ok(data)
    }

    /// Number of loads performed so far.
    pub fn loads(&self) -> usize {
        self.lock().loads
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn fingerprint(&self) -> Result<Fingerprint, LoaderError> {
        self.sources()
            .all_paths()
            .map(|path| {
                let meta = fs::metadata(path).map_err(|source| {
                    if source.kind() == std::io::ErrorKind::NotFound {
                        LoaderError::MissingFile(path.to_path_buf())
                    } else {
                        LoaderError::Io {
                            path: path.to_path_buf(),
                            source,
                        }
                    }
                })?;
                Ok((meta.modified().ok(), meta.len()))
            })
            .collect()
    }
}
