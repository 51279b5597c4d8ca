//! Curriculum repository: a TTL-cached catalog snapshot over a [`CatalogSource`]

use super::normalize::load_catalog;
use super::source::CatalogSource;
use crate::core::diagnostics::DataSourceError;
use crate::core::models::Catalog;
use crate::{debug, info};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default cache window, in seconds
pub const DEFAULT_CACHE_TTL_SECS: u64 = 600;

struct CachedCatalog {
    catalog: Arc<Catalog>,
    /// `None` when the window reaches past what `Instant` can represent
    expires_at: Option<Instant>,
}

impl CachedCatalog {
    fn is_fresh_at(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |expires_at| expires_at > now)
    }
}

/// Loads the catalog at most once per cache window
///
/// Callers receive an `Arc<Catalog>`; a snapshot stays valid for whoever
/// holds it even after the repository reloads.
pub struct CatalogRepository<S: CatalogSource> {
    source: S,
    ttl: Duration,
    cached: Option<CachedCatalog>,
}

impl<S: CatalogSource> CatalogRepository<S> {
    /// Create a repository; nothing is fetched until the first access
    #[must_use]
    pub const fn new(source: S, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            cached: None,
        }
    }

    /// Create a repository with the default 600 second window
    #[must_use]
    pub const fn with_default_ttl(source: S) -> Self {
        Self::new(source, Duration::from_secs(DEFAULT_CACHE_TTL_SECS))
    }

    /// Current snapshot, loading it if the cache is empty or expired
    ///
    /// # Errors
    /// Returns the `DataSourceError` of a failed load; nothing is retried
    pub fn catalog(&mut self) -> Result<Arc<Catalog>, DataSourceError> {
        self.catalog_at(Instant::now())
    }

    /// Same as [`Self::catalog`] with an explicit clock reading
    ///
    /// # Errors
    /// Returns the `DataSourceError` of a failed load
    pub fn catalog_at(&mut self, now: Instant) -> Result<Arc<Catalog>, DataSourceError> {
        if let Some(cached) = &self.cached {
            if cached.is_fresh_at(now) {
                debug!("Catalog cache hit");
                return Ok(Arc::clone(&cached.catalog));
            }
            info!("Catalog cache expired; reloading");
        }

        let catalog = Arc::new(load_catalog(&self.source)?);
        self.cached = Some(CachedCatalog {
            catalog: Arc::clone(&catalog),
            expires_at: now.checked_add(self.ttl),
        });
        Ok(catalog)
    }

    /// Drop the cached snapshot and load a fresh one
    ///
    /// # Errors
    /// Returns the `DataSourceError` of the fresh load
    pub fn invalidate_and_reload(&mut self) -> Result<Arc<Catalog>, DataSourceError> {
        info!("Catalog cache invalidated");
        self.cached = None;
        self.catalog()
    }

    /// Whether a non-expired snapshot is held
    #[must_use]
    pub fn is_cached_at(&self, now: Instant) -> bool {
        self.cached
            .as_ref()
            .is_some_and(|cached| cached.is_fresh_at(now))
    }

    /// Configured cache window
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Underlying source
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the source, e.g. to replace tables before the next reload
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}
