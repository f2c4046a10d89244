use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::mapref::one::RefMut;
use dashmap::DashMap;

use crate::activity::{ActivityLoader, ActivityRecord};
use crate::catalog::{Catalog, EnglishCatalog, JsonCatalog};
use crate::config::Config;
use crate::error::{AppError, StoreError};
use crate::pipeline::TrackLogDir;
use crate::profile::Profile;
use crate::store::SqliteStore;
use crate::upload::strava::StravaUploader;

#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    store: Arc<Mutex<SqliteStore>>,
    track_logs: Arc<TrackLogDir>,
    profile: Arc<Profile>,
    catalog: Arc<dyn Catalog>,
    cache: Arc<DashMap<i64, CachedActivity>>,
}

struct CachedActivity {
    activity: ActivityRecord,
    inserted_at: Instant,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, StoreError> {
        let store = SqliteStore::open(&config.database_path)?;
        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Config, store: SqliteStore) -> Self {
        let catalog: Arc<dyn Catalog> = match &config.catalog_path {
            Some(path) => match JsonCatalog::from_file(path) {
                Ok(catalog) => Arc::new(catalog),
                Err(e) => {
                    tracing::warn!("Failed to load catalog {}: {}", path.display(), e);
                    Arc::new(EnglishCatalog)
                }
            },
            None => Arc::new(EnglishCatalog),
        };

        Self {
            profile: Arc::new(Profile::from_config(&config)),
            track_logs: Arc::new(TrackLogDir::new(config.gpx_dir())),
            store: Arc::new(Mutex::new(store)),
            catalog,
            cache: Arc::new(DashMap::new()),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn track_logs(&self) -> &TrackLogDir {
        &self.track_logs
    }

    pub fn uploader(&self) -> StravaUploader {
        StravaUploader::new(&self.config.strava, self.config.strava_token_path())
    }

    /// The cached record for `id`, loading it on a miss.
    pub fn activity(&self, id: i64) -> Result<ActivityRecord, AppError> {
        if let Some(entry) = self.cache.get(&id) {
            return Ok(entry.activity.clone());
        }
        let entry = self.cached_mut(id)?;
        Ok(entry.activity.clone())
    }

    /// Applies `set_value` to the cached record. Returns the record and
    /// whether the value was accepted.
    pub fn update(
        &self,
        id: i64,
        field: &str,
        value: &str,
    ) -> Result<(ActivityRecord, bool), AppError> {
        let mut entry = self.cached_mut(id)?;
        let changed = entry.activity.set_value(field, value);
        Ok((entry.activity.clone(), changed))
    }

    /// Entry for `id` under its shard lock, loaded first when absent. Loads
    /// and edits of one id never interleave.
    fn cached_mut(&self, id: i64) -> Result<RefMut<'_, i64, CachedActivity>, AppError> {
        match self.cache.entry(id) {
            Entry::Occupied(entry) => Ok(entry.into_ref()),
            Entry::Vacant(entry) => {
                let activity = self.load(id)?;
                Ok(entry.insert(CachedActivity {
                    activity,
                    inserted_at: Instant::now(),
                }))
            }
        }
    }

    fn load(&self, id: i64) -> Result<ActivityRecord, AppError> {
        let store = self
            .store
            .lock()
            .map_err(|_| AppError::Internal("store lock poisoned".to_string()))?;
        let activity = ActivityLoader::new(
            &*store,
            self.track_logs.as_ref(),
            &self.profile,
            self.catalog.as_ref(),
        )
        .load(Some(id))?;
        Ok(activity)
    }

    pub fn evict_expired(&self, ttl: Duration) {
        let now = Instant::now();
        self.cache
            .retain(|_, cached| now.duration_since(cached.inserted_at) < ttl);
        tracing::info!("Cache eviction complete. Current size: {}", self.cache.len());
    }
}
