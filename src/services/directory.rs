use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::models::City;
use crate::services::ApiError;

/// Montenegro's municipalities, shipped with the binary
const BUNDLED_CITIES: &str = include_str!("../../data/cities.toml");

const CITIES_KEY: &str = "cities";

/// Errors that can occur while loading city reference data
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("City source error: {0}")]
    Source(#[from] ApiError),

    #[error("Bundled city table is malformed: {0}")]
    Bundled(#[from] toml::de::Error),
}

/// Somewhere a fresh city list can be fetched from
#[async_trait]
pub trait CitySource: Send + Sync {
    async fn fetch_cities(&self) -> Result<Vec<City>, ApiError>;
}

#[derive(Debug, Deserialize)]
struct CityTable {
    cities: Vec<City>,
}

/// Parse the bundled city table
pub fn bundled_cities() -> Result<Vec<City>, DirectoryError> {
    let table: CityTable = toml::from_str(BUNDLED_CITIES)?;
    Ok(table.cities)
}

/// City reference data with a TTL cache in front of the upstream API.
///
/// When the upstream fails the bundled table is served instead, so
/// nearest-city resolution keeps working offline.
pub struct CityDirectory {
    source: Option<Arc<dyn CitySource>>,
    cache: moka::future::Cache<&'static str, Arc<Vec<City>>>,
    fallback: Arc<Vec<City>>,
}

impl CityDirectory {
    /// Create a directory backed by `source`, or by the bundled table alone when `None`
    pub fn new(source: Option<Arc<dyn CitySource>>, ttl: Duration) -> Result<Self, DirectoryError> {
        Ok(Self::with_fallback(source, ttl, bundled_cities()?))
    }

    pub fn with_fallback(source: Option<Arc<dyn CitySource>>, ttl: Duration, fallback: Vec<City>) -> Self {
        let cache = moka::future::CacheBuilder::new(1).time_to_live(ttl).build();

        Self {
            source,
            cache,
            fallback: Arc::new(fallback),
        }
    }

    /// Current city list
    pub async fn cities(&self) -> Arc<Vec<City>> {
        if let Some(cities) = self.cache.get(CITIES_KEY).await {
            tracing::trace!("City directory cache hit");
            return cities;
        }

        let Some(source) = &self.source else {
            return self.fallback.clone();
        };

        match source.fetch_cities().await {
            Ok(cities) if !cities.is_empty() => {
                tracing::debug!("Loaded {} cities from upstream", cities.len());
                let cities = Arc::new(cities);
                self.cache.insert(CITIES_KEY, cities.clone()).await;
                cities
            }
            Ok(_) => {
                tracing::warn!("Upstream returned no cities, using bundled table");
                self.fallback.clone()
            }
            Err(e) => {
                tracing::warn!("Failed to fetch cities ({}), using bundled table", e);
                self.fallback.clone()
            }
        }
    }

    /// Slugs of every known city, in directory order
    pub async fn slugs(&self) -> Vec<String> {
        self.cities().await.iter().map(|c| c.slug.clone()).collect()
    }

    /// Drop the cached list so the next read goes upstream
    pub async fn invalidate(&self) {
        self.cache.invalidate(CITIES_KEY).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl CitySource for CountingSource {
        async fn fetch_cities(&self) -> Result<Vec<City>, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ApiError::Api("down".to_string()));
            }
            Ok(vec![City {
                id: 99,
                slug: "kolasin".to_string(),
                name_me: "Kolašin".to_string(),
                name_en: "Kolasin".to_string(),
                latitude: Some(42.8223),
                longitude: Some(19.5165),
            }])
        }
    }

    #[test]
    fn test_bundled_table_parses() {
        let cities = bundled_cities().unwrap();

        assert!(cities.len() >= 20);
        assert!(cities.iter().any(|c| c.slug == "podgorica"));
        assert!(cities.iter().all(|c| c.latitude.is_some() && c.longitude.is_some()));
    }

    #[tokio::test]
    async fn test_upstream_list_is_cached() {
        let source = Arc::new(CountingSource { calls: AtomicUsize::new(0), fail: false });
        let directory = CityDirectory::new(Some(source.clone() as Arc<dyn CitySource>), Duration::from_secs(60)).unwrap();

        assert_eq!(directory.slugs().await, vec!["kolasin"]);
        assert_eq!(directory.slugs().await, vec!["kolasin"]);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        directory.invalidate().await;
        directory.cities().await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failing_upstream_uses_bundled_table() {
        let source = Arc::new(CountingSource { calls: AtomicUsize::new(0), fail: true });
        let directory = CityDirectory::new(Some(source as Arc<dyn CitySource>), Duration::from_secs(60)).unwrap();

        let cities = directory.cities().await;
        assert!(cities.iter().any(|c| c.slug == "niksic"));
    }
}
