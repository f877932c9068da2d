use serde::{Deserialize, Serialize};

/// A WGS84 position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// True when both components are finite and inside the geographic ranges
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Returns the coordinate only if it is usable for distance math
    pub fn checked(self) -> Option<Self> {
        self.is_valid().then_some(self)
    }
}

/// Anything that can take part in nearest-neighbor resolution.
///
/// `None` means the entity has no usable position and is skipped.
pub trait Located {
    fn location(&self) -> Option<Coordinate>;
}

impl Located for Coordinate {
    fn location(&self) -> Option<Coordinate> {
        self.checked()
    }
}

/// A named point of interest, such as a city or a pharmacy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoint {
    pub id: String,
    pub coordinate: Option<Coordinate>,
    #[serde(rename = "displayName")]
    pub display_name: String,
}

impl ReferencePoint {
    pub fn new(id: impl Into<String>, coordinate: Coordinate, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            coordinate: Some(coordinate),
            display_name: display_name.into(),
        }
    }
}

impl Located for ReferencePoint {
    fn location(&self) -> Option<Coordinate> {
        self.coordinate.and_then(Coordinate::checked)
    }
}

/// Outcome of a nearest-neighbor lookup.
///
/// `point` is `None` with an infinite distance when no candidate had a valid position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestResult<'a, T> {
    pub point: Option<&'a T>,
    pub distance_km: f64,
}

impl<'a, T> NearestResult<'a, T> {
    pub fn none() -> Self {
        Self {
            point: None,
            distance_km: f64::INFINITY,
        }
    }

    pub fn is_match(&self) -> bool {
        self.point.is_some()
    }
}

/// City record as served by the pharmacy API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: u32,
    pub slug: String,
    pub name_me: String,
    pub name_en: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl City {
    pub fn display_name(&self) -> &str {
        &self.name_me
    }
}

impl Located for City {
    fn location(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Coordinate::new(lat, lng).checked(),
            _ => None,
        }
    }
}

impl From<&City> for ReferencePoint {
    fn from(city: &City) -> Self {
        Self {
            id: city.slug.clone(),
            coordinate: city.location(),
            display_name: city.name_me.clone(),
        }
    }
}

/// Pharmacy record as served by the pharmacy API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pharmacy {
    pub id: u32,
    pub city_id: u32,
    pub name_me: String,
    #[serde(default)]
    pub name_en: Option<String>,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub is_24h: bool,
    #[serde(default)]
    pub open_sunday: bool,
    #[serde(default)]
    pub hours_monfri: String,
    #[serde(default)]
    pub hours_sat: String,
    #[serde(default)]
    pub hours_sun: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool { true }

impl Located for Pharmacy {
    fn location(&self) -> Option<Coordinate> {
        Coordinate::new(self.lat, self.lng).checked()
    }
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// Medicine record as served by the pharmacy API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medicine {
    pub id: u32,
    pub name_me: String,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
}

/// Counts reported by the upstream after syncing one city
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResult {
    pub processed: u32,
    pub created: u32,
    pub updated: u32,
    #[serde(rename = "cityName", default)]
    pub city_name: String,
}

/// Lifecycle of a single city sync
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Pending,
    Syncing,
    Success,
    Error,
}

/// One city's entry in a bulk sync run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncTask {
    #[serde(rename = "citySlug")]
    pub city_slug: String,
    #[serde(rename = "cityName")]
    pub city_name: String,
    pub status: SyncStatus,
    #[serde(rename = "retryCount")]
    pub retry_count: u32,
    #[serde(rename = "maxRetries")]
    pub max_retries: u32,
    pub error: Option<String>,
    pub result: Option<SyncResult>,
    #[serde(rename = "startedAt")]
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(rename = "finishedAt")]
    pub finished_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl SyncTask {
    pub fn pending(city_slug: impl Into<String>, max_retries: u32) -> Self {
        let city_slug = city_slug.into();
        Self {
            city_name: city_slug.clone(),
            city_slug,
            status: SyncStatus::Pending,
            retry_count: 0,
            max_retries,
            error: None,
            result: None,
            started_at: None,
            finished_at: None,
        }
    }

    pub fn can_retry(&self) -> bool {
        self.retry_count < self.max_retries
    }
}
