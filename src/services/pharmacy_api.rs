use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::models::{City, Medicine, Pharmacy, SyncResult};
use crate::services::directory::CitySource;
use crate::sync::CitySyncApi;

/// Errors that can occur when talking to the pharmacy API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    Api(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid admin key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Response envelope used by every pharmacy API endpoint
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    message: String,
    data: Option<T>,
}

/// Pharmacy API client
///
/// Handles all communication with the pharmacy backend including:
/// - Fetching the city reference list
/// - Proximity searches for pharmacies
/// - Triggering the per-city online data sync
/// - Medicine lookups
pub struct PharmacyApiClient {
    base_url: String,
    admin_key: String,
    client: Client,
}

impl PharmacyApiClient {
    /// Create a new pharmacy API client
    pub fn new(base_url: String, admin_key: String, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            admin_key,
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and unwrap the `{success, message, data}` envelope
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, endpoint: &str) -> Result<Option<T>, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let message = body
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));

            tracing::error!("API request failed: {} ({})", endpoint, message);

            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized,
                StatusCode::NOT_FOUND => ApiError::NotFound(message),
                _ => ApiError::Api(message),
            });
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", endpoint, e)))?;

        if !envelope.success {
            return Err(ApiError::Api(envelope.message));
        }

        Ok(envelope.data)
    }

    /// Fetch all cities
    pub async fn get_cities(&self) -> Result<Vec<City>, ApiError> {
        let request = self.client.get(self.url("/cities"));
        Ok(self.send(request, "/cities").await?.unwrap_or_default())
    }

    /// Pharmacies within `radius_km` of a point, as filtered by the backend
    pub async fn search_nearby(&self, lat: f64, lng: f64, radius_km: u32) -> Result<Vec<Pharmacy>, ApiError> {
        let endpoint = format!("/pharmacies/nearby/{}/{}?radius={}", lat, lng, radius_km);
        tracing::debug!("Fetching nearby pharmacies: {}", endpoint);

        let request = self.client.get(self.url(&endpoint));
        Ok(self.send(request, &endpoint).await?.unwrap_or_default())
    }

    /// Free-text medicine search
    pub async fn search_medicines(&self, term: &str) -> Result<Vec<Medicine>, ApiError> {
        let endpoint = format!("/medicines/search?q={}", urlencoding::encode(term));
        let request = self.client.get(self.url(&endpoint));
        Ok(self.send(request, &endpoint).await?.unwrap_or_default())
    }

    /// Pull fresh pharmacy data for one city from the places provider
    pub async fn sync_city(&self, city_slug: &str) -> Result<SyncResult, ApiError> {
        let endpoint = format!("/admin/online-data/sync/{}", urlencoding::encode(city_slug));

        let request = self
            .client
            .post(self.url(&endpoint))
            .header("x-admin-key", &self.admin_key);

        let result: Option<SyncResult> = self.send(request, &endpoint).await?;
        let result = result.ok_or_else(|| ApiError::InvalidResponse(format!("{}: missing sync result", endpoint)))?;

        tracing::debug!(
            "Synced {}: {} processed, {} created, {} updated",
            city_slug,
            result.processed,
            result.created,
            result.updated
        );

        Ok(result)
    }
}

#[async_trait]
impl CitySyncApi for PharmacyApiClient {
    async fn sync_city(&self, city_slug: &str) -> Result<SyncResult, ApiError> {
        PharmacyApiClient::sync_city(self, city_slug).await
    }
}

#[async_trait]
impl CitySource for PharmacyApiClient {
    async fn fetch_cities(&self) -> Result<Vec<City>, ApiError> {
        self.get_cities().await
    }
}
