use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Coordinate;

/// Podgorica city center, used whenever the device cannot be located
pub const DEFAULT_ORIGIN: Coordinate = Coordinate::new(42.4415, 19.2621);

/// Reasons a device position could not be obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeolocationError {
    #[error("location access was denied")]
    PermissionDenied,

    #[error("timed out waiting for a position")]
    Timeout,

    #[error("position unavailable")]
    PositionUnavailable,

    #[error("geolocation is not supported")]
    Unsupported,
}

/// Source of the device's current position
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    async fn current_position(&self) -> Result<Coordinate, GeolocationError>;
}

/// A fix (or failure) the browser already obtained and reported to us
#[derive(Debug, Clone, Copy)]
pub struct ReportedPosition(pub Result<Coordinate, GeolocationError>);

impl ReportedPosition {
    /// Build from the optional halves of a locate request.
    ///
    /// A missing position with no reported error is treated as unavailable.
    pub fn from_parts(position: Option<Coordinate>, error: Option<GeolocationError>) -> Self {
        match (position, error) {
            (Some(position), None) => Self(Ok(position)),
            (_, Some(error)) => Self(Err(error)),
            (None, None) => Self(Err(GeolocationError::PositionUnavailable)),
        }
    }
}

#[async_trait]
impl GeolocationProvider for ReportedPosition {
    async fn current_position(&self) -> Result<Coordinate, GeolocationError> {
        self.0
    }
}

/// Where a resolved origin came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum OriginSource {
    Device,
    Fallback(GeolocationError),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedOrigin {
    pub coordinate: Coordinate,
    pub source: OriginSource,
}

impl ResolvedOrigin {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, OriginSource::Fallback(_))
    }
}

/// Ask `provider` for a position, falling back to `default` on any failure
pub async fn locate_or_default(provider: &dyn GeolocationProvider, default: Coordinate) -> ResolvedOrigin {
    let position = provider
        .current_position()
        .await
        .and_then(|c| c.checked().ok_or(GeolocationError::PositionUnavailable));

    match position {
        Ok(coordinate) => ResolvedOrigin {
            coordinate,
            source: OriginSource::Device,
        },
        Err(e) => {
            tracing::warn!("Geolocation failed ({}), using default origin", e);
            ResolvedOrigin {
                coordinate: default,
                source: OriginSource::Fallback(e),
            }
        }
    }
}
