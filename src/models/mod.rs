// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    BoundingBox, City, Coordinate, Located, Medicine, NearestResult, Pharmacy, ReferencePoint,
    SyncResult, SyncStatus, SyncTask,
};
pub use requests::{
    CoordinateInput, LocateRequest, MedicineSearchQuery, NearbyQuery, RadiusQuery, StartSyncRequest,
};
pub use responses::{
    ErrorResponse, HealthResponse, LocateResponse, MedicineSearchResponse, NearbyPharmacy,
    NearbyResponse, NearestCityResponse, RadiusResponse,
};
