//! HTTP client for the external computer-vision service.
//!
//! The detector exposes license-plate OCR, vehicle polygon detection,
//! parking-space recommendation, and video annotation over plain HTTP
//! with multipart uploads. This crate wraps those endpoints with
//! [`DetectorApi`] and normalizes the service's loosely specified
//! responses (plate text may arrive in a JSON body or in any of several
//! response headers).

pub mod api;
pub mod plate;

pub use api::{AnnotatedMedia, DetectedVehicle, DetectorApi, DetectorError, PlateDetection};
