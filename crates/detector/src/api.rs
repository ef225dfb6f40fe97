//! REST API client for the detector HTTP endpoints.
//!
//! Wraps the detector's multipart endpoints (plate OCR, vehicle
//! detection, parking-space recommendation, video annotation) using
//! [`reqwest`].

use std::time::Duration;

use parkview_core::geometry::{Polygon, Ring};
use parkview_core::types::DbId;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::plate::{normalize_plate, plate_from_json, PLATE_HEADERS};

/// Response headers that may carry detected vehicle polygons.
const VEHICLE_COORDINATE_HEADERS: &[&str] = &["x-vehicle-coordinates", "vehicle-coordinates"];

/// HTTP client for a single detector deployment.
pub struct DetectorApi {
    client: reqwest::Client,
    base_url: String,
}

/// Annotated image/video bytes returned by the recommendation and
/// annotation endpoints.
#[derive(Debug)]
pub struct AnnotatedMedia {
    pub bytes: Vec<u8>,
    pub content_type: String,
    /// Vehicle polygons the detector piggybacks on a response header,
    /// when present.
    pub vehicle_coordinates: Option<Vec<Polygon>>,
}

/// Result of plate OCR on one frame.
#[derive(Debug)]
pub struct PlateDetection {
    /// Normalized plate text; `None` when nothing was recognized.
    pub license_plate: Option<String>,
    /// Annotated image bytes (may be empty for JSON-only deployments).
    pub image: Vec<u8>,
    pub content_type: String,
}

/// One vehicle instance detected in a frame.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectedVehicle {
    pub coordinates: Polygon,
}

/// Body of the `/parking-space/detect-vehicles` response.
#[derive(Debug, Deserialize)]
struct DetectVehiclesResponse {
    #[serde(default)]
    vehicles: Vec<DetectedVehicle>,
}

/// Errors from the detector API layer.
#[derive(Debug, thiserror::Error)]
pub enum DetectorError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The detector returned a non-2xx status code.
    #[error("Detector API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The detector returned a body this client could not interpret.
    #[error("Unexpected detector response: {0}")]
    Decode(String),
}

impl DetectorApi {
    /// Create a new API client.
    ///
    /// * `base_url` - Base HTTP URL, e.g. `http://localhost:8000`.
    /// * `timeout`  - Per-request timeout; video annotation in
    ///   particular can run for minutes.
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, DetectorError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Base HTTP URL of the detector deployment.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run plate OCR on an image (`POST /license-plate/detect`).
    ///
    /// The detector answers either with an annotated image plus a plate
    /// header, or with a JSON body carrying the plate text; both shapes
    /// are normalized here.
    pub async fn detect_license_plate(
        &self,
        image: Vec<u8>,
        file_name: &str,
    ) -> Result<PlateDetection, DetectorError> {
        let form = Form::new().part(
            "image",
            Part::bytes(image).file_name(file_name.to_string()),
        );

        let response = self
            .client
            .post(format!("{}/license-plate/detect", self.base_url))
            .multipart(form)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        let content_type = header_string(&response, "content-type")
            .unwrap_or_else(|| "image/png".to_string());

        if content_type.contains("application/json") {
            let body: serde_json::Value = response.json().await?;
            let license_plate = plate_from_json(&body);
            if license_plate.is_none() {
                tracing::warn!("Detector JSON response carried no plate text");
            }
            return Ok(PlateDetection {
                license_plate,
                image: Vec::new(),
                content_type,
            });
        }

        let license_plate = PLATE_HEADERS
            .iter()
            .find_map(|name| header_string(&response, name))
            .and_then(|value| normalize_plate(&value));

        let image = response.bytes().await?.to_vec();
        Ok(PlateDetection {
            license_plate,
            image,
            content_type,
        })
    }

    /// Detect vehicle polygons in an image or video
    /// (`POST /parking-space/detect-vehicles`).
    pub async fn detect_vehicles(
        &self,
        file: Vec<u8>,
        file_name: &str,
        parking_lot_id: Option<DbId>,
    ) -> Result<Vec<DetectedVehicle>, DetectorError> {
        let mut form = Form::new().part(
            "file",
            Part::bytes(file).file_name(file_name.to_string()),
        );
        if let Some(lot_id) = parking_lot_id {
            form = form.text("parking_lot_id", lot_id.to_string());
        }

        let response = self
            .client
            .post(format!("{}/parking-space/detect-vehicles", self.base_url))
            .multipart(form)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        let body: DetectVehiclesResponse = response.json().await?;
        Ok(body.vehicles)
    }

    /// Recommend a free parking space for an image
    /// (`POST /parking-space/recommend`). Returns an annotated PNG and,
    /// when provided, vehicle polygons from the response header.
    pub async fn recommend_space(
        &self,
        file: Vec<u8>,
        file_name: &str,
        parking_lot_id: Option<DbId>,
    ) -> Result<AnnotatedMedia, DetectorError> {
        self.fetch_annotated("/parking-space/recommend", "file", file, file_name, parking_lot_id)
            .await
    }

    /// Recommend a free parking space for a video
    /// (`POST /parking-space/recommend-video`).
    pub async fn recommend_space_video(
        &self,
        video: Vec<u8>,
        file_name: &str,
        parking_lot_id: Option<DbId>,
    ) -> Result<AnnotatedMedia, DetectorError> {
        self.fetch_annotated(
            "/parking-space/recommend-video",
            "video",
            video,
            file_name,
            parking_lot_id,
        )
        .await
    }

    /// Annotate every frame of a video (`POST /parking-space/annotate-video`).
    /// Returns an MP4.
    pub async fn annotate_video(
        &self,
        video: Vec<u8>,
        file_name: &str,
        parking_lot_id: Option<DbId>,
    ) -> Result<AnnotatedMedia, DetectorError> {
        self.fetch_annotated(
            "/parking-space/annotate-video",
            "video",
            video,
            file_name,
            parking_lot_id,
        )
        .await
    }

    /// Fetch the detector's plate log (`GET /license-plate/logs`).
    pub async fn plate_logs(&self) -> Result<serde_json::Value, DetectorError> {
        let response = self
            .client
            .get(format!("{}/license-plate/logs", self.base_url))
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.json().await?)
    }

    // ---- private helpers ----

    /// Shared body of the annotated-media endpoints.
    async fn fetch_annotated(
        &self,
        path: &str,
        field: &'static str,
        file: Vec<u8>,
        file_name: &str,
        parking_lot_id: Option<DbId>,
    ) -> Result<AnnotatedMedia, DetectorError> {
        let mut form = Form::new().part(field, Part::bytes(file).file_name(file_name.to_string()));
        if let Some(lot_id) = parking_lot_id {
            form = form.text("parking_lot_id", lot_id.to_string());
        }

        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .multipart(form)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        let content_type = header_string(&response, "content-type")
            .unwrap_or_else(|| "image/png".to_string());
        let vehicle_coordinates = parse_vehicle_header(&response);

        let bytes = response.bytes().await?.to_vec();
        Ok(AnnotatedMedia {
            bytes,
            content_type,
            vehicle_coordinates,
        })
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`DetectorError::Api`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, DetectorError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(DetectorError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

/// Read a response header as an owned string.
fn header_string(response: &reqwest::Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

/// Parse the vehicle-coordinates header (a JSON array of rings) into
/// one polygon per detected vehicle. Malformed headers are logged and
/// dropped rather than failing the whole response.
fn parse_vehicle_header(response: &reqwest::Response) -> Option<Vec<Polygon>> {
    let raw = VEHICLE_COORDINATE_HEADERS
        .iter()
        .find_map(|name| header_string(response, name))?;

    match serde_json::from_str::<Vec<Ring>>(&raw) {
        Ok(rings) => Some(rings.into_iter().map(Polygon::from_exterior).collect()),
        Err(err) => {
            tracing::warn!(error = %err, "Failed to parse vehicle coordinates header");
            None
        }
    }
}
