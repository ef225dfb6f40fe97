use std::time::Duration;

use parkview_core::fees::FeePolicy;
use parkview_core::occupancy::DEFAULT_OCCUPANCY_THRESHOLD;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except `JWT_SECRET` have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// External detector service connection.
    pub detector: DetectorConfig,
    /// Billing and occupancy policy knobs.
    pub parking: ParkingConfig,
    /// Directory for uploaded image storage (default: `./uploads`).
    pub upload_dir: String,
}

/// Connection settings for the external computer-vision service.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Base HTTP URL (default: `http://localhost:8000`).
    pub base_url: String,
    /// Per-request timeout in seconds (default: `600`; video
    /// annotation can run for minutes).
    pub timeout_secs: u64,
}

impl DetectorConfig {
    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Billing and occupancy policy, injected rather than hard-coded so
/// deployments can vary them without a rebuild.
#[derive(Debug, Clone)]
pub struct ParkingConfig {
    /// Percentage fee increase per hour after the first (default: `10`).
    pub fee_increase_percent: i64,
    /// Minimum billed hours (default: `1`).
    pub minimum_billed_hours: i64,
    /// Slot-area overlap share above which a slot counts as occupied
    /// (default: `0.5`, strictly greater-than).
    pub occupancy_threshold: f64,
}

impl ParkingConfig {
    /// The fee policy handed to the fee calculator.
    pub fn fee_policy(&self) -> FeePolicy {
        FeePolicy {
            increase_percent: self.fee_increase_percent,
            minimum_hours: self.minimum_billed_hours,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                 |
    /// |--------------------------|-------------------------|
    /// | `HOST`                   | `0.0.0.0`               |
    /// | `PORT`                   | `3000`                  |
    /// | `CORS_ORIGINS`           | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                    |
    /// | `DETECTOR_URL`           | `http://localhost:8000` |
    /// | `DETECTOR_TIMEOUT_SECS`  | `600`                   |
    /// | `FEE_INCREASE_PERCENT`   | `10`                    |
    /// | `FEE_MINIMUM_HOURS`      | `1`                     |
    /// | `OCCUPANCY_THRESHOLD`    | `0.5`                   |
    /// | `UPLOAD_DIR`             | `./uploads`             |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let detector = DetectorConfig {
            base_url: std::env::var("DETECTOR_URL")
                .unwrap_or_else(|_| "http://localhost:8000".into()),
            timeout_secs: std::env::var("DETECTOR_TIMEOUT_SECS")
                .unwrap_or_else(|_| "600".into())
                .parse()
                .expect("DETECTOR_TIMEOUT_SECS must be a valid u64"),
        };

        let parking = ParkingConfig {
            fee_increase_percent: std::env::var("FEE_INCREASE_PERCENT")
                .unwrap_or_else(|_| "10".into())
                .parse()
                .expect("FEE_INCREASE_PERCENT must be a valid i64"),
            minimum_billed_hours: std::env::var("FEE_MINIMUM_HOURS")
                .unwrap_or_else(|_| "1".into())
                .parse()
                .expect("FEE_MINIMUM_HOURS must be a valid i64"),
            occupancy_threshold: std::env::var("OCCUPANCY_THRESHOLD")
                .unwrap_or_else(|_| DEFAULT_OCCUPANCY_THRESHOLD.to_string())
                .parse()
                .expect("OCCUPANCY_THRESHOLD must be a valid f64"),
        };

        let upload_dir = std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".into());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            detector,
            parking,
            upload_dir,
        }
    }
}
