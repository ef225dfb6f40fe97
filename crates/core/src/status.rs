//! Status vocabularies for TEXT-typed status columns.
//!
//! Slot and session statuses participate in domain logic (allocation,
//! reconciliation) and get proper enums; the remaining vocabularies are
//! only validated/defaulted at the edges and stay plain constants.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a parking slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    Available,
    Occupied,
    OutOfService,
}

impl SlotStatus {
    /// Database representation (TEXT column value).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::OutOfService => "out_of_service",
        }
    }

    /// Parse a TEXT column value. Returns `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "available" => Some(Self::Available),
            "occupied" => Some(Self::Occupied),
            "out_of_service" => Some(Self::OutOfService),
            _ => None,
        }
    }
}

impl std::fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a parking session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Completed,
    Cancelled,
}

impl SessionStatus {
    /// Database representation (TEXT column value).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse a TEXT column value. Returns `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment lifecycle values.
pub mod payment_status {
    pub const PENDING: &str = "pending";
    pub const SUCCESSFUL: &str = "successful";
    pub const FAILED: &str = "failed";

    pub const ALL: &[&str] = &[PENDING, SUCCESSFUL, FAILED];
}

/// Payment method values.
pub mod payment_method {
    pub const CREDIT_CARD: &str = "credit_card";
    pub const CASH: &str = "cash";
    pub const MOBILE_PAY: &str = "mobile_pay";

    pub const ALL: &[&str] = &[CREDIT_CARD, CASH, MOBILE_PAY];
}

/// Camera availability values.
pub mod camera_status {
    pub const ACTIVE: &str = "active";
    pub const INACTIVE: &str = "inactive";
    pub const MAINTENANCE: &str = "maintenance";

    pub const ALL: &[&str] = &[ACTIVE, INACTIVE, MAINTENANCE];
}

/// Camera transport/stream kind values.
pub mod camera_type {
    pub const RTSP: &str = "rtsp";
    pub const HTTP: &str = "http";
    pub const WEBCAM: &str = "webcam";

    pub const ALL: &[&str] = &[RTSP, HTTP, WEBCAM];
}

/// Registered vehicle kind values.
pub mod vehicle_type {
    pub const CAR: &str = "car";
    pub const MOTORCYCLE: &str = "motorcycle";
    pub const TRUCK: &str = "truck";

    pub const ALL: &[&str] = &[CAR, MOTORCYCLE, TRUCK];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_status_round_trips() {
        for status in [
            SlotStatus::Available,
            SlotStatus::Occupied,
            SlotStatus::OutOfService,
        ] {
            assert_eq!(SlotStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(SlotStatus::parse("reserved"), None);
    }

    #[test]
    fn session_status_round_trips() {
        for status in [
            SessionStatus::Active,
            SessionStatus::Completed,
            SessionStatus::Cancelled,
        ] {
            assert_eq!(SessionStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(SessionStatus::parse(""), None);
    }
}
