//! Entry/exit domain vocabulary and the named parking error kinds.

use crate::types::DbId;

/// Direction of a vehicle detection event.
///
/// The detector reports direction as an integer wire code: `0` for a
/// vehicle entering, `1` for a vehicle leaving. Any other code is
/// rejected with [`ParkingError::InvalidFlag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryFlag {
    Entry,
    Exit,
}

impl EntryFlag {
    /// Wire code for an entering vehicle.
    pub const ENTRY_CODE: i32 = 0;
    /// Wire code for a leaving vehicle.
    pub const EXIT_CODE: i32 = 1;

    /// Decode the detector's integer flag.
    pub fn from_code(code: i32) -> Result<Self, ParkingError> {
        match code {
            Self::ENTRY_CODE => Ok(Self::Entry),
            Self::EXIT_CODE => Ok(Self::Exit),
            other => Err(ParkingError::InvalidFlag { code: other }),
        }
    }

    /// The integer wire code for this flag.
    pub fn code(self) -> i32 {
        match self {
            Self::Entry => Self::ENTRY_CODE,
            Self::Exit => Self::EXIT_CODE,
        }
    }
}

/// Why a specifically requested slot could not be allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotRejection {
    /// The slot id does not exist.
    NotFound,
    /// The slot exists but belongs to a different parking lot.
    WrongLot,
    /// The slot is occupied or out of service.
    NotAvailable,
}

impl std::fmt::Display for SlotRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::NotFound => "not found",
            Self::WrongLot => "belongs to a different parking lot",
            Self::NotAvailable => "not available",
        };
        f.write_str(text)
    }
}

/// Failures of the vehicle entry/exit flow and its collaborators.
///
/// Each variant is a distinct, caller-visible error kind; the API layer
/// maps them to HTTP statuses and stable error codes.
#[derive(Debug, thiserror::Error)]
pub enum ParkingError {
    /// Detection flag outside the {entry, exit} wire codes.
    #[error("Invalid detection flag {code}: expected 0 (entry) or 1 (exit)")]
    InvalidFlag { code: i32 },

    /// Entry requires a parking lot id; allocating "any slot anywhere"
    /// is deliberately unsupported.
    #[error("A parking lot id is required to assign the vehicle to a slot")]
    MissingParkingLot,

    /// The identity (vehicle or walk-up plate) already has an active
    /// session.
    #[error("Vehicle already has an active parking session (session {existing_session_id})")]
    DuplicateActiveSession { existing_session_id: DbId },

    /// A specifically requested slot was rejected.
    #[error("Slot {slot_id} cannot be allocated in lot {lot_id}: {reason}")]
    SlotUnavailable {
        slot_id: DbId,
        lot_id: DbId,
        reason: SlotRejection,
    },

    /// The lot has no available slot left.
    #[error("No available parking slot in lot {lot_id}")]
    NoSlotAvailable { lot_id: DbId },

    /// Exit requested for an identity with no active session.
    #[error("No active parking session for license plate {license_plate}")]
    NoActiveSession { license_plate: String },

    /// The lot's hourly rate is missing or non-positive; billing must
    /// fail rather than produce a zero fee.
    #[error("Hourly rate must be positive, got {rate}")]
    InvalidRate { rate: i64 },
}
