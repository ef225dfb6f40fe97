//! Tiered hourly parking fee computation.
//!
//! Billing is per started hour. The first hour costs the lot's hourly
//! rate; every following hour costs the previous hour's fee increased
//! by a configurable percentage, rounded half-up per hour (never on the
//! cumulative total). Currency is integer-valued throughout.

use crate::parking::ParkingError;
use crate::types::Timestamp;

/// Milliseconds in one billable hour.
const MS_PER_HOUR: i64 = 3_600_000;

/// Tunable billing policy, injected from configuration so per-lot
/// variation and testing do not require recompilation.
#[derive(Debug, Clone, Copy)]
pub struct FeePolicy {
    /// Percentage increase applied to each hour after the first.
    pub increase_percent: i64,
    /// Minimum number of hours billed, even for sub-hour stays.
    pub minimum_hours: i64,
}

impl Default for FeePolicy {
    fn default() -> Self {
        Self {
            increase_percent: 10,
            minimum_hours: 1,
        }
    }
}

/// Fee for a single billed hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct FeeLineItem {
    /// 1-based hour index.
    pub hour: i64,
    /// Fee for this hour in integer currency units.
    pub fee: i64,
}

/// Complete fee computation result for one parking session.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FeeSchedule {
    /// Billed duration in hours (ceiling of elapsed time, at least the
    /// policy minimum).
    pub duration_hours: i64,
    /// The base rate used for hour 1.
    pub hourly_rate: i64,
    /// Sum of all per-hour fees.
    pub total_fee: i64,
    /// Ordered per-hour fees, hour 1..=duration_hours.
    pub breakdown: Vec<FeeLineItem>,
}

/// Compute the fee for a stay from `entry` to `exit` at `hourly_rate`.
///
/// Fails with [`ParkingError::InvalidRate`] when the rate is zero or
/// negative; the caller must not complete a session in that state.
pub fn compute_fee(
    entry: Timestamp,
    exit: Timestamp,
    hourly_rate: i64,
    policy: &FeePolicy,
) -> Result<FeeSchedule, ParkingError> {
    if hourly_rate <= 0 {
        return Err(ParkingError::InvalidRate { rate: hourly_rate });
    }

    let elapsed_ms = (exit - entry).num_milliseconds();
    let started_hours = if elapsed_ms <= 0 {
        0
    } else {
        (elapsed_ms + MS_PER_HOUR - 1) / MS_PER_HOUR
    };
    let duration_hours = started_hours.max(policy.minimum_hours);

    let mut breakdown = Vec::with_capacity(duration_hours as usize);
    let mut total_fee = 0_i64;
    let mut hour_fee = hourly_rate;

    for hour in 1..=duration_hours {
        if hour > 1 {
            hour_fee = increase_rounded(hour_fee, policy.increase_percent);
        }
        total_fee += hour_fee;
        breakdown.push(FeeLineItem { hour, fee: hour_fee });
    }

    Ok(FeeSchedule {
        duration_hours,
        hourly_rate,
        total_fee,
        breakdown,
    })
}

/// Apply a percentage increase with round-half-up integer arithmetic.
fn increase_rounded(fee: i64, percent: i64) -> i64 {
    (fee * (100 + percent) + 50) / 100
}
