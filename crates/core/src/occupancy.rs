//! Camera-driven slot occupancy reconciliation planning.
//!
//! Given the slots of one lot (with their stored footprints) and the
//! vehicle polygons detected in a frame, decide which slots to flip to
//! occupied and which occupied slots to release. This module is pure:
//! it produces a [`ReconcilePlan`] and leaves persistence to the
//! caller, which must re-assert the active-session invariant at write
//! time.

use crate::geometry::{GeometryEngine, Polygon};
use crate::status::SlotStatus;
use crate::types::DbId;

/// A slot is considered occupied by a detected vehicle when the
/// intersection covers strictly more than this share of the slot area.
pub const DEFAULT_OCCUPANCY_THRESHOLD: f64 = 0.5;

/// One slot as seen by the reconciler.
#[derive(Debug, Clone)]
pub struct SlotObservation {
    pub id: DbId,
    pub status: SlotStatus,
    /// Stored footprint in the shared camera coordinate space. Slots
    /// without coordinates cannot be reconciled.
    pub polygon: Option<Polygon>,
    /// Whether an active parking session currently references the slot.
    pub has_active_session: bool,
}

/// Status transitions decided by one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Slots to set to `occupied`.
    pub occupy: Vec<DbId>,
    /// Occupied slots with no overlapping vehicle and no active
    /// session, to be reset to `available`.
    pub release: Vec<DbId>,
    /// Slots that could not be evaluated (no coordinates, or their
    /// footprint failed geometry validation).
    pub skipped: Vec<DbId>,
}

/// Evaluate every detected vehicle against every slot footprint.
///
/// A geometry failure on a single slot/vehicle pair is logged and that
/// pair skipped; the rest of the pass is unaffected.
pub fn plan_occupancy(
    slots: &[SlotObservation],
    vehicles: &[Polygon],
    engine: &dyn GeometryEngine,
    threshold: f64,
) -> ReconcilePlan {
    let mut plan = ReconcilePlan::default();

    for slot in slots {
        let Some(footprint) = &slot.polygon else {
            plan.skipped.push(slot.id);
            continue;
        };

        let slot_area = match engine.area(footprint) {
            Ok(area) if area > 0.0 => area,
            Ok(_) => {
                tracing::warn!(slot_id = slot.id, "Slot footprint has zero area, skipping");
                plan.skipped.push(slot.id);
                continue;
            }
            Err(err) => {
                tracing::warn!(slot_id = slot.id, error = %err, "Invalid slot footprint, skipping");
                plan.skipped.push(slot.id);
                continue;
            }
        };

        let mut candidate_occupied = false;
        for (vehicle_idx, vehicle) in vehicles.iter().enumerate() {
            match engine.intersection_area(vehicle, footprint) {
                Ok(Some(overlap)) if overlap / slot_area > threshold => {
                    candidate_occupied = true;
                    break;
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(
                        slot_id = slot.id,
                        vehicle_idx,
                        error = %err,
                        "Polygon intersection failed, skipping pair"
                    );
                }
            }
        }

        if candidate_occupied {
            if slot.status != SlotStatus::Occupied {
                plan.occupy.push(slot.id);
            }
        } else if slot.status == SlotStatus::Occupied && !slot.has_active_session {
            plan.release.push(slot.id);
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{rect, GeoEngine};

    fn slot(id: DbId, status: SlotStatus, polygon: Option<Polygon>) -> SlotObservation {
        SlotObservation {
            id,
            status,
            polygon,
            has_active_session: false,
        }
    }

    /// Unit-square slot at the origin.
    fn unit_slot(id: DbId, status: SlotStatus) -> SlotObservation {
        slot(id, status, Some(rect(0.0, 0.0, 1.0, 1.0)))
    }

    #[test]
    fn majority_overlap_occupies_the_slot() {
        let slots = [unit_slot(1, SlotStatus::Available)];
        let vehicles = [rect(0.0, 0.0, 0.9, 1.0)];

        let plan = plan_occupancy(&slots, &vehicles, &GeoEngine, DEFAULT_OCCUPANCY_THRESHOLD);
        assert_eq!(plan.occupy, vec![1]);
        assert!(plan.release.is_empty());
    }

    #[test]
    fn exactly_half_overlap_does_not_occupy() {
        // Threshold is strictly greater-than: 50.0% must not flip.
        let slots = [unit_slot(1, SlotStatus::Available)];
        let vehicles = [rect(0.0, 0.0, 0.5, 1.0)];

        let plan = plan_occupancy(&slots, &vehicles, &GeoEngine, DEFAULT_OCCUPANCY_THRESHOLD);
        assert!(plan.occupy.is_empty());
    }

    #[test]
    fn just_over_half_overlap_occupies() {
        let slots = [unit_slot(1, SlotStatus::Available)];
        let vehicles = [rect(0.0, 0.0, 0.500001, 1.0)];

        let plan = plan_occupancy(&slots, &vehicles, &GeoEngine, DEFAULT_OCCUPANCY_THRESHOLD);
        assert_eq!(plan.occupy, vec![1]);
    }

    #[test]
    fn vacated_slot_is_released() {
        let slots = [unit_slot(1, SlotStatus::Occupied)];

        let plan = plan_occupancy(&slots, &[], &GeoEngine, DEFAULT_OCCUPANCY_THRESHOLD);
        assert_eq!(plan.release, vec![1]);
        assert!(plan.occupy.is_empty());
    }

    #[test]
    fn slot_with_active_session_is_never_released() {
        let mut occupied = unit_slot(1, SlotStatus::Occupied);
        occupied.has_active_session = true;

        let plan = plan_occupancy(&[occupied], &[], &GeoEngine, DEFAULT_OCCUPANCY_THRESHOLD);
        assert!(plan.release.is_empty());
        assert!(plan.occupy.is_empty());
    }

    #[test]
    fn already_occupied_slot_is_not_flipped_again() {
        let slots = [unit_slot(1, SlotStatus::Occupied)];
        let vehicles = [rect(0.0, 0.0, 1.0, 1.0)];

        let plan = plan_occupancy(&slots, &vehicles, &GeoEngine, DEFAULT_OCCUPANCY_THRESHOLD);
        assert!(plan.occupy.is_empty());
        assert!(plan.release.is_empty());
    }

    #[test]
    fn slot_without_coordinates_is_skipped() {
        let slots = [slot(7, SlotStatus::Available, None)];
        let vehicles = [rect(0.0, 0.0, 1.0, 1.0)];

        let plan = plan_occupancy(&slots, &vehicles, &GeoEngine, DEFAULT_OCCUPANCY_THRESHOLD);
        assert_eq!(plan.skipped, vec![7]);
        assert!(plan.occupy.is_empty());
    }

    #[test]
    fn degenerate_vehicle_polygon_does_not_abort_the_pass() {
        let slots = [
            unit_slot(1, SlotStatus::Available),
            slot(2, SlotStatus::Available, Some(rect(2.0, 0.0, 3.0, 1.0))),
        ];
        // First vehicle is a two-point degenerate ring; second fully
        // covers slot 2.
        let vehicles = [
            Polygon::from_exterior(vec![[0.0, 0.0], [1.0, 1.0]]),
            rect(2.0, 0.0, 3.0, 1.0),
        ];

        let plan = plan_occupancy(&slots, &vehicles, &GeoEngine, DEFAULT_OCCUPANCY_THRESHOLD);
        assert_eq!(plan.occupy, vec![2]);
    }

    #[test]
    fn one_vehicle_can_occupy_multiple_overlapping_slots() {
        let slots = [
            unit_slot(1, SlotStatus::Available),
            slot(2, SlotStatus::Available, Some(rect(1.0, 0.0, 2.0, 1.0))),
        ];
        let vehicles = [rect(0.2, 0.0, 1.8, 1.0)];

        let plan = plan_occupancy(&slots, &vehicles, &GeoEngine, DEFAULT_OCCUPANCY_THRESHOLD);
        assert_eq!(plan.occupy, vec![1, 2]);
    }
}
