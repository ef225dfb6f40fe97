//! Pure domain logic for the Parkview platform.
//!
//! This crate holds everything that can be reasoned about without a
//! database or an HTTP stack: shared id/timestamp aliases, the domain
//! error vocabulary, the tiered fee calculator, polygon geometry behind
//! a swappable engine trait, and the occupancy reconciliation planner.

pub mod error;
pub mod fees;
pub mod geometry;
pub mod occupancy;
pub mod parking;
pub mod roles;
pub mod status;
pub mod types;
