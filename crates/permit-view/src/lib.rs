//! Read-only projections of a building-permit register for citizen lookups.

pub mod clock;
pub mod config;
pub mod errands;
pub mod error;
pub mod telemetry;
