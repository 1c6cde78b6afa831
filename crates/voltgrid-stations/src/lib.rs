//! voltgrid-stations
//!
//! Registry of physical charging stations. Enforces one station per owner
//! and one station per location through two auxiliary indexes, gates every
//! mutation on the station owner or the registry admin, and collects a
//! registration fee over the host's settlement rail.

pub mod registry;
pub mod settlement;

pub use registry::{Station, StationRegistry};
pub use settlement::{FeeLog, FeeTransfer, SettlementRail};
