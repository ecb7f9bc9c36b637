//! # multiclimate-app
//!
//! Application layer: climate entities, service dispatch and **port
//! definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `HeatingApi`: mode changes, quick veto, quick/holiday mode, active-mode resolution
//!   - `StateSource`: the coordinator's cached rooms, zones and ventilation flag
//! - Translate vendor modes into HVAC mode + preset and back (`climate::mapping`)
//! - Build room and zone climate entities and route entity services to them
//! - Validate and dispatch service calls (`ServiceHandler`)
//!
//! ## Dependency rule
//! Depends on `multiclimate-domain` only. Never imports adapter crates.
//! Adapters depend on *this* crate, not the reverse.

pub mod climate;
pub mod ports;
pub mod services;

#[cfg(test)]
mod testing;
