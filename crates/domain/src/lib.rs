//! # multiclimate-domain
//!
//! Pure domain model for the multiclimate heating integration.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, controller time
//! - Define the **vendor model**: rooms, zones, operating modes, quick modes,
//!   quick vetoes, holiday mode, the resolved active mode
//! - Define the **host climate vocabulary**: HVAC modes and actions, presets,
//!   supported features
//! - Define **Services** (`set_quick_veto`, `set_holiday_mode`, …) with their
//!   declarative schemas
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod climate;
pub mod component;
pub mod mode;
pub mod service;
pub mod system;
