//! Climate entities built from vendor rooms and zones.
//!
//! - [`mapping`]: vendor mode ⇄ HVAC mode + preset tables
//! - [`supported`]: capability pruning of the supported lists
//! - [`entity`]: base shared by both variants, and [`ClimateSnapshot`]
//! - [`room`] / [`zone`]: the two entity variants
//! - [`platform`]: setup and entity-service routing

pub mod entity;
pub mod mapping;
pub mod platform;
pub mod room;
pub mod supported;
pub mod zone;

pub use entity::ClimateSnapshot;
pub use platform::{Climate, ClimatePlatform};
pub use room::RoomClimate;
pub use zone::ZoneClimate;
