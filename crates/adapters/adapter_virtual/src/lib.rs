//! # multiclimate-adapter-virtual
//!
//! Virtual heating installation: an in-memory stand-in for the vendor API
//! and the coordinator, used by the daemon and by tests.
//!
//! ## Behaviour
//!
//! | Port | Behaviour |
//! |------|-----------|
//! | `HeatingApi` | Applies every change to the in-memory rooms, zones and system state |
//! | `StateSource` | Returns the current rooms and zones |
//!
//! The active mode of a component is resolved with the controller's
//! precedence: holiday, quick mode, quick veto, then operating mode.
//!
//! ## Dependency rule
//!
//! Depends on `multiclimate-app` (port traits) and `multiclimate-domain` only.

mod config;
mod error;
mod installation;

pub use config::VirtualConfig;
pub use error::VirtualError;
pub use installation::{VentilationLevels, VirtualHeatingSystem};
