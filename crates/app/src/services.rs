//! Application services: use-case implementations.
//!
//! Service structs accept port implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod handler;

pub use handler::ServiceHandler;
