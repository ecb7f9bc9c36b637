//! Seed of the virtual installation.

use std::collections::HashSet;

use multiclimate_domain::component::{Room, RoomDevice, Zone, ZoneCooling};
use multiclimate_domain::error::{MultiClimateError, ValidationError};
use multiclimate_domain::mode::{ActiveFunction, OperatingMode};
use serde::Deserialize;

use crate::error::VirtualError;

/// Rooms, zones and ventilation the virtual installation starts with.
///
/// Deserialised from the `[installation]` table of the daemon configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct VirtualConfig {
    pub zones: Vec<Zone>,
    pub rooms: Vec<Room>,
    /// Whether a ventilation unit is installed.
    pub ventilation: bool,
}

impl VirtualConfig {
    /// A small installation: one cooling-capable zone, one rbr zone with two
    /// rooms and a ventilation unit.
    ///
    /// # Errors
    ///
    /// Returns a validation error if a builder rejects the fixture.
    pub fn demo() -> Result<Self, MultiClimateError> {
        let ground_floor = Zone::builder()
            .id("Control_ZO1")
            .name("Ground floor")
            .temperature(20.5)
            .active_function(ActiveFunction::Heating)
            .operating_mode(OperatingMode::Auto)
            .targets(21.0, 17.0)
            .cooling(ZoneCooling {
                operating_mode: OperatingMode::Off,
                target: 24.0,
            })
            .build()?;
        let first_floor = Zone::builder()
            .id("Control_ZO2")
            .name("First floor")
            .rbr(true)
            .active_function(ActiveFunction::Standby)
            .build()?;

        let bedroom = Room::builder()
            .id("1")
            .name("Bedroom")
            .temperature(18.5)
            .humidity(52.0)
            .target(19.0)
            .device(RoomDevice {
                name: "Bedroom thermostat".to_string(),
                sgtin: "SGTIN-0001".to_string(),
                device_type: "VR50".to_string(),
            })
            .build()?;
        let bathroom = Room::builder()
            .id("2")
            .name("Bathroom")
            .temperature(21.0)
            .target(22.0)
            .operating_mode(OperatingMode::Manual)
            .build()?;

        Ok(Self {
            zones: vec![ground_floor, first_floor],
            rooms: vec![bedroom, bathroom],
            ventilation: true,
        })
    }

    /// Whether nothing was configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty() && self.rooms.is_empty()
    }

    /// Check every component and reject duplicated identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`VirtualError::Domain`] wrapping the first violation found.
    pub fn validate(&self) -> Result<(), VirtualError> {
        let mut zone_ids = HashSet::new();
        for zone in &self.zones {
            zone.validate().map_err(VirtualError::Domain)?;
            if !zone_ids.insert(zone.id.as_str()) {
                return Err(duplicate(zone.id.as_str()));
            }
        }
        let mut room_ids = HashSet::new();
        for room in &self.rooms {
            room.validate().map_err(VirtualError::Domain)?;
            if !room_ids.insert(room.id.as_str()) {
                return Err(duplicate(room.id.as_str()));
            }
        }
        Ok(())
    }
}

fn duplicate(id: &str) -> VirtualError {
    VirtualError::Domain(
        ValidationError::NotAllowed {
            field: "id",
            value: id.to_string(),
        }
        .into(),
    )
}
