//! Rooms and zones: the vendor's two heating-control granularities.
//!
//! These are read-only snapshots refreshed by the coordinator. Nothing in
//! the workspace mutates them; changes are requested through the vendor API.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{MultiClimateError, ValidationError};
use crate::id::{RoomId, ZoneId};
use crate::mode::{ActiveFunction, OperatingMode};

/// Temporary manual temperature override on a room or zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuickVeto {
    /// Target temperature in °C.
    pub target: f64,
    /// Remaining minutes, when the controller reports it.
    #[serde(default)]
    pub remaining_duration: Option<u16>,
}

/// A radio device (thermostat, valve) installed in a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDevice {
    pub name: String,
    /// Serialised global trade item number; stable hardware identifier.
    pub sgtin: String,
    pub device_type: String,
}

/// A single room of a room-by-room installation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    pub operating_mode: OperatingMode,
    /// Manual-mode target temperature in °C.
    pub target: f64,
    #[serde(default)]
    pub quick_veto: Option<QuickVeto>,
    #[serde(default)]
    pub devices: Vec<RoomDevice>,
}

impl Room {
    pub const MIN_TARGET_TEMP: f64 = 5.0;
    pub const MAX_TARGET_TEMP: f64 = 30.0;

    #[must_use]
    pub fn builder() -> RoomBuilder {
        RoomBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`MultiClimateError::Validation`] when `id` or `name` is
    /// empty.
    pub fn validate(&self) -> Result<(), MultiClimateError> {
        if self.id.as_str().is_empty() {
            return Err(ValidationError::EmptyId.into());
        }
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Room`].
#[derive(Debug, Default)]
pub struct RoomBuilder {
    id: Option<String>,
    name: Option<String>,
    temperature: Option<f64>,
    humidity: Option<f64>,
    operating_mode: Option<OperatingMode>,
    target: Option<f64>,
    quick_veto: Option<QuickVeto>,
    devices: Vec<RoomDevice>,
}

impl RoomBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    #[must_use]
    pub fn humidity(mut self, humidity: f64) -> Self {
        self.humidity = Some(humidity);
        self
    }

    #[must_use]
    pub fn operating_mode(mut self, mode: OperatingMode) -> Self {
        self.operating_mode = Some(mode);
        self
    }

    #[must_use]
    pub fn target(mut self, target: f64) -> Self {
        self.target = Some(target);
        self
    }

    #[must_use]
    pub fn quick_veto(mut self, quick_veto: QuickVeto) -> Self {
        self.quick_veto = Some(quick_veto);
        self
    }

    #[must_use]
    pub fn device(mut self, device: RoomDevice) -> Self {
        self.devices.push(device);
        self
    }

    /// Consume the builder, validate, and return a [`Room`].
    ///
    /// Defaults to `AUTO` at 20 °C.
    ///
    /// # Errors
    ///
    /// Returns [`MultiClimateError::Validation`] if the id or name is
    /// missing or empty.
    pub fn build(self) -> Result<Room, MultiClimateError> {
        let room = Room {
            id: RoomId::new(self.id.unwrap_or_default())?,
            name: self.name.unwrap_or_default(),
            temperature: self.temperature,
            humidity: self.humidity,
            operating_mode: self.operating_mode.unwrap_or(OperatingMode::Auto),
            target: self.target.unwrap_or(20.0),
            quick_veto: self.quick_veto,
            devices: self.devices,
        };
        room.validate()?;
        Ok(room)
    }
}

/// Cooling configuration of a zone; its presence means the zone can cool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneCooling {
    pub operating_mode: OperatingMode,
    /// Cooling target in °C.
    pub target: f64,
}

/// A heating circuit, optionally with cooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub name: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Room-by-room: control is delegated to the zone's rooms.
    #[serde(default)]
    pub rbr: bool,
    #[serde(default)]
    pub active_function: Option<ActiveFunction>,
    pub temperature: Option<f64>,
    pub operating_mode: OperatingMode,
    /// Day (comfort) target in °C.
    pub target_high: f64,
    /// Night (setback) target in °C.
    pub target_low: f64,
    #[serde(default)]
    pub cooling: Option<ZoneCooling>,
    #[serde(default)]
    pub quick_veto: Option<QuickVeto>,
}

fn enabled_by_default() -> bool {
    true
}

impl Zone {
    pub const MIN_TARGET_HEATING_TEMP: f64 = 5.0;
    pub const MAX_TARGET_TEMP: f64 = 30.0;

    #[must_use]
    pub fn builder() -> ZoneBuilder {
        ZoneBuilder::default()
    }

    /// Whether the zone has a cooling circuit.
    #[must_use]
    pub fn can_cool(&self) -> bool {
        self.cooling.is_some()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`MultiClimateError::Validation`] when `id` or `name` is
    /// empty.
    pub fn validate(&self) -> Result<(), MultiClimateError> {
        if self.id.as_str().is_empty() {
            return Err(ValidationError::EmptyId.into());
        }
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Zone`].
#[derive(Debug)]
pub struct ZoneBuilder {
    id: Option<String>,
    name: Option<String>,
    enabled: bool,
    rbr: bool,
    active_function: Option<ActiveFunction>,
    temperature: Option<f64>,
    operating_mode: OperatingMode,
    target_high: f64,
    target_low: f64,
    cooling: Option<ZoneCooling>,
    quick_veto: Option<QuickVeto>,
}

impl Default for ZoneBuilder {
    fn default() -> Self {
        Self {
            id: None,
            name: None,
            enabled: true,
            rbr: false,
            active_function: None,
            temperature: None,
            operating_mode: OperatingMode::Auto,
            target_high: 20.0,
            target_low: 16.0,
            cooling: None,
            quick_veto: None,
        }
    }
}

impl ZoneBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn rbr(mut self, rbr: bool) -> Self {
        self.rbr = rbr;
        self
    }

    #[must_use]
    pub fn active_function(mut self, function: ActiveFunction) -> Self {
        self.active_function = Some(function);
        self
    }

    #[must_use]
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    #[must_use]
    pub fn operating_mode(mut self, mode: OperatingMode) -> Self {
        self.operating_mode = mode;
        self
    }

    #[must_use]
    pub fn targets(mut self, high: f64, low: f64) -> Self {
        self.target_high = high;
        self.target_low = low;
        self
    }

    #[must_use]
    pub fn cooling(mut self, cooling: ZoneCooling) -> Self {
        self.cooling = Some(cooling);
        self
    }

    #[must_use]
    pub fn quick_veto(mut self, quick_veto: QuickVeto) -> Self {
        self.quick_veto = Some(quick_veto);
        self
    }

    /// Consume the builder, validate, and return a [`Zone`].
    ///
    /// # Errors
    ///
    /// Returns [`MultiClimateError::Validation`] if the id or name is
    /// missing or empty.
    pub fn build(self) -> Result<Zone, MultiClimateError> {
        let zone = Zone {
            id: ZoneId::new(self.id.unwrap_or_default())?,
            name: self.name.unwrap_or_default(),
            enabled: self.enabled,
            rbr: self.rbr,
            active_function: self.active_function,
            temperature: self.temperature,
            operating_mode: self.operating_mode,
            target_high: self.target_high,
            target_low: self.target_low,
            cooling: self.cooling,
            quick_veto: self.quick_veto,
        };
        zone.validate()?;
        Ok(zone)
    }
}

/// Handle identifying the component an API call acts on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ComponentRef {
    Room(RoomId),
    Zone(ZoneId),
}

impl fmt::Display for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Room(id) => write!(f, "room {id}"),
            Self::Zone(id) => write!(f, "zone {id}"),
        }
    }
}
