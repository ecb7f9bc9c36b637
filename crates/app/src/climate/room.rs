//! Climate entity for a single room.
//!
//! Rooms only exist on room-by-room installations. Whether a room is being
//! heated is not reported per room: it is derived from the rbr zone the room
//! belongs to and from the room's own temperature.

use std::collections::BTreeMap;
use std::sync::Arc;

use multiclimate_domain::climate::{DeviceInfo, HvacAction, HvacMode, Preset};
use multiclimate_domain::component::{ComponentRef, Room, Zone};
use multiclimate_domain::error::{MultiClimateError, UnsupportedModeError};
use multiclimate_domain::id::{RoomId, ZoneId};
use multiclimate_domain::mode::{ActiveFunction, ActiveMode, OperatingMode};

use super::entity::{ClimateBase, ClimateSnapshot, INTEGRATION_DOMAIN, MANUFACTURER};
use super::mapping::{HostState, ROOM};
use super::supported::SupportedModes;
use crate::ports::{HeatingApi, StateSource};

pub struct RoomClimate<A, S> {
    base: ClimateBase<A, S>,
    room_id: RoomId,
    zone_id: Option<ZoneId>,
    supported: SupportedModes,
}

impl<A: HeatingApi, S: StateSource> RoomClimate<A, S> {
    /// `zone` is the rbr zone the room is heated through, if any.
    pub fn new(api: Arc<A>, state: Arc<S>, room: &Room, zone: Option<&Zone>) -> Self {
        Self {
            base: ClimateBase::new(api, state, &room.name, ComponentRef::Room(room.id.clone())),
            room_id: room.id.clone(),
            zone_id: zone.map(|z| z.id.clone()),
            supported: SupportedModes::from_table(&ROOM),
        }
    }

    #[must_use]
    pub fn base(&self) -> &ClimateBase<A, S> {
        &self.base
    }

    #[must_use]
    pub fn unique_id(&self) -> &str {
        self.base.unique_id()
    }

    /// Latest record of the room, `None` once it disappeared.
    #[must_use]
    pub fn component(&self) -> Option<Room> {
        self.base.state().find_room(&self.room_id)
    }

    #[must_use]
    pub fn zone(&self) -> Option<Zone> {
        self.zone_id
            .as_ref()
            .and_then(|id| self.base.state().find_zone(id))
    }

    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.component().map(|room| room.name)
    }

    #[must_use]
    pub fn available(&self) -> bool {
        self.component().is_some()
    }

    fn active_mode(&self) -> Option<ActiveMode> {
        if !self.available() {
            return None;
        }
        self.base.active_mode()
    }

    fn host_state(&self, active: &ActiveMode) -> Option<HostState> {
        let state = ROOM.host_state(active.current);
        if state.is_none() {
            tracing::warn!(
                entity_id = self.unique_id(),
                mode = %active.current,
                "room mode has no climate mapping"
            );
        }
        state
    }

    #[must_use]
    pub fn current_temperature(&self) -> Option<f64> {
        self.component().and_then(|room| room.temperature)
    }

    #[must_use]
    pub fn target_temperature(&self) -> Option<f64> {
        self.active_mode().map(|active| active.target)
    }

    #[must_use]
    pub fn min_temp(&self) -> f64 {
        Room::MIN_TARGET_TEMP
    }

    #[must_use]
    pub fn max_temp(&self) -> f64 {
        Room::MAX_TARGET_TEMP
    }

    #[must_use]
    pub fn current_humidity(&self) -> Option<i64> {
        self.component().as_ref().and_then(humidity_of)
    }

    #[must_use]
    pub fn hvac_mode(&self) -> Option<HvacMode> {
        let room = self.component()?;
        let active = self.base.active_mode()?;
        let state = self.host_state(&active)?;
        hvac_mode_for(&active, state, self.action_for(&room, Some(&active)))
    }

    #[must_use]
    pub fn hvac_modes(&self) -> Vec<HvacMode> {
        self.supported.hvac_modes().to_vec()
    }

    #[must_use]
    pub fn preset_mode(&self) -> Option<Preset> {
        let active = self.active_mode()?;
        self.host_state(&active).map(|state| state.preset)
    }

    #[must_use]
    pub fn preset_modes(&self) -> Vec<Preset> {
        self.supported.presets_for(self.active_mode().as_ref())
    }

    #[must_use]
    pub fn hvac_action(&self) -> Option<HvacAction> {
        let room = self.component()?;
        Some(self.action_for(&room, self.base.active_mode().as_ref()))
    }

    fn action_for(&self, room: &Room, active: Option<&ActiveMode>) -> HvacAction {
        let heating = self
            .zone()
            .is_some_and(|zone| zone.active_function == Some(ActiveFunction::Heating));
        let below_target = match (room.temperature, active) {
            (Some(current), Some(active)) => current < active.target,
            _ => false,
        };
        if heating && below_target {
            HvacAction::Heating
        } else {
            HvacAction::Idle
        }
    }

    #[must_use]
    pub fn device_info(&self) -> Option<DeviceInfo> {
        self.component().as_ref().and_then(device_info_of)
    }

    /// # Errors
    ///
    /// Propagates the vendor API error unchanged.
    #[tracing::instrument(skip(self), fields(entity_id = self.unique_id()))]
    pub async fn set_temperature(&self, temperature: f64) -> Result<(), MultiClimateError> {
        self.base
            .api()
            .set_room_target_temperature(&self.room_id, temperature)
            .await
    }

    /// # Errors
    ///
    /// Returns [`MultiClimateError::UnsupportedMode`] for modes the room does
    /// not offer, otherwise the vendor API error unchanged.
    #[tracing::instrument(skip(self), fields(entity_id = self.unique_id()))]
    pub async fn set_hvac_mode(&self, hvac_mode: HvacMode) -> Result<(), MultiClimateError> {
        let mode = ROOM
            .vendor_mode_for_hvac(hvac_mode)
            .filter(|_| self.supported.supports_hvac_mode(hvac_mode))
            .ok_or_else(|| UnsupportedModeError {
                entity_id: self.unique_id().to_string(),
                kind: "hvac mode",
                value: hvac_mode.to_string(),
            })?;
        self.base
            .api()
            .set_room_operating_mode(&self.room_id, mode)
            .await
    }

    /// # Errors
    ///
    /// Returns [`MultiClimateError::UnsupportedMode`] for presets the room
    /// does not offer, otherwise the vendor API error unchanged.
    #[tracing::instrument(skip(self), fields(entity_id = self.unique_id()))]
    pub async fn set_preset_mode(&self, preset: Preset) -> Result<(), MultiClimateError> {
        let mode = ROOM
            .vendor_mode_for_preset(preset)
            .filter(|_| self.supported.supports_preset(preset))
            .ok_or_else(|| UnsupportedModeError {
                entity_id: self.unique_id().to_string(),
                kind: "preset",
                value: preset.to_string(),
            })?;
        self.base
            .api()
            .set_room_operating_mode(&self.room_id, mode)
            .await
    }

    /// Every property read from a single lookup of the room and its mode.
    #[must_use]
    pub fn snapshot(&self) -> ClimateSnapshot {
        let room = self.component();
        let active = room.as_ref().and_then(|_| self.base.active_mode());
        let state = active.as_ref().and_then(|active| self.host_state(active));
        let hvac_action = room
            .as_ref()
            .map(|room| self.action_for(room, active.as_ref()));
        let hvac_mode = match (&active, state, hvac_action) {
            (Some(active), Some(state), Some(action)) => hvac_mode_for(active, state, action),
            _ => None,
        };

        ClimateSnapshot {
            unique_id: self.unique_id().to_string(),
            name: room.as_ref().map(|room| room.name.clone()),
            available: room.is_some(),
            hvac_mode,
            hvac_modes: self.hvac_modes(),
            hvac_action,
            preset_mode: state.map(|state| state.preset),
            preset_modes: self.supported.presets_for(active.as_ref()),
            current_temperature: room.as_ref().and_then(|room| room.temperature),
            target_temperature: active.as_ref().map(|active| active.target),
            current_humidity: room.as_ref().and_then(humidity_of),
            min_temp: self.min_temp(),
            max_temp: self.max_temp(),
            temperature_unit: self.base.temperature_unit(),
            supported_features: self.base.supported_features(),
            device_info: room.as_ref().and_then(device_info_of),
            extra_state_attributes: BTreeMap::new(),
        }
    }
}

/// `Heat` is reported for manual and quick veto modes while the room is
/// actually being heated; those modes carry no HVAC mode of their own.
fn hvac_mode_for(active: &ActiveMode, state: HostState, action: HvacAction) -> Option<HvacMode> {
    if state.hvac_mode.is_none()
        && (active.is(OperatingMode::Manual) || active.is(OperatingMode::QuickVeto))
        && action == HvacAction::Heating
    {
        return Some(HvacMode::Heat);
    }
    state.hvac_mode
}

#[allow(clippy::cast_possible_truncation)]
fn humidity_of(room: &Room) -> Option<i64> {
    room.humidity.map(|humidity| humidity.trunc() as i64)
}

/// Only rooms with exactly one device are attached to it.
fn device_info_of(room: &Room) -> Option<DeviceInfo> {
    let [device] = room.devices.as_slice() else {
        return None;
    };
    Some(DeviceInfo {
        identifier: (INTEGRATION_DOMAIN.to_string(), device.sgtin.clone()),
        name: device.name.clone(),
        manufacturer: MANUFACTURER.to_string(),
        model: device.device_type.clone(),
    })
}
