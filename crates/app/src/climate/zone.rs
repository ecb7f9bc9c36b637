//! Climate entity for a zone that is not controlled room by room.

use std::collections::BTreeMap;
use std::sync::Arc;

use multiclimate_domain::climate::{HvacAction, HvacMode, Preset};
use multiclimate_domain::component::{ComponentRef, Zone};
use multiclimate_domain::error::{MultiClimateError, UnsupportedModeError};
use multiclimate_domain::id::ZoneId;
use multiclimate_domain::mode::{ActiveMode, Mode, OperatingMode, QuickMode};
use multiclimate_domain::system::SystemApplication;

use super::entity::{ClimateBase, ClimateSnapshot};
use super::mapping::{HostState, ModeTable, hvac_action_for};
use super::supported::SupportedModes;
use crate::ports::{HeatingApi, StateSource};

/// Extra attribute carrying the day count of a running cooling quick mode.
pub const ATTR_COOLING_FOR_X_DAYS_DURATION: &str = "cooling_for_x_days_duration";

pub struct ZoneClimate<A, S> {
    base: ClimateBase<A, S>,
    zone_id: ZoneId,
    table: &'static ModeTable,
    supported: SupportedModes,
}

impl<A: HeatingApi, S: StateSource> ZoneClimate<A, S> {
    /// Supported modes are fixed here from the zone's cooling circuit and the
    /// installation's ventilation unit.
    pub fn new(api: Arc<A>, state: Arc<S>, zone: &Zone, application: SystemApplication) -> Self {
        let table = ModeTable::for_zone(application);
        let supported = SupportedModes::for_zone(table, zone.can_cool(), state.has_ventilation());
        Self {
            base: ClimateBase::new(
                api,
                state,
                zone.id.as_str(),
                ComponentRef::Zone(zone.id.clone()),
            ),
            zone_id: zone.id.clone(),
            table,
            supported,
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

    #[must_use]
    pub fn component(&self) -> Option<Zone> {
        self.base.state().find_zone(&self.zone_id)
    }

    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.component().map(|zone| zone.name)
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
        let state = self.table.host_state(active.current);
        if state.is_none() {
            tracing::warn!(
                entity_id = self.unique_id(),
                table = self.table.name(),
                mode = %active.current,
                "zone mode has no climate mapping"
            );
        }
        state
    }

    #[must_use]
    pub fn current_temperature(&self) -> Option<f64> {
        self.component().and_then(|zone| zone.temperature)
    }

    #[must_use]
    pub fn target_temperature(&self) -> Option<f64> {
        self.active_mode().map(|active| active.target)
    }

    #[must_use]
    pub fn min_temp(&self) -> f64 {
        Zone::MIN_TARGET_HEATING_TEMP
    }

    #[must_use]
    pub fn max_temp(&self) -> f64 {
        Zone::MAX_TARGET_TEMP
    }

    #[must_use]
    pub fn hvac_action(&self) -> Option<HvacAction> {
        self.component()?.active_function.map(hvac_action_for)
    }

    #[must_use]
    pub fn hvac_mode(&self) -> Option<HvacMode> {
        let zone = self.component()?;
        let active = self.base.active_mode()?;
        let state = self.host_state(&active);
        Some(hvac_mode_for(
            &active,
            state,
            zone.active_function.map(hvac_action_for),
        ))
    }

    #[must_use]
    pub fn hvac_modes(&self) -> Vec<HvacMode> {
        self.supported.hvac_modes().to_vec()
    }

    #[must_use]
    pub fn preset_mode(&self) -> Option<Preset> {
        let active = self.active_mode()?;
        Some(preset_for(self.host_state(&active)))
    }

    #[must_use]
    pub fn preset_modes(&self) -> Vec<Preset> {
        self.supported.presets_for(self.active_mode().as_ref())
    }

    #[must_use]
    pub fn extra_state_attributes(&self) -> BTreeMap<String, serde_json::Value> {
        attributes_for(self.active_mode().as_ref())
    }

    /// Setting the temperature the zone already targets is a no-op.
    ///
    /// # Errors
    ///
    /// Propagates the vendor API error unchanged.
    #[tracing::instrument(skip(self), fields(entity_id = self.unique_id()))]
    pub async fn set_temperature(&self, temperature: f64) -> Result<(), MultiClimateError> {
        if let Some(target) = self.target_temperature()
            && (target - temperature).abs() < f64::EPSILON
        {
            tracing::debug!(temperature, "nothing to do");
            return Ok(());
        }
        self.base
            .api()
            .set_zone_target_temperature(&self.zone_id, temperature)
            .await
    }

    /// # Errors
    ///
    /// Returns [`MultiClimateError::UnsupportedMode`] for modes pruned from
    /// this zone, otherwise the vendor API error unchanged.
    #[tracing::instrument(skip(self), fields(entity_id = self.unique_id()))]
    pub async fn set_hvac_mode(&self, hvac_mode: HvacMode) -> Result<(), MultiClimateError> {
        let mode = self
            .table
            .vendor_mode_for_hvac(hvac_mode)
            .filter(|_| self.supported.supports_hvac_mode(hvac_mode))
            .ok_or_else(|| UnsupportedModeError {
                entity_id: self.unique_id().to_string(),
                kind: "hvac mode",
                value: hvac_mode.to_string(),
            })?;
        self.base
            .api()
            .set_zone_operating_mode(&self.zone_id, mode)
            .await
    }

    /// # Errors
    ///
    /// Returns [`MultiClimateError::UnsupportedMode`] for presets pruned from
    /// this zone, otherwise the vendor API error unchanged.
    #[tracing::instrument(skip(self), fields(entity_id = self.unique_id()))]
    pub async fn set_preset_mode(&self, preset: Preset) -> Result<(), MultiClimateError> {
        let mode = self
            .table
            .vendor_mode_for_preset(preset)
            .filter(|_| self.supported.supports_preset(preset))
            .ok_or_else(|| UnsupportedModeError {
                entity_id: self.unique_id().to_string(),
                kind: "preset",
                value: preset.to_string(),
            })?;
        self.base
            .api()
            .set_zone_operating_mode(&self.zone_id, mode)
            .await
    }

    #[must_use]
    pub fn snapshot(&self) -> ClimateSnapshot {
        let zone = self.component();
        let active = zone.as_ref().and_then(|_| self.base.active_mode());
        let state = active.as_ref().and_then(|active| self.host_state(active));
        let hvac_action = zone
            .as_ref()
            .and_then(|zone| zone.active_function)
            .map(hvac_action_for);

        ClimateSnapshot {
            unique_id: self.unique_id().to_string(),
            name: zone.as_ref().map(|zone| zone.name.clone()),
            available: zone.is_some(),
            hvac_mode: active
                .as_ref()
                .map(|active| hvac_mode_for(active, state, hvac_action)),
            hvac_modes: self.hvac_modes(),
            hvac_action,
            preset_mode: active.as_ref().map(|_| preset_for(state)),
            preset_modes: self.supported.presets_for(active.as_ref()),
            current_temperature: zone.as_ref().and_then(|zone| zone.temperature),
            target_temperature: active.as_ref().map(|active| active.target),
            current_humidity: None,
            min_temp: self.min_temp(),
            max_temp: self.max_temp(),
            temperature_unit: self.base.temperature_unit(),
            supported_features: self.base.supported_features(),
            device_info: None,
            extra_state_attributes: attributes_for(active.as_ref()),
        }
    }
}

/// Modes without an HVAC mode of their own report `Heat` or `Cool` while
/// the zone is actually heating or cooling, `Off` otherwise. So do modes
/// missing from the table.
fn hvac_mode_for(
    active: &ActiveMode,
    state: Option<HostState>,
    action: Option<HvacAction>,
) -> HvacMode {
    let Some(state) = state else {
        return HvacMode::Off;
    };
    if let Some(hvac_mode) = state.hvac_mode {
        return hvac_mode;
    }

    let heating_mode = matches!(
        active.current,
        Mode::Operating(OperatingMode::Day | OperatingMode::Night | OperatingMode::QuickVeto)
            | Mode::Quick(QuickMode::Party)
    );
    let cooling_preset = matches!(state.preset, Preset::CoolingOn | Preset::CoolingForXDays);

    if heating_mode && action == Some(HvacAction::Heating) {
        HvacMode::Heat
    } else if cooling_preset && action == Some(HvacAction::Cooling) {
        HvacMode::Cool
    } else {
        HvacMode::Off
    }
}

fn preset_for(state: Option<HostState>) -> Preset {
    state.map_or(Preset::None, |state| state.preset)
}

fn attributes_for(active: Option<&ActiveMode>) -> BTreeMap<String, serde_json::Value> {
    let mut attributes = BTreeMap::new();
    if let Some(active) = active
        && active.is(QuickMode::CoolingForXDays)
    {
        attributes.insert(
            ATTR_COOLING_FOR_X_DAYS_DURATION.to_string(),
            serde_json::json!(active.duration),
        );
    }
    attributes
}
