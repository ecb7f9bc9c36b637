//! Behaviour shared by room and zone climates.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use multiclimate_domain::climate::{
    ClimateFeatures, DeviceInfo, HvacAction, HvacMode, Preset, TemperatureUnit,
};
use multiclimate_domain::component::ComponentRef;
use multiclimate_domain::error::MultiClimateError;
use multiclimate_domain::mode::ActiveMode;
use multiclimate_domain::service::DEFAULT_QUICK_VETO_DURATION;

use crate::ports::{HeatingApi, StateSource};

/// Integration domain used in unique ids and device identifiers.
pub const INTEGRATION_DOMAIN: &str = "multimatic";

/// Manufacturer reported in device info.
pub const MANUFACTURER: &str = "Vaillant";

/// Platform domain of every entity built here.
pub const CLIMATE_DOMAIN: &str = "climate";

/// State and plumbing common to both climate variants.
pub struct ClimateBase<A, S> {
    api: Arc<A>,
    state: Arc<S>,
    unique_id: String,
    target: ComponentRef,
}

impl<A: HeatingApi, S: StateSource> ClimateBase<A, S> {
    /// `comp_id` is what the entity id is derived from: the room name for
    /// rooms, the zone id for zones.
    pub fn new(api: Arc<A>, state: Arc<S>, comp_id: &str, target: ComponentRef) -> Self {
        Self {
            api,
            state,
            unique_id: entity_id_for(comp_id),
            target,
        }
    }

    /// Also the entity id entity services are routed by.
    #[must_use]
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    #[must_use]
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Mode in effect right now, as resolved by the vendor API.
    #[must_use]
    pub fn active_mode(&self) -> Option<ActiveMode> {
        self.api.active_mode(&self.target)
    }

    #[must_use]
    pub fn temperature_unit(&self) -> TemperatureUnit {
        TemperatureUnit::Celsius
    }

    #[must_use]
    pub fn supported_features(&self) -> ClimateFeatures {
        ClimateFeatures::TARGET_TEMPERATURE | ClimateFeatures::PRESET_MODE
    }

    /// Temporarily override the target temperature.
    ///
    /// # Errors
    ///
    /// Propagates the vendor API error unchanged.
    #[tracing::instrument(skip(self), fields(entity_id = %self.unique_id))]
    pub async fn set_quick_veto(
        &self,
        temperature: f64,
        duration: Option<u16>,
    ) -> Result<(), MultiClimateError> {
        let duration = duration.unwrap_or(DEFAULT_QUICK_VETO_DURATION);
        self.api
            .set_quick_veto(&self.target, temperature, duration)
            .await
    }

    /// Cancel a running quick veto.
    ///
    /// # Errors
    ///
    /// Propagates the vendor API error unchanged.
    #[tracing::instrument(skip(self), fields(entity_id = %self.unique_id))]
    pub async fn remove_quick_veto(&self) -> Result<(), MultiClimateError> {
        self.api.remove_quick_veto(&self.target).await
    }
}

/// Build `climate.<slug>` from a vendor identifier or name.
#[must_use]
pub fn entity_id_for(comp_id: &str) -> String {
    format!("{CLIMATE_DOMAIN}.{}", slugify(comp_id))
}

fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    for c in value.trim().chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    let slug = slug.trim_matches('_');
    if slug.is_empty() {
        "unknown".to_string()
    } else {
        slug.to_string()
    }
}

/// Everything the host reads from a climate entity, in one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClimateSnapshot {
    pub unique_id: String,
    pub name: Option<String>,
    pub available: bool,
    pub hvac_mode: Option<HvacMode>,
    pub hvac_modes: Vec<HvacMode>,
    pub hvac_action: Option<HvacAction>,
    pub preset_mode: Option<Preset>,
    pub preset_modes: Vec<Preset>,
    pub current_temperature: Option<f64>,
    pub target_temperature: Option<f64>,
    pub current_humidity: Option<i64>,
    pub min_temp: f64,
    pub max_temp: f64,
    pub temperature_unit: TemperatureUnit,
    pub supported_features: ClimateFeatures,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_info: Option<DeviceInfo>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_state_attributes: BTreeMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_slugify_room_names() {
        assert_eq!(entity_id_for("Living Room"), "climate.living_room");
        assert_eq!(entity_id_for("  Kid's bedroom #2 "), "climate.kid_s_bedroom_2");
    }

    #[test]
    fn should_slugify_zone_ids() {
        assert_eq!(entity_id_for("Control_ZO1"), "climate.control_zo1");
    }

    #[test]
    fn should_fall_back_for_unsluggable_names() {
        assert_eq!(entity_id_for("***"), "climate.unknown");
    }
}
