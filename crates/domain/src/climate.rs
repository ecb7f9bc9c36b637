//! Host climate vocabulary: HVAC modes, actions, presets, features.
//!
//! These are the values the home-automation platform understands. String
//! forms are the platform's own (`"fan_only"`, `"cooling_for_x_days"`, …).

use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Operation mode of a climate entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HvacMode {
    Off,
    Heat,
    Cool,
    HeatCool,
    Auto,
    Dry,
    FanOnly,
}

impl HvacMode {
    pub const ALL: [Self; 7] = [
        Self::Off,
        Self::Heat,
        Self::Cool,
        Self::HeatCool,
        Self::Auto,
        Self::Dry,
        Self::FanOnly,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Heat => "heat",
            Self::Cool => "cool",
            Self::HeatCool => "heat_cool",
            Self::Auto => "auto",
            Self::Dry => "dry",
            Self::FanOnly => "fan_only",
        }
    }
}

impl fmt::Display for HvacMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HvacMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "hvac_mode",
                value: s.to_string(),
            })
    }
}

/// What the equipment is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HvacAction {
    Off,
    Heating,
    Cooling,
    Drying,
    Idle,
    Fan,
}

impl fmt::Display for HvacAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Off => "off",
            Self::Heating => "heating",
            Self::Cooling => "cooling",
            Self::Drying => "drying",
            Self::Idle => "idle",
            Self::Fan => "fan",
        })
    }
}

/// Preset modes. The first five are platform-standard; the rest are
/// vendor-specific extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    None,
    Comfort,
    Home,
    Away,
    Sleep,
    Day,
    CoolingOn,
    CoolingForXDays,
    Manual,
    SystemOff,
    Party,
    Holiday,
    QuickVeto,
}

impl Preset {
    pub const ALL: [Self; 13] = [
        Self::None,
        Self::Comfort,
        Self::Home,
        Self::Away,
        Self::Sleep,
        Self::Day,
        Self::CoolingOn,
        Self::CoolingForXDays,
        Self::Manual,
        Self::SystemOff,
        Self::Party,
        Self::Holiday,
        Self::QuickVeto,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Comfort => "comfort",
            Self::Home => "home",
            Self::Away => "away",
            Self::Sleep => "sleep",
            Self::Day => "day",
            Self::CoolingOn => "cooling_on",
            Self::CoolingForXDays => "cooling_for_x_days",
            Self::Manual => "manual",
            Self::SystemOff => "system_off",
            Self::Party => "party",
            Self::Holiday => "holiday",
            Self::QuickVeto => "quick_veto",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "preset_mode",
                value: s.to_string(),
            })
    }
}

/// Bit set of optional climate capabilities, using the platform's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClimateFeatures(u32);

impl ClimateFeatures {
    pub const TARGET_TEMPERATURE: Self = Self(1);
    pub const PRESET_MODE: Self = Self(16);

    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ClimateFeatures {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TemperatureUnit {
    #[default]
    #[serde(rename = "°C")]
    Celsius,
}

/// Physical device an entity is attached to, as shown by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// `(integration domain, hardware id)` pair.
    pub identifier: (String, String),
    pub name: String,
    pub manufacturer: String,
    pub model: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_roundtrip_hvac_mode_names() {
        for mode in HvacMode::ALL {
            assert_eq!(mode.as_str().parse::<HvacMode>().unwrap(), mode);
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{mode}\""));
        }
    }

    #[test]
    fn should_roundtrip_preset_names() {
        for preset in Preset::ALL {
            assert_eq!(preset.as_str().parse::<Preset>().unwrap(), preset);
            let json = serde_json::to_string(&preset).unwrap();
            assert_eq!(json, format!("\"{preset}\""));
        }
    }

    #[test]
    fn should_reject_unknown_preset() {
        assert!("eco".parse::<Preset>().is_err());
    }

    #[test]
    fn should_combine_features() {
        let features = ClimateFeatures::TARGET_TEMPERATURE | ClimateFeatures::PRESET_MODE;
        assert_eq!(features.bits(), 17);
        assert!(features.contains(ClimateFeatures::PRESET_MODE));
        assert!(!ClimateFeatures::TARGET_TEMPERATURE.contains(features));
    }

    #[test]
    fn should_serialize_celsius_symbol() {
        let json = serde_json::to_string(&TemperatureUnit::Celsius).unwrap();
        assert_eq!(json, "\"°C\"");
    }
}
