//! Vendor operating modes, quick modes, and the resolved active mode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Per-component operating mode as configured on the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperatingMode {
    Auto,
    On,
    Off,
    Day,
    Night,
    Manual,
    QuickVeto,
    TimeControlled,
}

impl OperatingMode {
    pub const ALL: [Self; 8] = [
        Self::Auto,
        Self::On,
        Self::Off,
        Self::Day,
        Self::Night,
        Self::Manual,
        Self::QuickVeto,
        Self::TimeControlled,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Auto => "AUTO",
            Self::On => "ON",
            Self::Off => "OFF",
            Self::Day => "DAY",
            Self::Night => "NIGHT",
            Self::Manual => "MANUAL",
            Self::QuickVeto => "QUICK_VETO",
            Self::TimeControlled => "TIME_CONTROLLED",
        }
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// System-wide, short-lived mode overriding every component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuickMode {
    #[serde(rename = "QM_HOTWATER_BOOST")]
    HotWaterBoost,
    #[serde(rename = "QM_VENTILATION_BOOST")]
    VentilationBoost,
    #[serde(rename = "QM_PARTY")]
    Party,
    #[serde(rename = "QM_ONE_DAY_AWAY")]
    OneDayAway,
    #[serde(rename = "QM_SYSTEM_OFF")]
    SystemOff,
    #[serde(rename = "QM_ONE_DAY_AT_HOME")]
    OneDayAtHome,
    #[serde(rename = "QM_COOLING_FOR_X_DAYS")]
    CoolingForXDays,
    #[serde(rename = "QM_HOLIDAY")]
    Holiday,
}

impl QuickMode {
    pub const ALL: [Self; 8] = [
        Self::HotWaterBoost,
        Self::VentilationBoost,
        Self::Party,
        Self::OneDayAway,
        Self::SystemOff,
        Self::OneDayAtHome,
        Self::CoolingForXDays,
        Self::Holiday,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::HotWaterBoost => "QM_HOTWATER_BOOST",
            Self::VentilationBoost => "QM_VENTILATION_BOOST",
            Self::Party => "QM_PARTY",
            Self::OneDayAway => "QM_ONE_DAY_AWAY",
            Self::SystemOff => "QM_SYSTEM_OFF",
            Self::OneDayAtHome => "QM_ONE_DAY_AT_HOME",
            Self::CoolingForXDays => "QM_COOLING_FOR_X_DAYS",
            Self::Holiday => "QM_HOLIDAY",
        }
    }

    /// Names accepted by the `set_quick_mode` service.
    pub const NAMES: [&'static str; 8] = [
        Self::HotWaterBoost.name(),
        Self::VentilationBoost.name(),
        Self::Party.name(),
        Self::OneDayAway.name(),
        Self::SystemOff.name(),
        Self::OneDayAtHome.name(),
        Self::CoolingForXDays.name(),
        Self::Holiday.name(),
    ];
}

impl fmt::Display for QuickMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for QuickMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|qm| qm.name() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "quick_mode",
                value: s.to_string(),
            })
    }
}

/// Either kind of vendor mode; what an [`ActiveMode`] reports as current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Mode {
    Operating(OperatingMode),
    Quick(QuickMode),
}

impl From<OperatingMode> for Mode {
    fn from(mode: OperatingMode) -> Self {
        Self::Operating(mode)
    }
}

impl From<QuickMode> for Mode {
    fn from(mode: QuickMode) -> Self {
        Self::Quick(mode)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operating(m) => m.fmt(f),
            Self::Quick(m) => m.fmt(f),
        }
    }
}

/// The mode currently in effect for a component, after holiday, quick mode
/// and quick veto precedence has been resolved by the vendor API.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveMode {
    pub current: Mode,
    /// Target temperature in °C.
    pub target: f64,
    /// Day count for [`QuickMode::CoolingForXDays`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

impl ActiveMode {
    #[must_use]
    pub fn new(current: impl Into<Mode>, target: f64) -> Self {
        Self {
            current: current.into(),
            target,
            duration: None,
        }
    }

    #[must_use]
    pub fn with_duration(mut self, duration: u32) -> Self {
        self.duration = Some(duration);
        self
    }

    #[must_use]
    pub fn is(&self, mode: impl Into<Mode>) -> bool {
        self.current == mode.into()
    }
}

/// What the zone's heat generator is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActiveFunction {
    Heating,
    Cooling,
    Standby,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_every_quick_mode_name() {
        for qm in QuickMode::ALL {
            assert_eq!(qm.name().parse::<QuickMode>().unwrap(), qm);
        }
    }

    #[test]
    fn should_reject_unknown_quick_mode_name() {
        let err = "QM_SAUNA".parse::<QuickMode>().unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotAllowed {
                field: "quick_mode",
                value: "QM_SAUNA".to_string(),
            }
        );
    }

    #[test]
    fn should_list_every_quick_mode_name() {
        for qm in QuickMode::ALL {
            assert!(QuickMode::NAMES.contains(&qm.name()));
        }
        assert!(QuickMode::NAMES.contains(&"QM_HOLIDAY"));
    }

    #[test]
    fn should_serialize_serde_names_equal_to_display() {
        for qm in QuickMode::ALL {
            let json = serde_json::to_string(&Mode::from(qm)).unwrap();
            assert_eq!(json, format!("\"{qm}\""));
        }
        for om in OperatingMode::ALL {
            let json = serde_json::to_string(&Mode::from(om)).unwrap();
            assert_eq!(json, format!("\"{om}\""));
        }
    }

    #[test]
    fn should_deserialize_untagged_mode() {
        let mode: Mode = serde_json::from_str("\"QM_PARTY\"").unwrap();
        assert_eq!(mode, Mode::Quick(QuickMode::Party));
        let mode: Mode = serde_json::from_str("\"TIME_CONTROLLED\"").unwrap();
        assert_eq!(mode, Mode::Operating(OperatingMode::TimeControlled));
    }

    #[test]
    fn should_compare_active_mode_against_either_kind() {
        let active = ActiveMode::new(QuickMode::CoolingForXDays, 24.0).with_duration(3);
        assert!(active.is(QuickMode::CoolingForXDays));
        assert!(!active.is(OperatingMode::Auto));
        assert_eq!(active.duration, Some(3));
    }
}
