//! Translation tables between vendor modes and host HVAC mode + preset.
//!
//! One table per device variant and firmware family:
//!
//! | table | used by |
//! |-------|---------|
//! | [`ROOM`] | every room |
//! | [`ZONE_MULTIMATIC`] | zones on `multimatic` controllers |
//! | [`ZONE_SENSO`] | zones on `senso` controllers |
//!
//! A vendor mode maps to a preset and, for some modes, an HVAC mode. Modes
//! without an HVAC mode are resolved by the entity from what the equipment
//! is currently doing.

use multiclimate_domain::climate::{HvacAction, HvacMode, Preset};
use multiclimate_domain::mode::{ActiveFunction, Mode, OperatingMode, QuickMode};
use multiclimate_domain::system::SystemApplication;

/// Host-side view of a vendor mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostState {
    pub hvac_mode: Option<HvacMode>,
    pub preset: Preset,
}

/// Bidirectional lookup between vendor modes and host modes.
#[derive(Debug)]
pub struct ModeTable {
    name: &'static str,
    to_host: &'static [(Mode, Option<HvacMode>, Preset)],
    hvac_to_vendor: &'static [(HvacMode, Mode)],
    preset_to_vendor: &'static [(Preset, Mode)],
}

impl ModeTable {
    /// Zone table for the given firmware family.
    #[must_use]
    pub fn for_zone(application: SystemApplication) -> &'static Self {
        match application {
            SystemApplication::Multimatic => &ZONE_MULTIMATIC,
            SystemApplication::Senso => &ZONE_SENSO,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Host state for a vendor mode, or `None` when the table has no entry.
    #[must_use]
    pub fn host_state(&self, mode: Mode) -> Option<HostState> {
        self.to_host
            .iter()
            .find(|(vendor, _, _)| *vendor == mode)
            .map(|&(_, hvac_mode, preset)| HostState { hvac_mode, preset })
    }

    #[must_use]
    pub fn vendor_mode_for_hvac(&self, hvac_mode: HvacMode) -> Option<Mode> {
        self.hvac_to_vendor
            .iter()
            .find(|(host, _)| *host == hvac_mode)
            .map(|&(_, vendor)| vendor)
    }

    #[must_use]
    pub fn vendor_mode_for_preset(&self, preset: Preset) -> Option<Mode> {
        self.preset_to_vendor
            .iter()
            .find(|(host, _)| *host == preset)
            .map(|&(_, vendor)| vendor)
    }

    /// Every HVAC mode the host may request, in table order.
    #[must_use]
    pub fn hvac_modes(&self) -> Vec<HvacMode> {
        self.hvac_to_vendor.iter().map(|&(host, _)| host).collect()
    }

    /// Every preset the host may request, in table order.
    #[must_use]
    pub fn presets(&self) -> Vec<Preset> {
        self.preset_to_vendor.iter().map(|&(host, _)| host).collect()
    }

    /// Vendor modes the table knows how to display.
    pub fn vendor_modes(&self) -> impl Iterator<Item = Mode> + '_ {
        self.to_host.iter().map(|&(vendor, _, _)| vendor)
    }
}

/// HVAC action reported for a zone's active function.
#[must_use]
pub fn hvac_action_for(function: ActiveFunction) -> HvacAction {
    match function {
        ActiveFunction::Cooling => HvacAction::Cooling,
        ActiveFunction::Heating => HvacAction::Heating,
        ActiveFunction::Standby => HvacAction::Idle,
    }
}

const AUTO: Mode = Mode::Operating(OperatingMode::Auto);
const ON: Mode = Mode::Operating(OperatingMode::On);
const OFF: Mode = Mode::Operating(OperatingMode::Off);
const DAY: Mode = Mode::Operating(OperatingMode::Day);
const NIGHT: Mode = Mode::Operating(OperatingMode::Night);
const MANUAL: Mode = Mode::Operating(OperatingMode::Manual);
const QUICK_VETO: Mode = Mode::Operating(OperatingMode::QuickVeto);
const TIME_CONTROLLED: Mode = Mode::Operating(OperatingMode::TimeControlled);

const QM_VENTILATION_BOOST: Mode = Mode::Quick(QuickMode::VentilationBoost);
const QM_PARTY: Mode = Mode::Quick(QuickMode::Party);
const QM_ONE_DAY_AWAY: Mode = Mode::Quick(QuickMode::OneDayAway);
const QM_SYSTEM_OFF: Mode = Mode::Quick(QuickMode::SystemOff);
const QM_ONE_DAY_AT_HOME: Mode = Mode::Quick(QuickMode::OneDayAtHome);
const QM_COOLING_FOR_X_DAYS: Mode = Mode::Quick(QuickMode::CoolingForXDays);
const QM_HOLIDAY: Mode = Mode::Quick(QuickMode::Holiday);

pub static ROOM: ModeTable = ModeTable {
    name: "room",
    to_host: &[
        (AUTO, Some(HvacMode::Auto), Preset::Comfort),
        (OFF, Some(HvacMode::Off), Preset::None),
        (QUICK_VETO, None, Preset::QuickVeto),
        (QM_SYSTEM_OFF, Some(HvacMode::Off), Preset::SystemOff),
        (QM_HOLIDAY, Some(HvacMode::Off), Preset::Holiday),
        (MANUAL, None, Preset::Manual),
    ],
    hvac_to_vendor: &[(HvacMode::Auto, AUTO), (HvacMode::Off, OFF)],
    preset_to_vendor: &[
        (Preset::Comfort, AUTO),
        (Preset::Manual, MANUAL),
        (Preset::SystemOff, QM_SYSTEM_OFF),
    ],
};

pub static ZONE_MULTIMATIC: ModeTable = ModeTable {
    name: "zone/multimatic",
    to_host: &[
        (AUTO, Some(HvacMode::Auto), Preset::Comfort),
        (DAY, None, Preset::Day),
        (NIGHT, None, Preset::Sleep),
        (OFF, Some(HvacMode::Off), Preset::None),
        (ON, None, Preset::CoolingOn),
        (QUICK_VETO, None, Preset::QuickVeto),
        (QM_ONE_DAY_AT_HOME, Some(HvacMode::Auto), Preset::Home),
        (QM_PARTY, None, Preset::Party),
        (QM_VENTILATION_BOOST, Some(HvacMode::FanOnly), Preset::None),
        (QM_ONE_DAY_AWAY, Some(HvacMode::Off), Preset::Away),
        (QM_SYSTEM_OFF, Some(HvacMode::Off), Preset::SystemOff),
        (QM_HOLIDAY, Some(HvacMode::Off), Preset::Holiday),
        (QM_COOLING_FOR_X_DAYS, None, Preset::CoolingForXDays),
    ],
    hvac_to_vendor: &[
        (HvacMode::Auto, AUTO),
        (HvacMode::Off, OFF),
        (HvacMode::FanOnly, QM_VENTILATION_BOOST),
        (HvacMode::Cool, QM_COOLING_FOR_X_DAYS),
    ],
    preset_to_vendor: &[
        (Preset::Comfort, AUTO),
        (Preset::Day, DAY),
        (Preset::Sleep, NIGHT),
        (Preset::CoolingOn, ON),
        (Preset::Home, QM_ONE_DAY_AT_HOME),
        (Preset::Party, QM_PARTY),
        (Preset::Away, QM_ONE_DAY_AWAY),
        (Preset::SystemOff, QM_SYSTEM_OFF),
        (Preset::CoolingForXDays, QM_COOLING_FOR_X_DAYS),
    ],
};

pub static ZONE_SENSO: ModeTable = ModeTable {
    name: "zone/senso",
    to_host: &[
        (TIME_CONTROLLED, Some(HvacMode::Auto), Preset::Comfort),
        (DAY, None, Preset::Day),
        (NIGHT, None, Preset::Sleep),
        (OFF, Some(HvacMode::Off), Preset::None),
        (MANUAL, None, Preset::CoolingOn),
        (QUICK_VETO, None, Preset::QuickVeto),
        (QM_ONE_DAY_AT_HOME, Some(HvacMode::Auto), Preset::Home),
        (QM_PARTY, None, Preset::Party),
        (QM_VENTILATION_BOOST, Some(HvacMode::FanOnly), Preset::None),
        (QM_ONE_DAY_AWAY, Some(HvacMode::Off), Preset::Away),
        (QM_SYSTEM_OFF, Some(HvacMode::Off), Preset::SystemOff),
        (QM_HOLIDAY, Some(HvacMode::Off), Preset::Holiday),
        (QM_COOLING_FOR_X_DAYS, None, Preset::CoolingForXDays),
    ],
    hvac_to_vendor: &[
        (HvacMode::Auto, TIME_CONTROLLED),
        (HvacMode::Off, OFF),
        (HvacMode::FanOnly, QM_VENTILATION_BOOST),
        (HvacMode::Cool, QM_COOLING_FOR_X_DAYS),
    ],
    preset_to_vendor: &[
        (Preset::Comfort, TIME_CONTROLLED),
        (Preset::Day, DAY),
        (Preset::Sleep, NIGHT),
        (Preset::CoolingOn, MANUAL),
        (Preset::Home, QM_ONE_DAY_AT_HOME),
        (Preset::Party, QM_PARTY),
        (Preset::Away, QM_ONE_DAY_AWAY),
        (Preset::SystemOff, QM_SYSTEM_OFF),
        (Preset::CoolingForXDays, QM_COOLING_FOR_X_DAYS),
    ],
};
