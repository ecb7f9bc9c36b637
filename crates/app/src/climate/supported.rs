//! Supported HVAC modes and presets, pruned by device capability.

use multiclimate_domain::climate::{HvacMode, Preset};
use multiclimate_domain::mode::{ActiveMode, OperatingMode};

use super::mapping::ModeTable;

/// Modes and presets an entity offers to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedModes {
    hvac_modes: Vec<HvacMode>,
    presets: Vec<Preset>,
}

impl SupportedModes {
    /// Everything the table can request, before any pruning.
    #[must_use]
    pub fn from_table(table: &ModeTable) -> Self {
        Self {
            hvac_modes: table.hvac_modes(),
            presets: table.presets(),
        }
    }

    /// Drop the entries that need a cooling circuit.
    #[must_use]
    pub fn without_cooling(mut self) -> Self {
        self.presets
            .retain(|p| !matches!(p, Preset::CoolingOn | Preset::CoolingForXDays));
        self.hvac_modes.retain(|m| *m != HvacMode::Cool);
        self
    }

    /// Drop the entries that need a ventilation unit.
    #[must_use]
    pub fn without_ventilation(mut self) -> Self {
        self.hvac_modes.retain(|m| *m != HvacMode::FanOnly);
        self
    }

    /// Zone modes for a given capability set.
    #[must_use]
    pub fn for_zone(table: &ModeTable, can_cool: bool, has_ventilation: bool) -> Self {
        let mut supported = Self::from_table(table);
        if !can_cool {
            supported = supported.without_cooling();
        }
        if !has_ventilation {
            supported = supported.without_ventilation();
        }
        supported
    }

    #[must_use]
    pub fn hvac_modes(&self) -> &[HvacMode] {
        &self.hvac_modes
    }

    /// Presets to show; `quick_veto` is appended while one is running so the
    /// current preset is always part of the list.
    #[must_use]
    pub fn presets_for(&self, active: Option<&ActiveMode>) -> Vec<Preset> {
        let mut presets = self.presets.clone();
        if active.is_some_and(|a| a.is(OperatingMode::QuickVeto)) {
            presets.push(Preset::QuickVeto);
        }
        presets
    }

    #[must_use]
    pub fn supports_hvac_mode(&self, mode: HvacMode) -> bool {
        self.hvac_modes.contains(&mode)
    }

    #[must_use]
    pub fn supports_preset(&self, preset: Preset) -> bool {
        self.presets.contains(&preset)
    }
}
