//! In-memory heating installation implementing both ports.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use multiclimate_app::ports::{HeatingApi, StateSource};
use multiclimate_domain::component::{ComponentRef, QuickVeto, Room, Zone};
use multiclimate_domain::error::MultiClimateError;
use multiclimate_domain::id::{RoomId, ZoneId};
use multiclimate_domain::mode::{ActiveMode, Mode, OperatingMode, QuickMode};
use multiclimate_domain::system::{ActiveQuickMode, HolidayMode};
use multiclimate_domain::time::{ControllerTime, now};

use crate::config::VirtualConfig;
use crate::error::VirtualError;

/// Ventilation levels of the (single) ventilation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VentilationLevels {
    pub day: u8,
    pub night: u8,
}

impl Default for VentilationLevels {
    fn default() -> Self {
        Self { day: 3, night: 1 }
    }
}

#[derive(Debug)]
struct Installation {
    zones: Vec<Zone>,
    rooms: Vec<Room>,
    ventilation: Option<VentilationLevels>,
    quick_mode: Option<ActiveQuickMode>,
    holiday: Option<HolidayMode>,
    controller_time: Option<ControllerTime>,
    hvac_update_requests: u32,
}

impl Installation {
    fn today(&self) -> NaiveDate {
        self.controller_time.unwrap_or_else(now).date()
    }

    fn active_holiday(&self) -> Option<HolidayMode> {
        let today = self.today();
        self.holiday.filter(|holiday| holiday.is_active_on(today))
    }

    fn room_mut(&mut self, id: &RoomId) -> Result<&mut Room, VirtualError> {
        self.rooms
            .iter_mut()
            .find(|room| &room.id == id)
            .ok_or_else(|| VirtualError::UnknownComponent(ComponentRef::Room(id.clone())))
    }

    fn zone_mut(&mut self, id: &ZoneId) -> Result<&mut Zone, VirtualError> {
        self.zones
            .iter_mut()
            .find(|zone| &zone.id == id)
            .ok_or_else(|| VirtualError::UnknownComponent(ComponentRef::Zone(id.clone())))
    }

    fn quick_veto_mut(
        &mut self,
        component: &ComponentRef,
    ) -> Result<&mut Option<QuickVeto>, VirtualError> {
        match component {
            ComponentRef::Room(id) => Ok(&mut self.room_mut(id)?.quick_veto),
            ComponentRef::Zone(id) => Ok(&mut self.zone_mut(id)?.quick_veto),
        }
    }

    /// Holiday, then quick mode, then quick veto, then the room's own mode.
    fn room_active_mode(&self, room: &Room) -> ActiveMode {
        if let Some(holiday) = self.active_holiday() {
            return ActiveMode::new(QuickMode::Holiday, holiday.target);
        }
        if let Some(quick_mode) = self.quick_mode {
            match quick_mode.mode {
                QuickMode::SystemOff => {
                    return ActiveMode::new(QuickMode::SystemOff, Room::MIN_TARGET_TEMP);
                }
                QuickMode::Holiday => {
                    return ActiveMode::new(QuickMode::Holiday, Room::MIN_TARGET_TEMP);
                }
                _ => {}
            }
        }
        if let Some(veto) = room.quick_veto {
            return ActiveMode::new(OperatingMode::QuickVeto, veto.target);
        }
        match room.operating_mode {
            OperatingMode::Off => ActiveMode::new(OperatingMode::Off, Room::MIN_TARGET_TEMP),
            mode => ActiveMode::new(mode, room.target),
        }
    }

    /// Same precedence as rooms; most quick modes also apply to zones.
    fn zone_active_mode(&self, zone: &Zone) -> ActiveMode {
        if let Some(holiday) = self.active_holiday() {
            return ActiveMode::new(QuickMode::Holiday, holiday.target);
        }
        let cooling_target = zone.cooling.map_or(zone.target_high, |c| c.target);
        if let Some(quick_mode) = self.quick_mode {
            let mode = quick_mode.mode;
            let active = match mode {
                QuickMode::HotWaterBoost => None,
                QuickMode::Party | QuickMode::OneDayAtHome => {
                    Some(ActiveMode::new(mode, zone.target_high))
                }
                QuickMode::OneDayAway => Some(ActiveMode::new(mode, zone.target_low)),
                QuickMode::VentilationBoost | QuickMode::SystemOff | QuickMode::Holiday => {
                    Some(ActiveMode::new(mode, Zone::MIN_TARGET_HEATING_TEMP))
                }
                QuickMode::CoolingForXDays => {
                    let active = ActiveMode::new(mode, cooling_target);
                    Some(match quick_mode.duration {
                        Some(days) => active.with_duration(days),
                        None => active,
                    })
                }
            };
            if let Some(active) = active {
                return active;
            }
        }
        if let Some(veto) = zone.quick_veto {
            return ActiveMode::new(OperatingMode::QuickVeto, veto.target);
        }
        let target = match zone.operating_mode {
            OperatingMode::Night => zone.target_low,
            OperatingMode::Off => Zone::MIN_TARGET_HEATING_TEMP,
            OperatingMode::On => cooling_target,
            _ => zone.target_high,
        };
        ActiveMode::new(zone.operating_mode, target)
    }

    fn set_operating_mode(
        &mut self,
        component: &ComponentRef,
        mode: Mode,
    ) -> Result<(), VirtualError> {
        match mode {
            Mode::Quick(quick_mode) => {
                self.quick_mode = Some(ActiveQuickMode {
                    mode: quick_mode,
                    duration: None,
                });
            }
            Mode::Operating(operating_mode) => {
                *self.quick_veto_mut(component)? = None;
                match component {
                    ComponentRef::Room(id) => self.room_mut(id)?.operating_mode = operating_mode,
                    ComponentRef::Zone(id) => self.zone_mut(id)?.operating_mode = operating_mode,
                }
                self.quick_mode = None;
            }
        }
        Ok(())
    }
}

/// Virtual installation shared by the climate entities and the daemon.
///
/// Acts both as the vendor API (every change is applied to the in-memory
/// records) and as the coordinator (reads return the current records).
pub struct VirtualHeatingSystem {
    installation: Mutex<Installation>,
}

impl VirtualHeatingSystem {
    #[must_use]
    pub fn new(config: VirtualConfig) -> Self {
        let VirtualConfig {
            zones,
            rooms,
            ventilation,
        } = config;
        Self {
            installation: Mutex::new(Installation {
                zones,
                rooms,
                ventilation: ventilation.then(VentilationLevels::default),
                quick_mode: None,
                holiday: None,
                controller_time: None,
                hvac_update_requests: 0,
            }),
        }
    }

    /// Quick mode currently running.
    #[must_use]
    pub fn quick_mode(&self) -> Option<ActiveQuickMode> {
        self.lock().quick_mode
    }

    /// Holiday configured, active or not.
    #[must_use]
    pub fn holiday(&self) -> Option<HolidayMode> {
        self.lock().holiday
    }

    #[must_use]
    pub fn ventilation_levels(&self) -> Option<VentilationLevels> {
        self.lock().ventilation
    }

    /// Time last pushed to the controller clock.
    #[must_use]
    pub fn controller_time(&self) -> Option<ControllerTime> {
        self.lock().controller_time
    }

    #[must_use]
    pub fn hvac_update_requests(&self) -> u32 {
        self.lock().hvac_update_requests
    }

    fn lock(&self) -> MutexGuard<'_, Installation> {
        self.installation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn apply(
        &self,
        change: impl FnOnce(&mut Installation) -> Result<(), VirtualError>,
    ) -> Result<(), MultiClimateError> {
        let mut installation = self.lock();
        change(&mut *installation).map_err(VirtualError::into_domain)
    }
}

impl HeatingApi for VirtualHeatingSystem {
    fn active_mode(&self, component: &ComponentRef) -> Option<ActiveMode> {
        let installation = self.lock();
        match component {
            ComponentRef::Room(id) => installation
                .rooms
                .iter()
                .find(|room| &room.id == id)
                .map(|room| installation.room_active_mode(room)),
            ComponentRef::Zone(id) => installation
                .zones
                .iter()
                .find(|zone| &zone.id == id)
                .map(|zone| installation.zone_active_mode(zone)),
        }
    }

    async fn set_quick_veto(
        &self,
        component: &ComponentRef,
        temperature: f64,
        duration: u16,
    ) -> Result<(), MultiClimateError> {
        tracing::debug!(%component, temperature, duration, "setting quick veto");
        self.apply(|installation| {
            *installation.quick_veto_mut(component)? = Some(QuickVeto {
                target: temperature,
                remaining_duration: Some(duration),
            });
            Ok(())
        })
    }

    async fn remove_quick_veto(&self, component: &ComponentRef) -> Result<(), MultiClimateError> {
        tracing::debug!(%component, "removing quick veto");
        self.apply(|installation| {
            *installation.quick_veto_mut(component)? = None;
            Ok(())
        })
    }

    async fn set_room_target_temperature(
        &self,
        room: &RoomId,
        temperature: f64,
    ) -> Result<(), MultiClimateError> {
        self.apply(|installation| {
            installation.room_mut(room)?.target = temperature;
            Ok(())
        })
    }

    async fn set_room_operating_mode(
        &self,
        room: &RoomId,
        mode: Mode,
    ) -> Result<(), MultiClimateError> {
        tracing::debug!(%room, %mode, "setting room operating mode");
        self.apply(|installation| {
            installation.set_operating_mode(&ComponentRef::Room(room.clone()), mode)
        })
    }

    async fn set_zone_target_temperature(
        &self,
        zone: &ZoneId,
        temperature: f64,
    ) -> Result<(), MultiClimateError> {
        self.apply(|installation| {
            installation.zone_mut(zone)?.target_high = temperature;
            Ok(())
        })
    }

    async fn set_zone_operating_mode(
        &self,
        zone: &ZoneId,
        mode: Mode,
    ) -> Result<(), MultiClimateError> {
        tracing::debug!(%zone, %mode, "setting zone operating mode");
        self.apply(|installation| {
            installation.set_operating_mode(&ComponentRef::Zone(zone.clone()), mode)
        })
    }

    async fn set_quick_mode(
        &self,
        mode: QuickMode,
        duration: Option<u32>,
    ) -> Result<(), MultiClimateError> {
        tracing::debug!(%mode, ?duration, "setting quick mode");
        self.apply(|installation| {
            installation.quick_mode = Some(ActiveQuickMode { mode, duration });
            Ok(())
        })
    }

    async fn remove_quick_mode(&self) -> Result<(), MultiClimateError> {
        self.apply(|installation| {
            installation.quick_mode = None;
            Ok(())
        })
    }

    async fn set_holiday_mode(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        temperature: f64,
    ) -> Result<(), MultiClimateError> {
        tracing::debug!(%start, %end, temperature, "setting holiday mode");
        self.apply(|installation| {
            installation.holiday = Some(HolidayMode {
                start,
                end,
                target: temperature,
            });
            Ok(())
        })
    }

    async fn remove_holiday_mode(&self) -> Result<(), MultiClimateError> {
        self.apply(|installation| {
            installation.holiday = None;
            Ok(())
        })
    }

    async fn request_hvac_update(&self) -> Result<(), MultiClimateError> {
        self.apply(|installation| {
            installation.hvac_update_requests += 1;
            tracing::debug!(
                requests = installation.hvac_update_requests,
                "hvac update requested"
            );
            Ok(())
        })
    }

    async fn set_ventilation_day_level(
        &self,
        entity_id: &str,
        level: u8,
    ) -> Result<(), MultiClimateError> {
        self.apply(|installation| {
            let levels = installation
                .ventilation
                .as_mut()
                .ok_or_else(|| VirtualError::NoVentilation(entity_id.to_string()))?;
            levels.day = level;
            Ok(())
        })
    }

    async fn set_ventilation_night_level(
        &self,
        entity_id: &str,
        level: u8,
    ) -> Result<(), MultiClimateError> {
        self.apply(|installation| {
            let levels = installation
                .ventilation
                .as_mut()
                .ok_or_else(|| VirtualError::NoVentilation(entity_id.to_string()))?;
            levels.night = level;
            Ok(())
        })
    }

    async fn set_datetime(&self, datetime: ControllerTime) -> Result<(), MultiClimateError> {
        self.apply(|installation| {
            installation.controller_time = Some(datetime);
            Ok(())
        })
    }
}

impl StateSource for VirtualHeatingSystem {
    fn zones(&self) -> Vec<Zone> {
        self.lock().zones.clone()
    }

    fn rooms(&self) -> Vec<Room> {
        self.lock().rooms.clone()
    }

    fn has_ventilation(&self) -> bool {
        self.lock().ventilation.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system() -> VirtualHeatingSystem {
        VirtualHeatingSystem::new(VirtualConfig::demo().unwrap())
    }

    fn room_ref(id: &str) -> ComponentRef {
        ComponentRef::Room(RoomId::new(id).unwrap())
    }

    fn zone_ref(id: &str) -> ComponentRef {
        ComponentRef::Zone(ZoneId::new(id).unwrap())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn should_resolve_operating_modes() {
        let system = system();
        assert_eq!(
            system.active_mode(&zone_ref("Control_ZO1")),
            Some(ActiveMode::new(OperatingMode::Auto, 21.0))
        );
        assert_eq!(
            system.active_mode(&room_ref("2")),
            Some(ActiveMode::new(OperatingMode::Manual, 22.0))
        );
        assert_eq!(system.active_mode(&room_ref("99")), None);
    }

    #[tokio::test]
    async fn should_prefer_quick_veto_over_operating_mode() {
        let system = system();
        system
            .set_quick_veto(&room_ref("1"), 23.5, 60)
            .await
            .unwrap();
        assert_eq!(
            system.active_mode(&room_ref("1")),
            Some(ActiveMode::new(OperatingMode::QuickVeto, 23.5))
        );

        system.remove_quick_veto(&room_ref("1")).await.unwrap();
        assert_eq!(
            system.active_mode(&room_ref("1")),
            Some(ActiveMode::new(OperatingMode::Auto, 19.0))
        );
    }

    #[tokio::test]
    async fn should_prefer_quick_mode_over_quick_veto() {
        let system = system();
        system
            .set_quick_veto(&zone_ref("Control_ZO1"), 23.5, 60)
            .await
            .unwrap();
        system
            .set_quick_mode(QuickMode::Party, None)
            .await
            .unwrap();
        assert_eq!(
            system.active_mode(&zone_ref("Control_ZO1")),
            Some(ActiveMode::new(QuickMode::Party, 21.0))
        );

        system.remove_quick_mode().await.unwrap();
        assert_eq!(
            system.active_mode(&zone_ref("Control_ZO1")),
            Some(ActiveMode::new(OperatingMode::QuickVeto, 23.5))
        );
    }

    #[tokio::test]
    async fn should_not_apply_party_to_rooms() {
        let system = system();
        system
            .set_quick_mode(QuickMode::Party, None)
            .await
            .unwrap();
        assert_eq!(
            system.active_mode(&room_ref("1")),
            Some(ActiveMode::new(OperatingMode::Auto, 19.0))
        );
    }

    #[tokio::test]
    async fn should_carry_cooling_duration() {
        let system = system();
        system
            .set_quick_mode(QuickMode::CoolingForXDays, Some(3))
            .await
            .unwrap();
        assert_eq!(
            system.active_mode(&zone_ref("Control_ZO1")),
            Some(ActiveMode::new(QuickMode::CoolingForXDays, 24.0).with_duration(3))
        );
    }

    #[tokio::test]
    async fn should_apply_holiday_only_while_active() {
        let system = system();
        system
            .set_datetime(date(2024, 1, 5).and_hms_opt(8, 0, 0).unwrap())
            .await
            .unwrap();
        system
            .set_holiday_mode(date(2024, 1, 1), date(2024, 1, 10), 12.0)
            .await
            .unwrap();
        assert_eq!(
            system.active_mode(&room_ref("1")),
            Some(ActiveMode::new(QuickMode::Holiday, 12.0))
        );

        system
            .set_datetime(date(2024, 2, 1).and_hms_opt(8, 0, 0).unwrap())
            .await
            .unwrap();
        assert_eq!(
            system.active_mode(&room_ref("1")),
            Some(ActiveMode::new(OperatingMode::Auto, 19.0))
        );

        system.remove_holiday_mode().await.unwrap();
        assert!(system.holiday().is_none());
    }

    #[tokio::test]
    async fn should_switch_operating_mode_and_clear_overrides() {
        let system = system();
        system
            .set_quick_veto(&zone_ref("Control_ZO1"), 23.5, 60)
            .await
            .unwrap();
        system
            .set_quick_mode(QuickMode::OneDayAway, None)
            .await
            .unwrap();
        system
            .set_zone_operating_mode(
                &ZoneId::new("Control_ZO1").unwrap(),
                Mode::Operating(OperatingMode::Night),
            )
            .await
            .unwrap();

        assert!(system.quick_mode().is_none());
        assert_eq!(
            system.active_mode(&zone_ref("Control_ZO1")),
            Some(ActiveMode::new(OperatingMode::Night, 17.0))
        );
    }

    #[tokio::test]
    async fn should_start_quick_mode_from_operating_mode_call() {
        let system = system();
        system
            .set_room_operating_mode(&RoomId::new("1").unwrap(), Mode::Quick(QuickMode::SystemOff))
            .await
            .unwrap();
        assert_eq!(
            system.quick_mode(),
            Some(ActiveQuickMode {
                mode: QuickMode::SystemOff,
                duration: None
            })
        );
        assert_eq!(
            system.active_mode(&room_ref("1")),
            Some(ActiveMode::new(QuickMode::SystemOff, 5.0))
        );
    }

    #[tokio::test]
    async fn should_set_targets() {
        let system = system();
        system
            .set_room_target_temperature(&RoomId::new("2").unwrap(), 23.0)
            .await
            .unwrap();
        system
            .set_zone_target_temperature(&ZoneId::new("Control_ZO1").unwrap(), 22.0)
            .await
            .unwrap();

        assert_eq!(system.active_mode(&room_ref("2")).unwrap().target, 23.0);
        assert_eq!(
            system.active_mode(&zone_ref("Control_ZO1")).unwrap().target,
            22.0
        );
    }

    #[tokio::test]
    async fn should_fail_for_unknown_component() {
        let system = system();
        let err = system
            .set_quick_veto(&room_ref("99"), 20.0, 60)
            .await
            .unwrap_err();
        assert!(matches!(err, MultiClimateError::Api(_)));
    }

    #[tokio::test]
    async fn should_set_ventilation_levels() {
        let system = system();
        system
            .set_ventilation_day_level("fan.ventilation", 5)
            .await
            .unwrap();
        system
            .set_ventilation_night_level("fan.ventilation", 2)
            .await
            .unwrap();
        assert_eq!(
            system.ventilation_levels(),
            Some(VentilationLevels { day: 5, night: 2 })
        );
    }

    #[tokio::test]
    async fn should_fail_ventilation_without_unit() {
        let system = VirtualHeatingSystem::new(VirtualConfig::default());
        assert!(!system.has_ventilation());
        let err = system
            .set_ventilation_day_level("fan.ventilation", 5)
            .await
            .unwrap_err();
        assert!(matches!(err, MultiClimateError::Api(_)));
    }

    #[tokio::test]
    async fn should_count_hvac_update_requests() {
        let system = system();
        system.request_hvac_update().await.unwrap();
        system.request_hvac_update().await.unwrap();
        assert_eq!(system.hvac_update_requests(), 2);
    }

    #[test]
    fn should_expose_installation_as_state_source() {
        let system = system();
        assert_eq!(system.zones().len(), 2);
        assert_eq!(system.rooms().len(), 2);
        assert!(system.has_ventilation());
        assert!(system.find_room(&RoomId::new("1").unwrap()).is_some());
        assert!(system.find_zone(&ZoneId::new("nope").unwrap()).is_none());
    }
}
