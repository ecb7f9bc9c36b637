//! In-memory port fakes shared by the unit tests of this crate.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveDate;
use multiclimate_domain::component::{ComponentRef, Room, Zone};
use multiclimate_domain::error::MultiClimateError;
use multiclimate_domain::id::{RoomId, ZoneId};
use multiclimate_domain::mode::{ActiveMode, Mode, QuickMode};
use multiclimate_domain::time::ControllerTime;

use crate::ports::{HeatingApi, StateSource};

/// One recorded outbound call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SetQuickVeto(ComponentRef, f64, u16),
    RemoveQuickVeto(ComponentRef),
    SetRoomTargetTemperature(RoomId, f64),
    SetRoomOperatingMode(RoomId, Mode),
    SetZoneTargetTemperature(ZoneId, f64),
    SetZoneOperatingMode(ZoneId, Mode),
    SetQuickMode(QuickMode, Option<u32>),
    RemoveQuickMode,
    SetHolidayMode(NaiveDate, NaiveDate, f64),
    RemoveHolidayMode,
    RequestHvacUpdate,
    SetVentilationDayLevel(String, u8),
    SetVentilationNightLevel(String, u8),
    SetDatetime(ControllerTime),
}

#[derive(Default)]
pub struct RecordingApi {
    active: Mutex<HashMap<ComponentRef, ActiveMode>>,
    calls: Mutex<Vec<Call>>,
    failing: Mutex<bool>,
    lookups: AtomicUsize,
}

impl RecordingApi {
    pub fn with_active(self, component: ComponentRef, mode: ActiveMode) -> Self {
        self.active.lock().unwrap().insert(component, mode);
        self
    }

    pub fn failing(self) -> Self {
        *self.failing.lock().unwrap() = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of `active_mode` lookups so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn record(&self, call: Call) -> impl Future<Output = Result<(), MultiClimateError>> + Send {
        self.calls.lock().unwrap().push(call);
        let failing = *self.failing.lock().unwrap();
        async move {
            if failing {
                Err(MultiClimateError::Api("connection refused".into()))
            } else {
                Ok(())
            }
        }
    }
}

impl HeatingApi for RecordingApi {
    fn active_mode(&self, component: &ComponentRef) -> Option<ActiveMode> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.active.lock().unwrap().get(component).copied()
    }

    fn set_quick_veto(
        &self,
        component: &ComponentRef,
        temperature: f64,
        duration: u16,
    ) -> impl Future<Output = Result<(), MultiClimateError>> + Send {
        self.record(Call::SetQuickVeto(component.clone(), temperature, duration))
    }

    fn remove_quick_veto(
        &self,
        component: &ComponentRef,
    ) -> impl Future<Output = Result<(), MultiClimateError>> + Send {
        self.record(Call::RemoveQuickVeto(component.clone()))
    }

    fn set_room_target_temperature(
        &self,
        room: &RoomId,
        temperature: f64,
    ) -> impl Future<Output = Result<(), MultiClimateError>> + Send {
        self.record(Call::SetRoomTargetTemperature(room.clone(), temperature))
    }

    fn set_room_operating_mode(
        &self,
        room: &RoomId,
        mode: Mode,
    ) -> impl Future<Output = Result<(), MultiClimateError>> + Send {
        self.record(Call::SetRoomOperatingMode(room.clone(), mode))
    }

    fn set_zone_target_temperature(
        &self,
        zone: &ZoneId,
        temperature: f64,
    ) -> impl Future<Output = Result<(), MultiClimateError>> + Send {
        self.record(Call::SetZoneTargetTemperature(zone.clone(), temperature))
    }

    fn set_zone_operating_mode(
        &self,
        zone: &ZoneId,
        mode: Mode,
    ) -> impl Future<Output = Result<(), MultiClimateError>> + Send {
        self.record(Call::SetZoneOperatingMode(zone.clone(), mode))
    }

    fn set_quick_mode(
        &self,
        mode: QuickMode,
        duration: Option<u32>,
    ) -> impl Future<Output = Result<(), MultiClimateError>> + Send {
        self.record(Call::SetQuickMode(mode, duration))
    }

    fn remove_quick_mode(&self) -> impl Future<Output = Result<(), MultiClimateError>> + Send {
        self.record(Call::RemoveQuickMode)
    }

    fn set_holiday_mode(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        temperature: f64,
    ) -> impl Future<Output = Result<(), MultiClimateError>> + Send {
        self.record(Call::SetHolidayMode(start, end, temperature))
    }

    fn remove_holiday_mode(&self) -> impl Future<Output = Result<(), MultiClimateError>> + Send {
        self.record(Call::RemoveHolidayMode)
    }

    fn request_hvac_update(&self) -> impl Future<Output = Result<(), MultiClimateError>> + Send {
        self.record(Call::RequestHvacUpdate)
    }

    fn set_ventilation_day_level(
        &self,
        entity_id: &str,
        level: u8,
    ) -> impl Future<Output = Result<(), MultiClimateError>> + Send {
        self.record(Call::SetVentilationDayLevel(entity_id.to_string(), level))
    }

    fn set_ventilation_night_level(
        &self,
        entity_id: &str,
        level: u8,
    ) -> impl Future<Output = Result<(), MultiClimateError>> + Send {
        self.record(Call::SetVentilationNightLevel(entity_id.to_string(), level))
    }

    fn set_datetime(
        &self,
        datetime: ControllerTime,
    ) -> impl Future<Output = Result<(), MultiClimateError>> + Send {
        self.record(Call::SetDatetime(datetime))
    }
}

#[derive(Default)]
pub struct FixedState {
    pub zones: Vec<Zone>,
    pub rooms: Vec<Room>,
    pub ventilation: bool,
}

impl StateSource for FixedState {
    fn zones(&self) -> Vec<Zone> {
        self.zones.clone()
    }

    fn rooms(&self) -> Vec<Room> {
        self.rooms.clone()
    }

    fn has_ventilation(&self) -> bool {
        self.ventilation
    }
}
