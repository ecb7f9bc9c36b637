//! Heating API port: every change the integration requests from the vendor.
//!
//! Implementations wrap the vendor's cloud client (or an in-memory stand-in).
//! Errors are passed through unchanged as [`MultiClimateError::Api`]; the
//! translation layer never retries or reinterprets them.

use std::future::Future;

use chrono::NaiveDate;
use multiclimate_domain::component::ComponentRef;
use multiclimate_domain::error::MultiClimateError;
use multiclimate_domain::id::{RoomId, ZoneId};
use multiclimate_domain::mode::{ActiveMode, Mode, QuickMode};
use multiclimate_domain::time::ControllerTime;

/// Outbound port to the vendor heating API.
pub trait HeatingApi: Send + Sync {
    /// Resolve the mode in effect for `component`, taking holiday mode,
    /// quick mode and quick veto precedence into account.
    ///
    /// Returns `None` when the component is unknown.
    fn active_mode(&self, component: &ComponentRef) -> Option<ActiveMode>;

    /// Override the target temperature of a room or zone for `duration`
    /// minutes.
    fn set_quick_veto(
        &self,
        component: &ComponentRef,
        temperature: f64,
        duration: u16,
    ) -> impl Future<Output = Result<(), MultiClimateError>> + Send;

    fn remove_quick_veto(
        &self,
        component: &ComponentRef,
    ) -> impl Future<Output = Result<(), MultiClimateError>> + Send;

    fn set_room_target_temperature(
        &self,
        room: &RoomId,
        temperature: f64,
    ) -> impl Future<Output = Result<(), MultiClimateError>> + Send;

    fn set_room_operating_mode(
        &self,
        room: &RoomId,
        mode: Mode,
    ) -> impl Future<Output = Result<(), MultiClimateError>> + Send;

    fn set_zone_target_temperature(
        &self,
        zone: &ZoneId,
        temperature: f64,
    ) -> impl Future<Output = Result<(), MultiClimateError>> + Send;

    fn set_zone_operating_mode(
        &self,
        zone: &ZoneId,
        mode: Mode,
    ) -> impl Future<Output = Result<(), MultiClimateError>> + Send;

    /// Start a system-wide quick mode. `duration` is only meaningful for
    /// quick modes that run for a number of days.
    fn set_quick_mode(
        &self,
        mode: QuickMode,
        duration: Option<u32>,
    ) -> impl Future<Output = Result<(), MultiClimateError>> + Send;

    fn remove_quick_mode(&self) -> impl Future<Output = Result<(), MultiClimateError>> + Send;

    fn set_holiday_mode(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        temperature: f64,
    ) -> impl Future<Output = Result<(), MultiClimateError>> + Send;

    fn remove_holiday_mode(&self) -> impl Future<Output = Result<(), MultiClimateError>> + Send;

    /// Ask the vendor cloud to fetch fresh data from the installation.
    fn request_hvac_update(&self) -> impl Future<Output = Result<(), MultiClimateError>> + Send;

    fn set_ventilation_day_level(
        &self,
        entity_id: &str,
        level: u8,
    ) -> impl Future<Output = Result<(), MultiClimateError>> + Send;

    fn set_ventilation_night_level(
        &self,
        entity_id: &str,
        level: u8,
    ) -> impl Future<Output = Result<(), MultiClimateError>> + Send;

    /// Set the controller clock.
    fn set_datetime(
        &self,
        datetime: ControllerTime,
    ) -> impl Future<Output = Result<(), MultiClimateError>> + Send;
}
