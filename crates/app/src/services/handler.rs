//! Service handler: validates service calls and dispatches them.

use std::sync::Arc;

use multiclimate_domain::error::{MultiClimateError, ValidationError};
use multiclimate_domain::mode::QuickMode;
use multiclimate_domain::service::{
    ATTR_DATE_TIME, ATTR_DURATION, ATTR_END_DATE, ATTR_ENTITY_ID, ATTR_LEVEL, ATTR_QUICK_MODE,
    ATTR_START_DATE, ATTR_TEMPERATURE, ServiceCall, ServiceData, ServiceName,
};
use multiclimate_domain::time::{now, parse_holiday_date};

use crate::climate::ClimatePlatform;
use crate::ports::{HeatingApi, StateSource};

/// Entry point for every registered service.
///
/// System-wide services go straight to the [`HeatingApi`]; quick veto
/// services are routed to the climate entity they name.
pub struct ServiceHandler<A, S> {
    api: Arc<A>,
    platform: ClimatePlatform<A, S>,
}

impl<A: HeatingApi, S: StateSource> ServiceHandler<A, S> {
    pub fn new(api: Arc<A>, platform: ClimatePlatform<A, S>) -> Self {
        Self { api, platform }
    }

    #[must_use]
    pub fn platform(&self) -> &ClimatePlatform<A, S> {
        &self.platform
    }

    /// Validate `call` against its schema and execute it.
    ///
    /// # Errors
    ///
    /// Returns [`MultiClimateError::Validation`] for unknown services or bad
    /// payloads, [`MultiClimateError::InvalidDates`] for unparsable holiday
    /// dates, and any error from the vendor API unchanged.
    #[tracing::instrument(skip(self, call), fields(service = %call.service))]
    pub async fn handle(&self, call: &ServiceCall) -> Result<(), MultiClimateError> {
        let (service, data) = call.validate()?;
        tracing::debug!("dispatching service call");

        match service {
            ServiceName::RemoveQuickMode => self.api.remove_quick_mode().await,
            ServiceName::RemoveHolidayMode => self.api.remove_holiday_mode().await,
            ServiceName::RequestHvacUpdate => self.api.request_hvac_update().await,
            ServiceName::SetHolidayMode => self.set_holiday_mode(&data).await,
            ServiceName::SetQuickMode => self.set_quick_mode(&data).await,
            ServiceName::SetDatetime => {
                let datetime = data.datetime(ATTR_DATE_TIME).unwrap_or_else(now);
                self.api.set_datetime(datetime).await
            }
            ServiceName::SetVentilationDayLevel => {
                let (entity_id, level) = ventilation_level(&data)?;
                self.api.set_ventilation_day_level(entity_id, level).await
            }
            ServiceName::SetVentilationNightLevel => {
                let (entity_id, level) = ventilation_level(&data)?;
                self.api.set_ventilation_night_level(entity_id, level).await
            }
            ServiceName::SetQuickVeto | ServiceName::RemoveQuickVeto => {
                self.platform.call_entity_service(service, &data).await
            }
        }
    }

    async fn set_holiday_mode(&self, data: &ServiceData) -> Result<(), MultiClimateError> {
        let start = data.require_str(ATTR_START_DATE)?;
        let end = data.require_str(ATTR_END_DATE)?;
        let temperature = data.require_float(ATTR_TEMPERATURE)?;

        let (Some(start_date), Some(end_date)) =
            (parse_holiday_date(start), parse_holiday_date(end))
        else {
            return Err(MultiClimateError::InvalidDates {
                start: start.to_string(),
                end: end.to_string(),
            });
        };
        self.api
            .set_holiday_mode(start_date, end_date, temperature)
            .await
    }

    async fn set_quick_mode(&self, data: &ServiceData) -> Result<(), MultiClimateError> {
        let mode: QuickMode = data.require_str(ATTR_QUICK_MODE)?.parse()?;
        let duration = data
            .int(ATTR_DURATION)
            .map(u32::try_from)
            .transpose()
            .map_err(|_| ValidationError::WrongType {
                field: ATTR_DURATION,
                expected: "a positive duration",
            })?;
        self.api.set_quick_mode(mode, duration).await
    }
}

fn ventilation_level(data: &ServiceData) -> Result<(&str, u8), ValidationError> {
    let entity_id = data.require_str(ATTR_ENTITY_ID)?;
    let level = u8::try_from(data.require_int(ATTR_LEVEL)?).map_err(|_| {
        ValidationError::WrongType {
            field: ATTR_LEVEL,
            expected: "ventilation level",
        }
    })?;
    Ok((entity_id, level))
}
