//! Service: a callable command exposed by the integration.
//!
//! Each [`ServiceName`] carries a declarative [`ServiceSchema`]. Validation
//! follows the platform's conventions: values are coerced to the declared
//! type, numbers outside the declared range are clamped rather than
//! rejected, and keys the schema does not declare are refused.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::mode::QuickMode;
use crate::time::{ControllerTime, parse_datetime};

pub const ATTR_ENTITY_ID: &str = "entity_id";
pub const ATTR_QUICK_MODE: &str = "quick_mode";
pub const ATTR_DURATION: &str = "duration";
pub const ATTR_START_DATE: &str = "start_date";
pub const ATTR_END_DATE: &str = "end_date";
pub const ATTR_TEMPERATURE: &str = "temperature";
pub const ATTR_LEVEL: &str = "level";
pub const ATTR_DATE_TIME: &str = "datetime";

/// Quick veto length in minutes when the caller gives none.
pub const DEFAULT_QUICK_VETO_DURATION: u16 = 3 * 60;

/// Every service the integration registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceName {
    RemoveQuickMode,
    RemoveHolidayMode,
    RemoveQuickVeto,
    SetQuickMode,
    SetHolidayMode,
    SetQuickVeto,
    RequestHvacUpdate,
    SetVentilationDayLevel,
    SetVentilationNightLevel,
    SetDatetime,
}

impl ServiceName {
    pub const ALL: [Self; 10] = [
        Self::RemoveQuickMode,
        Self::RemoveHolidayMode,
        Self::RemoveQuickVeto,
        Self::SetQuickMode,
        Self::SetHolidayMode,
        Self::SetQuickVeto,
        Self::RequestHvacUpdate,
        Self::SetVentilationDayLevel,
        Self::SetVentilationNightLevel,
        Self::SetDatetime,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RemoveQuickMode => "remove_quick_mode",
            Self::RemoveHolidayMode => "remove_holiday_mode",
            Self::RemoveQuickVeto => "remove_quick_veto",
            Self::SetQuickMode => "set_quick_mode",
            Self::SetHolidayMode => "set_holiday_mode",
            Self::SetQuickVeto => "set_quick_veto",
            Self::RequestHvacUpdate => "request_hvac_update",
            Self::SetVentilationDayLevel => "set_ventilation_day_level",
            Self::SetVentilationNightLevel => "set_ventilation_night_level",
            Self::SetDatetime => "set_datetime",
        }
    }

    #[must_use]
    pub fn schema(self) -> ServiceSchema {
        let fields = match self {
            Self::RemoveQuickMode | Self::RemoveHolidayMode | Self::RequestHvacUpdate => NO_FIELDS,
            Self::RemoveQuickVeto => REMOVE_QUICK_VETO_FIELDS,
            Self::SetQuickMode => SET_QUICK_MODE_FIELDS,
            Self::SetHolidayMode => SET_HOLIDAY_MODE_FIELDS,
            Self::SetQuickVeto => SET_QUICK_VETO_FIELDS,
            Self::SetVentilationDayLevel | Self::SetVentilationNightLevel => {
                SET_VENTILATION_LEVEL_FIELDS
            }
            Self::SetDatetime => SET_DATETIME_FIELDS,
        };
        ServiceSchema { fields }
    }
}

const TEMPERATURE_RANGE: FieldKind = FieldKind::Float {
    min: Some(5.0),
    max: Some(30.0),
};

const NO_FIELDS: &[FieldSpec] = &[];

const REMOVE_QUICK_VETO_FIELDS: &[FieldSpec] =
    &[FieldSpec::required(ATTR_ENTITY_ID, FieldKind::Str)];

const SET_QUICK_MODE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required(ATTR_QUICK_MODE, FieldKind::OneOf(&QuickMode::NAMES)),
    FieldSpec::optional(
        ATTR_DURATION,
        FieldKind::Int {
            min: Some(1),
            max: Some(u32::MAX as i64),
        },
    ),
];

const SET_HOLIDAY_MODE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required(ATTR_START_DATE, FieldKind::Str),
    FieldSpec::required(ATTR_END_DATE, FieldKind::Str),
    FieldSpec::required(ATTR_TEMPERATURE, TEMPERATURE_RANGE),
];

const SET_QUICK_VETO_FIELDS: &[FieldSpec] = &[
    FieldSpec::required(ATTR_ENTITY_ID, FieldKind::Str),
    FieldSpec::required(ATTR_TEMPERATURE, TEMPERATURE_RANGE),
    FieldSpec::optional(
        ATTR_DURATION,
        FieldKind::Int {
            min: Some(30),
            max: Some(1440),
        },
    ),
];

const SET_VENTILATION_LEVEL_FIELDS: &[FieldSpec] = &[
    FieldSpec::required(ATTR_ENTITY_ID, FieldKind::Str),
    FieldSpec::required(
        ATTR_LEVEL,
        FieldKind::Int {
            min: Some(1),
            max: Some(6),
        },
    ),
];

const SET_DATETIME_FIELDS: &[FieldSpec] =
    &[FieldSpec::optional(ATTR_DATE_TIME, FieldKind::DateTime)];

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownService(s.to_string()))
    }
}

/// Declared type of a service field, with its coercion and clamp rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Str,
    /// A string restricted to the listed values.
    OneOf(&'static [&'static str]),
    Float { min: Option<f64>, max: Option<f64> },
    Int { min: Option<i64>, max: Option<i64> },
    DateTime,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
    pub kind: FieldKind,
}

impl FieldSpec {
    #[must_use]
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            required: true,
            kind,
        }
    }

    #[must_use]
    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            required: false,
            kind,
        }
    }

    fn coerce(&self, value: &serde_json::Value) -> Result<FieldValue, ValidationError> {
        use serde_json::Value;

        let wrong_type = |expected| ValidationError::WrongType {
            field: self.name,
            expected,
        };

        match self.kind {
            FieldKind::Str => coerce_str(value)
                .map(FieldValue::Str)
                .ok_or_else(|| wrong_type("a string")),
            FieldKind::OneOf(allowed) => {
                let text = coerce_str(value).ok_or_else(|| wrong_type("a string"))?;
                if allowed.contains(&text.as_str()) {
                    Ok(FieldValue::Str(text))
                } else {
                    Err(ValidationError::NotAllowed {
                        field: self.name,
                        value: text,
                    })
                }
            }
            FieldKind::Float { min, max } => {
                let number = match value {
                    Value::Number(n) => n.as_f64(),
                    Value::String(s) => s.trim().parse::<f64>().ok(),
                    _ => None,
                }
                .filter(|n| n.is_finite())
                .ok_or_else(|| wrong_type("a float"))?;
                let number = min.map_or(number, |min| number.max(min));
                let number = max.map_or(number, |max| number.min(max));
                Ok(FieldValue::Float(number))
            }
            FieldKind::Int { min, max } => {
                let number = match value {
                    Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate)),
                    Value::String(s) => s.trim().parse::<i64>().ok(),
                    _ => None,
                }
                .ok_or_else(|| wrong_type("an integer"))?;
                let number = min.map_or(number, |min| number.max(min));
                let number = max.map_or(number, |max| number.min(max));
                Ok(FieldValue::Int(number))
            }
            FieldKind::DateTime => value
                .as_str()
                .and_then(parse_datetime)
                .map(FieldValue::DateTime)
                .ok_or_else(|| wrong_type("a datetime")),
        }
    }
}

fn coerce_str(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn truncate(value: f64) -> Option<i64> {
    // Stay well inside i64 so the cast cannot saturate.
    (value.is_finite() && value.abs() < 9.0e18).then(|| value.trunc() as i64)
}

/// Declarative schema of a service's data payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServiceSchema {
    fields: &'static [FieldSpec],
}

impl ServiceSchema {
    #[must_use]
    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    /// Validate and normalise a payload.
    ///
    /// `null` is accepted as an empty payload.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the payload is not an object, has
    /// undeclared keys, misses a required key, or holds a value that cannot
    /// be coerced or is not in the allowed list.
    pub fn validate(&self, data: &serde_json::Value) -> Result<ServiceData, ValidationError> {
        let empty = serde_json::Map::new();
        let object = match data {
            serde_json::Value::Null => &empty,
            serde_json::Value::Object(map) => map,
            _ => return Err(ValidationError::NotAnObject),
        };

        if let Some(extra) = object
            .keys()
            .find(|key| !self.fields.iter().any(|f| f.name == key.as_str()))
        {
            return Err(ValidationError::UnknownField(extra.clone()));
        }

        let mut values = BTreeMap::new();
        for field in self.fields {
            match object.get(field.name) {
                Some(raw) => {
                    values.insert(field.name, field.coerce(raw)?);
                }
                None if field.required => return Err(ValidationError::MissingField(field.name)),
                None => {}
            }
        }
        Ok(ServiceData { values })
    }
}

/// A single validated field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(String),
    Float(f64),
    Int(i64),
    DateTime(ControllerTime),
}

/// Validated payload of a service call, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceData {
    values: BTreeMap<&'static str, FieldValue>,
}

impl ServiceData {
    #[must_use]
    pub fn str(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(FieldValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn float(&self, name: &str) -> Option<f64> {
        match self.values.get(name) {
            Some(FieldValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn int(&self, name: &str) -> Option<i64> {
        match self.values.get(name) {
            Some(FieldValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn datetime(&self, name: &str) -> Option<ControllerTime> {
        match self.values.get(name) {
            Some(FieldValue::DateTime(v)) => Some(*v),
            _ => None,
        }
    }

    /// Look up a required string.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] when absent.
    pub fn require_str(&self, name: &'static str) -> Result<&str, ValidationError> {
        self.str(name).ok_or(ValidationError::MissingField(name))
    }

    /// Look up a required float.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] when absent.
    pub fn require_float(&self, name: &'static str) -> Result<f64, ValidationError> {
        self.float(name).ok_or(ValidationError::MissingField(name))
    }

    /// Look up a required integer.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] when absent.
    pub fn require_int(&self, name: &'static str) -> Result<i64, ValidationError> {
        self.int(name).ok_or(ValidationError::MissingField(name))
    }
}

/// An incoming service call, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCall {
    pub service: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl ServiceCall {
    #[must_use]
    pub fn new(service: ServiceName, data: serde_json::Value) -> Self {
        Self {
            service: service.as_str().to_string(),
            data,
        }
    }

    /// Resolve the service name and validate the payload against its schema.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownService`] for an unregistered name,
    /// or any error from [`ServiceSchema::validate`].
    pub fn validate(&self) -> Result<(ServiceName, ServiceData), ValidationError> {
        let name: ServiceName = self.service.parse()?;
        let data = name.schema().validate(&self.data)?;
        Ok((name, data))
    }
}
