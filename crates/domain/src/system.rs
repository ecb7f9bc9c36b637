//! System-wide state: firmware family, holiday mode, running quick mode.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::mode::QuickMode;

/// Firmware family of the controller. The two differ in the modes they
/// offer: `senso` has `TIME_CONTROLLED`/`MANUAL` where `multimatic` has
/// `AUTO`/`ON`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemApplication {
    #[default]
    Multimatic,
    Senso,
}

impl fmt::Display for SystemApplication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Multimatic => f.write_str("multimatic"),
            Self::Senso => f.write_str("senso"),
        }
    }
}

impl FromStr for SystemApplication {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "multimatic" => Ok(Self::Multimatic),
            "senso" => Ok(Self::Senso),
            other => Err(ValidationError::NotAllowed {
                field: "application",
                value: other.to_string(),
            }),
        }
    }
}

/// A scheduled absence during which every component runs at `target`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HolidayMode {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub target: f64,
}

impl HolidayMode {
    /// Whether `today` falls within the holiday, both ends included.
    #[must_use]
    pub fn is_active_on(&self, today: NaiveDate) -> bool {
        self.start <= today && today <= self.end
    }
}

/// The quick mode currently running, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveQuickMode {
    pub mode: QuickMode,
    #[serde(default)]
    pub duration: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_multimatic() {
        assert_eq!(SystemApplication::default(), SystemApplication::Multimatic);
    }

    #[test]
    fn should_parse_application_names() {
        assert_eq!(
            "senso".parse::<SystemApplication>().unwrap(),
            SystemApplication::Senso
        );
        assert!("vrc700".parse::<SystemApplication>().is_err());
    }

    #[test]
    fn should_include_both_ends_of_holiday() {
        let holiday = HolidayMode {
            start: NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 8, 15).unwrap(),
            target: 12.0,
        };
        assert!(holiday.is_active_on(holiday.start));
        assert!(holiday.is_active_on(holiday.end));
        assert!(!holiday.is_active_on(NaiveDate::from_ymd_opt(2024, 8, 16).unwrap()));
    }
}
