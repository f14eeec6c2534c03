//! Countdown decomposition into the enabled display units.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::value_objects::{EnabledUnits, TimeUnit};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CountdownParts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub months: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seconds: Option<i64>,
}

impl CountdownParts {
    pub fn get(&self, unit: TimeUnit) -> Option<i64> {
        match unit {
            TimeUnit::Months => self.months,
            TimeUnit::Days => self.days,
            TimeUnit::Hours => self.hours,
            TimeUnit::Minutes => self.minutes,
            TimeUnit::Seconds => self.seconds,
        }
    }

    fn set(&mut self, unit: TimeUnit, value: i64) {
        let slot = match unit {
            TimeUnit::Months => &mut self.months,
            TimeUnit::Days => &mut self.days,
            TimeUnit::Hours => &mut self.hours,
            TimeUnit::Minutes => &mut self.minutes,
            TimeUnit::Seconds => &mut self.seconds,
        };
        *slot = Some(value);
    }

    /// Displayed amount converted back to seconds.
    pub fn to_seconds(&self) -> i64 {
        TimeUnit::ORDERED
            .iter()
            .map(|unit| self.get(*unit).unwrap_or(0) * unit.seconds())
            .sum()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Countdown {
    pub target: NaiveDateTime,
    pub total_seconds: i64,
    pub has_passed: bool,
    pub parts: CountdownParts,
}

/// Splits `total_seconds` coarsest unit first. A disabled unit takes
/// nothing, so its share falls through to the next enabled unit; whatever is
/// finer than the finest enabled unit is truncated.
pub fn decompose(total_seconds: i64, units: &EnabledUnits) -> CountdownParts {
    let mut parts = CountdownParts::default();
    let mut remaining = total_seconds.max(0);
    for unit in TimeUnit::ORDERED {
        if !units.is_enabled(unit) {
            continue;
        }
        let size = unit.seconds();
        parts.set(unit, remaining / size);
        remaining %= size;
    }
    parts
}

pub fn countdown(target: NaiveDateTime, now: NaiveDateTime, units: &EnabledUnits) -> Countdown {
    let diff = (target - now).num_seconds();
    if diff <= 0 {
        return Countdown {
            target,
            total_seconds: 0,
            has_passed: true,
            parts: decompose(0, units),
        };
    }
    Countdown {
        target,
        total_seconds: diff,
        has_passed: false,
        parts: decompose(diff, units),
    }
}
