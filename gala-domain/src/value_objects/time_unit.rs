// Countdown display units

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Months,
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl TimeUnit {
    /// Coarsest first.
    pub const ORDERED: [TimeUnit; 5] = [
        TimeUnit::Months,
        TimeUnit::Days,
        TimeUnit::Hours,
        TimeUnit::Minutes,
        TimeUnit::Seconds,
    ];

    /// Fixed unit size. A month is counted as 30 days.
    pub fn seconds(&self) -> i64 {
        match self {
            TimeUnit::Months => 30 * 86_400,
            TimeUnit::Days => 86_400,
            TimeUnit::Hours => 3_600,
            TimeUnit::Minutes => 60,
            TimeUnit::Seconds => 1,
        }
    }
}

/// Which units the countdown widget displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnabledUnits {
    pub months: bool,
    pub days: bool,
    pub hours: bool,
    pub minutes: bool,
    pub seconds: bool,
}

impl Default for EnabledUnits {
    fn default() -> Self {
        Self {
            months: false,
            days: true,
            hours: true,
            minutes: true,
            seconds: true,
        }
    }
}

impl EnabledUnits {
    pub fn only(unit: TimeUnit) -> Self {
        let mut units = Self {
            months: false,
            days: false,
            hours: false,
            minutes: false,
            seconds: false,
        };
        units.set(unit, true);
        units
    }

    pub fn is_enabled(&self, unit: TimeUnit) -> bool {
        match unit {
            TimeUnit::Months => self.months,
            TimeUnit::Days => self.days,
            TimeUnit::Hours => self.hours,
            TimeUnit::Minutes => self.minutes,
            TimeUnit::Seconds => self.seconds,
        }
    }

    pub fn set(&mut self, unit: TimeUnit, enabled: bool) {
        match unit {
            TimeUnit::Months => self.months = enabled,
            TimeUnit::Days => self.days = enabled,
            TimeUnit::Hours => self.hours = enabled,
            TimeUnit::Minutes => self.minutes = enabled,
            TimeUnit::Seconds => self.seconds = enabled,
        }
    }

    pub fn any(&self) -> bool {
        TimeUnit::ORDERED.iter().any(|unit| self.is_enabled(*unit))
    }
}
