// Per-event display configuration records.
// All three follow fetch-or-create-default: a missing row reads as the default.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::utils::current_millis;
use crate::value_objects::{EnabledUnits, EventId};

const MAX_SEAT_ROWS: u32 = 52;
const MAX_SEATS_PER_ROW: u32 = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSettings {
    pub event_id: EventId,
    pub title: String,
    pub units: EnabledUnits,
    pub theme: String,
    pub passed_message: String,
    pub updated_at: i64,
}

impl TimerSettings {
    pub fn default_for(event_id: EventId) -> Self {
        Self {
            event_id,
            title: "Countdown".to_string(),
            units: EnabledUnits::default(),
            theme: "classic".to_string(),
            passed_message: "The event has started!".to_string(),
            updated_at: current_millis(),
        }
    }

    pub fn apply(&mut self, patch: TimerSettingsPatch) -> DomainResult<()> {
        if let Some(title) = patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(units) = patch.units {
            if !units.any() {
                return Err(DomainError::InvalidInput(
                    "at least one countdown unit must be enabled".to_string(),
                ));
            }
            self.units = units;
        }
        if let Some(theme) = patch.theme {
            self.theme = theme.trim().to_lowercase();
        }
        if let Some(message) = patch.passed_message {
            self.passed_message = message.trim().to_string();
        }
        self.updated_at = current_millis();
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TimerSettingsPatch {
    pub title: Option<String>,
    pub units: Option<EnabledUnits>,
    pub theme: Option<String>,
    pub passed_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketConfig {
    pub event_id: EventId,
    pub enabled: bool,
    pub price: f64,
    pub currency: String,
    pub capacity: Option<u32>,
    pub accent_color: String,
    pub background: String,
    pub footer_text: String,
    pub updated_at: i64,
}

impl TicketConfig {
    pub fn default_for(event_id: EventId) -> Self {
        Self {
            event_id,
            enabled: false,
            price: 0.0,
            currency: "USD".to_string(),
            capacity: None,
            accent_color: "#7c3aed".to_string(),
            background: "gradient".to_string(),
            footer_text: String::new(),
            updated_at: current_millis(),
        }
    }

    pub fn apply(&mut self, patch: TicketConfigPatch) -> DomainResult<()> {
        if let Some(enabled) = patch.enabled {
            self.enabled = enabled;
        }
        if let Some(price) = patch.price {
            if !price.is_finite() || price < 0.0 {
                return Err(DomainError::InvalidInput("price must be a non-negative number".to_string()));
            }
            self.price = price;
        }
        if let Some(currency) = patch.currency {
            let currency = currency.trim().to_uppercase();
            if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
                return Err(DomainError::InvalidInput(format!("invalid currency '{}'", currency)));
            }
            self.currency = currency;
        }
        if let Some(capacity) = patch.capacity {
            self.capacity = if capacity == 0 { None } else { Some(capacity) };
        }
        if let Some(color) = patch.accent_color {
            self.accent_color = color.trim().to_string();
        }
        if let Some(background) = patch.background {
            self.background = background.trim().to_string();
        }
        if let Some(footer) = patch.footer_text {
            self.footer_text = footer.trim().to_string();
        }
        self.updated_at = current_millis();
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TicketConfigPatch {
    pub enabled: Option<bool>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    /// Zero clears the limit.
    pub capacity: Option<u32>,
    pub accent_color: Option<String>,
    pub background: Option<String>,
    pub footer_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatmapConfig {
    pub event_id: EventId,
    pub rows: u32,
    pub seats_per_row: u32,
    pub aisle_after: Option<u32>,
    pub reserved: Vec<String>,
    pub updated_at: i64,
}

impl SeatmapConfig {
    pub fn default_for(event_id: EventId) -> Self {
        Self {
            event_id,
            rows: 10,
            seats_per_row: 12,
            aisle_after: Some(6),
            reserved: Vec::new(),
            updated_at: current_millis(),
        }
    }

    pub fn seat_count(&self) -> u32 {
        self.rows * self.seats_per_row
    }

    pub fn available_seats(&self) -> u32 {
        self.seat_count().saturating_sub(self.reserved.len() as u32)
    }

    pub fn apply(&mut self, patch: SeatmapConfigPatch) -> DomainResult<()> {
        let mut next = self.clone();
        if let Some(rows) = patch.rows {
            next.rows = rows;
        }
        if let Some(seats) = patch.seats_per_row {
            next.seats_per_row = seats;
        }
        if let Some(aisle) = patch.aisle_after {
            next.aisle_after = if aisle == 0 { None } else { Some(aisle) };
        }
        if let Some(reserved) = patch.reserved {
            let mut labels: Vec<String> = reserved
                .into_iter()
                .map(|label| label.trim().to_uppercase())
                .filter(|label| !label.is_empty())
                .collect();
            labels.sort();
            labels.dedup();
            next.reserved = labels;
        }
        next.validate()?;
        next.updated_at = current_millis();
        *self = next;
        Ok(())
    }

    fn validate(&self) -> DomainResult<()> {
        if self.rows == 0 || self.rows > MAX_SEAT_ROWS {
            return Err(DomainError::InvalidInput(format!(
                "rows must be between 1 and {}",
                MAX_SEAT_ROWS
            )));
        }
        if self.seats_per_row == 0 || self.seats_per_row > MAX_SEATS_PER_ROW {
            return Err(DomainError::InvalidInput(format!(
                "seats_per_row must be between 1 and {}",
                MAX_SEATS_PER_ROW
            )));
        }
        if let Some(aisle) = self.aisle_after {
            if aisle >= self.seats_per_row {
                return Err(DomainError::InvalidInput("aisle_after must be inside the row".to_string()));
            }
        }
        for label in &self.reserved {
            let Some((row, seat)) = parse_seat_label(label) else {
                return Err(DomainError::InvalidInput(format!("invalid seat label '{}'", label)));
            };
            if row >= self.rows || seat == 0 || seat > self.seats_per_row {
                return Err(DomainError::InvalidInput(format!("seat '{}' is outside the map", label)));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeatmapConfigPatch {
    pub rows: Option<u32>,
    pub seats_per_row: Option<u32>,
    /// Zero removes the aisle.
    pub aisle_after: Option<u32>,
    pub reserved: Option<Vec<String>>,
}

/// Row index 0 is `A`, 25 is `Z`, 26 is `AA`; seats are numbered from 1.
pub fn seat_label(row: u32, seat: u32) -> String {
    let letters = if row < 26 {
        char::from(b'A' + row as u8).to_string()
    } else {
        let first = char::from(b'A' + (row / 26 - 1) as u8);
        let second = char::from(b'A' + (row % 26) as u8);
        format!("{}{}", first, second)
    };
    format!("{}{}", letters, seat)
}

pub fn parse_seat_label(label: &str) -> Option<(u32, u32)> {
    let split = label.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = label.split_at(split);
    let seat = digits.parse::<u32>().ok()?;
    let bytes = letters.as_bytes();
    if !bytes.iter().all(|b| b.is_ascii_uppercase()) {
        return None;
    }
    let row = match bytes.len() {
        1 => u32::from(bytes[0] - b'A'),
        2 => (u32::from(bytes[0] - b'A') + 1) * 26 + u32::from(bytes[1] - b'A'),
        _ => return None,
    };
    Some((row, seat))
}
