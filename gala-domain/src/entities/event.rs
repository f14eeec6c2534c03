// Event entity
// The root aggregate every other record hangs off.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::utils::{current_millis, normalize_optional_text};
use crate::value_objects::{EventId, UserId};

const INVITE_CODE_LEN: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl Location {
    fn validate(&self) -> DomainResult<()> {
        if let Some(lat) = self.latitude {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(DomainError::InvalidInput(format!("latitude {} out of range", lat)));
            }
        }
        if let Some(lon) = self.longitude {
            if !(-180.0..=180.0).contains(&lon) {
                return Err(DomainError::InvalidInput(format!("longitude {} out of range", lon)));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub owner_id: UserId,
    pub name: String,
    pub event_type: String,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub location: Location,
    pub budget: f64,
    pub guest_estimate: u32,
    pub is_public: bool,
    pub invite_code: String,
    pub created_at: i64,
}

impl Event {
    pub fn create(input: NewEvent) -> DomainResult<Self> {
        let input = input.normalized();
        input.validate()?;
        Ok(Self {
            id: EventId::new(),
            owner_id: input.owner_id,
            name: input.name,
            event_type: input.event_type,
            date: input.date,
            time: input.time,
            location: input.location,
            budget: input.budget,
            guest_estimate: input.guest_estimate,
            is_public: input.is_public,
            invite_code: generate_invite_code(),
            created_at: current_millis(),
        })
    }

    /// Start instant; an event without a time starts at midnight.
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time.unwrap_or(NaiveTime::MIN))
    }

    pub fn apply(&mut self, patch: EventPatch) -> DomainResult<()> {
        if let Some(name) = normalize_optional_text(patch.name) {
            self.name = name;
        }
        if let Some(event_type) = normalize_optional_text(patch.event_type) {
            self.event_type = event_type.to_lowercase();
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(time) = patch.time {
            self.time = Some(time);
        }
        if let Some(location) = patch.location {
            location.validate()?;
            self.location = location;
        }
        if let Some(budget) = patch.budget {
            validate_budget(budget)?;
            self.budget = budget;
        }
        if let Some(guest_estimate) = patch.guest_estimate {
            self.guest_estimate = guest_estimate;
        }
        if let Some(is_public) = patch.is_public {
            self.is_public = is_public;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
    pub owner_id: UserId,
    pub name: String,
    #[serde(default = "default_event_type")]
    pub event_type: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub time: Option<NaiveTime>,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub budget: f64,
    #[serde(default)]
    pub guest_estimate: u32,
    #[serde(default)]
    pub is_public: bool,
}

impl NewEvent {
    fn normalized(mut self) -> Self {
        self.owner_id = UserId(self.owner_id.0.trim().to_string());
        self.name = self.name.trim().to_string();
        self.event_type = self.event_type.trim().to_lowercase();
        if self.event_type.is_empty() {
            self.event_type = default_event_type();
        }
        self.location.country = self.location.country.trim().to_string();
        self.location.state = normalize_optional_text(self.location.state.take());
        self
    }

    fn validate(&self) -> DomainResult<()> {
        if self.owner_id.as_str().is_empty() {
            return Err(DomainError::InvalidInput("owner_id is required".to_string()));
        }
        if self.name.is_empty() {
            return Err(DomainError::InvalidInput("event name is required".to_string()));
        }
        validate_budget(self.budget)?;
        self.location.validate()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EventPatch {
    pub name: Option<String>,
    pub event_type: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub location: Option<Location>,
    pub budget: Option<f64>,
    pub guest_estimate: Option<u32>,
    pub is_public: Option<bool>,
}

fn default_event_type() -> String {
    "party".to_string()
}

fn validate_budget(budget: f64) -> DomainResult<()> {
    if !budget.is_finite() || budget < 0.0 {
        return Err(DomainError::InvalidInput("budget must be a non-negative number".to_string()));
    }
    Ok(())
}

pub fn generate_invite_code() -> String {
    let raw = Uuid::new_v4().simple().to_string().to_uppercase();
    raw[..INVITE_CODE_LEN].to_string()
}

pub fn normalize_invite_code(code: &str) -> String {
    code.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_event() -> NewEvent {
        NewEvent {
            owner_id: UserId(" user-1 ".to_string()),
            name: "  Summer Gala ".to_string(),
            event_type: "Wedding".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 7, 4).expect("date"),
            time: None,
            location: Location::default(),
            budget: 1500.0,
            guest_estimate: 80,
            is_public: false,
        }
    }

    #[test]
    fn create_normalizes_and_issues_invite_code() {
        let event = Event::create(new_event()).expect("event");
        assert_eq!(event.name, "Summer Gala");
        assert_eq!(event.event_type, "wedding");
        assert_eq!(event.owner_id.as_str(), "user-1");
        assert_eq!(event.invite_code.len(), INVITE_CODE_LEN);
        assert_eq!(event.invite_code, normalize_invite_code(&event.invite_code));
    }

    #[test]
    fn create_rejects_negative_budget_and_blank_name() {
        let mut input = new_event();
        input.budget = -1.0;
        assert!(Event::create(input).is_err());

        let mut input = new_event();
        input.name = "   ".to_string();
        assert!(Event::create(input).is_err());
    }

    #[test]
    fn starts_at_defaults_to_midnight() {
        let mut event = Event::create(new_event()).expect("event");
        assert_eq!(event.starts_at().time(), NaiveTime::MIN);
        event.time = NaiveTime::from_hms_opt(18, 30, 0);
        assert_eq!(event.starts_at().time(), NaiveTime::from_hms_opt(18, 30, 0).expect("time"));
    }

    #[test]
    fn patch_rejects_out_of_range_coordinates() {
        let mut event = Event::create(new_event()).expect("event");
        let patch = EventPatch {
            location: Some(Location {
                country: "PT".to_string(),
                state: None,
                latitude: Some(123.0),
                longitude: None,
            }),
            ..EventPatch::default()
        };
        assert!(event.apply(patch).is_err());
    }
}
