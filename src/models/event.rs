use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::EventStatus;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Event {
    pub eventid: i64,
    pub clubid: i64,
    pub eventname: String,
    pub date: NaiveDate,
    pub venue: String,
    #[sqlx(try_from = "String")]
    pub status: EventStatus,
    pub requestedbudget: f64,
    pub allocatedbudget: Option<f64>,
    pub reason: Option<String>,
}

/// A pending event as shown in the admin queue, decorated with its club name.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct PendingEvent {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub event: Event,
    pub clubname: Option<String>,
}

/// Columns written by an admin decision on an event.
///
/// `allocated_budget: None` leaves the stored allocation untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct EventTransition {
    pub status: EventStatus,
    pub allocated_budget: Option<f64>,
    pub reason: Option<String>,
}

/// Club submission of a new event.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewEventRequest {
    #[validate(length(min = 1, max = 200, message = "event name must be 1-200 characters"))]
    pub eventname: String,
    pub date: NaiveDate,
    #[validate(length(min = 1, max = 200, message = "venue must be 1-200 characters"))]
    pub venue: String,
    #[validate(range(min = 0.0, message = "requested budget cannot be negative"))]
    pub requestedbudget: f64,
}

impl NewEventRequest {
    pub fn trimmed(self) -> Self {
        Self {
            eventname: self.eventname.trim().to_string(),
            venue: self.venue.trim().to_string(),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub clubid: i64,
    pub eventname: String,
    pub date: NaiveDate,
    pub venue: String,
    pub requestedbudget: f64,
}
