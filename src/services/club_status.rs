//! Read-only status page of a club: its upcoming events and the budget
//! requests tied to any of its events.
//!
//! Failures never abort the whole view. Each failed step leaves its list empty
//! and records a notice instead.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{error, warn};

use crate::models::{BudgetRequest, Event, EventStatus, Notice, RequestStatus};
use crate::store::PortalStore;

pub const UNKNOWN_EVENT: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClubEventView {
    pub eventid: i64,
    pub eventname: String,
    pub date: NaiveDate,
    pub status: EventStatus,
    pub allocatedbudget: Option<f64>,
    /// Only present for rejected events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<Event> for ClubEventView {
    fn from(event: Event) -> Self {
        let reason = match event.status {
            EventStatus::Rejected => event.reason,
            _ => None,
        };

        ClubEventView {
            eventid: event.eventid,
            eventname: event.eventname,
            date: event.date,
            status: event.status,
            allocatedbudget: event.allocatedbudget,
            reason,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClubBudgetRequestView {
    pub requestid: i64,
    pub eventid: i64,
    pub eventname: String,
    pub requestedamount: f64,
    pub status: RequestStatus,
    /// Only present once approved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allocatedamount: Option<f64>,
    /// Only present once rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

impl ClubBudgetRequestView {
    fn decorate(request: BudgetRequest, events: &[ClubEventView]) -> Self {
        let eventname = events
            .iter()
            .find(|e| e.eventid == request.eventid)
            .map(|e| e.eventname.clone())
            .unwrap_or_else(|| UNKNOWN_EVENT.to_string());

        let (allocatedamount, feedback) = match request.status {
            RequestStatus::Approved => (request.allocatedamount, None),
            RequestStatus::Rejected => (None, request.adminfeedback),
            RequestStatus::Pending => (None, None),
        };

        ClubBudgetRequestView {
            requestid: request.requestid,
            eventid: request.eventid,
            eventname,
            requestedamount: request.requestedamount,
            status: request.status,
            allocatedamount,
            feedback,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClubStatusView {
    pub events: Vec<ClubEventView>,
    pub budget_requests: Vec<ClubBudgetRequestView>,
    pub notices: Vec<Notice>,
}

pub struct ClubStatus<'a, S> {
    store: &'a S,
}

impl<'a, S: PortalStore> ClubStatus<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub async fn load(&self, email: &str, today: NaiveDate) -> ClubStatusView {
        let mut view = ClubStatusView::default();

        let clubid = match self.store.find_club_id(email).await {
            Ok(Some(clubid)) => clubid,
            Ok(None) => {
                warn!("Club ID not found for email: {}", email);
                view.notices.push(Notice::error(
                    "Club ID not found for email",
                    Some(email.to_string()),
                ));
                return view;
            }
            Err(e) => {
                error!("Error fetching club ID for {}: {}", email, e);
                view.notices
                    .push(Notice::error("Error fetching club ID", Some(e.to_string())));
                return view;
            }
        };

        match self.store.upcoming_club_events(clubid, today).await {
            Ok(events) => view.events = events.into_iter().map(ClubEventView::from).collect(),
            Err(e) => {
                error!("Error fetching events for club {}: {}", clubid, e);
                view.notices
                    .push(Notice::error("Error fetching events", Some(e.to_string())));
            }
        }

        match self.club_budget_requests(clubid).await {
            Ok(requests) => {
                view.budget_requests = requests
                    .into_iter()
                    .map(|r| ClubBudgetRequestView::decorate(r, &view.events))
                    .collect();
            }
            Err(notice) => view.notices.push(notice),
        }

        view
    }

    async fn club_budget_requests(&self, clubid: i64) -> Result<Vec<BudgetRequest>, Notice> {
        let eventids = self.store.club_event_ids(clubid).await.map_err(|e| {
            error!("Error fetching event ids for club {}: {}", clubid, e);
            Notice::error("Error fetching events", Some(e.to_string()))
        })?;

        if eventids.is_empty() {
            warn!("No events found for club ID: {}", clubid);
            return Err(Notice::info("No events found for club", Some(clubid.to_string())));
        }

        self.store
            .budget_requests_for_events(&eventids)
            .await
            .map_err(|e| {
                error!("Error fetching budget requests for club {}: {}", clubid, e);
                Notice::error("Error fetching budget requests", Some(e.to_string()))
            })
    }
}
