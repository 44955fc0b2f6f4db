//! Admin review of pending events and budget requests.
//!
//! The admin picks one pending record (a [`Selection`]), decides to approve or
//! reject it and the decision is written back as a single conditional update.
//! The pending lists are queried again after every successful transition so
//! processed records drop out of the queue immediately.

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::error::{PortalError, Result};
use crate::models::{
    BudgetRequest, BudgetRequestTransition, Event, EventStatus, EventTransition, Notice,
    PendingBudgetRequest, PendingEvent, RequestStatus,
};
use crate::store::PortalStore;

pub const MISSING_AMOUNT: &str = "Please enter the allocated amount";

/// The record the admin is currently reviewing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Selection {
    #[default]
    None,
    Event(i64),
    BudgetRequest(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewAction {
    Approve,
    Reject,
}

/// A validated admin decision.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Approve { allocated: f64, remark: Option<String> },
    Reject { remark: Option<String> },
}

impl Decision {
    pub fn new(
        action: ReviewAction,
        allocated_amount: Option<f64>,
        remark: Option<String>,
    ) -> Result<Self> {
        let remark = remark
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());

        match action {
            ReviewAction::Approve => match allocated_amount {
                Some(amount) if amount.is_finite() && amount > 0.0 => {
                    Ok(Decision::Approve { allocated: amount, remark })
                }
                _ => Err(PortalError::Validation(MISSING_AMOUNT.to_string())),
            },
            ReviewAction::Reject => Ok(Decision::Reject { remark }),
        }
    }

    fn event_transition(&self) -> EventTransition {
        match self {
            Decision::Approve { allocated, remark } => EventTransition {
                status: EventStatus::Scheduled,
                allocated_budget: Some(*allocated),
                reason: remark.clone(),
            },
            Decision::Reject { remark } => EventTransition {
                status: EventStatus::Rejected,
                allocated_budget: None,
                reason: remark.clone(),
            },
        }
    }

    fn budget_request_transition(&self) -> BudgetRequestTransition {
        match self {
            Decision::Approve { allocated, remark } => BudgetRequestTransition {
                status: RequestStatus::Approved,
                allocated_amount: Some(*allocated),
                admin_feedback: remark.clone(),
            },
            Decision::Reject { remark } => BudgetRequestTransition {
                status: RequestStatus::Rejected,
                allocated_amount: None,
                admin_feedback: remark.clone(),
            },
        }
    }
}

/// Body of `POST /api/admin/review`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewRequest {
    #[serde(default)]
    pub selection: Selection,
    pub action: ReviewAction,
    pub allocated_amount: Option<f64>,
    pub remark: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReviewQueue {
    pub events: Vec<PendingEvent>,
    pub budget_requests: Vec<PendingBudgetRequest>,
}

impl ReviewQueue {
    pub fn find(&self, selection: Selection) -> Option<ReviewDetail> {
        match selection {
            Selection::None => None,
            Selection::Event(id) => self
                .events
                .iter()
                .find(|e| e.event.eventid == id)
                .cloned()
                .map(ReviewDetail::Event),
            Selection::BudgetRequest(id) => self
                .budget_requests
                .iter()
                .find(|r| r.request.requestid == id)
                .cloned()
                .map(ReviewDetail::BudgetRequest),
        }
    }
}

/// The record shown in the detail dialog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReviewDetail {
    Event(PendingEvent),
    BudgetRequest(PendingBudgetRequest),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "record", rename_all = "snake_case")]
pub enum ReviewedRecord {
    Event(Event),
    BudgetRequest(BudgetRequest),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewOutcome {
    pub record: ReviewedRecord,
    pub notices: Vec<Notice>,
    /// Pending lists after the transition; `None` when the refresh failed.
    pub queue: Option<ReviewQueue>,
}

pub struct AdminReview<'a, S> {
    store: &'a S,
}

impl<'a, S: PortalStore> AdminReview<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub async fn load_queue(&self) -> Result<ReviewQueue> {
        let events = self.store.pending_events().await.map_err(|e| {
            error!("Error fetching pending events: {}", e);
            e
        })?;

        let budget_requests = self.store.pending_budget_requests().await.map_err(|e| {
            error!("Error fetching pending budget requests: {}", e);
            e
        })?;

        Ok(ReviewQueue { events, budget_requests })
    }

    pub async fn details(&self, selection: Selection) -> Result<ReviewDetail> {
        let queue = self.load_queue().await?;
        queue.find(selection).ok_or(match selection {
            Selection::Event(id) => PortalError::EventNotFound(id),
            Selection::BudgetRequest(id) => PortalError::BudgetRequestNotFound(id),
            Selection::None => PortalError::Validation(
                "Select an event or budget request to review".to_string(),
            ),
        })
    }

    /// Writes `decision` to the selected record. Exactly one update is issued.
    pub async fn apply(&self, selection: Selection, decision: &Decision) -> Result<ReviewedRecord> {
        match selection {
            Selection::None => Err(PortalError::Validation(
                "Select an event or budget request to review".to_string(),
            )),
            Selection::Event(id) => {
                let transition = decision.event_transition();
                match self.store.transition_event(id, &transition).await? {
                    Some(event) => {
                        info!("Event {} moved to {}", id, event.status);
                        Ok(ReviewedRecord::Event(event))
                    }
                    None => Err(match self.store.event_status(id).await? {
                        Some(status) if status.is_terminal() => PortalError::AlreadyProcessed {
                            kind: "Event",
                            id,
                            status: status.to_string(),
                        },
                        Some(_) => PortalError::Internal(format!(
                            "event {id} is still pending but the update matched nothing"
                        )),
                        None => PortalError::EventNotFound(id),
                    }),
                }
            }
            Selection::BudgetRequest(id) => {
                let transition = decision.budget_request_transition();
                match self.store.transition_budget_request(id, &transition).await? {
                    Some(request) => {
                        info!("Budget request {} moved to {}", id, request.status);
                        Ok(ReviewedRecord::BudgetRequest(request))
                    }
                    None => Err(match self.store.budget_request_status(id).await? {
                        Some(status) if status.is_terminal() => PortalError::AlreadyProcessed {
                            kind: "Budget request",
                            id,
                            status: status.to_string(),
                        },
                        Some(_) => PortalError::Internal(format!(
                            "budget request {id} is still pending but the update matched nothing"
                        )),
                        None => PortalError::BudgetRequestNotFound(id),
                    }),
                }
            }
        }
    }

    /// Validates, applies and refreshes the queue.
    pub async fn review(&self, request: ReviewRequest) -> Result<ReviewOutcome> {
        let decision = Decision::new(request.action, request.allocated_amount, request.remark)
            .map_err(|e| {
                warn!("Review of {:?} refused: {}", request.selection, e);
                e
            })?;

        let record = self.apply(request.selection, &decision).await.map_err(|e| {
            error!("Error updating {:?}: {}", request.selection, e);
            e
        })?;

        let mut notices = vec![Notice::success(success_title(&record))];

        let queue = match self.load_queue().await {
            Ok(queue) => Some(queue),
            Err(e) => {
                notices.push(Notice::error("Error refreshing pending requests", Some(e.to_string())));
                None
            }
        };

        Ok(ReviewOutcome { record, notices, queue })
    }
}

fn success_title(record: &ReviewedRecord) -> &'static str {
    match record {
        ReviewedRecord::Event(event) if event.status == EventStatus::Scheduled => "Scheduled event",
        ReviewedRecord::Event(_) => "Rejected event",
        ReviewedRecord::BudgetRequest(request) if request.status == RequestStatus::Approved => {
            "Approved budget request"
        }
        ReviewedRecord::BudgetRequest(_) => "Rejected budget request",
    }
}
