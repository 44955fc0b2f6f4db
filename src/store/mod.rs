//! Thin access layer over the `clubs`, `events` and `budgetrequests` tables.
//!
//! Services only talk to the backend through [`PortalStore`]; the Postgres
//! implementation lives in [`postgres`].

use chrono::NaiveDate;
use std::future::Future;

use crate::error::Result;
use crate::models::{
    Account, BudgetRequest, BudgetRequestTransition, Event, EventStatus, EventTransition,
    NewEvent, PendingBudgetRequest, PendingEvent, RequestStatus,
};

pub mod postgres;

pub trait PortalStore: Send + Sync {
    /// Events with status `Pending`, joined with the club name, ordered by date.
    fn pending_events(&self) -> impl Future<Output = Result<Vec<PendingEvent>>> + Send;

    /// Budget requests with status `Pending`, joined with event and club names.
    fn pending_budget_requests(
        &self,
    ) -> impl Future<Output = Result<Vec<PendingBudgetRequest>>> + Send;

    /// Applies `transition` only while the event is still `Pending`.
    ///
    /// Returns `None` when no row was updated.
    fn transition_event(
        &self,
        eventid: i64,
        transition: &EventTransition,
    ) -> impl Future<Output = Result<Option<Event>>> + Send;

    /// Applies `transition` only while the request is still `Pending`.
    fn transition_budget_request(
        &self,
        requestid: i64,
        transition: &BudgetRequestTransition,
    ) -> impl Future<Output = Result<Option<BudgetRequest>>> + Send;

    fn event_status(&self, eventid: i64) -> impl Future<Output = Result<Option<EventStatus>>> + Send;

    fn budget_request_status(
        &self,
        requestid: i64,
    ) -> impl Future<Output = Result<Option<RequestStatus>>> + Send;

    fn find_club_id(&self, email: &str) -> impl Future<Output = Result<Option<i64>>> + Send;

    /// Events of a club dated on or after `from`, ascending.
    fn upcoming_club_events(
        &self,
        clubid: i64,
        from: NaiveDate,
    ) -> impl Future<Output = Result<Vec<Event>>> + Send;

    /// Ids of every event of a club, regardless of date.
    fn club_event_ids(&self, clubid: i64) -> impl Future<Output = Result<Vec<i64>>> + Send;

    fn budget_requests_for_events(
        &self,
        eventids: &[i64],
    ) -> impl Future<Output = Result<Vec<BudgetRequest>>> + Send;

    fn insert_event(&self, event: &NewEvent) -> impl Future<Output = Result<Event>> + Send;

    fn find_account(&self, email: &str) -> impl Future<Output = Result<Option<Account>>> + Send;
}
