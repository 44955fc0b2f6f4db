//! Shared test infrastructure: an in-memory `PortalStore` that records every
//! write and can be told to fail individual operations.

#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use fake::{faker::company::en::CompanyName, Fake};
use std::collections::HashSet;
use std::sync::Mutex;

use club_portal::error::{PortalError, Result};
use club_portal::models::{
    Account, BudgetRequest, BudgetRequestTransition, Event, EventStatus, EventTransition,
    NewEvent, PendingBudgetRequest, PendingEvent, RequestStatus, Role,
};
use club_portal::store::PortalStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    PendingEvents,
    PendingBudgetRequests,
    TransitionEvent,
    TransitionBudgetRequest,
    FindClub,
    UpcomingEvents,
    ClubEventIds,
    BudgetRequestsForEvents,
    InsertEvent,
    FindAccount,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    Event(i64, EventTransition),
    BudgetRequest(i64, BudgetRequestTransition),
    Insert(NewEvent),
}

#[derive(Debug, Clone)]
pub struct Club {
    pub clubid: i64,
    pub clubname: String,
    pub email: String,
}

#[derive(Default)]
struct Tables {
    clubs: Vec<Club>,
    events: Vec<Event>,
    requests: Vec<BudgetRequest>,
    accounts: Vec<Account>,
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    writes: Mutex<Vec<Write>>,
    failing: Mutex<HashSet<Op>>,
    lost_updates: Mutex<bool>,
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
}

pub fn days_from_today(days: i64) -> NaiveDate {
    today() + Duration::days(days)
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_club(&self, email: &str) -> i64 {
        let mut tables = self.tables.lock().unwrap();
        let clubid = tables.clubs.len() as i64 + 1;
        tables.clubs.push(Club {
            clubid,
            clubname: CompanyName().fake(),
            email: email.to_string(),
        });
        clubid
    }

    /// Stores an account with a low-cost bcrypt hash of `password`.
    pub fn add_account(&self, email: &str, password: &str, role: Role) {
        let password_hash = bcrypt::hash(password, 4).unwrap();
        self.add_account_with_hash(email, &password_hash, role);
    }

    pub fn add_account_with_hash(&self, email: &str, password_hash: &str, role: Role) {
        self.tables.lock().unwrap().accounts.push(Account {
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role,
        });
    }

    pub fn club_name(&self, clubid: i64) -> String {
        let tables = self.tables.lock().unwrap();
        tables
            .clubs
            .iter()
            .find(|c| c.clubid == clubid)
            .map(|c| c.clubname.clone())
            .unwrap()
    }

    pub fn add_event(&self, clubid: i64, name: &str, date: NaiveDate, status: EventStatus) -> i64 {
        let mut tables = self.tables.lock().unwrap();
        let eventid = tables.events.len() as i64 + 100;
        tables.events.push(Event {
            eventid,
            clubid,
            eventname: name.to_string(),
            date,
            venue: "Main Auditorium".to_string(),
            status,
            requestedbudget: 1500.0,
            allocatedbudget: None,
            reason: None,
        });
        eventid
    }

    pub fn add_request(&self, eventid: i64, amount: f64, status: RequestStatus) -> i64 {
        let mut tables = self.tables.lock().unwrap();
        let requestid = tables.requests.len() as i64 + 500;
        tables.requests.push(BudgetRequest {
            requestid,
            eventid,
            requestedamount: amount,
            allocatedamount: None,
            status,
            reason: Some("Speaker travel".to_string()),
            adminfeedback: None,
        });
        requestid
    }

    pub fn set_request(&self, requestid: i64, f: impl FnOnce(&mut BudgetRequest)) {
        let mut tables = self.tables.lock().unwrap();
        let request = tables.requests.iter_mut().find(|r| r.requestid == requestid).unwrap();
        f(request);
    }

    pub fn event(&self, eventid: i64) -> Event {
        let tables = self.tables.lock().unwrap();
        tables.events.iter().find(|e| e.eventid == eventid).cloned().unwrap()
    }

    pub fn request(&self, requestid: i64) -> BudgetRequest {
        let tables = self.tables.lock().unwrap();
        tables.requests.iter().find(|r| r.requestid == requestid).cloned().unwrap()
    }

    pub fn writes(&self) -> Vec<Write> {
        self.writes.lock().unwrap().clone()
    }

    pub fn fail(&self, op: Op) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn recover(&self, op: Op) {
        self.failing.lock().unwrap().remove(&op);
    }

    /// Makes conditional updates match nothing, as when another writer wins
    /// between the update and the status lookup.
    pub fn lose_updates(&self) {
        *self.lost_updates.lock().unwrap() = true;
    }

    fn check(&self, op: Op) -> Result<()> {
        if self.failing.lock().unwrap().contains(&op) {
            return Err(PortalError::Internal(format!("{op:?}: connection refused")));
        }
        Ok(())
    }
}

impl PortalStore for InMemoryStore {
    async fn pending_events(&self) -> Result<Vec<PendingEvent>> {
        self.check(Op::PendingEvents)?;
        let tables = self.tables.lock().unwrap();
        let mut events: Vec<PendingEvent> = tables
            .events
            .iter()
            .filter(|e| e.status == EventStatus::Pending)
            .map(|e| PendingEvent {
                event: e.clone(),
                clubname: tables
                    .clubs
                    .iter()
                    .find(|c| c.clubid == e.clubid)
                    .map(|c| c.clubname.clone()),
            })
            .collect();
        events.sort_by_key(|p| (p.event.date, p.event.eventid));
        Ok(events)
    }

    async fn pending_budget_requests(&self) -> Result<Vec<PendingBudgetRequest>> {
        self.check(Op::PendingBudgetRequests)?;
        let tables = self.tables.lock().unwrap();
        let mut requests: Vec<PendingBudgetRequest> = tables
            .requests
            .iter()
            .filter(|r| r.status == RequestStatus::Pending)
            .map(|r| {
                let event = tables.events.iter().find(|e| e.eventid == r.eventid);
                PendingBudgetRequest {
                    request: r.clone(),
                    eventname: event.map(|e| e.eventname.clone()),
                    clubname: event.and_then(|e| {
                        tables
                            .clubs
                            .iter()
                            .find(|c| c.clubid == e.clubid)
                            .map(|c| c.clubname.clone())
                    }),
                }
            })
            .collect();
        requests.sort_by_key(|p| p.request.requestid);
        Ok(requests)
    }

    async fn transition_event(
        &self,
        eventid: i64,
        transition: &EventTransition,
    ) -> Result<Option<Event>> {
        self.check(Op::TransitionEvent)?;
        self.writes
            .lock()
            .unwrap()
            .push(Write::Event(eventid, transition.clone()));
        if *self.lost_updates.lock().unwrap() {
            return Ok(None);
        }

        let mut tables = self.tables.lock().unwrap();
        let Some(event) = tables
            .events
            .iter_mut()
            .find(|e| e.eventid == eventid && e.status == EventStatus::Pending)
        else {
            return Ok(None);
        };
        event.status = transition.status;
        if let Some(amount) = transition.allocated_budget {
            event.allocatedbudget = Some(amount);
        }
        event.reason = transition.reason.clone();
        Ok(Some(event.clone()))
    }

    async fn transition_budget_request(
        &self,
        requestid: i64,
        transition: &BudgetRequestTransition,
    ) -> Result<Option<BudgetRequest>> {
        self.check(Op::TransitionBudgetRequest)?;
        self.writes
            .lock()
            .unwrap()
            .push(Write::BudgetRequest(requestid, transition.clone()));
        if *self.lost_updates.lock().unwrap() {
            return Ok(None);
        }

        let mut tables = self.tables.lock().unwrap();
        let Some(request) = tables
            .requests
            .iter_mut()
            .find(|r| r.requestid == requestid && r.status == RequestStatus::Pending)
        else {
            return Ok(None);
        };
        request.status = transition.status;
        if let Some(amount) = transition.allocated_amount {
            request.allocatedamount = Some(amount);
        }
        request.adminfeedback = transition.admin_feedback.clone();
        Ok(Some(request.clone()))
    }

    async fn event_status(&self, eventid: i64) -> Result<Option<EventStatus>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.events.iter().find(|e| e.eventid == eventid).map(|e| e.status))
    }

    async fn budget_request_status(&self, requestid: i64) -> Result<Option<RequestStatus>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .requests
            .iter()
            .find(|r| r.requestid == requestid)
            .map(|r| r.status))
    }

    async fn find_club_id(&self, email: &str) -> Result<Option<i64>> {
        self.check(Op::FindClub)?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.clubs.iter().find(|c| c.email == email).map(|c| c.clubid))
    }

    async fn upcoming_club_events(&self, clubid: i64, from: NaiveDate) -> Result<Vec<Event>> {
        self.check(Op::UpcomingEvents)?;
        let tables = self.tables.lock().unwrap();
        let mut events: Vec<Event> = tables
            .events
            .iter()
            .filter(|e| e.clubid == clubid && e.date >= from)
            .cloned()
            .collect();
        events.sort_by_key(|e| (e.date, e.eventid));
        Ok(events)
    }

    async fn club_event_ids(&self, clubid: i64) -> Result<Vec<i64>> {
        self.check(Op::ClubEventIds)?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .events
            .iter()
            .filter(|e| e.clubid == clubid)
            .map(|e| e.eventid)
            .collect())
    }

    async fn budget_requests_for_events(&self, eventids: &[i64]) -> Result<Vec<BudgetRequest>> {
        self.check(Op::BudgetRequestsForEvents)?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .requests
            .iter()
            .filter(|r| eventids.contains(&r.eventid))
            .cloned()
            .collect())
    }

    async fn insert_event(&self, event: &NewEvent) -> Result<Event> {
        self.check(Op::InsertEvent)?;
        self.writes.lock().unwrap().push(Write::Insert(event.clone()));

        let mut tables = self.tables.lock().unwrap();
        let created = Event {
            eventid: tables.events.len() as i64 + 100,
            clubid: event.clubid,
            eventname: event.eventname.clone(),
            date: event.date,
            venue: event.venue.clone(),
            status: EventStatus::Pending,
            requestedbudget: event.requestedbudget,
            allocatedbudget: None,
            reason: None,
        };
        tables.events.push(created.clone());
        Ok(created)
    }

    async fn find_account(&self, email: &str) -> Result<Option<Account>> {
        self.check(Op::FindAccount)?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.accounts.iter().find(|a| a.email == email).cloned())
    }
}
