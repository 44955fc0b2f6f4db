use chrono::NaiveDate;

use super::PortalStore;
use crate::database::Database;
use crate::error::{PortalError, Result};
use crate::models::{
    Account, BudgetRequest, BudgetRequestTransition, Event, EventStatus, EventTransition,
    NewEvent, PendingBudgetRequest, PendingEvent, RequestStatus,
};

const EVENT_COLUMNS: &str =
    "eventid, clubid, eventname, date, venue, status, requestedbudget, allocatedbudget, reason";

const REQUEST_COLUMNS: &str =
    "requestid, eventid, requestedamount, allocatedamount, status, reason, adminfeedback";

impl PortalStore for Database {
    async fn pending_events(&self) -> Result<Vec<PendingEvent>> {
        let events = sqlx::query_as::<_, PendingEvent>(
            r#"
            SELECT e.eventid, e.clubid, e.eventname, e.date, e.venue, e.status,
                   e.requestedbudget, e.allocatedbudget, e.reason,
                   c.clubname
            FROM events e
            LEFT JOIN clubs c ON c.clubid = e.clubid
            WHERE e.status = 'Pending'
            ORDER BY e.date ASC, e.eventid ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    async fn pending_budget_requests(&self) -> Result<Vec<PendingBudgetRequest>> {
        let requests = sqlx::query_as::<_, PendingBudgetRequest>(
            r#"
            SELECT b.requestid, b.eventid, b.requestedamount, b.allocatedamount, b.status,
                   b.reason, b.adminfeedback,
                   e.eventname, c.clubname
            FROM budgetrequests b
            LEFT JOIN events e ON e.eventid = b.eventid
            LEFT JOIN clubs c ON c.clubid = e.clubid
            WHERE b.status = 'Pending'
            ORDER BY b.requestid ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    async fn transition_event(
        &self,
        eventid: i64,
        transition: &EventTransition,
    ) -> Result<Option<Event>> {
        let sql = format!(
            "UPDATE events
             SET status = $2,
                 allocatedbudget = COALESCE($3, allocatedbudget),
                 reason = $4
             WHERE eventid = $1 AND status = 'Pending'
             RETURNING {EVENT_COLUMNS}"
        );

        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(eventid)
            .bind(transition.status.as_str())
            .bind(transition.allocated_budget)
            .bind(transition.reason.as_deref())
            .fetch_optional(&self.pool)
            .await?;

        Ok(event)
    }

    async fn transition_budget_request(
        &self,
        requestid: i64,
        transition: &BudgetRequestTransition,
    ) -> Result<Option<BudgetRequest>> {
        let sql = format!(
            "UPDATE budgetrequests
             SET status = $2,
                 allocatedamount = COALESCE($3, allocatedamount),
                 adminfeedback = $4
             WHERE requestid = $1 AND status = 'Pending'
             RETURNING {REQUEST_COLUMNS}"
        );

        let request = sqlx::query_as::<_, BudgetRequest>(&sql)
            .bind(requestid)
            .bind(transition.status.as_str())
            .bind(transition.allocated_amount)
            .bind(transition.admin_feedback.as_deref())
            .fetch_optional(&self.pool)
            .await?;

        Ok(request)
    }

    async fn event_status(&self, eventid: i64) -> Result<Option<EventStatus>> {
        let status = sqlx::query_scalar::<_, String>("SELECT status FROM events WHERE eventid = $1")
            .bind(eventid)
            .fetch_optional(&self.pool)
            .await?;

        status
            .map(|s| {
                s.parse::<EventStatus>()
                    .map_err(|e| PortalError::Database(sqlx::Error::Decode(Box::new(e))))
            })
            .transpose()
    }

    async fn budget_request_status(&self, requestid: i64) -> Result<Option<RequestStatus>> {
        let status =
            sqlx::query_scalar::<_, String>("SELECT status FROM budgetrequests WHERE requestid = $1")
                .bind(requestid)
                .fetch_optional(&self.pool)
                .await?;

        status
            .map(|s| {
                s.parse::<RequestStatus>()
                    .map_err(|e| PortalError::Database(sqlx::Error::Decode(Box::new(e))))
            })
            .transpose()
    }

    async fn find_club_id(&self, email: &str) -> Result<Option<i64>> {
        let clubid = sqlx::query_scalar::<_, i64>("SELECT clubid FROM clubs WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(clubid)
    }

    async fn upcoming_club_events(&self, clubid: i64, from: NaiveDate) -> Result<Vec<Event>> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS}
             FROM events
             WHERE clubid = $1 AND date >= $2
             ORDER BY date ASC, eventid ASC"
        );

        let events = sqlx::query_as::<_, Event>(&sql)
            .bind(clubid)
            .bind(from)
            .fetch_all(&self.pool)
            .await?;

        Ok(events)
    }

    async fn club_event_ids(&self, clubid: i64) -> Result<Vec<i64>> {
        let ids = sqlx::query_scalar::<_, i64>("SELECT eventid FROM events WHERE clubid = $1")
            .bind(clubid)
            .fetch_all(&self.pool)
            .await?;

        Ok(ids)
    }

    async fn budget_requests_for_events(&self, eventids: &[i64]) -> Result<Vec<BudgetRequest>> {
        let sql = format!(
            "SELECT {REQUEST_COLUMNS}
             FROM budgetrequests
             WHERE eventid = ANY($1)
             ORDER BY requestid ASC"
        );

        let requests = sqlx::query_as::<_, BudgetRequest>(&sql)
            .bind(eventids)
            .fetch_all(&self.pool)
            .await?;

        Ok(requests)
    }

    async fn insert_event(&self, event: &NewEvent) -> Result<Event> {
        let sql = format!(
            "INSERT INTO events (clubid, eventname, date, venue, requestedbudget, status)
             VALUES ($1, $2, $3, $4, $5, 'Pending')
             RETURNING {EVENT_COLUMNS}"
        );

        let created = sqlx::query_as::<_, Event>(&sql)
            .bind(event.clubid)
            .bind(&event.eventname)
            .bind(event.date)
            .bind(&event.venue)
            .bind(event.requestedbudget)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn find_account(&self, email: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT email, password_hash, role FROM accounts WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }
}
