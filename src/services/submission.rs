use tracing::{info, warn};
use validator::Validate;

use crate::error::{PortalError, Result};
use crate::models::{Event, NewEvent, NewEventRequest};
use crate::store::PortalStore;

/// Clubs propose events here; they enter the admin queue as `Pending`.
pub struct EventSubmission<'a, S> {
    store: &'a S,
}

impl<'a, S: PortalStore> EventSubmission<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub async fn submit(&self, email: &str, request: NewEventRequest) -> Result<Event> {
        let request = request.trimmed();
        request.validate()?;

        let clubid = self
            .store
            .find_club_id(email)
            .await?
            .ok_or_else(|| {
                warn!("Club not found for the provided email: {}", email);
                PortalError::ClubNotFound(email.to_string())
            })?;

        let event = self
            .store
            .insert_event(&NewEvent {
                clubid,
                eventname: request.eventname,
                date: request.date,
                venue: request.venue,
                requestedbudget: request.requestedbudget,
            })
            .await?;

        info!("Club {} submitted event {} ({})", clubid, event.eventid, event.eventname);
        Ok(event)
    }
}
