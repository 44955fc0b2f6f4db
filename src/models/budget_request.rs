use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::RequestStatus;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct BudgetRequest {
    pub requestid: i64,
    pub eventid: i64,
    pub requestedamount: f64,
    pub allocatedamount: Option<f64>,
    #[sqlx(try_from = "String")]
    pub status: RequestStatus,
    /// Justification supplied by the club.
    pub reason: Option<String>,
    pub adminfeedback: Option<String>,
}

/// A pending request in the admin queue with the names of its event and club.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct PendingBudgetRequest {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub request: BudgetRequest,
    pub eventname: Option<String>,
    pub clubname: Option<String>,
}

/// Columns written by an admin decision on a budget request.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetRequestTransition {
    pub status: RequestStatus,
    pub allocated_amount: Option<f64>,
    pub admin_feedback: Option<String>,
}
