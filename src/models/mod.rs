pub mod account;
pub mod budget_request;
pub mod event;
pub mod notice;
pub mod status;

pub use account::{Account, Role, Session};
pub use budget_request::{BudgetRequest, BudgetRequestTransition, PendingBudgetRequest};
pub use event::{Event, EventTransition, NewEvent, NewEventRequest, PendingEvent};
pub use notice::{Notice, NoticeLevel};
pub use status::{EventStatus, RequestStatus, UnknownStatus};
