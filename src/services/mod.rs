pub mod club_status;
pub mod review;
pub mod submission;

pub use club_status::{ClubStatus, ClubStatusView};
pub use review::{AdminReview, Decision, ReviewAction, ReviewOutcome, ReviewQueue, ReviewRequest, Selection};
pub use submission::EventSubmission;
