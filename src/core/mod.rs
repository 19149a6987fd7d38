pub mod assignment;
pub mod santa;

pub use crate::domain::model::{Assignment, Participant, PriorAssignments, Roster, RunOutcome};
pub use crate::domain::ports::{Notification, Notifier, Storage};
pub use crate::utils::error::Result;
