//! Services shared by every steamroster front end.

mod record;
mod roster;

pub use record::{PurgeReport, RosterRecord};
pub use roster::{RemovalFailure, RemovalReport, RosterService, UpdateReport};
