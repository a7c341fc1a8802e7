//! steamroster-core - Core library for steamroster
//!
//! This crate contains the roster model, the flat record file, the
//! reconciliation pass, and the Steam Web API client shared by every
//! steamroster front end.

pub mod avatar;
pub mod config;
pub mod error;
pub mod friend_code;
pub mod models;
pub mod reconcile;
pub mod services;
pub mod steam;
pub mod store;
pub mod util;

#[cfg(test)]
mod test_support;

pub use error::{Error, Result};
pub use models::{FriendshipStatus, LiveFriend, RosterEntry};
