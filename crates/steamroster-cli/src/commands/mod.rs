pub mod add;
pub mod avatars;
pub mod common;
pub mod completions;
pub mod config;
pub mod list;
pub mod lookup;
pub mod purge;
pub mod remark;
pub mod remove;
pub mod update;
