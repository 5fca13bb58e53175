//! Scheduler module: who gets which task next.
//!
//! - `policy`: pure rules (answer quota, eligibility, uniform draw)
//! - `selector`: runs the rules against a [`crate::ports::TaskRepository`]

pub mod policy;
mod selector;

pub use policy::AnswerQuota;
pub use selector::TaskSelector;
