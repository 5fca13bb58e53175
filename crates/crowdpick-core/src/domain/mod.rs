//! Domain model (ids, tasks, answers, participants, accounts, errors).

pub mod account;
pub mod answer;
pub mod errors;
pub mod ids;
pub mod participant;
pub mod state;
pub mod task;

pub use self::account::{Project, ProjectContribution, User, UserActivity, UserSummary};
pub use self::answer::Answer;
pub use self::errors::{RepositoryError, SchedulerError, StatsError, SweepFailure, SweepFailures};
pub use self::ids::{AnswerId, ProjectId, TaskId, UserId};
pub use self::participant::{LOOPBACK_ORIGIN, Participant};
pub use self::state::TaskState;
pub use self::task::{DEFAULT_N_ANSWERS, Task};
