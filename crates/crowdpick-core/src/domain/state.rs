//! Task lifecycle state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// TaskState はタスクの状態を表現
///
/// State transitions:
/// - Pending -> Completed (answer count reached the effective threshold)
///
/// Completed is terminal. There is no way back to Pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Still collecting answers.
    #[default]
    Pending,

    /// Retired from the pending pool.
    Completed,
}

impl TaskState {
    /// Is this a terminal state (no further transitions)?
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Completed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskState::Pending => "pending",
            TaskState::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
