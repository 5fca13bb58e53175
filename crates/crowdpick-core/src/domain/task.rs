//! Task record: one unit of work inside a project.

use serde::{Deserialize, Serialize};

use super::ids::{ProjectId, TaskId};
use super::state::TaskState;

/// Answers required before a task retires, when neither the task nor the
/// caller says otherwise.
pub const DEFAULT_N_ANSWERS: i64 = 30;

/// Task record.
///
/// Design:
/// - `state` only moves through [`Task::complete`].
/// - `n_answers` is the per-task quota override. `None` means the
///   project-wide default applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub project_id: ProjectId,
    pub state: TaskState,

    /// Per-task override of the required answer count.
    ///
    /// Signed on purpose: zero or negative means "already done" and the
    /// next sweep retires the task.
    pub n_answers: Option<i64>,

    /// Opaque payload shown to participants.
    pub info: serde_json::Value,
}

impl Task {
    pub fn new(id: TaskId, project_id: ProjectId) -> Self {
        Self {
            id,
            project_id,
            state: TaskState::Pending,
            n_answers: None,
            info: serde_json::Value::Null,
        }
    }

    pub fn with_n_answers(mut self, n_answers: i64) -> Self {
        self.n_answers = Some(n_answers);
        self
    }

    /// The answer count at which this task retires.
    pub fn effective_threshold(&self, default_threshold: i64) -> i64 {
        self.n_answers.unwrap_or(default_threshold)
    }

    pub fn is_pending(&self) -> bool {
        self.state == TaskState::Pending
    }

    /// Mark as completed.
    ///
    /// Returns `false` when the task was already completed (no transition).
    pub fn complete(&mut self) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.state = TaskState::Completed;
        true
    }
}
