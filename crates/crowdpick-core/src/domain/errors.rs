//! Errors - エラー型と分類
//!
//! - [`RepositoryError`]: what storage adapters report
//! - [`SchedulerError`]: what task selection reports
//! - [`StatsError`]: what the user statistics cache reports
//!
//! "Nothing left to do" is not an error. Selection returns `Ok(None)` for it.

use std::fmt;

use thiserror::Error;

use super::ids::{ProjectId, TaskId};
use super::task::Task;

/// Failure talking to the backing store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("failed to persist {task_id}: {message}")]
    Write { task_id: TaskId, message: String },

    #[error("{0}")]
    Other(String),
}

/// One retirement write that did not make it to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepFailure {
    pub task_id: TaskId,
    pub source: RepositoryError,
}

/// Every failed retirement write of one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepFailures(Vec<SweepFailure>);

impl SweepFailures {
    pub fn push(&mut self, task_id: TaskId, source: RepositoryError) {
        self.0.push(SweepFailure { task_id, source });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, task_id: TaskId) -> bool {
        self.0.iter().any(|f| f.task_id == task_id)
    }

    pub fn task_ids(&self) -> Vec<TaskId> {
        self.0.iter().map(|f| f.task_id).collect()
    }
}

impl fmt::Display for SweepFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} task(s) could not be retired", self.0.len())?;
        for failure in &self.0 {
            write!(f, "; {}: {}", failure.task_id, failure.source)?;
        }
        Ok(())
    }
}

/// Task selection failure.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Rejected before any repository access.
    #[error("invalid project id: {0}")]
    InvalidProject(ProjectId),

    /// A read against the store failed. Safe to retry.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The sweep evaluated every task but some state changes were not saved.
    ///
    /// `fallback` is the task drawn from the candidates that the failed
    /// writes did not touch, so a caller may still serve it.
    #[error("retirement sweep incomplete: {failures}")]
    Sweep {
        failures: SweepFailures,
        fallback: Option<Task>,
    },
}

impl SchedulerError {
    /// Is a retry of the same call likely to help?
    pub fn is_transient(&self) -> bool {
        !matches!(self, SchedulerError::InvalidProject(_))
    }

    /// The task selected despite a partial sweep, if any.
    pub fn into_fallback(self) -> Option<Task> {
        match self {
            SchedulerError::Sweep { fallback, .. } => fallback,
            _ => None,
        }
    }
}

/// User statistics failure.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("invalid page: {0} (pages start at 1)")]
    InvalidPage(u32),

    #[error("invalid page size: {0}")]
    InvalidPageSize(u32),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
