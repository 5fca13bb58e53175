//! Answer record: a participant's response to a task.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{AnswerId, ProjectId, TaskId};
use super::participant::Participant;

/// Answer record.
///
/// Storage does not stop a participant from answering the same task twice;
/// the selector just never offers a task back to someone who answered it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub id: AnswerId,
    pub project_id: ProjectId,
    pub task_id: TaskId,
    pub participant: Participant,
    pub info: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl Answer {
    pub fn is_from(&self, participant: &Participant) -> bool {
        &self.participant == participant
    }
}
