//! TaskRepository port - タスクと回答の正本（source of truth）
//!
//! The selector only reads through this trait and writes state transitions
//! back through it. Ordering of listed tasks carries no meaning.

use async_trait::async_trait;

use crate::domain::{Participant, ProjectId, RepositoryError, Task, TaskId};

/// TaskRepository は tasks / answers テーブルへの窓口
///
/// # 設計原則
/// - 各メソッドはそれ自体で完結する（呼び出しを跨いだロックはしない）
/// - `save_task_state` はタスク単位で atomic
/// - 読み込み失敗は呼び出し元へそのまま返す
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Every task of the project whose state is not completed.
    async fn list_non_completed_tasks(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<Task>, RepositoryError>;

    /// Number of answers recorded against the task, from anyone.
    async fn count_answers(&self, task_id: TaskId) -> Result<u64, RepositoryError>;

    /// Number of answers the participant recorded against the task.
    ///
    /// Identified participants match on user id, anonymous ones on origin.
    async fn count_answers_for(
        &self,
        task_id: TaskId,
        participant: &Participant,
    ) -> Result<u64, RepositoryError>;

    /// Persist the task's current state.
    async fn save_task_state(&self, task: &Task) -> Result<(), RepositoryError>;
}
