//! In-memory store implementation.
//!
//! Implements both repository ports over plain collections. Used by tests
//! and by the demo binary. Each port call takes the lock once and releases
//! it before returning.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Answer, AnswerId, Participant, Project, ProjectContribution, ProjectId, RepositoryError,
    Task, TaskId, User, UserActivity, UserId, UserSummary,
};
use crate::ports::{Clock, StatsRepository, SystemClock, TaskRepository};

/// In-memory store state.
#[derive(Default)]
struct InMemoryStoreState {
    /// All projects.
    projects: BTreeMap<ProjectId, Project>,

    /// All users.
    users: BTreeMap<UserId, User>,

    /// All tasks (single source of truth for task state).
    tasks: BTreeMap<TaskId, Task>,

    /// All answers, in insertion order.
    answers: Vec<Answer>,

    next_project_id: i64,
    next_user_id: i64,
    next_task_id: i64,
    next_answer_id: i64,

    /// Number of `save_task_state` calls that changed something.
    state_writes: u64,
}

impl InMemoryStoreState {
    fn allocate_project_id(&mut self) -> ProjectId {
        self.next_project_id += 1;
        ProjectId::new(self.next_project_id)
    }

    fn allocate_user_id(&mut self) -> UserId {
        self.next_user_id += 1;
        UserId::new(self.next_user_id)
    }

    fn allocate_task_id(&mut self) -> TaskId {
        self.next_task_id += 1;
        TaskId::new(self.next_task_id)
    }

    fn allocate_answer_id(&mut self) -> AnswerId {
        self.next_answer_id += 1;
        AnswerId::new(self.next_answer_id)
    }

    /// Answer count per identified user. Anonymous answers are not scored.
    fn answers_per_user(&self) -> HashMap<UserId, u64> {
        let mut counts = HashMap::new();
        for answer in &self.answers {
            if let Some(user_id) = answer.participant.user_id() {
                *counts.entry(user_id).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Users with at least one answer, paired with their count.
    fn active_users(&self) -> Vec<(&User, u64)> {
        let counts = self.answers_per_user();
        self.users
            .values()
            .filter_map(|user| counts.get(&user.id).map(|&n| (user, n)))
            .collect()
    }

    fn contributions_of(&self, user_id: UserId) -> Vec<ProjectContribution> {
        let mut per_project: BTreeMap<ProjectId, u64> = BTreeMap::new();
        for answer in &self.answers {
            if answer.participant.user_id() == Some(user_id) {
                *per_project.entry(answer.project_id).or_insert(0) += 1;
            }
        }

        let mut contributions: Vec<ProjectContribution> = per_project
            .into_iter()
            .filter_map(|(project_id, n_answers)| {
                self.projects.get(&project_id).map(|p| ProjectContribution {
                    id: p.id,
                    name: p.name.clone(),
                    short_name: p.short_name.clone(),
                    info: p.info.clone(),
                    n_answers,
                })
            })
            .collect();
        contributions.sort_by(|a, b| b.n_answers.cmp(&a.n_answers).then(a.id.cmp(&b.id)));
        contributions
    }

    fn projects_owned_by(&self, user_id: UserId) -> Vec<Project> {
        let mut owned: Vec<Project> = self
            .projects
            .values()
            .filter(|p| p.owner_id == Some(user_id))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created.cmp(&a.created).then(b.id.cmp(&a.id)));
        owned
    }
}

/// In-memory implementation of [`TaskRepository`] and [`StatsRepository`].
pub struct InMemoryStore {
    state: Arc<Mutex<InMemoryStoreState>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Timestamps of new records come from `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(Mutex::new(InMemoryStoreState::default())),
            clock,
        }
    }

    pub async fn add_project(&self, short_name: &str, owner_id: Option<UserId>) -> ProjectId {
        let created = self.clock.now();
        let mut state = self.state.lock().await;
        let id = state.allocate_project_id();
        let project = match owner_id {
            Some(owner_id) => Project::new(id, short_name, created).owned_by(owner_id),
            None => Project::new(id, short_name, created),
        };
        state.projects.insert(id, project);
        id
    }

    pub async fn add_user(&self, name: &str) -> UserId {
        let created = self.clock.now();
        let mut state = self.state.lock().await;
        let id = state.allocate_user_id();
        state.users.insert(id, User::new(id, name, created));
        id
    }

    /// Add a task to an existing project.
    pub async fn add_task(
        &self,
        project_id: ProjectId,
        n_answers: Option<i64>,
    ) -> Result<TaskId, RepositoryError> {
        let mut state = self.state.lock().await;
        if !state.projects.contains_key(&project_id) {
            return Err(RepositoryError::Other(format!("unknown {project_id}")));
        }
        let id = state.allocate_task_id();
        let task = match n_answers {
            Some(n) => Task::new(id, project_id).with_n_answers(n),
            None => Task::new(id, project_id),
        };
        state.tasks.insert(id, task);
        Ok(id)
    }

    /// Record a participant's answer to a task.
    ///
    /// Duplicates are accepted, as in the real store.
    pub async fn record_answer(
        &self,
        task_id: TaskId,
        participant: Participant,
        info: serde_json::Value,
    ) -> Result<AnswerId, RepositoryError> {
        let created_at = self.clock.now();
        let mut state = self.state.lock().await;
        let Some(project_id) = state.tasks.get(&task_id).map(|t| t.project_id) else {
            return Err(RepositoryError::Other(format!("unknown {task_id}")));
        };
        let id = state.allocate_answer_id();
        state.answers.push(Answer {
            id,
            project_id,
            task_id,
            participant,
            info,
            created_at,
        });
        Ok(id)
    }

    pub async fn task(&self, task_id: TaskId) -> Option<Task> {
        let state = self.state.lock().await;
        state.tasks.get(&task_id).cloned()
    }

    /// Every task of the project, completed or not.
    pub async fn tasks(&self, project_id: ProjectId) -> Vec<Task> {
        let state = self.state.lock().await;
        state
            .tasks
            .values()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect()
    }

    pub async fn state_writes(&self) -> u64 {
        self.state.lock().await.state_writes
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskRepository for InMemoryStore {
    async fn list_non_completed_tasks(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<Task>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .tasks
            .values()
            .filter(|t| t.project_id == project_id && !t.state.is_terminal())
            .cloned()
            .collect())
    }

    async fn count_answers(&self, task_id: TaskId) -> Result<u64, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state.answers.iter().filter(|a| a.task_id == task_id).count() as u64)
    }

    async fn count_answers_for(
        &self,
        task_id: TaskId,
        participant: &Participant,
    ) -> Result<u64, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .answers
            .iter()
            .filter(|a| a.task_id == task_id && a.is_from(participant))
            .count() as u64)
    }

    async fn save_task_state(&self, task: &Task) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().await;
        let Some(stored) = state.tasks.get_mut(&task.id) else {
            return Err(RepositoryError::Write {
                task_id: task.id,
                message: "no such task".to_string(),
            });
        };
        // completed は終端なので戻さない
        if stored.state.is_terminal() && !task.state.is_terminal() {
            return Err(RepositoryError::Write {
                task_id: task.id,
                message: "completed tasks cannot be reopened".to_string(),
            });
        }
        if stored.state == task.state {
            return Ok(());
        }
        stored.state = task.state;
        state.state_writes += 1;
        Ok(())
    }
}

#[async_trait]
impl StatsRepository for InMemoryStore {
    async fn top_users(&self, limit: usize) -> Result<Vec<UserActivity>, RepositoryError> {
        let state = self.state.lock().await;
        let mut active = state.active_users();
        active.sort_by(|(ua, a), (ub, b)| b.cmp(a).then(ua.id.cmp(&ub.id)));
        Ok(active
            .into_iter()
            .take(limit)
            .map(|(user, n)| UserActivity::from_user(user, n))
            .collect())
    }

    async fn user_summary(&self, name: &str) -> Result<Option<UserSummary>, RepositoryError> {
        let state = self.state.lock().await;
        let Some(user) = state.users.values().find(|u| u.name == name) else {
            return Ok(None);
        };

        let active = state.active_users();
        let n_answers = active
            .iter()
            .find(|(u, _)| u.id == user.id)
            .map_or(0, |&(_, n)| n);
        // rank() OVER (ORDER BY score DESC): 同点は同順位、次は飛ばす
        // 未登録ユーザーの回答は一覧と同じく順位に含めない
        let (rank, score) = if n_answers > 0 {
            let ahead = active.iter().filter(|&&(_, n)| n > n_answers).count() as u64;
            (Some(ahead + 1), Some(n_answers))
        } else {
            (None, None)
        };

        Ok(Some(UserSummary {
            user: user.clone(),
            n_answers,
            rank,
            score,
            projects: state.contributions_of(user.id),
            projects_created: state.projects_owned_by(user.id),
        }))
    }

    async fn total_users(&self) -> Result<u64, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state.users.len() as u64)
    }

    async fn users_page(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<UserActivity>, RepositoryError> {
        let state = self.state.lock().await;
        let mut active = state.active_users();
        active.sort_by(|(ua, _), (ub, _)| ub.created.cmp(&ua.created).then(ub.id.cmp(&ua.id)));
        Ok(active
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|(user, n)| UserActivity::from_user(user, n))
            .collect())
    }
}
