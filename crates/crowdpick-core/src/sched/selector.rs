//! Task selector: retire, filter, draw.

use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info, warn};

use super::policy::{self, AnswerQuota};
use crate::config::SchedulerConfig;
use crate::domain::{Participant, ProjectId, SchedulerError, SweepFailures, Task, TaskId};
use crate::ports::TaskRepository;

/// Picks the next task for a participant.
///
/// Each call runs three phases against the repository, strictly in order:
/// 1. retirement sweep: pending tasks whose answer count reached their
///    threshold become completed, one write per task
/// 2. candidate gathering: pending tasks the participant has not answered
/// 3. uniform draw among the candidates
///
/// The selector keeps no mutable state. Share it behind an `Arc` and call
/// it from as many requests as needed. Nothing is reserved for the caller,
/// so two participants can be handed the same task at the same time; the
/// next sweep after both answer takes care of the overshoot.
pub struct TaskSelector {
    repo: Arc<dyn TaskRepository>,
    quota: AnswerQuota,
}

impl TaskSelector {
    pub fn new(repo: Arc<dyn TaskRepository>) -> Self {
        Self {
            repo,
            quota: AnswerQuota::default(),
        }
    }

    pub fn from_config(repo: Arc<dyn TaskRepository>, config: &SchedulerConfig) -> Self {
        Self::new(repo).with_default_threshold(config.default_n_answers)
    }

    pub fn with_default_threshold(mut self, default_threshold: i64) -> Self {
        self.quota = AnswerQuota::new(default_threshold);
        self
    }

    pub fn default_threshold(&self) -> i64 {
        self.quota.default_threshold()
    }

    /// Next task for `participant` in `project_id`, or `Ok(None)` when there
    /// is nothing left for them.
    ///
    /// When some retirement writes fail the call returns
    /// [`SchedulerError::Sweep`], whose `fallback` holds a task drawn from
    /// the candidates the failures did not touch.
    pub async fn select_task(
        &self,
        project_id: ProjectId,
        participant: &Participant,
    ) -> Result<Option<Task>, SchedulerError> {
        let (candidates, failures) = self
            .sweep_and_gather(project_id, participant, self.quota)
            .await?;
        // ThreadRng は Send ではないので await の後でだけ触る
        let picked = policy::pick_uniform(&mut rand::thread_rng(), candidates);
        settle(picked, failures)
    }

    /// Same as [`TaskSelector::select_task`] with an explicit default
    /// threshold and random source.
    pub async fn select_task_with<R: Rng + ?Sized>(
        &self,
        project_id: ProjectId,
        participant: &Participant,
        default_threshold: i64,
        rng: &mut R,
    ) -> Result<Option<Task>, SchedulerError> {
        let quota = AnswerQuota::new(default_threshold);
        let (candidates, failures) = self
            .sweep_and_gather(project_id, participant, quota)
            .await?;
        settle(policy::pick_uniform(rng, candidates), failures)
    }

    /// Phases 1 and 2: everything `participant` could be handed right now.
    pub async fn eligible_tasks(
        &self,
        project_id: ProjectId,
        participant: &Participant,
        quota: AnswerQuota,
    ) -> Result<Vec<Task>, SchedulerError> {
        let (candidates, failures) = self
            .sweep_and_gather(project_id, participant, quota)
            .await?;
        ensure_saved(failures)?;
        Ok(candidates)
    }

    /// Retirement sweep. Returns the ids of the tasks it completed.
    ///
    /// A failed write does not stop the sweep. Every failure is collected
    /// and returned as [`SchedulerError::Sweep`] once all tasks were seen.
    /// Read failures abort immediately.
    pub async fn retire_completed(
        &self,
        project_id: ProjectId,
        quota: AnswerQuota,
    ) -> Result<Vec<TaskId>, SchedulerError> {
        if !project_id.is_valid() {
            return Err(SchedulerError::InvalidProject(project_id));
        }
        let (retired, failures) = self.sweep(project_id, quota).await?;
        ensure_saved(failures)?;
        Ok(retired)
    }

    async fn sweep_and_gather(
        &self,
        project_id: ProjectId,
        participant: &Participant,
        quota: AnswerQuota,
    ) -> Result<(Vec<Task>, SweepFailures), SchedulerError> {
        if !project_id.is_valid() {
            return Err(SchedulerError::InvalidProject(project_id));
        }

        let (_, failures) = self.sweep(project_id, quota).await?;
        let mut candidates = self.gather_candidates(project_id, participant).await?;
        // 保存に失敗したタスクは定員に達しているので配らない
        candidates.retain(|task| !failures.contains(task.id));

        debug!(
            project_id = %project_id,
            participant = %participant,
            candidates = candidates.len(),
            failed_writes = failures.task_ids().len(),
            "Gathered candidate tasks"
        );
        Ok((candidates, failures))
    }

    async fn sweep(
        &self,
        project_id: ProjectId,
        quota: AnswerQuota,
    ) -> Result<(Vec<TaskId>, SweepFailures), SchedulerError> {
        let pending = self.repo.list_non_completed_tasks(project_id).await?;
        let mut retired = Vec::new();
        let mut failures = SweepFailures::default();

        for mut task in pending {
            let answers = self.repo.count_answers(task.id).await?;
            if !quota.is_met(&task, answers) {
                continue;
            }
            if !task.complete() {
                continue;
            }

            // タスクごとに即時保存（バッチしない）
            match self.repo.save_task_state(&task).await {
                Ok(()) => {
                    info!(
                        project_id = %project_id,
                        task_id = %task.id,
                        answers,
                        threshold = quota.threshold_for(&task),
                        "Task reached its answer quota"
                    );
                    retired.push(task.id);
                }
                Err(e) => {
                    warn!(task_id = %task.id, error = %e, "Failed to persist task completion");
                    failures.push(task.id, e);
                }
            }
        }
        Ok((retired, failures))
    }

    async fn gather_candidates(
        &self,
        project_id: ProjectId,
        participant: &Participant,
    ) -> Result<Vec<Task>, SchedulerError> {
        let pending = self.repo.list_non_completed_tasks(project_id).await?;
        let mut candidates = Vec::with_capacity(pending.len());
        for task in pending {
            let own = self.repo.count_answers_for(task.id, participant).await?;
            if policy::is_eligible(&task, own) {
                candidates.push(task);
            }
        }
        Ok(candidates)
    }
}

/// Hand out `picked` unless the sweep lost writes, in which case it rides
/// along with the failures.
fn settle(picked: Option<Task>, failures: SweepFailures) -> Result<Option<Task>, SchedulerError> {
    if failures.is_empty() {
        return Ok(picked);
    }
    Err(SchedulerError::Sweep {
        failures,
        fallback: picked,
    })
}

fn ensure_saved(failures: SweepFailures) -> Result<(), SchedulerError> {
    settle(None, failures).map(|_| ())
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::rstest;

    use super::*;
    use crate::domain::{LOOPBACK_ORIGIN, RepositoryError, TaskState, UserId};
    use crate::impls::InMemoryStore;

    /// Wraps the in-memory store and fails on demand.
    struct FlakyRepository {
        inner: Arc<InMemoryStore>,
        fail_saves: HashSet<TaskId>,
        fail_reads: AtomicBool,
        calls: AtomicUsize,
    }

    impl FlakyRepository {
        fn new(inner: Arc<InMemoryStore>) -> Self {
            Self {
                inner,
                fail_saves: HashSet::new(),
                fail_reads: AtomicBool::new(false),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing_saves(mut self, ids: &[TaskId]) -> Self {
            self.fail_saves.extend(ids.iter().copied());
            self
        }

        fn check_read(&self) -> Result<(), RepositoryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(RepositoryError::Unavailable("connection reset".into()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl TaskRepository for FlakyRepository {
        async fn list_non_completed_tasks(
            &self,
            project_id: ProjectId,
        ) -> Result<Vec<Task>, RepositoryError> {
            self.check_read()?;
            self.inner.list_non_completed_tasks(project_id).await
        }

        async fn count_answers(&self, task_id: TaskId) -> Result<u64, RepositoryError> {
            self.check_read()?;
            self.inner.count_answers(task_id).await
        }

        async fn count_answers_for(
            &self,
            task_id: TaskId,
            participant: &Participant,
        ) -> Result<u64, RepositoryError> {
            self.check_read()?;
            self.inner.count_answers_for(task_id, participant).await
        }

        async fn save_task_state(&self, task: &Task) -> Result<(), RepositoryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_saves.contains(&task.id) {
                return Err(RepositoryError::Write {
                    task_id: task.id,
                    message: "deadlock detected".into(),
                });
            }
            self.inner.save_task_state(task).await
        }
    }

    async fn project_with_tasks(
        store: &InMemoryStore,
        n_tasks: usize,
        n_answers: Option<i64>,
    ) -> (ProjectId, Vec<TaskId>) {
        let project_id = store.add_project("birds", None).await;
        let mut ids = Vec::new();
        for _ in 0..n_tasks {
            ids.push(store.add_task(project_id, n_answers).await.unwrap());
        }
        (project_id, ids)
    }

    async fn answer(store: &InMemoryStore, task_id: TaskId, participant: &Participant) {
        store
            .record_answer(task_id, participant.clone(), serde_json::json!({"answer": "yes"}))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn empty_project_is_not_found() {
        let store = Arc::new(InMemoryStore::new());
        let project_id = store.add_project("empty", None).await;
        let selector = TaskSelector::new(store);

        let picked = selector
            .select_task(project_id, &Participant::anonymous_default())
            .await
            .unwrap();
        assert_eq!(picked, None);
    }

    #[tokio::test]
    async fn all_completed_is_not_found() {
        let store = Arc::new(InMemoryStore::new());
        let (project_id, ids) = project_with_tasks(&store, 2, Some(1)).await;
        let other = Participant::identified(UserId::new(99));
        for id in &ids {
            answer(&store, *id, &other).await;
        }
        let selector = TaskSelector::new(store.clone());

        let me = Participant::identified(UserId::new(1));
        assert_eq!(selector.select_task(project_id, &me).await.unwrap(), None);
        for id in &ids {
            assert_eq!(store.task(*id).await.unwrap().state, TaskState::Completed);
        }
    }

    #[tokio::test]
    async fn all_answered_by_participant_is_not_found() {
        let store = Arc::new(InMemoryStore::new());
        let (project_id, ids) = project_with_tasks(&store, 3, None).await;
        let me = Participant::identified(UserId::new(1));
        for id in &ids {
            answer(&store, *id, &me).await;
        }
        let selector = TaskSelector::new(store.clone());

        assert_eq!(selector.select_task(project_id, &me).await.unwrap(), None);

        // 他の参加者にはまだ出せる
        let other = Participant::identified(UserId::new(2));
        assert!(selector.select_task(project_id, &other).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn fresh_task_is_selected() {
        let store = Arc::new(InMemoryStore::new());
        let (project_id, ids) = project_with_tasks(&store, 1, None).await;
        let selector = TaskSelector::new(store);

        let picked = selector
            .select_task(project_id, &Participant::anonymous("10.1.1.1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(picked.id, ids[0]);
        assert!(picked.is_pending());
    }

    #[tokio::test]
    async fn answering_twice_retires_task_and_excludes_it() {
        // 3 tasks, threshold 2, participant A answers task 1 twice
        let store = Arc::new(InMemoryStore::new());
        let (project_id, ids) = project_with_tasks(&store, 3, Some(2)).await;
        let a = Participant::identified(UserId::new(10));
        answer(&store, ids[0], &a).await;
        answer(&store, ids[0], &a).await;
        let selector = TaskSelector::new(store.clone());

        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = HashSet::new();
        for _ in 0..50 {
            let picked = selector
                .select_task_with(project_id, &a, 30, &mut rng)
                .await
                .unwrap()
                .unwrap();
            seen.insert(picked.id);
        }

        assert_eq!(seen, HashSet::from([ids[1], ids[2]]));
        assert_eq!(store.task(ids[0]).await.unwrap().state, TaskState::Completed);
    }

    #[tokio::test]
    async fn completed_task_is_never_returned_again() {
        let store = Arc::new(InMemoryStore::new());
        let (project_id, ids) = project_with_tasks(&store, 2, None).await;
        let selector = TaskSelector::new(store.clone()).with_default_threshold(2);

        answer(&store, ids[0], &Participant::anonymous("1.1.1.1")).await;
        answer(&store, ids[0], &Participant::anonymous("2.2.2.2")).await;

        let me = Participant::anonymous("3.3.3.3");
        for _ in 0..30 {
            let picked = selector.select_task(project_id, &me).await.unwrap().unwrap();
            assert_eq!(picked.id, ids[1]);
        }
        assert_eq!(store.task(ids[0]).await.unwrap().state, TaskState::Completed);
    }

    #[tokio::test]
    async fn participant_never_gets_a_task_back() {
        let store = Arc::new(InMemoryStore::new());
        let (project_id, _) = project_with_tasks(&store, 5, None).await;
        let selector = TaskSelector::new(store.clone());
        let me = Participant::identified(UserId::new(4));

        let mut handed_out = HashSet::new();
        while let Some(task) = selector.select_task(project_id, &me).await.unwrap() {
            assert!(handed_out.insert(task.id), "task {} offered twice", task.id);
            answer(&store, task.id, &me).await;
        }
        assert_eq!(handed_out.len(), 5);
    }

    #[tokio::test]
    async fn identity_and_origin_are_separate_participants() {
        let store = Arc::new(InMemoryStore::new());
        let (project_id, ids) = project_with_tasks(&store, 1, None).await;
        let selector = TaskSelector::new(store.clone());

        // ログインせずに回答したあと、ログインして再訪
        answer(&store, ids[0], &Participant::anonymous("10.0.0.8")).await;

        let as_user = Participant::resolve(Some(UserId::new(8)), Some("10.0.0.8"));
        assert!(selector.select_task(project_id, &as_user).await.unwrap().is_some());

        let as_anon = Participant::resolve(None, Some("10.0.0.8"));
        assert_eq!(selector.select_task(project_id, &as_anon).await.unwrap(), None);
    }

    #[tokio::test]
    async fn missing_origin_shares_loopback_exclusions() {
        let store = Arc::new(InMemoryStore::new());
        let (project_id, ids) = project_with_tasks(&store, 2, None).await;
        let selector = TaskSelector::new(store.clone());

        answer(&store, ids[0], &Participant::resolve(None, None)).await;

        let explicit = Participant::resolve(None, Some(LOOPBACK_ORIGIN));
        let implicit = Participant::resolve(None, None);
        for participant in [&explicit, &implicit] {
            for _ in 0..10 {
                let picked = selector
                    .select_task(project_id, participant)
                    .await
                    .unwrap()
                    .unwrap();
                assert_eq!(picked.id, ids[1]);
            }
        }
    }

    #[tokio::test]
    async fn non_positive_override_retires_untouched_task() {
        let store = Arc::new(InMemoryStore::new());
        let project_id = store.add_project("p", None).await;
        let zero = store.add_task(project_id, Some(0)).await.unwrap();
        let negative = store.add_task(project_id, Some(-4)).await.unwrap();
        let normal = store.add_task(project_id, None).await.unwrap();
        let selector = TaskSelector::new(store.clone());

        let picked = selector
            .select_task(project_id, &Participant::anonymous_default())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(picked.id, normal);
        assert_eq!(store.task(zero).await.unwrap().state, TaskState::Completed);
        assert_eq!(store.task(negative).await.unwrap().state, TaskState::Completed);
    }

    #[tokio::test]
    async fn per_task_override_does_not_change_other_thresholds() {
        let store = Arc::new(InMemoryStore::new());
        let project_id = store.add_project("p", None).await;
        let strict = store.add_task(project_id, Some(1)).await.unwrap();
        let plain = store.add_task(project_id, None).await.unwrap();
        let someone = Participant::anonymous("5.5.5.5");
        answer(&store, strict, &someone).await;
        answer(&store, plain, &someone).await;

        let selector = TaskSelector::new(store.clone()).with_default_threshold(3);
        let retired = selector
            .retire_completed(project_id, AnswerQuota::new(3))
            .await
            .unwrap();

        assert_eq!(retired, vec![strict]);
        assert_eq!(store.task(plain).await.unwrap().state, TaskState::Pending);
    }

    #[tokio::test]
    async fn sweep_runs_even_when_result_is_not_found() {
        let store = Arc::new(InMemoryStore::new());
        let (project_id, ids) = project_with_tasks(&store, 1, Some(1)).await;
        let me = Participant::identified(UserId::new(1));
        answer(&store, ids[0], &me).await;
        let selector = TaskSelector::new(store.clone());

        assert_eq!(selector.select_task(project_id, &me).await.unwrap(), None);
        assert_eq!(store.task(ids[0]).await.unwrap().state, TaskState::Completed);
        assert_eq!(store.state_writes().await, 1);

        // 完了済みは再保存しない
        assert_eq!(selector.select_task(project_id, &me).await.unwrap(), None);
        assert_eq!(store.state_writes().await, 1);
    }

    #[tokio::test]
    async fn repeated_calls_never_shrink_eligible_set() {
        let store = Arc::new(InMemoryStore::new());
        let (project_id, _) = project_with_tasks(&store, 4, None).await;
        let selector = TaskSelector::new(store.clone());
        let me = Participant::anonymous("8.8.8.8");

        let before = selector
            .eligible_tasks(project_id, &me, AnswerQuota::default())
            .await
            .unwrap()
            .len();
        for _ in 0..20 {
            selector.select_task(project_id, &me).await.unwrap();
        }
        let after = selector
            .eligible_tasks(project_id, &me, AnswerQuota::default())
            .await
            .unwrap()
            .len();

        assert_eq!(before, 4);
        assert_eq!(after, before);
    }

    #[tokio::test]
    async fn selection_is_uniform() {
        let store = Arc::new(InMemoryStore::new());
        let (project_id, ids) = project_with_tasks(&store, 3, None).await;
        // 回答数の偏りは選択に影響しない
        answer(&store, ids[0], &Participant::anonymous("1.0.0.1")).await;
        answer(&store, ids[0], &Participant::anonymous("1.0.0.2")).await;
        let selector = TaskSelector::new(store);
        let me = Participant::identified(UserId::new(1));

        const TRIALS: usize = 3000;
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut counts: HashMap<TaskId, usize> = HashMap::new();
        for _ in 0..TRIALS {
            let picked = selector
                .select_task_with(project_id, &me, 30, &mut rng)
                .await
                .unwrap()
                .unwrap();
            *counts.entry(picked.id).or_default() += 1;
        }

        assert_eq!(counts.len(), 3);
        let expected = TRIALS as f64 / 3.0;
        let chi_square: f64 = counts
            .values()
            .map(|&observed| {
                let diff = observed as f64 - expected;
                diff * diff / expected
            })
            .sum();
        // df = 2, p = 0.001
        assert!(chi_square < 13.816, "chi^2 = {chi_square}, counts = {counts:?}");
    }

    #[rstest]
    #[case::zero(0)]
    #[case::negative(-1)]
    #[tokio::test]
    async fn invalid_project_fails_before_touching_store(#[case] raw: i64) {
        let store = Arc::new(InMemoryStore::new());
        let repo = Arc::new(FlakyRepository::new(store));
        let selector = TaskSelector::new(repo.clone());

        let err = selector
            .select_task(ProjectId::new(raw), &Participant::anonymous_default())
            .await
            .unwrap_err();

        assert!(matches!(err, SchedulerError::InvalidProject(id) if id.get() == raw));
        assert_eq!(repo.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn read_failure_propagates() {
        let store = Arc::new(InMemoryStore::new());
        let (project_id, _) = project_with_tasks(&store, 2, None).await;
        let repo = Arc::new(FlakyRepository::new(store));
        repo.fail_reads.store(true, Ordering::SeqCst);
        let selector = TaskSelector::new(repo);

        let err = selector
            .select_task(project_id, &Participant::anonymous_default())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SchedulerError::Repository(RepositoryError::Unavailable(_))
        ));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn failed_write_does_not_stop_the_sweep() {
        let store = Arc::new(InMemoryStore::new());
        let (project_id, ids) = project_with_tasks(&store, 3, Some(1)).await;
        let someone = Participant::anonymous("4.4.4.4");
        for id in &ids {
            answer(&store, *id, &someone).await;
        }
        let repo = Arc::new(FlakyRepository::new(store.clone()).failing_saves(&[ids[1]]));
        let selector = TaskSelector::new(repo);

        let err = selector
            .select_task(project_id, &Participant::anonymous_default())
            .await
            .unwrap_err();

        let (failures, fallback) = match err {
            SchedulerError::Sweep { failures, fallback } => (failures, fallback),
            other => panic!("expected sweep failure, got {other:?}"),
        };
        assert_eq!(failures.task_ids(), vec![ids[1]]);
        // 残りは全部完了済み、失敗したタスクも定員到達なので配らない
        assert_eq!(fallback, None);
        assert_eq!(store.task(ids[0]).await.unwrap().state, TaskState::Completed);
        assert_eq!(store.task(ids[1]).await.unwrap().state, TaskState::Pending);
        assert_eq!(store.task(ids[2]).await.unwrap().state, TaskState::Completed);
    }

    #[tokio::test]
    async fn stuck_task_does_not_block_the_rest_of_the_project() {
        let store = Arc::new(InMemoryStore::new());
        let (project_id, ids) = project_with_tasks(&store, 3, Some(1)).await;
        answer(&store, ids[0], &Participant::anonymous("4.4.4.4")).await;
        let repo = Arc::new(FlakyRepository::new(store.clone()).failing_saves(&[ids[0]]));
        let selector = TaskSelector::new(repo);
        let me = Participant::identified(UserId::new(5));

        let mut served = HashSet::new();
        for seed in 0..20u64 {
            let err = selector
                .select_task_with(project_id, &me, 1, &mut StdRng::seed_from_u64(seed))
                .await
                .unwrap_err();
            assert!(matches!(&err, SchedulerError::Sweep { failures, .. } if failures.task_ids() == vec![ids[0]]));
            let task = err.into_fallback().expect("other tasks are still open");
            served.insert(task.id);
        }
        assert_eq!(served, HashSet::from([ids[1], ids[2]]));

        let eligible = selector
            .eligible_tasks(project_id, &me, AnswerQuota::new(1))
            .await
            .unwrap_err();
        assert_eq!(eligible.into_fallback(), None);
    }

    #[tokio::test]
    async fn concurrent_requests_are_safe() {
        let store = Arc::new(InMemoryStore::new());
        let (project_id, _) = project_with_tasks(&store, 6, Some(2)).await;
        let selector = Arc::new(TaskSelector::new(store.clone()));

        let mut handles = Vec::new();
        for user in 1..=8 {
            let selector = Arc::clone(&selector);
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let me = Participant::identified(UserId::new(user));
                let mut mine = Vec::new();
                while let Some(task) = selector.select_task(project_id, &me).await.unwrap() {
                    store
                        .record_answer(task.id, me.clone(), serde_json::Value::Null)
                        .await
                        .unwrap();
                    mine.push(task.id);
                }
                mine
            }));
        }

        for handle in handles {
            let mine = handle.await.unwrap();
            let unique: HashSet<_> = mine.iter().collect();
            assert_eq!(unique.len(), mine.len(), "a participant repeated a task");
        }

        // 最終的にすべて完了している（同時回答による超過は許容）
        let selector = TaskSelector::new(store.clone());
        selector
            .retire_completed(project_id, AnswerQuota::default())
            .await
            .unwrap();
        for task in store.tasks(project_id).await {
            assert_eq!(task.state, TaskState::Completed);
            assert!(store.count_answers(task.id).await.unwrap() >= 2);
        }
    }

    #[tokio::test]
    async fn from_config_uses_configured_default() {
        let store = Arc::new(InMemoryStore::new());
        let config = SchedulerConfig {
            default_n_answers: 7,
        };
        let selector = TaskSelector::from_config(store, &config);
        assert_eq!(selector.default_threshold(), 7);
    }
}
