//! Selection policy: pure decisions, no storage.
//!
//! Everything here is a plain function of its inputs so the rules can be
//! tested without a store. [`super::TaskSelector`] does the I/O and asks
//! this module what to do with the numbers it read.

use rand::Rng;

use crate::domain::{DEFAULT_N_ANSWERS, Task};

/// Answer quota: when does a task have enough answers?
///
/// Design note:
/// - The task's own `n_answers` override wins.
/// - Otherwise `default_threshold` applies. One task's override never
///   changes the threshold used for the next task.
/// - A threshold of zero or below is met by any count, so such tasks retire
///   on the first sweep that sees them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerQuota {
    default_threshold: i64,
}

impl AnswerQuota {
    pub fn new(default_threshold: i64) -> Self {
        Self { default_threshold }
    }

    pub fn default_threshold(&self) -> i64 {
        self.default_threshold
    }

    pub fn threshold_for(&self, task: &Task) -> i64 {
        task.effective_threshold(self.default_threshold)
    }

    /// Should a pending task with `answer_count` answers be retired?
    pub fn is_met(&self, task: &Task, answer_count: u64) -> bool {
        let count = i64::try_from(answer_count).unwrap_or(i64::MAX);
        count >= self.threshold_for(task)
    }
}

impl Default for AnswerQuota {
    fn default() -> Self {
        Self::new(DEFAULT_N_ANSWERS)
    }
}

/// Is the task still open to this participant?
///
/// `own_answers` is how many answers the participant already gave to it.
pub fn is_eligible(task: &Task, own_answers: u64) -> bool {
    task.is_pending() && own_answers == 0
}

/// Draw one element, each with probability `1 / len`.
///
/// Nothing about the element (age, answer count, position) affects the draw.
pub fn pick_uniform<T, R: Rng + ?Sized>(rng: &mut R, mut candidates: Vec<T>) -> Option<T> {
    if candidates.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..candidates.len());
    Some(candidates.swap_remove(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ProjectId, TaskId, TaskState};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::rstest;

    fn task(n_answers: Option<i64>) -> Task {
        let mut t = Task::new(TaskId::new(1), ProjectId::new(1));
        t.n_answers = n_answers;
        t
    }

    #[rstest]
    #[case::below_default(None, 29, false)]
    #[case::at_default(None, 30, true)]
    #[case::above_default(None, 31, true)]
    #[case::below_override(Some(2), 1, false)]
    #[case::at_override(Some(2), 2, true)]
    #[case::override_above_default(Some(40), 30, false)]
    #[case::zero_override_fresh(Some(0), 0, true)]
    #[case::negative_override_fresh(Some(-3), 0, true)]
    fn quota_compares_against_effective_threshold(
        #[case] n_answers: Option<i64>,
        #[case] count: u64,
        #[case] expected: bool,
    ) {
        let quota = AnswerQuota::default();
        assert_eq!(quota.is_met(&task(n_answers), count), expected);
    }

    #[test]
    fn quota_default_is_thirty() {
        assert_eq!(AnswerQuota::default().default_threshold(), 30);
    }

    #[test]
    fn override_of_one_task_does_not_leak_into_the_next() {
        let quota = AnswerQuota::new(5);
        let strict = task(Some(1));
        let plain = task(None);

        assert!(quota.is_met(&strict, 1));
        // 前のタスクの override を引きずらない
        assert!(!quota.is_met(&plain, 1));
        assert_eq!(quota.threshold_for(&plain), 5);
    }

    #[test]
    fn huge_counts_do_not_overflow() {
        let quota = AnswerQuota::new(i64::MAX);
        assert!(quota.is_met(&task(None), u64::MAX));
    }

    #[rstest]
    #[case::fresh(TaskState::Pending, 0, true)]
    #[case::answered(TaskState::Pending, 1, false)]
    #[case::completed(TaskState::Completed, 0, false)]
    fn eligibility(#[case] state: TaskState, #[case] own_answers: u64, #[case] expected: bool) {
        let mut t = task(None);
        t.state = state;
        assert_eq!(is_eligible(&t, own_answers), expected);
    }

    #[test]
    fn pick_uniform_on_empty_is_none() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(pick_uniform::<u8, _>(&mut rng, vec![]), None);
    }

    #[test]
    fn pick_uniform_single_candidate() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(pick_uniform(&mut rng, vec!["only"]), Some("only"));
    }

    #[test]
    fn pick_uniform_reaches_every_candidate() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [0u32; 4];
        for _ in 0..400 {
            let picked = pick_uniform(&mut rng, vec![0usize, 1, 2, 3]).unwrap();
            seen[picked] += 1;
        }
        assert!(seen.iter().all(|&n| n > 50), "skewed draw: {seen:?}");
    }
}
