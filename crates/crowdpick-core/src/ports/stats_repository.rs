//! StatsRepository port - ユーザー集計クエリ
//!
//! Aggregates over users and their answers. Read-only, and expensive enough
//! that callers go through [`crate::cache::UserStatsCache`].

use async_trait::async_trait;

use crate::domain::{RepositoryError, UserActivity, UserSummary};

#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Users with at least one answer, most answers first.
    async fn top_users(&self, limit: usize) -> Result<Vec<UserActivity>, RepositoryError>;

    /// Profile, rank and contributions of the named user.
    async fn user_summary(&self, name: &str) -> Result<Option<UserSummary>, RepositoryError>;

    /// Count of registered users, answered or not.
    async fn total_users(&self) -> Result<u64, RepositoryError>;

    /// Users with at least one answer, newest account first.
    async fn users_page(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<UserActivity>, RepositoryError>;
}
