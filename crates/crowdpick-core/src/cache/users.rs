//! Read-through cache over the user statistics queries.
//!
//! Keys follow the accessor name, so a single entry can be dropped when the
//! data behind it changes (see [`UserStatsCache::invalidate_user_summary`]).

use std::num::NonZeroUsize;
use std::sync::Arc;

use tracing::debug;

use super::ttl::TtlCache;
use crate::config::CacheConfig;
use crate::domain::{StatsError, UserActivity, UserSummary};
use crate::ports::{Clock, StatsRepository, SystemClock};

pub const DEFAULT_TOP_USERS: usize = 10;
pub const DEFAULT_PER_PAGE: u32 = 24;

/// How long a cached result may be served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Short,
    Medium,
    Long,
}

impl Freshness {
    fn window(self, config: &CacheConfig) -> std::time::Duration {
        match self {
            Freshness::Short => config.short,
            Freshness::Medium => config.medium,
            Freshness::Long => config.long,
        }
    }
}

pub fn top_users_key(n: usize) -> String {
    format!("front_page_top_users:{n}")
}

pub fn user_summary_key(name: &str) -> String {
    format!("user_summary:{name}")
}

pub const TOTAL_USERS_KEY: &str = "site_total_users";

pub fn users_page_key(page: u32, per_page: u32) -> String {
    format!("users_page:{page}:{per_page}")
}

fn ttl_cache<V: Clone>(
    name: &'static str,
    config: &CacheConfig,
    freshness: Freshness,
    clock: &Arc<dyn Clock>,
) -> TtlCache<V> {
    let capacity = NonZeroUsize::new(config.capacity).unwrap_or(NonZeroUsize::MIN);
    TtlCache::new(name, capacity, freshness.window(config), Arc::clone(clock))
}

/// Memoized user statistics.
///
/// | accessor | freshness |
/// |---|---|
/// | `top_users` | long |
/// | `user_summary` | short |
/// | `total_users` | medium |
/// | `users_page` | medium |
pub struct UserStatsCache {
    repo: Arc<dyn StatsRepository>,
    top: TtlCache<Vec<UserActivity>>,
    summaries: TtlCache<Option<UserSummary>>,
    totals: TtlCache<u64>,
    pages: TtlCache<Vec<UserActivity>>,
}

impl UserStatsCache {
    pub fn new(repo: Arc<dyn StatsRepository>, config: &CacheConfig) -> Self {
        Self::with_clock(repo, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        repo: Arc<dyn StatsRepository>,
        config: &CacheConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repo,
            top: ttl_cache("top_users", config, Freshness::Long, &clock),
            summaries: ttl_cache("user_summary", config, Freshness::Short, &clock),
            totals: ttl_cache("total_users", config, Freshness::Medium, &clock),
            pages: ttl_cache("users_page", config, Freshness::Medium, &clock),
        }
    }

    /// The `n` users with most answers.
    pub async fn top_users(&self, n: usize) -> Result<Vec<UserActivity>, StatsError> {
        let repo = &self.repo;
        let users = self
            .top
            .get_or_load(&top_users_key(n), || async move { repo.top_users(n).await })
            .await?;
        Ok(users)
    }

    /// Profile data for `name`. `Ok(None)` for unknown users.
    pub async fn user_summary(&self, name: &str) -> Result<Option<UserSummary>, StatsError> {
        let repo = &self.repo;
        let summary = self
            .summaries
            .get_or_load(&user_summary_key(name), || async move {
                repo.user_summary(name).await
            })
            .await?;
        Ok(summary)
    }

    pub async fn total_users(&self) -> Result<u64, StatsError> {
        let repo = &self.repo;
        let total = self
            .totals
            .get_or_load(TOTAL_USERS_KEY, || async move { repo.total_users().await })
            .await?;
        Ok(total)
    }

    /// One page of active users, newest first. Pages start at 1.
    pub async fn users_page(&self, page: u32, per_page: u32) -> Result<Vec<UserActivity>, StatsError> {
        if page == 0 {
            return Err(StatsError::InvalidPage(page));
        }
        if per_page == 0 {
            return Err(StatsError::InvalidPageSize(per_page));
        }

        let offset = (page as usize - 1) * per_page as usize;
        let limit = per_page as usize;
        let repo = &self.repo;
        let users = self
            .pages
            .get_or_load(&users_page_key(page, per_page), || async move {
                repo.users_page(offset, limit).await
            })
            .await?;
        Ok(users)
    }

    /// Drop the cached summary of `name`, e.g. after they answered a task.
    pub fn invalidate_user_summary(&self, name: &str) -> bool {
        let dropped = self.summaries.invalidate(&user_summary_key(name));
        debug!(name, dropped, "Invalidated user summary");
        dropped
    }

    /// Drop every cached result.
    pub fn clear(&self) {
        self.top.clear();
        self.summaries.clear();
        self.totals.clear();
        self.pages.clear();
    }
}
