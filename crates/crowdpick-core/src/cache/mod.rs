//! Cache module: read-through memoization for aggregate queries.

mod ttl;
mod users;

pub use ttl::TtlCache;
pub use users::{
    DEFAULT_PER_PAGE, DEFAULT_TOP_USERS, Freshness, TOTAL_USERS_KEY, UserStatsCache,
    top_users_key, user_summary_key, users_page_key,
};
