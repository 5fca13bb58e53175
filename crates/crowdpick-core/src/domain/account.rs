//! Users, projects and the aggregate views built over their answers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{ProjectId, UserId};

/// Registered user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub fullname: String,
    pub email_addr: String,
    pub created: DateTime<Utc>,
    pub api_key: Option<String>,
    pub twitter_user_id: Option<i64>,
    pub facebook_user_id: Option<i64>,
    pub google_user_id: Option<String>,
}

impl User {
    pub fn new(id: UserId, name: impl Into<String>, created: DateTime<Utc>) -> Self {
        let name = name.into();
        Self {
            id,
            fullname: name.clone(),
            email_addr: format!("{name}@example.com"),
            name,
            created,
            api_key: None,
            twitter_user_id: None,
            facebook_user_id: None,
            google_user_id: None,
        }
    }
}

/// Project ("app") that owns tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub short_name: String,
    pub owner_id: Option<UserId>,
    pub info: serde_json::Value,
    pub created: DateTime<Utc>,
}

impl Project {
    pub fn new(id: ProjectId, short_name: impl Into<String>, created: DateTime<Utc>) -> Self {
        let short_name = short_name.into();
        Self {
            id,
            name: short_name.clone(),
            short_name,
            owner_id: None,
            info: serde_json::json!({}),
            created,
        }
    }

    pub fn owned_by(mut self, owner_id: UserId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }
}

/// A user together with how many answers they submitted.
///
/// Row shape of the "top users" and "users page" listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserActivity {
    pub id: UserId,
    pub name: String,
    pub fullname: String,
    pub email_addr: String,
    pub created: DateTime<Utc>,
    pub task_runs: u64,
}

impl UserActivity {
    pub fn from_user(user: &User, task_runs: u64) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            fullname: user.fullname.clone(),
            email_addr: user.email_addr.clone(),
            created: user.created,
            task_runs,
        }
    }
}

/// A project the user answered tasks in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectContribution {
    pub id: ProjectId,
    pub name: String,
    pub short_name: String,
    pub info: serde_json::Value,
    pub n_answers: u64,
}

/// Profile page data for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub user: User,
    pub n_answers: u64,

    /// Competition rank ("1, 2, 2, 4") among users with at least one answer.
    /// `None` when the user never answered.
    pub rank: Option<u64>,
    pub score: Option<u64>,

    /// Ordered by `n_answers` descending.
    pub projects: Vec<ProjectContribution>,

    /// Ordered by creation time descending.
    pub projects_created: Vec<Project>,
}
