use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crowdpick_core::cache::{DEFAULT_PER_PAGE, DEFAULT_TOP_USERS, UserStatsCache};
use crowdpick_core::config::{self, Config};
use crowdpick_core::domain::{Participant, ProjectId, SchedulerError, TaskState, UserId};
use crowdpick_core::impls::InMemoryStore;
use crowdpick_core::sched::TaskSelector;

/// Simulate participants working through a project until nothing is left.
#[derive(Debug, Parser)]
#[command(name = "crowdpick", version)]
struct Args {
    /// Tasks in the demo project.
    #[arg(long, default_value_t = 6)]
    tasks: usize,

    /// Registered participants.
    #[arg(long, default_value_t = 3)]
    users: usize,

    /// Anonymous participants (one origin each).
    #[arg(long, default_value_t = 2)]
    anonymous: usize,

    /// Answers required per task. Falls back to CROWDPICK_DEFAULT_N_ANSWERS.
    #[arg(long, env = "CROWDPICK_DEFAULT_N_ANSWERS")]
    threshold: Option<i64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    config::load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut config = Config::from_env().context("reading configuration")?;
    if let Some(threshold) = args.threshold {
        config.scheduler.default_n_answers = threshold;
    }

    // (A) ストアとプロジェクトを用意
    let store = Arc::new(InMemoryStore::new());
    let project_id = store.add_project("demo", None).await;
    for _ in 0..args.tasks {
        store.add_task(project_id, None).await?;
    }

    let mut participants = Vec::new();
    let mut names = HashMap::new();
    for i in 0..args.users {
        let name = format!("user{}", i + 1);
        let user_id = store.add_user(&name).await;
        names.insert(user_id, name);
        participants.push(Participant::resolve(Some(user_id), None));
    }
    for i in 0..args.anonymous {
        participants.push(Participant::resolve(None, Some(&format!("10.0.0.{}", i + 1))));
    }

    // (B) 全員が NotFound になるまで回す
    let selector = TaskSelector::from_config(store.clone(), &config.scheduler);
    let stats = UserStatsCache::new(store.clone(), &config.cache);
    let handed_out = run_rounds(&selector, &store, &stats, project_id, &participants, &names).await?;

    // (C) 結果
    let tasks = store.tasks(project_id).await;
    let completed = tasks
        .iter()
        .filter(|t| t.state == TaskState::Completed)
        .count();
    info!(
        handed_out,
        completed,
        total = tasks.len(),
        threshold = selector.default_threshold(),
        "Project drained"
    );

    for user in stats.top_users(DEFAULT_TOP_USERS).await? {
        info!(name = %user.name, answers = user.task_runs, "Top user");
    }
    let listed = stats.users_page(1, DEFAULT_PER_PAGE).await?.len();
    info!(
        registered = stats.total_users().await?,
        listed,
        "User statistics"
    );

    Ok(())
}

async fn run_rounds(
    selector: &TaskSelector,
    store: &InMemoryStore,
    stats: &UserStatsCache,
    project_id: ProjectId,
    participants: &[Participant],
    names: &HashMap<UserId, String>,
) -> anyhow::Result<usize> {
    let mut handed_out = 0;
    let mut done: HashSet<usize> = HashSet::new();
    let mut round = 0;

    while done.len() < participants.len() {
        round += 1;
        for (i, participant) in participants.iter().enumerate() {
            if done.contains(&i) {
                continue;
            }
            let picked = match selector.select_task(project_id, participant).await {
                Ok(picked) => picked,
                Err(err @ SchedulerError::Sweep { .. }) => {
                    warn!(round, participant = %participant, error = %err, "Serving despite lost retirement writes");
                    err.into_fallback()
                }
                Err(err) => return Err(err.into()),
            };
            let Some(task) = picked else {
                info!(round, participant = %participant, "Nothing left");
                done.insert(i);
                continue;
            };

            info!(round, participant = %participant, task_id = %task.id, "Assigned");
            store
                .record_answer(
                    task.id,
                    participant.clone(),
                    serde_json::json!({ "round": round }),
                )
                .await?;
            if let Some(name) = participant.user_id().and_then(|id| names.get(&id)) {
                stats.invalidate_user_summary(name);
            }
            handed_out += 1;
        }
    }
    Ok(handed_out)
}
