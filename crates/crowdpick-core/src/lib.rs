//! crowdpick-core
//!
//! Task assignment for crowdsourcing projects: hand each participant a task
//! they have not answered yet, and retire tasks that collected enough answers.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, task, answer, participant, account, errors）
//! - **ports**: 抽象化レイヤー（TaskRepository, StatsRepository, Clock）
//! - **sched**: タスク選択（retirement sweep → candidate filter → uniform draw）
//! - **cache**: ユーザー集計の read-through キャッシュ
//! - **impls**: 実装（InMemoryStore など開発用）
//! - **config**: 環境変数からの設定

pub mod cache;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod sched;

pub use config::Config;
pub use domain::{Participant, SchedulerError, Task};
pub use sched::TaskSelector;
