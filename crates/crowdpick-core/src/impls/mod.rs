//! Impls - 実装（開発用・テスト用）
//!
//! このモジュールには ports の実装を含めます。
//!
//! # 含まれる実装
//! - **InMemoryStore**: TaskRepository と StatsRepository の開発用実装
//!
//! 本番用のデータベース実装はこのクレートの外に置きます。

pub mod inmem_store;

pub use self::inmem_store::InMemoryStore;
