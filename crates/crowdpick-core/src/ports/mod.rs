//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 各 trait は外部システム（データベースなど）へのインターフェースを提供し、
//! 実装の詳細を隠蔽します。開発・テスト用の実装は `impls` にあります。

pub mod clock;
pub mod stats_repository;
pub mod task_repository;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::stats_repository::StatsRepository;
pub use self::task_repository::TaskRepository;
