//! # PassShield 共有ユーティリティ
//!
//! ワークスペース全体（domain / infra / web）で使用される共通ユーティリティ。
//!
//! ## 設計方針
//!
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - axum には依存しない（HTTP レスポンスへの変換は web 側の責務）
//! - tracing-subscriber / tower 系の依存は `observability` feature の背後に置く

#[cfg(feature = "observability")]
pub mod canonical_log;
pub mod error_response;
pub mod event_log;
pub mod health;
pub mod observability;

pub use error_response::ErrorResponse;
pub use health::{CheckStatus, HealthResponse, ReadinessResponse, ReadinessStatus};
