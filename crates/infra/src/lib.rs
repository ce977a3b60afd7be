//! # PassShield インフラ層
//!
//! Redis・PostgreSQL との通信と、パスワードハッシュ計算を担当する。
//!
//! ## 依存関係
//!
//! ```text
//! web → infra → domain
//! ```
//!
//! web 層はここで定義したトレイト（`SessionManager` など）にのみ依存し、
//! テストではスタブ実装に差し替える。
//!
//! ## モジュール構成
//!
//! - [`db`] - PostgreSQL 接続プールとマイグレーション
//! - [`redis`] - Redis 接続管理
//! - [`session`] - セッション管理（Redis）
//! - [`login_attempt`] - ログイン試行回数の制限（Redis）
//! - [`password`] - 鍵付き Argon2id によるハッシュ計算と検証
//! - [`repository`] - 認証情報・アクセストークンのリポジトリ（PostgreSQL）
//! - [`error`] - インフラ層エラー定義
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use passhield_infra::{db, redis, RedisSessionManager};
//!
//! async fn setup() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = db::create_pool("postgres://localhost/passhield").await?;
//!     db::run_migrations(&pool).await?;
//!
//!     let conn = redis::create_connection_manager("redis://localhost").await?;
//!     let sessions = RedisSessionManager::with_connection(conn);
//!
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod error;
pub mod login_attempt;
pub mod password;
pub mod redis;
pub mod repository;
pub mod session;

pub use error::{InfraError, InfraErrorKind};
pub use login_attempt::{LoginAttemptLimiter, RedisLoginAttemptLimiter};
pub use password::{KeyedArgon2PasswordHasher, PasswordHasher};
pub use session::{RedisSessionManager, SessionData, SessionManager};
