//! # HTTP リクエストハンドラ
//!
//! - `index`: トップページ（ログインページへリダイレクト）
//! - `auth`: ログイン・ログアウト・ユーザー登録
//! - `health`: ヘルスチェック

pub mod auth;
pub mod health;
pub mod index;

pub use auth::{AuthState, login, login_page, logout, register, register_page};
pub use health::{ReadinessState, health_check, readiness_check};
pub use index::index;
