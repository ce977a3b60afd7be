//! # PassShield ドメイン層
//!
//! アカウント認証に関する値オブジェクトと純粋なルールを定義する。
//!
//! ## 依存関係の方向
//!
//! ```text
//! web → infra → domain
//!   ↘            ↑
//!     ───────────┘
//! ```
//!
//! ドメイン層は DB・Redis・HTTP に一切依存しない。
//!
//! ## モジュール構成
//!
//! - [`account`] - ユーザー名
//! - [`password`] - 平文パスワード、ハッシュ、検証結果
//! - [`access_token`] - ログイン成功時に発行するアクセストークン
//! - [`login_attempt`] - ログイン試行回数の制限ポリシー
//! - [`error`] - ドメインエラー

pub mod access_token;
pub mod account;
pub mod error;
pub mod login_attempt;
pub mod password;

pub use error::DomainError;

/// ログ出力時に値を伏せる際のプレースホルダ
pub const REDACTED: &str = "[REDACTED]";
