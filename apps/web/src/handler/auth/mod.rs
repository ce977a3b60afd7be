//! # 認証ハンドラ
//!
//! ## エンドポイント
//!
//! - `GET /login` - ログインページ
//! - `POST /login` - ログイン
//! - `GET /logout` - ログアウト
//! - `GET /register` - 登録ページ
//! - `POST /register` - ユーザー登録
//!
//! セッション ID は `session_id` Cookie で受け渡す。

mod login;
mod logout;
mod register;

use std::sync::Arc;

use axum_extra::extract::cookie::{Cookie, SameSite};
pub use login::*;
pub use logout::*;
use passhield_infra::{
    InfraError,
    LoginAttemptLimiter,
    PasswordHasher,
    SessionManager,
    repository::{CredentialRepository, TokenRepository},
    session::SESSION_TTL_SECONDS,
};
pub use register::*;
use serde::Deserialize;

/// 認証ハンドラの共有状態
pub struct AuthState {
    pub session_manager:       Arc<dyn SessionManager>,
    pub login_attempt_limiter: Arc<dyn LoginAttemptLimiter>,
    pub credential_repository: Arc<dyn CredentialRepository>,
    pub token_repository:      Arc<dyn TokenRepository>,
    pub password_hasher:       Arc<dyn PasswordHasher>,
    /// Cookie に Secure 属性を付けるか（`ENV=production`）
    pub secure_cookie:         bool,
}

// --- フォーム ---

/// ログイン・登録フォーム
///
/// 欠けた項目は空文字として受け取り、バリデーションで 400 にする。
#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

// --- 共有定数 ---

/// Cookie 名
const SESSION_COOKIE_NAME: &str = "session_id";

// --- Cookie ヘルパー ---

/// セッション Cookie を構築する
///
/// 有効期限はサーバー側セッションの TTL と揃える。
fn build_session_cookie(session_id: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, session_id.to_string()))
        .path("/")
        .max_age(time::Duration::seconds(SESSION_TTL_SECONDS as i64))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Cookie をクリアするための Cookie を構築する
fn build_clear_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, ""))
        .path("/")
        .max_age(time::Duration::seconds(0))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

// --- パスワードハッシュ ---

/// パスワードハッシュ処理を blocking スレッドで実行する
///
/// Argon2id はメモリと CPU を大きく使うため、非同期ワーカーを塞がないようにする。
async fn run_hasher<T, F>(state: &AuthState, f: F) -> Result<T, InfraError>
where
    F: FnOnce(&dyn PasswordHasher) -> Result<T, InfraError> + Send + 'static,
    T: Send + 'static,
{
    let hasher = Arc::clone(&state.password_hasher);
    tokio::task::spawn_blocking(move || f(hasher.as_ref()))
        .await
        .map_err(|e| InfraError::unexpected(format!("ハッシュ処理のタスクが失敗: {e}")))?
}

// --- テストユーティリティ ---
