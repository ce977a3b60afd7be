//! # Web エラーハンドリング
//!
//! ハンドラが返す [`PageError`] と、HTML の結果通知ページへの変換。
//!
//! | バリアント | ステータス |
//! |---|---|
//! | `InvalidLoginInput` / `InvalidRegistration` | 400 |
//! | `PasswordMismatch` | 401 |
//! | `AccountNotFound` | 404 |
//! | `UsernameTaken` | 409 |
//! | `TooManyAttempts` | 429 |
//! | `Internal` / `View` | 500 |
//!
//! 500 系の原因はハンドラ側で `error.category` / `error.kind` を付けてログ出力し、
//! 画面には固定文言のみを表示する。

use axum::{
    Json,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use passhield_shared::{ErrorResponse, event_log::error};
use thiserror::Error;

use crate::view::{self, MessagePage, ViewError};

/// ページを返すハンドラのエラー
#[derive(Debug, Error)]
pub enum PageError {
    /// ログインフォームの入力が不正
    #[error("ログイン入力が不正: {0}")]
    InvalidLoginInput(String),

    /// 登録フォームの入力が不正
    #[error("登録入力が不正: {0}")]
    InvalidRegistration(String),

    #[error("ユーザーが存在しない")]
    AccountNotFound,

    #[error("パスワード不一致")]
    PasswordMismatch,

    #[error("ユーザー名が既に使われている")]
    UsernameTaken,

    /// ログイン試行回数の上限に達した
    #[error("ログイン試行回数の上限")]
    TooManyAttempts,

    /// インフラ層のエラー（ログ出力済み）
    #[error("内部エラー")]
    Internal,

    #[error(transparent)]
    View(#[from] ViewError),
}

impl PageError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidLoginInput(_) | Self::InvalidRegistration(_) => StatusCode::BAD_REQUEST,
            Self::PasswordMismatch => StatusCode::UNAUTHORIZED,
            Self::AccountNotFound => StatusCode::NOT_FOUND,
            Self::UsernameTaken => StatusCode::CONFLICT,
            Self::TooManyAttempts => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal | Self::View(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message_page(&self) -> MessagePage {
        const LOGIN_FAILED: (&str, &str) = ("login failed", "Sorry, login is failed.");
        const REGISTRATION_FAILED: (&str, &str) = (
            "registration failed",
            "Sorry, your registration is failed.",
        );

        let ((title, heading), detail) = match self {
            Self::InvalidLoginInput(reason) => (LOGIN_FAILED, reason.clone()),
            Self::AccountNotFound => (
                LOGIN_FAILED,
                "The username does not exist.".to_string(),
            ),
            Self::PasswordMismatch => (
                LOGIN_FAILED,
                "The password does not match the username.".to_string(),
            ),
            Self::TooManyAttempts => (
                LOGIN_FAILED,
                "Too many login attempts. Please try again later.".to_string(),
            ),
            Self::InvalidRegistration(reason) => (REGISTRATION_FAILED, reason.clone()),
            Self::UsernameTaken => (
                REGISTRATION_FAILED,
                "The username you entered already exists.".to_string(),
            ),
            Self::Internal | Self::View(_) => (
                ("error", "Something went wrong."),
                "Please try again later.".to_string(),
            ),
        };

        MessagePage {
            title,
            heading,
            detail: Some(detail),
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if let Self::View(e) = &self {
            tracing::error!(
                error.category = error::category::INFRASTRUCTURE,
                error.kind = error::kind::TEMPLATE,
                "ページ描画に失敗: {}",
                e
            );
        }

        match view::message_page(&self.message_page()) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                tracing::error!(
                    error.category = error::category::INFRASTRUCTURE,
                    error.kind = error::kind::TEMPLATE,
                    "エラーページの描画に失敗: {}",
                    e
                );
                (status, status.canonical_reason().unwrap_or("error")).into_response()
            }
        }
    }
}

/// ルートに一致しないリクエストへのフォールバック（JSON 404）
pub async fn not_found_fallback() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::not_found("The requested path does not exist")),
    )
        .into_response()
}
