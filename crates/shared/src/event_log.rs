//! # ビジネスイベントログとエラーコンテキストのフィールド規約
//!
//! ログを `jq` で横断的に絞り込めるよう、フィールド名と値を定数として集約する。
//!
//! - ビジネスイベント: [`log_business_event!`] で出力する。
//!   `event.kind = "business_event"` が自動付与される
//! - エラーコンテキスト: `tracing::error!` に `error.category` + `error.kind` を付ける
//!
//! フィールド名はドット記法（`event.action`）を使う。JSON 出力ではフラットなキーになる。

/// ビジネスイベントを構造化ログとして出力する。
///
/// `event.kind = "business_event"` を自動付与し、INFO レベルで出力する。
///
/// 慣例として `event.category` / `event.action` / `event.result` を必ず指定する。
#[macro_export]
macro_rules! log_business_event {
    ($($args:tt)*) => {
        ::tracing::info!(
            event.kind = "business_event",
            $($args)*
        )
    };
}

/// イベントフィールドの定数
pub mod event {
    pub mod category {
        pub const AUTH: &str = "auth";
    }

    pub mod action {
        pub const LOGIN_SUCCESS: &str = "auth.login_success";
        pub const LOGIN_FAILURE: &str = "auth.login_failure";
        pub const LOGOUT: &str = "auth.logout";
        pub const REGISTERED: &str = "auth.registered";
        pub const REGISTRATION_FAILURE: &str = "auth.registration_failure";
    }

    pub mod entity_type {
        pub const ACCOUNT: &str = "account";
        pub const SESSION: &str = "session";
    }

    pub mod result {
        pub const SUCCESS: &str = "success";
        pub const FAILURE: &str = "failure";
    }

    /// 失敗理由（`event.reason`）
    pub mod reason {
        pub const INVALID_INPUT: &str = "invalid_input";
        pub const ACCOUNT_NOT_FOUND: &str = "account_not_found";
        pub const PASSWORD_MISMATCH: &str = "password_mismatch";
        pub const TOO_MANY_ATTEMPTS: &str = "too_many_attempts";
        pub const USERNAME_TAKEN: &str = "username_taken";
    }
}

/// エラーコンテキストフィールドの定数
pub mod error {
    pub mod category {
        /// DB、Redis、セッションストア
        pub const INFRASTRUCTURE: &str = "infrastructure";
    }

    pub mod kind {
        pub const DATABASE: &str = "database";
        pub const SESSION: &str = "session";
        pub const LOGIN_ATTEMPTS: &str = "login_attempts";
        pub const PASSWORD_HASH: &str = "password_hash";
        pub const TEMPLATE: &str = "template";
    }
}
