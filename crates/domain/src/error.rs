//! # ドメイン層エラー定義

use thiserror::Error;

/// ドメイン層で発生するエラー
///
/// web 層で 400 Bad Request に変換される。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// 入力値がドメインルールに違反している
    ///
    /// メッセージはそのまま利用者に表示されるため、内部情報を含めないこと。
    #[error("validation error: {0}")]
    Validation(String),
}

impl DomainError {
    /// 利用者向けの理由文
    pub fn reason(&self) -> &str {
        match self {
            Self::Validation(msg) => msg,
        }
    }
}
