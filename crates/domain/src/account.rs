//! # アカウント
//!
//! ログインに使うユーザー名を定義する。
//!
//! ## ユーザー名の規則
//!
//! - 前後の空白は除去する
//! - 1 文字以上 50 文字以内
//! - 使用できる文字は ASCII 英数字と `_` `-` `.` のみ
//!
//! 使用文字を限定しているのは、ユーザー名を Redis キー
//! （`login_attempts:{username}`）にそのまま埋め込むため。

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::DomainError;

/// ユーザー名の最大長（credentials テーブルの列定義と揃える）
pub const USERNAME_MAX_LENGTH: usize = 50;

/// ユーザー名（値オブジェクト）
///
/// 生成時にバリデーションを行い、不正な値のインスタンスを作らせない。
///
/// ```
/// use passhield_domain::account::Username;
///
/// let username = Username::new("  alice ").unwrap();
/// assert_eq!(username.as_str(), "alice");
/// assert!(Username::new("alice bob").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(try_from = "String", into = "String")]
#[display("{_0}")]
pub struct Username(String);

impl Username {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into().trim().to_string();

        if value.is_empty() {
            return Err(DomainError::Validation(
                "Username is required.".to_string(),
            ));
        }

        if value.chars().count() > USERNAME_MAX_LENGTH {
            return Err(DomainError::Validation(format!(
                "Username must be at most {USERNAME_MAX_LENGTH} characters."
            )));
        }

        if !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        {
            return Err(DomainError::Validation(
                "Username may contain only letters, digits, '_', '-' and '.'.".to_string(),
            ));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Username {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Username> for String {
    fn from(username: Username) -> Self {
        username.0
    }
}
