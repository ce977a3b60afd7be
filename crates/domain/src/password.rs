//! # パスワード
//!
//! | 型 | 用途 |
//! |---|------|
//! | [`PlainPassword`] | 利用者が入力した平文パスワード |
//! | [`PasswordHash`] | 永続化用のハッシュ（PHC 文字列） |
//! | [`PasswordVerifyResult`] | 検証結果 |

use crate::DomainError;

/// 登録時に要求する最小文字数
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// 登録時に許容する最大文字数
///
/// ハッシュ計算に渡す入力長の上限を決めておく。
pub const PASSWORD_MAX_LENGTH: usize = 128;

/// 平文パスワード
///
/// Debug 出力では値をマスクする。
#[derive(Clone)]
pub struct PlainPassword(String);

impl std::fmt::Debug for PlainPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PlainPassword").field(&"[REDACTED]").finish()
    }
}

impl PlainPassword {
    /// ログイン時の入力値をそのまま包む
    ///
    /// ログインでは長さ規則を適用しない（規則変更前に登録された
    /// パスワードでもログインできるようにするため）。
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// 新規登録用のパスワードを作成する
    ///
    /// 前後の空白も含めてそのまま扱う（trim しない）。
    pub fn for_registration(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let length = value.chars().count();

        if length < PASSWORD_MIN_LENGTH {
            return Err(DomainError::Validation(format!(
                "Password must be at least {PASSWORD_MIN_LENGTH} characters."
            )));
        }

        if length > PASSWORD_MAX_LENGTH {
            return Err(DomainError::Validation(format!(
                "Password must be at most {PASSWORD_MAX_LENGTH} characters."
            )));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// パスワードハッシュ（永続化用）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// パスワード検証結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordVerifyResult {
    Match,
    Mismatch,
}

impl PasswordVerifyResult {
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match)
    }

    pub fn is_mismatch(&self) -> bool {
        matches!(self, Self::Mismatch)
    }
}

impl From<bool> for PasswordVerifyResult {
    fn from(matched: bool) -> Self {
        if matched { Self::Match } else { Self::Mismatch }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_平文パスワードのdebug出力はマスクされる() {
        let password = PlainPassword::new("hunter2");
        let debug = format!("{password:?}");

        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter2"));
    }

    #[rstest]
    fn test_ログイン用は長さを問わない() {
        assert_eq!(PlainPassword::new("").as_str(), "");
        assert_eq!(PlainPassword::new("x").as_str(), "x");
    }

    #[rstest]
    #[case("1234567")]
    #[case("")]
    fn test_登録用は8文字未満でエラー(#[case] input: &str) {
        assert!(PlainPassword::for_registration(input).is_err());
    }

    #[rstest]
    fn test_登録用は8文字から128文字まで許容する() {
        assert!(PlainPassword::for_registration("12345678").is_ok());
        assert!(PlainPassword::for_registration("p".repeat(128)).is_ok());
        assert!(PlainPassword::for_registration("p".repeat(129)).is_err());
    }

    #[rstest]
    fn test_登録用は空白をtrimしない() {
        let password = PlainPassword::for_registration(" secret pass ").unwrap();
        assert_eq!(password.as_str(), " secret pass ");
    }

    #[rstest]
    fn test_boolから検証結果に変換できる() {
        assert_eq!(PasswordVerifyResult::from(true), PasswordVerifyResult::Match);
        assert_eq!(
            PasswordVerifyResult::from(false),
            PasswordVerifyResult::Mismatch
        );
        assert!(PasswordVerifyResult::Match.is_match());
        assert!(PasswordVerifyResult::Mismatch.is_mismatch());
    }
}
