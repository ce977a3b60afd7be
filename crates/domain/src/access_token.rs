//! # アクセストークン
//!
//! ログイン成功時に発行する不透明なトークン。
//!
//! 256 文字で、各文字は [`ACCESS_TOKEN_ALPHABET`] から一様に選ぶ。
//! 乱数源は OS の CSPRNG をシードとする `rand::rng()`（ChaCha ベース）を使う。

use rand::Rng as _;

/// トークンの長さ（文字数）
pub const ACCESS_TOKEN_LENGTH: usize = 256;

/// トークンに使用する文字集合（63 文字）
pub const ACCESS_TOKEN_ALPHABET: &[u8] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz-";

/// アクセストークン
///
/// Debug 出力では先頭 8 文字以外をマスクする。
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// 新しいトークンをランダムに生成する
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let token = (0..ACCESS_TOKEN_LENGTH)
            .map(|_| {
                let index = rng.random_range(0..ACCESS_TOKEN_ALPHABET.len());
                char::from(ACCESS_TOKEN_ALPHABET[index])
            })
            .collect();
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix: String = self.0.chars().take(8).collect();
        f.debug_tuple("AccessToken")
            .field(&format!("{prefix}..."))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_生成されるトークンは256文字() {
        let token = AccessToken::generate();
        assert_eq!(token.as_str().len(), ACCESS_TOKEN_LENGTH);
    }

    #[rstest]
    fn test_トークンは許可された文字のみで構成される() {
        let token = AccessToken::generate();
        assert!(
            token
                .as_str()
                .bytes()
                .all(|b| ACCESS_TOKEN_ALPHABET.contains(&b)),
            "許可されていない文字を含む: {}",
            token.as_str()
        );
    }

    #[rstest]
    fn test_生成のたびに異なるトークンになる() {
        let tokens: HashSet<String> = (0..16)
            .map(|_| AccessToken::generate().as_str().to_string())
            .collect();
        assert_eq!(tokens.len(), 16);
    }

    #[rstest]
    fn test_debug出力は先頭8文字以外をマスクする() {
        let token = AccessToken::generate();
        let debug = format!("{token:?}");

        assert_eq!(debug, format!("AccessToken(\"{}...\")", &token.as_str()[..8]));
        assert!(!debug.contains(&token.as_str()[8..]));
    }

    #[rstest]
    fn test_文字集合は63文字で重複がない() {
        let unique: HashSet<u8> = ACCESS_TOKEN_ALPHABET.iter().copied().collect();
        assert_eq!(ACCESS_TOKEN_ALPHABET.len(), 63);
        assert_eq!(unique.len(), 63);
    }
}
