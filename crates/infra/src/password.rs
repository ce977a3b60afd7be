//! # パスワードハッシュ
//!
//! サーバー秘密鍵付きの Argon2id でパスワードをハッシュ化・検証する。
//!
//! - パラメータ: Memory 64 MB / Iterations 1 / Parallelism 1（RFC 9106 の推奨値）
//! - ソルト: パスワードごとに 16 バイトの乱数
//! - 秘密鍵: `PASSWORD_SECRET` を Argon2 の secret パラメータとして渡す。
//!   DB のハッシュだけが漏洩しても、秘密鍵なしでは総当たりできない
//! - 保存形式: PHC 文字列（`$argon2id$v=19$m=65536,t=1,p=1$...`）

use argon2::{
    Algorithm,
    Argon2,
    Params,
    PasswordHasher as _,
    PasswordVerifier as _,
    Version,
    password_hash::{PasswordHash as Argon2PasswordHash, SaltString},
};
use passhield_domain::password::{PasswordHash, PasswordVerifyResult, PlainPassword};

use crate::InfraError;

/// ソルト長（バイト）
const SALT_LENGTH: usize = 16;

/// パスワードのハッシュ化と検証を担当するトレイト
pub trait PasswordHasher: Send + Sync {
    /// パスワードをハッシュ化する
    fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, InfraError>;

    /// パスワードを検証する
    ///
    /// # Errors
    ///
    /// - 不正なハッシュ形式の場合
    fn verify(
        &self,
        password: &PlainPassword,
        hash: &PasswordHash,
    ) -> Result<PasswordVerifyResult, InfraError>;

    /// ユーザーが存在しない時に、存在する時と同じ計算量の検証を行う
    ///
    /// 応答時間の差からユーザー名の存在を推測されないようにする。
    fn verify_dummy(&self, password: &PlainPassword);
}

/// 秘密鍵付き Argon2id の実装
pub struct KeyedArgon2PasswordHasher {
    secret:     Vec<u8>,
    params:     Params,
    dummy_hash: PasswordHash,
}

impl KeyedArgon2PasswordHasher {
    /// 秘密鍵を指定して作成する
    ///
    /// タイミング均一化用のダミーハッシュを作成時に一度だけ計算する。
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, InfraError> {
        let params = Params::new(
            65536, // memory (KB) = 64 MB
            1,     // iterations
            1,     // parallelism
            None,  // output length (default: 32)
        )
        .map_err(|e| InfraError::unexpected(format!("Argon2 パラメータが不正です: {e}")))?;

        let mut hasher = Self {
            secret: secret.into(),
            params,
            dummy_hash: PasswordHash::new(""),
        };

        let dummy_password: [u8; 32] = rand::random();
        hasher.dummy_hash = hasher.hash_bytes(&dummy_password)?;

        Ok(hasher)
    }

    fn argon2(&self) -> Result<Argon2<'_>, InfraError> {
        Argon2::new_with_secret(
            &self.secret,
            Algorithm::Argon2id,
            Version::V0x13,
            self.params.clone(),
        )
        .map_err(|e| InfraError::unexpected(format!("Argon2 の初期化に失敗しました: {e}")))
    }

    fn hash_bytes(&self, password: &[u8]) -> Result<PasswordHash, InfraError> {
        let salt: [u8; SALT_LENGTH] = rand::random();
        let salt = SaltString::encode_b64(&salt)
            .map_err(|e| InfraError::unexpected(format!("ソルトの生成に失敗しました: {e}")))?;

        let hash = self
            .argon2()?
            .hash_password(password, &salt)
            .map_err(|e| InfraError::unexpected(format!("ハッシュ計算に失敗しました: {e}")))?;

        Ok(PasswordHash::new(hash.to_string()))
    }
}

impl PasswordHasher for KeyedArgon2PasswordHasher {
    fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, InfraError> {
        self.hash_bytes(password.as_str().as_bytes())
    }

    fn verify(
        &self,
        password: &PlainPassword,
        hash: &PasswordHash,
    ) -> Result<PasswordVerifyResult, InfraError> {
        let parsed = Argon2PasswordHash::new(hash.as_str())
            .map_err(|e| InfraError::unexpected(format!("不正なハッシュ形式: {e}")))?;

        // 出力の比較は password-hash クレート内で定数時間で行われる
        let matched = self
            .argon2()?
            .verify_password(password.as_str().as_bytes(), &parsed)
            .is_ok();

        Ok(PasswordVerifyResult::from(matched))
    }

    fn verify_dummy(&self, password: &PlainPassword) {
        if let Err(e) = self.verify(password, &self.dummy_hash) {
            tracing::warn!("ダミー検証に失敗しました: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn hasher() -> KeyedArgon2PasswordHasher {
        KeyedArgon2PasswordHasher::new("test-secret-0123456789abcdef0123456789")
            .expect("ハッシャーの作成に失敗")
    }

    #[rstest]
    fn test_ハッシュはphc形式でパラメータを含む(hasher: KeyedArgon2PasswordHasher) {
        let hash = hasher.hash(&PlainPassword::new("password123")).unwrap();

        assert!(
            hash.as_str().starts_with("$argon2id$v=19$m=65536,t=1,p=1$"),
            "想定外の形式: {}",
            hash.as_str()
        );
    }

    #[rstest]
    fn test_正しいパスワードを検証できる(hasher: KeyedArgon2PasswordHasher) {
        let password = PlainPassword::new("password123");
        let hash = hasher.hash(&password).unwrap();

        let result = hasher.verify(&password, &hash).unwrap();

        assert!(result.is_match());
    }

    #[rstest]
    fn test_異なるパスワードは不一致になる(hasher: KeyedArgon2PasswordHasher) {
        let hash = hasher.hash(&PlainPassword::new("password123")).unwrap();

        let result = hasher
            .verify(&PlainPassword::new("wrongpassword"), &hash)
            .unwrap();

        assert!(result.is_mismatch());
    }

    #[rstest]
    fn test_同じパスワードでもソルトが異なればハッシュも異なる(
        hasher: KeyedArgon2PasswordHasher,
    ) {
        let password = PlainPassword::new("password123");

        let first = hasher.hash(&password).unwrap();
        let second = hasher.hash(&password).unwrap();

        assert_ne!(first, second);
    }

    #[rstest]
    fn test_不正なハッシュ形式はエラー(hasher: KeyedArgon2PasswordHasher) {
        let result = hasher.verify(
            &PlainPassword::new("password123"),
            &PasswordHash::new("not-a-valid-hash"),
        );

        assert!(result.is_err());
    }

    #[rstest]
    fn test_ダミー検証はパニックしない(hasher: KeyedArgon2PasswordHasher) {
        hasher.verify_dummy(&PlainPassword::new("anything"));
    }
}
