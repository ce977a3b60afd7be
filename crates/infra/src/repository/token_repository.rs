//! # TokenRepository
//!
//! ログイン成功時に発行したアクセストークンを保存する。
//! ユーザーごとに有効なトークンは 1 つだけで、再ログインで上書きされる。

use async_trait::async_trait;
use passhield_domain::{access_token::AccessToken, account::Username};
use sqlx::PgPool;

use crate::InfraError;

/// アクセストークンリポジトリトレイト
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// ユーザーのトークンを置き換える（未発行なら作成する）
    async fn replace(&self, username: &Username, token: &AccessToken) -> Result<(), InfraError>;
}

/// PostgreSQL 実装の TokenRepository
#[derive(Debug, Clone)]
pub struct PostgresTokenRepository {
    pool: PgPool,
}

impl PostgresTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenRepository for PostgresTokenRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(username = %username))]
    async fn replace(&self, username: &Username, token: &AccessToken) -> Result<(), InfraError> {
        sqlx::query(
            r#"
            INSERT INTO access_tokens (username, token, issued_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (username)
            DO UPDATE SET token = EXCLUDED.token, issued_at = EXCLUDED.issued_at
            "#,
        )
        .bind(username.as_str())
        .bind(token.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
