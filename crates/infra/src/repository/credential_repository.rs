//! # CredentialRepository
//!
//! ユーザー名とパスワードハッシュの組を永続化する。
//!
//! ## テーブル
//!
//! ```text
//! credentials(
//!     username      VARCHAR(50) PRIMARY KEY,
//!     password_hash TEXT        NOT NULL,
//!     created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! )
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use passhield_domain::{account::Username, password::PasswordHash};
use sqlx::PgPool;

use crate::InfraError;

/// 認証情報エンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub username:      Username,
    pub password_hash: PasswordHash,
    pub created_at:    DateTime<Utc>,
}

/// 登録結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Created,
    /// 同じユーザー名が既に登録されている
    AlreadyExists,
}

/// 認証情報リポジトリトレイト
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// ユーザー名で認証情報を取得する
    ///
    /// - `Ok(Some(credential))`: 見つかった場合
    /// - `Ok(None)`: 未登録の場合
    async fn find_by_username(&self, username: &Username)
    -> Result<Option<Credential>, InfraError>;

    /// 認証情報を登録する
    ///
    /// ユーザー名の重複はエラーではなく [`InsertOutcome::AlreadyExists`] で返す。
    async fn insert(
        &self,
        username: &Username,
        password_hash: &PasswordHash,
    ) -> Result<InsertOutcome, InfraError>;
}

/// PostgreSQL 実装の CredentialRepository
#[derive(Debug, Clone)]
pub struct PostgresCredentialRepository {
    pool: PgPool,
}

impl PostgresCredentialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    username:      String,
    password_hash: String,
    created_at:    DateTime<Utc>,
}

impl TryFrom<CredentialRow> for Credential {
    type Error = InfraError;

    fn try_from(row: CredentialRow) -> Result<Self, Self::Error> {
        let username = Username::new(row.username)
            .map_err(|e| InfraError::unexpected(format!("不正なユーザー名が保存されています: {e}")))?;
        Ok(Self {
            username,
            password_hash: PasswordHash::new(row.password_hash),
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl CredentialRepository for PostgresCredentialRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(username = %username))]
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Credential>, InfraError> {
        let row: Option<CredentialRow> = sqlx::query_as(
            r#"
            SELECT username, password_hash, created_at
            FROM credentials
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Credential::try_from).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(username = %username))]
    async fn insert(
        &self,
        username: &Username,
        password_hash: &PasswordHash,
    ) -> Result<InsertOutcome, InfraError> {
        let result = sqlx::query(
            r#"
            INSERT INTO credentials (username, password_hash)
            VALUES ($1, $2)
            ON CONFLICT (username) DO NOTHING
            "#,
        )
        .bind(username.as_str())
        .bind(password_hash.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            Ok(InsertOutcome::AlreadyExists)
        } else {
            Ok(InsertOutcome::Created)
        }
    }
}
