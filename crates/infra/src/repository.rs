//! # リポジトリ実装
//!
//! 認証情報とアクセストークンの永続化（PostgreSQL）。
//! いずれもトレイト経由で利用し、web 層のテストではスタブに差し替える。

pub mod credential_repository;
pub mod token_repository;

pub use credential_repository::{
    Credential,
    CredentialRepository,
    InsertOutcome,
    PostgresCredentialRepository,
};
pub use token_repository::{PostgresTokenRepository, TokenRepository};
