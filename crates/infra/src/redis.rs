//! # Redis 接続管理
//!
//! `ConnectionManager` は内部で再接続を行い、clone しても同じ接続を共有する。
//! アプリケーション起動時に一度だけ作成し、セッション管理・試行回数制限・
//! ヘルスチェックで使い回す。

use redis::aio::ConnectionManager;

use crate::InfraError;

/// Redis 接続マネージャを作成する
///
/// # 引数
///
/// - `redis_url`: Redis 接続 URL（例: `redis://localhost:6379`）
pub async fn create_connection_manager(redis_url: &str) -> Result<ConnectionManager, InfraError> {
    let client = redis::Client::open(redis_url)?;
    let conn = ConnectionManager::new(client).await?;
    Ok(conn)
}
