//! # ヘルスチェックハンドラ
//!
//! - `/health`: Liveness Check（常に `"healthy"` を返す）
//! - `/health/ready`: Readiness Check（Redis / PostgreSQL の接続状態を確認）
//!
//! レスポンス型は [`passhield_shared::HealthResponse`] / [`passhield_shared::ReadinessResponse`] を参照。

use std::{collections::HashMap, future::Future, sync::Arc, time::Duration};

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use passhield_infra::{InfraError, db};
use passhield_shared::{CheckStatus, HealthResponse, ReadinessResponse, ReadinessStatus};
use redis::aio::ConnectionManager;
use sqlx::PgPool;

/// 依存サービスごとのチェックのタイムアウト
const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Liveness Check
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status:  "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness Check 用の State
pub struct ReadinessState {
    pub redis_conn: ConnectionManager,
    pub db_pool:    PgPool,
}

/// Readiness Check
///
/// Redis と PostgreSQL の接続状態を並行チェックする。
/// 全チェック OK → 200、1 つでも失敗 → 503。
#[tracing::instrument(skip_all)]
pub async fn readiness_check(State(state): State<Arc<ReadinessState>>) -> impl IntoResponse {
    let (redis_result, database_result) = tokio::join!(
        check("redis", ping_redis(state.redis_conn.clone())),
        check("database", db::ping(&state.db_pool)),
    );

    let checks = HashMap::from([
        ("redis".to_string(), redis_result),
        ("database".to_string(), database_result),
    ]);
    let response = ReadinessResponse::from_checks(checks);

    let http_status = match response.status {
        ReadinessStatus::Ready => StatusCode::OK,
        ReadinessStatus::NotReady => StatusCode::SERVICE_UNAVAILABLE,
    };

    (http_status, Json(response))
}

async fn ping_redis(mut conn: ConnectionManager) -> Result<(), InfraError> {
    redis::cmd("PING").query_async::<String>(&mut conn).await?;
    Ok(())
}

/// チェックをタイムアウト付きで実行し、結果を [`CheckStatus`] に変換する
async fn check(
    name: &'static str,
    probe: impl Future<Output = Result<(), InfraError>>,
) -> CheckStatus {
    match tokio::time::timeout(CHECK_TIMEOUT, probe).await {
        Ok(Ok(())) => CheckStatus::Ok,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "readiness check: {name} failed");
            CheckStatus::Error
        }
        Err(_) => {
            tracing::warn!("readiness check: {name} check timed out");
            CheckStatus::Error
        }
    }
}
