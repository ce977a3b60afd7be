//! # ログイン試行回数の制限
//!
//! [`LoginAttemptPolicy`] に従い、アカウントごとの試行回数を Redis で数える。
//!
//! ## Redis キー設計
//!
//! | キー | 値 | TTL |
//! |-----|-----|-----|
//! | `login_attempts:{username}` | 試行回数（整数） | ポリシーのウィンドウ（既定 24 時間） |
//!
//! `INCR` と `EXPIRE` は Lua スクリプトで原子的に実行する。
//! TTL はキーに TTL が無い時だけ設定し、以降の試行では延長しない。
//! ウィンドウは最初の試行から数える。

use std::sync::LazyLock;

use async_trait::async_trait;
use passhield_domain::{
    account::Username,
    login_attempt::{AttemptStatus, LoginAttemptPolicy},
};
use redis::{AsyncCommands, Script, aio::ConnectionManager};

use crate::InfraError;

/// 試行回数を 1 増やし、TTL が無ければウィンドウを設定して新しい回数を返す
///
/// TTL の有無で判定するため、途中で TTL が失われたカウンタにも次の試行で
/// ウィンドウが付く。
static CONSUME_SCRIPT: LazyLock<Script> = LazyLock::new(|| {
    Script::new(
        r"
        local count = redis.call('INCR', KEYS[1])
        if redis.call('TTL', KEYS[1]) < 0 then
            redis.call('EXPIRE', KEYS[1], ARGV[1])
        end
        return count
        ",
    )
});

/// ログイン試行回数を管理するトレイト
#[async_trait]
pub trait LoginAttemptLimiter: Send + Sync {
    /// 試行を 1 回消費し、許可するかどうかを返す
    ///
    /// ロック中でも消費は記録される（カウンタは増え続けるが結果は変わらない）。
    async fn consume(&self, username: &Username) -> Result<AttemptStatus, InfraError>;

    /// 試行回数をリセットする（ログイン成功時）
    async fn reset(&self, username: &Username) -> Result<(), InfraError>;
}

/// Redis を使用したログイン試行回数の制限
pub struct RedisLoginAttemptLimiter {
    conn:   ConnectionManager,
    policy: LoginAttemptPolicy,
}

impl RedisLoginAttemptLimiter {
    pub fn new(conn: ConnectionManager, policy: LoginAttemptPolicy) -> Self {
        Self { conn, policy }
    }

    fn attempts_key(username: &Username) -> String {
        format!("login_attempts:{username}")
    }
}

#[async_trait]
impl LoginAttemptLimiter for RedisLoginAttemptLimiter {
    #[tracing::instrument(skip_all, fields(username = %username))]
    async fn consume(&self, username: &Username) -> Result<AttemptStatus, InfraError> {
        let key = Self::attempts_key(username);
        let mut conn = self.conn.clone();

        let window = self.policy.window().as_secs();
        let count: u64 = CONSUME_SCRIPT
            .key(&key)
            .arg(window)
            .invoke_async(&mut conn)
            .await?;

        let status = self.policy.evaluate(count);
        tracing::debug!(count, locked = status.is_locked(), "ログイン試行を記録");
        Ok(status)
    }

    async fn reset(&self, username: &Username) -> Result<(), InfraError> {
        let key = Self::attempts_key(username);
        let mut conn = self.conn.clone();
        let _: () = conn.del(&key).await?;
        Ok(())
    }
}
