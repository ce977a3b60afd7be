//! # PassShield Web サーバー
//!
//! ユーザー登録・ログイン・ログアウトを提供する Web サーバー。
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │   Browser    │────▶│     Web      │────▶│  PostgreSQL  │
//! │   (HTML)     │     │              │     │ (credentials)│
//! └──────────────┘     └──────────────┘     └──────────────┘
//!                             │
//!                             ▼
//!                      ┌──────────────┐
//!                      │    Redis     │
//!                      │ (session,    │
//!                      │  attempts)   │
//!                      └──────────────┘
//! ```
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `WEB_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `WEB_PORT` | **Yes** | ポート番号 |
//! | `REDIS_URL` | **Yes** | Redis 接続 URL |
//! | `DATABASE_URL` | **Yes** | PostgreSQL 接続 URL |
//! | `PASSWORD_SECRET` | **Yes** | パスワードハッシュの秘密鍵（32 バイト以上） |
//! | `LOGIN_MAX_ATTEMPTS` | No | ウィンドウ内のログイン試行上限（デフォルト: `3`） |
//! | `LOGIN_ATTEMPT_WINDOW_SECS` | No | 試行回数のウィンドウ秒数（デフォルト: `86400`） |
//! | `ENV` | No | `production` で Cookie に Secure 属性を付ける |
//! | `LOG_FORMAT` | No | `json` または `pretty`（デフォルト: `pretty`） |
//! | `RUST_LOG` | No | ログフィルタ |
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（.env ファイルを使用）
//! cargo run -p passhield-web
//! ```

mod app_builder;
mod config;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use config::WebConfig;
use passhield_infra::{
    KeyedArgon2PasswordHasher,
    RedisLoginAttemptLimiter,
    RedisSessionManager,
    db,
    redis::create_connection_manager,
    repository::{PostgresCredentialRepository, PostgresTokenRepository},
};
use passhield_shared::observability::{TracingConfig, init_tracing};
use passhield_web::{
    handler::{AuthState, ReadinessState},
    view,
};
use tokio::net::TcpListener;

/// Web サーバーのエントリーポイント
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. トレーシングの初期化
/// 3. 設定とテンプレートの検証
/// 4. Redis / PostgreSQL への接続とマイグレーション
/// 5. ルーターの構築と HTTP サーバーの起動
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 本番環境では .env ファイルは使用せず、環境変数を直接設定する
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env("web");
    init_tracing(&tracing_config);
    let _tracing_guard = tracing::info_span!("app", service = "web").entered();

    let config = WebConfig::from_env().context("設定の読み込みに失敗しました")?;
    view::verify_templates().context("テンプレートの読み込みに失敗しました")?;

    tracing::info!("Web サーバーを起動します: {}:{}", config.host, config.port);

    let redis_conn = create_connection_manager(&config.redis_url)
        .await
        .context("Redis への接続に失敗しました")?;
    let db_pool = db::create_pool(&config.database_url)
        .await
        .context("PostgreSQL への接続に失敗しました")?;
    db::run_migrations(&db_pool)
        .await
        .context("マイグレーションに失敗しました")?;

    let password_hasher = KeyedArgon2PasswordHasher::new(config.password_secret.as_bytes())
        .context("パスワードハッシャーの初期化に失敗しました")?;

    let auth_state = Arc::new(AuthState {
        session_manager:       Arc::new(RedisSessionManager::with_connection(redis_conn.clone())),
        login_attempt_limiter: Arc::new(RedisLoginAttemptLimiter::new(
            redis_conn.clone(),
            config.login_attempt_policy,
        )),
        credential_repository: Arc::new(PostgresCredentialRepository::new(db_pool.clone())),
        token_repository:      Arc::new(PostgresTokenRepository::new(db_pool.clone())),
        password_hasher:       Arc::new(password_hasher),
        secure_cookie:         config.secure_cookie,
    });
    let readiness_state = Arc::new(ReadinessState {
        redis_conn,
        db_pool,
    });

    let app = app_builder::build_app(auth_state, readiness_state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("アドレスのパースに失敗しました")?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Web サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
