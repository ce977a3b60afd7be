//! # Observability 基盤
//!
//! トレーシング初期化、ログ出力形式の切り替え、リクエスト単位のスパン生成を提供する。
//!
//! - `LOG_FORMAT=json|pretty` で出力形式を切り替える
//! - `RUST_LOG` でログレベルを制御する（未設定時は `info,passhield=debug`）
//! - すべてのリクエストに `X-Request-Id` を付与し、スパンフィールドとして記録する

/// Request ID を運ぶ HTTP ヘッダー名
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// ログ出力形式
///
/// 値が未設定または不正な場合は [`Pretty`](LogFormat::Pretty) にフォールバックする。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// JSON 形式（本番環境向け）
    Json,
    /// 人間が読みやすい形式（開発環境向け）
    #[default]
    Pretty,
}

impl LogFormat {
    /// 文字列からログ形式をパースする
    ///
    /// 不正な値の場合は stderr に警告を出して [`Pretty`](LogFormat::Pretty) を返す。
    /// この時点ではまだ subscriber が存在しないため tracing は使えない。
    pub fn parse(s: &str) -> Self {
        match s {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            other => {
                eprintln!("WARNING: unknown LOG_FORMAT={other:?}, falling back to pretty");
                Self::Pretty
            }
        }
    }

    /// 環境変数 `LOG_FORMAT` から読み取る
    pub fn from_env() -> Self {
        std::env::var("LOG_FORMAT")
            .map(|val| Self::parse(&val))
            .unwrap_or_default()
    }
}

/// トレーシング初期化設定
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// サービス名（起動時の `app` スパンに付与する）
    pub service_name: String,
    /// ログ出力形式
    pub log_format:   LogFormat,
}

impl TracingConfig {
    pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            service_name: service_name.into(),
            log_format,
        }
    }

    /// `LOG_FORMAT` 環境変数から設定を読み取る
    pub fn from_env(service_name: impl Into<String>) -> Self {
        Self::new(service_name, LogFormat::from_env())
    }
}

/// トレーシングを初期化する
///
/// JSON モードではイベントフィールドをトップレベルに展開し、
/// 現在のスパン（`request_id` 等）を含めて出力する。
#[cfg(feature = "observability")]
pub fn init_tracing(config: &TracingConfig) {
    use tracing_subscriber::{Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,passhield=debug".into());

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_target(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

/// HTTP リクエストごとのスパンを生成する（`TraceLayer::make_span_with` 用）
///
/// `SetRequestIdLayer` の内側で呼ばれる前提で、`x-request-id` ヘッダーの値を
/// `request_id` フィールドとして記録する。
#[cfg(feature = "observability")]
pub fn make_request_span<B>(request: &http::Request<B>) -> tracing::Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}

/// UUID v7 の Request ID を生成する `MakeRequestId` 実装
///
/// クライアントが `X-Request-Id` を送ってきた場合は `SetRequestIdLayer` が
/// その値を優先するため、ここは呼ばれない。
#[cfg(feature = "observability")]
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV7;

#[cfg(feature = "observability")]
impl tower_http::request_id::MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(
        &mut self,
        _request: &http::Request<B>,
    ) -> Option<tower_http::request_id::RequestId> {
        let id = uuid::Uuid::now_v7().to_string();
        http::HeaderValue::from_str(&id)
            .ok()
            .map(tower_http::request_id::RequestId::new)
    }
}


#[cfg(all(test, feature = "observability"))]
mod request_id_tests {
    use tower_http::request_id::MakeRequestId;

    use super::*;

    #[test]
    fn test_make_request_uuid_v7はuuid形式のidを生成する() {
        let mut maker = MakeRequestUuidV7;
        let request = http::Request::builder().uri("/").body(()).unwrap();

        let id = maker.make_request_id(&request).unwrap();
        let value = id.header_value().to_str().unwrap();

        let parsed = uuid::Uuid::parse_str(value).unwrap();
        assert_eq!(parsed.get_version_num(), 7);
    }

    #[test]
    fn test_make_request_spanはrequestという名前のスパンを返す() {
        let request = http::Request::builder()
            .uri("/login")
            .header(REQUEST_ID_HEADER, "req-123")
            .body(())
            .unwrap();

        let span = make_request_span(&request);

        // subscriber 未登録の場合はメタデータを持たない disabled スパンになる
        if let Some(metadata) = span.metadata() {
            assert_eq!(metadata.name(), "request");
        }
    }
}
