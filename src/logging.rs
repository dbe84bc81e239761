//! ログ出力 (`tracing`) の初期化。

use tracing_subscriber::{fmt, EnvFilter};

/// `tracing` のサブスクライバを初期化します。
///
/// 環境変数 `RUST_LOG` が設定されていればそちらを優先し、
/// 無ければ `level` (例: `"info"`, `"meme_editor=debug"`) を使います。
/// 既に初期化されている場合 (テストなど) は何もしません。
pub fn init_logging(level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}
