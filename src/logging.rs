//! ログ初期化
//!
//! `RUST_LOG` でレベルを指定できる。未指定なら info（--verbose で debug）。
//! 端末ボードは標準出力を占有するため、ログは標準エラーに出す。

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_filter(verbose: bool) -> EnvFilter {
    let default_level = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// 人が読む形式
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .try_init();
}

/// JSON形式（ログ収集向け）
pub fn init_json(verbose: bool) {
    let _ = tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
        .try_init();
}
