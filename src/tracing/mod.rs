//! # 日志初始化模块
//!
//! 为各个服务提供统一的 `tracing` 日志初始化。

use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;

/// 从配置初始化日志系统
///
/// 环境变量 `RUST_LOG` 优先于配置中的日志级别。
///
/// # 示例
/// ```rust,ignore
/// use solveza_core::config::LoggingConfig;
///
/// // 使用默认配置（info 级别）
/// init_tracing_from_config(None);
///
/// let config = LoggingConfig {
///     level: "solveza_api=debug,info".to_string(),
///     json: true,
///     ..LoggingConfig::default()
/// };
/// init_tracing_from_config(Some(&config));
/// ```
pub fn init_tracing_from_config(logging_config: Option<&LoggingConfig>) {
    let default_config = LoggingConfig::default();
    let config = logging_config.unwrap_or(&default_config);

    let env_filter = build_env_filter(config);

    let builder = fmt::Subscriber::builder()
        .with_target(config.with_target)
        .with_thread_ids(config.with_thread_ids)
        .with_file(config.with_file)
        .with_line_number(config.with_line_number)
        .with_env_filter(env_filter);

    // 重复初始化（例如测试中）时保留已有的 subscriber
    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if let Err(err) = result {
        tracing::debug!(error = %err, "tracing subscriber already initialized");
    }
}

/// 在正式日志初始化之前运行 `f`，期间使用临时的 info 级别 subscriber
///
/// 配置加载阶段的告警（例如回退到默认配置）依赖它输出。
pub fn with_bootstrap_tracing<T>(f: impl FnOnce() -> T) -> T {
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(build_env_filter(&LoggingConfig::default()))
        .finish();
    tracing::subscriber::with_default(subscriber, f)
}

fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level).unwrap_or_else(|err| {
            eprintln!(
                "invalid log level '{}': {err}, falling back to info",
                config.level
            );
            EnvFilter::new("info")
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn test_bootstrap_tracing_enables_warnings_inside_closure() {
        let enabled = with_bootstrap_tracing(|| {
            tracing::warn!("emitted while loading config");
            tracing::level_enabled!(Level::WARN)
        });
        assert!(enabled);
        assert_eq!(with_bootstrap_tracing(|| 42), 42);
    }
}
