use std::env;

use anyhow::{Context, Result};
use solveza_core::config::SolvezaAppConfig;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_ACQUIRE_TIMEOUT_SECONDS: u64 = 5;

/// 数据库连接设置
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: Option<u32>,
    pub acquire_timeout_seconds: u64,
}

/// API 服务的有效配置（配置文件 + 环境变量覆盖）
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// 未配置时使用内存仓储
    pub database: Option<DatabaseSettings>,
    pub run_migrations: bool,
    pub cors_permissive: bool,
}

impl ApiConfig {
    /// 从应用配置加载，环境变量优先
    pub fn from_app_config(app: &SolvezaAppConfig) -> Result<Self> {
        let service_config = app.api_service();
        let profile = service_config
            .postgres
            .as_ref()
            .and_then(|name| app.postgres_profile(name));

        let url = env::var("SOLVEZA_POSTGRES_URL")
            .or_else(|_| env::var("DATABASE_URL"))
            .ok()
            .filter(|url| !url.is_empty())
            .or_else(|| profile.map(|p| p.url.clone()));

        let max_connections = match env::var("SOLVEZA_POSTGRES_MAX_CONNECTIONS") {
            Ok(value) => Some(
                value
                    .parse::<u32>()
                    .with_context(|| format!("invalid SOLVEZA_POSTGRES_MAX_CONNECTIONS: {value}"))?,
            ),
            Err(_) => None,
        }
        .or_else(|| profile.and_then(|p| p.max_connections))
        .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        let database = url.map(|url| DatabaseSettings {
            url,
            max_connections,
            min_connections: profile.and_then(|p| p.min_connections),
            acquire_timeout_seconds: profile
                .and_then(|p| p.acquire_timeout_seconds)
                .unwrap_or(DEFAULT_ACQUIRE_TIMEOUT_SECONDS),
        });

        let run_migrations = match env::var("SOLVEZA_RUN_MIGRATIONS") {
            Ok(value) => Some(parse_bool(&value).with_context(|| {
                format!("invalid SOLVEZA_RUN_MIGRATIONS: {value}")
            })?),
            Err(_) => None,
        }
        .or(service_config.run_migrations)
        .unwrap_or(true);

        Ok(Self {
            database,
            run_migrations,
            cors_permissive: service_config.cors_permissive.unwrap_or(true),
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
