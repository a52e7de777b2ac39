//! 配置管理器 - 负责处理不同环境下的配置覆盖
//!
//! 根据 `SOLVEZA_ENV` 选择 `config/environments/{env}.toml`，
//! 将其中的 server、logging、postgres 与 services 段覆盖到基础配置上。

use std::collections::HashMap;
use std::env;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::{
    ApiServiceConfig, LoggingConfig, PostgresInstanceConfig, ServiceEndpointConfig,
    SolvezaAppConfig, load_toml_value,
};

const ENVIRONMENT_DIR: &str = "config/environments";

/// 环境配置片段，只包含允许按环境覆盖的部分
#[derive(Debug, Default, Deserialize)]
struct EnvironmentOverlay {
    #[serde(default)]
    server: Option<ServiceEndpointConfig>,
    #[serde(default)]
    logging: Option<LoggingConfig>,
    #[serde(default)]
    postgres: HashMap<String, PostgresInstanceConfig>,
    #[serde(default)]
    services: Option<EnvironmentServices>,
}

#[derive(Debug, Default, Deserialize)]
struct EnvironmentServices {
    #[serde(default)]
    api: Option<ApiServiceConfig>,
}

/// 配置管理器
pub struct ConfigManager;

impl ConfigManager {
    /// 获取当前环境名称
    ///
    /// 从环境变量 SOLVEZA_ENV 获取，未设置时默认为 "development"
    pub fn get_environment() -> String {
        env::var("SOLVEZA_ENV").unwrap_or_else(|_| "development".to_string())
    }

    /// 根据环境加载特定配置
    pub fn load_environment_config(base_config: &mut SolvezaAppConfig) -> Result<()> {
        let env = Self::get_environment();
        Self::load_environment_config_from(base_config, Path::new(ENVIRONMENT_DIR), &env)
    }

    /// 从指定目录加载 `{env}.toml` 并覆盖到基础配置，文件不存在时不做任何修改
    pub fn load_environment_config_from(
        base_config: &mut SolvezaAppConfig,
        dir: &Path,
        env: &str,
    ) -> Result<()> {
        let env_config_path = dir.join(format!("{env}.toml"));
        if !env_config_path.exists() {
            return Ok(());
        }

        let overlay: EnvironmentOverlay = load_toml_value(&env_config_path)?
            .try_into()
            .with_context(|| {
                format!(
                    "invalid environment config format: {}",
                    env_config_path.display()
                )
            })?;

        Self::apply_overlay(base_config, overlay);
        Ok(())
    }

    fn apply_overlay(base_config: &mut SolvezaAppConfig, overlay: EnvironmentOverlay) {
        if let Some(server) = overlay.server {
            if let Some(address) = server.address {
                base_config.core.server.address = address;
            }
            if let Some(port) = server.port {
                base_config.core.server.port = port;
            }
        }

        if let Some(logging) = overlay.logging {
            base_config.logging = logging;
        }

        base_config.postgres.extend(overlay.postgres);

        if let Some(api) = overlay.services.and_then(|services| services.api) {
            base_config.services.api = Some(api);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_overlay_replaces_profiles() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("production.toml"),
            r#"
[server]
port = 80

[postgres.main]
url = "postgres://db.internal/solveza"
max_connections = 32
"#,
        )
        .unwrap();

        let mut cfg = SolvezaAppConfig::default();
        cfg.core.server.port = 8080;
        ConfigManager::load_environment_config_from(&mut cfg, dir.path(), "production").unwrap();

        assert_eq!(cfg.core.server.port, 80);
        let pg = cfg.postgres_profile("main").unwrap();
        assert_eq!(pg.url, "postgres://db.internal/solveza");
        assert_eq!(pg.max_connections, Some(32));
    }

    #[test]
    fn test_missing_environment_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = SolvezaAppConfig::default();
        ConfigManager::load_environment_config_from(&mut cfg, dir.path(), "staging").unwrap();
        assert!(cfg.postgres.is_empty());
    }
}
