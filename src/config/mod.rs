//! Solveza Core 配置模块
//!
//! 该模块提供了应用程序配置管理功能，包括：
//! - 配置文件（单文件或目录）加载和解析
//! - 环境特定配置覆盖
//! - 日志、数据库与各服务配置定义

use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use toml::Value;
use tracing::warn;

mod manager;
pub use manager::ConfigManager;

/// 全局应用配置实例，使用 OnceLock 确保只初始化一次
static APP_CONFIG: OnceLock<SolvezaAppConfig> = OnceLock::new();

const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0";
const DEFAULT_SERVER_PORT: u16 = 8080;

/// 服务基本信息
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceInfoConfig {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
}

impl Default for ServiceInfoConfig {
    fn default() -> Self {
        Self {
            name: "solveza".to_string(),
            version: default_version(),
        }
    }
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// 监听地址配置
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ServerConfig {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub port: u16,
}

/// 核心配置（服务信息 + 监听地址）
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CoreConfig {
    #[serde(default)]
    pub service: ServiceInfoConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别（EnvFilter 语法，如 `info` 或 `solveza_api=debug,info`）
    pub level: String,
    /// 是否输出 JSON 格式
    pub json: bool,
    pub with_target: bool,
    pub with_thread_ids: bool,
    pub with_file: bool,
    pub with_line_number: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            with_target: true,
            with_thread_ids: false,
            with_file: false,
            with_line_number: false,
        }
    }
}

/// PostgreSQL 数据库实例配置
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PostgresInstanceConfig {
    /// 数据库连接 URL
    pub url: String,
    /// 最大连接数
    #[serde(default)]
    pub max_connections: Option<u32>,
    /// 最小连接数
    #[serde(default)]
    pub min_connections: Option<u32>,
    /// 获取连接超时（秒）
    #[serde(default)]
    pub acquire_timeout_seconds: Option<u64>,
}

/// 服务端点配置
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ServiceEndpointConfig {
    /// 服务地址
    pub address: Option<String>,
    /// 服务端口
    pub port: Option<u16>,
}

/// 服务运行时配置
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ServiceRuntimeConfig {
    /// 服务名称
    #[serde(default)]
    pub service_name: Option<String>,
    /// 服务器配置
    #[serde(default)]
    pub server: Option<ServiceEndpointConfig>,
}

/// API 服务配置
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ApiServiceConfig {
    /// 运行时配置
    #[serde(flatten)]
    pub runtime: ServiceRuntimeConfig,
    /// 使用的 PostgreSQL 配置名称
    #[serde(default)]
    pub postgres: Option<String>,
    /// 启动时是否执行数据库迁移
    #[serde(default)]
    pub run_migrations: Option<bool>,
    /// 是否启用宽松 CORS
    #[serde(default)]
    pub cors_permissive: Option<bool>,
}

/// 服务配置集合
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ServicesConfig {
    /// API 服务配置
    #[serde(default)]
    pub api: Option<ApiServiceConfig>,
}

/// Solveza 应用配置主结构体
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SolvezaAppConfig {
    /// 核心配置
    #[serde(flatten)]
    pub core: CoreConfig,
    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
    /// PostgreSQL 配置映射
    #[serde(default)]
    pub postgres: HashMap<String, PostgresInstanceConfig>,
    /// 服务配置
    #[serde(default)]
    pub services: ServicesConfig,
}

impl SolvezaAppConfig {
    /// 获取核心配置
    pub fn base(&self) -> &CoreConfig {
        &self.core
    }

    /// 获取 PostgreSQL 配置
    pub fn postgres_profile(&self, name: &str) -> Option<&PostgresInstanceConfig> {
        self.postgres.get(name)
    }

    /// 获取 API 服务配置
    pub fn api_service(&self) -> ApiServiceConfig {
        self.services.api.clone().unwrap_or_default()
    }

    /// 组合服务配置
    pub fn compose_service_config(
        &self,
        runtime: &ServiceRuntimeConfig,
        fallback_name: &str,
    ) -> CoreConfig {
        let mut cfg = self.core.clone();
        cfg.service.name = runtime
            .service_name
            .as_ref()
            .cloned()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| fallback_name.to_string());

        if let Some(server) = runtime.server.as_ref() {
            if let Some(address) = server.address.as_ref() {
                cfg.server.address = address.clone();
            }
            if let Some(port) = server.port {
                cfg.server.port = port;
            }
        }

        cfg
    }

    /// 校验配置中的引用（服务引用的 PostgreSQL 配置必须存在）
    pub fn validate_references(&self) -> Result<()> {
        if let Some(name) = self.api_service().postgres {
            if self.postgres_profile(&name).is_none() {
                return Err(anyhow!(
                    "services.api references unknown postgres profile '{name}'"
                ));
            }
        }
        Ok(())
    }

    /// 确保配置有默认值
    fn ensure_defaults(&mut self) {
        if self.core.server.address.is_empty() {
            self.core.server.address = DEFAULT_SERVER_ADDRESS.to_string();
        }
        if self.core.server.port == 0 {
            self.core.server.port = DEFAULT_SERVER_PORT;
        }
    }
}

/// 加载配置
pub fn load_config(path: Option<&str>) -> &'static SolvezaAppConfig {
    let candidates: Vec<PathBuf> = match path {
        Some(p) => vec![PathBuf::from(p)],
        None => vec![PathBuf::from("config"), PathBuf::from("config.toml")],
    };

    APP_CONFIG.get_or_init(|| {
        let mut cfg = load_with_fallback(&candidates);
        if let Err(e) = ConfigManager::load_environment_config(&mut cfg) {
            warn!("failed to load environment config: {}", e);
        }
        cfg
    })
}

/// 获取已加载的应用配置
pub fn app_config() -> Option<&'static SolvezaAppConfig> {
    APP_CONFIG.get()
}

/// 使用备选方案加载配置
fn load_with_fallback(candidates: &[PathBuf]) -> SolvezaAppConfig {
    for path in candidates {
        match load_config_from_source(path) {
            Ok(cfg) => return cfg,
            Err(err) => {
                warn!("failed to load config from {}: {err:#}", path.display());
            }
        }
    }

    warn!("no configuration source succeeded, falling back to defaults");
    default_config()
}

/// 从源加载配置（文件或目录）
pub fn load_config_from_source(path: &Path) -> Result<SolvezaAppConfig> {
    if !path.exists() {
        return Err(anyhow!(
            "configuration path {} does not exist",
            path.display()
        ));
    }

    let metadata = path
        .metadata()
        .with_context(|| format!("unable to read metadata for {}", path.display()))?;

    let mut cfg = if metadata.is_dir() {
        load_config_from_directory(path)?
    } else {
        load_config_from_file(path)?
    };
    cfg.ensure_defaults();
    Ok(cfg)
}

fn load_config_from_file(path: &Path) -> Result<SolvezaAppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("unable to read config file: {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("invalid config format: {}", path.display()))
}

fn load_config_from_directory(path: &Path) -> Result<SolvezaAppConfig> {
    let base_file = path.join("base.toml");
    if !base_file.exists() {
        return Err(anyhow!(
            "missing base configuration: {}",
            base_file.display()
        ));
    }

    let mut merged = load_toml_value(&base_file)?;

    if !merged.is_table() {
        return Err(anyhow!(
            "base configuration must be a table: {}",
            base_file.display()
        ));
    }

    merge_directory(&mut merged, &path.join("shared"))?;
    merge_directory(&mut merged, &path.join("services"))?;
    merge_directory(&mut merged, &path.join("overrides"))?;

    merged
        .try_into()
        .with_context(|| format!("invalid configuration after merging {}", path.display()))
}

/// 按文件名顺序合并目录中的 TOML 片段
fn merge_directory(root: &mut Value, dir: &Path) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }

    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("unable to read config directory {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(OsStr::to_str)
                .map(|ext| ext.eq_ignore_ascii_case("toml"))
                .unwrap_or(false)
        })
        .collect::<Vec<_>>();

    entries.sort_by_key(|entry| entry.path());

    for entry in entries {
        let value = load_toml_value(&entry.path())?;
        merge_value(root, value);
    }

    Ok(())
}

pub(crate) fn load_toml_value(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("unable to read config fragment {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("invalid TOML content in fragment {}", path.display()))
}

/// 合并值：表递归合并，其余类型直接覆盖
pub(crate) fn merge_value(base: &mut Value, overlay: Value) {
    match overlay {
        Value::Table(overlay_table) => {
            if let Value::Table(base_table) = base {
                for (key, overlay_value) in overlay_table.into_iter() {
                    match base_table.get_mut(&key) {
                        Some(base_value) => merge_value(base_value, overlay_value),
                        None => {
                            base_table.insert(key, overlay_value);
                        }
                    }
                }
            } else {
                *base = Value::Table(overlay_table);
            }
        }
        other => {
            *base = other;
        }
    }
}

/// 默认配置
fn default_config() -> SolvezaAppConfig {
    let mut cfg = SolvezaAppConfig::default();
    cfg.ensure_defaults();
    cfg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_load_single_file_applies_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("config.toml");
        write(
            &file,
            r#"
[service]
name = "solveza"

[postgres.main]
url = "postgres://localhost/solveza"
max_connections = 4
"#,
        );

        let cfg = load_config_from_source(&file).unwrap();
        assert_eq!(cfg.core.server.address, "0.0.0.0");
        assert_eq!(cfg.core.server.port, 8080);
        assert_eq!(cfg.logging.level, "info");
        let pg = cfg.postgres_profile("main").unwrap();
        assert_eq!(pg.max_connections, Some(4));
        assert!(cfg.services.api.is_none());
    }

    #[test]
    fn test_directory_fragments_merge_in_order() {
        let dir = tempfile::tempdir().unwrap();
        write(
            &dir.path().join("base.toml"),
            r#"
[service]
name = "solveza"

[server]
address = "127.0.0.1"
port = 9000

[logging]
level = "debug"
"#,
        );
        write(
            &dir.path().join("services/api.toml"),
            r#"
[services.api]
service_name = "solveza-api"
postgres = "main"
run_migrations = false

[services.api.server]
port = 9100
"#,
        );
        write(
            &dir.path().join("overrides/10-logging.toml"),
            r#"
[logging]
json = true
"#,
        );

        let cfg = load_config_from_source(dir.path()).unwrap();
        assert_eq!(cfg.logging.level, "debug");
        assert!(cfg.logging.json);

        let api = cfg.api_service();
        assert_eq!(api.postgres.as_deref(), Some("main"));
        assert_eq!(api.run_migrations, Some(false));

        let composed = cfg.compose_service_config(&api.runtime, "fallback");
        assert_eq!(composed.service.name, "solveza-api");
        assert_eq!(composed.server.address, "127.0.0.1");
        assert_eq!(composed.server.port, 9100);

        assert!(cfg.validate_references().is_err());
    }

    #[test]
    fn test_directory_without_base_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config_from_source(dir.path()).unwrap_err();
        assert!(err.to_string().contains("missing base configuration"));
    }

    #[test]
    fn test_merge_value_overwrites_scalars_and_keeps_siblings() {
        let mut base: Value = toml::from_str("[a]\nx = 1\ny = 2").unwrap();
        let overlay: Value = toml::from_str("[a]\ny = 3\nz = 4").unwrap();
        merge_value(&mut base, overlay);

        let table = base.get("a").unwrap();
        assert_eq!(table.get("x").and_then(Value::as_integer), Some(1));
        assert_eq!(table.get("y").and_then(Value::as_integer), Some(3));
        assert_eq!(table.get("z").and_then(Value::as_integer), Some(4));
    }
}
