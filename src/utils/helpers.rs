//! 辅助工具函数模块
//!
//! 提供配置加载、服务初始化等常用辅助函数

use std::net::SocketAddr;

use anyhow::{Context, Result};

use crate::config::{ServiceRuntimeConfig, SolvezaAppConfig};

/// 服务启动辅助函数
pub struct ServiceHelper;

impl ServiceHelper {
    /// 加载配置并验证
    ///
    /// # 参数
    /// * `config_path` - 配置路径
    /// * `strict` - 是否严格验证配置引用
    pub fn load_config(
        config_path: Option<&str>,
        strict: bool,
    ) -> Result<&'static SolvezaAppConfig> {
        let config = crate::config::load_config(config_path);

        if strict {
            config
                .validate_references()
                .with_context(|| "configuration validation failed")?;
            return Ok(config);
        }

        // 非严格模式下，即使验证失败也继续运行，只记录警告日志
        if let Err(e) = config.validate_references() {
            tracing::warn!("configuration reference validation failed: {}", e);
        }

        Ok(config)
    }

    /// 从服务配置中解析服务器地址
    ///
    /// # 参数
    /// * `config` - 应用配置
    /// * `runtime` - 服务运行时配置
    /// * `fallback_name` - 服务名称（如果运行时配置未指定）
    pub fn parse_server_addr(
        config: &SolvezaAppConfig,
        runtime: &ServiceRuntimeConfig,
        fallback_name: &str,
    ) -> Result<SocketAddr> {
        let service_config = config.compose_service_config(runtime, fallback_name);
        let addr = format!(
            "{}:{}",
            service_config.server.address, service_config.server.port
        )
        .parse()
        .with_context(|| {
            format!(
                "invalid server address: {}:{}",
                service_config.server.address, service_config.server.port
            )
        })?;
        Ok(addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceEndpointConfig;

    #[test]
    fn test_parse_server_addr_prefers_runtime_override() {
        let mut config = SolvezaAppConfig::default();
        config.core.server.address = "0.0.0.0".to_string();
        config.core.server.port = 8080;

        let runtime = ServiceRuntimeConfig {
            service_name: None,
            server: Some(ServiceEndpointConfig {
                address: Some("127.0.0.1".to_string()),
                port: None,
            }),
        };

        let addr = ServiceHelper::parse_server_addr(&config, &runtime, "solveza-api").unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn test_parse_server_addr_rejects_hostname() {
        let mut config = SolvezaAppConfig::default();
        config.core.server.address = "not an address".to_string();
        config.core.server.port = 8080;

        let result =
            ServiceHelper::parse_server_addr(&config, &ServiceRuntimeConfig::default(), "api");
        assert!(result.is_err());
    }
}
