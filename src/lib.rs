//! Solveza Core 公共库
//!
//! 提供统一的配置加载、日志初始化与错误码定义

pub mod config;
pub mod error;
pub mod tracing;
pub mod utils;

pub use config::{
    ApiServiceConfig, ConfigManager, CoreConfig, LoggingConfig, PostgresInstanceConfig,
    ServiceEndpointConfig, ServiceRuntimeConfig, SolvezaAppConfig, app_config, load_config,
};
pub use error::ErrorCode;
pub use utils::*;
