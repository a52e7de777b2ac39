//! 应用启动器 - 负责依赖注入和服务启动

use std::net::SocketAddr;

use anyhow::{Context, Result};
use solveza_core::ServiceHelper;
use solveza_core::config::SolvezaAppConfig;
use tokio::net::TcpListener;
use tracing::{error, info};

use super::wire::{self, ApplicationContext};

const SERVICE_NAME: &str = "solveza-api";

/// 应用启动器
pub struct ApplicationBootstrap;

impl ApplicationBootstrap {
    /// 运行应用的主入口点
    pub async fn run(config: &'static SolvezaAppConfig) -> Result<()> {
        let service_cfg = config.api_service();
        let addr = ServiceHelper::parse_server_addr(config, &service_cfg.runtime, SERVICE_NAME)?;

        let context = wire::initialize(config)
            .await
            .context("Failed to initialize application context")?;

        Self::start_server(context, addr).await
    }

    /// 启动 HTTP 服务器，收到 Ctrl-C 后停机
    pub async fn start_server(context: ApplicationContext, addr: SocketAddr) -> Result<()> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        info!(%addr, "starting solveza api");

        let server_future = axum::serve(listener, context.router.clone()).into_future();

        let result = tokio::select! {
            res = server_future => {
                match res {
                    Ok(()) => Ok(()),
                    Err(err) => {
                        error!(error = %err, "solveza api failed");
                        Err(err.into())
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                Ok(())
            }
        };

        Self::graceful_shutdown(context).await;

        info!("solveza api stopped");
        result
    }

    /// 优雅停机处理
    async fn graceful_shutdown(context: ApplicationContext) {
        if let Some(pool) = context.pool {
            info!("closing database connection pool...");
            pool.close().await;
        }
    }
}
