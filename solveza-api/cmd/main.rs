use anyhow::Result;
use solveza_api::ApplicationBootstrap;
use solveza_core::ServiceHelper;
use solveza_core::tracing::{init_tracing_from_config, with_bootstrap_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置（目录合并 + 环境覆盖），加载期间的告警由临时 subscriber 输出
    let app_config = with_bootstrap_tracing(|| ServiceHelper::load_config(Some("config"), false))?;

    init_tracing_from_config(Some(&app_config.logging));

    // 创建应用上下文并启动服务器
    ApplicationBootstrap::run(app_config).await
}
