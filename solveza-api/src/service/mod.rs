//! 服务模块 - 包含依赖装配与服务启动

pub mod bootstrap;
pub mod wire;

pub use bootstrap::ApplicationBootstrap;
pub use wire::{ApplicationContext, Repositories};
