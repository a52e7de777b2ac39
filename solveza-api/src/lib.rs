//! Solveza API 服务
//!
//! 用户、角色与权限管理，请求方/付款方账户以及交易记录（入金、付款、余额）

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interface;
pub mod service;

pub use service::ApplicationBootstrap;
