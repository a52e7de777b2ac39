//! HTTP 处理函数，按资源划分

pub mod account;
pub mod permission;
pub mod role;
pub mod transaction;
pub mod user;
