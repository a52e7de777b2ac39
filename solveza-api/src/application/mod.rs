//! 应用层：命令、查询与处理器

pub mod commands;
pub mod dto;
pub mod handlers;
pub mod queries;
