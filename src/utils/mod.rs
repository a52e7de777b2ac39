//! 工具函数模块
//!
//! 提供服务启动辅助与字符串校验等通用工具函数

pub mod helpers;

pub use helpers::ServiceHelper;

/// 去除首尾空白，结果为空时返回 None
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank_trims() {
        assert_eq!(non_blank(Some("  GOOGLE ")), Some("GOOGLE"));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }
}
