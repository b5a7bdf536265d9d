//! 工具函数模块
//!
//! 提供各类通用工具函数，包括：
//! - 时长字符串解析
//! - 配置验证
//! - 文件系统操作

pub mod duration;
pub mod file_system;
pub mod validation;

// 重新导出常用函数
pub use duration::{format_duration, parse_duration};
pub use file_system::*;
pub use validation::*;
