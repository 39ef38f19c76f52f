//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] - 应用错误类型
//! - [`AppResponse`] - API 响应结构
//! - 日志等工具

pub mod error;
pub mod logger;
pub mod time;

pub use error::{AppError, AppResponse, AppResult};
pub use logger::{init_logger, init_logger_with_file};
pub use time::now_millis;
