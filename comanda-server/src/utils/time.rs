//! 时间工具函数
//!
//! 存储层只接收 `i64` Unix millis，转换统一在这里完成。

/// 当前时间的 Unix millis
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
