/// 服务器配置 - 接单节点的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/comanda | 工作目录 (数据库、logo) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | SHOP_NAME | Comanda | 小票抬头店名 |
/// | PRINTERS | 192.168.1.100:9100 | 打印机地址列表 (逗号分隔) |
/// | DAY_OFFSET_HOURS | 8 | 营业日切换偏移 (小时) |
/// | SETTLE_DELAY_MS | 3000 | 两联打印之间的间隔 (毫秒) |
/// | PRINT_TIMEOUT_MS | 10000 | 单台打印超时 (毫秒) |
/// | LOG_DIR | (无) | 日志目录，未设置则只输出到终端 |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/comanda PRINTERS=10.0.0.5:9100,10.0.0.6:9100 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库和 logo 文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 小票抬头店名
    pub shop_name: String,
    /// 打印机地址列表 (host:port)
    pub printers: Vec<String>,
    /// 营业日切换偏移：凌晨订单算前一天
    pub day_offset_hours: i64,
    /// 厨房联和客户联之间的间隔 (毫秒)
    pub settle_delay_ms: u64,
    /// 单台打印机的打印超时 (毫秒)
    pub print_timeout_ms: u64,
    /// 日志目录 (可选)
    pub log_dir: Option<String>,
    /// 运行环境: development | staging | production
    pub environment: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/comanda".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            shop_name: std::env::var("SHOP_NAME").unwrap_or_else(|_| "Comanda".into()),
            printers: std::env::var("PRINTERS")
                .unwrap_or_else(|_| "192.168.1.100:9100".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            day_offset_hours: std::env::var("DAY_OFFSET_HOURS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8),
            settle_delay_ms: std::env::var("SETTLE_DELAY_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            print_timeout_ms: std::env::var("PRINT_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10000),
            log_dir: std::env::var("LOG_DIR").ok(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
