//! Comanda Server - 快餐店接单与小票打印节点
//!
//! # 架构概述
//!
//! 本模块是接单节点的主入口，提供以下核心功能：
//!
//! - **订单流水线** (`orders`): 编号、客户解析、打印、落库
//! - **小票打印** (`printing`): 版式、栅格化、多机分发
//! - **数据库** (`db`): 嵌入式 redb 存储
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! comanda-server/src/
//! ├── core/          # 配置、服务器状态
//! ├── api/           # HTTP 路由和处理器
//! ├── orders/        # 订单编号、客户解析、流水线
//! ├── printing/      # 小票版式与打印分发
//! ├── db/            # 数据库层
//! ├── service.rs     # 应用服务门面
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod orders;
pub mod printing;
pub mod service;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use service::OrderService;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load .env and initialize logging
pub fn setup_environment() {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());
}

pub fn print_banner() {
    println!(
        r#"
   ______                                 __
  / ____/___  ____ ___  ____ _____  ____/ /___ _
 / /   / __ \/ __ `__ \/ __ `/ __ \/ __  / __ `/
/ /___/ /_/ / / / / / / /_/ / / / / /_/ / /_/ /
\____/\____/_/ /_/ /_/\__,_/_/ /_/\__,_/\__,_/
    "#
    );
}
