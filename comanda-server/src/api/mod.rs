//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`orders`] - 订单提交与查询接口
//! - [`clients`] - 客户管理接口

pub mod clients;
pub mod health;
pub mod orders;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Build the full application router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(orders::router())
        .merge(clients::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
