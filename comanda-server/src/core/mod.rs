//! 核心模块 - 配置与服务器

pub mod config;
pub mod server;

pub use config::Config;
pub use server::{Server, ServerState};
