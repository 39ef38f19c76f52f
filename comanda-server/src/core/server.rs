//! Server Implementation
//!
//! HTTP 服务器启动和管理

use crate::core::Config;
use crate::db::Store;
use crate::orders::{ClientResolver, OrderPipeline, OrderSequencer};
use crate::printing::{PrintDispatcher, ReceiptRenderer};
use crate::service::OrderService;
use std::sync::Arc;
use std::time::Duration;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub service: Arc<OrderService>,
}

impl ServerState {
    /// Wire up storage, printers and the order pipeline
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.work_dir)?;

        let db_path = std::path::Path::new(&config.work_dir).join("comanda.redb");
        let store = Store::open(&db_path)?;
        tracing::info!(path = %db_path.display(), "Database opened");

        let sequencer = OrderSequencer::new(store.clone(), config.day_offset_hours);
        let resolver = ClientResolver::new(store.clone());
        let renderer = ReceiptRenderer::new(&config.shop_name);

        let print_timeout = Duration::from_millis(config.print_timeout_ms);
        let mut dispatcher = PrintDispatcher::detect(&config.printers, print_timeout).await?;

        // Logo printed above every receipt: logo.png from the work dir,
        // or a rendered shop-name banner when the file is missing
        let logo_path = std::path::Path::new(&config.work_dir).join("logo.png");
        let logo = match image::open(&logo_path) {
            Ok(img) => {
                tracing::info!(path = %logo_path.display(), "Logo loaded");
                img.to_rgba8()
            }
            Err(e) => {
                tracing::info!(path = %logo_path.display(), error = %e, "No logo file, using shop-name banner");
                renderer.banner()
            }
        };
        dispatcher = dispatcher.with_logo(logo);

        let pipeline = OrderPipeline::new(
            store.clone(),
            sequencer.clone(),
            resolver,
            renderer,
            dispatcher,
            Duration::from_millis(config.settle_delay_ms),
        );

        let service = OrderService::new(store, sequencer, pipeline);

        Ok(Self {
            config: Arc::new(config.clone()),
            service: Arc::new(service),
        })
    }
}

/// HTTP Server
pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    /// Create server with existing state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let app = crate::api::router(self.state.clone());

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("Comanda server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutting down...");
            })
            .await?;

        Ok(())
    }
}
