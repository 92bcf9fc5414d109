//! 板球联赛管理后台服务
//!
//! 加载配置、初始化可观测性与存储后端后启动 HTTP 服务。

use std::sync::Arc;

use axum::http::HeaderValue;
use league_admin_service::{routes, state::AppState};
use league_core::{LeagueStore, MemoryLeagueStore, PgLeagueStore};
use league_shared::{
    config::{AppConfig, StorageBackend},
    database::Database,
    observability,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

const SERVICE_NAME: &str = "league-admin-service";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载顺序：config/default.toml -> config/{env}.toml -> config/league-admin-service.toml -> 环境变量
    let config = AppConfig::load(SERVICE_NAME)?;

    let _guard = observability::init(&config.service_name, &config.observability).await?;

    info!(
        environment = %config.environment,
        backend = ?config.storage.backend,
        "Starting {} on {}",
        SERVICE_NAME,
        config.server_addr()
    );

    let (store, database) = init_store(&config).await?;
    let state = AppState::new(store);

    let app = routes::app(state).layer(cors_layer(&config));

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("Listening on {}", config.server_addr());

    // 优雅关闭：收到 SIGTERM 或 Ctrl+C 时停止接收新连接并等待已有请求处理完毕
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(db) = database {
        db.close().await;
    }

    info!("Server shutdown complete");

    Ok(())
}

/// 按配置初始化存储后端
///
/// Postgres 后端同时返回连接池句柄，用于关闭时释放连接
async fn init_store(
    config: &AppConfig,
) -> anyhow::Result<(Arc<dyn LeagueStore>, Option<Database>)> {
    match config.storage.backend {
        StorageBackend::Postgres => {
            let db = Database::connect(&config.database).await?;
            db.health_check().await?;
            if config.storage.run_migrations {
                db.run_migrations().await?;
            }
            let store: Arc<dyn LeagueStore> = Arc::new(PgLeagueStore::new(db.pool().clone()));
            Ok((store, Some(db)))
        }
        StorageBackend::Memory => {
            if config.is_production() {
                warn!("In-memory storage selected in production; data is lost on restart");
            }
            info!("Using in-memory storage");
            let store: Arc<dyn LeagueStore> = Arc::new(MemoryLeagueStore::new());
            Ok((store, None))
        }
    }
}

/// CORS 配置：通过 LEAGUE_CORS_ORIGINS 环境变量控制允许的来源
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let allowed_origins = std::env::var("LEAGUE_CORS_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string());

    if allowed_origins == "*" {
        if config.is_production() {
            warn!("LEAGUE_CORS_ORIGINS=\"*\" 在生产环境中不安全，请设置为具体域名");
        }
        info!("CORS allowed_origins: * (all origins)");
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    info!("CORS allowed_origins: {}", allowed_origins);
    let origins: Vec<_> = allowed_origins
        .split(',')
        .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// 监听关闭信号
///
/// 收到 SIGTERM 或 Ctrl+C 后返回，触发 axum 的优雅关闭流程
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "注册 Ctrl+C 处理器失败");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "注册 SIGTERM 处理器失败");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}
