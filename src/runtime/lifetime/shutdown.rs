use sea_orm::DatabaseConnection;
use std::time::Duration;
use tokio::signal;
use tokio::time::timeout;
use tracing::{error, info, warn};

/// 关闭超时时间（秒）
const SHUTDOWN_TIMEOUT_SECS: u64 = 10;

pub async fn listen_for_shutdown(db: &DatabaseConnection) {
    // 等待 Ctrl+C 信号
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received, closing catalog connection...");
        }
        Err(e) => {
            warn!(
                "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
                e
            );
        }
    }

    match timeout(Duration::from_secs(SHUTDOWN_TIMEOUT_SECS), db.clone().close()).await {
        Ok(Ok(())) => info!("Catalog connection closed"),
        Ok(Err(e)) => error!("Failed to close catalog connection: {}", e),
        Err(_) => error!(
            "Closing catalog connection timed out after {} seconds",
            SHUTDOWN_TIMEOUT_SECS
        ),
    }
}
