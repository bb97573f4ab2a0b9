//! CarCare Daemon - Main Entry Point
//! Records + status + reminder scheduling behind a localhost JSON-RPC server

mod settings;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use carcare_api_rpc::{RpcServer, RpcServerConfig};
use carcare_core::application::{
    shutdown_channel, AuthorizationGate, AuthorizationWatcher, MaintenanceService, RecordLedger,
    ReminderScheduler,
};
use carcare_core::port::{SystemTimeProvider, UuidProvider};
use carcare_infra_sqlite::{create_pool, database_url, run_migrations, SqliteRecordStore};
use carcare_infra_system::{DeliverySink, LocalNotificationCenter, PermissionStore};
use settings::{LogFormat, Settings};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const LOG_FILE_PREFIX: &str = "carcare-daemon.log";

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Configuration, then logging (log settings come from config)
    let settings = Settings::load()?;
    let _log_guard = init_logging(&settings)?;

    info!("CarCare daemon v{} starting...", VERSION);

    // 2. Database
    let db_path = settings.db_path();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
    }
    info!(db_path = %db_path.display(), "Initializing database...");

    let pool = create_pool(&database_url(&db_path)).await?;
    run_migrations(&pool).await?;

    // 3. Dependency wiring
    let time_provider = Arc::new(SystemTimeProvider);
    let store = Arc::new(SqliteRecordStore::new(pool));
    let ledger = Arc::new(RecordLedger::new(store));

    let loaded = ledger.load().await?;
    info!(records = loaded, "Maintenance records loaded");

    let notification_center = Arc::new(LocalNotificationCenter::new(
        time_provider.clone(),
        PermissionStore::new(settings.permission_file(), settings.prompt_answer),
        DeliverySink::from_command_line(settings.notify_command.as_deref()),
    ));
    let scheduler = Arc::new(ReminderScheduler::new(
        notification_center.clone(),
        time_provider.clone(),
        ledger.clone(),
    ));
    let (gate, initial) = AuthorizationGate::connect(notification_center).await?;
    info!(state = %initial.state, "Notification permission observed");

    let service = Arc::new(MaintenanceService::new(
        ledger,
        scheduler,
        Arc::new(gate),
        Arc::new(UuidProvider),
        time_provider,
        settings.vehicle_kind,
    ));

    // 4. Startup reconciliation (pending notifications do not survive a restart)
    service.handle_gate_update(initial).await?;
    match service.refresh_reminders().await {
        Ok(outcomes) => info!(types = outcomes.len(), "Reminders reconciled"),
        Err(e) => error!(error = %e, "Startup reminder reconciliation failed"),
    }

    // 5. JSON-RPC server
    let rpc_config = RpcServerConfig {
        host: settings.rpc_host.clone(),
        port: settings.rpc_port,
    };
    let rpc_handle = RpcServer::new(rpc_config, service.clone())
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    // 6. Authorization watcher
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let watcher = AuthorizationWatcher::new(service, settings.auth_poll_interval());
    let watcher_handle = tokio::spawn(watcher.run(shutdown_rx));

    info!("System ready. Press Ctrl+C to shutdown");

    // 7. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Exiting gracefully...");

    // 8. Graceful shutdown
    shutdown_tx.shutdown();
    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    if tokio::time::timeout(std::time::Duration::from_secs(5), watcher_handle)
        .await
        .is_err()
    {
        warn!("Authorization watcher did not stop in time");
    }

    info!("Shutdown complete.");
    Ok(())
}

/// Stdout (pretty or JSON) plus an optional daily-rolling JSON file.
/// The returned guard must live as long as the process to flush the file writer.
fn init_logging(settings: &Settings) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("carcare=info"))
        .context("failed to create env filter")?;

    let stdout_layer = match settings.log_format {
        LogFormat::Json => fmt::layer().json().boxed(),
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
    };

    let (file_layer, guard) = match settings.log_dir() {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .with(env_filter)
        .init();

    Ok(guard)
}
