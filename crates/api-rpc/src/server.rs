//! JSON-RPC Server
//!
//! JSON-RPC 2.0 over HTTP, bound to localhost.

use crate::handler::RpcHandler;
use crate::types::{
    DeleteRecordRequest, HistoryRequest, ListRecordsRequest, SetReminderRequest,
};
use carcare_core::application::{AddRecordRequest, MaintenanceService, UpdateRecordRequest};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_RPC_HOST: &str = "127.0.0.1";
pub const DEFAULT_RPC_PORT: u16 = 9537;

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

impl RpcServerConfig {
    /// Only loopback addresses are accepted
    pub fn validate(&self) -> Result<(), String> {
        if self.host == "localhost" {
            return Ok(());
        }
        match self.host.parse::<IpAddr>() {
            Ok(ip) if ip.is_loopback() => Ok(()),
            Ok(ip) => Err(format!("refusing to bind RPC server to non-loopback {}", ip)),
            Err(e) => Err(format!("invalid RPC host {:?}: {}", self.host, e)),
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(config: RpcServerConfig, service: Arc<MaintenanceService>) -> Self {
        Self {
            config,
            handler: Arc::new(RpcHandler::new(service)),
        }
    }

    /// Start the JSON-RPC server
    ///
    /// Security: refuses any non-loopback host
    pub async fn start(self) -> Result<ServerHandle, String> {
        self.config.validate()?;
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "Starting JSON-RPC server (localhost only)"
        );

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;

        let module = self.module()?;
        info!("JSON-RPC server started successfully");

        Ok(server.start(module))
    }

    fn module(&self) -> Result<RpcModule<()>, String> {
        let mut module = RpcModule::new(());

        // Records
        let handler = self.handler.clone();
        module
            .register_async_method("records.add.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: AddRecordRequest = params.parse()?;
                    handler.add_record(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("records.list.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    // Params are optional here
                    let req: Option<ListRecordsRequest> = params.parse()?;
                    handler.list_records(req.unwrap_or_default()).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("records.update.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: UpdateRecordRequest = params.parse()?;
                    handler.update_record(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("records.delete.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: DeleteRecordRequest = params.parse()?;
                    handler.delete_record(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("records.delete_all.v1", move |_, _, _| {
                let handler = handler.clone();
                async move { handler.delete_all().await }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("records.history.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: HistoryRequest = params.parse()?;
                    handler.history(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        // Status
        let handler = self.handler.clone();
        module
            .register_async_method("status.get.v1", move |_, _, _| {
                let handler = handler.clone();
                async move { handler.status().await }
            })
            .map_err(|e| e.to_string())?;

        // Reminders
        let handler = self.handler.clone();
        module
            .register_async_method("reminders.set.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: SetReminderRequest = params.parse()?;
                    handler.set_reminder(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("reminders.disable_all.v1", move |_, _, _| {
                let handler = handler.clone();
                async move { handler.disable_all_reminders().await }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("reminders.pending.v1", move |_, _, _| {
                let handler = handler.clone();
                async move { handler.pending_reminders().await }
            })
            .map_err(|e| e.to_string())?;

        // Authorization
        let handler = self.handler.clone();
        module
            .register_async_method("auth.status.v1", move |_, _, _| {
                let handler = handler.clone();
                async move { handler.auth_status().await }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("auth.request.v1", move |_, _, _| {
                let handler = handler.clone();
                async move { handler.auth_request().await }
            })
            .map_err(|e| e.to_string())?;

        // Catalog
        let handler = self.handler.clone();
        module
            .register_async_method("catalog.list.v1", move |_, _, _| {
                let handler = handler.clone();
                async move { handler.catalog().await }
            })
            .map_err(|e| e.to_string())?;

        Ok(module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loopback_hosts_accepted() {
        for host in ["127.0.0.1", "::1", "localhost"] {
            let config = RpcServerConfig {
                host: host.to_string(),
                port: DEFAULT_RPC_PORT,
            };
            assert!(config.validate().is_ok(), "{}", host);
        }
    }

    #[test]
    fn test_public_host_rejected() {
        let config = RpcServerConfig {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_RPC_PORT,
        };
        assert!(config.validate().unwrap_err().contains("non-loopback"));
    }
}
