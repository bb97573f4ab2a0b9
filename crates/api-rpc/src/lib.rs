//! JSON-RPC API Layer
//!
//! Exposes the CarCare maintenance service over JSON-RPC 2.0 (localhost only).

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use server::{RpcServer, RpcServerConfig};
