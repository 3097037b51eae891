//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Storage: In-memory catalog store
//! - Loader: CSV catalog bootstrap
//! - Adapters: Platform integrations (LINE, console)
//! - Server: Webhook endpoint

pub mod config;
pub mod storage;
pub mod loader;
pub mod adapters;
pub mod server;
