//! modscout tool server.
//!
//! Wires the five ecosystem engines into one registry over a shared result
//! cache and exposes their four operations as JSON-RPC tools on stdio.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use modscout::config::ScoutConfig;
//! use modscout::registry::build_registry;
//! use modscout::server::ToolServer;
//!
//! # async fn run() -> modscout_core::Result<()> {
//! let config = ScoutConfig::from_env()?;
//! let cache = config.build_cache();
//! let registry = build_registry(&cache, &config.engine_settings());
//! let server = ToolServer::new(Arc::new(registry));
//! server
//!     .serve(tokio::io::BufReader::new(tokio::io::stdin()), tokio::io::stdout())
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod tools;

pub use config::ScoutConfig;
pub use registry::build_registry;
pub use server::ToolServer;
