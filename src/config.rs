//! Client configuration.

use std::path::PathBuf;

use clap::Args;

/// Settings for reaching the order service and the durable store.
#[derive(Debug, Clone, Args)]
pub struct ClientConfig {
    /// Base URL of the storefront API
    #[arg(long, env = "SATCHEL_API_URL", default_value = "http://localhost:5000/api")]
    pub api_base_url: String,

    /// Durable storage file holding carts and session state
    #[arg(long, env = "SATCHEL_STORAGE", default_value = ".satchel/storage.json")]
    pub storage_path: PathBuf,
}
