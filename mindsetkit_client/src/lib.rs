pub mod api;
pub mod config;
pub mod controllers;
pub mod debounce;
pub mod error;
pub mod filters;
pub mod http;
pub mod models;
pub mod pagination;
pub mod session;
pub mod tags;
pub mod telemetry;
pub mod upload;
mod wire;

pub use api::MskApi;
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult, UidError};
pub use models::{ContentItem, ContentKind, Params, User};
pub use session::Session;

/// Builds an API handle from config discovered on this machine (the user
/// config file, then the environment).
pub fn connect() -> anyhow::Result<MskApi> {
    let config = ClientConfig::discover()?;
    tracing::debug!(base_url = %config.base_url, "connecting");
    Ok(MskApi::new(config)?)
}
