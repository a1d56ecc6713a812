#[allow(clippy::module_inception)]
mod config;

pub use config::{database_url_for, init_app_config, AppConfig, StoredSettings};
