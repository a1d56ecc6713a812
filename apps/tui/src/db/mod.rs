pub mod migrations;
pub mod models;
pub mod queries;

pub use migrations::{create_database_pool, setup_database};

/// Key/value entry holding the cached point balance as plain text.
pub const POINTS_KEY: &str = "userPoints";
pub const API_URL_KEY: &str = "apiUrl";
pub const USER_ID_KEY: &str = "userId";
