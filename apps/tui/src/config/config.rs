use crate::api::DEFAULT_API_URL;
use crate::cli::CliArgs;
use crate::db::{queries, API_URL_KEY, USER_ID_KEY};
use color_eyre::eyre::eyre;
use dotenv::dotenv;
use sentinel_core::Role;
use sqlx::SqlitePool;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_USER_ID: &str = "user_123";
pub const DEFAULT_DATABASE_NAME: &str = "sentinel.db";
pub const DEFAULT_LOG_FILE: &str = "dengue-sentinel.log";
const DEFAULT_REFRESH_SECS: u64 = 30;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_url: String,
    pub user_id: String,
    pub database_path: PathBuf,
    pub database_url: String,
    pub refresh_interval: Duration,
    pub request_timeout: Duration,
    pub log_path: PathBuf,
    pub role: Role,
    pub mock: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredSettings {
    pub api_url: Option<String>,
    pub user_id: Option<String>,
}

impl StoredSettings {
    pub async fn load(pool: &SqlitePool) -> Result<Self, sqlx::Error> {
        Ok(Self {
            api_url: non_empty(queries::get_value(pool, API_URL_KEY).await?),
            user_id: non_empty(queries::get_value(pool, USER_ID_KEY).await?),
        })
    }

    pub async fn save(&self, pool: &SqlitePool) -> Result<(), sqlx::Error> {
        for (key, value) in [(API_URL_KEY, &self.api_url), (USER_ID_KEY, &self.user_id)] {
            match value {
                Some(value) => queries::set_value(pool, key, value).await?,
                None => queries::delete_value(pool, key).await?,
            }
        }
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// Stored settings beat environment defaults but never a CLI flag.
    pub fn merge_stored(&mut self, stored: StoredSettings, args: &CliArgs) {
        if args.api_url.is_none() {
            if let Some(api_url) = stored.api_url {
                self.api_url = api_url;
            }
        }
        if args.user_id.is_none() {
            if let Some(user_id) = stored.user_id {
                self.user_id = user_id;
            }
        }
    }
}

/// Initializes the application configuration from `.env` and the environment.
pub fn init_app_config() -> color_eyre::eyre::Result<AppConfig> {
    dotenv().ok();

    let base_dir: PathBuf = env::current_dir()?;

    let db_name = env::var("DATABASE_NAME").unwrap_or_else(|_| DEFAULT_DATABASE_NAME.to_string());
    let database_path = base_dir.join(&db_name);

    if let Some(parent) = database_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let database_url = database_url_for(&database_path)?;

    let role = match env::var("SENTINEL_ROLE") {
        Ok(value) => value.parse::<Role>()?,
        Err(_) => Role::default(),
    };

    let log_path = env::var("SENTINEL_LOG")
        .map_or_else(|_| base_dir.join(DEFAULT_LOG_FILE), PathBuf::from);

    Ok(AppConfig {
        api_url: env::var("SENTINEL_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        user_id: env::var("SENTINEL_USER_ID").unwrap_or_else(|_| DEFAULT_USER_ID.to_string()),
        database_path,
        database_url,
        refresh_interval: Duration::from_secs(env_secs("SENTINEL_REFRESH_SECS", DEFAULT_REFRESH_SECS)),
        request_timeout: Duration::from_secs(env_secs("SENTINEL_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)),
        log_path,
        role,
        mock: env::var("SENTINEL_MOCK").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true")),
    })
}

fn env_secs(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(default)
}

/// SQLx wants `sqlite:///abs/path` for absolute paths and `sqlite://rel/path`
/// for relative ones.
pub fn database_url_for(path: &Path) -> color_eyre::eyre::Result<String> {
    let path_str = path.to_str().ok_or_else(|| eyre!("Invalid database path"))?;
    let clean_path = path_str.trim_start_matches('/');

    Ok(if path.is_absolute() {
        format!("sqlite:///{clean_path}")
    } else {
        format!("sqlite://{clean_path}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn config() -> AppConfig {
        AppConfig {
            api_url: DEFAULT_API_URL.to_string(),
            user_id: DEFAULT_USER_ID.to_string(),
            database_path: PathBuf::from(DEFAULT_DATABASE_NAME),
            database_url: "sqlite://sentinel.db".to_string(),
            refresh_interval: Duration::from_secs(30),
            request_timeout: Duration::from_secs(10),
            log_path: PathBuf::from(DEFAULT_LOG_FILE),
            role: Role::Citizen,
            mock: false,
        }
    }

    #[test]
    fn database_url_shapes() -> color_eyre::eyre::Result<()> {
        assert_eq!(
            database_url_for(Path::new("/var/lib/sentinel.db"))?,
            "sqlite:///var/lib/sentinel.db"
        );
        assert_eq!(database_url_for(Path::new("data/s.db"))?, "sqlite://data/s.db");
        Ok(())
    }

    #[test]
    fn stored_settings_yield_to_cli_flags() {
        let stored = StoredSettings {
            api_url: Some("http://cdc.local:5328".into()),
            user_id: Some("user_777".into()),
        };

        let args = CliArgs::parse_from(["dengue-sentinel", "--api-url", "http://flag:1"]);
        let mut cfg = config();
        cfg.merge_stored(stored.clone(), &args);
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.user_id, "user_777");

        let args = CliArgs::parse_from(["dengue-sentinel"]);
        let mut cfg = config();
        cfg.merge_stored(stored, &args);
        assert_eq!(cfg.api_url, "http://cdc.local:5328");
    }

    #[tokio::test]
    async fn settings_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        crate::db::setup_database(&pool).await?;

        assert_eq!(StoredSettings::load(&pool).await?, StoredSettings::default());

        let settings = StoredSettings {
            api_url: Some("http://10.0.0.2:5328".into()),
            user_id: None,
        };
        settings.save(&pool).await?;
        assert_eq!(StoredSettings::load(&pool).await?, settings);
        Ok(())
    }
}
