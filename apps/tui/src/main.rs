use clap::Parser;
use color_eyre::Result;
use dengue_sentinel::api::{HttpApi, SentinelApi};
use dengue_sentinel::app::App;
use dengue_sentinel::cli::CliArgs;
use dengue_sentinel::config::{init_app_config, StoredSettings};
use dengue_sentinel::db::{create_database_pool, setup_database};
use dengue_sentinel::ledger::PointsLedger;
use dengue_sentinel::telemetry::{init_tracing, LogTarget};
use dengue_sentinel::{event, terminal};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();
    let mut config = init_app_config()?;

    // Headless when asked, or when stdout is not a terminal
    let headless = args.headless || !is_terminal();
    let log_target = if headless {
        LogTarget::Stderr
    } else {
        LogTarget::File(config.log_path.clone())
    };
    init_tracing(&log_target, args.debug)?;

    let pool = open_store(&config.database_url).await?;
    match StoredSettings::load(&pool).await {
        Ok(stored) => config.merge_stored(stored, &args),
        Err(e) => warn!(error = %e, "could not read saved settings"),
    }

    let api: Arc<dyn SentinelApi> = Arc::new(HttpApi::new(&config.api_url, config.request_timeout)?);
    let mut ledger = PointsLedger::load(pool).await?;
    info!(
        api_url = %config.api_url,
        user_id = %config.user_id,
        role = config.role.as_str(),
        balance = ledger.balance(),
        "starting dengue sentinel"
    );

    if headless {
        return event::run_headless(api.as_ref(), &mut ledger, &config, args.json).await;
    }

    let (events_tx, events_rx) = tokio::sync::mpsc::unbounded_channel();
    let mut app = App::new(config, api, ledger, events_tx);

    terminal::install_panic_hook();
    let mut term = terminal::setup_terminal()?;

    // Run the application
    let result = event::run(&mut term, &mut app, events_rx).await;

    // Restore terminal
    terminal::cleanup_terminal_state(true, true);

    result
}

/// The on-disk store, or an in-memory one when the file cannot be opened.
async fn open_store(database_url: &str) -> Result<SqlitePool> {
    let pool = match create_database_pool(database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            warn!(error = %e, "local store unavailable, points will not persist");
            SqlitePool::connect("sqlite::memory:").await?
        }
    };
    setup_database(&pool).await?;
    Ok(pool)
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
