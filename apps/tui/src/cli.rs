use clap::Parser;
use sentinel_core::Role;

#[derive(Debug, Parser)]
#[command(
    name = "dengue-sentinel",
    version,
    about = "Dengue outbreak risk dashboard for citizens, CDC managers and hospitals"
)]
pub struct CliArgs {
    /// Print a risk report and exit
    #[arg(long)]
    pub headless: bool,

    /// Print the headless report as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Use generated zones instead of the live heatmap
    #[arg(long)]
    pub mock: bool,

    /// Dashboard to open: citizen, manager or hospital
    #[arg(long, value_name = "ROLE")]
    pub role: Option<Role>,

    /// Backend base URL
    #[arg(long = "api-url", value_name = "URL")]
    pub api_url: Option<String>,

    /// User id sent with tasks and redemptions
    #[arg(long = "user-id", value_name = "ID")]
    pub user_id: Option<String>,

    /// Override local store path
    #[arg(long, value_name = "PATH")]
    pub db: Option<String>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(db) = &self.db {
            std::env::set_var("DATABASE_NAME", db);
        }
        if let Some(url) = &self.api_url {
            std::env::set_var("SENTINEL_API_URL", url);
        }
        if let Some(user_id) = &self.user_id {
            std::env::set_var("SENTINEL_USER_ID", user_id);
        }
        if let Some(role) = self.role {
            std::env::set_var("SENTINEL_ROLE", role.as_str());
        }
        if self.mock {
            std::env::set_var("SENTINEL_MOCK", "1");
        }
    }
}
