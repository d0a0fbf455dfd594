//! Command handlers.

pub mod book;
pub mod check_env;
pub mod config_cmd;
pub mod date;

use courtbot_config::Settings;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Load settings from every layer, then apply global flag overrides.
pub fn load_settings(global: &GlobalOpts) -> Result<Settings, CliError> {
    let mut settings = courtbot_config::load_settings(global.config.as_deref())?;
    if let Some(ref url) = global.webdriver_url {
        settings.webdriver_url.clone_from(url);
    }
    Ok(settings)
}
