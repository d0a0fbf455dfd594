//! Config subcommand handlers.

use std::path::PathBuf;

use courtbot_config::{Settings, config_path, save_settings, store_password};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::commands::load_settings;
use crate::error::CliError;
use crate::output::Painter;

fn active_path(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(config_path)
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            println!("{}", active_path(global).display());
            Ok(())
        }

        ConfigCommand::Show => {
            let settings = load_settings(global)?;
            let painter = Painter::new(global.color);
            println!("{}", render(&settings, &active_path(global), painter));
            Ok(())
        }

        ConfigCommand::Init { force } => {
            let path = active_path(global);
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }
            save_settings(&path, &Settings::default())?;
            eprintln!("Wrote default configuration to {}", path.display());
            Ok(())
        }

        ConfigCommand::SetPassword => {
            let settings = load_settings(global)?;
            let password = rpassword::prompt_password(format!(
                "CitySports password for {}: ",
                settings.masked_username()
            ))
            .map_err(|e| CliError::Prompt(e.to_string()))?;

            if password.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "password cannot be empty".into(),
                });
            }
            store_password(&settings.username, &password)?;
            eprintln!("Password stored in system keyring");
            Ok(())
        }
    }
}

fn render(settings: &Settings, path: &std::path::Path, painter: Painter) -> String {
    let set_or_not = |set: bool| {
        if set {
            painter.ok("set")
        } else {
            painter.bad("not set")
        }
    };
    let optional = |value: Option<&str>| value.unwrap_or("-").to_owned();

    let password_set = settings.resolve_password().is_some();
    let file_note = if path.exists() { "" } else { " (not found, using defaults)" };

    [
        format!("{} {}{file_note}", painter.bold("Config file:"), path.display()),
        String::new(),
        format!("username          {}", settings.masked_username()),
        format!("password          {}", set_or_not(password_set)),
        format!("email_to          {}", optional(settings.email_to.as_deref())),
        format!("email_from        {}", optional(settings.email_from.as_deref())),
        format!(
            "email_password    {}",
            set_or_not(settings.email_password.as_ref().is_some_and(|p| !p.is_empty()))
        ),
        format!("zip_code          {}", settings.zip_code),
        format!("club_name         {}", settings.club_name),
        format!("login_url         {}", settings.login_url),
        format!("preferred_day     {}", settings.preferred_day),
        format!("preferred_time    {}", settings.preferred_time),
        format!("duration          {}", settings.duration),
        format!("booking_ahead     {}", settings.booking_ahead_days),
        format!("max_retries       {}", settings.max_retries),
        format!("retry_delay       {}s", settings.retry_delay),
        format!("webdriver_url     {}", settings.webdriver_url),
        format!("headless          {}", settings.headless),
        format!("screenshot_dir    {}", settings.screenshot_dir.display()),
    ]
    .join("\n")
}
