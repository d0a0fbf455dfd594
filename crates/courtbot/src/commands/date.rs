//! `courtbot date` -- show which date the booking would pick today.

use courtbot_core::DateResolver;

use crate::cli::{DateArgs, GlobalOpts};
use crate::commands::load_settings;
use crate::error::CliError;

pub fn handle(args: &DateArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let days = match args.days {
        Some(days) => days,
        None => load_settings(global)?.booking_ahead_days,
    };
    let days = u32::try_from(days).map_err(|_| CliError::Validation {
        field: "days".into(),
        reason: format!("{days} must be a non-negative day count"),
    })?;

    let date = DateResolver::system().resolve(days)?;
    println!("{date}");
    Ok(())
}
