//! `courtbot check-env` -- verify the booking environment before a run.

use courtbot_config::{EnvCheck, check_env};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output::{Painter, rule};

pub fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let check = check_env(|var| std::env::var(var).ok());
    let painter = Painter::new(global.color);
    println!("{}", render(&check, painter));

    if check.passed() {
        Ok(())
    } else {
        Err(CliError::EnvCheckFailed {
            count: check.missing.len(),
        })
    }
}

fn render(check: &EnvCheck, painter: Painter) -> String {
    let mut lines = vec![rule(), "Environment Variables Validation".to_owned(), rule(), String::new()];

    lines.push("Checking required variables:".into());
    for (var, masked, description) in &check.present {
        lines.push(format!("  {} {var}: {masked} ({description})", painter.ok("✓")));
    }
    for (var, description) in &check.missing {
        lines.push(format!("  {} {var}: NOT SET ({description})", painter.bad("✗")));
    }
    lines.push(String::new());

    lines.push("Checking optional variables:".into());
    for (var, value, description) in &check.optional {
        match value {
            Some(value) => lines.push(format!("  {} {var}: {value} ({description})", painter.ok("✓"))),
            None => lines.push(format!(
                "  {} {var}: Not set, will use default ({description})",
                painter.note("ℹ")
            )),
        }
    }
    lines.push(String::new());
    lines.push(rule());

    if check.passed() {
        lines.push(painter.ok("VALIDATION PASSED: All required variables are set"));
    } else {
        lines.push(painter.bad(&format!(
            "VALIDATION FAILED: {} required variable(s) missing",
            check.missing.len()
        )));
        lines.push(String::new());
        lines.push("Missing variables:".into());
        for (var, _) in &check.missing {
            lines.push(format!("  - {var}"));
        }
    }
    lines.push(rule());
    lines.join("\n")
}
