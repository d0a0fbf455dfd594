//! Locators for the reservation site's pages.
//!
//! These identifiers are the site's own and must match it exactly.

use courtbot_driver::Locator;

use crate::config::CourtDuration;

// Login page
pub fn username_field() -> Locator {
    Locator::css("#txtUser")
}

pub fn password_field() -> Locator {
    Locator::css("#txtPassword")
}

pub fn login_button() -> Locator {
    Locator::css("#ctl00_MainContent_Login1_btnLogin")
}

// Navigation
pub fn reservations_link() -> Locator {
    Locator::text("Reservations")
}

pub fn racquetball_link() -> Locator {
    Locator::text("Racquetball/Squash")
}

// Club selection
pub fn change_club_button() -> Locator {
    Locator::css("#btnChangeClub")
}

pub fn zip_code_field() -> Locator {
    Locator::css("#txtZipCode")
}

pub fn find_club_button() -> Locator {
    Locator::css("#btnFindclub")
}

/// The radio input for one club in the search results.
pub fn club_result(token: &str) -> Locator {
    Locator::css(format!(
        "input[name={}][id=\"arySelClub\"]",
        courtbot_driver::locator::css_string(token)
    ))
}

// Slot configuration
pub fn date_dropdown() -> Locator {
    Locator::css("#ddlDates")
}

pub fn duration_dropdown() -> Locator {
    Locator::css("#ddlDuration")
}

pub fn time_dropdown() -> Locator {
    Locator::css("#cboSearByTimeList")
}

pub fn save_button() -> Locator {
    Locator::css("#btnSaveReservation")
}

/// Text the site renders only once a reservation went through.
pub const CONFIRMATION_TEXT: &str = "Your reservation has been saved";

pub fn confirmation_marker() -> Locator {
    Locator::text(CONFIRMATION_TEXT)
}

/// Dropdown value for `duration`.
pub fn duration_value(duration: CourtDuration) -> &'static str {
    duration.as_option()
}
