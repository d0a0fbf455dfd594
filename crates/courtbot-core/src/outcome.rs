use std::fmt;

/// Reason reported when the form was submitted but no confirmation appeared.
pub const SLOT_TAKEN_REASON: &str = "Booking failed - slot may be taken";

/// Terminal result of one booking attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingOutcome {
    Success,
    Failure { reason: String },
}

impl BookingOutcome {
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }

    /// The expected, non-exceptional failure: the slot was not available.
    pub fn slot_taken() -> Self {
        Self::failure(SLOT_TAKEN_REASON)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Success => None,
            Self::Failure { reason } => Some(reason),
        }
    }
}

impl fmt::Display for BookingOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::Failure { reason } => write!(f, "failure: {reason}"),
        }
    }
}

/// Where an attempt is in the booking sequence. Each stage names the
/// state reached after its step completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
pub enum BookingStage {
    #[strum(serialize = "init")]
    Init,
    #[strum(serialize = "authenticated")]
    Authenticated,
    #[strum(serialize = "on reservation page")]
    OnReservationPage,
    #[strum(serialize = "club selected")]
    ClubSelected,
    #[strum(serialize = "slot configured")]
    SlotConfigured,
    #[strum(serialize = "submitted")]
    Submitted,
}
