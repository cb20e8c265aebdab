//! Cheap bot heuristics evaluated before validation.
//!
//! Both checks drop the submission silently: no notification, no backend
//! calls, so an automated filler sees the same outcome as a successful
//! submit. Neither is a security guarantee.

use crate::models::upload::base36_token;
use crate::session::FormSession;
use std::time::Duration;
use tracing::debug;

/// Minimum time a human plausibly needs between opening the form and
/// submitting it.
pub const MIN_DWELL: Duration = Duration::from_millis(2000);

const HONEYPOT_PREFIX: &str = "website_";
const HONEYPOT_SUFFIX_LEN: usize = 6;

/// Randomized honeypot field name, a fresh one per session.
pub fn generate_honeypot_name() -> String {
    format!("{}{}", HONEYPOT_PREFIX, base36_token(HONEYPOT_SUFFIX_LEN))
}

/// Why a submission was silently dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropReason {
    HoneypotFilled,
    SubmittedTooFast,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardVerdict {
    Accept,
    Drop(DropReason),
}

/// Honeypot + dwell-time checks.
#[derive(Clone, Debug)]
pub struct SubmitGuard {
    min_dwell: Duration,
}

impl Default for SubmitGuard {
    fn default() -> Self {
        Self {
            min_dwell: MIN_DWELL,
        }
    }
}

impl SubmitGuard {
    pub fn with_min_dwell(min_dwell: Duration) -> Self {
        Self { min_dwell }
    }

    pub fn evaluate(&self, session: &FormSession, honeypot_value: &str) -> GuardVerdict {
        if !honeypot_value.is_empty() {
            debug!(field = %session.honeypot_field, "honeypot filled, dropping submission");
            return GuardVerdict::Drop(DropReason::HoneypotFilled);
        }

        let dwell = session.started_at.elapsed();
        if dwell < self.min_dwell {
            debug!(?dwell, "submitted too fast, dropping submission");
            return GuardVerdict::Drop(DropReason::SubmittedTooFast);
        }

        GuardVerdict::Accept
    }
}
