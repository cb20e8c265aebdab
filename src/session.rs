//! Session-scoped state for one form instance.
//!
//! The page-load timestamp and the randomized honeypot field name used to
//! be ambient globals on the page; here they are explicit fields created
//! when the form opens and threaded into the guard and the orchestrator.

use crate::guard;
use tokio::time::Instant;

#[derive(Clone, Debug)]
pub struct FormSession {
    /// When the form was opened; the dwell-time check measures from here.
    pub started_at: Instant,

    /// Randomized name of the hidden honeypot field for this session.
    pub honeypot_field: String,
}

impl FormSession {
    pub fn start() -> Self {
        Self {
            started_at: Instant::now(),
            honeypot_field: guard::generate_honeypot_name(),
        }
    }
}
