//! Input validation for queue names.
//!
//! The queue service enforces its naming rules server-side; validating here
//! keeps the failure deterministic and avoids a doomed service round-trip.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ListenerError, Result};

/// Standard queue names: 1-80 chars of `[A-Za-z0-9_-]`. FIFO queue names:
/// up to 75 such chars plus the mandatory `.fifo` suffix.
const QUEUE_NAME_PATTERN: &str = r"^([A-Za-z0-9_-]{1,80}|[A-Za-z0-9_-]{1,75}\.fifo)$";

fn queue_name_regex() -> &'static Regex {
    static QUEUE_NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    QUEUE_NAME_REGEX
        .get_or_init(|| Regex::new(QUEUE_NAME_PATTERN).expect("queue name pattern is valid"))
}

/// Validates a fully-formed queue name (including any `.fifo` suffix).
pub fn validate_queue_name(queue_name: &str) -> Result<()> {
    if queue_name_regex().is_match(queue_name) {
        Ok(())
    } else {
        Err(ListenerError::provisioning(
            "validate_queue_name",
            format!("invalid queue name: {queue_name}"),
        ))
    }
}
