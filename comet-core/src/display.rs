//! Display implementation for Event

use crate::Event;
use std::fmt;

/// Display implementation that outputs pretty-printed JSON
impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string_pretty(self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => write!(f, "<invalid Event>"),
        }
    }
}
