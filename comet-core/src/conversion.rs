//! Conversion between JSON strings and events
//!
//! This module provides idiomatic `TryFrom` implementations for moving
//! events across the JSONL boundary used by relay dumps and tooling.

use crate::{Event, error::Result, event::validate_shape};

/// Convert from a JSON string slice to an Event (fallible)
///
/// Parses the NIP-01 JSON shape and then checks field hygiene (hex
/// lengths, kind range, non-empty tags). Signature verification is not
/// performed.
///
/// # Example
///
/// ```
/// use comet_core::Event;
///
/// let json = format!(
///     r#"{{"id":"{}","pubkey":"{}","created_at":1234567890,"kind":1,"tags":[],"content":"Hello","sig":"{}"}}"#,
///     "a".repeat(64), "b".repeat(64), "c".repeat(128),
/// );
/// let event = Event::try_from(json.as_str())?;
/// assert_eq!(event.kind, 1);
/// # Ok::<(), comet_core::Error>(())
/// ```
impl TryFrom<&str> for Event {
    type Error = crate::error::Error;

    fn try_from(json: &str) -> Result<Self> {
        let event: Event = serde_json::from_str(json)?;
        validate_shape(&event)?;
        Ok(event)
    }
}

/// Convert from an owned JSON string to an Event (fallible)
impl TryFrom<String> for Event {
    type Error = crate::error::Error;

    fn try_from(json: String) -> Result<Self> {
        Event::try_from(json.as_str())
    }
}

/// Convert from an Event reference to a compact JSON string (fallible)
impl TryFrom<&Event> for String {
    type Error = crate::error::Error;

    fn try_from(event: &Event) -> Result<Self> {
        Ok(serde_json::to_string(event)?)
    }
}
