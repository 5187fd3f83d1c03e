//! Nostr event model and kind classification

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Reserved kind for threaded comments (NIP-22).
pub const COMMENT_KIND: u32 = 1111;

/// A single event tag: a non-empty array of strings where the first
/// element is the tag name.
///
/// Duplicate tag names are allowed by the protocol and are preserved
/// verbatim; matching code must consider all of them.
///
/// # Example
///
/// ```
/// use comet_core::Tag;
///
/// let tag = Tag::new(["e", "abc123"]);
/// assert_eq!(tag.name(), Some("e"));
/// assert_eq!(tag.get(1), Some("abc123"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(pub Vec<String>);

impl Tag {
    /// Create a tag from any iterator of string-like values.
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Tag(values.into_iter().map(Into::into).collect())
    }

    /// The tag name (first element), if present.
    pub fn name(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// The element at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// The tag value (second element), if present.
    pub fn value(&self) -> Option<&str> {
        self.get(1)
    }
}

/// Addressing behavior of an event kind.
///
/// The protocol partitions the numeric kind space into three behaviors:
/// regular events are identified solely by `id`, replaceable events by
/// `(pubkey, kind)`, and addressable events by `(pubkey, kind, d-tag)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindClass {
    /// Identified solely by event id.
    Regular,
    /// Only the latest event per `(pubkey, kind)` is meaningful.
    Replaceable,
    /// Multiple events per `(pubkey, kind)` distinguished by `d` tag.
    Addressable,
}

impl KindClass {
    /// Classify a kind number. Pure and total: every kind maps to
    /// exactly one class.
    ///
    /// # Example
    ///
    /// ```
    /// use comet_core::KindClass;
    ///
    /// assert_eq!(KindClass::of(1), KindClass::Regular);
    /// assert_eq!(KindClass::of(0), KindClass::Replaceable);
    /// assert_eq!(KindClass::of(30023), KindClass::Addressable);
    /// ```
    pub fn of(kind: u32) -> Self {
        match kind {
            0 | 3 => KindClass::Replaceable,
            10000..20000 => KindClass::Replaceable,
            30000..40000 => KindClass::Addressable,
            _ => KindClass::Regular,
        }
    }
}

/// A signed Nostr event as exchanged with relays.
///
/// Events are immutable once constructed: `id` is the SHA-256 hash of the
/// canonical serialization, computed and signed externally. This crate
/// only consumes events; it never verifies signatures and never mutates
/// a received event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Event identifier (lowercase hex of the content hash).
    pub id: String,
    /// Author public key (hex).
    pub pubkey: String,
    /// Unix timestamp in seconds; used for ordering only.
    pub created_at: i64,
    /// Kind number selecting semantics and addressing behavior.
    pub kind: u32,
    /// Ordered tag list; duplicates allowed.
    pub tags: Vec<Tag>,
    /// Opaque content payload.
    pub content: String,
    /// Schnorr signature over the id; not inspected here.
    pub sig: String,
}

impl Event {
    /// The value of the first tag named `name`, if any.
    pub fn tag_value(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|tag| tag.name() == Some(name))
            .and_then(Tag::value)
    }

    /// All values of tags named `name`, in tag order.
    ///
    /// Duplicate tag names are legal, so matching code iterates all of
    /// them rather than stopping at the first.
    pub fn tag_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> {
        self.tags
            .iter()
            .filter(move |tag| tag.name() == Some(name))
            .filter_map(Tag::value)
    }

    /// The `d` tag value, defaulting to the empty string.
    ///
    /// Addressable events without a `d` tag all collapse onto the `""`
    /// identifier; that is protocol behavior, preserved as-is.
    pub fn d_tag(&self) -> &str {
        self.tag_value("d").unwrap_or("")
    }

    /// Addressing behavior of this event's kind.
    pub fn kind_class(&self) -> KindClass {
        KindClass::of(self.kind)
    }

    /// Whether this event is a threaded comment (kind 1111).
    pub fn is_comment(&self) -> bool {
        self.kind == COMMENT_KIND
    }
}

/// The pre-signing shape of an event: everything except `id` and `sig`.
///
/// This is what the canonical hash function consumes and what the miner
/// permutes. Signing and publishing are external collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedEvent {
    /// Author public key (hex).
    pub pubkey: String,
    /// Unix timestamp in seconds.
    pub created_at: i64,
    /// Kind number.
    pub kind: u32,
    /// Ordered tag list.
    pub tags: Vec<Tag>,
    /// Content payload.
    pub content: String,
}

/// Validate the shape of an event's fields without cryptography.
///
/// Checks hex lengths of `id`/`pubkey`/`sig`, the kind range, and that
/// every tag carries a name. This is the cheap hygiene pass used when
/// ingesting relay dumps; signature verification is out of scope.
pub fn validate_shape(event: &Event) -> Result<()> {
    if event.id.len() != 64 || !is_hex(&event.id) {
        return Err(Error::InvalidEvent(format!(
            "event id must be 64 hex characters, got: {}",
            event.id
        )));
    }

    if event.pubkey.len() != 64 || !is_hex(&event.pubkey) {
        return Err(Error::InvalidEvent(format!(
            "pubkey must be 64 hex characters, got: {}",
            event.pubkey
        )));
    }

    if event.sig.len() != 128 || !is_hex(&event.sig) {
        return Err(Error::InvalidEvent(format!(
            "signature must be 128 hex characters, got: {}",
            event.sig
        )));
    }

    // Kinds must fit in a u16 on the wire
    if event.kind > 65535 {
        return Err(Error::InvalidEvent(format!(
            "kind {} is out of valid range (0-65535)",
            event.kind
        )));
    }

    if event.tags.iter().any(|tag| tag.0.is_empty()) {
        return Err(Error::InvalidEvent(
            "tags must be non-empty arrays".to_string(),
        ));
    }

    Ok(())
}

/// Check if a string is valid hexadecimal
fn is_hex(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_hexdigit())
}
