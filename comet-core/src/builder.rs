//! Builder pattern for Event construction

use crate::{Event, Tag, UnsignedEvent};

/// Fluent builder for constructing Event instances
///
/// Mostly useful in tests and fixtures: real events arrive from relays
/// already signed, and real drafts come out of the comment codec or the
/// miner.
///
/// # Example
///
/// ```
/// use comet_core::EventBuilder;
///
/// let event = EventBuilder::new()
///     .id("abc123")
///     .pubkey("def456")
///     .created_at(1234567890)
///     .kind(1111)
///     .content("Hello, Nostr!")
///     .add_tag(vec!["e", "parent_id"])
///     .sig("sig789")
///     .build();
///
/// assert_eq!(event.id, "abc123");
/// assert_eq!(event.tags.len(), 1);
/// ```
pub struct EventBuilder {
    id: String,
    pubkey: String,
    created_at: i64,
    kind: u32,
    tags: Vec<Tag>,
    content: String,
    sig: String,
}

impl EventBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            id: String::new(),
            pubkey: String::new(),
            created_at: 0,
            kind: 0,
            tags: Vec::new(),
            content: String::new(),
            sig: String::new(),
        }
    }

    /// Set the event ID
    pub fn id<S: Into<String>>(mut self, id: S) -> Self {
        self.id = id.into();
        self
    }

    /// Set the public key
    pub fn pubkey<S: Into<String>>(mut self, pubkey: S) -> Self {
        self.pubkey = pubkey.into();
        self
    }

    /// Set the creation timestamp
    pub fn created_at(mut self, timestamp: i64) -> Self {
        self.created_at = timestamp;
        self
    }

    /// Set the event kind
    pub fn kind(mut self, kind: u32) -> Self {
        self.kind = kind;
        self
    }

    /// Set the content
    pub fn content<S: Into<String>>(mut self, content: S) -> Self {
        self.content = content.into();
        self
    }

    /// Set the signature
    pub fn sig<S: Into<String>>(mut self, sig: S) -> Self {
        self.sig = sig.into();
        self
    }

    /// Add a single tag
    ///
    /// Accepts any iterator of string-like values
    pub fn add_tag<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.push(Tag::new(values));
        self
    }

    /// Replace the tag list wholesale
    pub fn tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = tags;
        self
    }

    /// Build the Event
    pub fn build(self) -> Event {
        Event {
            id: self.id,
            pubkey: self.pubkey,
            created_at: self.created_at,
            kind: self.kind,
            tags: self.tags,
            content: self.content,
            sig: self.sig,
        }
    }

    /// Build an UnsignedEvent, discarding any id and signature
    pub fn build_unsigned(self) -> UnsignedEvent {
        UnsignedEvent {
            pubkey: self.pubkey,
            created_at: self.created_at,
            kind: self.kind,
            tags: self.tags,
            content: self.content,
        }
    }
}

impl Default for EventBuilder {
    fn default() -> Self {
        Self::new()
    }
}
