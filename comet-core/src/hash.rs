//! Canonical event hashing
//!
//! An event id is the SHA-256 of the canonical serialization
//! `[0, pubkey, created_at, kind, tags, content]`. The miner recomputes
//! this for every candidate nonce, so the hash sits behind a trait seam
//! where alternative serializations or accelerated implementations can
//! be plugged in.

use crate::error::Result;
use crate::event::UnsignedEvent;
use serde_json::json;
use sha2::{Digest, Sha256};

/// Content-hash collaborator consumed by the miner.
pub trait EventHasher {
    /// Compute the lowercase hex event id for the given unsigned fields.
    fn hash(&self, event: &UnsignedEvent) -> Result<String>;
}

/// The protocol's canonical serialization hashed with SHA-256.
///
/// # Example
///
/// ```
/// use comet_core::{CanonicalHasher, EventBuilder, EventHasher};
///
/// let draft = EventBuilder::new()
///     .pubkey("a".repeat(64))
///     .created_at(1700000000)
///     .kind(1)
///     .content("gm")
///     .build_unsigned();
///
/// let id = CanonicalHasher.hash(&draft)?;
/// assert_eq!(id.len(), 64);
/// # Ok::<(), comet_core::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalHasher;

impl EventHasher for CanonicalHasher {
    fn hash(&self, event: &UnsignedEvent) -> Result<String> {
        let canonical = serde_json::to_string(&json!([
            0,
            event.pubkey,
            event.created_at,
            event.kind,
            event.tags,
            event.content,
        ]))?;

        let digest = Sha256::digest(canonical.as_bytes());
        Ok(hex::encode(digest))
    }
}
