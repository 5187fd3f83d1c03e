//! Relay query filters for comment sets
//!
//! Fetching a thread means asking relays for every kind-1111 event that
//! references the root, regardless of depth. The root's addressing
//! class decides which indexed tag the filter keys on: `#E` for regular
//! roots, `#A` for coordinates, `#I` for external URLs. This is the
//! query-side twin of the address codec and must stay consistent with
//! it. Executing the filter is the relay pool's job, not this crate's.

use crate::address::SubjectRef;
use crate::event::COMMENT_KIND;
use serde::Serialize;

/// A relay subscription filter scoped to one comment thread.
///
/// Serializes to the wire filter shape, with the tag queries under
/// their `#`-prefixed keys.
///
/// # Example
///
/// ```
/// use comet_core::{CommentFilter, SubjectRef};
///
/// let root = SubjectRef::external("https://example.com/page").unwrap();
/// let filter = CommentFilter::for_root(&root).limit(50);
///
/// let json = serde_json::to_value(&filter).unwrap();
/// assert_eq!(json["kinds"][0], 1111);
/// assert_eq!(json["#I"][0], "https://example.com/page");
/// assert_eq!(json["limit"], 50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentFilter {
    /// Always `[1111]`; present for wire compatibility.
    pub kinds: Vec<u32>,

    /// Root event ids, for regular roots.
    #[serde(rename = "#E", skip_serializing_if = "Option::is_none")]
    pub event_roots: Option<Vec<String>>,

    /// Root coordinates, for replaceable and addressable roots.
    #[serde(rename = "#A", skip_serializing_if = "Option::is_none")]
    pub address_roots: Option<Vec<String>>,

    /// Root URLs, for external roots.
    #[serde(rename = "#I", skip_serializing_if = "Option::is_none")]
    pub external_roots: Option<Vec<String>>,

    /// Cap on returned events, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl CommentFilter {
    /// The filter fetching all comments under `root`.
    pub fn for_root(root: &SubjectRef) -> Self {
        let mut filter = CommentFilter {
            kinds: vec![COMMENT_KIND],
            event_roots: None,
            address_roots: None,
            external_roots: None,
            limit: None,
        };

        match root {
            SubjectRef::Regular { id, .. } => {
                filter.event_roots = Some(vec![id.clone()]);
            }
            SubjectRef::Replaceable { .. } | SubjectRef::Addressable { .. } => {
                // coordinate() is Some for both of these classes
                filter.address_roots = root.coordinate().map(|c| vec![c]);
            }
            SubjectRef::External { url, .. } => {
                filter.external_roots = Some(vec![url.clone()]);
            }
        }

        filter
    }

    /// Cap the number of returned events.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
