//! Comment addressing (NIP-22)
//!
//! A comment's tags record two subjects: the thread root in upper-case
//! tag names (`E`/`A`/`I` plus `K`/`P`) and the immediate parent in the
//! corresponding lower-case names. Which tag carries the reference
//! depends on the subject's addressing class, so this module resolves a
//! subject into a typed reference first and derives tags, coordinates,
//! and matching from that single value.

use crate::error::{Error, Result};
use crate::event::{COMMENT_KIND, Event, KindClass, Tag, UnsignedEvent};
use url::Url;

/// A typed reference to a comment subject: the thread root, or the
/// parent a reply is attached to.
///
/// Resolving the subject once, up front, keeps tag production
/// (`root_tags`/`reply_tags`) and tag matching (`matches`) two views of
/// the same value. The two must stay inverses of each other; the
/// round-trip tests below pin that down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectRef {
    /// A regular event, referenced by id.
    Regular {
        /// Event id (hex).
        id: String,
        /// Kind, carried into the `K`/`k` tag.
        kind: u32,
        /// Author, carried into the `P`/`p` tag.
        pubkey: String,
    },
    /// A replaceable event, referenced by `kind:pubkey:`.
    Replaceable {
        /// Kind number.
        kind: u32,
        /// Author public key (hex).
        pubkey: String,
    },
    /// An addressable event, referenced by `kind:pubkey:d`.
    Addressable {
        /// Kind number.
        kind: u32,
        /// Author public key (hex).
        pubkey: String,
        /// The `d` tag value; empty when the event omits it.
        d: String,
    },
    /// A resource outside the event graph, referenced by URL.
    External {
        /// The full URL.
        url: String,
        /// The URL's host, carried into the `K`/`k` tag.
        host: String,
    },
}

impl SubjectRef {
    /// Resolve an event into the reference its comments must carry.
    ///
    /// An addressable event without a `d` tag resolves with `d = ""`.
    /// Two such events from the same author and kind are then
    /// indistinguishable; that is the protocol's own behavior and is
    /// preserved rather than worked around.
    pub fn from_event(event: &Event) -> Self {
        match event.kind_class() {
            KindClass::Regular => SubjectRef::Regular {
                id: event.id.clone(),
                kind: event.kind,
                pubkey: event.pubkey.clone(),
            },
            KindClass::Replaceable => SubjectRef::Replaceable {
                kind: event.kind,
                pubkey: event.pubkey.clone(),
            },
            KindClass::Addressable => SubjectRef::Addressable {
                kind: event.kind,
                pubkey: event.pubkey.clone(),
                d: event.d_tag().to_string(),
            },
        }
    }

    /// Resolve an external resource URL.
    ///
    /// The URL must carry a host component, which becomes the kind tag
    /// of comments on it.
    pub fn external(url: &str) -> Result<Self> {
        let parsed = Url::parse(url).map_err(|e| Error::InvalidRoot(format!("{}: {}", url, e)))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| Error::InvalidRoot(format!("URL has no host: {}", url)))?
            .to_string();

        Ok(SubjectRef::External {
            url: parsed.to_string(),
            host,
        })
    }

    /// The stable `kind:pubkey:d` coordinate, for the reference classes
    /// that have one.
    pub fn coordinate(&self) -> Option<String> {
        match self {
            SubjectRef::Replaceable { kind, pubkey } => Some(format!("{}:{}:", kind, pubkey)),
            SubjectRef::Addressable { kind, pubkey, d } => {
                Some(format!("{}:{}:{}", kind, pubkey, d))
            }
            _ => None,
        }
    }

    /// The tags a comment uses to address this subject as its root.
    pub fn root_tags(&self) -> Vec<Tag> {
        self.address_tags(TagCase::Root)
    }

    /// The tags a comment uses to address this subject as its parent.
    ///
    /// Identical to [`root_tags`](Self::root_tags) with lower-case tag
    /// names; a top-level comment uses the root for both.
    pub fn reply_tags(&self) -> Vec<Tag> {
        self.address_tags(TagCase::Reply)
    }

    fn address_tags(&self, case: TagCase) -> Vec<Tag> {
        let names = case.names();

        match self {
            SubjectRef::Regular { id, kind, pubkey } => vec![
                Tag::new([names.event, id.as_str()]),
                Tag::new([names.kind.to_string(), kind.to_string()]),
                Tag::new([names.pubkey, pubkey.as_str()]),
            ],
            SubjectRef::Replaceable { kind, pubkey } | SubjectRef::Addressable { kind, pubkey, .. } => {
                // coordinate() is Some for both of these classes
                let coordinate = self.coordinate().unwrap_or_default();
                vec![
                    Tag::new([names.address.to_string(), coordinate]),
                    Tag::new([names.kind.to_string(), kind.to_string()]),
                    Tag::new([names.pubkey, pubkey.as_str()]),
                ]
            }
            SubjectRef::External { url, host } => vec![
                Tag::new([names.external, url.as_str()]),
                Tag::new([names.kind, host.as_str()]),
            ],
        }
    }

    /// Whether `comment` addresses this subject as its root.
    ///
    /// Checks the lower-case tag corresponding to this reference's
    /// class; every tag of that name is considered, since duplicates
    /// are legal. Malformed or missing tags simply do not match.
    pub fn matches(&self, comment: &Event) -> bool {
        match self {
            SubjectRef::Regular { id, .. } => comment.tag_values("e").any(|v| v == id),
            SubjectRef::Replaceable { .. } | SubjectRef::Addressable { .. } => {
                // coordinate() is Some for both of these classes
                match self.coordinate() {
                    Some(coordinate) => comment.tag_values("a").any(|v| v == coordinate),
                    None => false,
                }
            }
            SubjectRef::External { url, .. } => comment.tag_values("i").any(|v| v == url),
        }
    }
}

/// Upper-case names address the root, lower-case the parent.
#[derive(Clone, Copy)]
enum TagCase {
    Root,
    Reply,
}

struct TagNames {
    event: &'static str,
    address: &'static str,
    external: &'static str,
    kind: &'static str,
    pubkey: &'static str,
}

impl TagCase {
    fn names(self) -> TagNames {
        match self {
            TagCase::Root => TagNames {
                event: "E",
                address: "A",
                external: "I",
                kind: "K",
                pubkey: "P",
            },
            TagCase::Reply => TagNames {
                event: "e",
                address: "a",
                external: "i",
                kind: "k",
                pubkey: "p",
            },
        }
    }
}

/// Assemble the unsigned kind-1111 event for a new comment.
///
/// The draft carries the root's tags in upper case followed by the
/// parent's in lower case; a top-level comment (no `parent`) repeats
/// the root in both. Signing and publishing stay with the caller.
///
/// # Example
///
/// ```
/// use comet_core::{EventBuilder, SubjectRef, draft_comment};
///
/// let note = EventBuilder::new()
///     .id("a".repeat(64))
///     .pubkey("b".repeat(64))
///     .kind(1)
///     .build();
/// let root = SubjectRef::from_event(&note);
///
/// let draft = draft_comment(&root, None, "c".repeat(64), 1700000000, "nice note");
/// assert_eq!(draft.kind, 1111);
/// assert_eq!(draft.tags.len(), 6);
/// ```
pub fn draft_comment(
    root: &SubjectRef,
    parent: Option<&SubjectRef>,
    pubkey: impl Into<String>,
    created_at: i64,
    content: impl Into<String>,
) -> UnsignedEvent {
    let mut tags = root.root_tags();
    tags.extend(parent.unwrap_or(root).reply_tags());

    UnsignedEvent {
        pubkey: pubkey.into(),
        created_at,
        kind: COMMENT_KIND,
        tags,
        content: content.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::EventBuilder;

    fn regular_note() -> Event {
        EventBuilder::new()
            .id("e".repeat(64))
            .pubkey("f".repeat(64))
            .created_at(1700000000)
            .kind(1)
            .content("a note")
            .sig("0".repeat(128))
            .build()
    }

    fn article(d: Option<&str>) -> Event {
        let mut builder = EventBuilder::new()
            .id("a".repeat(64))
            .pubkey("b".repeat(64))
            .created_at(1700000000)
            .kind(30023)
            .content("an article")
            .sig("0".repeat(128));
        if let Some(d) = d {
            builder = builder.add_tag(vec!["d", d]);
        }
        builder.build()
    }

    fn comment_with_tags(tags: Vec<Tag>) -> Event {
        EventBuilder::new()
            .id("c".repeat(64))
            .pubkey("d".repeat(64))
            .created_at(1700000100)
            .kind(1111)
            .tags(tags)
            .content("a comment")
            .sig("0".repeat(128))
            .build()
    }

    #[test]
    fn test_regular_root_tags() {
        let root = SubjectRef::from_event(&regular_note());
        let tags = root.root_tags();

        assert_eq!(tags[0], Tag::new(["E", &"e".repeat(64)]));
        assert_eq!(tags[1], Tag::new(["K", "1"]));
        assert_eq!(tags[2], Tag::new(["P", &"f".repeat(64)]));
    }

    #[test]
    fn test_replaceable_root_tags() {
        let profile = EventBuilder::new()
            .id("1".repeat(64))
            .pubkey("2".repeat(64))
            .kind(0)
            .sig("0".repeat(128))
            .build();
        let root = SubjectRef::from_event(&profile);
        let tags = root.root_tags();

        // Replaceable coordinates end with an empty identifier slot
        assert_eq!(tags[0], Tag::new(["A", &format!("0:{}:", "2".repeat(64))]));
        assert_eq!(tags[1], Tag::new(["K", "0"]));
        assert_eq!(tags[2], Tag::new(["P", &"2".repeat(64)]));
    }

    #[test]
    fn test_addressable_root_tags() {
        let root = SubjectRef::from_event(&article(Some("my-article")));
        let tags = root.root_tags();

        assert_eq!(
            tags[0],
            Tag::new(["A", &format!("30023:{}:my-article", "b".repeat(64))])
        );
        assert_eq!(tags[1], Tag::new(["K", "30023"]));
        assert_eq!(tags[2], Tag::new(["P", &"b".repeat(64)]));
    }

    #[test]
    fn test_addressable_without_d_collapses_to_empty() {
        let root = SubjectRef::from_event(&article(None));
        assert_eq!(
            root.coordinate(),
            Some(format!("30023:{}:", "b".repeat(64)))
        );
    }

    #[test]
    fn test_external_root_tags() {
        let root = SubjectRef::external("https://example.com/podcast.xml").unwrap();
        let tags = root.root_tags();

        assert_eq!(tags[0], Tag::new(["I", "https://example.com/podcast.xml"]));
        assert_eq!(tags[1], Tag::new(["K", "example.com"]));
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn test_external_requires_host() {
        assert!(SubjectRef::external("not a url").is_err());
        assert!(SubjectRef::external("data:text/plain,hello").is_err());
    }

    #[test]
    fn test_reply_tags_are_lower_case() {
        let root = SubjectRef::from_event(&regular_note());
        let tags = root.reply_tags();

        assert_eq!(tags[0], Tag::new(["e", &"e".repeat(64)]));
        assert_eq!(tags[1], Tag::new(["k", "1"]));
        assert_eq!(tags[2], Tag::new(["p", &"f".repeat(64)]));
    }

    #[test]
    fn test_round_trip_matches_for_every_class() {
        let subjects = vec![
            SubjectRef::from_event(&regular_note()),
            SubjectRef::from_event(&article(Some("slug"))),
            SubjectRef::from_event(&article(None)),
            SubjectRef::from_event(
                &EventBuilder::new()
                    .id("1".repeat(64))
                    .pubkey("2".repeat(64))
                    .kind(10002)
                    .sig("0".repeat(128))
                    .build(),
            ),
            SubjectRef::external("https://example.com/page").unwrap(),
        ];

        for root in subjects {
            let draft = draft_comment(&root, None, "9".repeat(64), 1700000200, "hello");
            let comment = comment_with_tags(draft.tags);
            assert!(root.matches(&comment), "round trip failed for {:?}", root);
        }
    }

    #[test]
    fn test_matches_considers_duplicate_tags() {
        let root = SubjectRef::from_event(&regular_note());
        let comment = comment_with_tags(vec![
            Tag::new(["e", "someotherid"]),
            Tag::new(["e", &"e".repeat(64)]),
        ]);

        assert!(root.matches(&comment));
    }

    #[test]
    fn test_matches_rejects_wrong_value() {
        let root = SubjectRef::from_event(&regular_note());
        let comment = comment_with_tags(vec![Tag::new(["e", "someotherid"])]);

        assert!(!root.matches(&comment));
    }

    #[test]
    fn test_matches_ignores_malformed_tags() {
        let root = SubjectRef::from_event(&regular_note());
        // A bare "e" tag with no value reads as absent
        let comment = comment_with_tags(vec![Tag::new(["e"])]);

        assert!(!root.matches(&comment));
    }

    #[test]
    fn test_top_level_draft_repeats_root_tags() {
        let root = SubjectRef::from_event(&article(Some("slug")));
        let draft = draft_comment(&root, None, "9".repeat(64), 1700000200, "hello");

        let coordinate = format!("30023:{}:slug", "b".repeat(64));
        assert_eq!(draft.tags[0], Tag::new(["A", coordinate.as_str()]));
        assert_eq!(draft.tags[3], Tag::new(["a", coordinate.as_str()]));
        assert_eq!(draft.kind, COMMENT_KIND);
    }

    #[test]
    fn test_nested_draft_addresses_root_and_parent() {
        let root = SubjectRef::from_event(&regular_note());
        let parent_comment = comment_with_tags(root.reply_tags());
        let parent = SubjectRef::from_event(&parent_comment);

        let draft = draft_comment(&root, Some(&parent), "9".repeat(64), 1700000300, "reply");

        // Upper-case tags point at the root
        assert_eq!(draft.tags[0], Tag::new(["E", &"e".repeat(64)]));
        // Lower-case tags point at the parent comment (kind 1111 is regular)
        assert_eq!(draft.tags[3], Tag::new(["e", &"c".repeat(64)]));
        assert_eq!(draft.tags[4], Tag::new(["k", "1111"]));
    }
}
