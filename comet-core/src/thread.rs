//! Comment-thread resolution
//!
//! Relay queries return comment sets flat and unordered, with the reply
//! structure encoded only in tag references. Resolving a thread builds
//! an id-to-children index over the set once, then answers top-level
//! and reply lookups from that index without rescanning.

use crate::address::SubjectRef;
use crate::event::Event;
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

/// A resolved comment thread over a borrowed event set.
///
/// The resolver never takes ownership of events and never mutates them;
/// it holds references for the lifetime of the source slice. Every
/// resolution recomputes from the supplied set, so callers refetch and
/// rebuild rather than patching a live index.
///
/// The candidate set is expected to be relay-filtered for *some*
/// relationship to the root, but over-inclusive results are fine:
/// events that do not reference the root simply end up outside the
/// top-level list and unreachable from it.
///
/// # Example
///
/// ```
/// use comet_core::{EventBuilder, SubjectRef, Thread};
///
/// let note = EventBuilder::new()
///     .id("a".repeat(64))
///     .pubkey("b".repeat(64))
///     .kind(1)
///     .build();
/// let root = SubjectRef::from_event(&note);
///
/// let comments = vec![EventBuilder::new()
///     .id("c".repeat(64))
///     .pubkey("d".repeat(64))
///     .created_at(1700000100)
///     .kind(1111)
///     .add_tag(vec!["E", note.id.as_str()])
///     .add_tag(vec!["e", note.id.as_str()])
///     .content("first!")
///     .build()];
///
/// let thread = Thread::resolve(&root, &comments);
/// assert_eq!(thread.top_level().len(), 1);
/// ```
pub struct Thread<'a> {
    comments: Vec<&'a Event>,
    top_level: Vec<&'a Event>,
    children: HashMap<&'a str, Vec<&'a Event>>,
}

impl<'a> Thread<'a> {
    /// Index a flat candidate set against `root`.
    ///
    /// Non-comment kinds and duplicate ids (the same event arriving
    /// from several relays) are dropped up front, first occurrence
    /// winning. Top-level comments are ordered most-recent-first;
    /// reply lists oldest-first. Both sorts are stable, so events
    /// sharing a timestamp keep their input order.
    pub fn resolve(root: &SubjectRef, events: &'a [Event]) -> Self {
        let mut seen: HashSet<&str> = HashSet::with_capacity(events.len());
        let mut comments: Vec<&Event> = Vec::with_capacity(events.len());
        for event in events {
            if event.is_comment() && seen.insert(event.id.as_str()) {
                comments.push(event);
            }
        }

        // Adjacency from parent id to replies. A comment carrying
        // several e tags is listed under each referenced parent.
        let mut children: HashMap<&str, Vec<&Event>> = HashMap::new();
        for &comment in &comments {
            let mut parents: Vec<&str> = comment.tag_values("e").collect();
            parents.sort_unstable();
            parents.dedup();
            for parent in parents {
                children.entry(parent).or_default().push(comment);
            }
        }
        for replies in children.values_mut() {
            replies.sort_by_key(|reply| reply.created_at);
        }

        let mut top_level: Vec<&Event> = comments
            .iter()
            .copied()
            .filter(|comment| root.matches(comment))
            .collect();
        top_level.sort_by_key(|comment| Reverse(comment.created_at));

        Thread {
            comments,
            top_level,
            children,
        }
    }

    /// All comments in the thread, deduplicated, in input order.
    pub fn comments(&self) -> &[&'a Event] {
        &self.comments
    }

    /// Top-level comments, most recent first.
    pub fn top_level(&self) -> &[&'a Event] {
        &self.top_level
    }

    /// Direct replies to `parent_id`, oldest first.
    ///
    /// Note the intentional asymmetry with [`top_level`](Self::top_level):
    /// the feed reads newest-first, a conversation oldest-first.
    pub fn direct_replies(&self, parent_id: &str) -> &[&'a Event] {
        self.children
            .get(parent_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The full reply subtree under `parent_id`, depth first: each
    /// level's direct replies, then each reply's own subtree.
    ///
    /// Relay responses can contain reply cycles (malformed but
    /// possible), so traversal tracks visited ids and skips repeats
    /// instead of recursing forever.
    pub fn descendants(&self, parent_id: &str) -> Vec<&'a Event> {
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(parent_id);

        let mut out = Vec::new();
        self.collect_descendants(parent_id, &mut visited, &mut out);
        out
    }

    fn collect_descendants<'b>(
        &'b self,
        parent_id: &'b str,
        visited: &mut HashSet<&'b str>,
        out: &mut Vec<&'a Event>,
    ) {
        let mut fresh: Vec<&Event> = Vec::new();
        for reply in self.direct_replies(parent_id) {
            if visited.insert(reply.id.as_str()) {
                out.push(reply);
                fresh.push(reply);
            }
        }
        for reply in fresh {
            self.collect_descendants(&reply.id, visited, out);
        }
    }
}
