//! Integration tests exercising the full comment and mining pipeline

use comet_core::{
    CanonicalHasher, CommentFilter, Event, EventBuilder, EventHasher, Miner, MinerOutcome,
    Result, SubjectRef, Thread, declared_target, draft_comment, leading_zero_bits, mine,
};

fn hex_id(seed: char) -> String {
    seed.to_string().repeat(64)
}

fn root_article() -> Event {
    EventBuilder::new()
        .id(hex_id('a'))
        .pubkey(hex_id('b'))
        .created_at(1700000000)
        .kind(30023)
        .add_tag(vec!["d", "launch-post"])
        .content("long form article")
        .sig("0".repeat(128))
        .build()
}

/// Build a comment the way a client publishing into the thread would:
/// draft against the codec, then pretend it came back signed.
fn published_comment(
    id: &str,
    root: &SubjectRef,
    parent: Option<&SubjectRef>,
    created_at: i64,
) -> Event {
    let draft = draft_comment(root, parent, hex_id('c'), created_at, "a comment");
    EventBuilder::new()
        .id(id)
        .pubkey(draft.pubkey)
        .created_at(draft.created_at)
        .kind(draft.kind)
        .tags(draft.tags)
        .content(draft.content)
        .sig("0".repeat(128))
        .build()
}

#[test]
fn test_thread_over_drafted_comments() {
    let article = root_article();
    let root = SubjectRef::from_event(&article);

    let top_old = published_comment(&hex_id('1'), &root, None, 100);
    let top_new = published_comment(&hex_id('2'), &root, None, 300);

    let parent_ref = SubjectRef::from_event(&top_old);
    let reply_a = published_comment(&hex_id('3'), &root, Some(&parent_ref), 150);
    let reply_b = published_comment(&hex_id('4'), &root, Some(&parent_ref), 120);
    let nested_ref = SubjectRef::from_event(&reply_b);
    let nested = published_comment(&hex_id('5'), &root, Some(&nested_ref), 200);

    // Relay order is arbitrary
    let events = vec![
        nested.clone(),
        top_new.clone(),
        reply_a.clone(),
        top_old.clone(),
        reply_b.clone(),
    ];

    let thread = Thread::resolve(&root, &events);

    // Feed order: newest top-level first
    let top_ids: Vec<&str> = thread.top_level().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(top_ids, vec![top_new.id.as_str(), top_old.id.as_str()]);

    // Conversation order: oldest reply first
    let reply_ids: Vec<&str> = thread
        .direct_replies(&top_old.id)
        .iter()
        .map(|e| e.id.as_str())
        .collect();
    assert_eq!(reply_ids, vec![reply_b.id.as_str(), reply_a.id.as_str()]);

    // Subtree reaches through intermediate replies
    let descendants: Vec<&str> = thread
        .descendants(&top_old.id)
        .iter()
        .map(|e| e.id.as_str())
        .collect();
    assert!(descendants.contains(&reply_a.id.as_str()));
    assert!(descendants.contains(&reply_b.id.as_str()));
    assert!(descendants.contains(&nested.id.as_str()));
    assert_eq!(descendants.len(), 3);
}

#[test]
fn test_filter_and_codec_agree_on_the_root() {
    let article = root_article();
    let root = SubjectRef::from_event(&article);

    let filter = CommentFilter::for_root(&root).limit(200);
    let coordinate = format!("30023:{}:launch-post", hex_id('b'));
    assert_eq!(filter.address_roots, Some(vec![coordinate]));

    // A comment drafted from the same root is matched by the same key
    let comment = published_comment(&hex_id('9'), &root, None, 100);
    assert!(root.matches(&comment));
}

#[test]
fn test_external_root_round_trip() {
    let root = SubjectRef::external("https://example.com/episode-42").unwrap();

    let comment = published_comment(&hex_id('7'), &root, None, 100);
    let thread = Thread::resolve(&root, std::slice::from_ref(&comment));

    assert_eq!(thread.top_level().len(), 1);

    let filter = CommentFilter::for_root(&root);
    assert_eq!(
        filter.external_roots,
        Some(vec!["https://example.com/episode-42".to_string()])
    );
}

#[tokio::test]
async fn test_mine_then_score_round_trip() -> Result<()> {
    let draft = EventBuilder::new()
        .pubkey(hex_id('b'))
        .created_at(1700000000)
        .kind(1)
        .content("mined for the feed")
        .build_unsigned();

    let mut miner = Miner::new(draft, 4, CanonicalHasher);
    let outcome = mine(&mut miner, 256, |_| {}).await?;

    let solution = match outcome {
        MinerOutcome::Found(solution) => solution,
        other => panic!("expected Found, got {:?}", other),
    };

    // The id the miner reports is the id the hasher recomputes
    assert_eq!(CanonicalHasher.hash(&solution.event)?, solution.id);

    // And the scorer agrees with both the achieved difficulty and the
    // declared target
    assert!(leading_zero_bits(&solution.id) >= 4);
    assert_eq!(declared_target(&solution.event.tags), Some(4));

    Ok(())
}

#[test]
fn test_jsonl_round_trip_through_the_resolver() {
    let article = root_article();
    let root = SubjectRef::from_event(&article);
    let comment = published_comment(&hex_id('6'), &root, None, 100);

    // Serialize the way a dump would, parse back, resolve
    let line = String::try_from(&comment).unwrap();
    let parsed = Event::try_from(line.as_str()).unwrap();

    let events = vec![parsed];
    let thread = Thread::resolve(&root, &events);
    assert_eq!(thread.top_level().len(), 1);
}
