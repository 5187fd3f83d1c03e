//! Comet Core Library
//!
//! This library provides the algorithmic core of a Nostr client:
//! resolving kind-1111 comment threads (NIP-22) and scoring and mining
//! proof of work on event ids (NIP-13).
//!
//! # Features
//!
//! - Event model with the protocol's kind classification (regular /
//!   replaceable / addressable)
//! - Typed subject references with root/reply tag production, matching,
//!   and comment drafting
//! - Thread resolution over flat relay result sets, cycle-safe, with
//!   indexed reply lookups
//! - Leading-zero-bit PoW scoring with display helpers
//! - Cooperative nonce mining behind a pluggable hash seam
//! - Relay filter construction for fetching comment sets
//! - Serde support for the wire JSON shape, plus `Display` and a fluent
//!   builder
//!
//! # Examples
//!
//! ## Resolving a thread
//!
//! ```
//! use comet_core::{EventBuilder, SubjectRef, Thread};
//!
//! let note = EventBuilder::new()
//!     .id("a".repeat(64))
//!     .pubkey("b".repeat(64))
//!     .kind(1)
//!     .build();
//! let root = SubjectRef::from_event(&note);
//!
//! let comments: Vec<comet_core::Event> = vec![/* relay query results */];
//! let thread = Thread::resolve(&root, &comments);
//! assert!(thread.top_level().is_empty());
//! ```
//!
//! ## Mining a note
//!
//! ```no_run
//! use comet_core::{CanonicalHasher, EventBuilder, Miner, MinerOutcome, miner};
//!
//! # async fn run() -> comet_core::Result<()> {
//! let draft = EventBuilder::new()
//!     .pubkey("a".repeat(64))
//!     .created_at(1700000000)
//!     .kind(1)
//!     .content("mined note")
//!     .build_unsigned();
//!
//! let mut search = Miner::new(draft, 16, CanonicalHasher);
//! match miner::mine(&mut search, miner::DEFAULT_BATCH, |_| {}).await? {
//!     MinerOutcome::Found(solution) => println!("{}", solution.id),
//!     MinerOutcome::Exhausted => println!("no luck, lower the target"),
//!     MinerOutcome::Aborted => {}
//! }
//! # Ok(())
//! # }
//! ```

// Public modules
pub mod address;
pub mod builder;
pub mod conversion;
pub mod display;
pub mod error;
pub mod event;
pub mod hash;
pub mod miner;
pub mod pow;
pub mod query;
pub mod thread;

// Re-export commonly used types and functions
pub use address::{SubjectRef, draft_comment};
pub use builder::EventBuilder;
pub use error::{Error, Result};
pub use event::{COMMENT_KIND, Event, KindClass, Tag, UnsignedEvent, validate_shape};
pub use hash::{CanonicalHasher, EventHasher};
pub use miner::{MAX_ATTEMPTS, Miner, MinerOutcome, MinerProgress, MinerState, Solution, mine};
pub use pow::{DifficultyTier, declared_target, format_difficulty, leading_zero_bits};
pub use query::CommentFilter;
pub use thread::Thread;
