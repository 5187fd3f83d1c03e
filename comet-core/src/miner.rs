//! Proof-of-work mining (NIP-13)
//!
//! Mining permutes a nonce tag on an unsigned draft until the canonical
//! hash shows the target number of leading zero bits. The search is a
//! long CPU-bound loop, so it is modeled as an explicit state machine
//! advanced in bounded batches: any scheduler can drive [`Miner::step`]
//! directly, and [`mine`] drives it on the caller's async task, yielding
//! between batches so progress reporting and cancellation stay responsive.

use crate::error::Result;
use crate::event::{Tag, UnsignedEvent};
use crate::hash::EventHasher;
use crate::pow::leading_zero_bits;
use std::time::{Duration, Instant};
use tracing::debug;

/// Upper bound on attempts before a search reports [`MinerOutcome::Exhausted`].
///
/// A fixed ceiling rather than a knob: an exhausted search is restarted
/// explicitly, typically with a lower target.
pub const MAX_ATTEMPTS: u64 = 1_000_000;

/// Attempts per batch for the async driver.
pub const DEFAULT_BATCH: u64 = 10_000;

/// The lifecycle of a mining search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinerState {
    /// Constructed, no attempts made yet.
    Idle,
    /// Attempts made, no terminal outcome yet.
    Mining,
    /// A nonce meeting the target was found.
    Found,
    /// The attempt ceiling was reached without meeting the target.
    Exhausted,
    /// The caller abandoned the search.
    Aborted,
}

/// Terminal result of a mining search.
///
/// `Exhausted` and `Aborted` are ordinary outcomes, distinguishable
/// from each other and from hard errors (which only the hash
/// collaborator can produce).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MinerOutcome {
    /// Search succeeded; carries the winning candidate.
    Found(Solution),
    /// Ceiling reached. Restart with a lower target or accept no PoW.
    Exhausted,
    /// Abandoned via [`Miner::abort`].
    Aborted,
}

/// A winning candidate: the nonce, the id it produced, and the draft
/// carrying the nonce tag, ready for signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// The nonce that met the target.
    pub nonce: u64,
    /// The resulting event id (lowercase hex).
    pub id: String,
    /// Achieved difficulty; at least the target, possibly more.
    pub difficulty: u32,
    /// The unsigned event with the winning nonce tag in place.
    pub event: UnsignedEvent,
}

/// Snapshot of a running search, safe to sample at any batch boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinerProgress {
    /// Attempts made so far.
    pub attempts: u64,
    /// Best difficulty seen so far.
    pub best_difficulty: u32,
    /// Wall-clock time since the miner was constructed.
    pub elapsed: Duration,
}

/// Nonce search over an unsigned draft.
///
/// The candidate for nonce `n` is the draft's tags with a single
/// `["nonce", "<n>", "<target>"]` tag appended; any other tags on the
/// draft are preserved. Pre-existing nonce tags are stripped on
/// construction so a re-mined draft does not accumulate them.
///
/// # Example
///
/// ```
/// use comet_core::{CanonicalHasher, EventBuilder, Miner, MinerOutcome};
///
/// let draft = EventBuilder::new()
///     .pubkey("a".repeat(64))
///     .created_at(1700000000)
///     .kind(1)
///     .content("gm")
///     .build_unsigned();
///
/// let mut miner = Miner::new(draft, 0, CanonicalHasher);
/// // Target 0 is met by the very first attempt
/// match miner.step(1)? {
///     Some(MinerOutcome::Found(solution)) => assert_eq!(solution.nonce, 0),
///     other => panic!("expected Found, got {:?}", other),
/// }
/// # Ok::<(), comet_core::Error>(())
/// ```
pub struct Miner<H: EventHasher> {
    candidate: UnsignedEvent,
    target: u32,
    hasher: H,
    nonce: u64,
    best: u32,
    started: Instant,
    outcome: Option<MinerOutcome>,
}

impl<H: EventHasher> Miner<H> {
    /// Set up a search for `target` leading zero bits over `draft`.
    pub fn new(draft: UnsignedEvent, target: u32, hasher: H) -> Self {
        let mut candidate = draft;
        candidate.tags.retain(|tag| tag.name() != Some("nonce"));
        candidate.tags.push(Tag::new([
            "nonce".to_string(),
            "0".to_string(),
            target.to_string(),
        ]));

        Self {
            candidate,
            target,
            hasher,
            nonce: 0,
            best: 0,
            started: Instant::now(),
            outcome: None,
        }
    }

    /// The target difficulty this search is committed to.
    pub fn target(&self) -> u32 {
        self.target
    }

    /// Current lifecycle state.
    pub fn state(&self) -> MinerState {
        match &self.outcome {
            Some(MinerOutcome::Found(_)) => MinerState::Found,
            Some(MinerOutcome::Exhausted) => MinerState::Exhausted,
            Some(MinerOutcome::Aborted) => MinerState::Aborted,
            None if self.nonce == 0 => MinerState::Idle,
            None => MinerState::Mining,
        }
    }

    /// Progress snapshot; valid in any state.
    pub fn progress(&self) -> MinerProgress {
        MinerProgress {
            attempts: self.nonce,
            best_difficulty: self.best,
            elapsed: self.started.elapsed(),
        }
    }

    /// Abandon the search. No-op once a terminal outcome exists.
    pub fn abort(&mut self) {
        if self.outcome.is_none() {
            self.outcome = Some(MinerOutcome::Aborted);
        }
    }

    /// Advance the search by at most `attempts` candidates.
    ///
    /// Returns `Ok(None)` while the search is still running, or the
    /// terminal outcome once one exists. Calling `step` after a
    /// terminal outcome returns that same outcome without further work.
    /// The only `Err` is a failure from the hash collaborator.
    pub fn step(&mut self, attempts: u64) -> Result<Option<MinerOutcome>> {
        if let Some(outcome) = &self.outcome {
            return Ok(Some(outcome.clone()));
        }

        for _ in 0..attempts {
            self.write_nonce();

            let id = self.hasher.hash(&self.candidate)?;
            let difficulty = leading_zero_bits(&id);
            self.best = self.best.max(difficulty);

            if difficulty >= self.target {
                debug!(nonce = self.nonce, difficulty, "nonce found");
                let solution = Solution {
                    nonce: self.nonce,
                    id,
                    difficulty,
                    event: self.candidate.clone(),
                };
                self.nonce += 1;
                let outcome = MinerOutcome::Found(solution);
                self.outcome = Some(outcome.clone());
                return Ok(Some(outcome));
            }

            self.nonce += 1;
            if self.nonce >= MAX_ATTEMPTS {
                debug!(attempts = self.nonce, "attempt ceiling reached");
                self.outcome = Some(MinerOutcome::Exhausted);
                return Ok(Some(MinerOutcome::Exhausted));
            }
        }

        Ok(None)
    }

    fn write_nonce(&mut self) {
        if let Some(slot) = self
            .candidate
            .tags
            .last_mut()
            .and_then(|tag| tag.0.get_mut(1))
        {
            *slot = self.nonce.to_string();
        }
    }
}

/// Drive a miner to a terminal outcome, yielding between batches.
///
/// `on_progress` is called once per batch. Cancellation is cooperative:
/// racing this future against a stop signal (`tokio::select!`) abandons
/// the search at a batch boundary, and no partial state survives the
/// dropped future. Drivers that need an explicit
/// [`MinerOutcome::Aborted`] call [`Miner::abort`] between their own
/// [`Miner::step`] calls instead.
pub async fn mine<H, F>(miner: &mut Miner<H>, batch: u64, mut on_progress: F) -> Result<MinerOutcome>
where
    H: EventHasher,
    F: FnMut(MinerProgress),
{
    loop {
        let outcome = miner.step(batch)?;
        on_progress(miner.progress());

        if let Some(outcome) = outcome {
            return Ok(outcome);
        }

        tokio::task::yield_now().await;
    }
}
