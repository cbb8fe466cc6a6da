//! Feed state machine.
//!
//! A [`Feed`] is one mount of the facts view. It owns the loaded facts, the
//! fetch status and the last-card observer, and hands out [`FetchTicket`]s
//! describing the fetches the caller should run. Fetching itself happens
//! elsewhere; results come back through [`Feed::apply`].
//!
//! ```text
//! Loading ──initial result──▶ Success ──last card visible──▶ FetchingMore
//!                                ▲                               │
//!                                └───────── any result ──────────┘
//! ```

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::FactsConfig;
use crate::fact::{fallback_fact, Fact};
use crate::viewport::{LastCardObserver, Pager};

static NEXT_MOUNT: AtomicU64 = AtomicU64::new(1);

/// Identity of one feed mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MountId(u64);

impl MountId {
    fn next() -> Self {
        Self(NEXT_MOUNT.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for MountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "mount-{}", self.0)
    }
}

/// Whether a fetch is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedStatus {
    /// Initial batch requested, nothing to show yet.
    #[default]
    Loading,
    /// Idle; an incremental fetch may start.
    Success,
    /// An incremental fetch is in flight.
    FetchingMore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Initial,
    More,
}

/// A fetch the feed wants run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub mount: MountId,
    pub kind: FetchKind,
    pub count: usize,
}

/// What [`Feed::apply`] did with a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Initial batch installed. `fallback` is set when the static fact was
    /// substituted for an empty batch.
    Initial { loaded: usize, fallback: bool },
    /// Incremental batch appended after de-duplication.
    More { appended: usize, duplicates: usize },
    /// Ticket belongs to another mount or doesn't match the current status.
    Stale,
}

/// One mount of the facts feed.
#[derive(Debug)]
pub struct Feed {
    mount: MountId,
    facts: Vec<Fact>,
    seen: HashSet<String>,
    status: FeedStatus,
    initial_requested: bool,
    initial_batch: usize,
    batch_size: usize,
    pager: Pager,
    observer: LastCardObserver,
    mounted: bool,
}

impl Feed {
    /// Mount a new, empty feed.
    pub fn new(config: &FactsConfig) -> Self {
        let mount = MountId::next();
        tracing::info!(%mount, "feed mounted");
        Self {
            mount,
            facts: Vec::new(),
            seen: HashSet::new(),
            status: FeedStatus::Loading,
            initial_requested: false,
            initial_batch: config.initial_batch.max(1),
            batch_size: config.batch_size.max(1),
            pager: Pager::default(),
            observer: LastCardObserver::default(),
            mounted: true,
        }
    }

    /// Tear the mount down: the observer disconnects and results still in
    /// flight come back stale.
    pub fn unmount(&mut self) {
        if std::mem::replace(&mut self.mounted, false) {
            tracing::info!(mount = %self.mount, "feed unmounted");
            self.observer.disconnect();
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn mount(&self) -> MountId {
        self.mount
    }

    pub fn status(&self) -> FeedStatus {
        self.status
    }

    pub fn facts(&self) -> &[Fact] {
        &self.facts
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Index of the card currently filling the screen.
    pub fn current_index(&self) -> usize {
        self.pager.current()
    }

    pub fn current(&self) -> Option<&Fact> {
        self.facts.get(self.pager.current())
    }

    /// Card index the last-card observer is attached to.
    pub fn observed_card(&self) -> Option<usize> {
        self.observer.target()
    }

    /// Request the initial batch.
    ///
    /// Returns a ticket the first time only; repeated calls during the same
    /// mount are no-ops.
    pub fn begin_initial_load(&mut self) -> Option<FetchTicket> {
        if self.initial_requested {
            tracing::debug!(mount = %self.mount, "duplicate initial load ignored");
            return None;
        }
        self.initial_requested = true;
        Some(self.ticket(FetchKind::Initial, self.initial_batch))
    }

    /// Request an incremental batch.
    ///
    /// Only starts a fetch when the feed is idle (`Success`).
    pub fn request_more(&mut self) -> Option<FetchTicket> {
        if self.status != FeedStatus::Success {
            tracing::debug!(mount = %self.mount, status = ?self.status, "fetch more skipped");
            return None;
        }
        self.status = FeedStatus::FetchingMore;
        Some(self.ticket(FetchKind::More, self.batch_size))
    }

    /// Route a batch to the right completion handler.
    pub fn apply(&mut self, ticket: FetchTicket, facts: Vec<Fact>) -> Applied {
        if !self.mounted || ticket.mount != self.mount {
            tracing::debug!(mount = %self.mount, stale = %ticket.mount, "dropping result for other mount");
            return Applied::Stale;
        }
        match (ticket.kind, self.status) {
            (FetchKind::Initial, FeedStatus::Loading) => self.complete_initial_load(facts),
            (FetchKind::More, FeedStatus::FetchingMore) => self.complete_more(facts),
            (kind, status) => {
                tracing::warn!(mount = %self.mount, ?kind, ?status, "result does not match feed status");
                Applied::Stale
            }
        }
    }

    /// Install the initial batch, falling back to the static fact when empty.
    pub fn complete_initial_load(&mut self, facts: Vec<Fact>) -> Applied {
        let loaded = self.append_unique(facts).0;
        let fallback = loaded == 0;
        if fallback {
            tracing::warn!(mount = %self.mount, "initial fetch returned nothing, showing fallback");
            self.append_unique(vec![fallback_fact()]);
        }
        self.status = FeedStatus::Success;
        self.reattach_observer();
        Applied::Initial {
            loaded: self.facts.len(),
            fallback,
        }
    }

    /// Append an incremental batch. Status returns to `Success` whatever the
    /// batch held.
    pub fn complete_more(&mut self, facts: Vec<Fact>) -> Applied {
        let (appended, duplicates) = self.append_unique(facts);
        self.status = FeedStatus::Success;
        self.reattach_observer();
        tracing::info!(mount = %self.mount, appended, duplicates, total = self.facts.len(), "batch appended");
        Applied::More {
            appended,
            duplicates,
        }
    }

    /// Append facts whose text isn't already held. Returns
    /// `(appended, dropped)`.
    pub fn append_unique(&mut self, batch: Vec<Fact>) -> (usize, usize) {
        let mut appended = 0;
        let mut dropped = 0;
        for fact in batch {
            if self.seen.insert(fact.fact.clone()) {
                self.facts.push(fact);
                appended += 1;
            } else {
                dropped += 1;
            }
        }
        (appended, dropped)
    }

    /// Page to the next card. Returns a ticket if the card that came into
    /// view is the observed last card and the feed is idle.
    pub fn next_card(&mut self) -> Option<FetchTicket> {
        self.pager.next(self.facts.len());
        self.show_current()
    }

    pub fn prev_card(&mut self) -> Option<FetchTicket> {
        self.pager.prev();
        self.show_current()
    }

    /// Jump to a card, clamped to the loaded range.
    pub fn jump_to(&mut self, index: usize) -> Option<FetchTicket> {
        self.pager.jump(index, self.facts.len());
        self.show_current()
    }

    /// Deliver a queued last-card entry, if any.
    ///
    /// Entries queue when the observed card scrolls into view and when the
    /// observer is attached to a card that is already on screen. The entry is
    /// consumed even if the feed is busy, so a busy feed simply ignores it.
    pub fn poll_observer(&mut self) -> Option<FetchTicket> {
        if self.observer.take_entry() {
            self.request_more()
        } else {
            None
        }
    }

    fn show_current(&mut self) -> Option<FetchTicket> {
        if self.facts.is_empty() {
            return None;
        }
        self.observer.set_visible(self.pager.current());
        self.poll_observer()
    }

    fn reattach_observer(&mut self) {
        if let Some(last) = self.facts.len().checked_sub(1) {
            self.observer.observe(last);
            self.observer.set_visible(self.pager.current());
        }
    }

    fn ticket(&self, kind: FetchKind, count: usize) -> FetchTicket {
        FetchTicket {
            mount: self.mount,
            kind,
            count,
        }
    }
}
