//! Card paging and last-card visibility tracking.
//!
//! The feed shows one card per screen. [`Pager`] snaps between cards and
//! [`LastCardObserver`] plays the role of a viewport intersection observer
//! bound to the last loaded card: it reports when that card *enters* view,
//! including right after being attached to a card that is already on
//! screen.

/// Snap paging over a list of cards.
#[derive(Debug, Clone, Default)]
pub struct Pager {
    current: usize,
}

impl Pager {
    pub fn current(&self) -> usize {
        self.current
    }

    /// Move one card down, staying on the last card of `len`.
    pub fn next(&mut self, len: usize) {
        if self.current + 1 < len {
            self.current += 1;
        }
    }

    /// Move one card up.
    pub fn prev(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    /// Jump to `index`, clamped to `len`.
    pub fn jump(&mut self, index: usize, len: usize) {
        self.current = index.min(len.saturating_sub(1));
    }
}

/// A single live subscription on the last card.
#[derive(Debug, Clone, Default)]
pub struct LastCardObserver {
    target: Option<usize>,
    visible: Option<usize>,
    pending: bool,
}

impl LastCardObserver {
    /// Card the subscription is attached to.
    pub fn target(&self) -> Option<usize> {
        self.target
    }

    /// Attach to `index`. Re-observing the same card keeps the existing
    /// subscription. A new subscription whose card is already visible
    /// queues an entry immediately.
    pub fn observe(&mut self, index: usize) {
        if self.target == Some(index) {
            return;
        }
        if let Some(old) = self.target {
            tracing::debug!(old, new = index, "last-card observer moved");
        }
        self.target = Some(index);
        if self.visible == Some(index) {
            self.pending = true;
        }
    }

    /// Drop the subscription.
    pub fn disconnect(&mut self) {
        self.target = None;
        self.pending = false;
    }

    /// Record that `index` is now the card on screen. Queues an entry when
    /// the observed card comes into view.
    pub fn set_visible(&mut self, index: usize) {
        if self.visible == Some(index) {
            return;
        }
        self.visible = Some(index);
        if self.target == Some(index) {
            self.pending = true;
        }
    }

    /// Consume a queued entry.
    pub fn take_entry(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pager_clamps() {
        let mut pager = Pager::default();
        pager.prev();
        assert_eq!(pager.current(), 0);

        pager.next(3);
        pager.next(3);
        pager.next(3);
        assert_eq!(pager.current(), 2);

        pager.jump(10, 3);
        assert_eq!(pager.current(), 2);
        pager.jump(1, 3);
        assert_eq!(pager.current(), 1);
        pager.jump(4, 0);
        assert_eq!(pager.current(), 0);
    }

    #[test]
    fn test_observer_fires_on_entry_only() {
        let mut observer = LastCardObserver::default();
        observer.set_visible(0);
        observer.observe(2);
        assert!(!observer.take_entry());

        observer.set_visible(1);
        assert!(!observer.take_entry());
        observer.set_visible(2);
        assert!(observer.take_entry());

        // Staying on the card is not a new entry.
        observer.set_visible(2);
        assert!(!observer.take_entry());
    }

    #[test]
    fn test_observer_fires_when_attached_to_visible_card() {
        let mut observer = LastCardObserver::default();
        observer.set_visible(0);
        observer.observe(0);
        assert!(observer.take_entry());
        assert_eq!(observer.target(), Some(0));

        // Same card again keeps the subscription and does not re-fire.
        observer.observe(0);
        assert!(!observer.take_entry());
        assert_eq!(observer.target(), Some(0));
    }

    #[test]
    fn test_replacing_target_disconnects_old() {
        let mut observer = LastCardObserver::default();
        observer.set_visible(0);
        observer.observe(1);
        observer.observe(4);
        assert_eq!(observer.target(), Some(4));

        observer.set_visible(1);
        assert!(!observer.take_entry(), "old target no longer observed");

        observer.disconnect();
        observer.set_visible(4);
        assert!(!observer.take_entry());
    }
}
