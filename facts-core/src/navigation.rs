//! View routing.
//!
//! The app is a stack of routes: home at the bottom, the feed above it, and
//! at most one tutor view on top of the feed.

/// A view the app can show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Title screen; the feed's parent.
    Home,
    /// The facts feed.
    Feed,
    /// Tutor view for one topic.
    Tutor { topic: String },
}

/// Effect of a navigation call the caller has to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// A new feed mount should start.
    MountFeed,
    /// The feed mount ended.
    UnmountFeed,
    OpenTutor { topic: String },
    CloseTutor,
    /// Dismissed the root view.
    Exit,
    None,
}

/// Route stack.
#[derive(Debug, Clone)]
pub struct Navigator {
    stack: Vec<Route>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            stack: vec![Route::Home],
        }
    }

    pub fn current(&self) -> &Route {
        // The stack is never empty: home cannot be popped.
        self.stack.last().unwrap_or(&Route::Home)
    }

    #[cfg(test)]
    fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Open the feed from home.
    pub fn open_feed(&mut self) -> Transition {
        match self.current() {
            Route::Home => {
                self.stack.push(Route::Feed);
                tracing::info!("navigate: feed");
                Transition::MountFeed
            }
            _ => Transition::None,
        }
    }

    /// Open the tutor for a card's topic. Only valid from the feed.
    pub fn open_tutor(&mut self, topic: impl Into<String>) -> Transition {
        if self.current() != &Route::Feed {
            return Transition::None;
        }
        let topic = topic.into();
        tracing::info!(%topic, "navigate: tutor");
        self.stack.push(Route::Tutor {
            topic: topic.clone(),
        });
        Transition::OpenTutor { topic }
    }

    /// Return to the parent view.
    pub fn dismiss(&mut self) -> Transition {
        if self.stack.len() <= 1 {
            return Transition::Exit;
        }
        let transition = match self.stack.pop() {
            Some(Route::Feed) => Transition::UnmountFeed,
            Some(Route::Tutor { .. }) => Transition::CloseTutor,
            _ => Transition::None,
        };
        tracing::info!(route = ?self.current(), "navigate: back");
        transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_round_trip() {
        let mut nav = Navigator::new();
        assert_eq!(nav.open_feed(), Transition::MountFeed);
        assert_eq!(
            nav.open_tutor("Comets"),
            Transition::OpenTutor {
                topic: "Comets".to_string()
            }
        );
        assert_eq!(
            nav.current(),
            &Route::Tutor {
                topic: "Comets".to_string()
            }
        );

        assert_eq!(nav.dismiss(), Transition::CloseTutor);
        assert_eq!(nav.current(), &Route::Feed);
        assert_eq!(nav.dismiss(), Transition::UnmountFeed);
        assert_eq!(nav.current(), &Route::Home);
        assert_eq!(nav.dismiss(), Transition::Exit);
        assert_eq!(nav.depth(), 1);
    }

    #[test]
    fn test_invalid_transitions_ignored() {
        let mut nav = Navigator::new();
        assert_eq!(nav.open_tutor("Comets"), Transition::None);

        let mut nav = Navigator::new();
        nav.open_feed();
        assert_eq!(nav.open_feed(), Transition::None);
        nav.open_tutor("Comets");
        assert_eq!(nav.open_tutor("Other"), Transition::None);
        assert_eq!(nav.depth(), 3);
    }
}
