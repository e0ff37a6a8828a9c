// ── Per-collection load status ──
//
// Every entity collection carries one of these alongside its contents, so
// views can render loading spinners and scoped, retry-capable error banners
// without a global "is the app ready" flag.

use std::fmt;

use tokio::sync::watch;

/// Load status of one entity collection.
///
/// Lifecycle: `Idle → Loading → Succeeded | Failed`. A failed stage leaves
/// its dependents at their previous status -- a collection that never got
/// to run stays `Idle`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CollectionStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    /// The fetch failed; carries the captured error message for the banner.
    Failed(String),
}

impl CollectionStatus {
    /// Whether the fetch has finished, one way or the other.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    /// The captured failure message, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

impl fmt::Display for CollectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Loading => f.write_str("loading"),
            Self::Succeeded => f.write_str("succeeded"),
            Self::Failed(_) => f.write_str("failed"),
        }
    }
}

/// Observable holder for a [`CollectionStatus`].
pub(crate) struct StatusCell {
    tx: watch::Sender<CollectionStatus>,
}

impl StatusCell {
    pub(crate) fn new() -> Self {
        let (tx, _) = watch::channel(CollectionStatus::Idle);
        Self { tx }
    }

    pub(crate) fn set(&self, status: CollectionStatus) {
        self.tx.send_modify(|s| *s = status);
    }

    pub(crate) fn get(&self) -> CollectionStatus {
        self.tx.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<CollectionStatus> {
        self.tx.subscribe()
    }

    pub(crate) fn reset(&self) {
        self.set(CollectionStatus::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_starts_idle() {
        let cell = StatusCell::new();
        assert_eq!(cell.get(), CollectionStatus::Idle);
        assert!(!cell.get().is_settled());
    }

    #[test]
    fn failed_carries_its_message() {
        let cell = StatusCell::new();
        cell.set(CollectionStatus::Failed("HTTP 500".into()));
        let status = cell.get();
        assert!(status.is_settled());
        assert!(status.is_failed());
        assert_eq!(status.error(), Some("HTTP 500"));
    }

    #[test]
    fn subscribers_see_transitions() {
        let cell = StatusCell::new();
        let rx = cell.subscribe();
        cell.set(CollectionStatus::Loading);
        assert_eq!(*rx.borrow(), CollectionStatus::Loading);
    }

    #[test]
    fn reset_returns_to_idle() {
        let cell = StatusCell::new();
        cell.set(CollectionStatus::Succeeded);
        cell.reset();
        assert_eq!(cell.get(), CollectionStatus::Idle);
    }
}
