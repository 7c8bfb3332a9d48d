//! Ephemeral expiry timers for in-flight choices.
//!
//! One pending timer per (server, user). Starting a new timed flow aborts the
//! previous one. Timers are process-local and never touch game state: their
//! only effect is telling the presentation layer that a prompt went stale.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::debug;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::adventure::types::PlayerKey;

/// Window used by every timed flow unless configured otherwise.
pub const DEFAULT_SELECTION_WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimedFlow {
    StarterSelection,
    MoveSelection,
    CatchPrompt,
    PurchaseConfirmation,
}

impl fmt::Display for TimedFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TimedFlow::StarterSelection => "starter selection",
            TimedFlow::MoveSelection => "destination menu",
            TimedFlow::CatchPrompt => "wild encounter",
            TimedFlow::PurchaseConfirmation => "purchase confirmation",
        };
        f.write_str(label)
    }
}

/// Sent when a prompt expires so the UI can grey it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiredNotice {
    pub key: PlayerKey,
    pub flow: TimedFlow,
    pub prompt_id: Uuid,
}

struct PendingTimer {
    generation: u64,
    flow: TimedFlow,
    prompt_id: Uuid,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct Timers {
    next_generation: u64,
    pending: HashMap<PlayerKey, PendingTimer>,
}

/// Keyed, cancellable delayed tasks. Cheap to clone; clones share state.
#[derive(Clone, Default)]
pub struct InteractionTimeouts {
    inner: Arc<Mutex<Timers>>,
}

impl InteractionTimeouts {
    pub fn new() -> Self {
        Self::default()
    }

    fn timers(&self) -> MutexGuard<'_, Timers> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Arm a timer for `key`, replacing any pending one. Must be called from
    /// within a tokio runtime. Returns the prompt id the notice will carry.
    pub fn start<F>(&self, key: PlayerKey, flow: TimedFlow, window: Duration, on_fire: F) -> Uuid
    where
        F: FnOnce(ExpiredNotice) + Send + 'static,
    {
        let prompt_id = Uuid::new_v4();
        let mut timers = self.timers();
        timers.next_generation += 1;
        let generation = timers.next_generation;

        if let Some(previous) = timers.pending.remove(&key) {
            debug!("replacing pending {} timer for {}", previous.flow, key);
            previous.handle.abort();
        }

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            {
                let mut timers = inner.lock().unwrap_or_else(PoisonError::into_inner);
                match timers.pending.get(&key) {
                    Some(p) if p.generation == generation => {
                        timers.pending.remove(&key);
                    }
                    _ => return,
                }
            }
            on_fire(ExpiredNotice {
                key,
                flow,
                prompt_id,
            });
        });

        timers.pending.insert(
            key,
            PendingTimer {
                generation,
                flow,
                prompt_id,
                handle,
            },
        );
        prompt_id
    }

    /// Cancel the pending timer for `key` if it belongs to `flow`.
    pub fn cancel(&self, key: PlayerKey, flow: TimedFlow) -> bool {
        let mut timers = self.timers();
        match timers.pending.get(&key) {
            Some(p) if p.flow == flow => {
                if let Some(p) = timers.pending.remove(&key) {
                    p.handle.abort();
                }
                true
            }
            _ => false,
        }
    }

    /// Cancel whatever is pending for `key`.
    pub fn cancel_any(&self, key: PlayerKey) -> bool {
        match self.timers().pending.remove(&key) {
            Some(p) => {
                p.handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn pending(&self, key: PlayerKey) -> Option<(TimedFlow, Uuid)> {
        self.timers()
            .pending
            .get(&key)
            .map(|p| (p.flow, p.prompt_id))
    }

    pub fn len(&self) -> usize {
        self.timers().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn key() -> PlayerKey {
        PlayerKey::new(1, 2)
    }

    #[tokio::test(start_paused = true)]
    async fn fires_after_window() {
        let timeouts = InteractionTimeouts::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let prompt = timeouts.start(key(), TimedFlow::MoveSelection, DEFAULT_SELECTION_WINDOW, move |n| {
            let _ = tx.send(n);
        });
        tokio::time::sleep(Duration::from_secs(61)).await;
        let notice = rx.recv().await.expect("notice");
        assert_eq!(notice.prompt_id, prompt);
        assert_eq!(notice.flow, TimedFlow::MoveSelection);
        assert!(timeouts.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_skips_firing() {
        let timeouts = InteractionTimeouts::new();
        let (tx, mut rx) = mpsc::unbounded_channel::<ExpiredNotice>();
        timeouts.start(key(), TimedFlow::CatchPrompt, DEFAULT_SELECTION_WINDOW, move |n| {
            let _ = tx.send(n);
        });
        assert!(!timeouts.cancel(key(), TimedFlow::MoveSelection));
        assert!(timeouts.cancel(key(), TimedFlow::CatchPrompt));
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn new_flow_replaces_old_timer() {
        let timeouts = InteractionTimeouts::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let tx2 = tx.clone();
        timeouts.start(key(), TimedFlow::MoveSelection, DEFAULT_SELECTION_WINDOW, move |n| {
            let _ = tx.send(n);
        });
        tokio::time::sleep(Duration::from_secs(30)).await;
        let second = timeouts.start(key(), TimedFlow::PurchaseConfirmation, DEFAULT_SELECTION_WINDOW, move |n| {
            let _ = tx2.send(n);
        });
        assert_eq!(timeouts.len(), 1);
        tokio::time::sleep(Duration::from_secs(61)).await;
        let notice = rx.recv().await.expect("notice");
        assert_eq!(notice.prompt_id, second);
        assert!(rx.recv().await.is_none());
    }
}
