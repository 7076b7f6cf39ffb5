//! Waiting for a follow-up event.
//!
//! A rule that needs more input (say, a picture the user forgot to attach)
//! registers a [`FutureEvent`] with the shared [`FutureEvents`] registry and
//! awaits the returned [`Pending`]. The dispatcher offers every incoming event
//! to the registry through [`FutureEvents::deliver`] before running normal
//! handlers.
//!
//! Each waiter is claimed at most once. Claiming (removing the waiter and
//! handing it the context) and retiring after a timeout both happen under the
//! registry lock, so an event that arrives as the timer fires is either
//! delivered to the waiter or not offered to it at all, never lost in
//! between.
//!
//! ```rust,ignore
//! let pending = futures.register(
//!     FutureEvent::new("message", 999, true)
//!         .rule(check_session(ctx.event()))
//!         .rule(has_picture),
//! );
//! bot.send(ctx.event(), "send a picture".into()).await?;
//! match pending.next(Duration::from_secs(120)).await {
//!     Ok(next) => { /* use next.state() */ }
//!     Err(WaitError::Timeout) => { /* give up */ }
//!     Err(WaitError::Closed) => { /* shutting down */ }
//! }
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use rivet_core::{BoxedBot, Context, Event};
use tokio::sync::oneshot;
use tracing::{debug, trace};

use crate::error::WaitError;
use crate::rule::{BoxedRule, Rule, check_all};

/// Description of the event a rule is waiting for.
pub struct FutureEvent {
    kind: String,
    priority: i32,
    block: bool,
    rules: Vec<BoxedRule>,
}

impl FutureEvent {
    /// Waits for events whose type matches `kind` (`post[/detail[/sub]]`).
    ///
    /// Waiters with a lower `priority` are offered an event first. A `block`ing
    /// waiter that claims an event stops it from reaching other waiters and
    /// normal handlers.
    pub fn new(kind: impl Into<String>, priority: i32, block: bool) -> Self {
        Self {
            kind: kind.into(),
            priority,
            block,
            rules: Vec::new(),
        }
    }

    /// Adds a rule the follow-up event must pass.
    pub fn rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Adds an already boxed rule.
    pub fn boxed_rule(mut self, rule: BoxedRule) -> Self {
        self.rules.push(rule);
        self
    }
}

impl fmt::Debug for FutureEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FutureEvent")
            .field("kind", &self.kind)
            .field("priority", &self.priority)
            .field("block", &self.block)
            .field("rules", &self.rules.len())
            .finish()
    }
}

struct Waiter {
    id: u64,
    kind: String,
    priority: i32,
    block: bool,
    rules: Arc<[BoxedRule]>,
    slot: oneshot::Sender<Context>,
}

/// Snapshot of a waiter taken so its rules can run outside the lock.
struct Candidate {
    id: u64,
    priority: i32,
    block: bool,
    rules: Arc<[BoxedRule]>,
}

#[derive(Default)]
struct Registry {
    next_id: AtomicU64,
    waiters: Mutex<Vec<Waiter>>,
}

impl Registry {
    /// Removes the waiter and hands it `ctx`. Returns `false` if the waiter
    /// is gone.
    fn claim(&self, id: u64, ctx: Context) -> bool {
        let mut waiters = self.waiters.lock();
        let Some(index) = waiters.iter().position(|w| w.id == id) else {
            return false;
        };
        let waiter = waiters.swap_remove(index);
        waiter.slot.send(ctx).is_ok()
    }

    /// Removes the waiter. Returns `false` if it was already claimed.
    fn retire(&self, id: u64) -> bool {
        let mut waiters = self.waiters.lock();
        match waiters.iter().position(|w| w.id == id) {
            Some(index) => {
                waiters.swap_remove(index);
                true
            }
            None => false,
        }
    }
}

/// Shared registry of pending follow-up waits.
#[derive(Clone, Default)]
pub struct FutureEvents {
    registry: Arc<Registry>,
}

impl FutureEvents {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a waiter.
    ///
    /// The waiter can be claimed from this point on, so register before
    /// prompting the user.
    pub fn register(&self, event: FutureEvent) -> Pending {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        let (slot, receiver) = oneshot::channel();
        trace!(id, kind = %event.kind, priority = event.priority, "future event registered");
        self.registry.waiters.lock().push(Waiter {
            id,
            kind: event.kind,
            priority: event.priority,
            block: event.block,
            rules: event.rules.into(),
            slot,
        });
        Pending {
            id,
            registry: Arc::clone(&self.registry),
            receiver,
        }
    }

    /// Offers an incoming event to the waiters.
    ///
    /// Waiters whose kind matches are tried in ascending priority order, each
    /// on a fresh [`Context`]. Every waiter whose rules pass is claimed and
    /// receives its context; a blocking waiter ends the offer. Returns `true`
    /// if a blocking waiter claimed the event, in which case the dispatcher
    /// should not run normal handlers for it.
    pub async fn deliver(&self, event: impl Into<Arc<Event>>, bot: BoxedBot) -> bool {
        let event = event.into();
        let mut candidates: Vec<Candidate> = self
            .registry
            .waiters
            .lock()
            .iter()
            .filter(|w| event.matches_type(&w.kind))
            .map(|w| Candidate {
                id: w.id,
                priority: w.priority,
                block: w.block,
                rules: Arc::clone(&w.rules),
            })
            .collect();
        candidates.sort_by_key(|c| c.priority);

        for candidate in candidates {
            let mut ctx = Context::new(Arc::clone(&event), Arc::clone(&bot));
            if !check_all(&candidate.rules, &mut ctx).await {
                continue;
            }
            if !self.registry.claim(candidate.id, ctx) {
                continue;
            }
            debug!(id = candidate.id, block = candidate.block, "future event delivered");
            if candidate.block {
                return true;
            }
        }
        false
    }

    /// Number of registered waiters.
    pub fn len(&self) -> usize {
        self.registry.waiters.lock().len()
    }

    /// Returns `true` if nobody is waiting.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every waiter; their [`Pending::next`] calls end with
    /// [`WaitError::Closed`].
    pub fn clear(&self) {
        self.registry.waiters.lock().clear();
    }
}

impl fmt::Debug for FutureEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FutureEvents")
            .field("waiters", &self.len())
            .finish()
    }
}

/// Handle to a registered waiter.
///
/// Dropping it retires the waiter.
pub struct Pending {
    id: u64,
    registry: Arc<Registry>,
    receiver: oneshot::Receiver<Context>,
}

impl Pending {
    /// Waits up to `timeout` for a delivery.
    pub async fn next(mut self, timeout: Duration) -> Result<Context, WaitError> {
        match tokio::time::timeout(timeout, &mut self.receiver).await {
            Ok(Ok(ctx)) => Ok(ctx),
            Ok(Err(_)) => Err(WaitError::Closed),
            Err(_) => {
                if let Some(ctx) = self.retire_or_take() {
                    return Ok(ctx);
                }
                debug!(id = self.id, ?timeout, "future event timed out");
                Err(WaitError::Timeout)
            }
        }
    }

    /// Retires the waiter once the timer has fired. A waiter claimed before
    /// the lock was taken already has its context in the slot.
    fn retire_or_take(&mut self) -> Option<Context> {
        if self.registry.retire(self.id) {
            return None;
        }
        self.receiver.try_recv().ok()
    }
}

impl Drop for Pending {
    fn drop(&mut self) {
        self.registry.retire(self.id);
    }
}

impl fmt::Debug for Pending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pending").field("id", &self.id).finish()
    }
}
