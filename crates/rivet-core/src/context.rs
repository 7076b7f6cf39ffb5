//! Per-event evaluation context.
//!
//! A [`Context`] is created by the dispatcher for one incoming event and
//! handed by `&mut` to every rule evaluated against that event. It bundles:
//!
//! - the event itself (shared, copy-on-write when a rule adopts fields from a
//!   follow-up event),
//! - the bot collaborator handle,
//! - a string-keyed [`State`] bag that rules write their extraction results
//!   into and handlers read afterwards.
//!
//! The state is exclusively owned by one evaluation, so no locking is needed.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut ctx = Context::new(event, bot);
//! if rule.check(&mut ctx).await {
//!     let args: &String = ctx.state().get("args").unwrap();
//! }
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::bot::BoxedBot;
use crate::error::{ExtractError, ExtractResult};
use crate::event::Event;

// =============================================================================
// State
// =============================================================================

/// String-keyed storage for values produced during one rule evaluation.
#[derive(Default)]
pub struct State {
    values: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl State {
    /// Creates an empty state bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value, replacing whatever was stored under `key`.
    pub fn insert<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.values.insert(key.into(), Box::new(value));
    }

    /// Returns the value under `key` if it exists and has type `T`.
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.values.get(key).and_then(|v| v.downcast_ref::<T>())
    }

    /// Returns a mutable reference to the value under `key` if it has type `T`.
    pub fn get_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.values.get_mut(key).and_then(|v| v.downcast_mut::<T>())
    }

    /// Like [`get`](Self::get), but reports why the value is unavailable.
    pub fn require<T: Any>(&self, key: &str) -> ExtractResult<&T> {
        let value = self
            .values
            .get(key)
            .ok_or_else(|| ExtractError::MissingState(key.to_string()))?;
        value
            .downcast_ref::<T>()
            .ok_or_else(|| ExtractError::StateTypeMismatch {
                key: key.to_string(),
                expected: std::any::type_name::<T>(),
            })
    }

    /// Returns the value under `key`, creating it with `T::default()` first if
    /// absent or of another type.
    pub fn get_or_default<T: Any + Send + Sync + Default>(&mut self, key: &str) -> &mut T {
        let slot = self
            .values
            .entry(key.to_string())
            .or_insert_with(|| Box::new(T::default()));
        if !slot.is::<T>() {
            *slot = Box::new(T::default());
        }
        // The slot was just ensured to hold a `T`.
        match slot.downcast_mut::<T>() {
            Some(value) => value,
            None => unreachable!("state slot '{key}' was reset to the requested type"),
        }
    }

    /// Removes and returns the value under `key` if it has type `T`.
    ///
    /// A value of another type is left in place.
    pub fn remove<T: Any>(&mut self, key: &str) -> Option<T> {
        if !self.values.get(key)?.is::<T>() {
            return None;
        }
        self.values
            .remove(key)
            .and_then(|v| v.downcast::<T>().ok())
            .map(|v| *v)
    }

    /// Returns `true` if anything is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the stored keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.keys().collect();
        keys.sort_unstable();
        f.debug_struct("State").field("keys", &keys).finish()
    }
}

// =============================================================================
// Context
// =============================================================================

/// The context object passed to rules during event evaluation.
pub struct Context {
    event: Arc<Event>,
    bot: BoxedBot,
    state: State,
}

impl Context {
    /// Creates a fresh context with empty state.
    pub fn new(event: impl Into<Arc<Event>>, bot: BoxedBot) -> Self {
        Self {
            event: event.into(),
            bot,
            state: State::new(),
        }
    }

    /// Returns the event being evaluated.
    pub fn event(&self) -> &Event {
        &self.event
    }

    /// Returns a shared handle to the event.
    pub fn event_arc(&self) -> Arc<Event> {
        Arc::clone(&self.event)
    }

    /// Returns a mutable event, cloning it first if it is shared.
    pub fn event_mut(&mut self) -> &mut Event {
        Arc::make_mut(&mut self.event)
    }

    /// Returns the bot handle.
    pub fn bot(&self) -> &BoxedBot {
        &self.bot
    }

    /// Returns the per-event state.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Returns the per-event state for writing.
    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    /// Consumes the context and returns its state.
    pub fn into_state(self) -> State {
        self.state
    }

    /// Returns the plain-text projection of the event's message.
    pub fn plain_text(&self) -> String {
        self.event.plain_text()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("event", &self.event)
            .field("bot", &self.bot.id())
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_typed_access() {
        let mut state = State::new();
        state.insert("args", "hello".to_string());

        assert_eq!(state.get::<String>("args").map(String::as_str), Some("hello"));
        assert!(state.get::<i64>("args").is_none());
        assert!(matches!(
            state.require::<i64>("args"),
            Err(ExtractError::StateTypeMismatch { .. })
        ));
        assert!(matches!(
            state.require::<String>("missing"),
            Err(ExtractError::MissingState(_))
        ));
    }

    #[test]
    fn test_state_get_or_default_is_lazy() {
        let mut state = State::new();
        assert!(!state.contains("list"));

        state.get_or_default::<Vec<u32>>("list").push(1);
        state.get_or_default::<Vec<u32>>("list").push(2);
        assert_eq!(state.get::<Vec<u32>>("list"), Some(&vec![1, 2]));
    }

    #[test]
    fn test_state_remove_keeps_other_types() {
        let mut state = State::new();
        state.insert("k", 5_i64);
        assert_eq!(state.remove::<String>("k"), None);
        assert_eq!(state.remove::<i64>("k"), Some(5));
        assert!(state.is_empty());
    }
}
