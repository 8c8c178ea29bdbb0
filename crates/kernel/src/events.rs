//! Synchronous event bus.
//!
//! Listeners run in registration order. Events emitted by a listener are
//! queued and dispatched only after every listener for the current event has
//! returned, so each handler runs to completion before the next one starts.

use std::collections::VecDeque;
use std::fmt;

use tracing::trace;

/// Events exchanged between a filter block and the list it drives.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockEvent {
    /// A filter control committed a new value.
    Change { filter: String, input: FilterInput },
    /// A slider moved but has not been released.
    Input { filter: String, input: FilterInput },
    /// Request a filter pass followed by a list re-render.
    RenderFilters,
}

/// Raw user input carried by `Change` and `Input` events.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterInput {
    /// A checkbox option was ticked or cleared.
    Toggle { option: String, checked: bool },
    /// A dropdown or text control now holds this value (empty clears).
    Value(String),
    /// A slider handle position.
    Range { low: f64, high: f64 },
    /// A slider handle was released at its current position.
    Release,
}

/// Queue handed to listeners for follow-up events.
pub struct Emitter<E> {
    queue: VecDeque<E>,
}

impl<E> Emitter<E> {
    /// Queue an event to run after the current one completes.
    pub fn emit(&mut self, event: E) {
        self.queue.push_back(event);
    }
}

type Listener<C, E> = Box<dyn Fn(&mut C, &E, &mut Emitter<E>) + Send + Sync>;

/// Ordered list of listeners over a shared context `C`.
pub struct EventBus<C, E> {
    listeners: Vec<(String, Listener<C, E>)>,
}

impl<C, E: fmt::Debug> EventBus<C, E> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Register a listener. `name` is used only for tracing.
    pub fn subscribe<F>(&mut self, name: &str, listener: F)
    where
        F: Fn(&mut C, &E, &mut Emitter<E>) + Send + Sync + 'static,
    {
        self.listeners.push((name.to_string(), Box::new(listener)));
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Dispatch `event` and everything it transitively emits.
    ///
    /// Returns the number of events processed.
    pub fn dispatch(&self, ctx: &mut C, event: E) -> usize {
        let mut emitter = Emitter {
            queue: VecDeque::from([event]),
        };
        let mut processed = 0;

        while let Some(event) = emitter.queue.pop_front() {
            processed += 1;
            for (name, listener) in &self.listeners {
                trace!(listener = %name, event = ?event, "dispatch");
                listener(ctx, &event, &mut emitter);
            }
        }

        processed
    }
}

impl<C, E: fmt::Debug> Default for EventBus<C, E> {
    fn default() -> Self {
        Self::new()
    }
}
