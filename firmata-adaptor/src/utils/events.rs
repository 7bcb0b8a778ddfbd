//! Defines Firmata-Adaptor event manager system.

use std::any::Any;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use log::{trace, warn};
use parking_lot::Mutex;

use crate::errors::Error;
use crate::utils::task;

type BoxedCallback =
    Box<dyn FnMut(Arc<dyn Any + Send + Sync>) -> Option<BoxFuture<'static, Result<(), Error>>> + Send>;
type SyncedCallbackMap = Mutex<HashMap<String, Vec<CallbackWrapper>>>;
// Emptied once a `once` callback has fired.
type CallbackSlot = Arc<Mutex<Option<BoxedCallback>>>;
pub type EventHandler = usize;

/// Registers callbacks per event name and runs them (as tasks) when the event is emitted.
///
/// Clones share the same registered callbacks.
#[derive(Clone, Default)]
pub struct EventManager {
    callbacks: Arc<SyncedCallbackMap>,
    next_id: Arc<AtomicUsize>,
}

struct CallbackWrapper {
    id: EventHandler,
    once: bool,
    callback: CallbackSlot,
}

impl Debug for EventManager {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let callbacks = self.callbacks.lock();
        let mut events: Vec<(&String, usize)> =
            callbacks.iter().map(|(k, v)| (k, v.len())).collect();
        events.sort();
        f.debug_struct("EventManager")
            .field("events", &events)
            .finish()
    }
}

impl EventManager {
    /// Register event handler for a specific event name.
    ///
    /// # Parameters
    /// * `event` - The event name (any type that matches an Into<String>)
    /// * `callback` - An async moved callback that accepts a single parameter as an argument.
    ///                The argument can be anything that might be both `Send + Sync`.
    ///                You can trick multiple parameters by turning them in a single tuple.
    ///
    /// # Return
    /// Returns an EventHandler that can be used by the `unregister()` method.
    ///
    /// # Errors
    /// If the callback parameter type does not match the emitted payload type exactly, the callback is
    /// silently skipped.
    ///
    /// # Example
    ///
    /// ```
    /// use firmata_adaptor::utils::EventManager;
    ///
    /// #[firmata_adaptor::runtime]
    /// async fn main() {
    ///     let events: EventManager = Default::default();
    ///
    ///     events.on("ready", |(name, age): (&str, u8)| async move {
    ///         println!("Event handler with parameters: {} {}.", name, age);
    ///         Ok(())
    ///     });
    ///
    ///     events.emit("ready", ("foo", 69u8));
    ///     // No matching handler (because of parameters) will be called
    ///     events.emit("ready", "bar");
    /// }
    /// ```
    pub fn on<S, F, T, Fut>(&self, event: S, callback: F) -> EventHandler
    where
        S: Into<String>,
        T: 'static + Send + Sync + Clone,
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), Error>> + Send + 'static,
    {
        self.register(event.into(), callback, false)
    }

    /// Same as [`EventManager::on()`] but the callback is unregistered after its first call.
    pub fn once<S, F, T, Fut>(&self, event: S, callback: F) -> EventHandler
    where
        S: Into<String>,
        T: 'static + Send + Sync + Clone,
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), Error>> + Send + 'static,
    {
        self.register(event.into(), callback, true)
    }

    fn register<F, T, Fut>(&self, event_name: String, mut callback: F, once: bool) -> EventHandler
    where
        T: 'static + Send + Sync + Clone,
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), Error>> + Send + 'static,
    {
        let callback_event = event_name.clone();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        // Boxes the callback and downcast its parameter.
        let boxed_callback: BoxedCallback = Box::new(move |arg: Arc<dyn Any + Send + Sync>| {
            match arg.downcast::<T>() {
                Ok(arg) => Some((callback)((*arg).clone()).boxed()),
                Err(_) => {
                    warn!(
                        "The callback for event '{}' could not be called because parameter does not match",
                        callback_event
                    );
                    None
                }
            }
        });

        self.callbacks
            .lock()
            .entry(event_name)
            .or_default()
            .push(CallbackWrapper {
                id,
                once,
                callback: Arc::new(Mutex::new(Some(boxed_callback))),
            });

        id
    }

    /// Invoke all event handlers registered for a specific event name.
    /// Only the callbacks whose declared parameter type matches the payload are called. All others are
    /// skipped: a skipped `once` callback stays registered.
    ///
    /// # Parameters
    /// * `event`:  The event name (any type that matches an `Into<String>`)
    /// * `payload`: The event payload (must be `'static + Send + Sync`)
    pub fn emit<S, T>(&self, event: S, payload: T)
    where
        S: Into<String>,
        T: 'static + Send + Sync,
    {
        let event = event.into();
        let payload: Arc<dyn Any + Send + Sync> = Arc::new(payload);

        // Callbacks are called without the map lock held: they may (un)register handlers.
        let slots: Vec<(EventHandler, bool, CallbackSlot)> =
            match self.callbacks.lock().get(&event) {
                Some(callbacks) => callbacks
                    .iter()
                    .map(|wrapper| (wrapper.id, wrapper.once, wrapper.callback.clone()))
                    .collect(),
                None => return,
            };
        trace!("Emit event '{}' to {} handler(s)", event, slots.len());

        let mut consumed = vec![];
        for (id, once, slot) in slots {
            let future = {
                let mut slot = slot.lock();
                let future = slot.as_mut().and_then(|callback| callback(payload.clone()));
                if once && future.is_some() {
                    *slot = None;
                    consumed.push(id);
                }
                future
            };
            if let Some(future) = future {
                if let Err(error) = task::run(future) {
                    warn!("Event '{}' handler could not run: {}", event, error);
                }
            }
        }

        if !consumed.is_empty() {
            if let Some(callbacks) = self.callbacks.lock().get_mut(&event) {
                callbacks.retain(|wrapper| !consumed.contains(&wrapper.id));
            }
        }
    }

    /// Unregister a given handler if found.
    pub fn unregister(&self, handler: EventHandler) {
        self.callbacks
            .lock()
            .values_mut()
            .for_each(|v| v.retain(|cb| cb.id != handler));
    }

    /// Counts the handlers registered for a given event.
    pub fn count<S: Into<String>>(&self, event: S) -> usize {
        self.callbacks
            .lock()
            .get(&event.into())
            .map_or(0, |callbacks| callbacks.len())
    }
}
