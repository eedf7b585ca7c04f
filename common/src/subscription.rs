use std::collections::BTreeMap;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::task::{Context, Poll};

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::{Stream, StreamExt};

/// A live feed of pushed values. Dropping it (or calling
/// [`Subscription::unsubscribe`]) unregisters the feed from its source.
pub struct Subscription<T> {
    rx: UnboundedReceiver<T>,
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl<T> Subscription<T> {
    pub fn new(rx: UnboundedReceiver<T>, cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            rx,
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn unsubscribe(self) {}

    /// Next value already queued, without waiting.
    pub fn try_next_now(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl<T> Stream for Subscription<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.rx.poll_next_unpin(cx)
    }
}

impl<T> std::fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Registry<Q, T> {
    next_id: u64,
    subscribers: BTreeMap<u64, (Q, UnboundedSender<T>)>,
}

/// Subscriber registry: each subscriber registers a query `Q` and receives
/// whatever the publisher renders for that query.
pub struct Fanout<Q, T> {
    inner: Arc<Mutex<Registry<Q, T>>>,
}

impl<Q, T> Clone for Fanout<Q, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<Q, T> Default for Fanout<Q, T> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Registry {
                next_id: 0,
                subscribers: BTreeMap::new(),
            })),
        }
    }
}

impl<Q: Send + 'static, T: Send + 'static> Fanout<Q, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `query`, delivering `initial` first.
    pub fn subscribe(&self, query: Q, initial: T) -> Subscription<T> {
        let (tx, rx) = mpsc::unbounded();
        // A fresh channel cannot be closed yet.
        let _ = tx.unbounded_send(initial);

        let id = {
            let mut reg = lock(&self.inner);
            let id = reg.next_id;
            reg.next_id += 1;
            reg.subscribers.insert(id, (query, tx));
            id
        };

        let weak: Weak<Mutex<Registry<Q, T>>> = Arc::downgrade(&self.inner);
        Subscription::new(rx, move || {
            if let Some(inner) = weak.upgrade() {
                lock(&inner).subscribers.remove(&id);
                tracing::trace!(id, "subscriber removed");
            }
        })
    }

    /// Push a rendered value to every subscriber. Subscribers whose
    /// receiving end has gone away are pruned.
    pub fn publish(&self, mut render: impl FnMut(&Q) -> T) {
        let mut reg = lock(&self.inner);
        reg.subscribers
            .retain(|_, (query, tx)| tx.unbounded_send(render(query)).is_ok());
    }

    pub fn len(&self) -> usize {
        lock(&self.inner).subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
