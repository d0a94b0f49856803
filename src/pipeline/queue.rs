//! Concurrent work queue with an explicit closed state.
//!
//! The closed flag replaces sentinel values: `pop` returning `None` means "no
//! more work, ever", with no ambiguity against an item that happens to be
//! absent. Closing an empty queue releases every waiting worker immediately,
//! so a zero-item enumeration cannot deadlock the pool.

use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::Notify;

/// A FIFO of pending work items shared by the worker pool.
///
/// `push`/`close` come from the work source, `pop` from the workers. Each item
/// is delivered to exactly one worker.
#[derive(Debug)]
pub struct WorkQueue<T> {
    inner: Mutex<Inner<T>>,
    notify: Notify,
}

#[derive(Debug)]
struct Inner<T> {
    items: VecDeque<T>,
    closed: bool,
}

impl<T> Default for WorkQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> WorkQueue<T> {
    /// Create an empty, open queue
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                items: VecDeque::new(),
                closed: false,
            }),
            notify: Notify::new(),
        }
    }

    /// Enqueue one item.
    ///
    /// Returns `false` (dropping the item) if the queue is already closed.
    pub fn push(&self, item: T) -> bool {
        let accepted = {
            let mut inner = self.lock();
            if inner.closed {
                false
            } else {
                inner.items.push_back(item);
                true
            }
        };
        if accepted {
            self.notify.notify_waiters();
        }
        accepted
    }

    /// Mark the enumeration as exhausted.
    ///
    /// Workers drain the remaining items, then observe `None`. Idempotent.
    pub fn close(&self) {
        self.lock().closed = true;
        self.notify.notify_waiters();
    }

    /// Dequeue the next item, waiting while the queue is open but empty.
    ///
    /// Returns `None` once the queue is closed and drained.
    pub async fn pop(&self) -> Option<T> {
        loop {
            // Register for wakeup before checking, so a push/close racing with
            // the check cannot be missed.
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut inner = self.lock();
                if let Some(item) = inner.items.pop_front() {
                    return Some(item);
                }
                if inner.closed {
                    return None;
                }
            }

            notified.await;
        }
    }

    /// Number of items currently waiting
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    /// Whether no items are currently waiting
    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// Whether the queue has been closed
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner<T>> {
        // Lock is only held for queue bookkeeping, never across an await;
        // poisoning can only come from a panic inside those few lines.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
