#![forbid(unsafe_code)]

//! Deferred notification scopes.

use std::cell::RefCell;
use std::collections::HashSet;

type Pending = Box<dyn FnOnce()>;

#[derive(Default)]
struct BatchState {
    depth: usize,
    queued: HashSet<usize>,
    pending: Vec<Pending>,
}

thread_local! {
    static BATCH: RefCell<BatchState> = RefCell::new(BatchState::default());
}

pub(crate) fn is_batching() -> bool {
    BATCH.with(|b| b.borrow().depth > 0)
}

/// Queue `notify` unless an entry for `key` is already queued.
///
/// The queued closure reads the observable when it runs, so subscribers see
/// the final value of the batch.
pub(crate) fn defer(key: usize, notify: Pending) {
    BATCH.with(|b| {
        let mut state = b.borrow_mut();
        if state.queued.insert(key) {
            state.pending.push(notify);
        }
    });
}

/// RAII guard that defers [`Observable`](crate::Observable) notifications.
///
/// Values update immediately; notifications run when the outermost scope is
/// dropped, at most once per observable, in first-change order.
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use formwire_reactive::{BatchScope, Observable};
///
/// let total = Observable::new(0);
/// let calls = Rc::new(Cell::new(0));
/// let c = Rc::clone(&calls);
/// let _sub = total.subscribe(move |_| c.set(c.get() + 1));
///
/// {
///     let _batch = BatchScope::new();
///     total.set(1);
///     total.set(2);
///     assert_eq!(calls.get(), 0);
/// }
/// assert_eq!(calls.get(), 1);
/// ```
#[derive(Debug)]
#[must_use = "notifications flush when the scope is dropped"]
pub struct BatchScope {
    _private: (),
}

impl BatchScope {
    pub fn new() -> Self {
        BATCH.with(|b| b.borrow_mut().depth += 1);
        Self { _private: () }
    }

    /// Nesting depth of active scopes on this thread.
    #[must_use]
    pub fn depth() -> usize {
        BATCH.with(|b| b.borrow().depth)
    }
}

impl Default for BatchScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BatchScope {
    fn drop(&mut self) {
        let pending = BATCH.with(|b| {
            let mut state = b.borrow_mut();
            state.depth = state.depth.saturating_sub(1);
            if state.depth > 0 {
                return Vec::new();
            }
            state.queued.clear();
            std::mem::take(&mut state.pending)
        });
        if pending.is_empty() {
            return;
        }
        tracing::trace!(count = pending.len(), "flushing batched notifications");
        for notify in pending {
            notify();
        }
    }
}
