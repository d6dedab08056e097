#![forbid(unsafe_code)]

//! Observable field state for formwire.
//!
//! A form session keeps each field's value and error in an [`Observable`].
//! UI code holds clones of those observables, writes values into them, and
//! subscribes to be told when validation rewrites an error.
//!
//! ```text
//! Observable<T> ──clone──▶ same Rc<RefCell<..>>   (all clones see writes)
//!       │
//!       └─ subscribe(cb) ──▶ Subscription   (drop it to stop callbacks)
//!
//! BatchScope::new() .. drop   writes land at once, callbacks run at drop
//! ```
//!
//! Everything here is single-threaded: observables are `!Send`, and the
//! batch depth lives in a thread-local.
//!
//! # Guarantees
//!
//! - `version()` counts writes that actually changed the value; writing an
//!   equal value does nothing.
//! - Callbacks run in the order they were subscribed and receive the value
//!   current at notification time.
//! - Once a [`Subscription`] is dropped its callback never runs again.
//! - While any [`BatchScope`] is alive, an observable changed several times
//!   notifies once, after the last scope on the thread is dropped.

pub mod batch;
pub mod observable;

pub use batch::BatchScope;
pub use observable::{Observable, Subscription};
