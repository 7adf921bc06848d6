//! Request Deduplication
//!
//! Collapses concurrent calls for the same key into a single execution whose
//! outcome is shared by every caller that arrived while it was running.

use std::collections::HashMap;
use std::future::Future;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::error::Result;

type Outcome<T> = Option<Result<T>>;

enum Role<T> {
    Leader(watch::Sender<Outcome<T>>),
    Waiter(watch::Receiver<Outcome<T>>),
}

// == Single Flight ==
/// Tracks in-flight calls by key.
///
/// The map lock is only held to look up, insert or remove a record; waiters
/// block on the per-call channel.
pub struct SingleFlight<T> {
    calls: Mutex<HashMap<String, watch::Receiver<Outcome<T>>>>,
}

impl<T: Clone> SingleFlight<T> {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(HashMap::new()),
        }
    }

    // == Work ==
    /// Runs `f` unless a call for `key` is already in flight, in which case
    /// the caller waits for that call and receives a clone of its outcome.
    ///
    /// The record is removed before the outcome is published, so a call
    /// arriving afterwards starts fresh work. If the leading future is
    /// dropped before finishing, its waiters contend again and one of them
    /// runs its own `f` as the new leader.
    pub async fn work<F, Fut>(&self, key: &str, f: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        loop {
            let role = {
                let mut calls = self.calls.lock();
                match calls.get(key) {
                    Some(rx) => Role::Waiter(rx.clone()),
                    None => {
                        let (tx, rx) = watch::channel(None);
                        calls.insert(key.to_string(), rx);
                        Role::Leader(tx)
                    }
                }
            };

            match role {
                Role::Leader(tx) => {
                    let record = CallRecord {
                        flight: self,
                        key,
                        tx: Some(tx),
                    };
                    let result = f().await;
                    record.publish(result.clone());
                    return result;
                }
                Role::Waiter(mut rx) => {
                    let outcome = match rx.wait_for(Option::is_some).await {
                        Ok(outcome) => (*outcome).clone(),
                        Err(_) => None,
                    };
                    if let Some(result) = outcome {
                        return result;
                    }
                    // Leader dropped without publishing; contend again
                }
            }
        }
    }

    /// Number of keys with a call in flight.
    pub fn in_flight(&self) -> usize {
        self.calls.lock().len()
    }
}

impl<T: Clone> Default for SingleFlight<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for SingleFlight<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingleFlight")
            .field("in_flight", &self.calls.lock().len())
            .finish()
    }
}

/// Removes the in-flight record when the leader finishes or is cancelled.
///
/// The sender is a field so it is dropped after the record is removed;
/// woken waiters never see a stale entry.
struct CallRecord<'a, T> {
    flight: &'a SingleFlight<T>,
    key: &'a str,
    tx: Option<watch::Sender<Outcome<T>>>,
}

impl<T> CallRecord<'_, T> {
    fn publish(mut self, result: Result<T>) {
        let tx = self.tx.take();
        drop(self);
        if let Some(tx) = tx {
            // No receivers just means nobody was waiting
            let _ = tx.send(Some(result));
        }
    }
}

impl<T> Drop for CallRecord<'_, T> {
    fn drop(&mut self) {
        self.flight.calls.lock().remove(self.key);
    }
}
