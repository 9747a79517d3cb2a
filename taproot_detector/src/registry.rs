// Copyright 2025 the Taproot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered, key-deduplicated subscriber lists for single- and double-tap
//! notifications.
//!
//! Subscribers are invoked synchronously in registration order. Each list is
//! keyed: registering a second handler under an existing key is a no-op, so a
//! caller that wires the same logical handler twice still gets one
//! invocation per tap. Keys also support removal.
//!
//! ## Failure policy
//!
//! Dispatch is fail-fast: the first subscriber that returns an error aborts
//! the remaining notifications of that dispatch and the error propagates to
//! the caller, annotated with the subscriber's key. There is no isolation
//! between subscribers.

use alloc::boxed::Box;
use smallvec::SmallVec;

use taproot_gesture::tap::TapEvent;

use crate::types::{DispatchError, SubscriberError};

/// Boxed subscriber callback.
pub type TapHandler = Box<dyn FnMut(TapEvent) -> Result<(), SubscriberError>>;

struct Subscriber<K> {
    key: K,
    handler: TapHandler,
}

/// Subscriber lists for the two notification kinds.
///
/// `K` is the caller-supplied subscriber key; equality on `K` is what
/// deduplicates registrations (the substitute for callback identity in
/// environments that have it).
pub struct CallbackRegistry<K> {
    single: SmallVec<[Subscriber<K>; 2]>,
    double: SmallVec<[Subscriber<K>; 2]>,
}

impl<K> core::fmt::Debug for CallbackRegistry<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("single", &self.single.len())
            .field("double", &self.double.len())
            .finish_non_exhaustive()
    }
}

impl<K: PartialEq + Clone> CallbackRegistry<K> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            single: SmallVec::new(),
            double: SmallVec::new(),
        }
    }

    /// Add a single-tap subscriber. Returns `false` (and drops `handler`)
    /// when `key` is already registered.
    pub fn subscribe_single(&mut self, key: K, handler: TapHandler) -> bool {
        Self::subscribe(&mut self.single, key, handler)
    }

    /// Add a double-tap subscriber. Returns `false` (and drops `handler`)
    /// when `key` is already registered.
    pub fn subscribe_double(&mut self, key: K, handler: TapHandler) -> bool {
        Self::subscribe(&mut self.double, key, handler)
    }

    /// Remove the single-tap subscriber under `key`. Returns whether one was
    /// registered.
    pub fn unsubscribe_single(&mut self, key: &K) -> bool {
        Self::unsubscribe(&mut self.single, key)
    }

    /// Remove the double-tap subscriber under `key`. Returns whether one was
    /// registered.
    pub fn unsubscribe_double(&mut self, key: &K) -> bool {
        Self::unsubscribe(&mut self.double, key)
    }

    /// Invoke every single-tap subscriber in registration order.
    pub fn notify_single(&mut self, event: TapEvent) -> Result<(), DispatchError<K>> {
        Self::notify(&mut self.single, event)
    }

    /// Invoke every double-tap subscriber in registration order.
    pub fn notify_double(&mut self, event: TapEvent) -> Result<(), DispatchError<K>> {
        Self::notify(&mut self.double, event)
    }

    /// Number of single-tap subscribers.
    pub fn single_len(&self) -> usize {
        self.single.len()
    }

    /// Number of double-tap subscribers.
    pub fn double_len(&self) -> usize {
        self.double.len()
    }

    fn subscribe(list: &mut SmallVec<[Subscriber<K>; 2]>, key: K, handler: TapHandler) -> bool {
        if list.iter().any(|s| s.key == key) {
            return false;
        }
        list.push(Subscriber { key, handler });
        true
    }

    fn unsubscribe(list: &mut SmallVec<[Subscriber<K>; 2]>, key: &K) -> bool {
        match list.iter().position(|s| s.key == *key) {
            Some(idx) => {
                // Order of the remaining subscribers must be preserved.
                list.remove(idx);
                true
            }
            None => false,
        }
    }

    fn notify(
        list: &mut SmallVec<[Subscriber<K>; 2]>,
        event: TapEvent,
    ) -> Result<(), DispatchError<K>> {
        for sub in list.iter_mut() {
            (sub.handler)(event).map_err(|source| DispatchError {
                key: sub.key.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

impl<K: PartialEq + Clone> Default for CallbackRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}
