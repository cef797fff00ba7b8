// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Per-subject mutual exclusion.
//!
//! One mutex per subject, created on first use and dropped again when the
//! last holder leaves, so the table only holds subjects with calls in flight.
//! Different subjects never contend beyond the short table lookup.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::enroll::state::SubjectId;

#[derive(Debug, Default)]
pub(crate) struct SubjectLocks {
    slots: Mutex<HashMap<SubjectId, Arc<Mutex<()>>>>,
}

impl SubjectLocks {
    /// Run `f` while holding `subject`'s lock.
    pub(crate) fn with<R>(&self, subject: &SubjectId, f: impl FnOnce() -> R) -> R {
        let slot = {
            let mut slots = lock(&self.slots);
            Arc::clone(slots.entry(subject.clone()).or_default())
        };

        let result = {
            let _held = lock(&slot);
            f()
        };

        // Table entry + our clone means nobody else is waiting on it.
        let mut slots = lock(&self.slots);
        if Arc::strong_count(&slot) == 2 && slots.get(subject).is_some_and(|s| Arc::ptr_eq(s, &slot)) {
            slots.remove(subject);
        }
        result
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        lock(&self.slots).len()
    }
}

// The guarded data is `()` or a plain map; a panic elsewhere cannot leave it
// inconsistent.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
