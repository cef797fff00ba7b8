// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Build counters.
//!
//! Uses atomics so concurrent request handlers can update them without
//! taking any lock.

use core::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

#[derive(Debug, Default)]
pub struct BuildStats {
    started: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
    conflicts: AtomicU64,
}

/// Point-in-time copy of [`BuildStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildStatsSnapshot {
    /// Builds that started (embedding began).
    pub started: u64,
    /// Builds whose artifact was persisted.
    pub completed: u64,
    /// Builds that failed (capacity, format, self-test, persistence).
    pub failed: u64,
    /// Conditional writes that lost to an existing artifact.
    pub conflicts: u64,
}

impl BuildStats {
    pub(crate) fn started(&self) {
        self.started.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn conflict(&self) {
        self.conflicts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> BuildStatsSnapshot {
        BuildStatsSnapshot {
            started: self.started.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            conflicts: self.conflicts.load(Ordering::Relaxed),
        }
    }
}
