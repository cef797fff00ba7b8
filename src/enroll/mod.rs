// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Order-independent enrollment coordination.
//!
//! A subject's photograph and key arrive through separate enrollment steps
//! in no fixed order. The [`Coordinator`] turns those two arrivals into
//! exactly one artifact build, whichever comes first and even when both land
//! at the same moment:
//!
//! - [`state`]: the explicit state enum and its single transition function.
//! - [`store`]: the storage collaborator interface ([`EnrollmentStore`]).
//! - [`memory`]: an in-process store.
//! - [`coordinator`]: the locked read-decide-build-commit sequence.
//! - [`backfill`]: bulk build of pending subjects and the enrollment census.

pub mod backfill;
pub mod coordinator;
pub mod error;
mod locks;
pub mod memory;
pub mod state;
pub mod stats;
pub mod store;

pub use backfill::{BackfillReport, EnrollmentCensus};
pub use coordinator::{ArtifactSummary, Coordinator, EventReport};
pub use error::{EnrollError, StoreError};
pub use memory::MemoryStore;
pub use state::{transition, Action, EnrollmentState, Event, Fact, SubjectFacts, SubjectId, Transition};
pub use stats::BuildStatsSnapshot;
pub use store::{ArtifactUpdate, Commit, EnrollmentStore};
