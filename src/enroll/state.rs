// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Per-subject enrollment state machine.
//!
//! The persisted facts (photograph stored, key stored, artifact stored,
//! artifact stale) map onto one [`EnrollmentState`], and [`transition`] is
//! the single place that decides what an arriving fact does:
//!
//! | State          | Event                     | Action                   | Next            |
//! |----------------|---------------------------|--------------------------|-----------------|
//! | `Empty`        | photo                     | store                    | `HasPhoto`      |
//! | `Empty`        | key                       | store                    | `HasKey`        |
//! | `HasPhoto`     | key                       | store + build            | `Built`         |
//! | `HasKey`       | photo                     | store + build            | `Built`         |
//! | `HasPhoto`     | photo (again)             | store                    | `HasPhoto`      |
//! | `HasKey`       | key (again)               | store                    | `HasKey`        |
//! | `ReadyUnbuilt` | either                    | store + build            | `Built`         |
//! | `Built`        | same value as stored      | store                    | unchanged       |
//! | `Built`        | different value           | store + mark stale       | `Built` (stale) |
//!
//! `Built` is terminal for automatic creation; rebuilding a stale artifact is
//! the explicit [`Coordinator::rebuild`](crate::enroll::Coordinator::rebuild).

use core::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an enrolling subject (user name in the surrounding system).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubjectId(String);

impl SubjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SubjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Durable per-subject flags as reported by the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectFacts {
    pub has_photograph: bool,
    pub has_key: bool,
    pub has_artifact: bool,
    /// A fact changed after the artifact was built.
    pub stale: bool,
}

/// Enrollment state derived from [`SubjectFacts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnrollmentState {
    Empty,
    HasPhoto,
    HasKey,
    /// Both facts known, no artifact yet (legacy records, or a build that failed
    /// outside the coordinator).
    ReadyUnbuilt,
    Built { stale: bool },
}

impl EnrollmentState {
    /// Derive the state. An artifact makes the subject `Built` no matter what.
    pub fn from_facts(facts: &SubjectFacts) -> Self {
        match (facts.has_photograph, facts.has_key, facts.has_artifact) {
            (_, _, true) => Self::Built { stale: facts.stale },
            (false, false, false) => Self::Empty,
            (true, false, false) => Self::HasPhoto,
            (false, true, false) => Self::HasKey,
            (true, true, false) => Self::ReadyUnbuilt,
        }
    }

    pub fn is_built(self) -> bool {
        matches!(self, Self::Built { .. })
    }
}

impl fmt::Display for EnrollmentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::HasPhoto => write!(f, "has-photo"),
            Self::HasKey => write!(f, "has-key"),
            Self::ReadyUnbuilt => write!(f, "ready-unbuilt"),
            Self::Built { stale: false } => write!(f, "built"),
            Self::Built { stale: true } => write!(f, "built (stale)"),
        }
    }
}

/// Which fact an event delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Fact {
    Photograph,
    Key,
}

/// An arriving fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub fact: Fact,
    /// The value equals what is already stored. Only consulted once built.
    pub same_as_stored: bool,
}

impl Event {
    pub fn photo_captured() -> Self {
        Self { fact: Fact::Photograph, same_as_stored: false }
    }

    pub fn key_generated() -> Self {
        Self { fact: Fact::Key, same_as_stored: false }
    }

    pub fn same_as_stored(mut self, same: bool) -> Self {
        self.same_as_stored = same;
        self
    }
}

/// Side effect chosen by [`transition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Store (or overwrite) the fact only.
    Store,
    /// Store the fact and build the artifact in the same commit.
    StoreAndBuild,
    /// Store the replacement fact and flag the existing artifact stale.
    StoreAndMarkStale,
}

/// Result of [`transition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub action: Action,
    pub next: EnrollmentState,
}

/// The transition function. Pure; see the module table.
pub fn transition(state: EnrollmentState, event: Event) -> Transition {
    use EnrollmentState::*;

    let (action, next) = match (state, event.fact) {
        (Empty, Fact::Photograph) => (Action::Store, HasPhoto),
        (Empty, Fact::Key) => (Action::Store, HasKey),
        (HasPhoto, Fact::Photograph) => (Action::Store, HasPhoto),
        (HasKey, Fact::Key) => (Action::Store, HasKey),
        (HasPhoto, Fact::Key) | (HasKey, Fact::Photograph) | (ReadyUnbuilt, _) => {
            (Action::StoreAndBuild, Built { stale: false })
        }
        (Built { stale }, _) if event.same_as_stored => (Action::Store, Built { stale }),
        (Built { .. }, _) => (Action::StoreAndMarkStale, Built { stale: true }),
    };
    Transition { action, next }
}
