// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! The storage collaborator interface.
//!
//! The store owns durable persistence of photographs, keys and artifacts.
//! The coordinator only reads facts and hands over [`Commit`]s; each commit
//! must be applied as one logical write so no reader ever sees, say, a new
//! key without the artifact built from it.

use std::sync::Arc;

use crate::enroll::error::StoreError;
use crate::enroll::state::{SubjectFacts, SubjectId};
use crate::stego::key::SecretKey;

/// What a commit does to the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactUpdate<'a> {
    /// Leave artifact and stale flag alone.
    Unchanged,
    /// Create the artifact only if none exists yet; otherwise the whole commit
    /// fails with [`StoreError::Conflict`] and nothing is written.
    Create(&'a [u8]),
    /// Overwrite any existing artifact and clear the stale flag.
    Replace(&'a [u8]),
    /// Keep the artifact but flag it stale.
    MarkStale,
}

/// One atomic write for a subject.
#[derive(Debug, Clone, Copy)]
pub struct Commit<'a> {
    pub photograph: Option<&'a [u8]>,
    pub key: Option<&'a SecretKey>,
    pub artifact: ArtifactUpdate<'a>,
}

impl<'a> Commit<'a> {
    pub fn photograph(bytes: &'a [u8]) -> Self {
        Self { photograph: Some(bytes), key: None, artifact: ArtifactUpdate::Unchanged }
    }

    pub fn key(key: &'a SecretKey) -> Self {
        Self { photograph: None, key: Some(key), artifact: ArtifactUpdate::Unchanged }
    }

    pub fn artifact_only(update: ArtifactUpdate<'a>) -> Self {
        Self { photograph: None, key: None, artifact: update }
    }

    pub fn with_artifact(mut self, update: ArtifactUpdate<'a>) -> Self {
        self.artifact = update;
        self
    }
}

/// Durable storage for enrollment data.
///
/// Implementations may block; timeouts and retries are theirs to own.
pub trait EnrollmentStore: Send + Sync {
    /// Current flags for `subject` (all false for an unknown subject).
    fn facts(&self, subject: &SubjectId) -> Result<SubjectFacts, StoreError>;

    /// Stored photograph bytes (lossless container).
    fn photograph(&self, subject: &SubjectId) -> Result<Option<Vec<u8>>, StoreError>;

    /// Stored key as written by the fingerprint enrollment.
    fn key(&self, subject: &SubjectId) -> Result<Option<String>, StoreError>;

    /// Stored artifact bytes.
    fn artifact(&self, subject: &SubjectId) -> Result<Option<Vec<u8>>, StoreError>;

    /// Apply `commit` atomically.
    fn commit(&self, subject: &SubjectId, commit: Commit<'_>) -> Result<(), StoreError>;

    /// Every subject the store knows about.
    fn subjects(&self) -> Result<Vec<SubjectId>, StoreError>;
}

impl<S: EnrollmentStore + ?Sized> EnrollmentStore for Arc<S> {
    fn facts(&self, subject: &SubjectId) -> Result<SubjectFacts, StoreError> {
        (**self).facts(subject)
    }

    fn photograph(&self, subject: &SubjectId) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).photograph(subject)
    }

    fn key(&self, subject: &SubjectId) -> Result<Option<String>, StoreError> {
        (**self).key(subject)
    }

    fn artifact(&self, subject: &SubjectId) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).artifact(subject)
    }

    fn commit(&self, subject: &SubjectId, commit: Commit<'_>) -> Result<(), StoreError> {
        (**self).commit(subject, commit)
    }

    fn subjects(&self) -> Result<Vec<SubjectId>, StoreError> {
        (**self).subjects()
    }
}
