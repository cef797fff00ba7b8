// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! The enrollment coordinator.
//!
//! Photograph capture and key generation reach the coordinator from two
//! independent request handlers, in either order and possibly at the same
//! time. For each arriving fact the coordinator, holding that subject's lock:
//!
//! 1. reads the persisted facts and derives the [`EnrollmentState`],
//! 2. asks [`transition`] what to do,
//! 3. if the fact completes the pair, builds the artifact in memory, runs the
//!    verification self-test, and
//! 4. commits the fact (and artifact, if any) as one store write.
//!
//! Any failure before the commit leaves the store untouched. Artifact creation
//! uses a conditional write, so even a second process sharing the store
//! cannot produce two artifacts; the loser re-evaluates once and ends up
//! treating its fact as a post-build duplicate or replacement.

use tracing::{debug, info, warn};

use crate::config::CoordinatorConfig;
use crate::enroll::error::{EnrollError, StoreError};
use crate::enroll::locks::SubjectLocks;
use crate::enroll::state::{transition, Action, EnrollmentState, Event, Fact, SubjectId};
use crate::enroll::stats::{BuildStats, BuildStatsSnapshot};
use crate::enroll::store::{ArtifactUpdate, Commit, EnrollmentStore};
use crate::stego;
use crate::stego::key::SecretKey;
use crate::stego::verify::{self, FailureReason, VerificationResult};

/// Display-safe description of a persisted artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSummary {
    /// Encoded artifact size in bytes.
    pub len: usize,
    /// CRC-32 of the encoded artifact.
    pub crc32: u32,
    /// Preview of the embedded key.
    pub preview: String,
}

/// What an event did to a subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventReport {
    pub subject: SubjectId,
    pub from: EnrollmentState,
    pub to: EnrollmentState,
    pub action: Action,
    /// Set when this event built the artifact.
    pub artifact: Option<ArtifactSummary>,
}

#[derive(Clone, Copy)]
enum FactValue<'a> {
    Photograph(&'a [u8]),
    Key(&'a SecretKey),
}

impl<'a> FactValue<'a> {
    fn fact(self) -> Fact {
        match self {
            Self::Photograph(_) => Fact::Photograph,
            Self::Key(_) => Fact::Key,
        }
    }

    fn commit(self) -> Commit<'a> {
        match self {
            Self::Photograph(bytes) => Commit::photograph(bytes),
            Self::Key(key) => Commit::key(key),
        }
    }
}

struct BuiltArtifact {
    bytes: Vec<u8>,
    summary: ArtifactSummary,
}

/// Reconciles photograph and key arrivals into exactly one artifact per
/// subject.
///
/// `Coordinator` is `Sync`; share it between request handlers by reference
/// or behind an `Arc`.
#[derive(Debug)]
pub struct Coordinator<S> {
    pub(crate) store: S,
    pub(crate) config: CoordinatorConfig,
    pub(crate) locks: SubjectLocks,
    pub(crate) stats: BuildStats,
}

impl<S: EnrollmentStore> Coordinator<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, CoordinatorConfig::default())
    }

    pub fn with_config(store: S, config: CoordinatorConfig) -> Self {
        Self {
            store,
            config,
            locks: SubjectLocks::default(),
            stats: BuildStats::default(),
        }
    }

    /// The storage collaborator.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Current build counters.
    pub fn stats(&self) -> BuildStatsSnapshot {
        self.stats.snapshot()
    }

    /// Current state of `subject`, read under its lock.
    pub fn state(&self, subject: &SubjectId) -> Result<EnrollmentState, EnrollError> {
        self.locks.with(subject, || self.current_state(subject))
    }

    /// A photograph was captured for `subject`.
    ///
    /// # Errors
    /// - [`EnrollError::Stego`] if this completes the pair and the photograph
    ///   is not a usable carrier (not PNG, too small) or the stored key is malformed.
    /// - [`EnrollError::SelfTestFailed`] if the built artifact does not verify.
    /// - [`EnrollError::Persistence`] if the store fails.
    ///
    /// On error nothing is persisted.
    pub fn on_photo_captured(&self, subject: &SubjectId, photo: &[u8]) -> Result<EventReport, EnrollError> {
        self.apply(subject, FactValue::Photograph(photo))
    }

    /// A key was generated for `subject`.
    ///
    /// # Errors
    /// As [`on_photo_captured`](Self::on_photo_captured), plus
    /// [`StegoError::InvalidKeyLength`](crate::stego::StegoError::InvalidKeyLength)
    /// before anything else if `key` is not 64 hex characters.
    pub fn on_key_generated(&self, subject: &SubjectId, key: &str) -> Result<EventReport, EnrollError> {
        let key = SecretKey::parse(key)?;
        self.apply(subject, FactValue::Key(&key))
    }

    /// Verify the stored artifact against the stored key.
    ///
    /// Returns a [`FailureReason::NotBuilt`] result when there is nothing to
    /// verify yet.
    ///
    /// # Errors
    /// - [`EnrollError::Stego`] if the stored artifact cannot be decoded or the
    ///   stored key is malformed.
    /// - [`EnrollError::Persistence`] if the store fails.
    pub fn verify(&self, subject: &SubjectId) -> Result<VerificationResult, EnrollError> {
        self.locks.with(subject, || {
            let facts = self.store.facts(subject)?;
            if !facts.has_artifact || !facts.has_key {
                return Ok(VerificationResult::failed(FailureReason::NotBuilt));
            }
            let (Some(artifact), Some(key)) = (self.store.artifact(subject)?, self.store.key(subject)?) else {
                return Ok(VerificationResult::failed(FailureReason::NotBuilt));
            };
            let key = SecretKey::parse(&key)?;

            let result = verify::verify_artifact_with(&artifact, &key, &self.config.limits, self.config.preview_chars)?;
            match result.reason {
                None => debug!(subject = %subject, "embedded key verified"),
                Some(reason) => info!(subject = %subject, %reason, stale = facts.stale, "embedded key did not verify"),
            }
            Ok(result)
        })
    }

    /// Rebuild the artifact from the currently stored photograph and key.
    ///
    /// This is the explicit re-enrollment path: it replaces any existing
    /// artifact and clears the stale flag.
    ///
    /// # Errors
    /// - [`EnrollError::NotReady`] if the photograph or key is missing.
    /// - Build and persistence errors as for [`on_photo_captured`](Self::on_photo_captured).
    pub fn rebuild(&self, subject: &SubjectId) -> Result<ArtifactSummary, EnrollError> {
        self.locks.with(subject, || {
            let from = self.current_state(subject)?;
            let (Some(photo), Some(key)) = (self.store.photograph(subject)?, self.store.key(subject)?) else {
                return Err(EnrollError::NotReady(from));
            };
            let key = SecretKey::parse(&key)?;

            let built = self.build(subject, &photo, &key)?;
            self.persist(subject, Commit::artifact_only(ArtifactUpdate::Replace(&built.bytes)))?;
            info!(subject = %subject, %from, len = built.summary.len, "artifact rebuilt");
            Ok(built.summary)
        })
    }

    /// Build the artifact for a subject in `ReadyUnbuilt`; `Ok(None)` for any
    /// other state.
    pub(crate) fn build_pending(&self, subject: &SubjectId) -> Result<Option<ArtifactSummary>, EnrollError> {
        self.locks.with(subject, || {
            if self.current_state(subject)? != EnrollmentState::ReadyUnbuilt {
                return Ok(None);
            }
            let photo = self.stored_photograph(subject)?;
            let key = self.stored_key(subject)?;

            let built = self.build(subject, &photo, &key)?;
            match self.persist(subject, Commit::artifact_only(ArtifactUpdate::Create(&built.bytes))) {
                Ok(()) => Ok(Some(built.summary)),
                Err(EnrollError::Persistence(StoreError::Conflict)) => Ok(None),
                Err(e) => Err(e),
            }
        })
    }

    fn apply(&self, subject: &SubjectId, value: FactValue<'_>) -> Result<EventReport, EnrollError> {
        self.locks.with(subject, || match self.apply_locked(subject, value) {
            // Another writer created the artifact between our read and our
            // commit. Re-evaluate once; the subject is now Built.
            Err(EnrollError::Persistence(StoreError::Conflict)) => {
                debug!(subject = %subject, "artifact already created elsewhere, re-evaluating");
                self.apply_locked(subject, value)
            }
            other => other,
        })
    }

    fn apply_locked(&self, subject: &SubjectId, value: FactValue<'_>) -> Result<EventReport, EnrollError> {
        let from = self.current_state(subject)?;
        let same = from.is_built() && self.same_as_stored(subject, value)?;
        let t = transition(from, Event { fact: value.fact(), same_as_stored: same });

        let artifact = match t.action {
            Action::Store => {
                self.persist(subject, value.commit())?;
                debug!(subject = %subject, fact = ?value.fact(), %from, to = %t.next, "fact stored");
                None
            }
            Action::StoreAndMarkStale => {
                self.persist(subject, value.commit().with_artifact(ArtifactUpdate::MarkStale))?;
                warn!(subject = %subject, fact = ?value.fact(), "fact replaced after build, artifact is stale");
                None
            }
            Action::StoreAndBuild => {
                let stored_photo;
                let stored_key;
                let (photo, key): (&[u8], &SecretKey) = match value {
                    FactValue::Photograph(photo) => {
                        stored_key = self.stored_key(subject)?;
                        (photo, &stored_key)
                    }
                    FactValue::Key(key) => {
                        stored_photo = self.stored_photograph(subject)?;
                        (stored_photo.as_slice(), key)
                    }
                };

                let built = self.build(subject, photo, key)?;
                self.persist(subject, value.commit().with_artifact(ArtifactUpdate::Create(&built.bytes)))?;
                Some(built.summary)
            }
        };

        Ok(EventReport { subject: subject.clone(), from, to: t.next, action: t.action, artifact })
    }

    /// Embed, self-test and summarise. Pure apart from counters and logs.
    fn build(&self, subject: &SubjectId, photo: &[u8], key: &SecretKey) -> Result<BuiltArtifact, EnrollError> {
        self.stats.started();
        match self.build_artifact(photo, key) {
            Ok(bytes) => {
                let summary = ArtifactSummary {
                    len: bytes.len(),
                    crc32: crc32fast::hash(&bytes),
                    preview: key.preview(self.config.preview_chars),
                };
                debug!(subject = %subject, len = summary.len, crc32 = summary.crc32, "artifact built");
                Ok(BuiltArtifact { bytes, summary })
            }
            Err(e) => {
                self.stats.failed();
                warn!(subject = %subject, error = %e, "artifact build failed");
                Err(e)
            }
        }
    }

    fn build_artifact(&self, photo: &[u8], key: &SecretKey) -> Result<Vec<u8>, EnrollError> {
        let bytes = stego::embed_secret(photo, key, &self.config.limits)?;
        if self.config.self_test {
            let check = verify::verify_artifact_with(&bytes, key, &self.config.limits, self.config.preview_chars)?;
            if !check.verified {
                return Err(EnrollError::SelfTestFailed(check.reason.unwrap_or(FailureReason::KeyMismatch)));
            }
        }
        Ok(bytes)
    }

    /// Commit, keeping the counters honest about artifact writes.
    fn persist(&self, subject: &SubjectId, commit: Commit<'_>) -> Result<(), EnrollError> {
        let writes_artifact = matches!(commit.artifact, ArtifactUpdate::Create(_) | ArtifactUpdate::Replace(_));
        match self.store.commit(subject, commit) {
            Ok(()) => {
                if writes_artifact {
                    self.stats.completed();
                    info!(subject = %subject, "artifact persisted");
                }
                Ok(())
            }
            Err(StoreError::Conflict) => {
                self.stats.conflict();
                Err(StoreError::Conflict.into())
            }
            Err(e) => {
                if writes_artifact {
                    self.stats.failed();
                }
                warn!(subject = %subject, error = %e, "commit failed, state unchanged");
                Err(e.into())
            }
        }
    }

    fn current_state(&self, subject: &SubjectId) -> Result<EnrollmentState, EnrollError> {
        Ok(EnrollmentState::from_facts(&self.store.facts(subject)?))
    }

    fn same_as_stored(&self, subject: &SubjectId, value: FactValue<'_>) -> Result<bool, EnrollError> {
        Ok(match value {
            FactValue::Photograph(photo) => self.store.photograph(subject)?.is_some_and(|p| p == photo),
            FactValue::Key(key) => self.store.key(subject)?.is_some_and(|k| k.eq_ignore_ascii_case(key.as_str())),
        })
    }

    fn stored_photograph(&self, subject: &SubjectId) -> Result<Vec<u8>, EnrollError> {
        match self.store.photograph(subject)? {
            Some(photo) => Ok(photo),
            None => Err(EnrollError::NotReady(self.current_state(subject)?)),
        }
    }

    fn stored_key(&self, subject: &SubjectId) -> Result<SecretKey, EnrollError> {
        match self.store.key(subject)? {
            Some(key) => Ok(SecretKey::parse(&key)?),
            None => Err(EnrollError::NotReady(self.current_state(subject)?)),
        }
    }
}
