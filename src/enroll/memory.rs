// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! In-process [`EnrollmentStore`] backed by a map.
//!
//! Used by tests and by tooling that runs the coordinator without a
//! database. Commits are applied under one write lock, which gives the
//! single-logical-write guarantee the trait asks for.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use crate::enroll::error::StoreError;
use crate::enroll::state::{SubjectFacts, SubjectId};
use crate::enroll::store::{ArtifactUpdate, Commit, EnrollmentStore};

#[derive(Debug, Clone, Default)]
struct Record {
    photograph: Option<Vec<u8>>,
    key: Option<String>,
    artifact: Option<Vec<u8>>,
    stale: bool,
}

/// Map-backed store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<SubjectId, Record>>,
    artifact_writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert raw facts directly, bypassing the coordinator.
    ///
    /// Models records written before the coordinator existed.
    pub fn insert_record(&self, subject: SubjectId, photograph: Option<Vec<u8>>, key: Option<String>) {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        let record = records.entry(subject).or_default();
        record.photograph = photograph;
        record.key = key;
    }

    /// Number of commits that wrote an artifact.
    pub fn artifact_writes(&self) -> usize {
        self.artifact_writes.load(Ordering::SeqCst)
    }

    fn read<T>(&self, subject: &SubjectId, f: impl FnOnce(&Record) -> T) -> Option<T> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        records.get(subject).map(f)
    }
}

impl EnrollmentStore for MemoryStore {
    fn facts(&self, subject: &SubjectId) -> Result<SubjectFacts, StoreError> {
        Ok(self
            .read(subject, |r| SubjectFacts {
                has_photograph: r.photograph.is_some(),
                has_key: r.key.is_some(),
                has_artifact: r.artifact.is_some(),
                stale: r.stale,
            })
            .unwrap_or_default())
    }

    fn photograph(&self, subject: &SubjectId) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.read(subject, |r| r.photograph.clone()).flatten())
    }

    fn key(&self, subject: &SubjectId) -> Result<Option<String>, StoreError> {
        Ok(self.read(subject, |r| r.key.clone()).flatten())
    }

    fn artifact(&self, subject: &SubjectId) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.read(subject, |r| r.artifact.clone()).flatten())
    }

    fn commit(&self, subject: &SubjectId, commit: Commit<'_>) -> Result<(), StoreError> {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);

        let exists = records.get(subject).is_some_and(|r| r.artifact.is_some());
        if exists && matches!(commit.artifact, ArtifactUpdate::Create(_)) {
            return Err(StoreError::Conflict);
        }

        let record = records.entry(subject.clone()).or_default();
        if let Some(photo) = commit.photograph {
            record.photograph = Some(photo.to_vec());
        }
        if let Some(key) = commit.key {
            record.key = Some(key.as_str().to_string());
        }
        match commit.artifact {
            ArtifactUpdate::Unchanged => {}
            ArtifactUpdate::Create(bytes) | ArtifactUpdate::Replace(bytes) => {
                record.artifact = Some(bytes.to_vec());
                record.stale = false;
                self.artifact_writes.fetch_add(1, Ordering::SeqCst);
            }
            ArtifactUpdate::MarkStale => {
                if record.artifact.is_some() {
                    record.stale = true;
                }
            }
        }
        Ok(())
    }

    fn subjects(&self) -> Result<Vec<SubjectId>, StoreError> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        Ok(records.keys().cloned().collect())
    }
}
