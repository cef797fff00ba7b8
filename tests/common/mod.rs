// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use faceseal_core::enroll::{ArtifactUpdate, Commit, SubjectFacts};
use faceseal_core::{EnrollmentStore, MemoryStore, StoreError, SubjectId};
use image::{Rgb, RgbImage};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

pub const KEY_A: &str = "a1b2c3d4e5f6789012345678901234567890123456789012345678901234abcd";
pub const KEY_B: &str = "0f1e2d3c4b5a69788796a5b4c3d2e1f00f1e2d3c4b5a69788796a5b4c3d2e1f0";

/// Route library logs to the test harness; `RUST_LOG=debug` to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Deterministic noisy RGB photograph encoded as PNG.
pub fn photo_png(width: u32, height: u32, seed: u64) -> Vec<u8> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let img = RgbImage::from_fn(width, height, |_, _| Rgb([rng.gen(), rng.gen(), rng.gen()]));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

/// A [`MemoryStore`] wrapper whose commits can be made to fail, or to lose
/// a race against a simulated second writer.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    fail_commits: AtomicBool,
    race_next_create: AtomicBool,
    pub commits: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    /// The next `Create` commit is first applied on behalf of "another
    /// process", then reported to the caller as a conflict.
    pub fn race_next_create(&self) {
        self.race_next_create.store(true, Ordering::SeqCst);
    }
}

impl EnrollmentStore for FlakyStore {
    fn facts(&self, subject: &SubjectId) -> Result<SubjectFacts, StoreError> {
        self.inner.facts(subject)
    }

    fn photograph(&self, subject: &SubjectId) -> Result<Option<Vec<u8>>, StoreError> {
        self.inner.photograph(subject)
    }

    fn key(&self, subject: &SubjectId) -> Result<Option<String>, StoreError> {
        self.inner.key(subject)
    }

    fn artifact(&self, subject: &SubjectId) -> Result<Option<Vec<u8>>, StoreError> {
        self.inner.artifact(subject)
    }

    fn commit(&self, subject: &SubjectId, commit: Commit<'_>) -> Result<(), StoreError> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected failure".to_string()));
        }
        if matches!(commit.artifact, ArtifactUpdate::Create(_)) && self.race_next_create.swap(false, Ordering::SeqCst) {
            self.inner.commit(subject, commit)?;
            return Err(StoreError::Conflict);
        }
        self.commits.fetch_add(1, Ordering::SeqCst);
        self.inner.commit(subject, commit)
    }

    fn subjects(&self) -> Result<Vec<SubjectId>, StoreError> {
        self.inner.subjects()
    }
}
