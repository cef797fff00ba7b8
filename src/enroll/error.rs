// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for the enrollment coordinator and its storage collaborator.

use core::fmt;

use crate::enroll::state::EnrollmentState;
use crate::stego::error::StegoError;
use crate::stego::verify::FailureReason;

/// Errors reported by an [`EnrollmentStore`](crate::enroll::EnrollmentStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store failed or timed out. Retrying is the caller's call.
    Unavailable(String),
    /// A conditional artifact write lost against an artifact that already
    /// exists. The coordinator absorbs this and re-evaluates.
    Conflict,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "store unavailable: {msg}"),
            Self::Conflict => write!(f, "artifact already exists"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Errors reported by the [`Coordinator`](crate::enroll::Coordinator).
///
/// Every variant leaves the persisted subject state exactly as it was before
/// the failing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrollError {
    /// Key or carrier problem during a build (bad format, capacity, key shape).
    Stego(StegoError),
    /// The storage collaborator failed.
    Persistence(StoreError),
    /// The freshly built artifact did not verify; nothing was persisted.
    SelfTestFailed(FailureReason),
    /// An explicit rebuild was requested for a subject missing a fact.
    NotReady(EnrollmentState),
}

impl fmt::Display for EnrollError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stego(e) => write!(f, "artifact build failed: {e}"),
            Self::Persistence(e) => write!(f, "persistence failure: {e}"),
            Self::SelfTestFailed(reason) => write!(f, "artifact self-test failed: {reason}"),
            Self::NotReady(state) => write!(f, "subject not ready for a build (state: {state})"),
        }
    }
}

impl std::error::Error for EnrollError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Stego(e) => Some(e),
            Self::Persistence(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StegoError> for EnrollError {
    fn from(e: StegoError) -> Self {
        Self::Stego(e)
    }
}

impl From<StoreError> for EnrollError {
    fn from(e: StoreError) -> Self {
        Self::Persistence(e)
    }
}
