// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Integrity verification of built artifacts.
//!
//! Decodes an artifact, extracts the key under the embedding plan and
//! compares it with the expected key. Used twice: as the self-test right
//! after a build, and as the on-demand "verify embedded key" action.
//!
//! A mismatch is a normal outcome and comes back as a negative
//! [`VerificationResult`]. Only malformed inputs (unsupported container,
//! malformed expected key) are errors.

use serde::{Deserialize, Serialize};

use crate::carrier::CarrierImage;
use crate::config::CarrierLimits;
use crate::stego::error::StegoError;
use crate::stego::extract::extract_key;
use crate::stego::key::SecretKey;
use crate::stego::plan::EmbeddingPlan;

/// Why a verification came back negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The extracted key differs from the expected one.
    KeyMismatch,
    /// The artifact has fewer samples than the embedding plan covers.
    InsufficientSamples,
    /// The subject has no artifact (or no key) to verify against.
    NotBuilt,
}

impl core::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::KeyMismatch => write!(f, "embedded key does not match"),
            Self::InsufficientSamples => write!(f, "artifact too small to hold a key"),
            Self::NotBuilt => write!(f, "no artifact has been built"),
        }
    }
}

/// Outcome of a verification. Ephemeral; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// `true` only when the extracted key equals the expected key.
    pub verified: bool,
    /// `first...last` characters of the verified key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    /// Set when `verified` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,
}

impl VerificationResult {
    /// A positive result with the given preview.
    pub fn verified(preview: String) -> Self {
        Self { verified: true, preview: Some(preview), reason: None }
    }

    /// A negative result.
    pub fn failed(reason: FailureReason) -> Self {
        Self { verified: false, preview: None, reason: Some(reason) }
    }
}

/// Verify a decoded carrier against `expected`.
pub fn verify_carrier(
    carrier: &CarrierImage,
    expected: &SecretKey,
    plan: &EmbeddingPlan,
    preview_chars: usize,
) -> VerificationResult {
    let Some(extracted) = extract_key(carrier.samples(), plan) else {
        return VerificationResult::failed(FailureReason::InsufficientSamples);
    };

    if extracted == *expected {
        VerificationResult::verified(extracted.preview(preview_chars))
    } else {
        VerificationResult::failed(FailureReason::KeyMismatch)
    }
}

/// Decode `artifact` and verify it against `expected`.
///
/// # Errors
/// - [`StegoError::Carrier`] if the artifact cannot be decoded.
pub fn verify_artifact_with(
    artifact: &[u8],
    expected: &SecretKey,
    limits: &CarrierLimits,
    preview_chars: usize,
) -> Result<VerificationResult, StegoError> {
    let carrier = CarrierImage::decode_with_limits(artifact, limits)?;
    Ok(verify_carrier(&carrier, expected, &EmbeddingPlan::V1, preview_chars))
}
