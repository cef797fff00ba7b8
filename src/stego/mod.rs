// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Key embedding and verification.
//!
//! Hides a 64-hex-character key in the LSB plane of a lossless carrier:
//!
//! 1. The key expands to 256 bits, MSB-first per nibble ([`key`]).
//! 2. Bit `i` replaces the LSB of sample `i` in raster order ([`plan`],
//!    [`embed`]).
//! 3. The carrier is re-encoded as PNG ([`crate::carrier`]).
//!
//! Verification reads the same 256 LSBs back ([`extract`]) and compares the
//! result with the expected key ([`verify`]). There is no self-describing
//! header: the caller always supplies the key it expects to find.

pub mod capacity;
pub mod embed;
pub mod error;
pub mod extract;
pub mod key;
pub mod plan;
pub mod verify;

pub use capacity::{capacity, capacity_of, CapacityInfo};
pub use error::StegoError;
pub use key::{SecretKey, KEY_BITS, KEY_HEX_LEN};
pub use plan::{EmbeddingPlan, PLAN_VERSION};
pub use verify::{FailureReason, VerificationResult};

use crate::carrier::CarrierImage;
use crate::config::{CarrierLimits, DEFAULT_PREVIEW_CHARS};

/// Embed `key` into the PNG `photo` and return the artifact as PNG bytes.
///
/// # Errors
/// - [`StegoError::InvalidKeyLength`] / [`StegoError::InvalidKeyDigit`] for a malformed key.
/// - [`StegoError::Carrier`] if `photo` is not a decodable PNG.
/// - [`StegoError::InsufficientCapacity`] if `photo` has fewer than 256 samples.
pub fn embed_key(photo: &[u8], key: &str) -> Result<Vec<u8>, StegoError> {
    let key = SecretKey::parse(key)?;
    embed_secret(photo, &key, &CarrierLimits::default())
}

/// Embed an already validated key. See [`embed_key`].
pub fn embed_secret(photo: &[u8], key: &SecretKey, limits: &CarrierLimits) -> Result<Vec<u8>, StegoError> {
    let carrier = CarrierImage::decode_with_limits(photo, limits)?;
    let stego = embed::embed_key_in_carrier(&carrier, key, &EmbeddingPlan::V1)?;
    Ok(stego.encode())
}

/// Verify that `artifact` carries `expected_key`.
///
/// The comparison ignores case. A mismatch is reported in the result, not as
/// an error.
///
/// # Errors
/// - [`StegoError::InvalidKeyLength`] / [`StegoError::InvalidKeyDigit`] for a malformed key.
/// - [`StegoError::Carrier`] if `artifact` is not a decodable PNG.
pub fn verify_artifact(artifact: &[u8], expected_key: &str) -> Result<VerificationResult, StegoError> {
    let expected = SecretKey::parse(expected_key)?;
    verify::verify_artifact_with(artifact, &expected, &CarrierLimits::default(), DEFAULT_PREVIEW_CHARS)
}
