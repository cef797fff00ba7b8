// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Bit-plane extraction: the exact inverse of [`embed`](super::embed).
//!
//! Extraction is best-effort. It reads whatever the planned LSBs hold; it
//! cannot tell on its own whether a key was ever embedded.

use crate::stego::key::SecretKey;
use crate::stego::plan::{EmbeddingPlan, PAYLOAD_BIT};

/// Read the planned payload bits from `samples`.
///
/// Returns `None` if there are fewer samples than the plan requires.
pub fn extract_bits(samples: &[u8], plan: &EmbeddingPlan) -> Option<Vec<u8>> {
    if samples.len() < plan.required_samples() {
        return None;
    }
    Some(
        (0..plan.bits())
            .map(|i| (samples[plan.sample_index(i)] >> PAYLOAD_BIT) & 1)
            .collect(),
    )
}

/// Read a key back from `samples`, or `None` if the carrier is too small.
pub fn extract_key(samples: &[u8], plan: &EmbeddingPlan) -> Option<SecretKey> {
    let bits = zeroize::Zeroizing::new(extract_bits(samples, plan)?);
    Some(SecretKey::from_bits(&bits))
}
