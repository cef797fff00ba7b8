// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Bit-plane embedding.
//!
//! Overwrites the least-significant bit of each planned sample with one
//! payload bit. The upper seven bits are never touched, so every selected
//! sample moves by at most one intensity level and every other sample is
//! left exactly as it was.

use crate::carrier::CarrierImage;
use crate::stego::error::StegoError;
use crate::stego::key::SecretKey;
use crate::stego::plan::{EmbeddingPlan, PAYLOAD_BIT};

/// Embed `bits` (values 0/1) into `samples` in place according to `plan`.
///
/// # Errors
/// Returns [`StegoError::InsufficientCapacity`] if `samples` is shorter than
/// the plan requires. Nothing is written in that case.
pub fn embed_bits(samples: &mut [u8], bits: &[u8], plan: &EmbeddingPlan) -> Result<(), StegoError> {
    debug_assert_eq!(bits.len(), plan.bits(), "payload length does not match plan");

    let required = plan.required_samples();
    if samples.len() < required {
        return Err(StegoError::InsufficientCapacity { required, available: samples.len() });
    }

    let mask = 1u8 << PAYLOAD_BIT;
    for (i, &bit) in bits.iter().enumerate() {
        let s = &mut samples[plan.sample_index(i)];
        *s = (*s & !mask) | ((bit & 1) << PAYLOAD_BIT);
    }
    Ok(())
}

/// Return a copy of `carrier` with `key` embedded under `plan`.
///
/// The input carrier is not modified.
pub fn embed_key_in_carrier(
    carrier: &CarrierImage,
    key: &SecretKey,
    plan: &EmbeddingPlan,
) -> Result<CarrierImage, StegoError> {
    let required = plan.required_samples();
    if carrier.sample_count() < required {
        return Err(StegoError::InsufficientCapacity { required, available: carrier.sample_count() });
    }

    let mut out = carrier.clone();
    embed_bits(out.samples_mut(), &key.to_bits(), plan)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alternating() -> Vec<u8> {
        (0..256).map(|i| (i % 2) as u8).collect()
    }

    #[test]
    fn only_lsb_changes() {
        let mut samples: Vec<u8> = (0..300).map(|i| (i * 37 % 256) as u8).collect();
        let original = samples.clone();
        embed_bits(&mut samples, &alternating(), &EmbeddingPlan::V1).unwrap();

        for (i, (&a, &b)) in original.iter().zip(&samples).enumerate() {
            assert_eq!(a & 0xFE, b & 0xFE, "upper bits changed at {i}");
            if i < 256 {
                assert_eq!(b & 1, (i % 2) as u8);
            } else {
                assert_eq!(a, b, "sample outside plan changed at {i}");
            }
        }
    }

    #[test]
    fn exact_capacity_fits() {
        let mut samples = vec![0xFFu8; 256];
        embed_bits(&mut samples, &vec![0; 256], &EmbeddingPlan::V1).unwrap();
        assert!(samples.iter().all(|&s| s == 0xFE));
    }

    #[test]
    fn one_short_fails_untouched() {
        let mut samples = vec![0x55u8; 255];
        let result = embed_bits(&mut samples, &alternating(), &EmbeddingPlan::V1);
        assert_eq!(result, Err(StegoError::InsufficientCapacity { required: 256, available: 255 }));
        assert!(samples.iter().all(|&s| s == 0x55));
    }

    #[test]
    fn embedding_twice_is_idempotent() {
        let mut once: Vec<u8> = (0..512).map(|i| (i % 251) as u8).collect();
        embed_bits(&mut once, &alternating(), &EmbeddingPlan::V1).unwrap();
        let mut twice = once.clone();
        embed_bits(&mut twice, &alternating(), &EmbeddingPlan::V1).unwrap();
        assert_eq!(once, twice);
    }
}
