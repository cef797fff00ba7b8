// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! The embedding plan: which sample carries which key bit.
//!
//! Version 1 is deliberately plain. Bit `i` of the key goes into the
//! least-significant bit of sample `offset + i`, walking the carrier in
//! raster order with channels in stored order. No sample is skipped and no
//! marker or length field is embedded: the verifier always knows the expected
//! key, so presence is decided by comparing against it.
//!
//! This mapping is the only contract between embed and extract. Changing any
//! of it requires a new [`PLAN_VERSION`] and invalidates every artifact
//! built under the old one.

use core::ops::Range;

use crate::stego::key::KEY_BITS;

/// Version of the sample mapping below.
pub const PLAN_VERSION: u8 = 1;

/// Bit position within a sample that carries payload (the LSB).
pub const PAYLOAD_BIT: u8 = 0;

/// A deterministic bit-index → sample-index mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddingPlan {
    offset: usize,
    bits: usize,
}

impl EmbeddingPlan {
    /// The version-1 plan for a 64-hex-character key.
    pub const V1: Self = Self { offset: 0, bits: KEY_BITS };

    /// Plan version.
    pub fn version(&self) -> u8 {
        PLAN_VERSION
    }

    /// Number of payload bits.
    pub fn bits(&self) -> usize {
        self.bits
    }

    /// Minimum sample count a carrier needs for this plan.
    pub fn required_samples(&self) -> usize {
        self.offset + self.bits
    }

    /// Sample index that carries payload bit `bit`.
    pub fn sample_index(&self, bit: usize) -> usize {
        debug_assert!(bit < self.bits);
        self.offset + bit
    }

    /// The contiguous range of samples the plan touches.
    pub fn slots(&self) -> Range<usize> {
        self.offset..self.required_samples()
    }
}

impl Default for EmbeddingPlan {
    fn default() -> Self {
        Self::V1
    }
}
