// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Carrier capacity under the embedding plan.
//!
//! Every sample contributes exactly one LSB slot, so capacity is simply the
//! sample count. The helpers here let callers reject a photograph that is
//! too small before it ever reaches the coordinator.

use crate::carrier::CarrierImage;
use crate::config::CarrierLimits;
use crate::stego::error::StegoError;
use crate::stego::plan::EmbeddingPlan;

/// Capacity of a carrier relative to a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityInfo {
    /// LSB slots the carrier offers (one per sample).
    pub available: usize,
    /// Slots the plan needs.
    pub required: usize,
}

impl CapacityInfo {
    /// `true` if the plan fits.
    pub fn fits(&self) -> bool {
        self.available >= self.required
    }

    /// Unused slots after embedding (0 if it does not fit).
    pub fn spare(&self) -> usize {
        self.available.saturating_sub(self.required)
    }
}

/// Capacity of a decoded carrier under the version-1 plan.
pub fn capacity(carrier: &CarrierImage) -> CapacityInfo {
    CapacityInfo {
        available: carrier.sample_count(),
        required: EmbeddingPlan::V1.required_samples(),
    }
}

/// Decode `bytes` and report its capacity.
///
/// # Errors
/// Returns [`StegoError::Carrier`] if the bytes are not a decodable PNG.
pub fn capacity_of(bytes: &[u8], limits: &CarrierLimits) -> Result<CapacityInfo, StegoError> {
    let carrier = CarrierImage::decode_with_limits(bytes, limits)?;
    Ok(capacity(&carrier))
}
