// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Tunable parameters for the carrier codec and the enrollment coordinator.
//!
//! None of these values participate in the embedding plan itself; changing
//! them never invalidates previously built artifacts.

use serde::{Deserialize, Serialize};

/// Maximum pixel dimension (width or height) accepted at decode.
pub const MAX_DIMENSION: u32 = 8192;

/// Maximum total pixel count (width × height) accepted at decode.
pub const MAX_PIXELS: u64 = 16_000_000;

/// Number of key characters shown at each end of a preview.
pub const DEFAULT_PREVIEW_CHARS: usize = 8;

/// Size guards applied when decoding a carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarrierLimits {
    /// Largest allowed width or height in pixels.
    pub max_dimension: u32,
    /// Largest allowed width × height.
    pub max_pixels: u64,
}

impl Default for CarrierLimits {
    fn default() -> Self {
        Self {
            max_dimension: MAX_DIMENSION,
            max_pixels: MAX_PIXELS,
        }
    }
}

/// Coordinator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Characters of the key shown at each end of a verification preview.
    pub preview_chars: usize,
    /// Verify every freshly built artifact before persisting it.
    ///
    /// Only migration tooling should turn this off.
    pub self_test: bool,
    /// Decode guards for stored photographs and artifacts.
    pub limits: CarrierLimits,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            preview_chars: DEFAULT_PREVIEW_CHARS,
            self_test: true,
            limits: CarrierLimits::default(),
        }
    }
}
