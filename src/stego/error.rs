// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for key embedding and verification.
//!
//! [`StegoError`] covers faults only. A key that does not match the one
//! read back from an artifact is not an error; it is reported as a negative
//! [`VerificationResult`](crate::stego::VerificationResult).

use core::fmt;

use crate::carrier::error::CarrierError;

/// Errors that can occur while embedding or verifying a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StegoError {
    /// The carrier could not be decoded (unsupported container, corrupt PNG,
    /// oversized image).
    Carrier(CarrierError),
    /// The carrier has fewer samples than the embedding plan needs.
    InsufficientCapacity { required: usize, available: usize },
    /// The key is not exactly 64 characters long.
    InvalidKeyLength(usize),
    /// The key contains a non-hexadecimal character at this byte position.
    InvalidKeyDigit { position: usize },
}

impl StegoError {
    /// `true` if the carrier container itself was rejected.
    pub fn is_unsupported_format(&self) -> bool {
        matches!(self, Self::Carrier(CarrierError::UnsupportedFormat(_)))
    }
}

impl fmt::Display for StegoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Carrier(e) => write!(f, "invalid carrier: {e}"),
            Self::InsufficientCapacity { required, available } => {
                write!(f, "carrier too small: need {required} samples, have {available}")
            }
            Self::InvalidKeyLength(len) => write!(f, "key must be 64 hex characters, got {len}"),
            Self::InvalidKeyDigit { position } => write!(f, "key has a non-hex character at position {position}"),
        }
    }
}

impl std::error::Error for StegoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Carrier(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CarrierError> for StegoError {
    fn from(e: CarrierError) -> Self {
        Self::Carrier(e)
    }
}
