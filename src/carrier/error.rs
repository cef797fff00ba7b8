// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for carrier decoding and construction.

use std::fmt;

/// Errors that can occur while decoding a carrier or building one from samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarrierError {
    /// The container is not a supported lossless raster format.
    /// Carries the detected format name, or `"unknown"`.
    UnsupportedFormat(String),
    /// The container was recognised as PNG but could not be decoded.
    Decode(String),
    /// Width or height is zero.
    EmptyImage,
    /// Dimensions exceed the configured limits.
    ImageTooLarge { width: u32, height: u32 },
    /// Sample buffer length does not equal width × height × channels.
    SampleCountMismatch { expected: usize, actual: usize },
}

impl fmt::Display for CarrierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFormat(name) => write!(f, "unsupported carrier format: {name} (PNG required)"),
            Self::Decode(msg) => write!(f, "PNG decode failed: {msg}"),
            Self::EmptyImage => write!(f, "carrier has zero width or height"),
            Self::ImageTooLarge { width, height } => write!(f, "carrier too large: {width}x{height}"),
            Self::SampleCountMismatch { expected, actual } => {
                write!(f, "sample count mismatch: expected {expected}, got {actual}")
            }
        }
    }
}

impl std::error::Error for CarrierError {}

pub type Result<T> = std::result::Result<T, CarrierError>;
