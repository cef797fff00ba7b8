// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! # faceseal-core
//!
//! Hides a biometric-derived 64-hex-character key inside an enrollment
//! photograph and verifies it later. Three layers:
//!
//! - **Carrier** (`carrier`): lossless PNG codec exposing the image as a flat
//!   sequence of 8-bit channel samples.
//! - **Stego** (`stego`): LSB embedding of the 256 key bits into the first
//!   256 samples, extraction, and verification against an expected key.
//! - **Enroll** (`enroll`): a per-subject state machine that builds the
//!   artifact exactly once when both the photograph and the key are known,
//!   whichever arrives first and however the two arrivals interleave.
//!
//! The carrier path must stay lossless end to end. Any JPEG or other lossy
//! re-save of an artifact rewrites the LSB plane and the key is gone.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use faceseal_core::{embed_key, verify_artifact};
//!
//! let photo = std::fs::read("face.png").unwrap();
//! let key = "a1b2c3d4e5f6789012345678901234567890123456789012345678901234abcd";
//! let artifact = embed_key(&photo, key).unwrap();
//! let result = verify_artifact(&artifact, key).unwrap();
//! assert!(result.verified);
//! ```

pub mod carrier;
pub mod config;
pub mod enroll;
pub mod stego;

pub use carrier::error::CarrierError;
pub use carrier::{CarrierImage, ChannelLayout};
pub use config::{CarrierLimits, CoordinatorConfig};
pub use enroll::{
    ArtifactSummary, BackfillReport, Coordinator, EnrollError, EnrollmentCensus, EnrollmentState,
    EnrollmentStore, EventReport, MemoryStore, StoreError, SubjectId,
};
pub use stego::{embed_key, verify_artifact, FailureReason, SecretKey, StegoError, VerificationResult};
