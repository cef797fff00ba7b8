// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! End-to-end embed / verify tests through the PNG carrier.

mod common;

use common::{photo_png, KEY_A, KEY_B};
use faceseal_core::stego::{capacity_of, EmbeddingPlan};
use faceseal_core::{
    embed_key, verify_artifact, CarrierError, CarrierImage, CarrierLimits, ChannelLayout, FailureReason, StegoError,
};
use proptest::prelude::*;

fn flat_png(width: u32, height: u32, layout: ChannelLayout, value: u8) -> Vec<u8> {
    let len = width as usize * height as usize * layout.channels();
    CarrierImage::from_samples(width, height, layout, vec![value; len]).unwrap().encode()
}

#[test]
fn embed_verify_64x64_rgb() {
    let photo = photo_png(64, 64, 1);
    let artifact = embed_key(&photo, KEY_A).unwrap();

    let result = verify_artifact(&artifact, KEY_A).unwrap();
    assert!(result.verified);
    assert_eq!(result.preview.as_deref(), Some("a1b2c3d4...1234abcd"));
    assert_eq!(result.reason, None);

    let decoded = CarrierImage::decode(&artifact).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (64, 64));
    assert_eq!(decoded.layout(), ChannelLayout::Rgb);
}

#[test]
fn only_payload_lsbs_change() {
    let photo = photo_png(32, 32, 2);
    let artifact = embed_key(&photo, KEY_A).unwrap();

    let before = CarrierImage::decode(&photo).unwrap();
    let after = CarrierImage::decode(&artifact).unwrap();
    let required = EmbeddingPlan::V1.required_samples();
    for (i, (a, b)) in before.samples().iter().zip(after.samples()).enumerate() {
        assert_eq!(a & 0xFE, b & 0xFE, "sample {i} changed above the LSB");
        if i >= required {
            assert_eq!(a, b, "sample {i} outside the payload changed");
        }
    }
}

#[test]
fn wrong_key_does_not_verify() {
    let artifact = embed_key(&photo_png(20, 20, 3), KEY_A).unwrap();
    let result = verify_artifact(&artifact, KEY_B).unwrap();
    assert!(!result.verified);
    assert_eq!(result.reason, Some(FailureReason::KeyMismatch));
    assert_eq!(result.preview, None);
}

#[test]
fn expected_key_case_is_ignored() {
    let artifact = embed_key(&photo_png(20, 20, 4), &KEY_A.to_ascii_uppercase()).unwrap();
    assert!(verify_artifact(&artifact, KEY_A).unwrap().verified);
}

#[test]
fn capacity_boundary() {
    // 16x16 gray is exactly 256 samples.
    let exact = flat_png(16, 16, ChannelLayout::Gray, 0x80);
    let artifact = embed_key(&exact, KEY_A).unwrap();
    assert!(verify_artifact(&artifact, KEY_A).unwrap().verified);

    // 85x1 RGB is 255 samples.
    let short = flat_png(85, 1, ChannelLayout::Rgb, 0x80);
    assert_eq!(
        embed_key(&short, KEY_A),
        Err(StegoError::InsufficientCapacity { required: 256, available: 255 })
    );

    let info = capacity_of(&short, &CarrierLimits::default()).unwrap();
    assert!(!info.fits());
}

#[test]
fn short_carrier_reports_insufficient_samples() {
    let short = flat_png(10, 10, ChannelLayout::Gray, 0);
    let result = verify_artifact(&short, KEY_A).unwrap();
    assert!(!result.verified);
    assert_eq!(result.reason, Some(FailureReason::InsufficientSamples));
}

#[test]
fn unembedded_photo_does_not_verify() {
    let result = verify_artifact(&photo_png(32, 32, 5), KEY_A).unwrap();
    assert_eq!(result.reason, Some(FailureReason::KeyMismatch));
}

#[test]
fn non_payload_bit_flip_survives() {
    let artifact = embed_key(&photo_png(24, 24, 6), KEY_A).unwrap();
    let mut carrier = CarrierImage::decode(&artifact).unwrap();
    carrier.samples_mut()[17] ^= 0b0000_0100;
    carrier.samples_mut()[300] ^= 0b0000_0001;
    assert!(verify_artifact(&carrier.encode(), KEY_A).unwrap().verified);
}

#[test]
fn payload_bit_flip_is_detected() {
    let artifact = embed_key(&photo_png(24, 24, 7), KEY_A).unwrap();
    for index in [0usize, 128, 255] {
        let mut carrier = CarrierImage::decode(&artifact).unwrap();
        carrier.samples_mut()[index] ^= 1;
        let result = verify_artifact(&carrier.encode(), KEY_A).unwrap();
        assert_eq!(result.reason, Some(FailureReason::KeyMismatch), "flip at {index}");
    }
}

#[test]
fn low_bit_quantization_destroys_key() {
    // Stand-in for a lossy re-save: the LSB plane is rewritten.
    let artifact = embed_key(&photo_png(24, 24, 8), KEY_A).unwrap();
    let mut carrier = CarrierImage::decode(&artifact).unwrap();
    for s in carrier.samples_mut() {
        *s &= 0xFC;
    }
    assert!(!verify_artifact(&carrier.encode(), KEY_A).unwrap().verified);
}

#[test]
fn artifact_reencode_is_stable() {
    let artifact = embed_key(&photo_png(16, 16, 9), KEY_A).unwrap();
    let reencoded = CarrierImage::decode(&artifact).unwrap().encode();
    assert_eq!(CarrierImage::decode(&reencoded).unwrap(), CarrierImage::decode(&artifact).unwrap());
    assert!(verify_artifact(&reencoded, KEY_A).unwrap().verified);
}

#[test]
fn unsupported_formats_are_rejected() {
    let jpeg_magic = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];
    let err = embed_key(&jpeg_magic, KEY_A).unwrap_err();
    assert!(err.is_unsupported_format(), "{err}");

    let err = verify_artifact(b"plain text, not an image", KEY_A).unwrap_err();
    assert!(err.is_unsupported_format(), "{err}");

    let err = embed_key(&[], KEY_A).unwrap_err();
    assert!(matches!(err, StegoError::Carrier(CarrierError::UnsupportedFormat(_))), "{err}");
}

#[test]
fn malformed_keys_are_rejected_before_decoding() {
    assert_eq!(embed_key(b"not a png", "abc"), Err(StegoError::InvalidKeyLength(3)));
    let bad_digit = format!("{}g", &KEY_A[..63]);
    assert_eq!(embed_key(b"not a png", &bad_digit), Err(StegoError::InvalidKeyDigit { position: 63 }));
}

#[test]
fn every_layout_carries_the_key() {
    for layout in [ChannelLayout::Gray, ChannelLayout::GrayAlpha, ChannelLayout::Rgb, ChannelLayout::Rgba] {
        let photo = flat_png(20, 20, layout, 0x55);
        let artifact = embed_key(&photo, KEY_B).unwrap();
        assert!(verify_artifact(&artifact, KEY_B).unwrap().verified, "{layout:?}");
        assert_eq!(CarrierImage::decode(&artifact).unwrap().layout(), layout);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn any_key_roundtrips(key in "[0-9a-fA-F]{64}", w in 1u32..48, h in 1u32..48, seed in any::<u64>()) {
        let photo = photo_png(w, h, seed);
        let samples = w as usize * h as usize * 3;
        match embed_key(&photo, &key) {
            Ok(artifact) => {
                prop_assert!(samples >= 256);
                let result = verify_artifact(&artifact, &key).unwrap();
                prop_assert!(result.verified);
            }
            Err(e) => {
                prop_assert!(samples < 256);
                prop_assert_eq!(e, StegoError::InsufficientCapacity { required: 256, available: samples });
            }
        }
    }
}
