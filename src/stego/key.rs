// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! The embedded secret: a 64-character hexadecimal key.
//!
//! The key is generated elsewhere (fingerprint enrollment) and treated as an
//! opaque token. This module only validates its shape, converts it to and
//! from the bit sequence the embedding plan consumes, and produces the short
//! preview that is safe to display or log.
//!
//! Bit order: characters in string order, each nibble MSB first. Character
//! `k` therefore occupies bits `4k..4k+4`.

use core::fmt;

use zeroize::Zeroizing;

use crate::stego::error::StegoError;

/// Number of hex characters in a key.
pub const KEY_HEX_LEN: usize = 64;

/// Number of bits a key expands to (one per hex nibble bit).
pub const KEY_BITS: usize = KEY_HEX_LEN * 4;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// A validated 64-hex-character key, stored lowercase and wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey {
    hex: Zeroizing<String>,
}

impl SecretKey {
    /// Validate and normalise a key. Case is ignored.
    ///
    /// # Errors
    /// - [`StegoError::InvalidKeyLength`] unless `s` is exactly 64 bytes.
    /// - [`StegoError::InvalidKeyDigit`] on the first non-hex character.
    pub fn parse(s: &str) -> Result<Self, StegoError> {
        if s.len() != KEY_HEX_LEN {
            return Err(StegoError::InvalidKeyLength(s.len()));
        }
        if let Some(position) = s.bytes().position(|b| !b.is_ascii_hexdigit()) {
            return Err(StegoError::InvalidKeyDigit { position });
        }
        Ok(Self { hex: Zeroizing::new(s.to_ascii_lowercase()) })
    }

    /// Rebuild a key from exactly [`KEY_BITS`] bits (values 0/1), MSB-first
    /// per nibble.
    pub fn from_bits(bits: &[u8]) -> Self {
        debug_assert_eq!(bits.len(), KEY_BITS, "key bit count mismatch");

        let mut hex = Zeroizing::new(String::with_capacity(KEY_HEX_LEN));
        for nibble_bits in bits.chunks_exact(4) {
            let nibble = nibble_bits.iter().fold(0usize, |acc, &b| (acc << 1) | (b & 1) as usize);
            hex.push(HEX_DIGITS[nibble] as char);
        }
        Self { hex }
    }

    /// Expand the key into [`KEY_BITS`] bits, MSB-first per nibble.
    pub fn to_bits(&self) -> Zeroizing<Vec<u8>> {
        let mut bits = Zeroizing::new(Vec::with_capacity(KEY_BITS));
        for c in self.hex.bytes() {
            let nibble = hex_value(c);
            for shift in (0..4).rev() {
                bits.push((nibble >> shift) & 1);
            }
        }
        bits
    }

    /// The normalised lowercase hex string.
    pub fn as_str(&self) -> &str {
        &self.hex
    }

    /// First and last `chars` characters joined by `...`.
    ///
    /// Returns the whole key if the two ends would overlap.
    pub fn preview(&self, chars: usize) -> String {
        let hex = self.as_str();
        if chars * 2 >= KEY_HEX_LEN {
            return hex.to_string();
        }
        format!("{}...{}", &hex[..chars], &hex[KEY_HEX_LEN - chars..])
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SecretKey").field(&self.preview(4)).finish()
    }
}

fn hex_value(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        // Keys are validated and lowercased at construction.
        _ => unreachable!("non-hex digit in validated key"),
    }
}
