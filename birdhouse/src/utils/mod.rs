// Copyright (C) 2026 Christopher Eykamp
//
// SPDX-License-Identifier: Apache-2.0

pub(crate) mod log;

use openssl::hash::{hash, MessageDigest};
use std::fmt::Write;

/// Encode a bytes stream in hex
#[inline]
pub(crate) fn hex_encode(data: &[u8]) -> String {
    data.iter().fold(String::new(), |mut output, c| {
        let _ = write!(output, "{c:02x}");

        output
    })
}

/// Get md5sum hash from a byte stream
#[inline]
pub(crate) fn md5sum(data: &[u8]) -> Result<String, openssl::error::ErrorStack> {
    Ok(hex_encode(&hash(MessageDigest::md5(), data)?))
}
