// Copyright (C) 2026 Christopher Eykamp
//
// SPDX-License-Identifier: Apache-2.0

use super::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::{fmt, str::FromStr};

lazy_static! {
    static ref VERSION_STRING: Regex = Regex::new(r"^([0-9]+)\.([0-9]+)$").unwrap();
    static ref IMAGE_FILE_NAME: Regex = Regex::new(r"([0-9]+)\.([0-9]+)\.bin$").unwrap();
}

/// Firmware version as a `major.minor` pair.
///
/// Ordering compares `major` first and falls back to `minor` when the
/// majors are equal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
}

impl Version {
    pub fn new(major: u64, minor: u64) -> Self {
        Version { major, minor }
    }

    /// Extracts the version encoded at the end of a firmware image
    /// name, as in `release_2.5.bin`. Any prefix is accepted but the
    /// name must end right after `.bin`.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let captures = IMAGE_FILE_NAME.captures(name)?;
        Some(Version { major: captures[1].parse().ok()?, minor: captures[2].parse().ok()? })
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidVersion(s.to_owned());
        let captures = VERSION_STRING.captures(s.trim()).ok_or_else(invalid)?;

        Ok(Version {
            major: captures[1].parse().map_err(|_| invalid())?,
            minor: captures[2].parse().map_err(|_| invalid())?,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
