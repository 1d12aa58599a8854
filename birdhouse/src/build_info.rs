// Copyright (C) 2026 Christopher Eykamp
//
// SPDX-License-Identifier: Apache-2.0

//! Build information module

const VERSION: &str = env!("VERSION");

/// Returns the version in use, including the commit and if there is
/// uncommited modification in the source.
///
/// Internally, it use `git describe` to get the version and the
/// number of changes since the last tag. Builds outside of a git
/// checkout report the package version.
///
/// # Example
/// ```
/// println!("Running version: {}", birdhouse::version());
/// ```
pub fn version() -> &'static str {
    VERSION
}
