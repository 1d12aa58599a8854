// Copyright (C) 2026 Christopher Eykamp
//
// SPDX-License-Identifier: Apache-2.0

use git_version::git_version;

fn main() {
    println!(
        "cargo:rustc-env=VERSION={}",
        git_version!(
            args = ["--tags", "--always", "--dirty=-modified"],
            fallback = env!("CARGO_PKG_VERSION")
        )
    );
}
