// Copyright (C) 2026 Christopher Eykamp
//
// SPDX-License-Identifier: Apache-2.0

use argh::FromArgs;
use slog_scope::info;
use std::path::PathBuf;

#[derive(FromArgs)]
/// Firmware update and geolocation gateway for birdhouse devices.
struct TopLevel {
    /// print version information
    #[argh(switch)]
    version: bool,

    /// configuration file to use (defaults to birdhouse.cfg in the
    /// user configuration directory)
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// change the log level (critical, error, warning, info, debug or
    /// trace)
    #[argh(option, short = 'v', default = "slog::Level::Info", from_str_fn(verbosity_level))]
    verbosity: slog::Level,
}

fn verbosity_level(value: &str) -> Result<slog::Level, String> {
    use std::str::FromStr;
    slog::Level::from_str(value).map_err(|_| format!("failed to parse verbosity level: {}", value))
}

async fn run(cmd: TopLevel) -> birdhouse::Result<()> {
    birdhouse::logger::init(cmd.verbosity);
    info!("starting birdhouse gateway {}", birdhouse::version());

    let path = match cmd.config {
        Some(path) => path,
        None => birdhouse::Settings::default_path()?,
    };
    let settings = birdhouse::Settings::load(&path)?;
    birdhouse::run(settings).await
}

#[tokio::main]
async fn main() {
    let cmd: TopLevel = argh::from_env();

    if cmd.version {
        println!("{}", birdhouse::version());
        return;
    }

    if let Err(ref e) = run(cmd).await {
        eprintln!("{}", e);

        std::process::exit(1);
    }
}
