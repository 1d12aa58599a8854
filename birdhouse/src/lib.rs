// Copyright (C) 2026 Christopher Eykamp
//
// SPDX-License-Identifier: Apache-2.0

mod build_info;
pub mod firmware;
pub mod geo;
mod http_api;
pub mod logger;
mod settings;
mod utils;

pub use crate::{build_info::version, settings::Settings};

use derive_more::{Display, From};
use slog_scope::info;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, From)]
pub enum Error {
    #[display(fmt = "Settings error: {}", _0)]
    Settings(crate::settings::Error),
    #[display(fmt = "Firmware error: {}", _0)]
    Firmware(crate::firmware::Error),
    #[display(fmt = "Server error: {}", _0)]
    Server(warp::Error),
    #[display(fmt = "Unable to resolve listen socket: {}", _0)]
    #[from(ignore)]
    UnresolvedListenSocket(String),
    #[display(fmt = "Io error: {}", _0)]
    Io(std::io::Error),
}

/// Serves the gateway HTTP API on the listen socket found in
/// `settings` until the process is stopped.
pub async fn run(settings: Settings) -> Result<()> {
    let listen_socket = settings.listen_socket.clone();
    let address = tokio::net::lookup_host(&listen_socket)
        .await?
        .next()
        .ok_or_else(|| Error::UnresolvedListenSocket(listen_socket.clone()))?;

    info!("serving firmware from {:?}", settings.firmware_images_folder);
    let (address, server) = http_api::Api::new(&settings).server().try_bind_ephemeral(address)?;
    info!("listening for requests on {}", address);

    server.await;
    Ok(())
}
