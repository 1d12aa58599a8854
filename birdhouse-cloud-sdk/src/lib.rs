// Copyright (C) 2026 Christopher Eykamp
//
// SPDX-License-Identifier: Apache-2.0

pub mod api;
mod client;
mod geolocation;

pub use client::Client;
pub use geolocation::Geolocator;

use derive_more::{Display, Error, From};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, From)]
pub enum Error {
    JsonParsing(serde_json::Error),

    Http(reqwest::Error),
    #[display(fmt = "Invalid status response: {}", _0)]
    InvalidStatusResponse(#[error(not(source))] reqwest::StatusCode),
    #[display(fmt = "Invalid url: {}", _0)]
    UrlParse(url::ParseError),
    #[display(fmt = "Service replied with an error: {}", _0)]
    #[from(ignore)]
    Service(#[error(not(source))] String),
}
