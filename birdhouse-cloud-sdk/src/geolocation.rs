// Copyright (C) 2026 Christopher Eykamp
//
// SPDX-License-Identifier: Apache-2.0

use crate::{api, Error, Result};
use reqwest::StatusCode;
use slog_scope::debug;

/// Client for a Wi-Fi geolocation service speaking the Google
/// Geolocation API protocol.
#[derive(Clone, Debug)]
pub struct Geolocator {
    client: reqwest::Client,
    url: String,
    key: String,
}

impl Geolocator {
    pub fn new(url: &str, key: &str) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self { client, url: url.to_owned(), key: key.to_owned() }
    }

    pub async fn geolocate(&self, access_points: &[api::AccessPoint]) -> Result<api::Geolocation> {
        let url = reqwest::Url::parse(&self.url)?;
        debug!("geolocating from {} access points", access_points.len());

        let response = self
            .client
            .post(url)
            .query(&[("key", &self.key)])
            .json(&api::GeolocateRequest { wifi_access_points: access_points })
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        let value: serde_json::Value = serde_json::from_slice(&body)?;

        if let Some(err) = value.get("error") {
            let message = err
                .get("message")
                .and_then(serde_json::Value::as_str)
                .map(ToOwned::to_owned)
                .unwrap_or_else(|| err.to_string());
            return Err(Error::Service(message));
        }

        if status != StatusCode::OK {
            return Err(Error::InvalidStatusResponse(status));
        }

        Ok(serde_json::from_value(value)?)
    }
}
