// Copyright (C) 2026 Christopher Eykamp
//
// SPDX-License-Identifier: Apache-2.0

use crate::{api, Error, Result};
use reqwest::{header, StatusCode};
use serde::Serialize;
use slog_scope::{debug, error};

/// Client for the telemetry backend REST API.
///
/// Every authenticated call logs in first; the backend session token
/// is not kept between calls.
#[derive(Clone, Debug)]
pub struct Client {
    client: reqwest::Client,
    server: String,
    username: String,
    password: String,
}

impl Client {
    pub fn new(server: &str, username: &str, password: &str) -> Self {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::USER_AGENT, header::HeaderValue::from_static("birdhouse/0.1"));
        headers.insert(header::CONTENT_TYPE, header::HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .default_headers(headers)
            .build()
            .unwrap_or_default();

        Self {
            client,
            server: server.trim_end_matches('/').to_owned(),
            username: username.to_owned(),
            password: password.to_owned(),
        }
    }

    pub async fn login(&self) -> Result<String> {
        validate_url(&self.server)?;

        let response = self
            .client
            .post(&format!("{}/api/auth/login", &self.server))
            .json(&api::LoginRequest { username: &self.username, password: &self.password })
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.json::<api::LoginResponse>().await?.token),
            s => {
                error!("failed to log into {} as {}, status: {}", self.server, self.username, s);
                Err(Error::InvalidStatusResponse(s))
            }
        }
    }

    /// Looks a device up by its name, `None` when the backend does not
    /// know it.
    pub async fn device_by_name(&self, name: &str) -> Result<Option<api::Device>> {
        let token = self.login().await?;

        let response = self
            .client
            .get(&format!("{}/api/tenant/devices", &self.server))
            .query(&[("deviceName", name)])
            .header("X-Authorization", format!("Bearer {}", token))
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!("device {} is unknown to the backend", name);
                Ok(None)
            }
            StatusCode::OK => Ok(Some(response.json().await?)),
            s => Err(Error::InvalidStatusResponse(s)),
        }
    }

    /// Access token the device uses to submit telemetry.
    pub async fn device_token(&self, device: &api::Device) -> Result<String> {
        let token = self.login().await?;

        let response = self
            .client
            .get(&format!("{}/api/device/{}/credentials", &self.server, device.id.id))
            .header("X-Authorization", format!("Bearer {}", token))
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                Ok(response.json::<api::DeviceCredentials>().await?.credentials_id)
            }
            s => Err(Error::InvalidStatusResponse(s)),
        }
    }

    /// Submits telemetry on behalf of the device owning `device_token`.
    pub async fn send_telemetry<T>(&self, device_token: &str, data: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        validate_url(&self.server)?;

        let response = self
            .client
            .post(&format!("{}/api/v1/{}/telemetry", &self.server, device_token))
            .json(data)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::InvalidStatusResponse(response.status()));
        }

        Ok(())
    }
}

fn validate_url(url: &str) -> Result<()> {
    reqwest::Url::parse(url)?;
    Ok(())
}
