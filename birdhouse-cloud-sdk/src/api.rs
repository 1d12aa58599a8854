// Copyright (C) 2026 Christopher Eykamp
//
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Device entry as stored by the telemetry backend.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Device {
    pub id: EntityId,
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EntityId {
    pub id: String,
    pub entity_type: String,
}

/// A wireless access point seen by a device, in the format the
/// geolocation service expects it.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccessPoint {
    pub mac_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal_strength: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal_to_noise_ratio: Option<i32>,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

/// Position resolved by the geolocation service. `accuracy` is the
/// radius, in meters, of the confidence circle around `location`.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct Geolocation {
    pub location: Location,
    pub accuracy: f64,
}

#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub(crate) username: &'a str,
    pub(crate) password: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct LoginResponse {
    pub(crate) token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeviceCredentials {
    pub(crate) credentials_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeolocateRequest<'a> {
    pub(crate) wifi_access_points: &'a [AccessPoint],
}
