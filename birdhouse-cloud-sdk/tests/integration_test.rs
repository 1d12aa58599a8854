// Copyright (C) 2026 Christopher Eykamp
//
// SPDX-License-Identifier: Apache-2.0

use birdhouse_cloud_sdk::{self as sdk, api};

use mockito::{Matcher, Mock, ServerGuard};
use serde_json::json;

const JWT: &str = "eyJhbGciOiJIUzUxMiJ9.fake.token";

async fn mock_login(server: &mut ServerGuard) -> Mock {
    server
        .mock("POST", "/api/auth/login")
        .match_header("Content-Type", "application/json")
        .match_body(Matcher::Json(json!({ "username": "user", "password": "pass" })))
        .with_status(200)
        .with_body(json!({ "token": JWT, "refreshToken": "refresh" }).to_string())
        .create_async()
        .await
}

fn device() -> api::Device {
    api::Device {
        id: api::EntityId {
            id: "4a1e9bd0-5c3f-11e8-9d0e-a3e1a9fe2b13".to_owned(),
            entity_type: "DEVICE".to_owned(),
        },
        name: "Birdhouse 001".to_owned(),
        kind: Some("birdhouse".to_owned()),
    }
}

#[tokio::test]
async fn login_returns_token() {
    let mut server = mockito::Server::new_async().await;
    let login = mock_login(&mut server).await;

    let client = sdk::Client::new(&server.url(), "user", "pass");
    assert_eq!(client.login().await.unwrap(), JWT);

    login.assert_async().await;
}

#[tokio::test]
async fn login_rejected() {
    let mut server = mockito::Server::new_async().await;
    let _login =
        server.mock("POST", "/api/auth/login").with_status(401).create_async().await;

    let client = sdk::Client::new(&server.url(), "user", "pass");
    match client.login().await {
        Err(sdk::Error::InvalidStatusResponse(s)) => assert_eq!(s.as_u16(), 401),
        r => panic!("unexpected result: {:?}", r),
    }
}

#[tokio::test]
async fn device_lookup() {
    let mut server = mockito::Server::new_async().await;
    let _login = mock_login(&mut server).await;
    let lookup = server
        .mock("GET", "/api/tenant/devices")
        .match_query(Matcher::UrlEncoded("deviceName".into(), "Birdhouse 001".into()))
        .match_header("X-Authorization", format!("Bearer {}", JWT).as_str())
        .with_status(200)
        .with_body(
            json!({
                "id": { "entityType": "DEVICE", "id": "4a1e9bd0-5c3f-11e8-9d0e-a3e1a9fe2b13" },
                "name": "Birdhouse 001",
                "type": "birdhouse",
                "createdTime": 1526650000000u64
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = sdk::Client::new(&server.url(), "user", "pass");
    assert_eq!(client.device_by_name("Birdhouse 001").await.unwrap(), Some(device()));

    lookup.assert_async().await;
}

#[tokio::test]
async fn unknown_device() {
    let mut server = mockito::Server::new_async().await;
    let _login = mock_login(&mut server).await;
    let _lookup = server
        .mock("GET", "/api/tenant/devices")
        .match_query(Matcher::UrlEncoded("deviceName".into(), "nobody".into()))
        .with_status(404)
        .create_async()
        .await;

    let client = sdk::Client::new(&server.url(), "user", "pass");
    assert_eq!(client.device_by_name("nobody").await.unwrap(), None);
}

#[tokio::test]
async fn device_token() {
    let mut server = mockito::Server::new_async().await;
    let _login = mock_login(&mut server).await;
    let credentials = server
        .mock("GET", "/api/device/4a1e9bd0-5c3f-11e8-9d0e-a3e1a9fe2b13/credentials")
        .match_header("X-Authorization", format!("Bearer {}", JWT).as_str())
        .with_status(200)
        .with_body(
            json!({
                "credentialsType": "ACCESS_TOKEN",
                "credentialsId": "AABBCC",
                "credentialsValue": null
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = sdk::Client::new(&server.url(), "user", "pass");
    assert_eq!(client.device_token(&device()).await.unwrap(), "AABBCC");

    credentials.assert_async().await;
}

#[tokio::test]
async fn telemetry_submission() {
    let mut server = mockito::Server::new_async().await;
    let telemetry = server
        .mock("POST", "/api/v1/AABBCC/telemetry")
        .match_body(Matcher::Json(json!({ "wifiDistance": 12.5, "wifiDistanceAccuracy": 30.0 })))
        .with_status(200)
        .create_async()
        .await;

    let client = sdk::Client::new(&server.url(), "user", "pass");
    client
        .send_telemetry("AABBCC", &json!({ "wifiDistance": 12.5, "wifiDistanceAccuracy": 30.0 }))
        .await
        .unwrap();

    telemetry.assert_async().await;
}

#[tokio::test]
async fn telemetry_rejected() {
    let mut server = mockito::Server::new_async().await;
    let _telemetry =
        server.mock("POST", "/api/v1/AABBCC/telemetry").with_status(500).create_async().await;

    let client = sdk::Client::new(&server.url(), "user", "pass");
    assert!(client.send_telemetry("AABBCC", &json!({})).await.is_err());
}

#[tokio::test]
async fn geolocation() {
    let mut server = mockito::Server::new_async().await;
    let geolocate = server
        .mock("POST", "/geolocation/v1/geolocate")
        .match_query(Matcher::UrlEncoded("key".into(), "secret".into()))
        .match_body(Matcher::Json(json!({
            "wifiAccessPoints": [
                { "macAddress": "B0:B2:DC:D5:0F:1D", "signalStrength": -78, "channel": 1 }
            ]
        })))
        .with_status(200)
        .with_body(
            json!({ "location": { "lat": 45.5, "lng": -122.64 }, "accuracy": 25.0 }).to_string(),
        )
        .create_async()
        .await;

    let geolocator =
        sdk::Geolocator::new(&format!("{}/geolocation/v1/geolocate", server.url()), "secret");
    let access_points = [api::AccessPoint {
        mac_address: "B0:B2:DC:D5:0F:1D".to_owned(),
        signal_strength: Some(-78),
        age: None,
        channel: Some(1),
        signal_to_noise_ratio: None,
    }];

    let result = geolocator.geolocate(&access_points).await.unwrap();
    assert_eq!(
        result,
        api::Geolocation { location: api::Location { lat: 45.5, lng: -122.64 }, accuracy: 25.0 }
    );

    geolocate.assert_async().await;
}

#[tokio::test]
async fn geolocation_service_error() {
    let mut server = mockito::Server::new_async().await;
    let _geolocate = server
        .mock("POST", "/geolocate")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(
            json!({
                "error": { "code": 404, "message": "Not Found", "errors": [] }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let geolocator = sdk::Geolocator::new(&format!("{}/geolocate", server.url()), "secret");
    match geolocator.geolocate(&[]).await {
        Err(sdk::Error::Service(msg)) => assert_eq!(msg, "Not Found"),
        r => panic!("unexpected result: {:?}", r),
    }
}
