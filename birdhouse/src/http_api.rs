// Copyright (C) 2026 Christopher Eykamp
//
// SPDX-License-Identifier: Apache-2.0

use crate::{
    firmware::{self, DeviceRequest, Resolver, Update},
    geo,
    settings::Settings,
    utils::log::LogContent,
};
use cloud::api::AccessPoint;
use serde::{Deserialize, Serialize};
use slog_scope::{debug, error, info};
use std::convert::Infallible;
use warp::{
    filters::BoxedFilter,
    http::StatusCode,
    reply::{Reply, Response},
    Filter,
};

type Result<T> = std::result::Result<T, Infallible>;

const VERSION_HEADER: &str = "x-esp8266-version";
const MAC_HEADER: &str = "x-esp8266-sta-mac";
const MD5_HEADER: &str = "x-md5";

#[derive(Clone)]
pub(crate) struct Api {
    resolver: Resolver,
    telemetry: cloud::Client,
    geolocator: cloud::Geolocator,
}

#[derive(Debug, Deserialize)]
struct TokenQuery {
    name: Option<String>,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LocationRequest {
    #[serde(rename = "visibleHotspots", default)]
    visible_hotspots: Vec<AccessPoint>,
    #[serde(default)]
    latitude: f64,
    #[serde(default)]
    longitude: f64,
    device_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LocationResponse {
    wifi_distance: f64,
    wifi_distance_accuracy: f64,
}

impl Api {
    pub(crate) fn new(settings: &Settings) -> Self {
        Api {
            resolver: Resolver::new(&settings.firmware_images_folder),
            telemetry: cloud::Client::new(
                &settings.mothership_url,
                &settings.username,
                &settings.password,
            ),
            geolocator: cloud::Geolocator::new(
                &settings.geolocation_url,
                &settings.google_geolocation_key,
            ),
        }
    }

    pub(crate) fn server(self) -> warp::Server<BoxedFilter<(Response,)>> {
        warp::serve(self.routes())
    }

    pub(crate) fn routes(self) -> BoxedFilter<(Response,)> {
        let state = warp::any().map(move || self.clone());

        let update = warp::get()
            .and(warp::path!("update"))
            .and(warp::header::optional::<String>(VERSION_HEADER))
            .and(warp::header::optional::<String>(MAC_HEADER))
            .and(state.clone())
            .and_then(Api::update);
        let firmware = warp::get()
            .and(warp::path!("firmware"))
            .and(state.clone())
            .and_then(Api::firmware);
        let validate_token = warp::get()
            .and(warp::path!("validate_token"))
            .and(warp::query::<TokenQuery>())
            .and(state.clone())
            .and_then(Api::validate_token);
        let wifi_location = warp::post()
            .and(warp::path!("wifi_location"))
            .and(
                warp::body::json()
                    .map(Some)
                    .or_else(|_| async { Ok::<(Option<_>,), Infallible>((None,)) }),
            )
            .and(state)
            .and_then(Api::wifi_location);

        update.or(firmware).unify().or(validate_token).unify().or(wifi_location).unify().boxed()
    }

    async fn update(
        version: Option<String>,
        mac_address: Option<String>,
        api: Api,
    ) -> Result<Response> {
        debug!("receiving update request");
        let (version, mac_address) = match (version, mac_address) {
            (Some(version), Some(mac_address)) => (version, mac_address),
            _ => {
                return Ok(text(
                    StatusCode::BAD_REQUEST,
                    format!("missing {} or {} header", VERSION_HEADER, MAC_HEADER),
                ))
            }
        };

        let request = match DeviceRequest::new(&version, &mac_address) {
            Ok(request) => request,
            Err(e) => return Ok(firmware_error(&e)),
        };

        let resolver = api.resolver;
        match tokio::task::spawn_blocking(move || resolver.check_update(&request)).await {
            Ok(Ok(Update::Available { image, .. })) => Ok(image_reply(image)),
            Ok(Ok(Update::AlreadyCurrent)) => {
                Ok(warp::reply::with_status(warp::reply(), StatusCode::FOUND).into_response())
            }
            Ok(Err(e)) => Ok(firmware_error(&e)),
            Err(e) => {
                error!("firmware lookup task failed: {}", e);
                Ok(text(StatusCode::INTERNAL_SERVER_ERROR, "firmware lookup failed"))
            }
        }
    }

    async fn firmware(api: Api) -> Result<Response> {
        debug!("receiving firmware request");
        let resolver = api.resolver;
        match tokio::task::spawn_blocking(move || resolver.latest()).await {
            Ok(Ok(Some((version, image)))) => {
                info!("serving firmware {} for provisioning", version);
                Ok(image_reply(image))
            }
            Ok(Ok(None))
            | Ok(Err(firmware::Error::NoFirmware(_)))
            | Ok(Err(firmware::Error::FolderNotFound(_))) => {
                Ok(text(StatusCode::NOT_FOUND, "unable to find firmware"))
            }
            Ok(Err(e)) => Ok(firmware_error(&e)),
            Err(e) => {
                error!("firmware lookup task failed: {}", e);
                Ok(text(StatusCode::INTERNAL_SERVER_ERROR, "firmware lookup failed"))
            }
        }
    }

    async fn validate_token(query: TokenQuery, api: Api) -> Result<Response> {
        debug!("receiving validate_token request");
        let (name, token) = match (query.name, query.token) {
            (Some(name), Some(token)) => (name, token),
            _ => {
                return Ok(text(
                    StatusCode::UNAUTHORIZED,
                    "Please specify 'name' and 'token' parameters",
                ))
            }
        };

        let device = match api
            .telemetry
            .device_by_name(&name)
            .await
            .log_error_msg("failed to look the device up")
        {
            Ok(Some(device)) => device,
            Ok(None) => return Ok(text(StatusCode::OK, "bad_device")),
            Err(_) => {
                return Ok(text(StatusCode::INTERNAL_SERVER_ERROR, "Error looking up device!"));
            }
        };

        match api.telemetry.device_token(&device).await.log_error_msg("failed to get device token")
        {
            Ok(device_token) => {
                Ok(text(StatusCode::OK, if device_token == token { "true" } else { "false" }))
            }
            Err(_) => Ok(text(StatusCode::INTERNAL_SERVER_ERROR, "Error getting device token!")),
        }
    }

    async fn wifi_location(req: Option<LocationRequest>, api: Api) -> Result<Response> {
        let req = match req {
            Some(req) => req,
            None => return Ok(text(StatusCode::BAD_REQUEST, "did not provide any request data")),
        };
        debug!("geolocating for {:?}", req.visible_hotspots);

        let resolved = match api
            .geolocator
            .geolocate(&req.visible_hotspots)
            .await
            .log_error_msg("failed to geolocate")
        {
            Ok(resolved) => resolved,
            Err(cloud::Error::Service(_)) => {
                return Ok(text(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Received error from Google API!",
                ))
            }
            Err(e) => {
                return Ok(text(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Exception while geolocating: {}", e),
                ))
            }
        };

        let known = geo::Coordinate::new(req.latitude, req.longitude);
        let resolved_at = geo::Coordinate::new(resolved.location.lat, resolved.location.lng);
        debug!("calculating distance between {:?} and {:?}...", known, resolved_at);
        let distance = match geo::distance(known, resolved_at).log_error_msg("failed on distance")
        {
            Ok(distance) => distance,
            Err(_) => {
                return Ok(text(StatusCode::INTERNAL_SERVER_ERROR, "distance computation failed"))
            }
        };

        let outgoing =
            LocationResponse { wifi_distance: distance, wifi_distance_accuracy: resolved.accuracy };

        if let Some(device_token) = req.device_token {
            debug!("sending {:?}", outgoing);
            if api
                .telemetry
                .send_telemetry(&device_token, &outgoing)
                .await
                .log_error_msg("failed to send location telemetry")
                .is_err()
            {
                return Ok(text(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error sending location telemetry!",
                ));
            }
        }

        Ok(warp::reply::json(&outgoing).into_response())
    }
}

fn text<T: Into<String>>(status: StatusCode, message: T) -> Response {
    warp::reply::with_status(message.into(), status).into_response()
}

fn image_reply(image: firmware::Image) -> Response {
    let md5 = image.md5().to_owned();
    warp::reply::with_header(image.into_data(), MD5_HEADER, md5).into_response()
}

fn firmware_error(err: &firmware::Error) -> Response {
    use firmware::Error;

    let status = match err {
        Error::InvalidVersion(_) | Error::InvalidMacAddress(_) => StatusCode::BAD_REQUEST,
        Error::FolderNotFound(_) | Error::NoFirmware(_) => StatusCode::NOT_FOUND,
        Error::Io(_) | Error::Digest(_) => {
            error!("failed to serve firmware: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    text(status, err.to_string())
}
