// Copyright (C) 2026 Christopher Eykamp
//
// SPDX-License-Identifier: Apache-2.0

use derive_more::{Display, Error, From};
use serde::Deserialize;
use slog_scope::{debug, error, warn};
use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

pub type Result<T> = std::result::Result<T, Error>;

const CONFIG_BASENAME: &str = "birdhouse.cfg";

#[derive(Debug, Display, Error, From)]
pub enum Error {
    Io(io::Error),
    Deserialize(toml::de::Error),

    #[display(fmt = "invalid server address")]
    InvalidServerAddress,
    #[display(fmt = "invalid geolocation address")]
    InvalidGeolocationAddress,
    #[display(fmt = "invalid listen socket")]
    InvalidListenSocket,
    #[display(fmt = "unable to find a configuration directory")]
    NoConfigDirectory,
}

/// Gateway configuration, in the `birdhouse.cfg` toml format.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Telemetry backend address
    #[serde(rename = "motherShipUrl")]
    pub mothership_url: String,
    pub username: String,
    pub password: String,
    pub data_encoding: String,
    pub google_geolocation_key: String,
    pub geolocation_url: String,
    pub firmware_images_folder: PathBuf,
    pub listen_socket: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            mothership_url: "http://localhost:8080".to_string(),
            username: "fixme".to_string(),
            password: "fixme".to_string(),
            data_encoding: "utf-8".to_string(),
            google_geolocation_key: "fixme".to_string(),
            geolocation_url: "https://www.googleapis.com/geolocation/v1/geolocate".to_string(),
            firmware_images_folder: "/var/lib/birdhouse/firmware".into(),
            listen_socket: "localhost:8080".to_string(),
        }
    }
}

impl Settings {
    /// Loads the settings from the filesystem. If `path` does not
    /// exists, it uses the default settings.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!("loading settings from {:?}...", path);
            Ok(Self::parse(&fs::read_to_string(path)?)?)
        } else {
            warn!(
                "{:?} does not exist; please create it with the following contents:\n{}",
                path,
                Self::help()
            );
            debug!("using default settings...");
            Ok(Self::default())
        }
    }

    /// Location of the settings file when none is given: under
    /// `XDG_CONFIG_HOME`, or `.config` inside the user's home.
    pub fn default_path() -> Result<PathBuf> {
        if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
            return Ok(PathBuf::from(dir).join(CONFIG_BASENAME));
        }

        env::var_os("HOME")
            .or_else(|| env::var_os("USERPROFILE"))
            .map(|home| PathBuf::from(home).join(".config").join(CONFIG_BASENAME))
            .ok_or(Error::NoConfigDirectory)
    }

    fn help() -> &'static str {
        r#"motherShipUrl = "http://localhost:8080"
username = "fixme"
password = "fixme"
data_encoding = "utf-8"
google_geolocation_key = "fixme"
firmware_images_folder = "fixme""#
    }

    // This parses the configuration file, taking into account the
    // needed validations for all fields, and returns either `Self` or
    // `Err`.
    fn parse(content: &str) -> Result<Self> {
        let settings = toml::from_str::<Settings>(content)?;

        if !has_http_prefix(&settings.mothership_url) {
            error!("invalid setting for server address, it must use the protocol prefix");
            return Err(Error::InvalidServerAddress);
        }

        if !has_http_prefix(&settings.geolocation_url) {
            error!("invalid setting for geolocation address, it must use the protocol prefix");
            return Err(Error::InvalidGeolocationAddress);
        }

        let port = settings.listen_socket.rsplit_once(':').map(|(_, port)| port.parse::<u16>());
        if !matches!(port, Some(Ok(_))) {
            error!("invalid setting for listen socket, it must be in the host:port form");
            return Err(Error::InvalidListenSocket);
        }

        Ok(settings)
    }
}

fn has_http_prefix(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
