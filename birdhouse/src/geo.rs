// Copyright (C) 2026 Christopher Eykamp
//
// SPDX-License-Identifier: Apache-2.0

//! Geodesic distance on the WGS-84 ellipsoid.

use derive_more::{Display, Error};
use geographiclib_rs::{Geodesic, InverseGeodesic};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, PartialEq)]
pub enum Error {
    #[display(fmt = "invalid latitude: {}", _0)]
    InvalidLatitude(#[error(not(source))] f64),
    #[display(fmt = "invalid longitude: {}", _0)]
    InvalidLongitude(#[error(not(source))] f64),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Coordinate { latitude, longitude }
    }

    fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(Error::InvalidLatitude(self.latitude));
        }
        if !self.longitude.is_finite() {
            return Err(Error::InvalidLongitude(self.longitude));
        }
        Ok(())
    }
}

/// Distance, in meters, of the shortest path between `from` and `to`.
/// Antipodal points are handled and always yield a distance.
pub fn distance(from: Coordinate, to: Coordinate) -> Result<f64> {
    from.validate()?;
    to.validate()?;

    let meters: f64 =
        Geodesic::wgs84().inverse(from.latitude, from.longitude, to.latitude, to.longitude);
    Ok(meters)
}
