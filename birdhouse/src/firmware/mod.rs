// Copyright (C) 2026 Christopher Eykamp
//
// SPDX-License-Identifier: Apache-2.0

//! Firmware release selection.
//!
//! The firmware repository is a directory holding images named
//! `<prefix><major>.<minor>.bin` and, optionally, device specific
//! subdirectories named `<prefix>_<MAC address>`. Every lookup scans
//! the filesystem again; nothing is cached between requests.

mod version;


pub use self::version::Version;

use crate::utils::{self, log::LogContent};
use derive_more::{Display, Error, From};
use slog_scope::{debug, error, info};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, From)]
pub enum Error {
    #[display(fmt = "invalid firmware version: {:?}", _0)]
    #[from(ignore)]
    InvalidVersion(#[error(not(source))] String),
    #[display(fmt = "invalid MAC address: {:?}", _0)]
    #[from(ignore)]
    InvalidMacAddress(#[error(not(source))] String),

    #[display(fmt = "firmware folder {:?} does not exist", _0)]
    #[from(ignore)]
    FolderNotFound(#[error(not(source))] PathBuf),
    #[display(fmt = "no firmware found in {:?}", _0)]
    #[from(ignore)]
    NoFirmware(#[error(not(source))] PathBuf),

    Io(io::Error),
    Digest(openssl::error::ErrorStack),
}

/// Update check sent by a device: the version it is running and its
/// MAC address, kept uppercase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceRequest {
    pub version: Version,
    pub mac_address: String,
}

impl DeviceRequest {
    pub fn new(version: &str, mac_address: &str) -> Result<Self> {
        let mac_address = mac_address.trim();
        if mac_address.is_empty() {
            return Err(Error::InvalidMacAddress(mac_address.to_owned()));
        }

        Ok(DeviceRequest { version: version.parse()?, mac_address: mac_address.to_uppercase() })
    }
}

/// Which directory of the repository a lookup should scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Folder {
    pub path: PathBuf,
    pub kind: FolderKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FolderKind {
    /// No subdirectory is dedicated to the device.
    Root,
    /// The named subdirectory is dedicated to the device.
    Device(String),
    /// More than one subdirectory claims the device. This is a
    /// repository misconfiguration and the root is used instead.
    Ambiguous(Vec<String>),
}

/// Newest firmware image found by [`find_latest_firmware`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub version: Version,
}

/// Firmware contents and their md5 digest, as sent to devices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    data: Vec<u8>,
    md5: String,
}

impl Image {
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn md5(&self) -> &str {
        &self.md5
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// Outcome of a device update check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Update {
    Available { version: Version, path: PathBuf, image: Image },
    AlreadyCurrent,
}

/// Finds the folder holding the firmware for the device with
/// `mac_address`.
///
/// A subdirectory belongs to the device when its name ends with `_`
/// followed by the MAC address, compared case insensitively.
pub fn resolve_update_folder(root: &Path, mac_address: &str) -> Result<Folder> {
    let suffix = format!("_{}", mac_address.to_uppercase());

    let mut matches = Vec::new();
    for entry in fs::read_dir(root).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::FolderNotFound(root.to_owned()),
        _ => Error::Io(e),
    })? {
        let entry = entry?;
        if !entry.path().is_dir() {
            continue;
        }

        if let Some(name) = entry.file_name().to_str() {
            if name.to_uppercase().ends_with(&suffix) {
                matches.push(name.to_owned());
            }
        }
    }
    matches.sort();

    let folder = match matches.len() {
        0 => Folder { path: root.to_owned(), kind: FolderKind::Root },
        1 => {
            let name = matches.remove(0);
            Folder { path: root.join(&name), kind: FolderKind::Device(name) }
        }
        _ => {
            error!(
                "found multiple firmware folders for mac address {}: {:?}, using {:?}",
                mac_address, matches, root
            );
            Folder { path: root.to_owned(), kind: FolderKind::Ambiguous(matches) }
        }
    };

    if !folder.path.is_dir() {
        error!("{:?} is not a folder", folder.path);
        return Err(Error::FolderNotFound(folder.path));
    }

    debug!("using firmware folder {:?}", folder.path);
    Ok(folder)
}

/// Scans `folder`, non recursively, for the image with the highest
/// version strictly above `floor`.
///
/// Entries are visited in lexical name order and, among images with
/// the same version, the first one visited is kept. Returns `None` if
/// the folder has images but none newer than `floor`, and
/// [`Error::NoFirmware`] if it has no image at all.
pub fn find_latest_firmware(folder: &Path, floor: Version) -> Result<Option<Candidate>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(folder).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::FolderNotFound(folder.to_owned()),
        _ => Error::Io(e),
    })? {
        let entry = entry?;
        if entry.path().is_dir() {
            continue;
        }

        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }
    names.sort();

    let mut found_any = false;
    let mut newest: Option<Candidate> = None;
    for name in names {
        let version = match Version::from_file_name(&name) {
            Some(version) => version,
            None => continue,
        };
        found_any = true;

        let current = newest.as_ref().map_or(floor, |c| c.version);
        if version > current {
            newest = Some(Candidate { path: folder.join(&name), version });
        }
    }

    if !found_any {
        return Err(Error::NoFirmware(folder.to_owned()));
    }

    Ok(newest)
}

/// Reads the firmware at `path` and computes its digest.
pub fn load_firmware(path: &Path) -> Result<Image> {
    let data = fs::read(path)?;
    let md5 = utils::md5sum(&data)?;
    info!("found firmware {:?}, bytes={} md5={}", path, data.len(), md5);

    Ok(Image { data, md5 })
}

/// Firmware lookups against a repository rooted at a fixed directory.
#[derive(Clone, Debug)]
pub struct Resolver {
    root: PathBuf,
}

impl Resolver {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Resolver { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Looks for an update for the device issuing `request`, in its own
    /// folder when there is one or in the repository root otherwise.
    pub fn check_update(&self, request: &DeviceRequest) -> Result<Update> {
        let folder = resolve_update_folder(&self.root, &request.mac_address)?;

        match find_latest_firmware(&folder.path, request.version)? {
            Some(candidate) => {
                info!(
                    "upgrading device {} from {} to {:?}",
                    request.mac_address, request.version, candidate.path
                );
                let image =
                    load_firmware(&candidate.path).log_error_msg("failed to load firmware image")?;
                Ok(Update::Available { version: candidate.version, path: candidate.path, image })
            }
            None => {
                info!(
                    "device {} already at most recent version ({})",
                    request.mac_address, request.version
                );
                Ok(Update::AlreadyCurrent)
            }
        }
    }

    /// Newest image in the repository root, regardless of device.
    pub fn latest(&self) -> Result<Option<(Version, Image)>> {
        match find_latest_firmware(&self.root, Version::default())? {
            Some(candidate) => Ok(Some((candidate.version, load_firmware(&candidate.path)?))),
            None => Ok(None),
        }
    }
}
