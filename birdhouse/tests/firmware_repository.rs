// Copyright (C) 2026 Christopher Eykamp
//
// SPDX-License-Identifier: Apache-2.0

use birdhouse::firmware::{
    find_latest_firmware, load_firmware, DeviceRequest, Error, Resolver, Update, Version,
};
use pretty_assertions::assert_eq;
use std::{fs, sync::Arc, thread};

const MAC: &str = "5c:cf:7f:0a:1b:2c";

fn repository() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("birdhouse_0.119.bin"), b"image 0.119").unwrap();
    fs::write(dir.path().join("birdhouse_0.120.bin"), b"image 0.120").unwrap();
    fs::create_dir(dir.path().join("Lab_5C:CF:7F:0A:1B:2C")).unwrap();
    fs::write(dir.path().join("Lab_5C:CF:7F:0A:1B:2C").join("1.0.bin"), b"lab image").unwrap();
    dir
}

#[test]
fn device_and_fleet_resolution() {
    let repo = repository();
    let resolver = Resolver::new(repo.path());

    let lab_device = DeviceRequest::new("0.120", MAC).unwrap();
    match resolver.check_update(&lab_device).unwrap() {
        Update::Available { version, image, .. } => {
            assert_eq!(version, Version::new(1, 0));
            assert_eq!(image.data(), b"lab image");
        }
        u => panic!("unexpected update: {:?}", u),
    }

    let fleet_device = DeviceRequest::new("0.119", "AA:BB:CC:DD:EE:FF").unwrap();
    match resolver.check_update(&fleet_device).unwrap() {
        Update::Available { version, image, .. } => {
            assert_eq!(version, Version::new(0, 120));
            assert_eq!(image.data(), b"image 0.120");
        }
        u => panic!("unexpected update: {:?}", u),
    }

    let current_device = DeviceRequest::new("0.120", "AA:BB:CC:DD:EE:FF").unwrap();
    assert_eq!(resolver.check_update(&current_device).unwrap(), Update::AlreadyCurrent);
}

#[test]
fn new_release_is_picked_up_without_restart() {
    let repo = repository();
    let resolver = Resolver::new(repo.path());
    let request = DeviceRequest::new("0.120", "AA:BB:CC:DD:EE:FF").unwrap();

    assert_eq!(resolver.check_update(&request).unwrap(), Update::AlreadyCurrent);

    fs::write(repo.path().join("birdhouse_0.121.bin"), b"image 0.121").unwrap();
    match resolver.check_update(&request).unwrap() {
        Update::Available { version, .. } => assert_eq!(version, Version::new(0, 121)),
        u => panic!("unexpected update: {:?}", u),
    }
}

#[test]
fn image_removed_after_listing() {
    let repo = repository();

    let candidate = find_latest_firmware(repo.path(), Version::new(0, 0)).unwrap().unwrap();
    fs::remove_file(&candidate.path).unwrap();

    assert!(matches!(load_firmware(&candidate.path), Err(Error::Io(_))));
}

#[test]
fn concurrent_resolutions() {
    let repo = repository();
    let resolver = Arc::new(Resolver::new(repo.path()));
    let expected = resolver.check_update(&DeviceRequest::new("0.1", MAC).unwrap()).unwrap();

    let handles = (0..8)
        .map(|_| {
            let resolver = resolver.clone();
            thread::spawn(move || {
                resolver.check_update(&DeviceRequest::new("0.1", MAC).unwrap()).unwrap()
            })
        })
        .collect::<Vec<_>>();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
