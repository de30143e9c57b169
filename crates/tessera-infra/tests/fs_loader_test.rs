// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::Result;
use tessera_core::asset::{ImageData, ImageLoader};
use std::time::{Duration, Instant};
use tessera_infra::FsImageLoader;
use tempfile::tempdir;

#[test]
fn test_png_is_decoded_in_the_background() -> Result<()> {
    let dir = tempdir()?;
    let mut img = image::RgbaImage::new(4, 2);
    img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
    img.save(dir.path().join("red_corner.png"))?;

    let loader = FsImageLoader::new(dir.path());
    let pending = loader.load("red_corner.png");
    loader.wait();

    assert!(pending.is_ready());
    let decoded: &ImageData = pending.get().ok_or_else(|| anyhow::anyhow!("not decoded"))?;
    assert_eq!((decoded.width, decoded.height), (4, 2));
    assert_eq!(decoded.rgba.len(), 4 * 2 * 4);
    assert_eq!(&decoded.rgba[..4], &[255, 0, 0, 255]);
    Ok(())
}

#[test]
fn test_missing_image_stays_pending() -> Result<()> {
    let dir = tempdir()?;
    let loader = FsImageLoader::new(dir.path());

    let pending = loader.load("nowhere.gif");
    loader.wait();

    assert!(!pending.is_ready());
    assert!(pending.get().is_none());
    Ok(())
}

#[test]
fn test_clones_observe_the_same_load() -> Result<()> {
    let dir = tempdir()?;
    image::RgbaImage::new(1, 1).save(dir.path().join("dot.png"))?;

    let loader = FsImageLoader::new(dir.path());
    let pending = loader.load("dot.png");
    let observer = pending.clone();
    loader.wait();

    assert!(observer.is_ready());
    Ok(())
}

#[test]
fn test_finished_loads_are_forgotten() -> Result<()> {
    let dir = tempdir()?;
    let loader = FsImageLoader::new(dir.path());
    for i in 0..8 {
        loader.load(&format!("missing_{i}.png"));
    }

    let deadline = Instant::now() + Duration::from_secs(10);
    while loader.in_flight() > 0 {
        assert!(Instant::now() < deadline, "decoding threads never finished");
        std::thread::sleep(Duration::from_millis(5));
    }

    let pending = loader.load("missing_again.png");
    assert!(loader.in_flight() <= 1);
    loader.wait();
    assert_eq!(loader.in_flight(), 0);
    assert!(!pending.is_ready());
    Ok(())
}
