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

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use tessera_core::asset::{ImageData, ImageLoader, PendingImage};

/// Decodes images from disk on background threads.
///
/// Sources are resolved relative to a root directory. Each [`load`](ImageLoader::load)
/// returns immediately with a pending slot that is filled once decoding finishes.
/// A source that cannot be read or decoded logs a warning and stays pending forever,
/// so anything waiting on it keeps rendering without the image.
#[derive(Debug)]
pub struct FsImageLoader {
    root: PathBuf,
    in_flight: Mutex<Vec<JoinHandle<()>>>,
}

impl FsImageLoader {
    /// Creates a loader resolving sources against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            in_flight: Mutex::new(Vec::new()),
        }
    }

    /// The directory sources are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Decodes `path` into tightly packed RGBA8 pixels on the calling thread.
    pub fn decode(path: &Path) -> Result<ImageData, image::ImageError> {
        let rgba = image::open(path)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(ImageData {
            width,
            height,
            rgba: rgba.into_raw(),
        })
    }

    /// Blocks until every load started so far has finished (successfully or not).
    pub fn wait(&self) {
        let handles = std::mem::take(&mut *self.handles());
        handles.into_iter().for_each(join);
    }

    /// Number of loads still decoding.
    pub fn in_flight(&self) -> usize {
        let mut handles = self.handles();
        prune(&mut handles);
        handles.len()
    }

    fn handles(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Joins the threads that already finished and forgets them.
fn prune(handles: &mut Vec<JoinHandle<()>>) {
    let (finished, running) = std::mem::take(handles)
        .into_iter()
        .partition::<Vec<_>, _>(JoinHandle::is_finished);
    *handles = running;
    finished.into_iter().for_each(join);
}

fn join(handle: JoinHandle<()>) {
    if handle.join().is_err() {
        log::error!("FsImageLoader: a decoding thread panicked");
    }
}

impl ImageLoader for FsImageLoader {
    fn load(&self, source: &str) -> PendingImage {
        let pending = PendingImage::pending();
        let slot = pending.clone();
        let path = self.root.join(source);
        log::debug!("FsImageLoader: loading {}", path.display());

        let handle = std::thread::spawn(move || match Self::decode(&path) {
            Ok(image) => {
                log::info!(
                    "FsImageLoader: decoded {} ({}x{})",
                    path.display(),
                    image.width,
                    image.height
                );
                slot.fulfill(image);
            }
            Err(e) => log::warn!("FsImageLoader: failed to load {}: {e}", path.display()),
        });

        let mut handles = self.handles();
        prune(&mut handles);
        handles.push(handle);
        pending
    }
}
