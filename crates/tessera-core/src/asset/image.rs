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

use std::fmt;
use std::sync::{Arc, OnceLock};

/// A decoded 8-bit RGBA image, rows stored top to bottom.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes of RGBA data.
    pub rgba: Vec<u8>,
}

impl ImageData {
    /// Creates an image filled with a single RGBA color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = (width as usize) * (height as usize);
        Self {
            width,
            height,
            rgba: rgba.repeat(pixels),
        }
    }
}

impl fmt::Debug for ImageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageData")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

/// An image that becomes available at some point after it was requested.
///
/// Clones share the same slot: the loader keeps one clone and fulfils it, the
/// texture keeps another and polls [`PendingImage::is_ready`] every frame. A slot
/// is written at most once.
#[derive(Debug, Clone, Default)]
pub struct PendingImage {
    slot: Arc<OnceLock<ImageData>>,
}

impl PendingImage {
    /// Creates an empty slot.
    pub fn pending() -> Self {
        Self::default()
    }

    /// Creates a slot that is already filled.
    pub fn ready(image: ImageData) -> Self {
        let pending = Self::pending();
        pending.fulfill(image);
        pending
    }

    /// Fills the slot. Returns `false` if it was already filled, in which case the
    /// new image is dropped.
    pub fn fulfill(&self, image: ImageData) -> bool {
        self.slot.set(image).is_ok()
    }

    /// Returns `true` once the image has been decoded.
    pub fn is_ready(&self) -> bool {
        self.slot.get().is_some()
    }

    /// Returns the decoded image, if available.
    pub fn get(&self) -> Option<&ImageData> {
        self.slot.get()
    }
}

/// An asynchronous image source.
///
/// Implementations return immediately and fill the returned [`PendingImage`] later,
/// typically from a background thread. A source that fails to decode leaves the
/// slot empty forever.
pub trait ImageLoader {
    /// Starts loading `source` and returns the slot the image will land in.
    fn load(&self, source: &str) -> PendingImage;
}
