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

//! Settings for a host that runs a scene for a fixed number of frames.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tessera_core::renderer::RenderSettings;

/// Everything the sandbox host reads from its optional JSON file.
///
/// Every field has a default, so a file only needs the keys it changes:
///
/// ```
/// use tessera_sdk::SandboxConfig;
///
/// let config = SandboxConfig::from_json_str(r#"{ "frames": 10 }"#).unwrap();
/// assert_eq!(config.frames, 10);
/// assert_eq!(config.assets_dir, "assets");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Canvas and shading settings.
    pub settings: RenderSettings,
    /// How many frames to render before exiting.
    pub frames: u32,
    /// Simulated time between two frames, in milliseconds.
    pub frame_step_ms: f32,
    /// Directory texture sources are resolved against.
    pub assets_dir: String,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            settings: RenderSettings::default(),
            frames: 120,
            frame_step_ms: 1000.0 / 60.0,
            assets_dir: "assets".to_string(),
        }
    }
}

impl SandboxConfig {
    /// Parses a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reads a configuration file.
    ///
    /// A missing file is not an error: the defaults are returned and a warning is
    /// logged. Unreadable or malformed files are.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, serde_json::Error> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let config = Self::from_json_str(&json)?;
                log::info!("Loaded sandbox config from {}", path.display());
                Ok(config)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::warn!(
                    "Config file {} not found, using defaults",
                    path.display()
                );
                Ok(Self::default())
            }
            Err(e) => Err(serde_json::Error::io(e)),
        }
    }

    /// Resolves an asset name against [`assets_dir`](Self::assets_dir).
    pub fn asset_path(&self, name: &str) -> PathBuf {
        Path::new(&self.assets_dir).join(name)
    }
}
