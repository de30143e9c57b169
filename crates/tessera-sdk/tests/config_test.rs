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
use tempfile::tempdir;
use tessera_sdk::SandboxConfig;

#[test]
fn test_load_reads_partial_file() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("sandbox.json");
    std::fs::write(
        &path,
        r#"{ "frames": 3, "frame_step_ms": 10.0, "settings": { "width": 640, "height": 480 } }"#,
    )?;

    let config = SandboxConfig::load(&path)?;
    assert_eq!(config.frames, 3);
    assert_eq!(config.frame_step_ms, 10.0);
    assert_eq!(config.settings.width, 640);
    assert_eq!(config.settings.num_lights, 2);
    assert_eq!(config.assets_dir, "assets");
    Ok(())
}

#[test]
fn test_missing_file_falls_back_to_defaults() -> Result<()> {
    let dir = tempdir()?;
    let config = SandboxConfig::load(dir.path().join("absent.json"))?;
    assert_eq!(config, SandboxConfig::default());
    Ok(())
}

#[test]
fn test_malformed_file_is_an_error() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ \"frames\": \"many\" }")?;
    assert!(SandboxConfig::load(&path).is_err());
    Ok(())
}
