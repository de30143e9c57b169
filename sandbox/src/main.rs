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

// Tessera Sandbox
// Two textured cubes, rendered headless for a configured number of frames.

mod scene;

use anyhow::Result;
use tessera_infra::{FsImageLoader, HeadlessContext};
use tessera_sdk::{
    init_logging, run_until_idle, CanvasManager, FixedStepScheduler, PanelRecorder, SandboxConfig,
};

use crate::scene::TexturedCubes;

fn main() -> Result<()> {
    init_logging("info");

    let config = match std::env::args().nth(1) {
        Some(path) => SandboxConfig::load(path)?,
        None => SandboxConfig::default(),
    };
    log::info!(
        "Sandbox: {} frames at {:.2} ms, assets in '{}'",
        config.frames,
        config.frame_step_ms,
        config.assets_dir
    );

    let settings = &config.settings;
    let context = HeadlessContext::new(settings.width, settings.height);
    let loader = FsImageLoader::new(&config.assets_dir);

    let mut manager = CanvasManager::new(Box::new(context), settings);
    manager.add_scene(Box::new(TexturedCubes::new(settings, &loader)?));

    // Decoding runs in the background; finish it so the first frames are textured.
    loader.wait();

    let mut scheduler = FixedStepScheduler::new(config.frames, config.frame_step_ms);
    let frames = run_until_idle(&mut manager, &mut scheduler)?;

    let mut panel = PanelRecorder::new();
    manager.build_control_panels(&mut panel);
    log::debug!("Control panels:\n{panel}");

    if let Some(ctx) = manager.canvas().context_as::<HeadlessContext>() {
        let calls = ctx.draw_calls();
        let indexed = calls.iter().filter(|call| call.is_indexed()).count();
        let vertices: u64 = calls.iter().map(|call| u64::from(call.count)).sum();
        log::info!("--- Frame Summary ---");
        log::info!("  Frames rendered: {frames}");
        log::info!("  Draw calls: {} ({indexed} indexed, {vertices} elements)", calls.len());
        log::info!(
            "  GPU objects: {} buffers, {} programs, {} textures",
            ctx.buffer_count(),
            ctx.program_count(),
            ctx.texture_count()
        );
        log::info!("---------------------");
    }
    Ok(())
}
