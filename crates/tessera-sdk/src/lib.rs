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

//! # Tessera SDK
//!
//! The framework a scene author builds on: the [`SceneNode`] contract, the
//! [`CanvasManager`] render loop, frame scheduling, first-person movement
//! controls, control-panel description, logging bootstrap and sandbox settings.
//!
//! ```no_run
//! use tessera_sdk::{init_logging, CanvasManager, FixedStepScheduler, SandboxConfig};
//! # fn host(context: Box<dyn tessera_core::GraphicsContext>) -> Result<(), tessera_core::RenderError> {
//! init_logging("info");
//! let config = SandboxConfig::default();
//! let mut manager = CanvasManager::new(context, &config.settings);
//! let mut scheduler = FixedStepScheduler::new(config.frames, config.frame_step_ms);
//! tessera_sdk::run_until_idle(&mut manager, &mut scheduler)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod canvas;
mod config;
mod control_panel;
mod controls;
mod logging;
mod scene;
mod scheduler;

pub use canvas::{Canvas, CanvasManager, Scratchpad};
pub use config::SandboxConfig;
pub use control_panel::{ControlPanel, PanelEntry, PanelRecorder};
pub use controls::MovementControls;
pub use logging::init_logging;
pub use scene::{flatten_paths, node_at_mut, SceneNode};
pub use scheduler::{run_until_idle, FixedStepScheduler, FrameScheduler};

/// Re-exports of the crates a scene author needs next to the SDK.
pub mod prelude {
    pub use crate::{Canvas, CanvasManager, ControlPanel, SceneNode};
    pub use tessera_core::math::{Mat4, Vec2, Vec3, Vec4};
    pub use tessera_core::renderer::{Light, PrimitiveType, ProgramState, RenderError};
    pub use tessera_data::{AxisArrows, Cube, Shape, VertexBuffer};
    pub use tessera_lanes::{Material, PhongShader, Texture, TexturedPhong};
}
