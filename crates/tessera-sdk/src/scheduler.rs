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

//! Frame pacing: how the render loop asks to run again.

use crate::canvas::CanvasManager;
use tessera_core::renderer::RenderError;

/// The host's "run the frame callback once more, later" primitive.
///
/// [`CanvasManager::render`] calls [`request_frame`](Self::request_frame) at the
/// end of every successful frame and never waits for it. A host stops the loop by
/// not honouring the request.
pub trait FrameScheduler {
    /// Asks for one more frame.
    fn request_frame(&mut self);
}

/// A scheduler with a frame budget and a fixed time step, for headless hosts.
///
/// The first frame runs at time `0`; each honoured request runs the next frame
/// `step_ms` later, until the budget is spent.
#[derive(Debug, Clone)]
pub struct FixedStepScheduler {
    remaining: u32,
    step_ms: f32,
    next_time: f32,
    pending: bool,
}

impl FixedStepScheduler {
    /// Creates a scheduler that runs at most `frames` frames, `step_ms` apart.
    pub fn new(frames: u32, step_ms: f32) -> Self {
        Self {
            remaining: frames,
            step_ms,
            next_time: 0.0,
            pending: true,
        }
    }

    /// Takes the time of the next frame, if one was requested and the budget allows it.
    pub fn next_frame(&mut self) -> Option<f32> {
        if !self.pending || self.remaining == 0 {
            return None;
        }
        self.pending = false;
        self.remaining -= 1;
        let time = self.next_time;
        self.next_time += self.step_ms;
        Some(time)
    }

    /// Frames left in the budget.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

impl FrameScheduler for FixedStepScheduler {
    fn request_frame(&mut self) {
        self.pending = true;
    }
}

/// Runs frames until `scheduler` has nothing left to run. Returns the number of frames.
///
/// An error stops the loop and is returned.
pub fn run_until_idle(
    manager: &mut CanvasManager,
    scheduler: &mut FixedStepScheduler,
) -> Result<u32, RenderError> {
    let mut frames = 0;
    while let Some(time) = scheduler.next_frame() {
        manager.render(time, scheduler)?;
        frames += 1;
    }
    log::debug!("run_until_idle: ran {frames} frames");
    Ok(frames)
}
