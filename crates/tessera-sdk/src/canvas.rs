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

//! The drawing surface and the per-frame render loop.

use crate::control_panel::ControlPanel;
use crate::scene::{child_count, flatten_paths, node_at_mut, SceneNode};
use crate::scheduler::FrameScheduler;
use std::any::Any;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use tessera_core::math::Vec4;
use tessera_core::renderer::{GraphicsContext, ProgramState, RenderError, RenderSettings};

/// String-keyed storage shared by every node drawing on a canvas.
///
/// Nodes use it to agree on one-time setup, such as which node owns the
/// movement controls.
#[derive(Default)]
pub struct Scratchpad {
    entries: HashMap<String, Box<dyn Any>>,
}

impl Scratchpad {
    /// Returns `true` if something is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Stores `value` under `key`, returning the previous value if it had the same type.
    pub fn insert<T: Any>(&mut self, key: &str, value: T) -> Option<T> {
        self.entries
            .insert(key.to_string(), Box::new(value))
            .and_then(|old| old.downcast::<T>().ok())
            .map(|old| *old)
    }

    /// The value under `key`, if it exists and is a `T`.
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.entries.get(key)?.downcast_ref()
    }

    /// Mutable access to the value under `key`, if it exists and is a `T`.
    pub fn get_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.entries.get_mut(key)?.downcast_mut()
    }

    /// Removes whatever is stored under `key`. Returns `true` if there was something.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }
}

impl fmt::Debug for Scratchpad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.entries.keys().collect();
        keys.sort();
        f.debug_struct("Scratchpad").field("keys", &keys).finish()
    }
}

/// A rendering context together with its size, background and scratchpad.
pub struct Canvas {
    context: Box<dyn GraphicsContext>,
    width: u32,
    height: u32,
    background: Vec4,
    /// Storage shared by the nodes drawing on this canvas.
    pub scratchpad: Scratchpad,
}

impl Canvas {
    /// Wraps `context`, sizing its viewport from `settings`.
    pub fn new(mut context: Box<dyn GraphicsContext>, settings: &RenderSettings) -> Self {
        context.set_viewport(settings.width, settings.height);
        Self {
            context,
            width: settings.width,
            height: settings.height,
            background: settings.background_color,
            scratchpad: Scratchpad::default(),
        }
    }

    /// The rendering context.
    pub fn context(&self) -> &dyn GraphicsContext {
        self.context.as_ref()
    }

    /// The rendering context, for issuing draws.
    pub fn context_mut(&mut self) -> &mut dyn GraphicsContext {
        self.context.as_mut()
    }

    /// The rendering context as its concrete backend type, if it is a `T`.
    pub fn context_as<T: Any>(&self) -> Option<&T> {
        self.context.as_any().downcast_ref()
    }

    /// Mutable access to the concrete backend, if it is a `T`.
    pub fn context_as_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.context.as_any_mut().downcast_mut()
    }

    /// Drawable width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Drawable height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// The color every frame starts from.
    pub fn background(&self) -> Vec4 {
        self.background
    }

    /// Changes the color every frame starts from.
    pub fn set_background(&mut self, color: Vec4) {
        self.background = color;
    }

    /// Resizes the drawable area and the viewport.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.context.set_viewport(width, height);
    }

    /// Clears color and depth to start a frame.
    pub fn clear(&mut self) {
        self.context.clear(self.background, true);
    }
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("context", &self.context.id())
            .field("width", &self.width)
            .field("height", &self.height)
            .field("background", &self.background)
            .field("scratchpad", &self.scratchpad)
            .finish()
    }
}

/// Drives the scenes of one canvas, one frame at a time.
///
/// Owns the canvas, the root scene nodes and the [`ProgramState`] they share.
pub struct CanvasManager {
    canvas: Canvas,
    scenes: Vec<Box<dyn SceneNode>>,
    program_state: ProgramState,
    prev_time: f32,
    frame_count: u64,
    panel_node_count: Option<usize>,
}

impl CanvasManager {
    /// Creates a manager with no scenes drawing on `context`.
    pub fn new(context: Box<dyn GraphicsContext>, settings: &RenderSettings) -> Self {
        log::info!(
            "CanvasManager: {}x{} canvas on context {}",
            settings.width,
            settings.height,
            context.id().raw()
        );
        Self {
            canvas: Canvas::new(context, settings),
            scenes: Vec::new(),
            program_state: ProgramState::default(),
            prev_time: 0.0,
            frame_count: 0,
            panel_node_count: None,
        }
    }

    /// Appends a root scene.
    pub fn add_scene(&mut self, scene: Box<dyn SceneNode>) {
        log::debug!("CanvasManager: added scene '{}'", scene.name());
        self.scenes.push(scene);
    }

    /// The root scenes.
    pub fn scenes(&self) -> &[Box<dyn SceneNode>] {
        &self.scenes
    }

    /// The canvas.
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Mutable access to the canvas.
    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    /// The state shared by every node.
    pub fn program_state(&self) -> &ProgramState {
        &self.program_state
    }

    /// Mutable access to the shared state.
    pub fn program_state_mut(&mut self) -> &mut ProgramState {
        &mut self.program_state
    }

    /// How many frames have completed.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Resizes the canvas.
    pub fn set_size(&mut self, width: u32, height: u32) {
        log::info!("CanvasManager: canvas resized to {width}x{height}");
        self.canvas.set_size(width, height);
    }

    /// Renders one frame at `time` milliseconds, then asks `scheduler` for the next.
    ///
    /// The clock advances by `time - previous time`, the canvas is cleared and every
    /// node is displayed in breadth-first order. A node's children are queued just
    /// before it is displayed, so children it adds during its own display are first
    /// visited on the next frame.
    ///
    /// An error from a node aborts the frame and is returned without requesting
    /// another one.
    pub fn render(
        &mut self,
        time: f32,
        scheduler: &mut dyn FrameScheduler,
    ) -> Result<(), RenderError> {
        self.program_state.advance_clock(time - self.prev_time);
        self.prev_time = time;
        self.canvas.clear();

        let mut open: VecDeque<Vec<usize>> = (0..self.scenes.len()).map(|i| vec![i]).collect();
        while let Some(path) = open.pop_front() {
            let Some(count) = child_count(&mut self.scenes, &path) else {
                log::warn!("CanvasManager: skipping invalid scene path {path:?}");
                continue;
            };
            open.extend((0..count).map(|i| {
                let mut child = path.clone();
                child.push(i);
                child
            }));
            if let Some(node) = node_at_mut(&mut self.scenes, &path) {
                log::trace!("CanvasManager: displaying '{}' at {path:?}", node.name());
                node.display(&mut self.canvas, &mut self.program_state)?;
            }
        }

        self.frame_count += 1;
        scheduler.request_frame();
        Ok(())
    }

    /// Returns `true` if nodes were added or removed since the panels were last built.
    pub fn control_panels_stale(&self) -> bool {
        self.panel_node_count != Some(flatten_paths(&self.scenes).len())
    }

    /// Asks every node, in traversal order, to describe its controls into `panel`.
    pub fn build_control_panels(&mut self, panel: &mut dyn ControlPanel) {
        let paths = flatten_paths(&self.scenes);
        for path in &paths {
            if let Some(node) = node_at_mut(&mut self.scenes, path) {
                panel.begin_section(node.name());
                node.make_control_panel(panel);
            }
        }
        self.panel_node_count = Some(paths.len());
    }

    /// Delivers a key event to every node until one uses it.
    pub fn handle_key(&mut self, key: &str, pressed: bool) -> bool {
        for path in flatten_paths(&self.scenes) {
            if let Some(node) = node_at_mut(&mut self.scenes, &path) {
                if node.handle_key(key, pressed) {
                    log::trace!("CanvasManager: key '{key}' handled by '{}'", node.name());
                    return true;
                }
            }
        }
        false
    }
}

impl fmt::Debug for CanvasManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasManager")
            .field("canvas", &self.canvas)
            .field("scenes", &self.scenes.len())
            .field("frame_count", &self.frame_count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::tests::Group;

    #[test]
    fn scratchpad_is_typed() {
        let mut pad = Scratchpad::default();
        assert!(!pad.contains("controls"));
        assert_eq!(pad.insert("controls", 3_u32), None);
        assert_eq!(pad.get::<u32>("controls"), Some(&3));
        assert_eq!(pad.get::<String>("controls"), None);

        if let Some(n) = pad.get_mut::<u32>("controls") {
            *n += 1;
        }
        assert_eq!(pad.insert("controls", 7_u32), Some(4));
        assert!(pad.remove("controls"));
        assert!(!pad.contains("controls"));
    }

    #[test]
    fn panels_go_stale_when_nodes_appear() {
        let context = Box::new(tessera_infra::HeadlessContext::default());
        let mut manager = CanvasManager::new(context, &RenderSettings::default());
        manager.add_scene(Group::leaf("A"));
        assert!(manager.control_panels_stale());

        let mut panel = crate::PanelRecorder::new();
        manager.build_control_panels(&mut panel);
        assert!(!manager.control_panels_stale());
        assert_eq!(panel.sections(), ["A"]);

        manager.add_scene(Group::with("B", vec![Group::leaf("C")]));
        assert!(manager.control_panels_stale());
    }

    #[test]
    fn canvas_resizes_viewport() {
        let context = Box::new(tessera_infra::HeadlessContext::new(640, 480));
        let mut canvas = Canvas::new(context, &RenderSettings::default());
        assert_eq!(canvas.context().size(), (1080, 600));

        canvas.set_size(800, 400);
        assert_eq!(canvas.aspect_ratio(), 2.0);
        assert_eq!(canvas.context().size(), (800, 400));
        assert!(canvas.context_as::<tessera_infra::HeadlessContext>().is_some());
    }
}
