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

//! The sandbox scene.

use std::rc::Rc;
use tessera_core::asset::ImageLoader;
use tessera_core::math::{Mat4, Vec3, Vec4, FRAC_PI_4};
use tessera_core::renderer::{Light, MinFilter, PrimitiveType, ProgramState, RenderError, RenderSettings};
use tessera_data::geometry::TEXTURE_COORD;
use tessera_data::{AxisArrows, Cube, GeometryError, Shape, VertexArray, VertexBuffer};
use tessera_lanes::{Material, PhongShader, Texture, TexturedPhong};
use tessera_sdk::{Canvas, ControlPanel, MovementControls, SceneNode};

const CONTROLS_KEY: &str = "controls";

/// Two textured cubes, one per minification filter, plus optional untextured axis arrows.
pub struct TexturedCubes {
    box_1: VertexBuffer,
    box_2: VertexBuffer,
    axis: VertexBuffer,
    texture_1: Material,
    texture_2: Material,
    axis_material: Material,
    show_axes: bool,
    children: Vec<Box<dyn SceneNode>>,
}

impl TexturedCubes {
    /// Builds the shapes and starts loading both textures through `loader`.
    pub fn new(settings: &RenderSettings, loader: &dyn ImageLoader) -> Result<Self, GeometryError> {
        let ceiling = settings.context_ceiling;
        let mut box_2 = Cube.build()?.with_context_ceiling(ceiling);
        // Tile the texture twice along each axis.
        box_2.map_array(TEXTURE_COORD, |column| {
            if let VertexArray::Vec2(uvs) = column {
                uvs.iter_mut().for_each(|uv| *uv = *uv * 2.0);
            }
        });

        let shader = Rc::new(TexturedPhong::from_settings(settings));
        let textured = |texture: Texture| {
            Material::new(shader.clone())
                .with_color(Vec4::new(0.0, 0.0, 0.0, 1.0))
                .with_ambient(1.0)
                .with_diffusivity(0.1)
                .with_specularity(0.1)
                .with_texture(Rc::new(texture.with_context_ceiling(ceiling)))
        };

        Ok(Self {
            box_1: Cube.build()?.with_context_ceiling(ceiling),
            box_2,
            axis: AxisArrows.build()?.with_context_ceiling(ceiling),
            texture_1: textured(Texture::new("stars.png", MinFilter::Nearest, loader)),
            texture_2: textured(Texture::new(
                "earth.gif",
                MinFilter::LinearMipmapLinear,
                loader,
            )),
            axis_material: Material::new(Rc::new(PhongShader::from_settings(settings)))
                .with_color(Vec4::new(1.0, 1.0, 1.0, 1.0))
                .with_ambient(0.5),
            show_axes: false,
            children: Vec::new(),
        })
    }
}

impl SceneNode for TexturedCubes {
    fn name(&self) -> &str {
        "Textured Cubes"
    }

    fn display(&mut self, canvas: &mut Canvas, state: &mut ProgramState) -> Result<(), RenderError> {
        if !canvas.scratchpad.contains(CONTROLS_KEY) {
            self.children.push(Box::new(MovementControls::new()));
            canvas.scratchpad.insert(CONTROLS_KEY, ());
            state.set_camera(Mat4::translation(Vec3::new(0.0, 0.0, -8.0)));
        }

        state.projection_transform = Mat4::perspective(FRAC_PI_4, canvas.aspect_ratio(), 1.0, 100.0);
        state.lights = vec![Light::new(
            Vec4::new(10.0, 10.0, 10.0, 1.0),
            Vec4::ONE,
            1000.0,
        )];

        let ctx = canvas.context_mut();
        let box_1_transform = Mat4::translation(Vec3::new(-2.0, 0.0, 0.0));
        self.box_1
            .draw(ctx, state, &box_1_transform, &self.texture_1, PrimitiveType::Triangles)?;

        let box_2_transform = Mat4::translation(Vec3::new(2.0, 0.0, 0.0));
        self.box_2
            .draw(ctx, state, &box_2_transform, &self.texture_2, PrimitiveType::Triangles)?;

        if self.show_axes {
            self.axis.draw(
                ctx,
                state,
                &Mat4::IDENTITY,
                &self.axis_material,
                PrimitiveType::Triangles,
            )?;
        }
        Ok(())
    }

    fn children(&self) -> &[Box<dyn SceneNode>] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut [Box<dyn SceneNode>] {
        &mut self.children
    }

    fn make_control_panel(&mut self, panel: &mut dyn ControlPanel) {
        panel.key_triggered_button("Show axes", &["x"]);
    }

    fn handle_key(&mut self, key: &str, pressed: bool) -> bool {
        if key != "x" {
            return false;
        }
        if pressed {
            self.show_axes = !self.show_axes;
            log::info!("Axis arrows {}", if self.show_axes { "shown" } else { "hidden" });
        }
        true
    }
}
