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

use super::program::Shader;
use super::texture::Texture;
use std::rc::Rc;
use tessera_core::math::Vec4;
use thiserror::Error;

/// Errors raised when a value cannot be matched to a material field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MaterialError {
    /// No set field holds a value of this kind.
    #[error("no field of the material holds a {kind} value")]
    NoMatchingField {
        /// The kind of the replacement value.
        kind: &'static str,
    },
    /// Several fields hold a value of this kind, so the target is unclear.
    #[error("several fields hold a {kind} value ({candidates:?}), replace one by name instead")]
    AmbiguousField {
        /// The kind of the replacement value.
        kind: &'static str,
        /// The fields that could have been meant.
        candidates: Vec<&'static str>,
    },
}

/// A single value to be placed in whichever material field has its kind.
#[derive(Debug, Clone)]
pub enum MaterialValue {
    /// A surface coefficient.
    Scalar(f32),
    /// An RGBA color.
    Color(Vec4),
    /// An image.
    Texture(Rc<Texture>),
    /// A shading strategy.
    Shader(Rc<dyn Shader>),
}

impl MaterialValue {
    fn kind(&self) -> &'static str {
        match self {
            MaterialValue::Scalar(_) => "scalar",
            MaterialValue::Color(_) => "color",
            MaterialValue::Texture(_) => "texture",
            MaterialValue::Shader(_) => "shader",
        }
    }
}

/// A set of optional material fields, merged field by field.
#[derive(Debug, Clone, Default)]
pub struct MaterialOptions {
    /// Replaces the shader.
    pub shader: Option<Rc<dyn Shader>>,
    /// Replaces the color.
    pub color: Option<Vec4>,
    /// Replaces the ambient coefficient.
    pub ambient: Option<f32>,
    /// Replaces the diffuse coefficient.
    pub diffusivity: Option<f32>,
    /// Replaces the specular coefficient.
    pub specularity: Option<f32>,
    /// Replaces the specular exponent.
    pub smoothness: Option<f32>,
    /// Replaces the texture.
    pub texture: Option<Rc<Texture>>,
}

/// How a shape is drawn: a shader plus the parameters it reads.
///
/// Unset coefficients fall back to the shader's defaults at draw time.
#[derive(Debug, Clone)]
pub struct Material {
    /// The shading strategy.
    pub shader: Rc<dyn Shader>,
    /// Base color.
    pub color: Option<Vec4>,
    /// Ambient coefficient.
    pub ambient: Option<f32>,
    /// Diffuse coefficient.
    pub diffusivity: Option<f32>,
    /// Specular coefficient.
    pub specularity: Option<f32>,
    /// Specular exponent.
    pub smoothness: Option<f32>,
    /// Surface image.
    pub texture: Option<Rc<Texture>>,
}

impl Material {
    /// Creates a material with only its shader set.
    pub fn new(shader: Rc<dyn Shader>) -> Self {
        Self {
            shader,
            color: None,
            ambient: None,
            diffusivity: None,
            specularity: None,
            smoothness: None,
            texture: None,
        }
    }

    /// Sets the base color.
    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = Some(color);
        self
    }

    /// Sets the ambient coefficient.
    pub fn with_ambient(mut self, ambient: f32) -> Self {
        self.ambient = Some(ambient);
        self
    }

    /// Sets the diffuse coefficient.
    pub fn with_diffusivity(mut self, diffusivity: f32) -> Self {
        self.diffusivity = Some(diffusivity);
        self
    }

    /// Sets the specular coefficient.
    pub fn with_specularity(mut self, specularity: f32) -> Self {
        self.specularity = Some(specularity);
        self
    }

    /// Sets the specular exponent.
    pub fn with_smoothness(mut self, smoothness: f32) -> Self {
        self.smoothness = Some(smoothness);
        self
    }

    /// Sets the surface image.
    pub fn with_texture(mut self, texture: Rc<Texture>) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Returns a copy with every field set in `options` replaced.
    pub fn override_with(&self, options: MaterialOptions) -> Self {
        let mut copy = self.clone();
        copy.replace(options);
        copy
    }

    /// Replaces every field set in `options`, in place.
    pub fn replace(&mut self, options: MaterialOptions) -> &mut Self {
        if let Some(shader) = options.shader {
            self.shader = shader;
        }
        if options.color.is_some() {
            self.color = options.color;
        }
        if options.ambient.is_some() {
            self.ambient = options.ambient;
        }
        if options.diffusivity.is_some() {
            self.diffusivity = options.diffusivity;
        }
        if options.specularity.is_some() {
            self.specularity = options.specularity;
        }
        if options.smoothness.is_some() {
            self.smoothness = options.smoothness;
        }
        if options.texture.is_some() {
            self.texture = options.texture;
        }
        self
    }

    /// Returns a copy with the single field of `value`'s kind replaced.
    pub fn override_value(&self, value: MaterialValue) -> Result<Self, MaterialError> {
        let mut copy = self.clone();
        copy.replace_value(value)?;
        Ok(copy)
    }

    /// Places `value` in the one set field of the same kind.
    ///
    /// # Errors
    /// * `MaterialError::NoMatchingField` - No set field has that kind.
    /// * `MaterialError::AmbiguousField` - More than one does, for example a scalar
    ///   when both `ambient` and `diffusivity` are set.
    pub fn replace_value(&mut self, value: MaterialValue) -> Result<&mut Self, MaterialError> {
        let kind = value.kind();
        match value {
            MaterialValue::Shader(shader) => self.shader = shader,
            MaterialValue::Color(color) => {
                if self.color.is_none() {
                    return Err(MaterialError::NoMatchingField { kind });
                }
                self.color = Some(color);
            }
            MaterialValue::Texture(texture) => {
                if self.texture.is_none() {
                    return Err(MaterialError::NoMatchingField { kind });
                }
                self.texture = Some(texture);
            }
            MaterialValue::Scalar(scalar) => {
                let mut fields = [
                    ("ambient", &mut self.ambient),
                    ("diffusivity", &mut self.diffusivity),
                    ("specularity", &mut self.specularity),
                    ("smoothness", &mut self.smoothness),
                ];
                let candidates: Vec<&'static str> = fields
                    .iter()
                    .filter(|(_, field)| field.is_some())
                    .map(|(name, _)| *name)
                    .collect();
                match candidates.len() {
                    0 => return Err(MaterialError::NoMatchingField { kind }),
                    1 => {
                        for (_, field) in fields.iter_mut() {
                            if field.is_some() {
                                **field = Some(scalar);
                            }
                        }
                    }
                    _ => return Err(MaterialError::AmbiguousField { kind, candidates }),
                }
            }
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::super::phong::PhongShader;
    use super::*;

    fn phong() -> Rc<dyn Shader> {
        Rc::new(PhongShader::new(2))
    }

    #[test]
    fn options_merge_field_by_field() {
        let base = Material::new(phong())
            .with_color(Vec4::new(1.0, 0.0, 0.0, 1.0))
            .with_ambient(0.5);
        let merged = base.override_with(MaterialOptions {
            ambient: Some(1.0),
            smoothness: Some(10.0),
            ..Default::default()
        });

        assert_eq!(merged.color, Some(Vec4::new(1.0, 0.0, 0.0, 1.0)));
        assert_eq!(merged.ambient, Some(1.0));
        assert_eq!(merged.smoothness, Some(10.0));
        assert_eq!(base.ambient, Some(0.5));
        assert!(base.smoothness.is_none());
    }

    #[test]
    fn color_replaces_the_color_field() {
        let mut m = Material::new(phong()).with_color(Vec4::ONE);
        m.replace_value(MaterialValue::Color(Vec4::ZERO)).unwrap();
        assert_eq!(m.color, Some(Vec4::ZERO));
    }

    #[test]
    fn unmatched_kind_is_an_error() {
        let m = Material::new(phong());
        let err = m
            .override_value(MaterialValue::Color(Vec4::ONE))
            .unwrap_err();
        assert_eq!(err, MaterialError::NoMatchingField { kind: "color" });
    }

    #[test]
    fn scalar_is_ambiguous_with_several_coefficients() {
        let mut m = Material::new(phong()).with_ambient(1.0).with_diffusivity(0.1);
        let err = m.replace_value(MaterialValue::Scalar(0.3)).unwrap_err();
        assert_eq!(
            err,
            MaterialError::AmbiguousField {
                kind: "scalar",
                candidates: vec!["ambient", "diffusivity"],
            }
        );
        assert_eq!(m.ambient, Some(1.0));
    }

    #[test]
    fn lone_scalar_is_replaced() {
        let m = Material::new(phong()).with_smoothness(40.0);
        let m = m.override_value(MaterialValue::Scalar(5.0)).unwrap();
        assert_eq!(m.smoothness, Some(5.0));
        assert!(m.ambient.is_none());
    }

    #[test]
    fn shader_is_always_replaceable() {
        let mut m = Material::new(phong());
        let other = phong();
        m.replace_value(MaterialValue::Shader(other.clone())).unwrap();
        assert!(Rc::ptr_eq(&m.shader, &other));
    }
}
