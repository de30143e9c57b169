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

use std::cell::RefCell;
use tessera_core::asset::{ImageLoader, PendingImage};
use tessera_core::renderer::{
    ContextId, GpuInstances, GraphicsContext, MinFilter, RenderError, ResourceError, TextureId,
    TextureSampling,
};

/// An image-backed texture that becomes usable once its image has loaded.
///
/// Until then [`Texture::activate`] does nothing and drawing carries on without it.
#[derive(Debug)]
pub struct Texture {
    source: String,
    image: PendingImage,
    min_filter: MinFilter,
    instances: RefCell<GpuInstances<TextureId>>,
}

impl Texture {
    /// Starts loading `source` through `loader`.
    pub fn new(source: impl Into<String>, min_filter: MinFilter, loader: &dyn ImageLoader) -> Self {
        let source = source.into();
        let image = loader.load(&source);
        Self::from_image(source, image, min_filter)
    }

    /// Wraps an image slot that some other party fills.
    pub fn from_image(source: impl Into<String>, image: PendingImage, min_filter: MinFilter) -> Self {
        Self {
            source: source.into(),
            image,
            min_filter,
            instances: RefCell::new(GpuInstances::new()),
        }
    }

    /// Caps the number of contexts the texture may be uploaded to, builder style.
    pub fn with_context_ceiling(self, ceiling: usize) -> Self {
        self.instances.borrow_mut().set_ceiling(ceiling);
        self
    }

    /// The source the image was requested from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The minification policy applied on first upload.
    pub fn min_filter(&self) -> MinFilter {
        self.min_filter
    }

    /// Returns `true` once the image has been decoded.
    pub fn is_ready(&self) -> bool {
        self.image.is_ready()
    }

    /// The texture object on `ctx`, if the texture was staged there.
    pub fn handle(&self, ctx: ContextId) -> Option<TextureId> {
        self.instances.borrow().get(ctx).copied()
    }

    /// Uploads the current image to `ctx`, creating the texture object on first use.
    ///
    /// With `apply_sampling` the vertical flip, linear magnification and the
    /// minification policy are set, and mipmaps are generated when the policy
    /// samples them.
    ///
    /// # Errors
    /// `ResourceError::TextureNotReady` if the image is still loading.
    pub fn stage(
        &self,
        ctx: &mut dyn GraphicsContext,
        apply_sampling: bool,
    ) -> Result<TextureId, RenderError> {
        let image = self.image.get().ok_or(ResourceError::TextureNotReady)?;
        let mut instances = self.instances.borrow_mut();
        let id = match instances.get(ctx.id()) {
            Some(id) => *id,
            None => {
                instances.admit(ctx.id())?;
                let id = ctx.create_texture();
                log::debug!("Texture '{}': created {id:?} on context {}", self.source, ctx.id().raw());
                *instances.insert(ctx.id(), id)?
            }
        };

        if apply_sampling {
            ctx.set_texture_sampling(id, TextureSampling::for_images(self.min_filter))?;
        }
        ctx.upload_texture(id, image)?;
        if apply_sampling && self.min_filter.requires_mipmaps() {
            ctx.generate_mipmaps(id)?;
        }
        Ok(id)
    }

    /// Binds the texture to `unit`, uploading it first if this context has not seen it.
    ///
    /// A texture whose image is still loading is skipped without error.
    pub fn activate(&self, ctx: &mut dyn GraphicsContext, unit: u32) -> Result<(), RenderError> {
        if !self.is_ready() {
            log::trace!("Texture '{}': not loaded yet, skipping bind", self.source);
            return Ok(());
        }
        let id = match self.handle(ctx.id()) {
            Some(id) => id,
            None => self.stage(ctx, true)?,
        };
        ctx.bind_texture(unit, id)?;
        Ok(())
    }
}
