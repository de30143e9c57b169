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

//! The per-context cache of uploaded GPU representations.

use crate::renderer::api::ContextId;
use crate::renderer::error::{RenderError, ResourceError};
use std::collections::HashMap;

/// The default number of distinct contexts one resource may be uploaded to.
pub const DEFAULT_CONTEXT_CEILING: usize = 200;

/// An explicit arena of uploaded representations, keyed by rendering context.
///
/// Holds at most one representation `R` per context. Resources that own GPU data
/// (geometry, programs, textures) keep one of these and stage themselves into it:
/// handles are allocated the first time a context is seen and updated in place on
/// every later staging.
///
/// The arena refuses to grow past its ceiling. Hitting it means a resource is being
/// uploaded to a fresh context every frame instead of reusing one, so the check runs
/// before any GPU handle is allocated.
#[derive(Debug)]
pub struct GpuInstances<R> {
    instances: HashMap<ContextId, R>,
    ceiling: usize,
}

impl<R> GpuInstances<R> {
    /// Creates an empty cache with the [`DEFAULT_CONTEXT_CEILING`].
    pub fn new() -> Self {
        Self::with_ceiling(DEFAULT_CONTEXT_CEILING)
    }

    /// Creates an empty cache admitting at most `ceiling` contexts.
    pub fn with_ceiling(ceiling: usize) -> Self {
        Self {
            instances: HashMap::new(),
            ceiling,
        }
    }

    /// Returns the representation stored for `ctx`, if any.
    pub fn get(&self, ctx: ContextId) -> Option<&R> {
        self.instances.get(&ctx)
    }

    /// Returns a mutable reference to the representation stored for `ctx`, if any.
    pub fn get_mut(&mut self, ctx: ContextId) -> Option<&mut R> {
        self.instances.get_mut(&ctx)
    }

    /// Returns `true` if a representation exists for `ctx`.
    pub fn contains(&self, ctx: ContextId) -> bool {
        self.instances.contains_key(&ctx)
    }

    /// Number of contexts this resource currently lives on.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Returns `true` if the resource has not been uploaded anywhere.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// The maximum number of contexts this cache admits.
    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    /// Changes the ceiling. Contexts already present stay, even past a lower ceiling.
    pub fn set_ceiling(&mut self, ceiling: usize) {
        self.ceiling = ceiling;
    }

    /// Checks that `ctx` may hold a representation.
    ///
    /// Contexts already present are always admitted.
    /// ## Errors
    /// * `ResourceError::TooManyGpuObjects` - If `ctx` is new and the ceiling is reached.
    pub fn admit(&self, ctx: ContextId) -> Result<(), ResourceError> {
        if self.instances.contains_key(&ctx) || self.instances.len() < self.ceiling {
            Ok(())
        } else {
            log::error!(
                "GpuInstances: refusing context {} after {} uploads of the same resource",
                ctx.raw(),
                self.ceiling
            );
            Err(ResourceError::TooManyGpuObjects {
                limit: self.ceiling,
            })
        }
    }

    /// Stores `representation` for `ctx`, replacing any previous one.
    pub fn insert(&mut self, ctx: ContextId, representation: R) -> Result<&mut R, ResourceError> {
        self.admit(ctx)?;
        self.instances.insert(ctx, representation);
        self.instances.get_mut(&ctx).ok_or(ResourceError::InvalidHandle)
    }

    /// Returns the representation for `ctx`, staging it first if this is the first
    /// activation on that context.
    ///
    /// Re-activation is idempotent: `stage` runs at most once per context and is
    /// ignored afterwards.
    pub fn activate<F>(&mut self, ctx: ContextId, stage: F) -> Result<&mut R, RenderError>
    where
        F: FnOnce() -> Result<R, RenderError>,
    {
        if !self.instances.contains_key(&ctx) {
            self.admit(ctx)?;
            let representation = stage()?;
            self.instances.insert(ctx, representation);
        }
        self.instances
            .get_mut(&ctx)
            .ok_or(RenderError::ResourceError(ResourceError::InvalidHandle))
    }
}

impl<R> Default for GpuInstances<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activation_is_idempotent_per_context() {
        let mut cache = GpuInstances::<u32>::new();
        let ctx = ContextId::next();
        let mut calls = 0;

        let first = *cache
            .activate(ctx, || {
                calls += 1;
                Ok(7)
            })
            .unwrap();
        let second = *cache
            .activate(ctx, || {
                calls += 1;
                Ok(99)
            })
            .unwrap();

        assert_eq!(first, 7);
        assert_eq!(second, 7, "re-activation must ignore new staging arguments");
        assert_eq!(calls, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn distinct_contexts_get_independent_representations() {
        let mut cache = GpuInstances::<Vec<u8>>::new();
        let (a, b) = (ContextId::next(), ContextId::next());
        cache.activate(a, || Ok(vec![1])).unwrap().push(2);
        cache.activate(b, || Ok(vec![9])).unwrap();

        assert_eq!(cache.get(a), Some(&vec![1, 2]));
        assert_eq!(cache.get(b), Some(&vec![9]));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn ceiling_is_enforced_before_staging() {
        let mut cache = GpuInstances::<()>::with_ceiling(3);
        for _ in 0..3 {
            cache.activate(ContextId::next(), || Ok(())).unwrap();
        }

        let mut staged = false;
        let err = cache
            .activate(ContextId::next(), || {
                staged = true;
                Ok(())
            })
            .unwrap_err();
        assert_eq!(
            err,
            RenderError::ResourceError(ResourceError::TooManyGpuObjects { limit: 3 })
        );
        assert!(!staged, "no GPU work may happen past the ceiling");
    }

    #[test]
    fn lowered_ceiling_keeps_existing_contexts() {
        let mut cache = GpuInstances::<u8>::new();
        let first = ContextId::next();
        cache.activate(first, || Ok(1)).unwrap();
        cache.set_ceiling(1);

        assert_eq!(*cache.activate(first, || Ok(2)).unwrap(), 1);
        assert_eq!(
            cache.admit(ContextId::next()),
            Err(ResourceError::TooManyGpuObjects { limit: 1 })
        );
    }

    #[test]
    fn default_ceiling_is_two_hundred() {
        let mut cache = GpuInstances::<usize>::new();
        for i in 0..DEFAULT_CONTEXT_CEILING {
            cache.insert(ContextId::next(), i).unwrap();
        }
        let existing = *cache.instances.keys().next().unwrap();
        assert!(cache.admit(existing).is_ok());
        assert!(matches!(
            cache.insert(ContextId::next(), 0),
            Err(ResourceError::TooManyGpuObjects { limit: 200 })
        ));
    }

    #[test]
    fn staging_errors_leave_the_cache_untouched() {
        let mut cache = GpuInstances::<u8>::new();
        let ctx = ContextId::next();
        let result = cache.activate(ctx, || Err(RenderError::RenderingFailed("boom".into())));
        assert!(result.is_err());
        assert!(!cache.contains(ctx));
    }
}
