use std::collections::HashMap;

use crate::backend::Backend;
use crate::format::{ElementType, Pixel};
use crate::texture::TextureHandle;

/// Caches one GPU texture per pixel element type.
///
/// Textures only ever grow: a texture is reallocated when a request does not fit it, to the per-dimension maximum of its current size and the request. Textures are released when the cache is cleared or dropped.
///
/// The cache is not synchronized and must be used from the thread that owns the GPU device.
#[derive(Debug)]
pub struct TextureCache<T = wgpu::Texture> {
    textures: HashMap<ElementType, TextureHandle<T>>,
}

impl<T> Default for TextureCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TextureCache<T> {
    /// Creates an empty cache.
    ///
    /// This should be done whenever the wgpu state is reinitialized.
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
        }
    }

    /// Gets a texture for pixels of type `P` that is at least `min_width` by `min_height`.
    ///
    /// If the cached texture is too small in either dimension it is reallocated and its contents are lost.
    pub fn acquire<P, B>(
        &mut self,
        backend: &B,
        min_width: u32,
        min_height: u32,
    ) -> &mut TextureHandle<T>
    where
        P: Pixel,
        B: Backend<Texture = T>,
    {
        self.acquire_element(backend, P::ELEMENT_TYPE, min_width, min_height)
    }

    /// Like [`Self::acquire`], but with the element type chosen at runtime.
    pub fn acquire_element<B>(
        &mut self,
        backend: &B,
        element_type: ElementType,
        min_width: u32,
        min_height: u32,
    ) -> &mut TextureHandle<T>
    where
        B: Backend<Texture = T>,
    {
        let handle = self
            .textures
            .entry(element_type)
            .or_insert_with(|| TextureHandle::new(element_type));

        if !handle.is_valid() || handle.width() < min_width || handle.height() < min_height {
            let width = handle.width().max(min_width);
            let height = handle.height().max(min_height);
            handle.reinitialise(backend, width, height);
        }

        handle
    }

    /// Gets the cached texture for an element type without allocating.
    pub fn get(&self, element_type: ElementType) -> Option<&TextureHandle<T>> {
        self.textures.get(&element_type)
    }

    /// Iterates over all cached textures.
    pub fn iter(&self) -> impl Iterator<Item = &TextureHandle<T>> {
        self.textures.values()
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Releases every cached texture.
    pub fn clear(&mut self) {
        log::debug!("texcache: releasing {} textures", self.textures.len());
        self.textures.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;
    use pretty_assertions::assert_eq;

    #[test]
    fn first_acquire_allocates() {
        let backend = FakeBackend::default();
        let mut cache = TextureCache::new();
        let handle = cache.acquire::<f32, _>(&backend, 100, 50);
        assert!(handle.is_valid());
        assert_eq!(handle.size(), glam::UVec2::new(100, 50));
        assert_eq!(handle.element_type(), ElementType::F32);
        assert_eq!(backend.creates(), 1);
    }

    #[test]
    fn grows_per_dimension() {
        let backend = FakeBackend::default();
        let mut cache = TextureCache::new();
        cache.acquire::<f32, _>(&backend, 100, 50);
        let handle = cache.acquire::<f32, _>(&backend, 50, 200);
        assert_eq!(handle.size(), glam::UVec2::new(100, 200));
        assert_eq!(handle.texture(), Some(&1));
    }

    #[test]
    fn fitting_request_reuses_texture() {
        let backend = FakeBackend::default();
        let mut cache = TextureCache::new();
        cache.acquire::<u8, _>(&backend, 64, 64);
        cache.acquire::<u8, _>(&backend, 64, 10);
        cache.acquire::<u8, _>(&backend, 1, 64);
        assert_eq!(backend.creates(), 1);
        assert_eq!(
            cache.get(ElementType::U8).map(|h| h.size()),
            Some(glam::UVec2::new(64, 64))
        );
    }

    #[test]
    fn zero_request_never_grows() {
        let backend = FakeBackend::default();
        let mut cache = TextureCache::new();
        cache.acquire::<u8, _>(&backend, 8, 8);
        for (w, h) in [(0, 0), (0, 8), (8, 0)] {
            let handle = cache.acquire::<u8, _>(&backend, w, h);
            assert_eq!(handle.size(), glam::UVec2::new(8, 8));
        }
        assert_eq!(backend.creates(), 1);
    }

    #[test]
    fn zero_first_request_allocates_one_by_one() {
        let backend = FakeBackend::default();
        let mut cache = TextureCache::new();
        let handle = cache.acquire::<u8, _>(&backend, 0, 0);
        assert!(handle.is_valid());
        assert_eq!(handle.size(), glam::UVec2::ONE);
    }

    #[test]
    fn tracks_running_maximum() {
        let backend = FakeBackend::default();
        let mut cache = TextureCache::new();
        let requests = [(3, 9), (7, 2), (1, 1), (7, 10), (12, 4), (5, 5)];
        let mut max = glam::UVec2::ZERO;
        for (w, h) in requests {
            max = max.max(glam::UVec2::new(w, h));
            let handle = cache.acquire::<rgb::Rgba<u8>, _>(&backend, w, h);
            assert_eq!(handle.size(), max);
        }
    }

    #[test]
    fn element_types_have_separate_textures() {
        let backend = FakeBackend::default();
        let mut cache = TextureCache::new();
        let a = *cache.acquire::<u8, _>(&backend, 8, 8).texture().unwrap();
        let b = *cache.acquire::<f32, _>(&backend, 8, 8).texture().unwrap();
        assert_ne!(a, b);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(ElementType::U8).unwrap().size(), glam::UVec2::new(8, 8));

        cache.acquire::<f32, _>(&backend, 16, 16);
        assert_eq!(cache.get(ElementType::U8).unwrap().size(), glam::UVec2::new(8, 8));
        assert_eq!(
            cache.get(ElementType::F32).unwrap().size(),
            glam::UVec2::new(16, 16)
        );
    }

    #[test]
    fn runtime_element_type_shares_slot() {
        let backend = FakeBackend::default();
        let mut cache = TextureCache::new();
        cache.acquire::<rgb::Rgb<u8>, _>(&backend, 4, 4);
        cache.acquire_element(&backend, ElementType::Rgb8, 2, 2);
        assert_eq!(cache.len(), 1);
        assert_eq!(backend.creates(), 1);
    }

    #[test]
    fn clear_releases_everything() {
        let backend = FakeBackend::default();
        let mut cache = TextureCache::new();
        cache.acquire::<u8, _>(&backend, 8, 8);
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get(ElementType::U8).is_none());
        assert!(cache.acquire::<u8, _>(&backend, 1, 1).is_valid());
        assert_eq!(backend.creates(), 2);
    }
}
