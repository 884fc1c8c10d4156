use crate::backend::{Backend, TextureDesc};
use crate::format::{ElementType, FormatTraits};
use crate::Error;

/// A GPU texture owned by a [`crate::TextureCache`].
///
/// A handle starts out invalid (no GPU storage) and becomes valid the first time it is reinitialised.
#[derive(Debug)]
pub struct TextureHandle<T> {
    texture: Option<T>,
    size: glam::UVec2,
    element_type: ElementType,
}

impl<T> TextureHandle<T> {
    /// Creates an invalid, empty handle.
    pub fn new(element_type: ElementType) -> Self {
        Self {
            texture: None,
            size: glam::UVec2::ZERO,
            element_type,
        }
    }

    /// Whether the handle has GPU storage.
    pub fn is_valid(&self) -> bool {
        self.texture.is_some()
    }

    pub fn width(&self) -> u32 {
        self.size.x
    }

    pub fn height(&self) -> u32 {
        self.size.y
    }

    pub fn size(&self) -> glam::UVec2 {
        self.size
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    pub fn traits(&self) -> FormatTraits {
        self.element_type.traits()
    }

    /// Gets the GPU texture.
    ///
    /// Returns [`None`] if the handle is not valid yet.
    pub fn texture(&self) -> Option<&T> {
        self.texture.as_ref()
    }

    /// Replaces the GPU storage with a new texture of the given size.
    ///
    /// Previous contents are discarded. Each dimension is at least 1.
    pub fn reinitialise<B>(&mut self, backend: &B, width: u32, height: u32)
    where
        B: Backend<Texture = T>,
    {
        let size = glam::UVec2::new(width, height).max(glam::UVec2::ONE);
        log::debug!(
            "texcache: allocating {:?} texture {}x{} (was {}x{})",
            self.element_type,
            size.x,
            size.y,
            self.size.x,
            self.size.y,
        );
        drop(self.texture.take());
        self.texture = Some(backend.create_texture(&TextureDesc {
            label: Some("texcache: TextureHandle"),
            size,
            format: self.traits().internal_format,
        }));
        self.size = size;
    }

    /// Uploads tightly packed pixel data into a region of the texture.
    pub fn upload<B>(
        &self,
        backend: &B,
        origin: glam::UVec2,
        size: glam::UVec2,
        data: &[u8],
    ) -> Result<(), Error>
    where
        B: Backend<Texture = T>,
    {
        let Some(texture) = &self.texture else {
            return Err(Error::InvalidTexture);
        };
        let fits = |origin: u32, len: u32, max: u32| {
            origin.checked_add(len).is_some_and(|end| end <= max)
        };
        if !fits(origin.x, size.x, self.size.x) || !fits(origin.y, size.y, self.size.y) {
            return Err(Error::OutOfBounds {
                origin,
                size,
                texture_size: self.size,
            });
        }
        let traits = self.traits();
        let expected = size.x as usize * size.y as usize * traits.bytes_per_pixel() as usize;
        if data.len() != expected {
            return Err(Error::DataLength {
                expected,
                actual: data.len(),
            });
        }
        log::trace!(
            "texcache: uploading {}x{} at ({}, {}) into {:?} texture",
            size.x,
            size.y,
            origin.x,
            origin.y,
            self.element_type,
        );
        backend.write_texture(texture, origin, size, &traits, data);
        Ok(())
    }
}
