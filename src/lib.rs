//! texcache keeps one wgpu texture per pixel type around so images can be drawn to the screen over and over without reallocating. That's it!
//!
//! Textures are looked up by the image's pixel type and only ever grow: drawing a 100×50 image and then a 50×200 image of the same pixel type leaves a single 100×200 texture behind.
//!
//! [`Renderer`] is the easy way in. [`TextureCache`] and [`render_to_surface`] work with any [`Backend`] and [`Surface`] if you draw some other way.

mod backend;
mod cache;
mod format;
mod render;
#[cfg(test)]
mod testing;
mod texture;

pub use backend::{Backend, TextureDesc, WgpuBackend};
pub use cache::TextureCache;
pub use format::{Channels, ComponentType, ElementType, FormatTraits, Pixel};
pub use render::{render_to_surface, Blit, Flip, Surface, Viewport};
pub use texture::TextureHandle;

/// 8-bit RGBA color.
pub type Color = rgb::Rgba<u8>;

/// Errors that can occur.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Image is bigger than the device can hold in one texture.
    #[error("image is {width}x{height} but textures are limited to {limit}x{limit}")]
    TooLarge {
        width: usize,
        height: usize,
        limit: u32,
    },

    /// Texture has no GPU storage yet.
    #[error("texture has not been initialized")]
    InvalidTexture,

    /// Upload region does not fit in the texture.
    #[error("region of size {size} at {origin} does not fit in texture of size {texture_size}")]
    OutOfBounds {
        origin: glam::UVec2,
        size: glam::UVec2,
        texture_size: glam::UVec2,
    },

    /// Device lacks features needed to draw this pixel type.
    #[error("drawing {element_type:?} pixels needs device features {missing:?}")]
    MissingFeatures {
        element_type: ElementType,
        missing: wgpu::Features,
    },

    /// Pixel data does not match the size of the upload region.
    #[error("expected {expected} bytes of pixel data, got {actual}")]
    DataLength { expected: usize, actual: usize },
}

/// Encapsulates renderer state.
pub struct Renderer {
    renderer: spright::Renderer,
    cache: TextureCache,
}

impl Renderer {
    /// Creates a new renderer.
    pub fn new(device: &wgpu::Device, texture_format: wgpu::TextureFormat) -> Self {
        Self {
            renderer: spright::Renderer::new(device, texture_format),
            cache: TextureCache::new(),
        }
    }

    /// The textures held by this renderer.
    pub fn cache(&self) -> &TextureCache {
        &self.cache
    }

    /// Mutable access to the textures, e.g. to [`TextureCache::clear`] them after the device is recreated.
    pub fn cache_mut(&mut self) -> &mut TextureCache {
        &mut self.cache
    }

    /// Prepares an image for rendering at the top-left of the target, at its native size.
    ///
    /// Whatever was prepared before is discarded, even if this returns an error.
    pub fn prepare<P>(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target_size: wgpu::Extent3d,
        image: imgref::ImgRef<'_, P>,
        flip: Flip,
    ) -> Result<(), Error>
    where
        P: Pixel,
    {
        let backend = WgpuBackend::new(device, queue);
        let missing = P::ELEMENT_TYPE
            .required_features()
            .difference(device.features());

        let mut staged: Vec<Blit<'_, wgpu::Texture>> = vec![];
        let result = if missing.is_empty() {
            render_to_surface(&mut self.cache, &backend, &mut staged, image, flip)
        } else {
            Err(Error::MissingFeatures {
                element_type: P::ELEMENT_TYPE,
                missing,
            })
        };

        // Always prepare, so a failed or empty frame doesn't redraw the last one.
        let sprites = staged
            .iter()
            .map(|blit| spright::batch::Sprite {
                texture: blit.texture,
                src_offset: glam::IVec2::ZERO,
                src_size: blit.src_size,
                src_layer: 0,
                transform: blit.transform(),
                tint: Color::new(0xff, 0xff, 0xff, 0xff),
            })
            .collect::<Vec<_>>();
        self.renderer
            .prepare(device, queue, target_size, &spright::batch::batch(&sprites));

        result
    }

    /// Renders a prepared image.
    pub fn render<'rpass>(&'rpass self, rpass: &mut wgpu::RenderPass<'rpass>) {
        self.renderer.render(rpass);
    }
}
