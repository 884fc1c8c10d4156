use glam::{Affine2, IVec2, UVec2};
use imgref::ImgRef;

use crate::backend::Backend;
use crate::cache::TextureCache;
use crate::format::Pixel;
use crate::texture::TextureHandle;
use crate::Error;

/// Which axes to mirror an image along when drawing it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Flip {
    /// Mirror left-to-right.
    pub horizontal: bool,
    /// Mirror top-to-bottom.
    pub vertical: bool,
}

/// Target region on the surface being drawn to, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub offset: IVec2,
    pub size: UVec2,
}

impl Viewport {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            offset: IVec2::new(x, y),
            size: UVec2::new(width, height),
        }
    }

    /// Maps a `src_size` rectangle at the origin onto this viewport, mirrored according to `flip`.
    pub fn transform(&self, src_size: UVec2, flip: Flip) -> Affine2 {
        let mut scale = self.size.as_vec2() / src_size.max(UVec2::ONE).as_vec2();
        let mut translation = self.offset.as_vec2();
        if flip.horizontal {
            scale.x = -scale.x;
            translation.x += self.size.x as f32;
        }
        if flip.vertical {
            scale.y = -scale.y;
            translation.y += self.size.y as f32;
        }
        Affine2::from_scale_angle_translation(scale, 0.0, translation)
    }
}

/// A request to present part of a texture.
#[derive(Debug, PartialEq)]
pub struct Blit<'a, T> {
    pub texture: &'a T,
    /// Size of the rectangle at the texture's origin to present.
    pub src_size: UVec2,
    pub viewport: Viewport,
    pub flip: Flip,
}

impl<T> Blit<'_, T> {
    /// See [`Viewport::transform`].
    pub fn transform(&self) -> Affine2 {
        self.viewport.transform(self.src_size, self.flip)
    }
}

/// Something textures can be drawn onto.
///
/// `'a` is how long the drawn textures stay borrowed, so a surface may hold on to blits and draw them later.
pub trait Surface<'a, T> {
    fn draw(&mut self, blit: Blit<'a, T>);
}

/// Stages blits to be drawn all at once.
impl<'a, T> Surface<'a, T> for Vec<Blit<'a, T>> {
    fn draw(&mut self, blit: Blit<'a, T>) {
        self.push(blit);
    }
}

/// Draws an image at the top-left of a surface, at its native size.
///
/// The image is uploaded into the cached texture for its pixel type, growing the texture if needed.
pub fn render_to_surface<'a, P, B, S>(
    cache: &'a mut TextureCache<B::Texture>,
    backend: &B,
    surface: &mut S,
    image: ImgRef<'_, P>,
    flip: Flip,
) -> Result<(), Error>
where
    P: Pixel,
    B: Backend,
    S: Surface<'a, B::Texture>,
{
    let limit = backend.max_texture_dimension();
    let (width, height) = (image.width(), image.height());
    if width > limit as usize || height > limit as usize {
        return Err(Error::TooLarge {
            width,
            height,
            limit,
        });
    }
    if width == 0 || height == 0 {
        return Ok(());
    }

    let size = UVec2::new(width as u32, height as u32);
    let handle: &'a TextureHandle<B::Texture> = cache.acquire::<P, B>(backend, size.x, size.y);
    let (buf, _, _) = image.to_contiguous_buf();
    handle.upload(backend, UVec2::ZERO, size, bytemuck::cast_slice::<P, u8>(&buf))?;

    let Some(texture) = handle.texture() else {
        return Err(Error::InvalidTexture);
    };
    surface.draw(Blit {
        texture,
        src_size: size,
        viewport: Viewport::new(0, 0, size.x, size.y),
        flip,
    });
    Ok(())
}
