//! Pixel element types and the GPU formats they are stored in.

use std::borrow::Cow;

/// The per-pixel data type of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementType {
    /// 8-bit grey, stored as sRGB RGBA.
    U8,
    /// 16-bit grey, stored as normalized RGBA.
    ///
    /// Requires [`wgpu::Features::TEXTURE_FORMAT_16BIT_NORM`].
    U16,
    /// 32-bit float grey, stored as float RGBA.
    ///
    /// Drawing it requires [`wgpu::Features::FLOAT32_FILTERABLE`].
    F32,
    /// 8-bit RGB, stored as sRGB RGBA.
    Rgb8,
    /// 8-bit RGBA, stored as sRGB RGBA.
    Rgba8,
    /// 32-bit float RGB, stored as float RGBA.
    ///
    /// Drawing it requires [`wgpu::Features::FLOAT32_FILTERABLE`].
    RgbF32,
    /// 32-bit float RGBA.
    ///
    /// Drawing it requires [`wgpu::Features::FLOAT32_FILTERABLE`].
    RgbaF32,
}

/// Channel layout of pixel data as it is uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channels {
    /// One value, shown as grey.
    Luminance,
    Rgb,
    Rgba,
}

impl Channels {
    pub const fn count(self) -> u32 {
        match self {
            Channels::Luminance => 1,
            Channels::Rgb => 3,
            Channels::Rgba => 4,
        }
    }
}

/// Type of each channel of uploaded pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentType {
    U8,
    U16,
    F32,
}

impl ComponentType {
    pub const fn size(self) -> u32 {
        match self {
            ComponentType::U8 => 1,
            ComponentType::U16 => 2,
            ComponentType::F32 => 4,
        }
    }

    /// Bytes of a fully opaque alpha component.
    fn opaque(self) -> Vec<u8> {
        match self {
            ComponentType::U8 => vec![u8::MAX],
            ComponentType::U16 => u16::MAX.to_ne_bytes().to_vec(),
            ComponentType::F32 => 1.0f32.to_ne_bytes().to_vec(),
        }
    }
}

/// How an element type is stored on the GPU and how its data is uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatTraits {
    /// GPU storage format.
    pub internal_format: wgpu::TextureFormat,
    /// Channel layout of uploaded data.
    pub channels: Channels,
    /// Component type of uploaded data.
    pub component: ComponentType,
}

impl FormatTraits {
    /// Size of one pixel of upload data.
    pub const fn bytes_per_pixel(&self) -> u32 {
        self.channels.count() * self.component.size()
    }

    /// Size of one pixel as stored on the GPU. Everything is stored as RGBA.
    pub const fn stored_bytes_per_pixel(&self) -> u32 {
        4 * self.component.size()
    }

    /// Converts upload data into the layout of [`Self::internal_format`].
    ///
    /// Luminance is copied into R, G and B. Luminance and RGB data gain an opaque alpha channel. RGBA data is borrowed as is.
    pub fn to_stored<'a>(&self, data: &'a [u8]) -> Cow<'a, [u8]> {
        if self.channels == Channels::Rgba {
            return Cow::Borrowed(data);
        }
        let pixel = self.bytes_per_pixel() as usize;
        let alpha = self.component.opaque();
        let mut out =
            Vec::with_capacity(data.len() / pixel * self.stored_bytes_per_pixel() as usize);
        for px in data.chunks_exact(pixel) {
            match self.channels {
                Channels::Luminance => {
                    for _ in 0..3 {
                        out.extend_from_slice(px);
                    }
                }
                _ => out.extend_from_slice(px),
            }
            out.extend_from_slice(&alpha);
        }
        Cow::Owned(out)
    }
}

impl ElementType {
    /// Every supported element type.
    pub const ALL: [ElementType; 7] = [
        ElementType::U8,
        ElementType::U16,
        ElementType::F32,
        ElementType::Rgb8,
        ElementType::Rgba8,
        ElementType::RgbF32,
        ElementType::RgbaF32,
    ];

    /// Looks up the format traits for this element type.
    pub const fn traits(self) -> FormatTraits {
        use wgpu::TextureFormat as F;
        let (internal_format, channels, component) = match self {
            ElementType::U8 => (F::Rgba8UnormSrgb, Channels::Luminance, ComponentType::U8),
            ElementType::U16 => (F::Rgba16Unorm, Channels::Luminance, ComponentType::U16),
            ElementType::F32 => (F::Rgba32Float, Channels::Luminance, ComponentType::F32),
            ElementType::Rgb8 => (F::Rgba8UnormSrgb, Channels::Rgb, ComponentType::U8),
            ElementType::Rgba8 => (F::Rgba8UnormSrgb, Channels::Rgba, ComponentType::U8),
            ElementType::RgbF32 => (F::Rgba32Float, Channels::Rgb, ComponentType::F32),
            ElementType::RgbaF32 => (F::Rgba32Float, Channels::Rgba, ComponentType::F32),
        };
        FormatTraits {
            internal_format,
            channels,
            component,
        }
    }

    /// Device features needed to create and draw textures of this type.
    pub fn required_features(self) -> wgpu::Features {
        match self.traits().component {
            ComponentType::U8 => wgpu::Features::empty(),
            ComponentType::U16 => wgpu::Features::TEXTURE_FORMAT_16BIT_NORM,
            ComponentType::F32 => wgpu::Features::FLOAT32_FILTERABLE,
        }
    }
}

/// Pixel types that can be drawn through a [`crate::TextureCache`].
pub trait Pixel: bytemuck::NoUninit {
    /// The element type this pixel is cached under.
    const ELEMENT_TYPE: ElementType;
}

impl Pixel for u8 {
    const ELEMENT_TYPE: ElementType = ElementType::U8;
}

impl Pixel for u16 {
    const ELEMENT_TYPE: ElementType = ElementType::U16;
}

impl Pixel for f32 {
    const ELEMENT_TYPE: ElementType = ElementType::F32;
}

impl Pixel for rgb::Rgb<u8> {
    const ELEMENT_TYPE: ElementType = ElementType::Rgb8;
}

impl Pixel for rgb::Rgba<u8> {
    const ELEMENT_TYPE: ElementType = ElementType::Rgba8;
}

impl Pixel for rgb::Rgb<f32> {
    const ELEMENT_TYPE: ElementType = ElementType::RgbF32;
}

impl Pixel for rgb::Rgba<f32> {
    const ELEMENT_TYPE: ElementType = ElementType::RgbaF32;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn table_matches_storage_size() {
        for ty in ElementType::ALL {
            let traits = ty.traits();
            assert_eq!(
                traits.internal_format.block_copy_size(None),
                Some(traits.stored_bytes_per_pixel()),
                "{ty:?}"
            );
        }
    }

    #[test]
    fn pixel_sizes_match_upload_layout() {
        fn check<P: Pixel>() {
            assert_eq!(
                std::mem::size_of::<P>() as u32,
                P::ELEMENT_TYPE.traits().bytes_per_pixel()
            );
        }
        check::<u8>();
        check::<u16>();
        check::<f32>();
        check::<rgb::Rgb<u8>>();
        check::<rgb::Rgba<u8>>();
        check::<rgb::Rgb<f32>>();
        check::<rgb::Rgba<f32>>();
    }

    #[test]
    fn rgb8_gains_opaque_alpha() {
        let traits = ElementType::Rgb8.traits();
        assert_eq!(
            &*traits.to_stored(&[1, 2, 3, 4, 5, 6]),
            &[1, 2, 3, 0xff, 4, 5, 6, 0xff]
        );
    }

    #[test]
    fn rgb_f32_gains_unit_alpha() {
        let traits = ElementType::RgbF32.traits();
        let stored = traits.to_stored(bytemuck::cast_slice(&[0.25f32, 0.5, 0.75]));
        assert_eq!(
            &*stored,
            bytemuck::cast_slice::<f32, u8>(&[0.25, 0.5, 0.75, 1.0])
        );
    }

    #[test]
    fn luminance_is_grey_and_opaque() {
        assert_eq!(
            &*ElementType::U8.traits().to_stored(&[10, 200]),
            &[10, 10, 10, 0xff, 200, 200, 200, 0xff]
        );

        let stored = ElementType::U16
            .traits()
            .to_stored(bytemuck::cast_slice(&[0x1234u16]));
        assert_eq!(
            &*stored,
            bytemuck::cast_slice::<u16, u8>(&[0x1234, 0x1234, 0x1234, u16::MAX])
        );

        let stored = ElementType::F32
            .traits()
            .to_stored(bytemuck::cast_slice(&[0.5f32]));
        assert_eq!(
            &*stored,
            bytemuck::cast_slice::<f32, u8>(&[0.5, 0.5, 0.5, 1.0])
        );
    }

    #[test]
    fn scalars_are_stored_as_rgba() {
        for ty in [ElementType::U8, ElementType::U16, ElementType::F32] {
            let traits = ty.traits();
            assert_eq!(traits.channels, Channels::Luminance);
            assert_eq!(traits.internal_format.components(), 4, "{ty:?}");
        }
    }

    #[test]
    fn float_and_16bit_types_need_features() {
        assert_eq!(ElementType::U8.required_features(), wgpu::Features::empty());
        assert_eq!(ElementType::Rgba8.required_features(), wgpu::Features::empty());
        assert_eq!(
            ElementType::U16.required_features(),
            wgpu::Features::TEXTURE_FORMAT_16BIT_NORM
        );
        for ty in [ElementType::F32, ElementType::RgbF32, ElementType::RgbaF32] {
            assert_eq!(ty.required_features(), wgpu::Features::FLOAT32_FILTERABLE);
        }
    }

    #[test]
    fn rgba_is_borrowed() {
        let data = [9u8; 8];
        assert!(matches!(
            ElementType::Rgba8.traits().to_stored(&data),
            Cow::Borrowed(_)
        ));
    }
}
