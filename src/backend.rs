use crate::format::FormatTraits;

/// Parameters for creating a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureDesc {
    pub label: Option<&'static str>,
    pub size: glam::UVec2,
    pub format: wgpu::TextureFormat,
}

/// GPU operations a [`crate::TextureCache`] needs.
///
/// All calls are expected to happen on the thread that owns the device.
pub trait Backend {
    /// Texture resource type. Dropping it releases the GPU memory.
    type Texture;

    /// The largest width or height a texture may have.
    fn max_texture_dimension(&self) -> u32;

    /// Allocates a new texture. Its contents are undefined.
    fn create_texture(&self, desc: &TextureDesc) -> Self::Texture;

    /// Writes `size` pixels of `data` at `origin`.
    ///
    /// `data` is tightly packed in the upload layout described by `traits`.
    fn write_texture(
        &self,
        texture: &Self::Texture,
        origin: glam::UVec2,
        size: glam::UVec2,
        traits: &FormatTraits,
        data: &[u8],
    );
}

/// [`Backend`] for a wgpu device and queue.
#[derive(Clone, Copy)]
pub struct WgpuBackend<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
}

impl<'a> WgpuBackend<'a> {
    pub fn new(device: &'a wgpu::Device, queue: &'a wgpu::Queue) -> Self {
        Self { device, queue }
    }
}

impl Backend for WgpuBackend<'_> {
    type Texture = wgpu::Texture;

    fn max_texture_dimension(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }

    fn create_texture(&self, desc: &TextureDesc) -> wgpu::Texture {
        self.device.create_texture(&wgpu::TextureDescriptor {
            label: desc.label,
            size: wgpu::Extent3d {
                width: desc.size.x,
                height: desc.size.y,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: desc.format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        })
    }

    fn write_texture(
        &self,
        texture: &wgpu::Texture,
        origin: glam::UVec2,
        size: glam::UVec2,
        traits: &FormatTraits,
        data: &[u8],
    ) {
        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d {
                    x: origin.x,
                    y: origin.y,
                    z: 0,
                },
                aspect: wgpu::TextureAspect::All,
            },
            &traits.to_stored(data),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(size.x * traits.stored_bytes_per_pixel()),
                rows_per_image: None,
            },
            wgpu::Extent3d {
                width: size.x,
                height: size.y,
                depth_or_array_layers: 1,
            },
        );
    }
}
