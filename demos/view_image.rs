//! Shows an image in a window, redrawing it every frame through the texture cache.
//!
//! Usage: `cargo run --example view_image -- [PATH] [--flip-x] [--flip-y]`

use std::sync::Arc;

use clap::Parser;
use texcache::{Flip, Renderer};
use wgpu::{
    Adapter, CreateSurfaceError, Device, DeviceDescriptor, PresentMode, Queue, Surface,
    SurfaceConfiguration,
};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{EventLoop, EventLoopProxy},
    window::Window,
};

enum UserEvent {
    Graphics(Graphics),
}

struct Graphics {
    window: Arc<Window>,
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,
    device: Device,
    adapter: Adapter,
    queue: Queue,
}

impl Graphics {
    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.surface_config.width = size.width.max(1);
        self.surface_config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.surface_config);
        self.window.request_redraw();
    }
}

struct Inner {
    renderer: Renderer,
    image: imgref::ImgVec<texcache::Color>,
    flip: Flip,
    frame: u32,
}

impl Inner {
    fn new(gfx: &Graphics, image: imgref::ImgVec<texcache::Color>, flip: Flip) -> Self {
        Self {
            renderer: Renderer::new(
                &gfx.device,
                gfx.surface.get_capabilities(&gfx.adapter).formats[0],
            ),
            image,
            flip,
            frame: 0,
        }
    }

    fn render(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, texture: &wgpu::Texture) {
        // Shrink and regrow the visible area so the cache has to deal with changing sizes.
        let t = (self.frame % 240) as f32 / 240.0;
        let scale = 0.5 + 0.5 * (t * std::f32::consts::TAU).cos().abs();
        let width = ((self.image.width() as f32 * scale) as usize).max(1);
        let height = ((self.image.height() as f32 * scale) as usize).max(1);
        let sub = self.image.sub_image(0, 0, width, height);

        self.renderer
            .prepare(device, queue, texture.size(), sub, self.flip)
            .unwrap();

        let mut encoder =
            device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &texture.create_view(&wgpu::TextureViewDescriptor::default()),
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                ..Default::default()
            });
            self.renderer.render(&mut rpass);
        }
        queue.submit(Some(encoder.finish()));

        self.frame += 1;
    }
}

struct Application {
    event_loop_proxy: EventLoopProxy<UserEvent>,
    gfx: Option<Graphics>,
    inner: Option<Inner>,
    image: Option<imgref::ImgVec<texcache::Color>>,
    flip: Flip,
}

async fn create_graphics(window: Arc<Window>) -> Result<Graphics, CreateSurfaceError> {
    let instance = wgpu::Instance::default();

    let surface = instance.create_surface(window.clone())?;
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            compatible_surface: Some(&surface),
            ..Default::default()
        })
        .await
        .expect("Failed to find an appropriate adapter");

    let (device, queue) = adapter
        .request_device(
            &DeviceDescriptor {
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                required_features: adapter.features()
                    & (wgpu::Features::FLOAT32_FILTERABLE
                        | wgpu::Features::TEXTURE_FORMAT_16BIT_NORM),
                ..Default::default()
            },
            None,
        )
        .await
        .expect("Failed to create device");

    let mut size = window.inner_size();
    size.width = size.width.max(1);
    size.height = size.height.max(1);

    let mut config = surface
        .get_default_config(&adapter, size.width, size.height)
        .unwrap();
    config.present_mode = PresentMode::AutoVsync;
    surface.configure(&device, &config);

    Ok(Graphics {
        window,
        surface,
        surface_config: config,
        adapter,
        device,
        queue,
    })
}

impl ApplicationHandler<UserEvent> for Application {
    fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        let window_attrs = Window::default_attributes().with_title("texcache: view_image");

        let window = event_loop
            .create_window(window_attrs)
            .expect("failed to create window");

        let event_loop_proxy = self.event_loop_proxy.clone();
        let fut = async move {
            assert!(event_loop_proxy
                .send_event(UserEvent::Graphics(
                    create_graphics(Arc::new(window))
                        .await
                        .expect("failed to create graphics context")
                ))
                .is_ok());
        };

        pollster::block_on(fut);
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::Resized(size) => {
                if let Some(gfx) = &mut self.gfx {
                    gfx.resize(size);
                }
            }
            WindowEvent::RedrawRequested => {
                let Some(gfx) = &mut self.gfx else {
                    return;
                };

                let Some(inner) = &mut self.inner else {
                    return;
                };

                let frame = gfx
                    .surface
                    .get_current_texture()
                    .expect("Failed to acquire next swap chain texture");
                inner.render(&gfx.device, &gfx.queue, &frame.texture);
                frame.present();

                gfx.window.request_redraw();
            }
            WindowEvent::CloseRequested => event_loop.exit(),
            _ => {}
        };
    }

    fn user_event(&mut self, _event_loop: &winit::event_loop::ActiveEventLoop, event: UserEvent) {
        match event {
            UserEvent::Graphics(mut gfx) => {
                gfx.resize(gfx.window.inner_size());
                let Some(image) = self.image.take() else {
                    return;
                };
                self.inner = Some(Inner::new(&gfx, image, self.flip));
                self.gfx = Some(gfx);
            }
        }
    }
}

fn gradient(width: usize, height: usize) -> imgref::ImgVec<texcache::Color> {
    let mut pixels = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            pixels.push(texcache::Color::new(
                (x * 255 / width) as u8,
                (y * 255 / height) as u8,
                0x80,
                0xff,
            ));
        }
    }
    imgref::ImgVec::new(pixels, width, height)
}

fn load(path: &str) -> imgref::ImgVec<texcache::Color> {
    let img = image::open(path)
        .unwrap_or_else(|e| panic!("failed to open {path}: {e}"))
        .to_rgba8();
    let (width, height) = (img.width() as usize, img.height() as usize);
    let pixels = img
        .pixels()
        .map(|p| texcache::Color::new(p[0], p[1], p[2], p[3]))
        .collect();
    imgref::ImgVec::new(pixels, width, height)
}

/// Shows an image in a window, redrawing it every frame through the texture cache.
#[derive(Parser, Debug)]
struct Args {
    /// Image to show. A generated gradient is shown if omitted.
    path: Option<String>,

    /// Mirror the image left-to-right.
    #[arg(long)]
    flip_x: bool,

    /// Mirror the image top-to-bottom.
    #[arg(long)]
    flip_y: bool,
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    let flip = Flip {
        horizontal: args.flip_x,
        vertical: args.flip_y,
    };
    let image = args.path.as_deref().map_or_else(|| gradient(640, 480), load);
    log::info!("showing {}x{} image", image.width(), image.height());

    let event_loop = EventLoop::with_user_event().build().unwrap();
    let mut app = Application {
        gfx: None,
        inner: None,
        image: Some(image),
        flip,
        event_loop_proxy: event_loop.create_proxy(),
    };
    event_loop.run_app(&mut app).unwrap();
}
