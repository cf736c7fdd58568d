mod cli;
mod framepace;
mod gpu;
mod headless;
#[cfg(feature = "overlay")]
mod overlay;
mod render;

use std::sync::Arc;

use clap::Parser;
use framepace::Framepacer;
use glam::Vec2;
use gpu::GpuContext;
use log::{error, info, warn};
#[cfg(feature = "overlay")]
use overlay::{Overlay, OverlayControls};
use particle_network::{
    theme::{FileThemeStore, Theme},
    seeded_rng, DrawList, FieldConfig, FrameBudget, FrameDriver, Schedule, Viewport,
};
use render::RenderModule;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    // Collect Arguments
    let args = cli::Args::parse();
    let config = args.field_config()?;
    let viewport = Viewport::from((args.width, args.height));

    if args.headless {
        return headless::run(config, viewport, args.seed, args.framerate, args.budget());
    }

    let mut theme_store = FileThemeStore::new(&args.theme_file);
    let theme = Theme::preferred(&theme_store);
    if let Err(e) = theme.save(&mut theme_store) {
        warn!("Failed to save theme preference: {e}");
    }

    // Setup Winit; each redraw schedules the next one, like a display-refresh callback.
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App {
        tokio_rt: tokio::runtime::Runtime::new()?,
        gfx: None,
        driver: None,
        surface: DrawList::new(),

        config,
        seed: args.seed,
        budget: args.budget(),
        initial_size: PhysicalSize::new(args.width, args.height),

        theme,
        theme_store,
        framepace: Framepacer::new(args.framerate),
        paused: false,
        mouse_position: Vec2::ZERO,
    };

    event_loop.run_app(&mut app)?;
    Ok(())
}

struct Graphics {
    window: Arc<Window>,
    gpu: GpuContext<'static>,
    render_module: RenderModule,
    #[cfg(feature = "overlay")]
    overlay: Overlay,
}

struct App {
    tokio_rt: tokio::runtime::Runtime,
    gfx: Option<Graphics>,
    driver: Option<FrameDriver>,
    surface: DrawList,

    config: FieldConfig,
    seed: Option<u64>,
    budget: FrameBudget,
    initial_size: PhysicalSize<u32>,

    theme: Theme,
    theme_store: FileThemeStore,
    framepace: Framepacer,
    paused: bool,
    mouse_position: Vec2,
}

impl App {
    fn create_graphics(&self, event_loop: &ActiveEventLoop) -> anyhow::Result<Graphics> {
        let attributes = Window::default_attributes()
            .with_title("Particle network")
            .with_inner_size(self.initial_size);
        let window = Arc::new(event_loop.create_window(attributes)?);
        let size = window.inner_size();

        let gpu = self.tokio_rt.block_on(GpuContext::new(window.clone()))?;
        let render_module = RenderModule::new(&gpu.device, gpu.config.format);
        render_module.update_size(&gpu.queue, gpu.config.width, gpu.config.height);

        #[cfg(feature = "overlay")]
        let overlay = Overlay::new(&gpu.device, gpu.config.format, size.width, size.height);

        info!(
            "Window {}x{} using {:?}",
            size.width, size.height, gpu.config.format
        );

        Ok(Graphics {
            window,
            gpu,
            render_module,
            #[cfg(feature = "overlay")]
            overlay,
        })
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(gfx), Some(driver)) = (self.gfx.as_mut(), self.driver.as_mut()) else {
            return;
        };

        self.framepace.begin_frame();

        let schedule = if self.paused {
            Schedule::Continue
        } else {
            driver.frame(&mut self.surface)
        };

        #[cfg(feature = "overlay")]
        {
            let mut controls = OverlayControls {
                paused: self.paused,
                self_links: driver.link_params_mut().self_pairs,
                toggle_theme: false,
            };
            gfx.overlay.show(
                driver.last_stats(),
                self.framepace.framerate(),
                self.theme,
                &mut controls,
            );

            self.paused = controls.paused;
            driver.link_params_mut().self_pairs = controls.self_links;
            if controls.toggle_theme {
                toggle_theme(&mut self.theme, &mut self.theme_store);
            }
        }

        let frame = match gfx.gpu.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gfx.gpu.reconfigure_surface();
                gfx.window.request_redraw();
                return;
            }
            Err(e) => {
                error!("Failed to acquire next frame: {e}");
                event_loop.exit();
                return;
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = gfx
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });

        gfx.render_module
            .upload(&gfx.gpu.device, &gfx.gpu.queue, &self.surface);

        #[cfg(feature = "overlay")]
        gfx.overlay.pre_render(
            &gfx.gpu.device,
            &gfx.gpu.queue,
            &mut encoder,
            self.framepace.frametime(),
        );

        // Render
        {
            #[allow(unused_mut)]
            let mut rpass =
                gfx.render_module
                    .begin_pass(&mut encoder, &view, self.theme.background());

            #[cfg(feature = "overlay")]
            gfx.overlay.render(&mut rpass);
        }

        gfx.gpu.queue.submit(Some(encoder.finish()));
        frame.present();
        self.framepace.end_frame();

        match schedule {
            Schedule::Continue => gfx.window.request_redraw(),
            Schedule::Stop => {
                info!("Stopping after {} frames", driver.frames());
                event_loop.exit();
            }
        }
    }
}

fn toggle_theme(theme: &mut Theme, store: &mut FileThemeStore) {
    *theme = theme.toggled();
    if let Err(e) = theme.save(store) {
        warn!("Failed to save theme preference: {e}");
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gfx.is_some() {
            return;
        }

        let gfx = match self.create_graphics(event_loop) {
            Ok(gfx) => gfx,
            Err(e) => {
                error!("Failed to set up graphics: {e:#}");
                event_loop.exit();
                return;
            }
        };

        let size = gfx.window.inner_size();
        let viewport = Viewport::from((size.width, size.height));
        let driver = match FrameDriver::start(
            Some(&self.surface),
            self.config.clone(),
            viewport,
            seeded_rng(self.seed),
        ) {
            Ok(Some(driver)) => driver.with_budget(self.budget),
            Ok(None) => {
                event_loop.exit();
                return;
            }
            Err(e) => {
                error!("Failed to start particle field: {e}");
                event_loop.exit();
                return;
            }
        };
        info!("Particle field started with {} particles", driver.store().len());

        gfx.window.request_redraw();
        self.gfx = Some(gfx);
        self.driver = Some(driver);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(gfx) = self.gfx.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if gfx.gpu.resize(new_size.width, new_size.height) {
                    gfx.render_module
                        .update_size(&gfx.gpu.queue, new_size.width, new_size.height);
                    #[cfg(feature = "overlay")]
                    gfx.overlay.resize(new_size.width, new_size.height);
                }

                if let Some(driver) = self.driver.as_mut() {
                    driver.resize(Viewport::from((new_size.width, new_size.height)));
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                match event.physical_key {
                    PhysicalKey::Code(KeyCode::Space) => self.paused = !self.paused,
                    PhysicalKey::Code(KeyCode::KeyT) => {
                        toggle_theme(&mut self.theme, &mut self.theme_store);
                    }
                    PhysicalKey::Code(KeyCode::Escape) => event_loop.exit(),
                    _ => (),
                }
            }

            #[cfg(feature = "overlay")]
            WindowEvent::ModifiersChanged(modifiers) => {
                gfx.overlay.modifiers_event(modifiers);
            }
            #[cfg(feature = "overlay")]
            WindowEvent::MouseInput { state, button, .. } => {
                gfx.overlay.mouse_event(self.mouse_position, state, button);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse_position = Vec2::new(position.x as f32, position.y as f32);
                #[cfg(feature = "overlay")]
                gfx.overlay.mouse_motion(self.mouse_position);
            }

            _ => (),
        }
    }
}
