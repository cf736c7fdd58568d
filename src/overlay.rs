//! egui stats panel drawn over the field.

use glam::Vec2;
use particle_network::{FrameStats, Theme};

/// Knobs the panel may flip; the app applies them after the frame.
pub struct OverlayControls {
    pub paused: bool,
    pub self_links: bool,
    pub toggle_theme: bool,
}

pub struct Overlay {
    ctx: egui::Context,
    raw_input: egui::RawInput,
    modifiers: egui::Modifiers,

    renderer: egui_wgpu::Renderer,
    clipped_shapes: Vec<egui::ClippedPrimitive>,
    textures_delta: egui::TexturesDelta,
}

impl Overlay {
    pub fn new(
        device: &wgpu::Device,
        swapchain_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let renderer = egui_wgpu::Renderer::new(device, swapchain_format, None, 1);

        let mut overlay = Self {
            ctx: egui::Context::default(),
            raw_input: egui::RawInput::default(),
            modifiers: Default::default(),

            renderer,
            clipped_shapes: Vec::new(),
            textures_delta: egui::TexturesDelta::default(),
        };
        overlay.resize(width, height);
        overlay
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.raw_input.screen_rect = Some(egui::Rect::from_min_size(
            Default::default(),
            egui::Vec2::new(width as f32, height as f32),
        ));
    }

    pub fn show(
        &mut self,
        stats: FrameStats,
        fps: f32,
        theme: Theme,
        controls: &mut OverlayControls,
    ) {
        let raw_input = std::mem::take(&mut self.raw_input);
        self.ctx.begin_frame(raw_input);

        egui::Window::new("Particle field")
            .default_width(160.0)
            .show(&self.ctx, |ui| {
                ui.label(format!("FPS {fps:.1}"));
                ui.label(format!("Frame {}", stats.frame));
                ui.label(format!("Particles {}", stats.particles));
                ui.label(format!("Links {}", stats.links));
                ui.separator();
                ui.checkbox(&mut controls.paused, "Paused [Space]");
                ui.checkbox(&mut controls.self_links, "Self links");
                if ui.button(format!("Theme: {theme} [T]")).clicked() {
                    controls.toggle_theme = true;
                }
            });

        let output = self.ctx.end_frame();
        self.clipped_shapes = self.ctx.tessellate(output.shapes, output.pixels_per_point);
        self.textures_delta = output.textures_delta;
    }

    fn screen_descriptor(&self) -> egui_wgpu::ScreenDescriptor {
        let screen_rect = self.ctx.screen_rect();
        egui_wgpu::ScreenDescriptor {
            size_in_pixels: [screen_rect.width() as u32, screen_rect.height() as u32],
            pixels_per_point: self.ctx.pixels_per_point(),
        }
    }

    pub fn pre_render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        delta_time: f32,
    ) {
        self.raw_input.predicted_dt = delta_time;

        let screen_descriptor = self.screen_descriptor();
        self.renderer.update_buffers(
            device,
            queue,
            encoder,
            &self.clipped_shapes,
            &screen_descriptor,
        );

        for (id, delta) in &self.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }

        for id in &self.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }

    pub fn render<'a>(&'a mut self, rpass: &mut wgpu::RenderPass<'a>) {
        let screen_descriptor = self.screen_descriptor();
        self.renderer
            .render(rpass, &self.clipped_shapes, &screen_descriptor);
    }

    pub fn modifiers_event(&mut self, event: winit::event::Modifiers) {
        let state = event.state();
        self.modifiers.alt = state.alt_key();
        self.modifiers.ctrl = state.control_key();
        self.modifiers.shift = state.shift_key();
        self.modifiers.mac_cmd = state.super_key();
        self.modifiers.command = state.control_key() | state.super_key();
    }

    pub fn mouse_event(
        &mut self,
        position: Vec2,
        state: winit::event::ElementState,
        button: winit::event::MouseButton,
    ) {
        let pressed = matches!(state, winit::event::ElementState::Pressed);
        let button = match button {
            winit::event::MouseButton::Left => egui::PointerButton::Primary,
            winit::event::MouseButton::Right => egui::PointerButton::Secondary,
            winit::event::MouseButton::Middle => egui::PointerButton::Middle,
            _ => return,
        };

        self.raw_input.events.push(egui::Event::PointerButton {
            pos: egui::Pos2::new(position.x, position.y),
            button,
            pressed,
            modifiers: self.modifiers,
        });
    }

    pub fn mouse_motion(&mut self, position: Vec2) {
        self.raw_input
            .events
            .push(egui::Event::PointerMoved(egui::Pos2::new(
                position.x, position.y,
            )));
    }
}
