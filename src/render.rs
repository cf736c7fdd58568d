use std::borrow::Cow;

use glam::Vec2;
use particle_network::{DrawList, Rgba};
use wgpu::{util::DeviceExt, BindGroupLayoutEntry};

/// Instance buffers grow in steps of this many entries.
const INSTANCE_CHUNK: usize = 256;

#[repr(C)]
#[derive(bytemuck::Pod, bytemuck::Zeroable, Clone, Copy)]
struct DiskInstance {
    center: Vec2,
    radius: f32,
    _pad: f32,
    color: Rgba,
}

#[repr(C)]
#[derive(bytemuck::Pod, bytemuck::Zeroable, Clone, Copy)]
struct LineInstance {
    from: Vec2,
    to: Vec2,
    color: Rgba,
    width: f32,
    _pad: [f32; 3],
}

const DISK_ATTRIBUTES: [wgpu::VertexAttribute; 3] = [
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x2,
        offset: 0,
        shader_location: 0,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32,
        offset: 8,
        shader_location: 1,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x4,
        offset: 16,
        shader_location: 2,
    },
];

const LINE_ATTRIBUTES: [wgpu::VertexAttribute; 4] = [
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x2,
        offset: 0,
        shader_location: 0,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x2,
        offset: 8,
        shader_location: 1,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x4,
        offset: 16,
        shader_location: 2,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32,
        offset: 32,
        shader_location: 3,
    },
];

/// A growable instance buffer and how much of it the current frame uses.
struct InstanceBuffer {
    buffer: wgpu::Buffer,
    capacity: usize,
    len: u32,
    stride: usize,
}

impl InstanceBuffer {
    fn new(device: &wgpu::Device, stride: usize) -> Self {
        Self {
            buffer: create_instance_buffer(device, stride, INSTANCE_CHUNK),
            capacity: INSTANCE_CHUNK,
            len: 0,
            stride,
        }
    }

    fn write<T: bytemuck::Pod>(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, data: &[T]) {
        if data.len() > self.capacity {
            self.capacity = padded_capacity(data.len());
            self.buffer = create_instance_buffer(device, self.stride, self.capacity);
        }
        if !data.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(data));
        }
        self.len = data.len() as u32;
    }
}

/// Rasterises a [`DrawList`]: instanced antialiased disks, then lines on top.
pub struct RenderModule {
    screen_size_buffer: wgpu::Buffer,
    quad_buffer: wgpu::Buffer,
    disks: InstanceBuffer,
    lines: InstanceBuffer,

    bind_group: wgpu::BindGroup,
    disk_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
}

impl RenderModule {
    pub fn new(device: &wgpu::Device, swapchain_format: wgpu::TextureFormat) -> Self {
        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("particle field"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!("render.wgsl"))),
        });

        let screen_size_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("screen size"),
            size: 4 * 4,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Two triangles covering [-1, 1]².
        let quad_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad"),
            contents: bytemuck::cast_slice(&[
                -1.0f32, -1.0, 1.0, -1.0, 1.0, 1.0, -1.0, -1.0, 1.0, 1.0, -1.0, 1.0,
            ]),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: None,
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: None,
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: screen_size_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("render"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let disk_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &shader_module,
            swapchain_format,
            ("vs_disk", "fs_disk"),
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<DiskInstance>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &DISK_ATTRIBUTES,
            },
        );
        let line_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &shader_module,
            swapchain_format,
            ("vs_line", "fs_line"),
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<LineInstance>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &LINE_ATTRIBUTES,
            },
        );

        Self {
            screen_size_buffer,
            quad_buffer,
            disks: InstanceBuffer::new(device, std::mem::size_of::<DiskInstance>()),
            lines: InstanceBuffer::new(device, std::mem::size_of::<LineInstance>()),

            bind_group,
            disk_pipeline,
            line_pipeline,
        }
    }

    pub fn update_size(&self, queue: &wgpu::Queue, width: u32, height: u32) {
        queue.write_buffer(
            &self.screen_size_buffer,
            0,
            bytemuck::bytes_of(&[width as f32, height as f32, 0.0, 0.0]),
        );
    }

    /// Copy the frame's draw calls into the instance buffers.
    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, list: &DrawList) {
        let disks: Vec<DiskInstance> = list
            .disks()
            .map(|(center, radius, color)| DiskInstance {
                center,
                radius,
                _pad: 0.0,
                color,
            })
            .collect();
        let lines: Vec<LineInstance> = list
            .lines()
            .map(|(from, to, width, color)| LineInstance {
                from,
                to,
                color,
                width,
                _pad: [0.0; 3],
            })
            .collect();

        self.disks.write(device, queue, &disks);
        self.lines.write(device, queue, &lines);
    }

    pub fn begin_pass<'a>(
        &'a self,
        encoder: &'a mut wgpu::CommandEncoder,
        view: &'a wgpu::TextureView,
        background: Rgba,
    ) -> wgpu::RenderPass<'a> {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: None,
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: background.r as f64,
                        g: background.g as f64,
                        b: background.b as f64,
                        a: background.a as f64,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(1, self.quad_buffer.slice(..));

        if self.disks.len > 0 {
            rpass.set_pipeline(&self.disk_pipeline);
            rpass.set_vertex_buffer(0, self.disks.buffer.slice(..));
            rpass.draw(0..6, 0..self.disks.len);
        }
        if self.lines.len > 0 {
            rpass.set_pipeline(&self.line_pipeline);
            rpass.set_vertex_buffer(0, self.lines.buffer.slice(..));
            rpass.draw(0..6, 0..self.lines.len);
        }

        rpass
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader_module: &wgpu::ShaderModule,
    swapchain_format: wgpu::TextureFormat,
    (vertex_entry, fragment_entry): (&str, &str),
    instance_layout: wgpu::VertexBufferLayout<'_>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(vertex_entry),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader_module,
            entry_point: vertex_entry,
            buffers: &[
                instance_layout,
                wgpu::VertexBufferLayout {
                    array_stride: 2 * 4,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![5 => Float32x2],
                },
            ],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader_module,
            entry_point: fragment_entry,
            targets: &[Some(wgpu::ColorTargetState {
                format: swapchain_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
    })
}

fn create_instance_buffer(device: &wgpu::Device, stride: usize, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: None,
        size: (stride * capacity) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Round up to the next multiple of [`INSTANCE_CHUNK`].
fn padded_capacity(len: usize) -> usize {
    let remainder = len % INSTANCE_CHUNK;
    if remainder == 0 {
        len
    } else {
        len + INSTANCE_CHUNK - remainder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_layouts_match_attribute_offsets() {
        assert_eq!(std::mem::size_of::<DiskInstance>(), 32);
        assert_eq!(std::mem::size_of::<LineInstance>(), 48);
    }

    #[test]
    fn capacity_rounds_up_to_chunks() {
        assert_eq!(padded_capacity(1), 256);
        assert_eq!(padded_capacity(256), 256);
        assert_eq!(padded_capacity(257), 512);
    }
}
