use super::helpers::*;
use spectra_core::{ParamKey, ParticleInstance, Visualizer, PARTICLES_WGSL};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ParticleUniforms {
    view_proj: [[f32; 4]; 4],
    time: f32,
    bass_intensity: f32,
    speed: f32,
    pulse_intensity: f32,
    alpha: f32,
    _pad: f32,
    resolution: [f32; 2],
}

/// Instanced camera-facing quads, one per particle, blended additively.
pub struct ParticlePipeline {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    quad_vb: wgpu::Buffer,
    instance_vb: wgpu::Buffer,
    instance_capacity: usize,
    instance_count: u32,
    uploaded_generation: Option<u64>,
}

impl ParticlePipeline {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("particle_shader"),
            source: wgpu::ShaderSource::Wgsl(PARTICLES_WGSL.into()),
        });
        let uniform_buffer = create_uniform_buffer(
            device,
            "particle_uniforms",
            std::mem::size_of::<ParticleUniforms>(),
        );
        // Quad vertices for two triangles
        let quad_vertices: [f32; 12] = [
            -0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5, -0.5, 0.5,
        ];
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("particle_quad_vb"),
            contents: bytemuck::cast_slice(&quad_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let instance_vb = create_vertex_buffer(
            device,
            "particle_instance_vb",
            1,
            std::mem::size_of::<ParticleInstance>(),
        );
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("particle_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("particle_bg"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("particle_pl"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });
        let vertex_buffers = [
            // slot 0: quad corners
            wgpu::VertexBufferLayout {
                array_stride: (std::mem::size_of::<f32>() * 2) as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 0,
                }],
            },
            // slot 1: per-particle data
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<ParticleInstance>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: 0,
                        shader_location: 1,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32,
                        offset: 12,
                        shader_location: 2,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x2,
                        offset: 16,
                        shader_location: 3,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: 24,
                        shader_location: 4,
                    },
                ],
            },
        ];
        let pipeline = make_pipeline(
            device,
            "particle_pipeline",
            &pipeline_layout,
            &shader,
            &vertex_buffers,
            wgpu::PrimitiveTopology::TriangleList,
            format,
            ADDITIVE_BLENDING,
        );
        Self {
            pipeline,
            bind_group,
            uniform_buffer,
            quad_vb,
            instance_vb,
            instance_capacity: 1,
            instance_count: 0,
            uploaded_generation: None,
        }
    }

    /// Upload uniforms every frame; instances only after a regeneration.
    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, viz: &Visualizer) {
        let p = viz.params();
        let viewport = viz.viewport();
        let uniforms = ParticleUniforms {
            view_proj: viz.view_proj().to_cols_array_2d(),
            time: viz.time(),
            bass_intensity: viz.bass_intensity(),
            speed: p.get(ParamKey::ParticleSpeed),
            pulse_intensity: p.get(ParamKey::ParticlePulseIntensity),
            alpha: p.get(ParamKey::ParticleAlpha),
            _pad: 0.0,
            resolution: [viewport.width as f32, viewport.height as f32],
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let field = viz.particles();
        if self.uploaded_generation == Some(field.generation()) {
            return;
        }
        let instances = field.instances();
        if instances.len() > self.instance_capacity {
            self.instance_capacity = instances.len();
            self.instance_vb = create_vertex_buffer(
                device,
                "particle_instance_vb",
                self.instance_capacity,
                std::mem::size_of::<ParticleInstance>(),
            );
        }
        queue.write_buffer(&self.instance_vb, 0, bytemuck::cast_slice(instances));
        self.instance_count = instances.len() as u32;
        self.uploaded_generation = Some(field.generation());
        log::debug!("uploaded {} particle instances", self.instance_count);
    }

    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        if self.instance_count == 0 {
            return;
        }
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
        rpass.set_vertex_buffer(1, self.instance_vb.slice(..));
        rpass.draw(0..6, 0..self.instance_count);
    }
}
