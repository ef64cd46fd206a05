use super::helpers::*;
use spectra_core::{GridVertex, ParamKey, Visualizer, GRID_WGSL};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct GridUniforms {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    time: f32,
    max_height: f32,
    wave_intensity: f32,
    color_intensity: f32,
    alpha_base: f32,
    alpha_multiplier: f32,
    cross_size: f32,
    cross_intensity: f32,
    cross_rotation_speed: f32,
    cross_wave_frequency: f32,
    grid_wave_speed: f32,
    grid_wave_frequency: f32,
    color_cycle_speed: f32,
    color_saturation: f32,
    depth_effect: f32,
    _pad: f32,
}

impl GridUniforms {
    fn from_visualizer(viz: &Visualizer) -> Self {
        let p = viz.params();
        Self {
            view_proj: viz.view_proj().to_cols_array_2d(),
            model: viz.grid().model_matrix().to_cols_array_2d(),
            time: viz.time(),
            max_height: p.get(ParamKey::MaxHeight),
            wave_intensity: p.get(ParamKey::WaveIntensity),
            color_intensity: p.get(ParamKey::ColorIntensity),
            alpha_base: p.get(ParamKey::AlphaBase),
            alpha_multiplier: p.get(ParamKey::AlphaMultiplier),
            cross_size: p.get(ParamKey::CrossSize),
            cross_intensity: p.get(ParamKey::CrossIntensity),
            cross_rotation_speed: p.get(ParamKey::CrossRotationSpeed),
            cross_wave_frequency: p.get(ParamKey::CrossWaveFrequency),
            grid_wave_speed: p.get(ParamKey::GridWaveSpeed),
            grid_wave_frequency: p.get(ParamKey::GridWaveFrequency),
            color_cycle_speed: p.get(ParamKey::ColorCycleSpeed),
            color_saturation: p.get(ParamKey::ColorSaturation),
            depth_effect: p.get(ParamKey::DepthEffect),
            _pad: 0.0,
        }
    }
}

/// Line-list grid displaced by the frequency field texture.
pub struct GridPipeline {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    sampler: wgpu::Sampler,
    field_texture: wgpu::Texture,
    field_side: u32,
    texels: Vec<u8>,
    vertex_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    vertex_count: u32,
}

impl GridPipeline {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("grid_shader"),
            source: wgpu::ShaderSource::Wgsl(GRID_WGSL.into()),
        });
        let uniform_buffer =
            create_uniform_buffer(device, "grid_uniforms", std::mem::size_of::<GridUniforms>());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("field_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("grid_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let (field_texture, field_view) =
            create_sampled_texture(device, "field_texture", 1, 1, wgpu::TextureFormat::R8Unorm);
        let bind_group = Self::make_bind_group(
            device,
            &bind_group_layout,
            &uniform_buffer,
            &field_view,
            &sampler,
        );
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("grid_pl"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });
        let vertex_buffers = [wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GridVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 0,
                shader_location: 0,
            }],
        }];
        let pipeline = make_pipeline(
            device,
            "grid_pipeline",
            &pipeline_layout,
            &shader,
            &vertex_buffers,
            wgpu::PrimitiveTopology::LineList,
            format,
            wgpu::BlendState::ALPHA_BLENDING,
        );
        let vertex_buffer =
            create_vertex_buffer(device, "grid_vb", 1, std::mem::size_of::<GridVertex>());
        Self {
            pipeline,
            bind_group_layout,
            bind_group,
            uniform_buffer,
            sampler,
            field_texture,
            field_side: 1,
            texels: vec![0],
            vertex_buffer,
            vertex_capacity: 1,
            vertex_count: 0,
        }
    }

    fn make_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        uniform_buffer: &wgpu::Buffer,
        field_view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("grid_bg"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(field_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    /// Upload uniforms, the frequency field and this frame's line vertices.
    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, viz: &Visualizer) {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&GridUniforms::from_visualizer(viz)),
        );

        let field = viz.field();
        let side = field.side() as u32;
        if side > 0 {
            if side != self.field_side {
                let (texture, view) = create_sampled_texture(
                    device,
                    "field_texture",
                    side,
                    side,
                    wgpu::TextureFormat::R8Unorm,
                );
                self.bind_group = Self::make_bind_group(
                    device,
                    &self.bind_group_layout,
                    &self.uniform_buffer,
                    &view,
                    &self.sampler,
                );
                self.field_texture = texture;
                self.field_side = side;
                log::debug!("field texture resized to {side}x{side}");
            }
            field.write_texels(&mut self.texels);
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &self.field_texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                &self.texels,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(side),
                    rows_per_image: Some(side),
                },
                wgpu::Extent3d {
                    width: side,
                    height: side,
                    depth_or_array_layers: 1,
                },
            );
        }

        let vertices = viz.grid().vertices();
        if vertices.len() > self.vertex_capacity {
            self.vertex_capacity = vertices.len();
            self.vertex_buffer = create_vertex_buffer(
                device,
                "grid_vb",
                self.vertex_capacity,
                std::mem::size_of::<GridVertex>(),
            );
        }
        queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
        self.vertex_count = vertices.len() as u32;
    }

    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        if self.vertex_count == 0 {
            return;
        }
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.draw(0..self.vertex_count, 0..1);
    }
}
