//! Draws a `Frame` as solid colored quads.
//!
//! Every shape the game needs (strips, cells, boxes, lines) is one instance
//! of a unit quad that is scaled, rotated about its origin and placed in
//! screen pixels.

use crate::{
	game::{Frame, GameWorld, ViewMode},
	webgpu::WebGPU
};

#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
	corner: glam::Vec2
}

const QUAD_VERTICES: [Vertex; 4] = [
	Vertex { corner: glam::vec2(0.0, 0.0) },
	Vertex { corner: glam::vec2(1.0, 0.0) },
	Vertex { corner: glam::vec2(0.0, 1.0) },
	Vertex { corner: glam::vec2(1.0, 1.0) }
];

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadInstance {
	pub origin: glam::Vec2,
	pub size: glam::Vec2,
	/// 0..=255 per channel.
	pub color: glam::Vec3,
	/// Rotation about `origin`, radians.
	pub angle: f32
}

impl QuadInstance {
	const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
		1 => Float32x2, 2 => Float32x2, 3 => Float32x3, 4 => Float32
	];

	pub fn rect(origin: glam::Vec2, size: glam::Vec2, color: glam::Vec3) -> Self {
		Self { origin, size, color, angle: 0.0 }
	}

	/// A line segment `width` pixels thick, centered on `start..end`.
	pub fn line(start: glam::Vec2, end: glam::Vec2, width: f32, color: glam::Vec3) -> Self {
		let delta = end - start;
		let dir = delta.try_normalize().unwrap_or(glam::Vec2::X);
		Self {
			origin: start - dir.perp() * width / 2.0,
			size: glam::vec2(delta.length(), width),
			color,
			angle: dir.to_angle()
		}
	}
}

#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct ScreenInfo {
	size: glam::Vec2,
	/// 1.0 when the surface encodes sRGB itself.
	linear_output: f32,
	_padding: f32
}

fn rgb(color: [u8; 3]) -> glam::Vec3 {
	glam::Vec3::from_array(color.map(f32::from))
}

/// Converts one frame of the game into quads, back to front.
pub fn build_instances(game_world: &GameWorld, mode: ViewMode, draw_grid: bool) -> Vec<QuadInstance> {
	let config = game_world.config();
	let screen = config.screen_width as f32;
	let mut instances = Vec::new();

	match game_world.frame(mode, draw_grid) {
		Frame::FirstPerson(strips) => {
			instances.push(QuadInstance::rect(glam::Vec2::ZERO, glam::vec2(screen, screen / 2.0), rgb(config.ceiling_color)));
			instances.push(QuadInstance::rect(glam::vec2(0.0, screen / 2.0), glam::vec2(screen, screen / 2.0), rgb(config.floor_color)));

			let line_width = config.line_width();
			instances.extend(strips.iter().map(|strip| QuadInstance::rect(
				glam::vec2(strip.x - line_width / 2.0, strip.top(screen)),
				glam::vec2(line_width, strip.height),
				strip.color
			)));
		},
		Frame::TopDown(view) => {
			let ray_color = rgb(config.ray_color);
			instances.extend(view.rays.iter().map(|&(start, end)| QuadInstance::line(start, end, 2.0, ray_color)));

			instances.extend(view.walls.iter().map(|cell| QuadInstance::rect(cell.rect.min(), cell.rect.size(), rgb(cell.color))));

			let grid_color = rgb(config.grid_color);
			instances.extend(view.grid_lines.iter().map(|&(start, end)| QuadInstance::line(start, end, 1.0, grid_color)));

			instances.push(QuadInstance::rect(view.player_box.min(), view.player_box.size(), rgb(config.player_color)));
			let (start, end) = view.facing_line;
			instances.push(QuadInstance::line(start, end, config.facing_line_width, rgb(config.facing_line_color)));
		}
	}

	instances
}

const SHADER_SOURCE: &str = "
struct ScreenInfo {
	size: vec2<f32>,
	linear_output: f32,
	_padding: f32
}

@group(0) @binding(0)
var<uniform> screen: ScreenInfo;

struct VertexInput {
	@location(0) corner: vec2<f32>
}

struct InstanceInput {
	@location(1) origin: vec2<f32>,
	@location(2) size: vec2<f32>,
	@location(3) color: vec3<f32>,
	@location(4) angle: f32
}

struct VertexOutput {
	@builtin(position) clip_position: vec4<f32>,
	@location(0) color: vec3<f32>
}

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
	let local = vertex.corner * instance.size;
	let c = cos(instance.angle);
	let s = sin(instance.angle);
	let pixel = instance.origin + vec2<f32>(local.x * c - local.y * s, local.x * s + local.y * c);
	let ndc = vec2<f32>(pixel.x / screen.size.x * 2.0 - 1.0, 1.0 - pixel.y / screen.size.y * 2.0);

	var out: VertexOutput;
	out.clip_position = vec4<f32>(ndc, 0.0, 1.0);
	let color = instance.color / 255.0;
	out.color = select(color, pow(color, vec3<f32>(2.2)), screen.linear_output > 0.5);
	return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
	return vec4<f32>(in.color, 1.0);
}
";

pub struct Renderer {
	vb: wgpu::Buffer,
	instb: wgpu::Buffer,
	instb_capacity: u64,
	screen_info_ub: wgpu::Buffer,
	bind_group: wgpu::BindGroup,
	pipeline: wgpu::RenderPipeline
}

impl Renderer {
	const INITIAL_INSTANCE_CAPACITY: u64 = 1024;

	pub fn new(webgpu: &WebGPU) -> Self {
		let (device, queue) = webgpu.get_device();

		let vb = device.create_buffer(&wgpu::BufferDescriptor {
			label: Some("Renderer::vb"),
			size: std::mem::size_of_val(&QUAD_VERTICES) as u64,
			usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
			mapped_at_creation: false
		});
		queue.write_buffer(&vb, 0, bytemuck::cast_slice(&QUAD_VERTICES));

		let instb = Self::create_instance_buffer(device, Self::INITIAL_INSTANCE_CAPACITY);

		let screen_info_ub = device.create_buffer(&wgpu::BufferDescriptor {
			label: Some("Renderer::screen_info_ub"),
			size: std::mem::size_of::<ScreenInfo>() as u64,
			usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
			mapped_at_creation: false
		});

		let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
			label: Some("Renderer bind group layout: screen info"),
			entries: &[
				wgpu::BindGroupLayoutEntry {
					binding: 0,
					visibility: wgpu::ShaderStages::VERTEX,
					ty: wgpu::BindingType::Buffer {
						ty: wgpu::BufferBindingType::Uniform,
						has_dynamic_offset: false,
						min_binding_size: None
					},
					count: None
				}
			]
		});

		let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
			label: Some("Renderer::bind_group"),
			layout: &bind_group_layout,
			entries: &[
				wgpu::BindGroupEntry {
					binding: 0,
					resource: screen_info_ub.as_entire_binding()
				}
			]
		});

		let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
			label: Some("Renderer shader module"),
			source: wgpu::ShaderSource::Wgsl(SHADER_SOURCE.into())
		});

		let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
			label: Some("Renderer pipeline layout"),
			bind_group_layouts: &[&bind_group_layout],
			push_constant_ranges: &[]
		});

		let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
			label: Some("Renderer::pipeline"),
			layout: Some(&pipeline_layout),
			vertex: wgpu::VertexState {
				module: &shader,
				entry_point: "vs_main",
				buffers: &[
					wgpu::VertexBufferLayout {
						array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
						step_mode: wgpu::VertexStepMode::Vertex,
						attributes: &wgpu::vertex_attr_array![0 => Float32x2]
					},
					wgpu::VertexBufferLayout {
						array_stride: std::mem::size_of::<QuadInstance>() as wgpu::BufferAddress,
						step_mode: wgpu::VertexStepMode::Instance,
						attributes: &QuadInstance::ATTRIBUTES
					}
				],
				compilation_options: wgpu::PipelineCompilationOptions::default()
			},
			primitive: wgpu::PrimitiveState {
				topology: wgpu::PrimitiveTopology::TriangleStrip,
				strip_index_format: None,
				front_face: wgpu::FrontFace::Ccw,
				cull_mode: None,
				unclipped_depth: false,
				polygon_mode: wgpu::PolygonMode::Fill,
				conservative: false
			},
			depth_stencil: None,
			multisample: wgpu::MultisampleState::default(),
			fragment: Some(wgpu::FragmentState {
				module: &shader,
				entry_point: "fs_main",
				targets: &[Some(wgpu::ColorTargetState {
					format: webgpu.get_config().format,
					blend: Some(wgpu::BlendState::REPLACE),
					write_mask: wgpu::ColorWrites::ALL
				})],
				compilation_options: wgpu::PipelineCompilationOptions::default()
			}),
			multiview: None,
			cache: None
		});

		Self { vb, instb, instb_capacity: Self::INITIAL_INSTANCE_CAPACITY, screen_info_ub, bind_group, pipeline }
	}

	fn create_instance_buffer(device: &wgpu::Device, capacity: u64) -> wgpu::Buffer {
		device.create_buffer(&wgpu::BufferDescriptor {
			label: Some(format!("Renderer::instb with capacity:{}", capacity).as_str()),
			size: std::mem::size_of::<QuadInstance>() as u64 * capacity,
			usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
			mapped_at_creation: false
		})
	}

	pub fn render(&mut self, webgpu: &WebGPU, game_world: &GameWorld, mode: ViewMode, draw_grid: bool) -> Result<(), wgpu::SurfaceError> {
		let config = game_world.config();
		let instances = build_instances(game_world, mode, draw_grid);
		let (device, queue) = webgpu.get_device();

		if instances.len() as u64 > self.instb_capacity {
			self.instb_capacity = (instances.len() as u64).next_power_of_two();
			self.instb = Self::create_instance_buffer(device, self.instb_capacity);
			log::debug!("grew quad instance buffer to {}", self.instb_capacity);
		}

		let linear_output = webgpu.get_config().format.is_srgb();
		let screen_info = ScreenInfo {
			size: glam::Vec2::splat(config.screen_width as f32),
			linear_output: if linear_output { 1.0 } else { 0.0 },
			_padding: 0.0
		};
		queue.write_buffer(&self.screen_info_ub, 0, bytemuck::cast_slice(&[screen_info]));
		queue.write_buffer(&self.instb, 0, bytemuck::cast_slice(instances.as_slice()));

		let output = webgpu.get_surface().get_current_texture()?;
		let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

		let background = rgb(config.background_color) / 255.0;
		let background = if linear_output { background.powf(2.2) } else { background };

		let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor::default());
		let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
			label: Some("Renderer::render() clear color"),
			color_attachments: &[Some(wgpu::RenderPassColorAttachment {
				view: &view,
				resolve_target: None,
				ops: wgpu::Operations {
					load: wgpu::LoadOp::Clear(wgpu::Color {
						r: background.x as f64, g: background.y as f64, b: background.z as f64, a: 1.0
					}),
					store: wgpu::StoreOp::Store
				}
			})],
			..Default::default()
		});

		render_pass.set_pipeline(&self.pipeline);
		render_pass.set_bind_group(0, &self.bind_group, &[]);
		render_pass.set_vertex_buffer(0, self.vb.slice(..));
		render_pass.set_vertex_buffer(1, self.instb.slice(..));
		render_pass.draw(0..4, 0..instances.len() as u32);

		drop(render_pass);
		queue.submit(Some(encoder.finish()));
		output.present();
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn first_person_is_ceiling_floor_and_strips() {
		let game_world = crate::game::test_gameworld();
		let instances = build_instances(&game_world, ViewMode::FirstPerson, false);
		assert_eq!(instances.len(), 2 + game_world.strips().len());
		assert_eq!(instances[0].origin, glam::Vec2::ZERO);
		assert_eq!(instances[1].origin.y, game_world.config().screen_width as f32 / 2.0);
	}

	#[test]
	fn top_down_draws_rays_walls_grid_and_player() {
		let game_world = crate::game::test_gameworld();
		let view = game_world.debug_view(true);
		let expected = view.rays.len() + view.walls.len() + view.grid_lines.len() + 2;
		let instances = build_instances(&game_world, ViewMode::TopDown, true);
		assert_eq!(instances.len(), expected);
		let player = &instances[instances.len() - 2];
		assert_eq!(player.origin, view.player_box.min());
	}

	#[test]
	fn line_quad_is_centered_on_segment() {
		let line = QuadInstance::line(glam::vec2(10.0, 10.0), glam::vec2(10.0, 30.0), 4.0, glam::Vec3::ONE);
		assert!((line.angle - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
		assert_eq!(line.size, glam::vec2(20.0, 4.0));
		assert!((line.origin - glam::vec2(12.0, 10.0)).length() < 1e-5);
	}
}
