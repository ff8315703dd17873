use std::{sync::Arc, time::{Duration, Instant}};

use anyhow::Context;
use winit::{
	event::{Event, StartCause, WindowEvent},
	event_loop::{ControlFlow, EventLoop},
	window::{Window, WindowBuilder},
};

/*

lib.rs is the crate's front door.

The core (game, raycasting, projection, mapfile, config) is plain data in,
draw instructions out: no window, no GPU, no key codes.

Tilecast wraps the core in a window:
 - winit event loop with a fixed simulation tick
 - input: key state -> MoveIntent
 - rendering: Frame -> colored quads through wgpu

*/

pub mod config;
pub mod game;
pub mod input;
pub mod mapfile;
pub mod projection;
pub mod raycasting;
pub mod rendering;
mod webgpu;

pub use config::{Config, ConfigError};
pub use game::{player::{MoveIntent, Player}, Cell, GameWorld, Palette, TileMap, TileType, ViewMode};
pub use mapfile::{load_map, parse_map, MapDefinition, MapError};
pub use projection::{Projection, Strip};
pub use raycasting::RayHit;

pub struct Tilecast {
	event_loop: EventLoop<()>,
	window: Arc<Window>,
	webgpu: webgpu::WebGPU,
}

impl Tilecast {
	pub fn new(config: &Config) -> anyhow::Result<Self> {
		let event_loop = EventLoop::new().context("failed to create event loop")?;
		let window = Arc::new(WindowBuilder::new()
			.with_title("tilecast")
			.with_inner_size(winit::dpi::PhysicalSize::new(config.screen_width, config.screen_width))
			.build(&event_loop)
			.context("failed to create window")?);
		let webgpu = webgpu::WebGPU::new(window.clone())?;

		Ok(Self { event_loop, window, webgpu })
	}

	pub fn run(self, mut game_world: GameWorld) -> anyhow::Result<()> {
		let Self { event_loop, window, mut webgpu } = self;
		let mut input_state = input::InputState::default();
		let mut renderer = rendering::Renderer::new(&webgpu);

		let mut view_mode = ViewMode::default();
		let mut draw_grid = false;

		let process_tickrate = Duration::from_secs_f64(game_world.config().tick_rate.max(1.0).recip());
		let mut last_process_tick = Instant::now();
		let mut frame_count = 0u32;
		let mut last_fps_update = Instant::now();

		event_loop.run(
			move |event, elwt|
			match event
			{
				Event::WindowEvent { event, window_id } if window_id == window.id() =>
				match event
				{
					WindowEvent::KeyboardInput { event: winit::event::KeyEvent {
						physical_key: winit::keyboard::PhysicalKey::Code(keycode),
						state, repeat: false, ..
					}, .. } => input_state.set_key_state(keycode, state.is_pressed()),
					WindowEvent::RedrawRequested => {
						match renderer.render(&webgpu, &game_world, view_mode, draw_grid) {
							Ok(()) => frame_count += 1,
							Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
								log::warn!("surface lost, reconfiguring");
								webgpu.reconfigure();
							},
							Err(wgpu::SurfaceError::OutOfMemory) => {
								log::error!("out of GPU memory");
								elwt.exit();
							},
							Err(e) => log::warn!("skipped frame: {}", e)
						}
					},
					WindowEvent::CloseRequested => elwt.exit(),
					WindowEvent::Resized(physical_size) if physical_size.width > 0 && physical_size.height > 0
					=> webgpu.reconfigure_surface_size(physical_size.width, physical_size.height),
					_ => ()
				},
				Event::NewEvents(StartCause::Poll | StartCause::ResumeTimeReached { .. } | StartCause::WaitCancelled { .. }) =>
				{
					let last_process_time = Instant::now().duration_since(last_process_tick);
					if last_process_time >= process_tickrate {
						last_process_tick = Instant::now();

						if input_state.is_action_just_pressed(input::Action::Quit) {
							elwt.exit();
							return;
						}
						if input_state.is_action_just_pressed(input::Action::ToggleView) {
							view_mode = view_mode.toggled();
							log::debug!("view mode {:?}", view_mode);
						}
						if input_state.is_action_just_pressed(input::Action::ToggleGrid) {
							draw_grid = !draw_grid;
							log::debug!("debug grid {}", if draw_grid { "on" } else { "off" });
						}

						game_world.update(input_state.move_intent());

						let since_fps_update = last_fps_update.elapsed();
						if since_fps_update >= Duration::from_secs(1) {
							let fps = frame_count as f64 / since_fps_update.as_secs_f64();
							window.set_title(format!("tilecast ({:.2} fps)", fps).as_str());
							frame_count = 0;
							last_fps_update = Instant::now();
						}

						window.request_redraw();
					}
				},
				Event::AboutToWait =>
				{
					let last_process_time = Instant::now().duration_since(last_process_tick);
					if last_process_time >= process_tickrate {
						elwt.set_control_flow(ControlFlow::Poll);
					}
					else {
						elwt.set_control_flow(ControlFlow::WaitUntil(Instant::now() + process_tickrate.mul_f64(0.6).saturating_sub(last_process_time)));
					}
				},
				_ => ()
			}
		).context("event loop failed")
	}
}
