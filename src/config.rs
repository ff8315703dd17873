//! Session-wide constants, loadable from a RON file.

use std::path::Path;

use serde::Deserialize;

#[derive(Debug)]
pub enum ConfigError {
	Io(std::io::Error),
	Parse(ron::error::SpannedError),
	/// A field that must be positive was not.
	NotPositive { field: &'static str, value: f64 }
}

impl From<std::io::Error> for ConfigError {
	fn from(e: std::io::Error) -> Self {
		ConfigError::Io(e)
	}
}

impl From<ron::error::SpannedError> for ConfigError {
	fn from(e: ron::error::SpannedError) -> Self {
		ConfigError::Parse(e)
	}
}

impl std::fmt::Display for ConfigError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ConfigError::Io(e) => write!(f, "config IO error: {}", e),
			ConfigError::Parse(e) => write!(f, "config parse error: {}", e),
			ConfigError::NotPositive { field, value } => write!(f, "config field {} must be positive, got {}", field, value)
		}
	}
}

impl std::error::Error for ConfigError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			ConfigError::Io(e) => Some(e),
			ConfigError::Parse(e) => Some(e),
			ConfigError::NotPositive { .. } => None
		}
	}
}

/// Immutable settings handed to a `GameWorld` at construction.
///
/// Lengths marked "cells" are multiplied by the map's wall width so the
/// behaviour does not depend on the grid resolution. Colors are 0..=255.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
	/// Side of the square window, in pixels.
	pub screen_width: u32,
	/// Total angular width of the ray fan, degrees.
	pub fov: f32,
	pub ray_count: u32,
	/// Player bounding box side, cells.
	pub player_width: f32,
	/// Distance travelled per tick, cells.
	pub movement_speed: f32,
	/// Degrees turned per tick.
	pub angle_speed: f32,
	pub fine_turn_divisor: f32,
	/// Darkening applied per cell of distance.
	pub shade_per_cell: f32,
	/// Simulation ticks per second.
	pub tick_rate: f64,
	pub facing_line_width: f32,
	pub background_color: [u8; 3],
	pub ceiling_color: [u8; 3],
	pub floor_color: [u8; 3],
	pub player_color: [u8; 3],
	pub facing_line_color: [u8; 3],
	pub grid_color: [u8; 3],
	pub ray_color: [u8; 3]
}

impl Default for Config {
	fn default() -> Self {
		Self {
			screen_width: 800,
			fov: 60.0,
			ray_count: 400,
			player_width: 0.25,
			movement_speed: 0.05,
			angle_speed: 3.0,
			fine_turn_divisor: 4.0,
			shade_per_cell: 30.0,
			tick_rate: 60.0,
			facing_line_width: 5.0,
			background_color: [30, 30, 30],
			ceiling_color: [90, 90, 110],
			floor_color: [60, 50, 40],
			player_color: [200, 40, 40],
			facing_line_color: [0, 0, 0],
			grid_color: [70, 70, 70],
			ray_color: [240, 240, 0]
		}
	}
}

impl Config {
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
		let contents = std::fs::read_to_string(path.as_ref())?;
		let config = Self::from_ron(&contents)?;
		log::info!("loaded config from {}", path.as_ref().display());
		Ok(config)
	}

	pub fn from_ron(s: &str) -> Result<Self, ConfigError> {
		let config: Self = ron::from_str(s)?;
		config.validate()?;
		Ok(config)
	}

	/// Rejects values that end up as divisors.
	pub fn validate(&self) -> Result<(), ConfigError> {
		let divisors = [
			("screen_width", self.screen_width as f64),
			("fov", self.fov as f64),
			("fine_turn_divisor", self.fine_turn_divisor as f64)
		];
		for (field, value) in divisors {
			// written so that NaN fails too
			if !(value > 0.0) {
				return Err(ConfigError::NotPositive { field, value });
			}
		}
		Ok(())
	}

	/// Width of one 3D strip so that the fan covers the whole screen.
	pub fn line_width(&self) -> f32 {
		if self.ray_count == 0 {
			return 0.0;
		}
		(self.screen_width as f32 / self.ray_count as f32).ceil()
	}

	pub fn wall_width_for(&self, grid_width: u32) -> f32 {
		(self.screen_width / grid_width.max(1)) as f32
	}
}

#[test]
fn partial_ron_keeps_defaults() {
	let config = Config::from_ron("(fov: 90.0, ray_count: 10)").unwrap();
	assert_eq!(config.fov, 90.0);
	assert_eq!(config.ray_count, 10);
	assert_eq!(config.screen_width, Config::default().screen_width);
	assert_eq!(config.line_width(), 80.0);
}

#[test]
fn malformed_ron_is_a_parse_error() {
	assert!(matches!(Config::from_ron("(fov: \"wide\")"), Err(ConfigError::Parse(_))));
}

#[test]
fn zero_divisors_are_rejected() {
	assert!(matches!(Config::from_ron("(fov: 0.0)"), Err(ConfigError::NotPositive { field: "fov", .. })));
	assert!(matches!(Config::from_ron("(fine_turn_divisor: 0.0)"), Err(ConfigError::NotPositive { field: "fine_turn_divisor", .. })));
	assert!(matches!(Config::from_ron("(screen_width: 0)"), Err(ConfigError::NotPositive { field: "screen_width", .. })));
	assert!(Config::default().validate().is_ok());
}

#[test]
fn wall_width_uses_integer_division() {
	let config = Config::default();
	assert_eq!(config.wall_width_for(3), 266.0);
	assert_eq!(config.wall_width_for(8), 100.0);
}
