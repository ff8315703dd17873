use std::path::Path;

use crate::{
	config::Config,
	mapfile::{self, MapDefinition, MapError},
	projection::{self, Projection, Strip},
	raycasting::{self, RayHit}
};

pub mod collision;
pub mod player;

use collision::AABB;
use player::{MoveIntent, Player};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TileType { Empty, Wall(u32) }

impl TileType {
	pub fn from_value(value: u32) -> Self {
		match value {
			0 => TileType::Empty,
			v => TileType::Wall(v)
		}
	}

	pub fn value(&self) -> u32 {
		match self {
			TileType::Empty => 0,
			TileType::Wall(v) => *v
		}
	}
}

/// Wall colors; entry `i` belongs to wall type `i + 1`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Palette {
	colors: Vec<[u8; 3]>
}

impl Palette {
	pub fn new(colors: Vec<[u8; 3]>) -> Self {
		Self { colors }
	}

	pub fn len(&self) -> usize {
		self.colors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.colors.is_empty()
	}

	pub fn color_of(&self, value: u32) -> Option<[u8; 3]> {
		let index = value.checked_sub(1)? as usize;
		self.colors.get(index).copied()
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
	pub row: u32,
	pub col: u32,
	pub rect: AABB,
	pub tile: TileType,
	/// Palette color, black for empty cells.
	pub color: [u8; 3]
}

impl Cell {
	pub fn value(&self) -> u32 {
		self.tile.value()
	}

	pub fn is_wall(&self) -> bool {
		matches!(self.tile, TileType::Wall(_))
	}
}

/// Square grid of cells, row-major. Immutable once built.
#[derive(Clone, Debug)]
pub struct TileMap {
	cells: Vec<Cell>,
	width: u32,
	wall_width: f32
}

/// Checks that `rows` form a square grid whose wall types exist in a
/// palette of `palette_len` entries. `first_line` is the file line of the
/// first row, when the grid came from a file.
pub fn validate_rows(rows: &[Vec<u32>], palette_len: usize, first_line: Option<usize>) -> Result<(), MapError> {
	if rows.is_empty() {
		return Err(MapError::EmptyGrid);
	}
	let expected = rows.len();
	for (row, values) in rows.iter().enumerate() {
		let line = first_line.map(|first| first + row);
		if values.len() != expected {
			return Err(MapError::RowLength { line, row, expected, found: values.len() });
		}
		if let Some((col, &value)) = values.iter().enumerate().find(|(_, value)| **value as usize > palette_len) {
			return Err(MapError::WallType { line, row, col, value, palette_len });
		}
	}
	Ok(())
}

impl TileMap {
	pub fn from_rows(rows: &[Vec<u32>], palette: &Palette, wall_width: f32) -> Result<Self, MapError> {
		validate_rows(rows, palette.len(), None)?;

		let width = rows.len() as u32;
		let cells = rows.iter().enumerate().flat_map(|(row, values)|
			values.iter().enumerate().map(move |(col, &value)| (row as u32, col as u32, value))
		).map(|(row, col, value)| Cell {
			row, col,
			rect: AABB::from_rect(glam::vec2(col as f32, row as f32) * wall_width, wall_width, wall_width),
			tile: TileType::from_value(value),
			color: palette.color_of(value).unwrap_or([0, 0, 0])
		}).collect();

		Ok(Self { cells, width, wall_width })
	}

	/// Cells per side.
	pub fn width(&self) -> u32 {
		self.width
	}

	/// Pixels per cell.
	pub fn wall_width(&self) -> f32 {
		self.wall_width
	}

	/// Pixels per map side.
	pub fn extent(&self) -> f32 {
		self.width as f32 * self.wall_width
	}

	pub fn cells(&self) -> &[Cell] {
		&self.cells
	}

	pub fn walls(&self) -> impl Iterator<Item = &Cell> {
		self.cells.iter().filter(|cell| cell.is_wall())
	}

	pub fn cell_at(&self, row: u32, col: u32) -> Option<&Cell> {
		if row >= self.width || col >= self.width {
			return None;
		}
		self.cells.get((row * self.width + col) as usize)
	}

	pub fn is_wall(&self, row: u32, col: u32) -> bool {
		self.cell_at(row, col).is_some_and(|cell| cell.is_wall())
	}

	/// Signed lookup for ray stepping; `None` outside the map.
	pub fn tile_at(&self, row: i64, col: i64) -> Option<TileType> {
		if row < 0 || col < 0 {
			return None;
		}
		self.cell_at(row as u32, col as u32).map(|cell| cell.tile)
	}

	pub fn cell_coord_at(&self, point: glam::Vec2) -> Option<(u32, u32)> {
		let tile = (point / self.wall_width).floor();
		if tile.x < 0.0 || tile.y < 0.0 || tile.x >= self.width as f32 || tile.y >= self.width as f32 {
			return None;
		}
		Some((tile.y as u32, tile.x as u32))
	}

	/// Upper bound on grid lines a ray can cross inside the map, with slack.
	pub fn max_ray_steps(&self) -> u32 {
		4 * self.width + 8
	}

	/// Pixel center of a cell.
	pub fn cell_center(&self, row: u32, col: u32) -> glam::Vec2 {
		(glam::vec2(col as f32, row as f32) + 0.5) * self.wall_width
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewMode { #[default] FirstPerson, TopDown }

impl ViewMode {
	pub fn toggled(self) -> Self {
		match self {
			ViewMode::FirstPerson => ViewMode::TopDown,
			ViewMode::TopDown => ViewMode::FirstPerson
		}
	}
}

/// Everything the top-down view draws.
#[derive(Debug)]
pub struct DebugView<'a> {
	pub walls: Vec<&'a Cell>,
	pub grid_lines: Vec<(glam::Vec2, glam::Vec2)>,
	pub player_box: AABB,
	pub facing_line: (glam::Vec2, glam::Vec2),
	/// Start and end of every sampled ray, misses included.
	pub rays: Vec<(glam::Vec2, glam::Vec2)>
}

#[derive(Debug)]
pub enum Frame<'a> {
	FirstPerson(Vec<Strip>),
	TopDown(DebugView<'a>)
}

pub struct GameWorld {
	config: Config,
	tilemap: TileMap,
	palette: Palette,
	player: Player,
	fan: Vec<RayHit>
}

impl GameWorld {
	pub fn new(map: MapDefinition, config: Config) -> Result<Self, MapError> {
		map.validate()?;
		let width = map.rows.len() as u32;
		let wall_width = config.wall_width_for(width);
		if wall_width < 1.0 {
			return Err(MapError::GridTooLarge { width, screen_width: config.screen_width });
		}
		let tilemap = TileMap::from_rows(&map.rows, &map.palette, wall_width)?;
		let (col, row) = map.start_cell;

		let player = Player::new(tilemap.cell_center(row, col), map.start_angle, wall_width, &config);
		let mut world = Self { config, tilemap, palette: map.palette, player, fan: Vec::new() };
		world.cast_fan();
		Ok(world)
	}

	pub fn load<P: AsRef<Path>>(path: P, config: Config) -> Result<Self, MapError> {
		let map = mapfile::load_map(path)?;
		Self::new(map, config)
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	pub fn tilemap(&self) -> &TileMap {
		&self.tilemap
	}

	pub fn palette(&self) -> &Palette {
		&self.palette
	}

	pub fn player(&self) -> &Player {
		&self.player
	}

	/// Rays sampled by the last tick, left to right, misses included.
	pub fn fan(&self) -> &[RayHit] {
		&self.fan
	}

	/// One simulation tick.
	pub fn update(&mut self, intent: MoveIntent) {
		// nothing moved, the fan from the last tick still holds
		if intent.is_idle() {
			return;
		}
		self.player.update(intent, &self.tilemap);
		self.cast_fan();
	}

	fn cast_fan(&mut self) {
		self.fan = raycasting::sample_fan(
			&self.tilemap, self.player.position(), self.player.angle(),
			self.config.ray_count, self.config.fov
		);
	}

	pub fn projection(&self) -> Projection {
		Projection {
			fov: self.config.fov,
			screen_width: self.config.screen_width as f32,
			screen_height: self.config.screen_width as f32,
			wall_width: self.tilemap.wall_width(),
			shade_per_cell: self.config.shade_per_cell
		}
	}

	pub fn strips(&self) -> Vec<Strip> {
		projection::project_all(self.fan.iter().filter(|hit| hit.is_hit()), &self.projection(), &self.palette)
	}

	pub fn debug_view(&self, draw_grid: bool) -> DebugView<'_> {
		let grid_lines = if draw_grid {
			let extent = self.config.screen_width as f32;
			let wall_width = self.tilemap.wall_width();
			// the closing line is drawn when integer division leaves a margin
			(0..=self.tilemap.width()).map(|i| i as f32 * wall_width).take_while(|&offset| offset < extent).flat_map(|offset| {
				[
					(glam::vec2(offset, 0.0), glam::vec2(offset, extent)),
					(glam::vec2(0.0, offset), glam::vec2(extent, offset))
				]
			}).collect()
		} else {
			Vec::new()
		};

		DebugView {
			walls: self.tilemap.walls().collect(),
			grid_lines,
			player_box: self.player.bounding_box(),
			facing_line: self.player.facing_line(),
			rays: self.fan.iter().map(|hit| (self.player.position(), hit.end)).collect()
		}
	}

	pub fn frame(&self, mode: ViewMode, draw_grid: bool) -> Frame<'_> {
		match mode {
			ViewMode::FirstPerson => Frame::FirstPerson(self.strips()),
			ViewMode::TopDown => Frame::TopDown(self.debug_view(draw_grid))
		}
	}
}

#[cfg(test)]
pub(crate) fn test_gameworld() -> GameWorld {
	let mut rows = vec![vec![0; 8]; 8];
	for i in 0..8 {
		rows[0][i] = 1 + (i as u32 % 2);
		rows[7][i] = 1 + (i as u32 % 2);
		rows[i][0] = 1;
		rows[i][7] = 2;
	}
	let map = MapDefinition {
		palette: Palette::new(vec![[200, 60, 60], [60, 60, 200]]),
		rows,
		start_cell: (2, 2),
		start_angle: 0.0
	};
	GameWorld::new(map, Config::default()).unwrap()
}

#[test]
fn gameworld_walls_test() {
	let gameworld = test_gameworld();
	let tilemap = gameworld.tilemap();
	assert!(tilemap.is_wall(0, 0));
	assert!(!tilemap.is_wall(1, 1));
	assert!(tilemap.is_wall(7, 7));
	assert!(!tilemap.is_wall(8, 8));
	assert_eq!(tilemap.cell_at(0, 7).map(|c| c.value()), Some(2));
	assert_eq!(tilemap.walls().count(), 28);
}

#[test]
fn player_spawns_at_cell_center() {
	let gameworld = test_gameworld();
	assert_eq!(gameworld.player().position(), glam::vec2(250.0, 250.0));
	assert_eq!(gameworld.tilemap().cell_coord_at(gameworld.player().position()), Some((2, 2)));
}

#[test]
fn strips_follow_fan_order() {
	let gameworld = test_gameworld();
	let strips = gameworld.strips();
	assert_eq!(strips.len(), gameworld.config().ray_count as usize);
	assert!(strips.windows(2).all(|pair| pair[0].x < pair[1].x));
}

#[test]
fn debug_view_lists_walls_and_grid() {
	let gameworld = test_gameworld();
	let view = gameworld.debug_view(true);
	assert_eq!(view.walls.len(), 28);
	assert_eq!(view.grid_lines.len(), 16);
	assert_eq!(view.rays.len(), gameworld.config().ray_count as usize);
	assert!(gameworld.debug_view(false).grid_lines.is_empty());
}

#[test]
fn start_inside_wall_is_rejected() {
	let map = MapDefinition {
		palette: Palette::new(vec![[1, 2, 3]]),
		rows: vec![vec![1, 1], vec![1, 0]],
		start_cell: (0, 0),
		start_angle: 0.0
	};
	assert!(matches!(GameWorld::new(map, Config::default()), Err(MapError::StartInsideWall { .. })));
}

#[test]
fn grid_wider_than_the_screen_is_rejected() {
	let map = MapDefinition {
		palette: Palette::new(vec![[1, 2, 3]]),
		rows: vec![vec![0; 9]; 9],
		start_cell: (4, 4),
		start_angle: 0.0
	};
	let config = Config { screen_width: 8, ..Config::default() };
	assert!(matches!(
		GameWorld::new(map.clone(), config),
		Err(MapError::GridTooLarge { width: 9, screen_width: 8 })
	));
	assert!(GameWorld::new(map, Config { screen_width: 9, ..Config::default() }).is_ok());
}

#[test]
fn debug_grid_closes_a_partial_margin() {
	let map = MapDefinition {
		palette: Palette::new(vec![[1, 2, 3]]),
		rows: vec![vec![0; 3]; 3],
		start_cell: (1, 1),
		start_angle: 0.0
	};
	let gameworld = GameWorld::new(map, Config::default()).unwrap();
	let view = gameworld.debug_view(true);
	// 800 / 3 leaves a 2px margin, so the line at 798 is drawn too
	assert_eq!(view.grid_lines.len(), 8);
	assert!(view.grid_lines.iter().any(|&(start, _)| start.x == 798.0));
}

#[test]
fn view_mode_toggles() {
	assert_eq!(ViewMode::default().toggled(), ViewMode::TopDown);
	assert_eq!(ViewMode::TopDown.toggled(), ViewMode::FirstPerson);
}
