/*

Grid line stepping. The ray keeps the cell it is in and the path length at
which it reaches the next vertical and the next horizontal grid line. Each
step crosses the nearer of the two lines (vertical on ties), moves one cell
over on that axis and checks the cell it just entered.

Angles are in degrees, 0 is +x, 90 is +y (screen down).

*/

use crate::game::{TileMap, TileType};

/// Shift applied by the fan to rounded angles landing on an axis.
pub const FAN_AXIS_SHIFT: f32 = 1.0;
/// Shift applied by `single_raycast` to exact axis angles.
pub const AXIS_NUDGE: f32 = 1e-3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
	/// Angle offset from the center of the field of view, degrees.
	pub offset: f32,
	/// Path length travelled until the hit or until the ray left the map.
	pub distance: f32,
	/// Struck wall type, 0 on a miss.
	pub value: u32,
	/// Where the ray stopped.
	pub end: glam::Vec2
}

impl RayHit {
	pub fn is_hit(&self) -> bool {
		self.value > 0
	}
}

pub fn is_axis_angle(angle: f32) -> bool {
	angle == 0.0 || angle == 90.0 || angle == 180.0 || angle == 270.0 || angle == 360.0
}

// Index of the cell a ray travelling along one axis starts in. Standing on a
// line while moving towards lower coordinates puts the ray in the lower cell,
// so the first line ahead is a full cell away.
fn start_cell(coord: f32, wall_width: f32, negative: bool) -> i64 {
	let tile = coord / wall_width;
	if negative { tile.ceil() as i64 - 1 } else { tile.floor() as i64 }
}

// Path length from `from` to the far line of `cell` along one axis.
fn length_to_line(from: f32, dir: f32, cell: i64, wall_width: f32, negative: bool) -> f32 {
	let line = if negative { cell } else { cell + 1 };
	(line as f32 * wall_width - from) / dir
}

/// Casts one ray and reports the first wall it enters.
pub fn single_raycast(tilemap: &TileMap, from: glam::Vec2, angle: f32) -> RayHit {
	let mut angle = angle.rem_euclid(360.0);
	if is_axis_angle(angle) {
		angle += AXIS_NUDGE;
	}

	let wall_width = tilemap.wall_width();
	let dir = glam::Vec2::from_angle(angle.to_radians());
	let leftward = dir.x < 0.0;
	let upward = dir.y < 0.0;

	let mut col = start_cell(from.x, wall_width, leftward);
	let mut row = start_cell(from.y, wall_width, upward);
	let mut to_vertical = length_to_line(from.x, dir.x, col, wall_width, leftward);
	let mut to_horizontal = length_to_line(from.y, dir.y, row, wall_width, upward);
	let mut distance = 0.0;

	for _ in 0..tilemap.max_ray_steps() {
		if to_vertical <= to_horizontal {
			distance = to_vertical;
			col += if leftward { -1 } else { 1 };
			to_vertical = length_to_line(from.x, dir.x, col, wall_width, leftward);
		} else {
			distance = to_horizontal;
			row += if upward { -1 } else { 1 };
			to_horizontal = length_to_line(from.y, dir.y, row, wall_width, upward);
		}

		let end = from + dir * distance;
		match tilemap.tile_at(row, col) {
			None => return RayHit { offset: 0.0, distance, value: 0, end },
			Some(TileType::Wall(value)) => return RayHit { offset: 0.0, distance, value, end },
			Some(TileType::Empty) => ()
		}
	}

	RayHit { offset: 0.0, distance, value: 0, end: from + dir * distance }
}

/// `count` evenly spaced offsets over `[-fov/2, fov/2]`, both ends included.
pub fn fan_offsets(count: u32, fov: f32) -> Vec<f32> {
	let start = -fov / 2.0;
	let stop = fov / 2.0;
	match count {
		0 => Vec::new(),
		1 => vec![start],
		_ => {
			let step = (stop - start) / (count - 1) as f32;
			(0..count).map(|i| if i == count - 1 { stop } else { start + step * i as f32 }).collect()
		}
	}
}

/// Whole-degree ray angle for one fan offset, shifted off the axes.
pub fn fan_ray_angle(facing: f32, offset: f32) -> f32 {
	let angle = (facing + offset).round().rem_euclid(360.0);
	if is_axis_angle(angle) { angle + FAN_AXIS_SHIFT } else { angle }
}

/// One ray per fan offset, left to right, misses included.
pub fn sample_fan(tilemap: &TileMap, from: glam::Vec2, facing: f32, raycount: u32, fov: f32) -> Vec<RayHit> {
	fan_offsets(raycount, fov).into_iter().map(|offset| {
		let hit = single_raycast(tilemap, from, fan_ray_angle(facing, offset));
		RayHit { offset, ..hit }
	}).collect()
}

/// Like `sample_fan` but only rays that struck a wall.
pub fn multiple_raycast(tilemap: &TileMap, from: glam::Vec2, facing: f32, raycount: u32, fov: f32) -> Vec<RayHit> {
	sample_fan(tilemap, from, facing, raycount, fov).into_iter().filter(RayHit::is_hit).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::game::Palette;

	fn tilemap(rows: Vec<Vec<u32>>) -> TileMap {
		TileMap::from_rows(&rows, &Palette::new(vec![[255, 255, 255], [0, 255, 0]]), 100.0).unwrap()
	}

	#[test]
	fn start_on_a_line_belongs_to_the_cell_behind_it() {
		assert_eq!(start_cell(300.0, 100.0, false), 3);
		assert_eq!(start_cell(300.0, 100.0, true), 2);
		assert_eq!(start_cell(325.0, 100.0, false), 3);
		assert_eq!(start_cell(325.0, 100.0, true), 3);
		assert_eq!(length_to_line(300.0, -1.0, 2, 100.0, true), 100.0);
	}

	#[test]
	fn ray_grazing_a_line_checks_the_cell_it_crosses() {
		let mut rows = vec![vec![0; 5]; 5];
		rows[2][2] = 2;
		// the first horizontal crossing lands 0.005px short of x=200
		let hit = single_raycast(&tilemap(rows), glam::vec2(149.995, 150.0), 45.0);
		assert_eq!(hit.value, 2);
		assert!((hit.distance - 50.005 * std::f32::consts::SQRT_2).abs() < 0.01);
		assert!((hit.end - glam::vec2(200.0, 200.005)).length() < 0.01);
	}

	#[test]
	fn fan_angle_skips_axes() {
		assert_eq!(fan_ray_angle(0.0, 0.0), 1.0);
		assert_eq!(fan_ray_angle(359.8, 0.0), 1.0);
		assert_eq!(fan_ray_angle(89.6, 0.0), 91.0);
		assert_eq!(fan_ray_angle(10.0, -30.0), 340.0);
	}

	#[test]
	fn fan_offsets_edge_counts() {
		assert!(fan_offsets(0, 60.0).is_empty());
		assert_eq!(fan_offsets(1, 60.0), vec![-30.0]);
		assert_eq!(fan_offsets(3, 60.0), vec![-30.0, 0.0, 30.0]);
	}

	#[test]
	fn diagonal_ray_reports_wall_type() {
		let mut rows = vec![vec![0; 5]; 5];
		rows[4][4] = 2;
		// enters the corner cell through its top edge at (420, 400)
		let hit = single_raycast(&tilemap(rows), glam::vec2(50.0, 30.0), 45.0);
		assert_eq!(hit.value, 2);
		assert!((hit.distance - 370.0 * std::f32::consts::SQRT_2).abs() < 0.5);
		assert!((hit.end - glam::vec2(420.0, 400.0)).length() < 0.5);
	}

	#[test]
	fn leftward_ray_enters_cell_left_of_line() {
		let mut rows = vec![vec![0; 5]; 5];
		rows[2][0] = 1;
		let hit = single_raycast(&tilemap(rows), glam::vec2(450.0, 250.0), 180.0);
		assert_eq!(hit.value, 1);
		assert!((hit.distance - 350.0).abs() < 0.1);
	}

	#[test]
	fn multiple_raycast_drops_misses() {
		let mut rows = vec![vec![0; 5]; 5];
		rows[2][4] = 1;
		let tilemap = tilemap(rows);
		let all = sample_fan(&tilemap, glam::vec2(250.0, 250.0), 0.0, 9, 60.0);
		let hits = multiple_raycast(&tilemap, glam::vec2(250.0, 250.0), 0.0, 9, 60.0);
		assert_eq!(all.len(), 9);
		assert!(!hits.is_empty() && hits.len() < all.len());
		assert!(hits.iter().all(|hit| hit.value == 1));
	}
}
