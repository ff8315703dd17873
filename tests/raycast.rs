use tilecast::{raycasting, Palette, TileMap};

const WALL_WIDTH: f32 = 100.0;

fn bordered(width: usize) -> TileMap {
	let mut rows = vec![vec![0; width]; width];
	for i in 0..width {
		rows[0][i] = 1;
		rows[width - 1][i] = 1;
		rows[i][0] = 1;
		rows[i][width - 1] = 1;
	}
	TileMap::from_rows(&rows, &Palette::new(vec![[255, 255, 255]]), WALL_WIDTH).unwrap()
}

fn empty(width: usize) -> TileMap {
	TileMap::from_rows(&vec![vec![0; width]; width], &Palette::new(vec![[255, 255, 255]]), WALL_WIDTH).unwrap()
}

#[test]
fn axis_rays_from_center_reach_inner_face_of_border() {
	for width in [8, 9] {
		let tilemap = bordered(width);
		let center = glam::Vec2::splat(tilemap.extent() / 2.0);
		let expected = tilemap.extent() / 2.0 - WALL_WIDTH;
		for angle in [0.0, 90.0, 180.0, 270.0] {
			let hit = raycasting::single_raycast(&tilemap, center, angle);
			assert_eq!(hit.value, 1, "width {} angle {}", width, angle);
			assert!((hit.distance - expected).abs() < 0.05, "width {} angle {}: {}", width, angle, hit.distance);
		}
	}
}

#[test]
fn rays_leave_an_empty_map_without_hit() {
	let tilemap = empty(8);
	let center = glam::Vec2::splat(tilemap.extent() / 2.0);
	for angle in [0.0, 37.0, 90.0, 135.0, 180.0, 222.0, 270.0, 301.0, 359.0] {
		let hit = raycasting::single_raycast(&tilemap, center, angle);
		assert_eq!(hit.value, 0, "angle {}", angle);
		assert!(hit.distance >= tilemap.extent() / 2.0 - 0.05, "angle {}: {}", angle, hit.distance);
		assert!(hit.distance.is_finite());
	}
}

#[test]
fn degenerate_angles_terminate() {
	let tilemap = empty(16);
	let corner = glam::vec2(WALL_WIDTH, WALL_WIDTH);
	for angle in [0.0, 90.0, 180.0, 270.0, 360.0, -90.0] {
		let hit = raycasting::single_raycast(&tilemap, corner, angle);
		assert_eq!(hit.value, 0);
		assert!(hit.distance.is_finite() && hit.distance > 0.0);
	}
}

#[test]
fn fan_offsets_ascend_and_span_fov() {
	let tilemap = bordered(8);
	let center = glam::Vec2::splat(tilemap.extent() / 2.0 + 10.0);
	for (count, fov) in [(2, 60.0), (7, 60.0), (400, 66.0)] {
		let fan = raycasting::sample_fan(&tilemap, center, 123.0, count, fov);
		assert_eq!(fan.len(), count as usize);
		assert!(fan.windows(2).all(|pair| pair[0].offset < pair[1].offset));
		assert_eq!(fan[0].offset, -fov / 2.0);
		assert_eq!(fan[fan.len() - 1].offset, fov / 2.0);
	}
}

#[test]
fn enclosed_fan_hits_everywhere() {
	let tilemap = bordered(8);
	let center = glam::vec2(310.0, 455.0);
	let hits = raycasting::multiple_raycast(&tilemap, center, 0.0, 360, 359.0);
	assert_eq!(hits.len(), 360);
	// no ray can travel further than the interior diagonal
	let interior = tilemap.extent() - 2.0 * WALL_WIDTH;
	assert!(hits.iter().all(|hit| hit.distance <= interior * std::f32::consts::SQRT_2 + 0.05));
}

// walks the ray in tiny increments and returns the length at which it first
// stands inside a wall
fn march(tilemap: &TileMap, from: glam::Vec2, angle: f32) -> Option<f32> {
	let dir = glam::Vec2::from_angle(angle.to_radians());
	let step = 0.05;
	let mut length = 0.0;
	while length < tilemap.extent() * 1.5 {
		let (row, col) = tilemap.cell_coord_at(from + dir * length)?;
		if tilemap.is_wall(row, col) {
			return Some(length);
		}
		length += step;
	}
	None
}

#[test]
fn rays_never_see_through_walls() {
	let mut rows = vec![vec![0; 6]; 6];
	for (row, col) in [(1, 2), (2, 4), (3, 1), (4, 3), (2, 2)] {
		rows[row][col] = 1;
	}
	let tilemap = TileMap::from_rows(&rows, &Palette::new(vec![[255, 255, 255]]), WALL_WIDTH).unwrap();

	let mut seed = 0x1234_5678u32;
	let mut next = move || {
		seed ^= seed << 13;
		seed ^= seed >> 17;
		seed ^= seed << 5;
		(seed % 100_000) as f32 / 100_000.0
	};

	let mut checked = 0;
	while checked < 400 {
		let from = glam::vec2(next(), next()) * tilemap.extent();
		let angle = next() * 360.0;
		if tilemap.cell_coord_at(from).map_or(true, |(row, col)| tilemap.is_wall(row, col)) {
			continue;
		}
		checked += 1;

		let hit = raycasting::single_raycast(&tilemap, from, angle);
		if let Some(marched) = march(&tilemap, from, angle) {
			assert!(hit.is_hit(), "from {:?} at {}: missed a wall {} away", from, angle, marched);
			assert!(hit.distance <= marched + 0.01, "from {:?} at {}: {} past {}", from, angle, hit.distance, marched);
		}
	}
}
