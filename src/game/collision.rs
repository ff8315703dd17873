//
// Collision
//

use super::TileMap;

/// Slack absorbing f32 rounding when boxes are flush against each other.
const TOUCH_TOLERANCE: f32 = 1e-3;

/// Axis-aligned box in screen space (y grows downwards, so `top < bottom`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AABB {
	pub left: f32, pub right: f32, pub top: f32, pub bottom: f32
}

impl AABB {
	pub fn from_rect(position: glam::Vec2, width: f32, height: f32) -> Self {
		Self {
			left: position.x,
			right: position.x + width,
			top: position.y,
			bottom: position.y + height
		}
	}

	pub fn from_center(center: glam::Vec2, side: f32) -> Self {
		Self::from_rect(center - glam::Vec2::splat(side / 2.0), side, side)
	}

	pub fn translated(&self, offset: glam::Vec2) -> Self {
		Self {
			left: self.left + offset.x,
			right: self.right + offset.x,
			top: self.top + offset.y,
			bottom: self.bottom + offset.y
		}
	}

	pub fn min(&self) -> glam::Vec2 {
		glam::vec2(self.left, self.top)
	}

	pub fn size(&self) -> glam::Vec2 {
		glam::vec2(self.right - self.left, self.bottom - self.top)
	}

	pub fn center(&self) -> glam::Vec2 {
		self.min() + self.size() / 2.0
	}

	/// Strict overlap: boxes sharing only an edge do not collide.
	pub fn overlaps(&self, other: &AABB) -> bool {
		self.left < other.right - TOUCH_TOLERANCE
			&& other.left < self.right - TOUCH_TOLERANCE
			&& self.top < other.bottom - TOUCH_TOLERANCE
			&& other.top < self.bottom - TOUCH_TOLERANCE
	}
}

fn clamp_x(current: &AABB, velocity_x: f32, tilemap: &TileMap) -> f32 {
	if velocity_x == 0.0 {
		return 0.0;
	}
	let probe = current.translated(glam::vec2(velocity_x, 0.0));
	tilemap.walls().filter(|cell| cell.rect.overlaps(&probe)).fold(velocity_x, |vx, cell|
		if velocity_x < 0.0 { vx.max(cell.rect.right - current.left) } else { vx.min(cell.rect.left - current.right) }
	)
}

fn clamp_y(current: &AABB, velocity_y: f32, tilemap: &TileMap) -> f32 {
	if velocity_y == 0.0 {
		return 0.0;
	}
	let probe = current.translated(glam::vec2(0.0, velocity_y));
	tilemap.walls().filter(|cell| cell.rect.overlaps(&probe)).fold(velocity_y, |vy, cell|
		if velocity_y < 0.0 { vy.max(cell.rect.bottom - current.top) } else { vy.min(cell.rect.top - current.bottom) }
	)
}

/// Clips `velocity` so that `current` moved by it does not enter any wall.
///
/// The x and y components are probed separately, so motion along a wall
/// survives while motion into it is cut to the remaining gap. Velocities
/// longer than one cell can tunnel through walls.
pub fn resolve_velocity(current: &AABB, velocity: glam::Vec2, tilemap: &TileMap) -> glam::Vec2 {
	let mut resolved = glam::vec2(clamp_x(current, velocity.x, tilemap), clamp_y(current, velocity.y, tilemap));

	// A diagonal step can clip a wall corner that neither probe touches.
	let moved_x = current.translated(glam::vec2(resolved.x, 0.0));
	let moved = moved_x.translated(glam::vec2(0.0, resolved.y));
	if tilemap.walls().any(|cell| cell.rect.overlaps(&moved)) {
		resolved.y = clamp_y(&moved_x, resolved.y, tilemap);
	}

	resolved
}
