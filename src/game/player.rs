use super::{collision::{self, AABB}, TileMap};
use crate::config::Config;

/// What the player wants to do this tick. Flags are independent, so moving
/// and turning in the same tick is allowed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveIntent {
	pub forward: bool,
	pub backward: bool,
	pub turn_left: bool,
	pub turn_right: bool,
	/// Quarters the turning speed.
	pub fine: bool
}

impl MoveIntent {
	pub fn is_idle(&self) -> bool {
		!(self.forward || self.backward || self.turn_left || self.turn_right)
	}
}

/// The viewpoint. Angle is in degrees, 0 faces +x and 90 faces +y (down).
#[derive(Clone, Debug)]
pub struct Player {
	position: glam::Vec2,
	angle: f32,
	width: f32,
	speed: f32,
	angle_speed: f32,
	fine_turn_divisor: f32
}

impl Player {
	pub fn new(position: glam::Vec2, angle: f32, wall_width: f32, config: &Config) -> Self {
		Self {
			position,
			angle: angle.rem_euclid(360.0),
			width: config.player_width * wall_width,
			speed: config.movement_speed * wall_width,
			angle_speed: config.angle_speed,
			fine_turn_divisor: config.fine_turn_divisor
		}
	}

	pub fn position(&self) -> glam::Vec2 {
		self.position
	}

	pub fn angle(&self) -> f32 {
		self.angle
	}

	pub fn width(&self) -> f32 {
		self.width
	}

	pub fn speed(&self) -> f32 {
		self.speed
	}

	pub fn bounding_box(&self) -> AABB {
		AABB::from_center(self.position, self.width)
	}

	pub fn forward_vector(&self) -> glam::Vec2 {
		glam::Vec2::from_angle(self.angle.to_radians())
	}

	/// Line from the player's center to the middle of the box edge it faces.
	pub fn facing_line(&self) -> (glam::Vec2, glam::Vec2) {
		(self.position, self.position + self.forward_vector() * self.width / 2.0)
	}

	pub fn update(&mut self, intent: MoveIntent, tilemap: &TileMap) {
		let wishvec = self.apply_intent(intent);
		let velocity = collision::resolve_velocity(&self.bounding_box(), wishvec, tilemap);
		self.position += velocity;
		self.angle = self.angle.rem_euclid(360.0);
		// rem_euclid rounds tiny negative angles up to 360
		if self.angle >= 360.0 {
			self.angle = 0.0;
		}
	}

	// Checked in the order forward, backward, left, right. Backward replaces
	// a forward velocity; turns accumulate after the velocity is taken.
	fn apply_intent(&mut self, intent: MoveIntent) -> glam::Vec2 {
		let mut velocity = glam::Vec2::ZERO;

		if intent.forward {
			velocity = self.forward_vector() * self.speed;
		}
		if intent.backward {
			velocity = -self.forward_vector() * self.speed;
		}

		let turn = if intent.fine { self.angle_speed / self.fine_turn_divisor } else { self.angle_speed };
		if intent.turn_left {
			self.angle -= turn;
		}
		if intent.turn_right {
			self.angle += turn;
		}

		velocity
	}
}
