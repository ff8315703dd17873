use crate::{game::Palette, raycasting::RayHit};

// keeps a ray that starts on a wall face from producing an infinite strip
const MIN_DISTANCE: f32 = 1e-3;

/// Screen and map constants the projection depends on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
	pub fov: f32,
	pub screen_width: f32,
	pub screen_height: f32,
	pub wall_width: f32,
	pub shade_per_cell: f32
}

/// One vertical line of the first person view, centered on the horizon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Strip {
	pub x: f32,
	pub height: f32,
	/// 0..=255 per channel.
	pub color: glam::Vec3
}

impl Strip {
	pub fn top(&self, screen_height: f32) -> f32 {
		(screen_height - self.height) / 2.0
	}

	pub fn bottom(&self, screen_height: f32) -> f32 {
		(screen_height + self.height) / 2.0
	}
}

impl Projection {
	/// Linear angle to column mapping. Columns are not corrected by the
	/// cosine of the offset, which flattens the edges of the view.
	pub fn angle_to_x(&self, offset: f32) -> f32 {
		offset * (self.screen_width / self.fov) + self.screen_width / 2.0
	}

	pub fn distance_to_height(&self, distance: f32) -> f32 {
		self.wall_width * self.screen_width / distance.max(MIN_DISTANCE)
	}

	/// Darkens every channel by `distance / wall_width * shade_per_cell`,
	/// each floored at zero on its own.
	pub fn fade_out(&self, color: [u8; 3], distance: f32) -> glam::Vec3 {
		let change = distance / self.wall_width * self.shade_per_cell;
		(glam::Vec3::from_array(color.map(f32::from)) - change).max(glam::Vec3::ZERO)
	}
}

/// `None` for misses and for wall types the palette does not know.
pub fn project(hit: &RayHit, projection: &Projection, palette: &Palette) -> Option<Strip> {
	let base = palette.color_of(hit.value)?;
	Some(Strip {
		x: projection.angle_to_x(hit.offset),
		height: projection.distance_to_height(hit.distance),
		color: projection.fade_out(base, hit.distance)
	})
}

pub fn project_all<'a>(hits: impl IntoIterator<Item = &'a RayHit>, projection: &Projection, palette: &Palette) -> Vec<Strip> {
	hits.into_iter().filter_map(|hit| project(hit, projection, palette)).collect()
}
