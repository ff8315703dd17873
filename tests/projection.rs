use tilecast::{projection, raycasting::RayHit, Palette, Projection};

fn screen() -> Projection {
	Projection { fov: 60.0, screen_width: 800.0, screen_height: 800.0, wall_width: 80.0, shade_per_cell: 30.0 }
}

#[test]
fn farther_walls_are_shorter_and_darker() {
	let palette = Palette::new(vec![[250, 200, 150]]);
	let strips: Vec<_> = (1..40)
		.map(|i| RayHit { offset: 0.0, distance: i as f32 * 25.0, value: 1, end: glam::Vec2::ZERO })
		.map(|hit| projection::project(&hit, &screen(), &palette).unwrap())
		.collect();

	for pair in strips.windows(2) {
		assert!(pair[1].height < pair[0].height);
		assert!(pair[1].color.cmple(pair[0].color).all());
		assert!(pair[1].color.cmpge(glam::Vec3::ZERO).all());
	}
	// every channel ends up black once it is far enough away
	assert_eq!(strips[strips.len() - 1].color, glam::Vec3::ZERO);
}

#[test]
fn strips_are_centered_on_the_horizon() {
	let palette = Palette::new(vec![[10, 10, 10]]);
	let hit = RayHit { offset: -30.0, distance: 160.0, value: 1, end: glam::Vec2::ZERO };
	let strip = projection::project(&hit, &screen(), &palette).unwrap();
	assert!(strip.x.abs() < 1e-3);
	assert!((strip.height - 400.0).abs() < 1e-3);
	assert!((strip.top(800.0) - 200.0).abs() < 1e-3);
	assert!((strip.bottom(800.0) - 600.0).abs() < 1e-3);
}

#[test]
fn misses_and_unknown_types_produce_no_strip() {
	let palette = Palette::new(vec![[10, 10, 10]]);
	let hits = [
		RayHit { offset: 0.0, distance: 100.0, value: 0, end: glam::Vec2::ZERO },
		RayHit { offset: 5.0, distance: 100.0, value: 2, end: glam::Vec2::ZERO },
		RayHit { offset: 10.0, distance: 100.0, value: 1, end: glam::Vec2::ZERO },
	];
	let strips = projection::project_all(&hits, &screen(), &palette);
	assert_eq!(strips.len(), 1);
	assert!((strips[0].x - screen().angle_to_x(10.0)).abs() < 1e-3);
}
