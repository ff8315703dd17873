use tilecast::{load_map, parse_map, Config, GameWorld, MapError};

const SMALL_ROOM: &str = "\
2
255,0,0
0, 0, 255
3
1,1,1
1,0,1
1,1,1
1,1
0
";

fn replace_line(source: &str, line: usize, text: &str) -> String {
	source.lines().enumerate()
		.map(|(i, l)| if i + 1 == line { text } else { l })
		.collect::<Vec<_>>()
		.join("\n")
}

#[test]
fn small_room_loads() {
	let map = parse_map(SMALL_ROOM).unwrap();
	assert_eq!(map.palette.len(), 2);
	assert_eq!(map.palette.color_of(2), Some([0, 0, 255]));
	assert_eq!(map.start_cell, (1, 1));
	assert_eq!(map.start_angle, 0.0);

	let world = GameWorld::new(map, Config::default()).unwrap();
	let tilemap = world.tilemap();
	assert_eq!(tilemap.width(), 3);
	assert_eq!(tilemap.cell_at(1, 1).unwrap().value(), 0);
	assert_eq!(tilemap.cell_at(0, 2).unwrap().value(), 1);
	assert_eq!(tilemap.walls().count(), 8);
	// 800 / 3 rounded down
	assert_eq!(tilemap.wall_width(), 266.0);
	assert_eq!(world.player().position(), glam::vec2(399.0, 399.0));
}

#[test]
fn bundled_map_loads() {
	let map = load_map("maps/grid4.txt").unwrap();
	assert_eq!(map.rows.len(), 10);
	assert_eq!(map.palette.len(), 3);
	assert!(GameWorld::new(map, Config::default()).is_ok());
}

#[test]
fn missing_file_is_an_io_error() {
	assert!(matches!(load_map("maps/does_not_exist.txt"), Err(MapError::Io(_))));
}

#[test]
fn short_row_is_rejected() {
	let source = replace_line(SMALL_ROOM, 6, "1,0");
	assert!(matches!(parse_map(&source), Err(MapError::RowLength { line: Some(6), row: 1, expected: 3, found: 2 })));
}

#[test]
fn unknown_wall_type_is_rejected() {
	let source = replace_line(SMALL_ROOM, 7, "1,3,1");
	assert!(matches!(parse_map(&source), Err(MapError::WallType { line: Some(7), row: 2, col: 1, value: 3, palette_len: 2 })));
}

#[test]
fn bad_color_is_rejected() {
	let source = replace_line(SMALL_ROOM, 2, "255,256,0");
	assert!(matches!(parse_map(&source), Err(MapError::ColorComponent { line: 2, value: 256 })));
	let source = replace_line(SMALL_ROOM, 3, "0,0");
	assert!(matches!(parse_map(&source), Err(MapError::FieldCount { line: 3, expected: 3, found: 2 })));
}

#[test]
fn garbage_number_reports_its_line() {
	let source = replace_line(SMALL_ROOM, 4, "three");
	match parse_map(&source) {
		Err(MapError::InvalidNumber { line, text }) => {
			assert_eq!(line, 4);
			assert_eq!(text, "three");
		},
		other => panic!("unexpected result {:?}", other)
	}
}

#[test]
fn truncated_file_is_rejected() {
	let source: String = SMALL_ROOM.lines().take(8).collect::<Vec<_>>().join("\n");
	assert!(matches!(parse_map(&source), Err(MapError::UnexpectedEof { line: 9, .. })));
}

#[test]
fn zero_width_grid_is_rejected() {
	assert!(matches!(parse_map("1\n1,1,1\n0\n0,0\n0\n"), Err(MapError::EmptyGrid)));
}

#[test]
fn start_cell_must_be_open_and_inside() {
	let source = replace_line(SMALL_ROOM, 8, "0,1");
	assert!(matches!(parse_map(&source), Err(MapError::StartInsideWall { col: 0, row: 1 })));
	let source = replace_line(SMALL_ROOM, 8, "3,1");
	assert!(matches!(parse_map(&source), Err(MapError::StartOutOfBounds { col: 3, row: 1, width: 3 })));
}

#[test]
fn errors_render_readable_messages() {
	let source = replace_line(SMALL_ROOM, 6, "1,0");
	let message = parse_map(&source).unwrap_err().to_string();
	assert!(message.starts_with("line 6: grid row 1"), "{}", message);
}
