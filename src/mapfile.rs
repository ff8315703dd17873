//! Map definition loading
//!
//! Plain text, one item per line:
//!
//! ```text
//! 2                 number of wall types N
//! 200,40,40         N palette lines "r,g,b"
//! 90,90,200
//! 3                 grid width W
//! 1, 1, 1           W rows of W wall types (0 = empty)
//! 1, 0, 2
//! 1, 1, 1
//! 1,1               start cell "column,row"
//! 0                 start angle, degrees
//! ```

use std::fs;
use std::path::Path;

use crate::game::{validate_rows, Palette};

/// Error type for map loading
#[derive(Debug)]
pub enum MapError {
	Io(std::io::Error),
	UnexpectedEof { line: usize, expected: &'static str },
	InvalidNumber { line: usize, text: String },
	FieldCount { line: usize, expected: usize, found: usize },
	ColorComponent { line: usize, value: u32 },
	EmptyGrid,
	/// `line` is set when the grid was read from a file.
	RowLength { line: Option<usize>, row: usize, expected: usize, found: usize },
	WallType { line: Option<usize>, row: usize, col: usize, value: u32, palette_len: usize },
	/// More cells per side than the screen has pixels.
	GridTooLarge { width: u32, screen_width: u32 },
	StartOutOfBounds { col: u32, row: u32, width: u32 },
	StartInsideWall { col: u32, row: u32 }
}

impl From<std::io::Error> for MapError {
	fn from(e: std::io::Error) -> Self {
		MapError::Io(e)
	}
}

impl std::fmt::Display for MapError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			MapError::Io(e) => write!(f, "IO error: {}", e),
			MapError::UnexpectedEof { line, expected } => write!(f, "line {}: file ended, expected {}", line, expected),
			MapError::InvalidNumber { line, text } => write!(f, "line {}: '{}' is not a valid number", line, text),
			MapError::FieldCount { line, expected, found } => write!(f, "line {}: expected {} comma separated values, found {}", line, expected, found),
			MapError::ColorComponent { line, value } => write!(f, "line {}: color component {} is outside 0..=255", line, value),
			MapError::EmptyGrid => write!(f, "grid width must be at least 1"),
			MapError::RowLength { line, row, expected, found } => {
				write_line_prefix(f, *line)?;
				write!(f, "grid row {}: expected {} cells, found {}", row, expected, found)
			},
			MapError::WallType { line, row, col, value, palette_len } => {
				write_line_prefix(f, *line)?;
				write!(f, "grid cell ({}, {}): wall type {} is not in the palette (1..={})", row, col, value, palette_len)
			},
			MapError::GridTooLarge { width, screen_width } =>
				write!(f, "a {}x{} grid does not fit a {} pixel wide screen", width, width, screen_width),
			MapError::StartOutOfBounds { col, row, width } => write!(f, "start cell ({}, {}) is outside the {}x{} grid", col, row, width, width),
			MapError::StartInsideWall { col, row } => write!(f, "start cell ({}, {}) is a wall", col, row)
		}
	}
}

fn write_line_prefix(f: &mut std::fmt::Formatter<'_>, line: Option<usize>) -> std::fmt::Result {
	match line {
		Some(line) => write!(f, "line {}: ", line),
		None => Ok(())
	}
}

impl std::error::Error for MapError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			MapError::Io(e) => Some(e),
			_ => None
		}
	}
}

/// Parsed map file, validated but not yet scaled to pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct MapDefinition {
	pub palette: Palette,
	/// Wall types, `rows[row][col]`.
	pub rows: Vec<Vec<u32>>,
	/// `(column, row)` of the cell the player starts in.
	pub start_cell: (u32, u32),
	pub start_angle: f32
}

impl MapDefinition {
	pub fn validate(&self) -> Result<(), MapError> {
		validate_rows(&self.rows, self.palette.len(), None)?;
		let width = self.rows.len() as u32;
		let (col, row) = self.start_cell;
		if col >= width || row >= width {
			return Err(MapError::StartOutOfBounds { col, row, width });
		}
		if self.rows[row as usize][col as usize] != 0 {
			return Err(MapError::StartInsideWall { col, row });
		}
		Ok(())
	}
}

struct LineReader<'a> {
	lines: std::iter::Enumerate<std::str::Lines<'a>>,
	last: usize
}

impl<'a> LineReader<'a> {
	fn new(source: &'a str) -> Self {
		Self { lines: source.lines().enumerate(), last: 0 }
	}

	fn next_line(&mut self, expected: &'static str) -> Result<(usize, &'a str), MapError> {
		match self.lines.next() {
			Some((idx, text)) => {
				self.last = idx + 1;
				Ok((idx + 1, text.trim()))
			},
			None => Err(MapError::UnexpectedEof { line: self.last + 1, expected })
		}
	}

	fn number<T: std::str::FromStr>(&mut self, expected: &'static str) -> Result<T, MapError> {
		let (line, text) = self.next_line(expected)?;
		parse_number(line, text)
	}

	fn list(&mut self, expected: &'static str) -> Result<(usize, Vec<u32>), MapError> {
		let (line, text) = self.next_line(expected)?;
		let values = text.split(',').map(|item| parse_number(line, item.trim())).collect::<Result<_, _>>()?;
		Ok((line, values))
	}
}

fn parse_number<T: std::str::FromStr>(line: usize, text: &str) -> Result<T, MapError> {
	text.parse().map_err(|_| MapError::InvalidNumber { line, text: text.to_string() })
}

fn expect_fields(line: usize, values: &[u32], expected: usize) -> Result<(), MapError> {
	if values.len() != expected {
		return Err(MapError::FieldCount { line, expected, found: values.len() });
	}
	Ok(())
}

pub fn parse_map(source: &str) -> Result<MapDefinition, MapError> {
	let mut reader = LineReader::new(source);

	let wall_types: usize = reader.number("number of wall types")?;
	let mut colors = Vec::with_capacity(wall_types);
	for _ in 0..wall_types {
		let (line, values) = reader.list("palette color")?;
		expect_fields(line, &values, 3)?;
		if let Some(&value) = values.iter().find(|v| **v > 255) {
			return Err(MapError::ColorComponent { line, value });
		}
		colors.push([values[0] as u8, values[1] as u8, values[2] as u8]);
	}

	let width: usize = reader.number("grid width")?;
	if width == 0 {
		return Err(MapError::EmptyGrid);
	}
	let mut first_row_line = 0;
	let mut rows = Vec::with_capacity(width);
	for row in 0..width {
		let (line, values) = reader.list("grid row")?;
		if row == 0 {
			first_row_line = line;
		}
		rows.push(values);
	}
	validate_rows(&rows, colors.len(), Some(first_row_line))?;

	let (line, start) = reader.list("start cell")?;
	expect_fields(line, &start, 2)?;
	let start_angle: f32 = reader.number("start angle")?;

	let map = MapDefinition {
		palette: Palette::new(colors),
		rows,
		start_cell: (start[0], start[1]),
		start_angle
	};
	map.validate()?;
	Ok(map)
}

/// Load a map from a text file
pub fn load_map<P: AsRef<Path>>(path: P) -> Result<MapDefinition, MapError> {
	let contents = fs::read_to_string(path.as_ref())?;
	let map = parse_map(&contents)?;
	log::info!(
		"loaded map {}: {}x{} cells, {} wall types",
		path.as_ref().display(), map.rows.len(), map.rows.len(), map.palette.len()
	);
	Ok(map)
}
